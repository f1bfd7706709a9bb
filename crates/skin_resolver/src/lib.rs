//! Screen resolution.
//!
//! One resolution pass takes a registered screen document and a live
//! component collection, expands reusable fragments, walks the widget tree
//! in document order, binds every declared widget to its live counterpart
//! (or builds its renderer chain), and collects each one's attribute list.
//! A node that cannot be resolved degrades to a logged failure; the pass
//! itself only fails when bindable components are left unbound at the end.

#![forbid(unsafe_code)]

pub mod attributes;
pub mod components;
pub mod elements;
pub mod error;

pub use attributes::{Attribute, AttributeList, WidgetHandle, WindowFlags, apply_attributes};
pub use components::{Component, Components, Obsolete, Source};
pub use elements::{Converter, ElementRegistry, Renderer, SourceRef};
pub use error::{NodeError, NodeFailure, ResolveError};

use attributes::collect_attributes;
use log::{error, info, warn};
use skin_document::{Element, parse_document};
use skin_expr::{FontMetrics, Scale};
use skin_layout::{ContextKind, LayoutContext, Rect, ScalePair};
use skin_registry::SkinRegistry;
use skin_values::parse_integer;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Fragment expansion gives up past this splice depth.
const FRAGMENT_DEPTH_LIMIT: usize = 32;

/// Obsolete source aliases are followed at most this many hops.
const OBSOLETE_HOP_LIMIT: usize = 8;

/// Scale factor of a desktop relative to the 720p design baseline.
pub fn skin_factor(desktop: Rect) -> f64 {
    f64::from(desktop.height) / 720.0
}

/// One widget bound to a live component, with its resolved attributes.
pub struct Binding {
    pub name: String,
    pub attributes: AttributeList,
}

/// A renderer connected to its (possibly converted) source.
pub struct RendererBinding {
    pub type_name: String,
    pub source: SourceRef,
    pub attributes: AttributeList,
    pub renderer: Box<dyn Renderer>,
}

/// One converter stage built during the pass, addressed by index from
/// [`SourceRef::Converter`].
pub struct ConverterStage {
    pub type_name: String,
    pub arguments: String,
    pub source: SourceRef,
    pub converter: Box<dyn Converter>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AdditionalKind {
    Label,
    Pixmap,
    Rectangle,
}

/// An anonymous toolkit widget the document adds directly. Never part of
/// the completeness check.
pub struct AdditionalWidget {
    pub kind: AdditionalKind,
    pub attributes: AttributeList,
}

/// Code registered to run at a lifecycle hook. Only layout-finish hooks
/// exist.
pub struct Applet {
    pub code: String,
}

/// Everything one successful resolution pass produced.
pub struct ResolvedScreen {
    /// Name of the screen that was selected.
    pub screen: String,
    /// Name of the document it came from.
    pub document: String,
    pub screen_attributes: AttributeList,
    pub bindings: Vec<Binding>,
    pub renderers: Vec<RendererBinding>,
    pub converters: Vec<ConverterStage>,
    pub additional: Vec<AdditionalWidget>,
    pub applets: Vec<Applet>,
    /// Nodes that degraded instead of resolving.
    pub errors: Vec<NodeFailure>,
}

/// Resolves screens against one registry and element set.
pub struct ScreenResolver<'a> {
    registry: &'a SkinRegistry,
    elements: &'a ElementRegistry,
    desktop: Rect,
    screen_id: u32,
    factor: f64,
}

struct Pass<'a> {
    components: &'a Components,
    screen: String,
    document: String,
    used: HashSet<String>,
    bindings: Vec<Binding>,
    renderers: Vec<RendererBinding>,
    converters: Vec<ConverterStage>,
    additional: Vec<AdditionalWidget>,
    applets: Vec<Applet>,
    errors: Vec<NodeFailure>,
    converter_cache: HashMap<(SourceRef, String, String), usize>,
    renderer_cache: HashMap<(SourceRef, String), usize>,
    panel_stack: Vec<String>,
}

impl Pass<'_> {
    fn fail(&mut self, node: &str, error: NodeError) {
        error!("error in screen '{}' ({}) {node}: {error}", self.screen, self.document);
        self.errors.push(NodeFailure {
            document: self.document.clone(),
            node: node.to_owned(),
            error,
        });
    }

    fn collect(&mut self, element: &Element, context: &mut LayoutContext, registry: &SkinRegistry, ignore: &[&str]) -> AttributeList {
        let mut errors = Vec::new();
        let attributes = collect_attributes(element, context, registry, ignore, &mut errors);
        for error in errors {
            self.fail(&element.tag, error);
        }
        attributes
    }
}

impl<'a> ScreenResolver<'a> {
    pub fn new(
        registry: &'a SkinRegistry,
        elements: &'a ElementRegistry,
        desktop: Rect,
        screen_id: u32,
    ) -> Self {
        Self {
            registry,
            elements,
            desktop,
            screen_id,
            factor: skin_factor(desktop),
        }
    }

    /// Resolve the first suitable candidate from `names` against the live
    /// components, falling back to an embedded document, finally to an
    /// empty screen.
    pub fn resolve(
        &self,
        names: &[&str],
        fallback: Option<&str>,
        components: &Components,
    ) -> Result<ResolvedScreen, ResolveError> {
        let (screen, document, element) = self.select(names, fallback, components);
        info!("processing the screen '{screen}' from '{document}'");
        let mut pass = Pass {
            components,
            screen,
            document,
            used: HashSet::new(),
            bindings: Vec::new(),
            renderers: Vec::new(),
            converters: Vec::new(),
            additional: Vec::new(),
            applets: Vec::new(),
            errors: Vec::new(),
            converter_cache: HashMap::new(),
            renderer_cache: HashMap::new(),
            panel_stack: Vec::new(),
        };
        let expanded = self.expand(&element, 0, &mut pass);
        let mut root = self.root_context(&expanded);
        let screen_attributes =
            pass.collect(&expanded, &mut root, self.registry, &["name"]);
        let mut context = root.derive(
            expanded.attribute("position"),
            expanded.attribute("size"),
            None,
            ContextKind::Sequential,
        );
        // Widgets are relative to the screen, not the desktop.
        context.x = 0;
        context.y = 0;
        self.process_children(&expanded, &mut context, &mut pass);
        let mut unbound: Vec<String> = pass
            .components
            .bindable_names()
            .filter(|name| !pass.used.contains(*name))
            .map(str::to_owned)
            .collect();
        if !unbound.is_empty() {
            unbound.sort();
            return Err(ResolveError::UnboundComponents {
                document: pass.document,
                names: unbound,
            });
        }
        Ok(ResolvedScreen {
            screen: pass.screen,
            document: pass.document,
            screen_attributes,
            bindings: pass.bindings,
            renderers: pass.renderers,
            converters: pass.converters,
            additional: pass.additional,
            applets: pass.applets,
            errors: pass.errors,
        })
    }

    fn select(
        &self,
        names: &[&str],
        fallback: Option<&str>,
        components: &Components,
    ) -> (String, String, Arc<Element>) {
        for &name in names {
            let Some(entry) = self.registry.screen(name) else {
                continue;
            };
            if let Some(mandatory) = components.mandatory() {
                let declared = self.registry.find_widgets(name);
                if !mandatory.is_subset(&declared) {
                    warn!(
                        "the screen '{name}' does not declare every mandatory widget, \
                         trying the next candidate"
                    );
                    continue;
                }
            }
            return (name.to_owned(), entry.document.clone(), Arc::clone(&entry.element));
        }
        if let Some(xml) = fallback {
            match parse_document(xml) {
                Ok(element) => {
                    return ("<embedded>".to_owned(), "<embedded>".to_owned(), Arc::new(element));
                }
                Err(error) => error!("the embedded fallback document is unusable: {error}"),
            }
        }
        warn!("no screen to resolve, producing an empty screen");
        ("<empty>".to_owned(), "<empty>".to_owned(), Arc::new(Element::new("screen")))
    }

    /// Splice registered fragments into a fully expanded copy of the tree.
    fn expand(&self, element: &Element, depth: usize, pass: &mut Pass) -> Element {
        let mut expanded = Element {
            tag: element.tag.clone(),
            attributes: element.attributes.clone(),
            children: Vec::with_capacity(element.children.len()),
            text: element.text.clone(),
        };
        for child in &element.children {
            self.expand_into(child, depth, pass, &mut expanded.children);
        }
        expanded
    }

    /// Expand one node into zero or more output nodes. A fragment reference
    /// splices its children, each expanded in turn so references inside a
    /// fragment resolve too.
    fn expand_into(&self, node: &Element, depth: usize, pass: &mut Pass, out: &mut Vec<Element>) {
        let reference = match node.tag.as_str() {
            "constant-widget" => node.attribute("name").map(|name| ("constant-widget", name)),
            "layout" => node.attribute("name").map(|name| ("layout", name)),
            _ => None,
        };
        let Some((kind, name)) = reference else {
            out.push(self.expand(node, depth, pass));
            return;
        };
        if depth >= FRAGMENT_DEPTH_LIMIT {
            pass.fail(
                kind,
                NodeError::RecursiveFragment { kind, name: name.to_owned() },
            );
            return;
        }
        let fragment = match kind {
            "constant-widget" => self.registry.constant_widget(name),
            _ => self.registry.layout(name),
        };
        match fragment {
            Some(fragment) => {
                let fragment = Arc::clone(fragment);
                for spliced in &fragment.children {
                    self.expand_into(spliced, depth + 1, pass, out);
                }
            }
            None => pass.fail(
                kind,
                NodeError::MissingFragment { kind, name: name.to_owned() },
            ),
        }
    }

    fn root_context(&self, screen: &Element) -> LayoutContext {
        let design = screen
            .attribute("resolution")
            .and_then(|value| {
                let (width, height) = value.split_once(',')?;
                Some((parse_integer(width, 0), parse_integer(height, 0)))
            })
            .or_else(|| {
                self.registry
                    .resolution(self.screen_id)
                    .map(|resolution| (resolution.width, resolution.height))
            })
            .unwrap_or((self.desktop.width, self.desktop.height));
        let scale = ScalePair {
            horizontal: Scale::new(self.desktop.width, design.0),
            vertical: Scale::new(self.desktop.height, design.1),
        };
        LayoutContext::root(self.desktop, scale, self.factor)
    }

    /// Whether gating attributes allow this node for the live components.
    fn admitted(&self, element: &Element, components: &Components) -> bool {
        let any_live = |list: &str| list.split(',').any(|name| components.contains(name.trim()));
        if let Some(conditional) = element.attribute("conditional")
            && !any_live(conditional)
        {
            return false;
        }
        if let Some(includes) = element.attribute("includes")
            && !any_live(includes)
        {
            return false;
        }
        if let Some(excludes) = element.attribute("excludes")
            && any_live(excludes)
        {
            return false;
        }
        if let Some(object_types) = element.attribute("objectTypes") {
            let mut fields = object_types.split(',').map(str::trim);
            if let Some(subject) = fields.next() {
                let mut types = fields.peekable();
                if types.peek().is_some() {
                    match components.type_name(subject) {
                        Some(actual) => {
                            if !types.any(|expected| expected == actual) {
                                return false;
                            }
                        }
                        None => return false,
                    }
                }
            }
        }
        true
    }

    fn process_children(&self, element: &Element, context: &mut LayoutContext, pass: &mut Pass) {
        for child in &element.children {
            if !self.admitted(child, pass.components) {
                continue;
            }
            match child.tag.as_str() {
                "widget" => self.process_widget(child, context, pass),
                "applet" => self.process_applet(child, pass),
                "eLabel" => self.process_additional(child, AdditionalKind::Label, context, pass),
                "ePixmap" => self.process_additional(child, AdditionalKind::Pixmap, context, pass),
                "eRectangle" => {
                    self.process_additional(child, AdditionalKind::Rectangle, context, pass);
                }
                "panel" => self.process_panel(child, context, pass),
                _ => {}
            }
        }
    }

    fn process_widget(&self, widget: &Element, context: &mut LayoutContext, pass: &mut Pass) {
        if let Some(name) = widget.attribute("name") {
            if !pass.components.contains(name) {
                pass.fail(
                    "widget",
                    NodeError::UnknownComponent {
                        screen: pass.screen.clone(),
                        name: name.to_owned(),
                    },
                );
                return;
            }
            pass.used.insert(name.to_owned());
            let attributes = pass.collect(widget, context, self.registry, &["name"]);
            pass.bindings.push(Binding { name: name.to_owned(), attributes });
        } else if let Some(path) = widget.attribute("source") {
            self.process_source_widget(widget, path, context, pass);
        } else {
            pass.fail("widget", NodeError::WidgetWithoutBinding);
        }
    }

    fn process_source_widget(
        &self,
        widget: &Element,
        path: &str,
        context: &mut LayoutContext,
        pass: &mut Pass,
    ) {
        let mut path = path.to_owned();
        let mut hops = 0;
        loop {
            let Some(source) = pass.components.source(&path) else {
                pass.fail(
                    "widget",
                    NodeError::UnknownSource { screen: pass.screen.clone(), path },
                );
                return;
            };
            let Some(obsolete) = &source.obsolete else {
                break;
            };
            warn!(
                "the skin '{}' uses the obsolete source '{path}', use '{}' instead{}",
                pass.screen,
                obsolete.replacement,
                obsolete
                    .removal_date
                    .as_deref()
                    .map(|date| format!(" (removal planned for {date})"))
                    .unwrap_or_default()
            );
            if let Some(description) = &obsolete.description {
                warn!("source description: {description}");
            }
            hops += 1;
            if hops > OBSOLETE_HOP_LIMIT {
                pass.fail(
                    "widget",
                    NodeError::UnknownSource { screen: pass.screen.clone(), path },
                );
                return;
            }
            path = obsolete.replacement.clone();
        }
        let Some(render) = widget.attribute("render") else {
            pass.fail("widget", NodeError::MissingRenderer { path });
            return;
        };
        let mut source = SourceRef::Component { path };
        for convert in widget.children_named("convert") {
            let Some(type_name) = convert.attribute("type") else {
                pass.fail("convert", NodeError::MissingConverterType);
                return;
            };
            let arguments = convert.text.as_deref().unwrap_or("").trim().to_owned();
            let key = (source.clone(), type_name.to_owned(), arguments.clone());
            if let Some(&index) = pass.converter_cache.get(&key) {
                source = SourceRef::Converter { index };
                continue;
            }
            let Some(converter) = self.elements.converter(type_name, &arguments) else {
                pass.fail(
                    "convert",
                    NodeError::UnknownConverter { name: type_name.to_owned() },
                );
                return;
            };
            pass.converters.push(ConverterStage {
                type_name: type_name.to_owned(),
                arguments,
                source: source.clone(),
                converter,
            });
            let index = pass.converters.len() - 1;
            pass.converter_cache.insert(key, index);
            source = SourceRef::Converter { index };
        }
        let attributes = pass.collect(widget, context, self.registry, &["render", "source"]);
        let key = (source.clone(), render.to_owned());
        if let Some(&index) = pass.renderer_cache.get(&key) {
            // The same source and renderer declared again reuses the
            // existing connection.
            pass.renderers[index].attributes.extend(attributes);
            return;
        }
        let Some(mut renderer) = self.elements.renderer(render) else {
            pass.fail("widget", NodeError::UnknownRenderer { name: render.to_owned() });
            return;
        };
        renderer.connect(&source);
        let index = pass.renderers.len();
        pass.renderer_cache.insert(key, index);
        pass.renderers.push(RendererBinding {
            type_name: render.to_owned(),
            source,
            attributes,
            renderer,
        });
    }

    fn process_applet(&self, applet: &Element, pass: &mut Pass) {
        let code = applet.text.as_deref().map(str::trim).unwrap_or_default();
        if code.is_empty() {
            pass.fail("applet", NodeError::EmptyApplet);
            return;
        }
        match applet.attribute("type") {
            Some("onLayoutFinish") => pass.applets.push(Applet { code: code.to_owned() }),
            other => pass.fail(
                "applet",
                NodeError::UnknownHook { name: other.unwrap_or("").to_owned() },
            ),
        }
    }

    fn process_additional(
        &self,
        widget: &Element,
        kind: AdditionalKind,
        context: &mut LayoutContext,
        pass: &mut Pass,
    ) {
        let attributes = pass.collect(widget, context, self.registry, &["name"]);
        pass.additional.push(AdditionalWidget { kind, attributes });
    }

    fn process_panel(&self, panel: &Element, context: &mut LayoutContext, pass: &mut Pass) {
        // A named panel splices the referenced screen's children into the
        // current context before its own children get a nested context.
        if let Some(name) = panel.attribute("name") {
            if pass.panel_stack.iter().any(|seen| seen == name) {
                pass.fail(
                    "panel",
                    NodeError::RecursiveFragment { kind: "panel", name: name.to_owned() },
                );
            } else {
                match self.registry.screen(name) {
                    Some(entry) => {
                        let element = Arc::clone(&entry.element);
                        pass.panel_stack.push(name.to_owned());
                        let expanded = self.expand(&element, 0, pass);
                        self.process_children(&expanded, context, pass);
                        pass.panel_stack.pop();
                    }
                    None => pass.fail(
                        "panel",
                        NodeError::MissingPanelScreen { name: name.to_owned() },
                    ),
                }
            }
        }
        let kind = match panel.attribute("layout") {
            Some("stack") => ContextKind::Stacking,
            _ => ContextKind::Sequential,
        };
        let font = panel
            .attribute("font")
            .and_then(|value| self.font_metrics(value));
        let mut nested =
            context.derive(panel.attribute("position"), panel.attribute("size"), font, kind);
        self.process_children(panel, &mut nested, pass);
    }

    fn font_metrics(&self, value: &str) -> Option<FontMetrics> {
        let name = value.split(';').next().unwrap_or(value).trim();
        self.registry.font_metrics(name)
    }
}
