//! The skin document store.
//!
//! A [`SkinRegistry`] owns everything skins register process-wide: parsed
//! screen trees, reusable fragments, named colors, font aliases, parameters
//! and variables. Documents load additively in ascending priority order, so
//! a later load overrides earlier entries of the same key. `reset` drops all
//! of it back to the built-in seeds; a reload is a reset plus fresh loads.
//!
//! The registry is plain data with no interior locking. The embedding
//! application finishes loading before resolution passes start reading.

#![forbid(unsafe_code)]

use anyhow::Context;
use log::{debug, error, info, warn};
use skin_document::{DocumentError, Element, parse_document};
use skin_expr::FontMetrics;
use skin_values::{
    Argb, ColorTable, FontAlias, FontTable, Parameter, builtin_colors, builtin_fonts,
    parse_color_or, parse_integer, parse_parameters,
};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use thiserror::Error;

/// Screen id of the primary GUI display.
pub const GUI_SKIN_ID: u32 = 0;

/// Nested `include` elements stop loading past this depth, so a document
/// cycle degrades instead of recursing forever.
const INCLUDE_DEPTH_LIMIT: usize = 16;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("document '{document}' cannot be parsed: {source}")]
    Document {
        document: String,
        source: DocumentError,
    },
    #[error("document '{document}' must have a 'skin' root, found '{tag}'")]
    NotASkin { document: String, tag: String },
}

/// Display geometry declared by an `output/resolution` element.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Resolution {
    pub width: i32,
    pub height: i32,
    pub depth: i32,
}

/// One registered screen and the document it came from.
#[derive(Clone, Debug)]
pub struct ScreenEntry {
    pub element: Arc<Element>,
    pub document: String,
}

/// Resolves `include` references to further document text. File lookup
/// stays outside this crate; the application decides what a filename means.
pub trait IncludeLoader {
    fn load(&self, filename: &str) -> anyhow::Result<String>;
}

/// An include policy for callers without a document search path.
pub struct NoIncludes;

impl IncludeLoader for NoIncludes {
    fn load(&self, filename: &str) -> anyhow::Result<String> {
        anyhow::bail!("includes are not available here (requested '{filename}')")
    }
}

/// All state registered by loaded skin documents.
pub struct SkinRegistry {
    screens: HashMap<String, ScreenEntry>,
    window_styles: HashMap<u32, Arc<Element>>,
    constant_widgets: HashMap<String, Arc<Element>>,
    layouts: HashMap<String, Arc<Element>>,
    colors: ColorTable,
    fonts: FontTable,
    faces: HashSet<String>,
    parameters: HashMap<String, Vec<Parameter>>,
    variables: HashMap<String, String>,
    resolutions: HashMap<u32, Resolution>,
    menus: HashMap<String, String>,
    setups: HashMap<String, String>,
    margins: HashMap<u32, [i32; 4]>,
    subtitles: Vec<Element>,
}

impl Default for SkinRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SkinRegistry {
    pub fn new() -> Self {
        Self {
            screens: HashMap::new(),
            window_styles: HashMap::new(),
            constant_widgets: HashMap::new(),
            layouts: HashMap::new(),
            colors: builtin_colors(),
            fonts: builtin_fonts(),
            faces: HashSet::new(),
            parameters: HashMap::new(),
            variables: HashMap::new(),
            resolutions: HashMap::new(),
            menus: HashMap::new(),
            setups: HashMap::new(),
            margins: HashMap::new(),
            subtitles: Vec::new(),
        }
    }

    /// Drop everything registered by loads, back to the built-in seeds.
    /// Loading the same documents again afterwards rebuilds an identical
    /// registry.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Load one skin document given as XML text. `document` names the
    /// source for diagnostics, `includes` resolves nested `include`
    /// elements, `screen_id` selects which display's screens to keep.
    ///
    /// Sections load best-effort: a bad entry logs and is skipped, only an
    /// unparsable document is an error. Entries override same-keyed ones
    /// from earlier loads.
    pub fn load(
        &mut self,
        document: &str,
        xml: &str,
        includes: &dyn IncludeLoader,
        screen_id: u32,
    ) -> Result<(), LoadError> {
        self.load_at(document, xml, includes, screen_id, 0)
    }

    fn load_at(
        &mut self,
        document: &str,
        xml: &str,
        includes: &dyn IncludeLoader,
        screen_id: u32,
        depth: usize,
    ) -> Result<(), LoadError> {
        info!("loading the skin document '{document}'");
        let root = parse_document(xml).map_err(|source| LoadError::Document {
            document: document.to_owned(),
            source,
        })?;
        if root.tag != "skin" {
            return Err(LoadError::NotASkin {
                document: document.to_owned(),
                tag: root.tag,
            });
        }
        self.load_sections(document, &root, includes, screen_id, depth);
        self.register_screens(document, root, screen_id);
        Ok(())
    }

    fn load_sections(
        &mut self,
        document: &str,
        root: &Element,
        includes: &dyn IncludeLoader,
        screen_id: u32,
        depth: usize,
    ) {
        for output in root.children_named("output") {
            let id = attribute_integer(output, "id", GUI_SKIN_ID as i32) as u32;
            if id != GUI_SKIN_ID {
                continue;
            }
            for resolution in output.children_named("resolution") {
                let resolution = Resolution {
                    width: attribute_integer(resolution, "xres", 720),
                    height: attribute_integer(resolution, "yres", 576),
                    depth: attribute_integer(resolution, "bpp", 32),
                };
                self.resolutions.insert(id, resolution);
            }
        }
        for include in root.children_named("include") {
            let Some(filename) = include.attribute("filename") else {
                error!("an 'include' element in '{document}' has no filename");
                continue;
            };
            if depth >= INCLUDE_DEPTH_LIMIT {
                error!(
                    "the include '{filename}' in '{document}' exceeds the nesting limit, \
                     the documents probably include each other"
                );
                continue;
            }
            match includes
                .load(filename)
                .with_context(|| format!("include '{filename}' in '{document}'"))
            {
                Ok(xml) => {
                    if let Err(error) =
                        self.load_at(filename, &xml, includes, screen_id, depth + 1)
                    {
                        error!("included document failed to load: {error}");
                    }
                }
                Err(error) => error!("{error:#}"),
            }
        }
        for section in root.children_named("colors") {
            for color in section.children_named("color") {
                match (color.attribute("name"), color.attribute("value")) {
                    (Some(name), Some(value)) => {
                        let color = parse_color_or(value, &self.colors, Argb::WHITE);
                        self.colors.insert(name.to_owned(), color);
                    }
                    _ => error!("a 'color' element in '{document}' needs a name and a value"),
                }
            }
        }
        for section in root.children_named("fonts") {
            for font in section.children_named("font") {
                // Glyph data stays with the toolkit; only the face name is
                // recorded so font values can validate against it.
                match font.attribute("name") {
                    Some(name) => {
                        self.faces.insert(name.to_owned());
                    }
                    None => error!("a 'font' element in '{document}' needs a name"),
                }
            }
            for alias in section.children_named("alias") {
                match (alias.attribute("name"), alias.attribute("font")) {
                    (Some(name), Some(face)) => {
                        let alias = FontAlias {
                            face: face.to_owned(),
                            size: attribute_integer(alias, "size", 20),
                            height: attribute_integer(alias, "height", 25),
                            width: attribute_integer(alias, "width", 18),
                        };
                        self.fonts.insert(name.to_owned(), alias);
                    }
                    _ => error!("an 'alias' element in '{document}' needs a name and a font"),
                }
            }
        }
        for section in root.children_named("parameters") {
            for parameter in section.children_named("parameter") {
                match (parameter.attribute("name"), parameter.attribute("value")) {
                    (Some(name), Some(value)) => {
                        let values = parse_parameters(value, &self.colors);
                        self.parameters.insert(name.to_owned(), values);
                    }
                    _ => error!("a 'parameter' element in '{document}' needs a name and a value"),
                }
            }
        }
        for section in root.children_named("variables") {
            for variable in section.children_named("variable") {
                match (variable.attribute("name"), variable.attribute("value")) {
                    (Some(name), Some(value)) => {
                        self.variables.insert(name.to_owned(), value.to_owned());
                    }
                    _ => error!("a 'variable' element in '{document}' needs a name and a value"),
                }
            }
        }
        for section in root.children_named("menus") {
            for menu in section.children_named("menu") {
                match (menu.attribute("key"), menu.attribute("image")) {
                    (Some(key), Some(image)) => {
                        self.menus.insert(key.to_owned(), image.to_owned());
                    }
                    _ => error!("a 'menu' element in '{document}' needs a key and an image"),
                }
            }
        }
        for section in root.children_named("setups") {
            for setup in section.children_named("setup") {
                match (setup.attribute("key"), setup.attribute("image")) {
                    (Some(key), Some(image)) => {
                        self.setups.insert(key.to_owned(), image.to_owned());
                    }
                    _ => error!("a 'setup' element in '{document}' needs a key and an image"),
                }
            }
        }
        for section in root.children_named("constant-widgets") {
            for fragment in section.children_named("constant-widget") {
                match fragment.attribute("name") {
                    Some(name) => {
                        self.constant_widgets
                            .insert(name.to_owned(), Arc::new(fragment.clone()));
                    }
                    None => error!("a 'constant-widget' element in '{document}' needs a name"),
                }
            }
        }
        for section in root.children_named("layouts") {
            for fragment in section.children_named("layout") {
                match fragment.attribute("name") {
                    Some(name) => {
                        self.layouts.insert(name.to_owned(), Arc::new(fragment.clone()));
                    }
                    None => error!("a 'layout' element in '{document}' needs a name"),
                }
            }
        }
        for margin in root.children_named("margin") {
            let id = attribute_integer(margin, "id", GUI_SKIN_ID as i32) as u32;
            let edges = ["left", "top", "right", "bottom"].map(|edge| {
                margin
                    .attribute(edge)
                    .map_or(0, |value| parse_integer(value, 0))
            });
            self.margins.insert(id, edges);
        }
        // Subtitle styling is consumed by the subtitle widget outside this
        // crate; the elements are kept verbatim.
        for section in root.children_named("subtitles") {
            self.subtitles
                .extend(section.children_named("sub").cloned());
        }
    }

    fn register_screens(&mut self, document: &str, root: Element, screen_id: u32) {
        for element in root.children {
            match element.tag.as_str() {
                "screen" => {
                    let Some(name) = element.attribute("name") else {
                        warn!("a screen without a name in '{document}' cannot be registered");
                        continue;
                    };
                    if let Some(id) = element.attribute("id")
                        && parse_integer(id, GUI_SKIN_ID as i32) as u32 != screen_id
                    {
                        // A screen pinned to another display is skipped.
                        continue;
                    }
                    debug!("registering the screen '{name}' from '{document}'");
                    let entry = ScreenEntry {
                        element: Arc::new(element.clone()),
                        document: document.to_owned(),
                    };
                    self.screens.insert(name.to_owned(), entry);
                }
                "windowstyle" => {
                    let Some(id) = element.attribute("id") else {
                        continue;
                    };
                    let id = parse_integer(id, GUI_SKIN_ID as i32) as u32;
                    self.window_styles.insert(id, Arc::new(element));
                }
                _ => {}
            }
        }
    }

    pub fn screen(&self, name: &str) -> Option<&ScreenEntry> {
        self.screens.get(name)
    }

    pub fn constant_widget(&self, name: &str) -> Option<&Arc<Element>> {
        self.constant_widgets.get(name)
    }

    pub fn layout(&self, name: &str) -> Option<&Arc<Element>> {
        self.layouts.get(name)
    }

    pub fn window_style(&self, screen_id: u32) -> Option<&Arc<Element>> {
        self.window_styles.get(&screen_id)
    }

    pub fn colors(&self) -> &ColorTable {
        &self.colors
    }

    pub fn fonts(&self) -> &FontTable {
        &self.fonts
    }

    pub fn faces(&self) -> &HashSet<String> {
        &self.faces
    }

    pub fn parameter(&self, name: &str) -> Option<&[Parameter]> {
        self.parameters.get(name).map(Vec::as_slice)
    }

    /// Substitute a registered variable, leaving other values untouched.
    pub fn variable_or<'a>(&'a self, value: &'a str) -> &'a str {
        self.variables.get(value).map_or(value, String::as_str)
    }

    pub fn resolution(&self, screen_id: u32) -> Option<Resolution> {
        self.resolutions.get(&screen_id).copied()
    }

    pub fn menu_image(&self, key: &str) -> Option<&str> {
        self.menus.get(key).map(String::as_str)
    }

    pub fn setup_image(&self, key: &str) -> Option<&str> {
        self.setups.get(key).map(String::as_str)
    }

    pub fn margin(&self, screen_id: u32) -> Option<[i32; 4]> {
        self.margins.get(&screen_id).copied()
    }

    pub fn subtitle_styles(&self) -> &[Element] {
        &self.subtitles
    }

    /// Cell metrics of a font alias, backing `w`/`h` expression units.
    pub fn font_metrics(&self, name: &str) -> Option<FontMetrics> {
        self.fonts.get(name).map(FontAlias::metrics)
    }

    /// Collect the widget and source names a screen declares, descending
    /// into panels that reference other registered screens.
    pub fn find_widgets(&self, name: &str) -> HashSet<String> {
        let mut found = HashSet::new();
        let mut visited = HashSet::new();
        self.find_widgets_in(name, &mut found, &mut visited);
        found
    }

    fn find_widgets_in(
        &self,
        name: &str,
        found: &mut HashSet<String>,
        visited: &mut HashSet<String>,
    ) {
        if !visited.insert(name.to_owned()) {
            warn!("the screen '{name}' is part of a panel reference cycle");
            return;
        }
        let Some(entry) = self.screens.get(name) else {
            return;
        };
        let element = Arc::clone(&entry.element);
        collect_widget_names(&element, self, found, visited);
    }
}

fn collect_widget_names(
    element: &Element,
    registry: &SkinRegistry,
    found: &mut HashSet<String>,
    visited: &mut HashSet<String>,
) {
    for child in &element.children {
        match child.tag.as_str() {
            "widget" => {
                if let Some(name) = child.attribute("name").or_else(|| child.attribute("source")) {
                    found.insert(name.to_owned());
                }
            }
            "panel" => {
                if let Some(name) = child.attribute("name") {
                    registry.find_widgets_in(name, found, visited);
                }
                collect_widget_names(child, registry, found, visited);
            }
            _ => {}
        }
    }
}

fn attribute_integer(element: &Element, name: &str, default: i32) -> i32 {
    element
        .attribute(name)
        .map_or(default, |value| parse_integer(value, default))
}
