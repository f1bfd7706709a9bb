//! The live component collection a screen resolves against.
//!
//! The embedding application describes its instantiated screen here: which
//! named widgets exist (and must be bound), which data sources are exposed,
//! and which related screens (parent, global, session) source paths may
//! reach through.

use std::collections::{HashMap, HashSet};

/// Migration data for a source kept only as an alias of its successor.
#[derive(Clone, Debug)]
pub struct Obsolete {
    pub replacement: String,
    pub removal_date: Option<String>,
    pub description: Option<String>,
}

/// One data source, possibly with named sub-sources.
#[derive(Clone, Debug, Default)]
pub struct Source {
    pub type_name: String,
    pub obsolete: Option<Obsolete>,
    children: HashMap<String, Source>,
}

impl Source {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self { type_name: type_name.into(), ..Self::default() }
    }

    pub fn obsolete_alias(replacement: impl Into<String>, removal_date: Option<&str>) -> Self {
        Self {
            type_name: String::new(),
            obsolete: Some(Obsolete {
                replacement: replacement.into(),
                removal_date: removal_date.map(str::to_owned),
                description: None,
            }),
            children: HashMap::new(),
        }
    }

    pub fn with_child(mut self, name: impl Into<String>, child: Source) -> Self {
        self.children.insert(name.into(), child);
        self
    }

    pub fn child(&self, name: &str) -> Option<&Source> {
        self.children.get(name)
    }
}

#[derive(Clone, Debug)]
pub enum Component {
    /// A named GUI widget. Bindable widgets must be bound by a successful
    /// pass; passive ones may stay unbound.
    Widget { type_name: String, bindable: bool },
    Source(Source),
}

/// Every named component of one live screen.
#[derive(Clone, Debug, Default)]
pub struct Components {
    components: HashMap<String, Component>,
    related: HashMap<String, Components>,
    mandatory: Option<HashSet<String>>,
}

impl Components {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_widget(&mut self, name: impl Into<String>, type_name: impl Into<String>) {
        self.components.insert(
            name.into(),
            Component::Widget { type_name: type_name.into(), bindable: true },
        );
    }

    /// A widget the completeness check ignores.
    pub fn add_passive_widget(&mut self, name: impl Into<String>, type_name: impl Into<String>) {
        self.components.insert(
            name.into(),
            Component::Widget { type_name: type_name.into(), bindable: false },
        );
    }

    pub fn add_source(&mut self, name: impl Into<String>, source: Source) {
        self.components.insert(name.into(), Component::Source(source));
    }

    pub fn add_related(&mut self, name: impl Into<String>, related: Components) {
        self.related.insert(name.into(), related);
    }

    /// Restrict document selection to candidates declaring all these
    /// widgets. Without a mandatory set, the first registered candidate
    /// wins.
    pub fn set_mandatory<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.mandatory = Some(names.into_iter().map(Into::into).collect());
    }

    pub fn mandatory(&self) -> Option<&HashSet<String>> {
        self.mandatory.as_ref()
    }

    /// Whether any component (widget or source) has this name. Conditional
    /// gating tests against this.
    pub fn contains(&self, name: &str) -> bool {
        self.components.contains_key(name)
    }

    /// The runtime type name of a component, for `objectTypes` gating.
    pub fn type_name(&self, name: &str) -> Option<&str> {
        self.components.get(name).map(|component| match component {
            Component::Widget { type_name, .. } => type_name.as_str(),
            Component::Source(source) => source.type_name.as_str(),
        })
    }

    pub fn is_bindable_widget(&self, name: &str) -> bool {
        matches!(self.components.get(name), Some(Component::Widget { bindable: true, .. }))
    }

    /// Names the completeness check requires to be bound.
    pub fn bindable_names(&self) -> impl Iterator<Item = &str> {
        self.components.iter().filter_map(|(name, component)| match component {
            Component::Widget { bindable: true, .. } => Some(name.as_str()),
            _ => None,
        })
    }

    /// Resolve a dotted source path. Leading segments name related screens
    /// while one of that name exists; segments after the source itself
    /// descend into sub-sources.
    pub fn source(&self, path: &str) -> Option<&Source> {
        let mut scope = self;
        let mut segments = path.split('.').peekable();
        while let Some(&segment) = segments.peek() {
            match scope.related.get(segment) {
                Some(related) => {
                    scope = related;
                    segments.next();
                }
                None => break,
            }
        }
        let name = segments.next()?;
        let mut source = match scope.components.get(name)? {
            Component::Source(source) => source,
            Component::Widget { .. } => return None,
        };
        for segment in segments {
            source = source.child(segment)?;
        }
        Some(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Components {
        let mut components = Components::new();
        components.add_widget("list", "MenuList");
        components.add_source("Event", Source::new("EventInfo"));
        let mut global = Components::new();
        global.add_source(
            "CurrentTime",
            Source::new("Clock").with_child("Formatted", Source::new("ClockToText")),
        );
        components.add_related("global", global);
        components
    }

    #[test]
    fn plain_source_lookup() {
        let components = session();
        assert_eq!(components.source("Event").unwrap().type_name, "EventInfo");
        assert!(components.source("list").is_none());
        assert!(components.source("Nothing").is_none());
    }

    #[test]
    fn dotted_paths_reach_related_screens_and_sub_sources() {
        let components = session();
        assert_eq!(components.source("global.CurrentTime").unwrap().type_name, "Clock");
        assert_eq!(
            components.source("global.CurrentTime.Formatted").unwrap().type_name,
            "ClockToText"
        );
        assert!(components.source("global.Missing").is_none());
    }

    #[test]
    fn only_bindable_widgets_count_for_completeness() {
        let mut components = session();
        components.add_passive_widget("decoration", "Pixmap");
        let names: Vec<&str> = components.bindable_names().collect();
        assert_eq!(names, ["list"]);
        assert!(components.contains("decoration"));
    }

    #[test]
    fn type_names_back_object_type_gating() {
        let components = session();
        assert_eq!(components.type_name("list"), Some("MenuList"));
        assert_eq!(components.type_name("Event"), Some("EventInfo"));
    }
}
