use skin_layout::Rect;
use skin_registry::{GUI_SKIN_ID, NoIncludes, SkinRegistry};
use skin_resolver::{
    Components, Converter, ElementRegistry, NodeError, Renderer, ScreenResolver, Source, SourceRef,
};

const DESKTOP: Rect = Rect { x: 0, y: 0, width: 1280, height: 720 };

struct PlainRenderer {
    connected: Option<SourceRef>,
}

impl Renderer for PlainRenderer {
    fn type_name(&self) -> &str {
        "Label"
    }

    fn connect(&mut self, source: &SourceRef) {
        self.connected = Some(source.clone());
    }
}

struct PlainConverter {
    name: String,
    arguments: String,
}

impl Converter for PlainConverter {
    fn type_name(&self) -> &str {
        &self.name
    }

    fn arguments(&self) -> &str {
        &self.arguments
    }
}

fn elements() -> ElementRegistry {
    let mut elements = ElementRegistry::new();
    elements.register_renderer("Label", || Box::new(PlainRenderer { connected: None }));
    elements.register_converter("ClockToText", |arguments| {
        Box::new(PlainConverter { name: "ClockToText".into(), arguments: arguments.to_owned() })
    });
    elements
}

fn registry(xml: &str) -> SkinRegistry {
    let mut registry = SkinRegistry::new();
    registry.load("test.xml", xml, &NoIncludes, GUI_SKIN_ID).unwrap();
    registry
}

#[test]
fn converter_chains_dedup_by_type_and_arguments() {
    let _ = env_logger::builder().is_test(true).try_init();
    let registry = registry(
        r#"<skin>
            <screen name="Demo" position="0,0" size="400,300">
                <widget source="Time" render="Label" position="0,0" size="100,30">
                    <convert type="ClockToText">Format:%H:%M</convert>
                </widget>
                <widget source="Time" render="Label" position="0,30" size="100,30">
                    <convert type="ClockToText">Format:%H:%M</convert>
                </widget>
                <widget source="Time" render="Label" position="0,60" size="100,30">
                    <convert type="ClockToText">Date</convert>
                </widget>
            </screen>
        </skin>"#,
    );
    let elements = elements();
    let resolver = ScreenResolver::new(&registry, &elements, DESKTOP, GUI_SKIN_ID);
    let mut components = Components::new();
    components.add_source("Time", Source::new("Clock"));
    let resolved = resolver.resolve(&["Demo"], None, &components).unwrap();
    assert!(resolved.errors.is_empty());
    // Two distinct converter stages: the identical Format chain is shared.
    assert_eq!(resolved.converters.len(), 2);
    assert_eq!(resolved.converters[0].arguments, "Format:%H:%M");
    assert_eq!(resolved.converters[1].arguments, "Date");
    // The two identically converted widgets share one renderer, the Date
    // chain gets its own.
    assert_eq!(resolved.renderers.len(), 2);
    assert_eq!(resolved.renderers[0].source, SourceRef::Converter { index: 0 });
    assert_eq!(resolved.renderers[1].source, SourceRef::Converter { index: 1 });
}

#[test]
fn obsolete_sources_resolve_through_their_replacement() {
    let _ = env_logger::builder().is_test(true).try_init();
    let registry = registry(
        r#"<skin>
            <screen name="Demo" position="0,0" size="400,300">
                <widget source="OldClock" render="Label" position="0,0" size="100,30"/>
            </screen>
        </skin>"#,
    );
    let elements = elements();
    let resolver = ScreenResolver::new(&registry, &elements, DESKTOP, GUI_SKIN_ID);
    let mut components = Components::new();
    components.add_source("OldClock", Source::obsolete_alias("Time", Some("2027-01-01")));
    components.add_source("Time", Source::new("Clock"));
    let resolved = resolver.resolve(&["Demo"], None, &components).unwrap();
    assert!(resolved.errors.is_empty());
    assert_eq!(resolved.renderers.len(), 1);
    assert_eq!(
        resolved.renderers[0].source,
        SourceRef::Component { path: "Time".into() }
    );
}

#[test]
fn dotted_paths_reach_related_screens() {
    let _ = env_logger::builder().is_test(true).try_init();
    let registry = registry(
        r#"<skin>
            <screen name="Demo" position="0,0" size="400,300">
                <widget source="session.CurrentService" render="Label" position="0,0" size="100,30"/>
            </screen>
        </skin>"#,
    );
    let elements = elements();
    let resolver = ScreenResolver::new(&registry, &elements, DESKTOP, GUI_SKIN_ID);
    let mut components = Components::new();
    let mut session = Components::new();
    session.add_source("CurrentService", Source::new("ServiceEvent"));
    components.add_related("session", session);
    let resolved = resolver.resolve(&["Demo"], None, &components).unwrap();
    assert!(resolved.errors.is_empty());
    assert_eq!(
        resolved.renderers[0].source,
        SourceRef::Component { path: "session.CurrentService".into() }
    );
}

#[test]
fn missing_pieces_degrade_per_node() {
    let _ = env_logger::builder().is_test(true).try_init();
    let registry = registry(
        r#"<skin>
            <screen name="Demo" position="0,0" size="400,300">
                <widget source="Nothing" render="Label" position="0,0" size="100,30"/>
                <widget source="Time" position="0,30" size="100,30"/>
                <widget source="Time" render="Unregistered" position="0,60" size="100,30"/>
                <widget position="0,90" size="100,30"/>
                <widget name="ok" position="0,120" size="100,30"/>
            </screen>
        </skin>"#,
    );
    let elements = elements();
    let resolver = ScreenResolver::new(&registry, &elements, DESKTOP, GUI_SKIN_ID);
    let mut components = Components::new();
    components.add_source("Time", Source::new("Clock"));
    components.add_widget("ok", "Label");
    let resolved = resolver.resolve(&["Demo"], None, &components).unwrap();
    let errors: Vec<&NodeError> =
        resolved.errors.iter().map(|failure| &failure.error).collect();
    assert!(matches!(errors[0], NodeError::UnknownSource { path, .. } if path == "Nothing"));
    assert!(matches!(errors[1], NodeError::MissingRenderer { path } if path == "Time"));
    assert!(matches!(
        errors[2],
        NodeError::UnknownRenderer { name } if name == "Unregistered"
    ));
    assert!(matches!(errors[3], NodeError::WidgetWithoutBinding));
    // The healthy widget still resolved.
    assert_eq!(resolved.bindings.len(), 1);
}
