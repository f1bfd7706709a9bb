use skin_layout::Rect;
use skin_registry::{GUI_SKIN_ID, NoIncludes, SkinRegistry};
use skin_resolver::{Attribute, Components, ElementRegistry, NodeError, ScreenResolver};

const DESKTOP: Rect = Rect { x: 0, y: 0, width: 1280, height: 720 };

fn registry(xml: &str) -> SkinRegistry {
    let mut registry = SkinRegistry::new();
    registry.load("test.xml", xml, &NoIncludes, GUI_SKIN_ID).unwrap();
    registry
}

fn resolve(xml: &str, components: &Components) -> skin_resolver::ResolvedScreen {
    let registry = registry(xml);
    let elements = ElementRegistry::new();
    let resolver = ScreenResolver::new(&registry, &elements, DESKTOP, GUI_SKIN_ID);
    resolver.resolve(&["Demo"], None, components).unwrap()
}

#[test]
fn conditional_nodes_need_a_live_component() {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut components = Components::new();
    components.add_widget("present", "Label");
    let resolved = resolve(
        r#"<skin>
            <screen name="Demo" position="0,0" size="400,300">
                <widget name="present" conditional="present" position="0,0" size="100,30"/>
                <eLabel conditional="absent" position="0,30" size="100,30"/>
                <eLabel includes="present" position="0,60" size="100,30"/>
                <eLabel excludes="present" position="0,90" size="100,30"/>
            </screen>
        </skin>"#,
        &components,
    );
    assert!(resolved.errors.is_empty());
    assert_eq!(resolved.bindings.len(), 1);
    // Only the includes label survives its gate.
    assert_eq!(resolved.additional.len(), 1);
}

#[test]
fn object_types_match_the_component_runtime_type() {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut components = Components::new();
    components.add_widget("list", "MenuList");
    let resolved = resolve(
        r#"<skin>
            <screen name="Demo" position="0,0" size="400,300">
                <eLabel objectTypes="list,MenuList,ServiceList" position="0,0" size="100,30"/>
                <eLabel objectTypes="list,ConfigList" position="0,30" size="100,30"/>
                <eLabel objectTypes="missing,MenuList" position="0,60" size="100,30"/>
                <widget name="list" position="0,90" size="100,30"/>
            </screen>
        </skin>"#,
        &components,
    );
    assert_eq!(resolved.additional.len(), 1);
}

#[test]
fn panels_carve_nested_contexts() {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut components = Components::new();
    components.add_widget("inside", "Label");
    let resolved = resolve(
        r#"<skin>
            <screen name="Demo" position="0,0" size="400,300">
                <panel position="top" size="0,100">
                    <widget name="inside" position="10,10" size="50,50"/>
                </panel>
                <eRectangle position="fill" size="0,0"/>
            </screen>
        </skin>"#,
        &components,
    );
    assert!(resolved.errors.is_empty());
    let attributes = &resolved.bindings[0].attributes;
    assert!(attributes.contains(&Attribute::Position(skin_layout::Point { x: 10, y: 10 })));
    // The panel consumed the top strip, fill takes what remains.
    let rest = &resolved.additional[0].attributes;
    assert!(rest.contains(&Attribute::Position(skin_layout::Point { x: 0, y: 100 })));
    assert!(rest.contains(&Attribute::Size(skin_layout::Size { width: 400, height: 200 })));
}

#[test]
fn stacking_panels_leave_the_region_for_siblings() {
    let _ = env_logger::builder().is_test(true).try_init();
    let resolved = resolve(
        r#"<skin>
            <screen name="Demo" position="0,0" size="400,300">
                <panel layout="stack" position="top" size="0,100">
                    <eLabel position="fill" size="0,0"/>
                    <eLabel position="fill" size="0,0"/>
                </panel>
                <eRectangle position="fill" size="0,0"/>
            </screen>
        </skin>"#,
        &Components::new(),
    );
    // Both stacked labels cover the whole panel strip.
    assert_eq!(resolved.additional.len(), 3);
    for label in &resolved.additional[..2] {
        assert!(label
            .attributes
            .contains(&Attribute::Size(skin_layout::Size { width: 400, height: 100 })));
    }
    // The panel itself was docked sequentially from the screen region.
    assert!(resolved.additional[2]
        .attributes
        .contains(&Attribute::Position(skin_layout::Point { x: 0, y: 100 })));
}

#[test]
fn named_panels_splice_the_referenced_screen() {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut components = Components::new();
    components.add_widget("shared", "Label");
    let resolved = resolve(
        r#"<skin>
            <screen name="Toolbar">
                <widget name="shared" position="0,0" size="400,40"/>
            </screen>
            <screen name="Demo" position="0,0" size="400,300">
                <panel name="Toolbar" position="0,0" size="400,40"/>
            </screen>
        </skin>"#,
        &components,
    );
    assert!(resolved.errors.is_empty());
    assert_eq!(resolved.bindings.len(), 1);
    assert_eq!(resolved.bindings[0].name, "shared");
}

#[test]
fn missing_panel_screens_degrade() {
    let _ = env_logger::builder().is_test(true).try_init();
    let resolved = resolve(
        r#"<skin>
            <screen name="Demo" position="0,0" size="400,300">
                <panel name="Nowhere" position="0,0" size="400,40"/>
            </screen>
        </skin>"#,
        &Components::new(),
    );
    assert_eq!(
        resolved.errors[0].error,
        NodeError::MissingPanelScreen { name: "Nowhere".into() }
    );
}
