use skin_registry::{GUI_SKIN_ID, NoIncludes, SkinRegistry};

const BASE: &str = r##"<skin>
    <output id="0"><resolution xres="1920" yres="1080" bpp="32"/></output>
    <colors><color name="accent" value="#00336699"/></colors>
    <fonts><alias name="Heading" font="Regular" size="30" height="36" width="24"/></fonts>
    <parameters><parameter name="Spacing" value="2,4"/></parameters>
    <constant-widgets>
        <constant-widget name="clock">
            <widget source="global.CurrentTime" render="Label" position="0,0" size="80,30"/>
        </constant-widget>
    </constant-widgets>
    <screen name="Menu" position="center,center" size="500,400">
        <widget name="menu" position="10,10" size="480,380"/>
        <panel name="MenuSidebar" position="right" size="100,0"/>
    </screen>
    <screen name="MenuSidebar">
        <widget source="session.Clock" render="Label" position="0,0" size="100,30"/>
    </screen>
</skin>"##;

const OVERLAY: &str = r##"<skin>
    <colors><color name="accent" value="#00996633"/></colors>
    <screen name="Menu" position="0,0" size="600,500">
        <widget name="menu" position="0,0" size="600,500"/>
    </screen>
</skin>"##;

fn load_all(registry: &mut SkinRegistry) {
    registry.load("base.xml", BASE, &NoIncludes, GUI_SKIN_ID).unwrap();
    registry.load("overlay.xml", OVERLAY, &NoIncludes, GUI_SKIN_ID).unwrap();
}

#[test]
fn reload_matches_a_fresh_load() {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut reloaded = SkinRegistry::new();
    load_all(&mut reloaded);
    reloaded.reset();
    load_all(&mut reloaded);

    let mut fresh = SkinRegistry::new();
    load_all(&mut fresh);

    assert_eq!(reloaded.colors(), fresh.colors());
    assert_eq!(reloaded.fonts(), fresh.fonts());
    assert_eq!(reloaded.resolution(GUI_SKIN_ID), fresh.resolution(GUI_SKIN_ID));
    assert_eq!(
        reloaded.screen("Menu").map(|entry| entry.element.as_ref()),
        fresh.screen("Menu").map(|entry| entry.element.as_ref())
    );
    assert_eq!(
        reloaded.constant_widget("clock").map(AsRef::as_ref),
        fresh.constant_widget("clock").map(AsRef::as_ref)
    );
}

#[test]
fn reset_restores_the_builtin_seeds() {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut registry = SkinRegistry::new();
    load_all(&mut registry);
    registry.reset();
    assert!(registry.screen("Menu").is_none());
    assert!(registry.colors().get("accent").is_none());
    assert!(registry.colors().contains_key("key_text"));
    assert!(registry.fonts().contains_key("Body"));
    assert!(registry.resolution(GUI_SKIN_ID).is_none());
}

#[test]
fn later_documents_win() {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut registry = SkinRegistry::new();
    load_all(&mut registry);
    let entry = registry.screen("Menu").unwrap();
    assert_eq!(entry.document, "overlay.xml");
    assert_eq!(entry.element.attribute("size"), Some("600,500"));
    assert_eq!(
        registry.colors().get("accent").map(|color| color.argb()),
        Some(0x0099_6633)
    );
}

#[test]
fn find_widgets_descends_panels() {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut registry = SkinRegistry::new();
    registry.load("base.xml", BASE, &NoIncludes, GUI_SKIN_ID).unwrap();
    let widgets = registry.find_widgets("Menu");
    assert!(widgets.contains("menu"));
    assert!(widgets.contains("session.Clock"));
}

struct OneInclude;

impl skin_registry::IncludeLoader for OneInclude {
    fn load(&self, filename: &str) -> anyhow::Result<String> {
        match filename {
            "extra.xml" => Ok(
                r##"<skin><colors><color name="extra" value="#00111111"/></colors></skin>"##
                    .to_owned(),
            ),
            other => anyhow::bail!("no document named '{other}'"),
        }
    }
}

#[test]
fn includes_load_through_the_callback() {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut registry = SkinRegistry::new();
    registry
        .load(
            "base.xml",
            r#"<skin><include filename="extra.xml"/></skin>"#,
            &OneInclude,
            GUI_SKIN_ID,
        )
        .unwrap();
    assert!(registry.colors().contains_key("extra"));
}

struct SelfInclude;

impl skin_registry::IncludeLoader for SelfInclude {
    fn load(&self, _filename: &str) -> anyhow::Result<String> {
        Ok(
            r##"<skin><include filename="cycle.xml"/><colors><color name="looped" value="#00334455"/></colors></skin>"##
                .to_owned(),
        )
    }
}

#[test]
fn cyclic_includes_stop_at_the_nesting_limit() {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut registry = SkinRegistry::new();
    let result = registry.load(
        "base.xml",
        r##"<skin><include filename="cycle.xml"/></skin>"##,
        &SelfInclude,
        GUI_SKIN_ID,
    );
    assert!(result.is_ok());
    assert!(registry.colors().contains_key("looped"));
}

#[test]
fn missing_includes_degrade_to_a_log() {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut registry = SkinRegistry::new();
    let result = registry.load(
        "base.xml",
        r##"<skin><include filename="gone.xml"/><colors><color name="kept" value="#00222222"/></colors></skin>"##,
        &OneInclude,
        GUI_SKIN_ID,
    );
    assert!(result.is_ok());
    assert!(registry.colors().contains_key("kept"));
}
