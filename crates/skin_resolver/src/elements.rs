//! Renderer and converter factories.
//!
//! Documents name renderers and converters symbolically; the application
//! registers a factory per name at startup. Resolution instantiates through
//! the registry, never through any runtime class lookup.

use std::collections::HashMap;

/// What a renderer or converter reads from: a live component source
/// (by its document path) or a previously built converter stage of the
/// same pass.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum SourceRef {
    Component { path: String },
    Converter { index: usize },
}

/// A display element producing output from a connected source.
pub trait Renderer {
    fn type_name(&self) -> &str;
    fn connect(&mut self, source: &SourceRef);
}

/// One transformation stage between a source and a renderer.
pub trait Converter {
    fn type_name(&self) -> &str;
    /// The argument text the stage was built with, part of its dedup
    /// identity.
    fn arguments(&self) -> &str;
}

type RendererFactory = Box<dyn Fn() -> Box<dyn Renderer>>;
type ConverterFactory = Box<dyn Fn(&str) -> Box<dyn Converter>>;

/// Named factories for everything a `render=` or `convert` reference may
/// name.
#[derive(Default)]
pub struct ElementRegistry {
    renderers: HashMap<String, RendererFactory>,
    converters: HashMap<String, ConverterFactory>,
}

impl ElementRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_renderer(
        &mut self,
        name: impl Into<String>,
        factory: impl Fn() -> Box<dyn Renderer> + 'static,
    ) {
        self.renderers.insert(name.into(), Box::new(factory));
    }

    pub fn register_converter(
        &mut self,
        name: impl Into<String>,
        factory: impl Fn(&str) -> Box<dyn Converter> + 'static,
    ) {
        self.converters.insert(name.into(), Box::new(factory));
    }

    pub fn renderer(&self, name: &str) -> Option<Box<dyn Renderer>> {
        self.renderers.get(name).map(|factory| factory())
    }

    pub fn converter(&self, name: &str, arguments: &str) -> Option<Box<dyn Converter>> {
        self.converters.get(name).map(|factory| factory(arguments))
    }
}
