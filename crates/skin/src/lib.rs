//! Skin layout engine.
//!
//! Declarative skin documents describe screens symbolically; this crate
//! resolves them, at load time, into concrete pixel geometry, fonts, colors
//! and widget attribute lists. The pieces, leaves first:
//!
//! - [`skin_expr`]: one-dimensional coordinate expression evaluation.
//! - [`skin_values`]: typed parsers for attribute value strings.
//! - [`skin_layout`]: docking layout contexts over rectangular regions.
//! - [`skin_document`]: the XML reader producing plain element trees.
//! - [`skin_registry`]: the process-wide store documents load into.
//! - [`skin_resolver`]: the resolution pass binding declared widgets to
//!   live components.
//!
//! A minimal embedding loads documents into a [`SkinRegistry`], registers
//! renderer and converter factories in an [`ElementRegistry`], then asks a
//! [`ScreenResolver`] for a [`ResolvedScreen`] per screen instantiation and
//! applies the produced attribute lists through [`WidgetHandle`].

#![forbid(unsafe_code)]

pub use skin_document::{DocumentError, Element, parse_document};
pub use skin_expr::{BODY_METRICS, EvalError, FontMetrics, Scale, evaluate};
pub use skin_layout::{ContextKind, LayoutContext, Point, Rect, ScalePair, Size};
pub use skin_registry::{
    GUI_SKIN_ID, IncludeLoader, LoadError, NoIncludes, Resolution, ScreenEntry, SkinRegistry,
};
pub use skin_resolver::{
    AdditionalKind, AdditionalWidget, Applet, Attribute, AttributeList, Binding, Component,
    Components, Converter, ConverterStage, ElementRegistry, NodeError, NodeFailure, Obsolete,
    Renderer, RendererBinding, ResolveError, ResolvedScreen, ScreenResolver, Source, SourceRef,
    WidgetHandle, WindowFlags, apply_attributes, skin_factor,
};
pub use skin_values::{
    AlphaTest, Argb, ColorTable, Edges, Font, FontAlias, FontTable, Gradient, GradientDirection,
    HorizontalAlignment, Orientation, OrientationAxis, Padding, Parameter, Radius,
    ScrollbarLength, ScrollbarMode, ScrollbarScroll, VerticalAlignment, Wrap, ZoomContent,
    builtin_colors, builtin_fonts, parse_color, parse_color_or, parse_font, parse_gradient,
    parse_padding, parse_parameter, parse_parameters, parse_radius,
};
