//! Typed value parsers for skin attribute strings.
//!
//! Every parser in this crate is total: invalid input logs an error and
//! yields the documented default for its type, it never fails past its own
//! boundary. Named colors and font aliases are looked up in tables owned by
//! the caller (the registry), passed in by reference.

#![forbid(unsafe_code)]

pub mod color;
pub mod font;
pub mod gradient;
pub mod options;
pub mod padding;
pub mod parameter;
pub mod radius;
pub mod scalar;

pub use color::{Argb, ColorTable, builtin_colors, parse_color, parse_color_or};
pub use font::{Font, FontAlias, FontTable, builtin_fonts, parse_font};
pub use gradient::{Gradient, GradientDirection, parse_gradient};
pub use options::{
    AlphaTest, HorizontalAlignment, Orientation, OrientationAxis, ScrollbarLength, ScrollbarMode,
    ScrollbarScroll, VerticalAlignment, Wrap, ZoomContent, parse_alpha_test,
    parse_horizontal_alignment, parse_options, parse_orientation, parse_scrollbar_length,
    parse_scrollbar_mode, parse_scrollbar_scroll, parse_vertical_alignment, parse_wrap, parse_zoom,
};
pub use padding::{Padding, parse_padding};
pub use parameter::{Parameter, parse_parameter, parse_parameters};
pub use radius::{Edges, Radius, parse_radius};
pub use scalar::{parse_boolean, parse_integer};
