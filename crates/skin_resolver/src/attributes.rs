//! Widget attribute collection.
//!
//! Raw attribute strings become one closed [`Attribute`] sum type here.
//! Collection keeps document order but moves `position` and `size` to the
//! end (position first): window flags and scrollbar settings must reach the
//! widget before its geometry for the toolkit to compute dimensions
//! correctly.

use crate::error::NodeError;
use bitflags::bitflags;
use log::error;
use once_cell::sync::Lazy;
use skin_document::Element;
use skin_expr::{FontMetrics, evaluate};
use skin_layout::{LayoutContext, Point, Size};
use skin_registry::SkinRegistry;
use skin_values::{
    AlphaTest, Argb, Font, Gradient, HorizontalAlignment, Orientation, Padding, Radius,
    ScrollbarLength, ScrollbarMode, ScrollbarScroll, VerticalAlignment, Wrap, ZoomContent,
    parse_alpha_test, parse_boolean, parse_color_or, parse_font, parse_gradient,
    parse_horizontal_alignment, parse_integer, parse_orientation, parse_padding, parse_radius,
    parse_scrollbar_length, parse_scrollbar_mode, parse_scrollbar_scroll,
    parse_vertical_alignment, parse_wrap, parse_zoom,
};
use std::collections::HashSet;

bitflags! {
    /// Window flags set before the window gets its size.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct WindowFlags: u8 {
        const NO_BORDER = 1;
        const RESIZE = 1 << 1;
        const TITLE = 1 << 2;
    }
}

/// One resolved widget attribute.
#[derive(Clone, Debug, PartialEq)]
pub enum Attribute {
    Position(Point),
    Size(Size),
    Font(Font),
    ValueFont(Font),
    EntryFont(Font),
    Text(String),
    Title(String),
    BackgroundColor(Argb),
    BackgroundColorSelected(Argb),
    ForegroundColor(Argb),
    ForegroundColorSelected(Argb),
    BorderColor(Argb),
    BorderWidth(i32),
    ShadowColor(Argb),
    ShadowOffset(Point),
    SpacingColor(Argb),
    TextBorderColor(Argb),
    TextBorderWidth(i32),
    BackgroundGradient(Gradient),
    ForegroundGradient(Gradient),
    ItemGradient(Gradient),
    ItemGradientSelected(Gradient),
    Padding(Padding),
    TextPadding(Padding),
    ZPosition(i32),
    Transparent(bool),
    Flags(WindowFlags),
    Pixmap(String),
    BackgroundPixmap(String),
    SelectionPixmap(String),
    AlphaTest(AlphaTest),
    CornerRadius(Radius),
    ItemCornerRadius(Radius),
    ItemHeight(i32),
    ItemWidth(i32),
    ItemSpacing(Point),
    ScrollbarMode(ScrollbarMode),
    ScrollbarScroll(ScrollbarScroll),
    ScrollbarLength(ScrollbarLength),
    ScrollbarWidth(i32),
    ScrollbarOffset(i32),
    ScrollbarBorderWidth(i32),
    ScrollbarBorderColor(Argb),
    ScrollbarBackgroundColor(Argb),
    ScrollbarForegroundColor(Argb),
    ScrollbarBackgroundGradient(Gradient),
    ScrollbarForegroundGradient(Gradient),
    ScrollbarBackgroundPixmap(String),
    ScrollbarForegroundPixmap(String),
    ScrollbarRadius(Radius),
    Selection(bool),
    SelectionZoom { zoom: f64, mode: ZoomContent },
    SelectionZoomSize { width: i32, height: i32, mode: ZoomContent },
    EnableWrapAround(bool),
    HorizontalAlignment(HorizontalAlignment),
    VerticalAlignment(VerticalAlignment),
    Wrap(Wrap),
    Orientation(Orientation),
}

/// The attributes resolved for exactly one widget or renderer, in apply
/// order.
pub type AttributeList = Vec<Attribute>;

/// The apply seam to the toolkit: one call per resolved attribute.
pub trait WidgetHandle {
    fn apply(&mut self, attribute: &Attribute);
}

pub fn apply_attributes(handle: &mut dyn WidgetHandle, attributes: &AttributeList) {
    for attribute in attributes {
        handle.apply(attribute);
    }
}

/// Attribute names carrying file references. Path resolution lives with
/// the embedding application, the values pass through raw.
static FILENAME_VALUED: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    HashSet::from([
        "pixmap",
        "backgroundPixmap",
        "selectionPixmap",
        "scrollbarBackgroundPixmap",
        "scrollbarForegroundPixmap",
    ])
});

/// Names that gate node processing rather than style a widget. They are
/// consumed by the walk and skipped here.
static GATING: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    HashSet::from(["conditional", "includes", "excludes", "objectTypes", "resolution", "id"])
});

/// Collect one node's attributes against the current layout context.
///
/// Failures (unknown names) are pushed to `errors`; the remaining
/// attributes of the node still resolve.
pub fn collect_attributes(
    element: &Element,
    context: &mut LayoutContext,
    registry: &SkinRegistry,
    ignore: &[&str],
    errors: &mut Vec<NodeError>,
) -> AttributeList {
    let mut attributes = AttributeList::new();
    let mut position = None;
    let mut size = None;
    let mut font = None;
    for (name, value) in &element.attributes {
        let name = name.as_str();
        if ignore.contains(&name) || GATING.contains(name) {
            continue;
        }
        match name {
            "position" => position = Some(registry.variable_or(value)),
            "size" => size = Some(registry.variable_or(value)),
            "font" => {
                font = font_metrics(value, registry);
                attributes.push(Attribute::Font(font_of(value, context, registry)));
            }
            _ => match parse_attribute(name, value, context, registry) {
                Ok(attribute) => attributes.push(attribute),
                Err(error) => errors.push(error),
            },
        }
    }
    if let Some(position) = position {
        let (point, extent) = context.dock(position, size.unwrap_or(""), font);
        attributes.push(Attribute::Position(point));
        if size.is_some() {
            attributes.push(Attribute::Size(extent));
        }
    } else if let Some(size) = size {
        // Size without a position still resolves, against the remaining
        // region without docking.
        let (width, height) = match size.split_once(',') {
            Some((width, height)) => (width, height),
            None => (size, ""),
        };
        attributes.push(Attribute::Size(Size {
            width: horizontal(width, context, font),
            height: vertical(height, context, font),
        }));
    }
    attributes
}

fn parse_attribute(
    name: &str,
    value: &str,
    context: &LayoutContext,
    registry: &SkinRegistry,
) -> Result<Attribute, NodeError> {
    if FILENAME_VALUED.contains(name) {
        return Ok(match name {
            "pixmap" => Attribute::Pixmap(value.to_owned()),
            "backgroundPixmap" => Attribute::BackgroundPixmap(value.to_owned()),
            "selectionPixmap" => Attribute::SelectionPixmap(value.to_owned()),
            "scrollbarBackgroundPixmap" => Attribute::ScrollbarBackgroundPixmap(value.to_owned()),
            _ => Attribute::ScrollbarForegroundPixmap(value.to_owned()),
        });
    }
    let color = |default| parse_color_or(value, registry.colors(), default);
    let gradient = || parse_gradient(value, registry.colors());
    Ok(match name {
        "valueFont" | "secondFont" => Attribute::ValueFont(font_of(value, context, registry)),
        "entryFont" => Attribute::EntryFont(font_of(value, context, registry)),
        "text" => Attribute::Text(value.to_owned()),
        "title" => Attribute::Title(value.to_owned()),
        "backgroundColor" => Attribute::BackgroundColor(color(Argb::BLACK)),
        "backgroundColorSelected" => Attribute::BackgroundColorSelected(color(Argb::BLACK)),
        "foregroundColor" => Attribute::ForegroundColor(color(Argb::WHITE)),
        "foregroundColorSelected" => Attribute::ForegroundColorSelected(color(Argb::WHITE)),
        "borderColor" => Attribute::BorderColor(color(Argb::WHITE)),
        "borderWidth" => Attribute::BorderWidth(vertical_units(value, context)),
        "shadowColor" => Attribute::ShadowColor(color(Argb::BLACK)),
        "shadowOffset" => Attribute::ShadowOffset(point_of(value, context)),
        "spacingColor" => Attribute::SpacingColor(color(Argb::BLACK)),
        "textBorderColor" => Attribute::TextBorderColor(color(Argb::WHITE)),
        "textBorderWidth" => Attribute::TextBorderWidth(vertical_units(value, context)),
        "backgroundGradient" => Attribute::BackgroundGradient(gradient()),
        "foregroundGradient" => Attribute::ForegroundGradient(gradient()),
        "itemGradient" => Attribute::ItemGradient(gradient()),
        "itemGradientSelected" => Attribute::ItemGradientSelected(gradient()),
        "padding" => Attribute::Padding(scaled_padding(name, value, context, registry)),
        "textPadding" | "textOffset" => {
            Attribute::TextPadding(scaled_padding("textPadding", value, context, registry))
        }
        "zPosition" => Attribute::ZPosition(parse_integer(value, 0)),
        "transparent" => Attribute::Transparent(parse_boolean("transparent", value)),
        "flags" => Attribute::Flags(parse_flags(registry.variable_or(value))),
        "alphaTest" | "alphatest" => Attribute::AlphaTest(parse_alpha_test(value)),
        "cornerRadius" => Attribute::CornerRadius(parse_radius(value)),
        "itemCornerRadius" => Attribute::ItemCornerRadius(parse_radius(value)),
        "itemHeight" => Attribute::ItemHeight(vertical_units(value, context)),
        "itemWidth" => Attribute::ItemWidth(horizontal_units(value, context)),
        "itemSpacing" => Attribute::ItemSpacing(spacing_of(registry.variable_or(value), context)),
        "scrollbarMode" => Attribute::ScrollbarMode(parse_scrollbar_mode(value)),
        "scrollbarScroll" => Attribute::ScrollbarScroll(parse_scrollbar_scroll(value)),
        "scrollbarLength" => {
            Attribute::ScrollbarLength(parse_scrollbar_length(value, ScrollbarLength::Pixels(0)))
        }
        "scrollbarWidth" => Attribute::ScrollbarWidth(horizontal_units(value, context)),
        "scrollbarOffset" => Attribute::ScrollbarOffset(parse_integer(value, 0)),
        "scrollbarBorderWidth" => Attribute::ScrollbarBorderWidth(horizontal_units(value, context)),
        "scrollbarBorderColor" => Attribute::ScrollbarBorderColor(color(Argb::WHITE)),
        "scrollbarBackgroundColor" => Attribute::ScrollbarBackgroundColor(color(Argb::BLACK)),
        "scrollbarForegroundColor" => Attribute::ScrollbarForegroundColor(color(Argb::WHITE)),
        "scrollbarBackgroundGradient" => Attribute::ScrollbarBackgroundGradient(gradient()),
        "scrollbarForegroundGradient" => Attribute::ScrollbarForegroundGradient(gradient()),
        "scrollbarRadius" => Attribute::ScrollbarRadius(parse_radius(value)),
        "selection" => Attribute::Selection(parse_boolean("selection", value)),
        "selectionZoom" => selection_zoom(value),
        "selectionZoomSize" => selection_zoom_size(value, context),
        "enableWrapAround" => {
            Attribute::EnableWrapAround(parse_boolean("enablewraparound", value))
        }
        "horizontalAlignment" | "hAlign" | "halign" => {
            Attribute::HorizontalAlignment(parse_horizontal_alignment(value))
        }
        "verticalAlignment" | "vAlign" | "valign" => {
            Attribute::VerticalAlignment(parse_vertical_alignment(value))
        }
        "wrap" => Attribute::Wrap(parse_wrap(value)),
        "noWrap" => Attribute::Wrap(if parse_boolean("noWrap", value) {
            Wrap::NoWrap
        } else {
            Wrap::Wrap
        }),
        "orientation" => Attribute::Orientation(parse_orientation(value)),
        _ => return Err(NodeError::UnknownAttribute { name: name.to_owned() }),
    })
}

fn font_of(value: &str, context: &LayoutContext, registry: &SkinRegistry) -> Font {
    parse_font(
        value,
        registry.fonts(),
        registry.faces(),
        context.scale.vertical,
        context.factor,
    )
}

/// Metrics backing `w`/`h` units in this node's geometry expressions.
fn font_metrics(value: &str, registry: &SkinRegistry) -> Option<FontMetrics> {
    let name = value.split(';').next().unwrap_or(value).trim();
    registry.font_metrics(name)
}

fn horizontal(expr: &str, context: &LayoutContext, font: Option<FontMetrics>) -> i32 {
    evaluate(expr, context.width, 0, font, context.scale.horizontal, context.factor).unwrap_or(0)
}

fn vertical(expr: &str, context: &LayoutContext, font: Option<FontMetrics>) -> i32 {
    evaluate(expr, context.height, 0, font, context.scale.vertical, context.factor).unwrap_or(0)
}

fn horizontal_units(value: &str, context: &LayoutContext) -> i32 {
    context.scale.horizontal.apply(i64::from(parse_integer(value, 0))) as i32
}

fn vertical_units(value: &str, context: &LayoutContext) -> i32 {
    context.scale.vertical.apply(i64::from(parse_integer(value, 0))) as i32
}

/// An offset pair with no parent to resolve against, like `shadowOffset`.
fn point_of(value: &str, context: &LayoutContext) -> Point {
    let (x, y) = match value.split_once(',') {
        Some((x, y)) => (x, y),
        None => (value, ""),
    };
    Point {
        x: evaluate(x, 0, 0, None, context.scale.horizontal, context.factor).unwrap_or(0),
        y: evaluate(y, 0, 0, None, context.scale.vertical, context.factor).unwrap_or(0),
    }
}

/// `itemSpacing` broadcasts a single value to both axes.
fn spacing_of(value: &str, context: &LayoutContext) -> Point {
    match value.split_once(',') {
        Some(_) => point_of(value, context),
        None => point_of(&format!("{value},{value}"), context),
    }
}

fn scaled_padding(
    attribute: &str,
    value: &str,
    context: &LayoutContext,
    registry: &SkinRegistry,
) -> Padding {
    let [left, top, right, bottom] = parse_padding(attribute, registry.variable_or(value));
    [
        context.scale.horizontal.apply(i64::from(left)) as i32,
        context.scale.vertical.apply(i64::from(top)) as i32,
        context.scale.horizontal.apply(i64::from(right)) as i32,
        context.scale.vertical.apply(i64::from(bottom)) as i32,
    ]
}

fn parse_flags(value: &str) -> WindowFlags {
    let mut flags = WindowFlags::empty();
    for flag in value.split(',').map(str::trim) {
        match flag {
            "wfNoBorder" => flags |= WindowFlags::NO_BORDER,
            "wfResize" => flags |= WindowFlags::RESIZE,
            "wfTitle" => flags |= WindowFlags::TITLE,
            unknown => error!("the window flag '{unknown}' (in '{value}') is invalid"),
        }
    }
    flags
}

fn selection_zoom(value: &str) -> Attribute {
    let mut fields = value.split(',').map(str::trim);
    let percent = parse_integer(fields.next().unwrap_or(""), 0).clamp(0, 500);
    let mode = fields.next().map_or(ZoomContent::Zoom, |mode| parse_zoom(mode, "selectionZoom"));
    Attribute::SelectionZoom { zoom: 1.0 + f64::from(percent) / 100.0, mode }
}

fn selection_zoom_size(value: &str, context: &LayoutContext) -> Attribute {
    let fields: Vec<&str> = value.split(',').map(str::trim).collect();
    let mode = if fields.len() == 3 {
        parse_zoom(fields[2], "selectionZoomSize")
    } else {
        ZoomContent::Zoom
    };
    Attribute::SelectionZoomSize {
        width: horizontal_units(fields.first().copied().unwrap_or(""), context),
        height: vertical_units(fields.get(1).copied().unwrap_or(""), context),
        mode,
    }
}
