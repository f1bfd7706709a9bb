//! Enumerated attribute values with fixed option tables.

use log::error;

/// Look `value` up in a closed option table. Unknown values log the
/// acceptable options and yield `default`.
pub fn parse_options<T: Copy>(options: &[(&str, T)], attribute: &str, value: &str, default: T) -> T {
    for (name, option) in options {
        if *name == value {
            return *option;
        }
    }
    let acceptable: Vec<&str> = options.iter().map(|(name, _)| *name).collect();
    error!(
        "the '{attribute}' value '{value}' is invalid, acceptable options are '{}'",
        acceptable.join("', '")
    );
    default
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HorizontalAlignment {
    #[default]
    Left,
    Center,
    Right,
    Block,
}

pub fn parse_horizontal_alignment(value: &str) -> HorizontalAlignment {
    parse_options(
        &[
            ("left", HorizontalAlignment::Left),
            ("center", HorizontalAlignment::Center),
            ("right", HorizontalAlignment::Right),
            ("block", HorizontalAlignment::Block),
        ],
        "horizontalAlignment",
        value,
        HorizontalAlignment::Left,
    )
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum VerticalAlignment {
    Top,
    #[default]
    Center,
    Bottom,
}

pub fn parse_vertical_alignment(value: &str) -> VerticalAlignment {
    parse_options(
        &[
            ("top", VerticalAlignment::Top),
            ("center", VerticalAlignment::Center),
            ("middle", VerticalAlignment::Center),
            ("bottom", VerticalAlignment::Bottom),
        ],
        "verticalAlignment",
        value,
        VerticalAlignment::Center,
    )
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Wrap {
    #[default]
    NoWrap,
    Wrap,
    Ellipsis,
}

pub fn parse_wrap(value: &str) -> Wrap {
    parse_options(
        &[
            ("noWrap", Wrap::NoWrap),
            ("off", Wrap::NoWrap),
            ("0", Wrap::NoWrap),
            ("wrap", Wrap::Wrap),
            ("on", Wrap::Wrap),
            ("1", Wrap::Wrap),
            ("ellipsis", Wrap::Ellipsis),
        ],
        "wrap",
        value,
        Wrap::NoWrap,
    )
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OrientationAxis {
    Horizontal,
    Vertical,
}

/// Slider/progress orientation: the axis plus whether the direction along it
/// is reversed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Orientation {
    pub axis: OrientationAxis,
    pub swapped: bool,
}

pub fn parse_orientation(value: &str) -> Orientation {
    const HORIZONTAL: Orientation =
        Orientation { axis: OrientationAxis::Horizontal, swapped: false };
    parse_options(
        &[
            ("orHorizontal", HORIZONTAL),
            ("orLeftToRight", HORIZONTAL),
            (
                "orRightToLeft",
                Orientation { axis: OrientationAxis::Horizontal, swapped: true },
            ),
            (
                "orVertical",
                Orientation { axis: OrientationAxis::Vertical, swapped: false },
            ),
            (
                "orTopToBottom",
                Orientation { axis: OrientationAxis::Vertical, swapped: false },
            ),
            (
                "orBottomToTop",
                Orientation { axis: OrientationAxis::Vertical, swapped: true },
            ),
        ],
        "orientation",
        value,
        HORIZONTAL,
    )
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ScrollbarMode {
    #[default]
    ShowOnDemand,
    ShowAlways,
    ShowNever,
    ShowLeftOnDemand,
    ShowLeftAlways,
    ShowTopOnDemand,
    ShowTopAlways,
}

pub fn parse_scrollbar_mode(value: &str) -> ScrollbarMode {
    parse_options(
        &[
            ("showOnDemand", ScrollbarMode::ShowOnDemand),
            ("showAlways", ScrollbarMode::ShowAlways),
            ("showNever", ScrollbarMode::ShowNever),
            ("showLeft", ScrollbarMode::ShowLeftOnDemand),
            ("showLeftOnDemand", ScrollbarMode::ShowLeftOnDemand),
            ("showLeftAlways", ScrollbarMode::ShowLeftAlways),
            ("showTopOnDemand", ScrollbarMode::ShowTopOnDemand),
            ("showTopAlways", ScrollbarMode::ShowTopAlways),
        ],
        "scrollbarMode",
        value,
        ScrollbarMode::ShowOnDemand,
    )
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ScrollbarScroll {
    #[default]
    ByPage,
    ByLine,
}

pub fn parse_scrollbar_scroll(value: &str) -> ScrollbarScroll {
    parse_options(
        &[("byPage", ScrollbarScroll::ByPage), ("byLine", ScrollbarScroll::ByLine)],
        "scrollbarScroll",
        value,
        ScrollbarScroll::ByPage,
    )
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrollbarLength {
    Pixels(i32),
    Full,
    Auto,
}

pub fn parse_scrollbar_length(value: &str, default: ScrollbarLength) -> ScrollbarLength {
    if !value.is_empty() && value.bytes().all(|byte| byte.is_ascii_digit()) {
        if let Ok(pixels) = value.parse() {
            return ScrollbarLength::Pixels(pixels);
        }
    }
    match value {
        "full" => ScrollbarLength::Full,
        "auto" => ScrollbarLength::Auto,
        _ => default,
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AlphaTest {
    #[default]
    Off,
    On,
    Blend,
}

pub fn parse_alpha_test(value: &str) -> AlphaTest {
    parse_options(
        &[("on", AlphaTest::On), ("off", AlphaTest::Off), ("blend", AlphaTest::Blend)],
        "alphaTest",
        value,
        AlphaTest::Off,
    )
}

/// How a zoomed listbox selection treats its content.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ZoomContent {
    #[default]
    Zoom,
    Move,
    Off,
}

pub fn parse_zoom(value: &str, attribute: &str) -> ZoomContent {
    parse_options(
        &[
            ("zoomContent", ZoomContent::Zoom),
            ("moveContent", ZoomContent::Move),
            ("ignoreContent", ZoomContent::Off),
        ],
        attribute,
        value,
        ZoomContent::Zoom,
    )
}
