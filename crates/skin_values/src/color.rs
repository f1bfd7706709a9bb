//! `#aarrggbb` and named color parsing.

use log::error;
use std::collections::HashMap;

/// An ARGB color as stored in skin documents. Alpha 0 is fully opaque,
/// matching the GUI toolkit's convention.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Argb {
    pub alpha: u8,
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

/// Named colors registered by loaded documents, plus the built-in seeds.
pub type ColorTable = HashMap<String, Argb>;

impl Argb {
    /// Opaque white, the fallback for unparsable color values.
    pub const WHITE: Argb = Argb::from_argb(0x00FF_FFFF);
    /// Opaque black.
    pub const BLACK: Argb = Argb::from_argb(0x0000_0000);

    pub const fn from_argb(value: u32) -> Self {
        Self {
            alpha: (value >> 24) as u8,
            red: (value >> 16) as u8,
            green: (value >> 8) as u8,
            blue: value as u8,
        }
    }

    pub const fn argb(self) -> u32 {
        (self.alpha as u32) << 24
            | (self.red as u32) << 16
            | (self.green as u32) << 8
            | self.blue as u32
    }
}

/// Parse a color value, falling back to opaque white.
pub fn parse_color(value: &str, names: &ColorTable) -> Argb {
    parse_color_or(value, names, Argb::WHITE)
}

/// Parse `#aarrggbb` (or shorter hex forms, missing leading components are
/// zero) or a named color. Unparsable input logs an error and yields
/// `default`.
pub fn parse_color_or(value: &str, names: &ColorTable, default: Argb) -> Argb {
    if let Some(hex) = value.strip_prefix('#') {
        return match u32::from_str_radix(hex, 16) {
            Ok(argb) if hex.len() <= 8 => Argb::from_argb(argb),
            _ => {
                error!("the color code '{value}' must be #aarrggbb, using the default");
                default
            }
        };
    }
    if let Some(color) = names.get(value) {
        return *color;
    }
    error!("the color '{value}' must be #aarrggbb or a registered color name, using the default");
    default
}

/// The color names every skin can rely on without declaring them.
pub fn builtin_colors() -> ColorTable {
    ColorTable::from([
        ("key_back".into(), Argb::from_argb(0x0031_3131)),
        ("key_blue".into(), Argb::from_argb(0x0018_188B)),
        ("key_green".into(), Argb::from_argb(0x001F_771F)),
        ("key_red".into(), Argb::from_argb(0x009F_1313)),
        ("key_text".into(), Argb::from_argb(0x00FF_FFFF)),
        ("key_yellow".into(), Argb::from_argb(0x00A0_8500)),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_components_round_trip() {
        let color = parse_color("#80112233", &ColorTable::new());
        assert_eq!(color.alpha, 0x80);
        assert_eq!(color.red, 0x11);
        assert_eq!(color.green, 0x22);
        assert_eq!(color.blue, 0x33);
        assert_eq!(color.argb(), 0x8011_2233);
    }

    #[test]
    fn short_hex_is_opaque() {
        assert_eq!(parse_color("#ffffff", &ColorTable::new()), Argb::WHITE);
    }

    #[test]
    fn named_colors_resolve_from_table() {
        let names = builtin_colors();
        assert_eq!(parse_color("key_red", &names), Argb::from_argb(0x009F_1313));
    }

    #[test]
    fn invalid_input_defaults_to_white() {
        let names = ColorTable::new();
        assert_eq!(parse_color("not-a-color", &names), Argb::WHITE);
        assert_eq!(parse_color("#gg0011223", &names), Argb::WHITE);
        assert_eq!(parse_color("#aabbccddee", &names), Argb::WHITE);
    }
}
