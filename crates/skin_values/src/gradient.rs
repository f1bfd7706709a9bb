//! Gradient attribute parsing.

use crate::color::{Argb, ColorTable, parse_color};
use crate::options::parse_options;
use crate::scalar::parse_boolean;
use log::error;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GradientDirection {
    Horizontal,
    Vertical,
}

/// A two- or three-stop gradient with a direction and an optional
/// alpha-blend flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Gradient {
    pub start: Argb,
    pub center: Argb,
    pub end: Argb,
    pub direction: GradientDirection,
    pub alpha_blend: bool,
}

impl Default for Gradient {
    /// Black to white, vertical, no alpha blending.
    fn default() -> Self {
        Self {
            start: Argb::BLACK,
            center: Argb::WHITE,
            end: Argb::WHITE,
            direction: GradientDirection::Vertical,
            alpha_blend: false,
        }
    }
}

fn looks_like_color(value: &str, names: &ColorTable) -> bool {
    if let Some(hex) = value.strip_prefix('#') {
        return hex.len() == 6 || hex.len() == 8;
    }
    names.contains_key(value)
}

/// Parse `startColor[,centerColor],endColor,direction[,alphaBlend]`.
///
/// With two colors the single stop is used for both center and end. Invalid
/// input logs an error and yields the default black-to-white vertical
/// gradient.
pub fn parse_gradient(value: &str, names: &ColorTable) -> Gradient {
    let fields: Vec<&str> = value.split(',').map(str::trim).collect();
    let colors: Vec<Argb> = fields
        .iter()
        .take_while(|field| looks_like_color(field, names))
        .take(3)
        .map(|field| parse_color(field, names))
        .collect();
    let rest = &fields[colors.len()..];
    let (start, center, end) = match colors[..] {
        [start, end] => (start, end, end),
        [start, center, end] => (start, center, end),
        _ => {
            error!(
                "the gradient '{value}' must be \
                 'startColor[,centerColor],endColor,direction[,alphaBlend]', \
                 using black to white"
            );
            return Gradient::default();
        }
    };
    let Some(&direction) = rest.first() else {
        error!("the gradient '{value}' is missing a direction, using vertical");
        return Gradient { start, center, end, ..Gradient::default() };
    };
    let direction = parse_options(
        &[
            ("horizontal", GradientDirection::Horizontal),
            ("vertical", GradientDirection::Vertical),
        ],
        "gradient",
        direction,
        GradientDirection::Vertical,
    );
    let alpha_blend = rest.get(1).is_some_and(|flag| parse_boolean("alphablend", flag));
    Gradient { start, center, end, direction, alpha_blend }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_color_gradient() {
        let gradient = parse_gradient("#00000000,#00ffffff,horizontal", &ColorTable::new());
        assert_eq!(gradient.start, Argb::BLACK);
        assert_eq!(gradient.center, Argb::WHITE);
        assert_eq!(gradient.end, Argb::WHITE);
        assert_eq!(gradient.direction, GradientDirection::Horizontal);
        assert!(!gradient.alpha_blend);
    }

    #[test]
    fn three_color_gradient_with_blend() {
        let gradient =
            parse_gradient("#00110000,#00001100,#00000011,vertical,on", &ColorTable::new());
        assert_eq!(gradient.start, Argb::from_argb(0x0011_0000));
        assert_eq!(gradient.center, Argb::from_argb(0x0000_1100));
        assert_eq!(gradient.end, Argb::from_argb(0x0000_0011));
        assert!(gradient.alpha_blend);
    }

    #[test]
    fn named_colors_participate() {
        let names = crate::color::builtin_colors();
        let gradient = parse_gradient("key_red,key_text,vertical", &names);
        assert_eq!(gradient.start, names["key_red"]);
    }

    #[test]
    fn invalid_input_defaults() {
        assert_eq!(parse_gradient("nonsense", &ColorTable::new()), Gradient::default());
        assert_eq!(parse_gradient("#00000000", &ColorTable::new()), Gradient::default());
    }

    #[test]
    fn missing_direction_defaults_to_vertical() {
        let gradient = parse_gradient("#00000000,#00ffffff", &ColorTable::new());
        assert_eq!(gradient.direction, GradientDirection::Vertical);
        assert_eq!(gradient.start, Argb::BLACK);
    }
}
