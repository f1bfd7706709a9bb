//! `name;size` font parsing against the alias table.

use log::error;
use skin_expr::{FontMetrics, Scale, evaluate};
use std::collections::{HashMap, HashSet};

/// One font alias: the face it maps to, its design size, and the cell
/// metrics that back `w`/`h` expression units.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FontAlias {
    pub face: String,
    pub size: i32,
    pub height: i32,
    pub width: i32,
}

impl FontAlias {
    pub fn metrics(&self) -> FontMetrics {
        FontMetrics { advance: self.width, line_height: self.height }
    }
}

/// Alias table registered by loaded documents, plus the built-in seeds.
pub type FontTable = HashMap<String, FontAlias>;

/// A concrete font choice for one widget, scaled to the display.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Font {
    pub face: String,
    pub size: i32,
}

/// The aliases every skin can rely on without declaring them.
pub fn builtin_fonts() -> FontTable {
    FontTable::from([
        (
            "Body".into(),
            FontAlias { face: "Regular".into(), size: 18, height: 22, width: 16 },
        ),
        (
            "ChoiceList".into(),
            FontAlias { face: "Regular".into(), size: 20, height: 24, width: 18 },
        ),
    ])
}

/// Parse a `name` or `name;size` font value.
///
/// The name is looked up in the alias table first; a name that is instead a
/// registered face is used verbatim. Anything else falls back to the `Body`
/// alias with an error logged. The size part may be `f`-relative arithmetic
/// (e.g. `20*f`); the final size is scaled by the vertical display ratio.
pub fn parse_font(
    value: &str,
    aliases: &FontTable,
    faces: &HashSet<String>,
    vertical: Scale,
    factor: f64,
) -> Font {
    let (name, size) = match value.split_once(';') {
        Some((name, size)) => (name.trim(), parse_size(value, size.trim(), factor)),
        None => (value.trim(), None),
    };
    let (face, size) = if let Some(alias) = aliases.get(name) {
        (alias.face.clone(), size.unwrap_or(alias.size))
    } else if faces.contains(name) {
        let fallback = || aliases.get("Body").map_or(18, |body| body.size);
        (name.to_owned(), size.unwrap_or_else(fallback))
    } else {
        let body = aliases.get("Body");
        error!(
            "the font '{name}' (in '{value}') is not defined, using the '{}' face instead",
            body.map_or("Regular", |body| body.face.as_str())
        );
        match body {
            Some(body) => (body.face.clone(), size.unwrap_or(body.size)),
            None => ("Regular".to_owned(), size.unwrap_or(18)),
        }
    };
    Font { face, size: vertical.apply(i64::from(size)) as i32 }
}

fn parse_size(value: &str, size: &str, factor: f64) -> Option<i32> {
    if let Ok(size) = size.parse::<i32>() {
        return Some(size);
    }
    // Sizes like "20*f" go through the expression evaluator; there is no
    // parent or font to resolve against at this point.
    match evaluate(size, 0, 0, None, Scale::ONE, factor) {
        Some(size) => Some(size),
        None => {
            error!("the font size in '{value}' cannot be processed");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn faces() -> HashSet<String> {
        HashSet::from(["Console".into()])
    }

    #[test]
    fn alias_lookup_supplies_face_and_size() {
        let font = parse_font("Body", &builtin_fonts(), &faces(), Scale::ONE, 1.0);
        assert_eq!(font, Font { face: "Regular".into(), size: 18 });
    }

    #[test]
    fn explicit_size_overrides_alias_size() {
        let font = parse_font("Body;30", &builtin_fonts(), &faces(), Scale::ONE, 1.0);
        assert_eq!(font.size, 30);
    }

    #[test]
    fn registered_faces_pass_through() {
        let font = parse_font("Console;20", &builtin_fonts(), &faces(), Scale::ONE, 1.0);
        assert_eq!(font, Font { face: "Console".into(), size: 20 });
    }

    #[test]
    fn unknown_names_fall_back_to_body() {
        let font = parse_font("NoSuchFont;40", &builtin_fonts(), &faces(), Scale::ONE, 1.0);
        assert_eq!(font, Font { face: "Regular".into(), size: 40 });
    }

    #[test]
    fn factor_relative_sizes() {
        let font = parse_font("Body;20*f", &builtin_fonts(), &faces(), Scale::ONE, 1.5);
        assert_eq!(font.size, 30);
    }

    #[test]
    fn size_scales_vertically() {
        let font = parse_font("Body;20", &builtin_fonts(), &faces(), Scale::new(3, 2), 1.0);
        assert_eq!(font.size, 30);
    }
}
