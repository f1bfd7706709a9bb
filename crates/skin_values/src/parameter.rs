//! Skin parameter parsing.
//!
//! Parameters tune code behavior from the skin and are typed by trigger:
//! `*text` is a string, `#aarrggbb` a color integer, `0xNN` a hex integer,
//! `5.3` a float, a registered color name its ARGB integer, `face;size` a
//! font pair, and anything else an integer.

use crate::color::ColorTable;
use log::error;

#[derive(Clone, Debug, PartialEq)]
pub enum Parameter {
    Text(String),
    Integer(i64),
    Float(f64),
    Font { face: String, size: i32 },
}

/// Parse one parameter value by its trigger. Input matching no trigger and
/// failing integer parsing logs an error and is kept as text.
pub fn parse_parameter(value: &str, names: &ColorTable) -> Parameter {
    let value = value.trim();
    if let Some(text) = value.strip_prefix('*') {
        return Parameter::Text(text.to_owned());
    }
    if let Some(hex) = value.strip_prefix('#') {
        if let Ok(color) = i64::from_str_radix(hex, 16) {
            return Parameter::Integer(color);
        }
    } else if let Some(hex) = value.strip_prefix("0x") {
        if let Ok(number) = i64::from_str_radix(hex, 16) {
            return Parameter::Integer(number);
        }
    } else if value.contains('.') {
        if let Ok(number) = value.parse() {
            return Parameter::Float(number);
        }
    } else if let Some(color) = names.get(value) {
        return Parameter::Integer(i64::from(color.argb()));
    } else if let Some((face, size)) = value.split_once(';') {
        if let Ok(size) = size.trim().parse() {
            return Parameter::Font { face: face.trim().to_owned(), size };
        }
    } else if let Ok(number) = value.parse() {
        return Parameter::Integer(number);
    }
    error!("the parameter value '{value}' matches no known form, keeping it as text");
    Parameter::Text(value.to_owned())
}

/// Parse a parameter value that may be a comma-separated list.
pub fn parse_parameters(value: &str, names: &ColorTable) -> Vec<Parameter> {
    if value.contains(',') {
        value.split(',').map(|field| parse_parameter(field, names)).collect()
    } else {
        vec![parse_parameter(value, names)]
    }
}
