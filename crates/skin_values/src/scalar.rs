//! Integer and boolean attribute parsing.

use log::error;

/// Parse an integer, logging and substituting `default` on invalid input.
pub fn parse_integer(value: &str, default: i32) -> i32 {
    match value.trim().parse() {
        Ok(value) => value,
        Err(_) => {
            error!("the value '{value}' is not a valid integer");
            default
        }
    }
}

/// Parse a boolean attribute value. The attribute's own name counts as true
/// (`scrollbar="scrollbar"` style), as do the usual affirmative spellings.
pub fn parse_boolean(attribute: &str, value: &str) -> bool {
    let value = value.to_ascii_lowercase();
    value == attribute || matches!(value.as_str(), "1" | "enabled" | "on" | "true" | "yes")
}
