//! CSS-style box padding shorthand.

use crate::scalar::parse_integer;
use log::error;

/// Padding as left, top, right, bottom.
pub type Padding = [i32; 4];

/// Parse 1, 2 or 4 comma-separated integers with CSS-style broadcast:
/// one value applies to all edges, two values alternate. Any other count
/// logs an error and yields all-zero padding.
pub fn parse_padding(attribute: &str, value: &str) -> Padding {
    let fields: Vec<i32> =
        value.split(',').map(|field| parse_integer(field.trim(), 0)).collect();
    match fields[..] {
        [all] => [all; 4],
        [a, b] => [a, b, a, b],
        [left, top, right, bottom] => [left, top, right, bottom],
        _ => {
            error!(
                "attribute '{attribute}' with value '{value}' is invalid, \
                 it must have 1, 2 or 4 values"
            );
            [0; 4]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn broadcast_rules() {
        assert_eq!(parse_padding("padding", "5"), [5, 5, 5, 5]);
        assert_eq!(parse_padding("padding", "3,4"), [3, 4, 3, 4]);
        assert_eq!(parse_padding("padding", "1,2,3,4"), [1, 2, 3, 4]);
    }

    #[test]
    fn three_values_default_to_zero() {
        assert_eq!(parse_padding("padding", "1,2,3"), [0, 0, 0, 0]);
    }
}
