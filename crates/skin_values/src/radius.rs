//! Corner radius attribute parsing.

use crate::scalar::parse_integer;
use bitflags::bitflags;
use log::error;

bitflags! {
    /// Which corners a radius applies to.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct Edges: u8 {
        const TOP_LEFT = 1;
        const TOP_RIGHT = 1 << 1;
        const BOTTOM_LEFT = 1 << 2;
        const BOTTOM_RIGHT = 1 << 3;
        const TOP = Self::TOP_LEFT.bits() | Self::TOP_RIGHT.bits();
        const BOTTOM = Self::BOTTOM_LEFT.bits() | Self::BOTTOM_RIGHT.bits();
        const LEFT = Self::TOP_LEFT.bits() | Self::BOTTOM_LEFT.bits();
        const RIGHT = Self::TOP_RIGHT.bits() | Self::BOTTOM_RIGHT.bits();
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Radius {
    pub radius: i32,
    pub edges: Edges,
}

/// Parse `"N"` (all corners) or `"N;edge1,edge2,..."`.
pub fn parse_radius(value: &str) -> Radius {
    let Some((radius, edges)) = value.split_once(';') else {
        return Radius { radius: parse_integer(value.trim(), 0), edges: Edges::all() };
    };
    let mut mask = Edges::empty();
    for edge in edges.split(',').map(str::trim) {
        match edge {
            "topLeft" => mask |= Edges::TOP_LEFT,
            "topRight" => mask |= Edges::TOP_RIGHT,
            "top" => mask |= Edges::TOP,
            "bottomLeft" => mask |= Edges::BOTTOM_LEFT,
            "bottomRight" => mask |= Edges::BOTTOM_RIGHT,
            "bottom" => mask |= Edges::BOTTOM,
            "left" => mask |= Edges::LEFT,
            "right" => mask |= Edges::RIGHT,
            _ => error!("the cornerRadius edge '{edge}' (in '{value}') is unknown"),
        }
    }
    Radius { radius: parse_integer(radius.trim(), 0), edges: mask }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_radius_covers_all_corners() {
        assert_eq!(parse_radius("8"), Radius { radius: 8, edges: Edges::all() });
    }

    #[test]
    fn edge_list_builds_a_mask() {
        let radius = parse_radius("6;top,bottomLeft");
        assert_eq!(radius.radius, 6);
        assert_eq!(radius.edges, Edges::TOP | Edges::BOTTOM_LEFT);
    }

    #[test]
    fn unknown_edges_add_nothing() {
        assert_eq!(parse_radius("6;middle").edges, Edges::empty());
    }
}
