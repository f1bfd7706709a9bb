//! Docking layout contexts.
//!
//! A [`LayoutContext`] is a cursor over a rectangular region during one
//! resolution pass. Children dock against its edges in document order; the
//! sequential kind consumes the docked strip from the remaining region, the
//! stacking kind leaves the region untouched so siblings can overlap.

#![forbid(unsafe_code)]

use log::debug;
use skin_expr::evaluate;
pub use skin_expr::{FontMetrics, Scale};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// Whether docking consumes the remaining region.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ContextKind {
    #[default]
    Sequential,
    Stacking,
}

/// The per-axis actual/design scale of one context.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScalePair {
    pub horizontal: Scale,
    pub vertical: Scale,
}

/// One rectangular region being filled during resolution. Created per
/// nested panel and discarded with the pass.
#[derive(Clone, Debug)]
pub struct LayoutContext {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub scale: ScalePair,
    pub factor: f64,
    kind: ContextKind,
}

impl LayoutContext {
    /// The root context covering the whole desktop region.
    pub fn root(bounds: Rect, scale: ScalePair, factor: f64) -> Self {
        Self {
            x: bounds.x,
            y: bounds.y,
            width: bounds.width,
            height: bounds.height,
            scale,
            factor,
            // The root stacks: screens and window decorations overlay it.
            kind: ContextKind::Stacking,
        }
    }

    pub fn kind(&self) -> ContextKind {
        self.kind
    }

    /// Dock a child region described by `position` and `size` strings.
    ///
    /// `position` is `fill`, an edge name, or an `x,y` expression pair; an
    /// edge dock carves a strip sized by the matching component of `size`.
    /// Sequential contexts shrink their remaining region accordingly,
    /// stacking contexts only compute the child geometry.
    pub fn dock(&mut self, position: &str, size: &str, font: Option<FontMetrics>) -> (Point, Size) {
        let sequential = self.kind == ContextKind::Sequential;
        if position == "fill" {
            let docked = (
                Point { x: self.x, y: self.y },
                Size { width: self.width, height: self.height },
            );
            if sequential {
                self.width = 0;
                self.height = 0;
            }
            return docked;
        }
        let (width_expr, height_expr) = split_pair(size);
        let width = self.horizontal(width_expr, 0, font);
        let height = self.vertical(height_expr, 0, font);
        match position {
            "top" => {
                let docked =
                    (Point { x: self.x, y: self.y }, Size { width: self.width, height });
                if sequential {
                    self.y += height;
                    self.height -= height;
                }
                docked
            }
            "bottom" => {
                let docked = (
                    Point { x: self.x, y: self.y + self.height - height },
                    Size { width: self.width, height },
                );
                if sequential {
                    self.height -= height;
                }
                docked
            }
            "left" => {
                let docked =
                    (Point { x: self.x, y: self.y }, Size { width, height: self.height });
                if sequential {
                    self.x += width;
                    self.width -= width;
                }
                docked
            }
            "right" => {
                let docked = (
                    Point { x: self.x + self.width - width, y: self.y },
                    Size { width, height: self.height },
                );
                if sequential {
                    self.width -= width;
                }
                docked
            }
            pair => {
                // An explicit coordinate pair places without consuming space.
                let (x_expr, y_expr) = split_pair(pair);
                let x = self.x + self.horizontal(x_expr, width, font);
                let y = self.y + self.vertical(y_expr, height, font);
                (Point { x, y }, Size { width, height })
            }
        }
    }

    /// Derive a nested context from a dock against this one.
    pub fn derive(
        &mut self,
        position: Option<&str>,
        size: Option<&str>,
        font: Option<FontMetrics>,
        kind: ContextKind,
    ) -> LayoutContext {
        let (position, size) = match (position, size) {
            (Some(position), Some(size)) => (position, size),
            _ => {
                debug!("nested context without position/size inherits the remaining region");
                ("fill", "0,0")
            }
        };
        let (origin, extent) = self.dock(position, size, font);
        LayoutContext {
            x: origin.x,
            y: origin.y,
            width: extent.width,
            height: extent.height,
            scale: self.scale,
            factor: self.factor,
            kind,
        }
    }

    fn horizontal(&self, expr: &str, object_size: i32, font: Option<FontMetrics>) -> i32 {
        evaluate(expr, self.width, object_size, font, self.scale.horizontal, self.factor)
            .unwrap_or(0)
    }

    fn vertical(&self, expr: &str, object_size: i32, font: Option<FontMetrics>) -> i32 {
        evaluate(expr, self.height, object_size, font, self.scale.vertical, self.factor)
            .unwrap_or(0)
    }
}

/// Split a `"x,y"` attribute value. A missing comma leaves the second
/// component empty, which evaluates to 0.
fn split_pair(value: &str) -> (&str, &str) {
    match value.split_once(',') {
        Some((first, second)) => (first, second),
        None => (value, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region() -> LayoutContext {
        let mut context = LayoutContext::root(
            Rect { x: 0, y: 0, width: 100, height: 100 },
            ScalePair::default(),
            1.0,
        );
        context.kind = ContextKind::Sequential;
        context
    }

    #[test]
    fn top_dock_consumes_a_strip() {
        let mut context = region();
        let (position, size) = context.dock("top", "0,30", None);
        assert_eq!(position, Point { x: 0, y: 0 });
        assert_eq!(size, Size { width: 100, height: 30 });
        assert_eq!((context.x, context.y), (0, 30));
        assert_eq!((context.width, context.height), (100, 70));
    }

    #[test]
    fn stacking_dock_leaves_the_region() {
        let mut context = region();
        context.kind = ContextKind::Stacking;
        let (position, size) = context.dock("top", "0,30", None);
        assert_eq!(position, Point { x: 0, y: 0 });
        assert_eq!(size, Size { width: 100, height: 30 });
        assert_eq!((context.width, context.height), (100, 100));
    }

    #[test]
    fn bottom_dock_places_at_the_far_edge() {
        let mut context = region();
        let (position, size) = context.dock("bottom", "0,20", None);
        assert_eq!(position, Point { x: 0, y: 80 });
        assert_eq!(size, Size { width: 100, height: 20 });
        assert_eq!(context.height, 80);
        assert_eq!(context.y, 0);
    }

    #[test]
    fn left_and_right_docks() {
        let mut context = region();
        let (position, size) = context.dock("left", "25,0", None);
        assert_eq!((position, size), (
            Point { x: 0, y: 0 },
            Size { width: 25, height: 100 }
        ));
        let (position, size) = context.dock("right", "25,0", None);
        assert_eq!((position, size), (
            Point { x: 75, y: 0 },
            Size { width: 25, height: 100 }
        ));
        assert_eq!((context.x, context.width), (25, 50));
    }

    #[test]
    fn fill_consumes_everything_sequentially() {
        let mut context = region();
        let (position, size) = context.dock("fill", "", None);
        assert_eq!(position, Point { x: 0, y: 0 });
        assert_eq!(size, Size { width: 100, height: 100 });
        assert_eq!((context.width, context.height), (0, 0));
    }

    #[test]
    fn coordinate_pair_offsets_by_origin() {
        let mut context = region();
        context.dock("top", "0,40", None);
        let (position, size) = context.dock("10,center", "20,20", None);
        assert_eq!(position, Point { x: 10, y: 40 + 20 });
        assert_eq!(size, Size { width: 20, height: 20 });
        // Explicit placement leaves the remaining region alone.
        assert_eq!((context.width, context.height), (100, 60));
    }

    #[test]
    fn derived_context_inherits_scale() {
        let mut context = LayoutContext::root(
            Rect { x: 0, y: 0, width: 200, height: 100 },
            ScalePair { horizontal: Scale::new(2, 1), vertical: Scale::ONE },
            1.0,
        );
        let nested = context.derive(Some("0,0"), Some("50,50"), None, ContextKind::Sequential);
        // The width expression "50" rescales by 2/1.
        assert_eq!((nested.width, nested.height), (100, 50));
        assert_eq!(nested.scale, context.scale);
    }
}
