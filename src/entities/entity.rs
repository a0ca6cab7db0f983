use crate::config::EntitySpec;

/// A moving rectangle on the canvas. `(x, y)` is the top-left corner and y
/// grows downward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Entity {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub speed: f32,
}

impl Entity {
    pub fn new(x: f32, y: f32, spec: EntitySpec) -> Self {
        Self {
            x,
            y,
            width: spec.width,
            height: spec.height,
            speed: spec.speed,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// AABB overlap test. Both axis projections must overlap strictly, so
    /// boxes that only share an edge do not collide.
    pub fn intersects(&self, other: &Entity) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x: f32, y: f32, width: f32, height: f32) -> Entity {
        Entity {
            x,
            y,
            width,
            height,
            speed: 0.0,
        }
    }

    #[test]
    fn test_touching_edges_do_not_collide() {
        let a = rect(0.0, 0.0, 50.0, 100.0);
        // shares the right edge
        assert!(!a.intersects(&rect(50.0, 0.0, 50.0, 100.0)));
        // shares the bottom edge
        assert!(!a.intersects(&rect(0.0, 100.0, 50.0, 100.0)));
        // corner contact
        assert!(!a.intersects(&rect(50.0, 100.0, 10.0, 10.0)));
    }

    #[test]
    fn test_disjoint_boxes() {
        let a = rect(0.0, 0.0, 50.0, 100.0);
        assert!(!a.intersects(&rect(200.0, 300.0, 50.0, 100.0)));
        // x overlaps but y does not
        assert!(!a.intersects(&rect(10.0, 150.0, 50.0, 100.0)));
        // y overlaps but x does not
        assert!(!a.intersects(&rect(60.0, 10.0, 50.0, 100.0)));
    }

    #[test]
    fn test_contained_box() {
        let outer = rect(0.0, 0.0, 100.0, 100.0);
        let inner = rect(25.0, 25.0, 10.0, 10.0);
        assert!(outer.intersects(&inner));
        assert!(inner.intersects(&outer));
    }

    #[test]
    fn test_partial_overlap() {
        let a = rect(175.0, 480.0, 50.0, 100.0);
        let b = rect(200.0, 400.0, 50.0, 100.0);
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
    }

    #[test]
    fn test_identical_boxes_collide() {
        let a = rect(10.0, 10.0, 5.0, 5.0);
        assert!(a.intersects(&a));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn interval_overlap(a0: f32, a1: f32, b0: f32, b1: f32) -> bool {
            a0 < b1 && b0 < a1
        }

        proptest! {
            #[test]
            fn test_intersects_is_symmetric(
                ax in -200f32..600.0, ay in -200f32..800.0,
                bx in -200f32..600.0, by in -200f32..800.0,
                aw in 1f32..150.0, ah in 1f32..150.0,
                bw in 1f32..150.0, bh in 1f32..150.0,
            ) {
                let a = rect(ax, ay, aw, ah);
                let b = rect(bx, by, bw, bh);
                prop_assert_eq!(a.intersects(&b), b.intersects(&a));
            }

            #[test]
            fn test_intersects_iff_both_axes_overlap(
                ax in -200i32..600, ay in -200i32..800,
                bx in -200i32..600, by in -200i32..800,
                aw in 1i32..150, ah in 1i32..150,
                bw in 1i32..150, bh in 1i32..150,
            ) {
                let a = rect(ax as f32, ay as f32, aw as f32, ah as f32);
                let b = rect(bx as f32, by as f32, bw as f32, bh as f32);
                let expected = interval_overlap(a.x, a.right(), b.x, b.right())
                    && interval_overlap(a.y, a.bottom(), b.y, b.bottom());
                prop_assert_eq!(a.intersects(&b), expected);
            }
        }
    }
}
