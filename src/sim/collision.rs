//! Axis-aligned rectangle overlap tests
//!
//! Two flavours of contact exist in the game: projectile hits use the full
//! rectangles, while obstacle-vs-ship uses a hitbox shrunk on every side so
//! that grazing passes are forgiven.

use glam::Vec2;

/// An axis-aligned rectangle (top-left origin, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        self.pos
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.pos + self.size
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Strict overlap: `a.min < b.max && a.max > b.min` on both axes.
    ///
    /// Rectangles that only share an edge do not overlap.
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        let (a_min, a_max) = (self.min(), self.max());
        let (b_min, b_max) = (other.min(), other.max());
        a_min.x < b_max.x && a_max.x > b_min.x && a_min.y < b_max.y && a_max.y > b_min.y
    }

    /// Rectangle shrunk by `margin` on all four sides
    pub fn shrink(&self, margin: f32) -> Rect {
        Rect {
            pos: self.pos + Vec2::splat(margin),
            size: self.size - Vec2::splat(2.0 * margin),
        }
    }
}

/// Projectile-vs-obstacle contact (full rectangles, no margin)
#[inline]
pub fn projectile_hits(projectile: &Rect, obstacle: &Rect) -> bool {
    projectile.overlaps(obstacle)
}

/// Obstacle-vs-ship contact using the forgiving hitbox
#[inline]
pub fn is_fatal_contact(player: &Rect, obstacle: &Rect, margin: f32) -> bool {
    player.overlaps(&obstacle.shrink(margin))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 10.0, 10.0);
        assert!(!a.overlaps(&b));
        let c = Rect::new(9.9, 0.0, 10.0, 10.0);
        assert!(a.overlaps(&c));
    }

    #[test]
    fn test_shrink() {
        let r = Rect::new(10.0, 20.0, 40.0, 30.0).shrink(8.0);
        assert_eq!(r, Rect::new(18.0, 28.0, 24.0, 14.0));
    }

    #[test]
    fn test_fatal_contact_is_stricter_than_full_overlap() {
        let player = Rect::new(100.0, 480.0, 36.0, 36.0);
        // Overlaps the ship by 5px vertically - inside the 8px margin
        let grazing = Rect::new(100.0, 480.0 - 40.0 + 5.0, 40.0, 40.0);
        assert!(player.overlaps(&grazing));
        assert!(!is_fatal_contact(&player, &grazing, 8.0));

        // Overlaps by 12px - past the margin
        let solid = Rect::new(100.0, 480.0 - 40.0 + 12.0, 40.0, 40.0);
        assert!(is_fatal_contact(&player, &solid, 8.0));
    }

    proptest! {
        #[test]
        fn overlap_is_symmetric(
            ax in -100.0f32..400.0, ay in -100.0f32..700.0, aw in 1.0f32..60.0, ah in 1.0f32..60.0,
            bx in -100.0f32..400.0, by in -100.0f32..700.0, bw in 1.0f32..60.0, bh in 1.0f32..60.0,
        ) {
            let a = Rect::new(ax, ay, aw, ah);
            let b = Rect::new(bx, by, bw, bh);
            prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
        }

        #[test]
        fn fatal_contact_implies_full_overlap(
            px in 0.0f32..324.0,
            ox in -50.0f32..400.0, oy in 400.0f32..560.0, size in 26.0f32..50.0,
        ) {
            let player = Rect::new(px, 480.0, 36.0, 36.0);
            let obstacle = Rect::new(ox, oy, size, size);
            if is_fatal_contact(&player, &obstacle, 8.0) {
                prop_assert!(projectile_hits(&player, &obstacle));
            }
        }
    }
}
