//! Top-down compass: the player's forward and right directions as 2D arrows

use glam::{Vec2, Vec3};
use std::f32::consts::PI;

/// Arrow shaft length in pixels
pub const ARROW_LENGTH: f32 = 60.0;
/// Distance from the anchor to the arrow head's back corners
pub const HEAD_BACK: f32 = 50.0;
/// Half-angle of the arrow head as seen from the anchor
pub const HEAD_SPREAD: f32 = PI / 20.0;

/// One arrow in screen pixels (y down)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arrow {
    pub tail: Vec2,
    pub tip: Vec2,
    /// Back corners of the head; with `tip` they form the head triangle
    pub head: [Vec2; 2],
}

impl Arrow {
    /// Arrow from `anchor` along `direction`; `None` for a zero direction
    pub fn new(anchor: Vec2, direction: Vec2) -> Option<Self> {
        let dir = direction.try_normalize()?;
        let back = dir * HEAD_BACK;
        Some(Self {
            tail: anchor,
            tip: anchor + dir * ARROW_LENGTH,
            head: [
                anchor + Vec2::from_angle(HEAD_SPREAD).rotate(back),
                anchor + Vec2::from_angle(-HEAD_SPREAD).rotate(back),
            ],
        })
    }
}

/// Both compass arrows for one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Compass {
    pub forward: Option<Arrow>,
    pub right: Option<Arrow>,
}

impl Compass {
    /// World X maps to screen right and world Z to screen down, so looking
    /// toward -Z points the forward arrow up.
    pub fn new(anchor: Vec2, forward: Vec3, right: Vec3) -> Self {
        Self {
            forward: Arrow::new(anchor, to_screen(forward)),
            right: Arrow::new(anchor, to_screen(right)),
        }
    }
}

fn to_screen(v: Vec3) -> Vec2 {
    Vec2::new(v.x, v.z)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    fn close(a: Vec2, b: Vec2) -> bool {
        (a - b).length() < EPS
    }

    #[test]
    fn initial_heading_points_up_and_right() {
        let anchor = Vec2::new(1140.0, 120.0);
        let compass = Compass::new(anchor, Vec3::NEG_Z, Vec3::X);

        let forward = compass.forward.unwrap();
        assert!(close(forward.tail, anchor));
        assert!(close(forward.tip, Vec2::new(1140.0, 60.0)));

        let right = compass.right.unwrap();
        assert!(close(right.tip, Vec2::new(1200.0, 120.0)));
    }

    #[test]
    fn arrows_have_fixed_length() {
        let arrow = Arrow::new(Vec2::ZERO, Vec2::new(3.0, 4.0)).unwrap();
        assert!((arrow.tip.length() - ARROW_LENGTH).abs() < EPS);
    }

    #[test]
    fn head_corners_straddle_the_shaft() {
        let arrow = Arrow::new(Vec2::ZERO, Vec2::X).unwrap();
        for corner in arrow.head {
            assert!((corner.length() - HEAD_BACK).abs() < EPS);
            assert!((corner.y.abs() - HEAD_BACK * HEAD_SPREAD.sin()).abs() < EPS);
        }
        assert!(arrow.head[0].y * arrow.head[1].y < 0.0);
    }

    #[test]
    fn vertical_component_is_ignored() {
        let compass = Compass::new(Vec2::ZERO, Vec3::new(0.0, 5.0, -1.0), Vec3::Y);
        assert!(close(compass.forward.unwrap().tip, Vec2::new(0.0, -ARROW_LENGTH)));
        assert!(compass.right.is_none());
    }
}
