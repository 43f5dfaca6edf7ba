//! Room boundary value object

use serde::{Deserialize, Serialize};

/// A horizontal world axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Z,
}

/// The enclosed room: a rectangle centred on the origin in XZ, plus the floor
/// and ceiling planes. Fixed for the whole session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoomBoundary {
    pub min_x: f32,
    pub max_x: f32,
    pub min_z: f32,
    pub max_z: f32,
    /// Y of the floor plane
    pub floor_y: f32,
    /// Y of the ceiling plane
    pub ceiling_y: f32,
}

impl RoomBoundary {
    /// Derive the room from the fixed frame size: the walls are `width` apart
    /// and `height` tall, centred vertically on the origin.
    pub fn from_frame(width: f32, height: f32) -> Self {
        let half_w = width / 2.0;
        let half_h = height / 2.0;
        Self {
            min_x: -half_w,
            max_x: half_w,
            min_z: -half_w,
            max_z: half_w,
            floor_y: -half_h,
            ceiling_y: half_h,
        }
    }

    /// (min, max) along the given axis
    pub fn bounds(&self, axis: Axis) -> (f32, f32) {
        match axis {
            Axis::X => (self.min_x, self.max_x),
            Axis::Z => (self.min_z, self.max_z),
        }
    }

    /// Whether `value` lies within the bounds of `axis` (inclusive)
    pub fn contains(&self, axis: Axis, value: f32) -> bool {
        let (min, max) = self.bounds(axis);
        (min..=max).contains(&value)
    }

    /// Clamp `value` into the bounds of `axis`
    pub fn clamp(&self, axis: Axis, value: f32) -> f32 {
        let (min, max) = self.bounds(axis);
        value.clamp(min, max)
    }

    /// Horizontal extent along X
    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    /// Horizontal extent along Z
    pub fn depth(&self) -> f32 {
        self.max_z - self.min_z
    }

    /// Distance from floor to ceiling
    pub fn height(&self) -> f32 {
        self.ceiling_y - self.floor_y
    }
}
