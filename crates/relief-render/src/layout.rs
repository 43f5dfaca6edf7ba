//! Placement of the four terrain walls and the decal planes

use glam::{Mat4, Vec3};
use relief_core::RoomBoundary;
use std::f32::consts::{FRAC_PI_2, PI};

/// Which wall of the room
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wall {
    /// At -Z, relief toward +Z
    North,
    /// At +Z, relief toward -Z
    South,
    /// At -X, relief toward +X
    West,
    /// At +X, relief toward -X
    East,
}

impl Wall {
    pub const ALL: [Wall; 4] = [Wall::North, Wall::South, Wall::West, Wall::East];

    /// Position within `Wall::ALL`
    pub fn index(self) -> usize {
        match self {
            Wall::North => 0,
            Wall::South => 1,
            Wall::West => 2,
            Wall::East => 3,
        }
    }

    /// Rotation about +Y applied after the wall is stood upright
    fn yaw(self) -> f32 {
        match self {
            Wall::North => 0.0,
            Wall::South => PI,
            Wall::West => FRAC_PI_2,
            Wall::East => -FRAC_PI_2,
        }
    }

    /// Centre of the wall on the room boundary
    fn anchor(self, room: &RoomBoundary) -> Vec3 {
        match self {
            Wall::North => Vec3::new(0.0, 0.0, room.min_z),
            Wall::South => Vec3::new(0.0, 0.0, room.max_z),
            Wall::West => Vec3::new(room.min_x, 0.0, 0.0),
            Wall::East => Vec3::new(room.max_x, 0.0, 0.0),
        }
    }
}

/// World transforms for every static draw slot of the room. Computed once.
#[derive(Debug, Clone, PartialEq)]
pub struct RoomLayout {
    /// One transform per entry of `Wall::ALL`
    pub walls: [Mat4; 4],
    pub floor: Mat4,
    pub ceiling: Mat4,
}

impl RoomLayout {
    /// `mesh_width × mesh_depth` is the heightfield footprint, which spans
    /// [0, width] × [0, depth] in its own space.
    pub fn new(room: &RoomBoundary, mesh_width: f32, mesh_depth: f32) -> Self {
        // Centre the footprint, then stand it up: height (+Y) becomes +Z and
        // the first image row ends up at the top.
        let upright = Mat4::from_rotation_x(FRAC_PI_2)
            * Mat4::from_translation(Vec3::new(-mesh_width / 2.0, 0.0, -mesh_depth / 2.0));

        let walls = Wall::ALL.map(|wall| {
            Mat4::from_translation(wall.anchor(room)) * Mat4::from_rotation_y(wall.yaw()) * upright
        });

        let floor = Mat4::from_translation(Vec3::new(0.0, room.floor_y, 0.0));
        let ceiling =
            Mat4::from_translation(Vec3::new(0.0, room.ceiling_y, 0.0)) * Mat4::from_rotation_x(PI);

        Self {
            walls,
            floor,
            ceiling,
        }
    }

    pub fn wall(&self, wall: Wall) -> Mat4 {
        self.walls[wall.index()]
    }
}
