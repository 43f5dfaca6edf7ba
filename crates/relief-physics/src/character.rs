//! First-person character controller

use glam::Vec3;
use relief_core::config::PlayerSettings;
use relief_core::{Axis, RoomBoundary};
use relief_runtime::{InputState, LiveControls};

use crate::mouse::MouseMode;

/// Pitch limit in degrees, short of straight up/down
const PITCH_LIMIT_DEG: f32 = 89.0;

/// One tick of player intent, decoupled from the key bindings
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ControllerInput {
    /// +1 forward, -1 backward
    pub forward: f32,
    /// +1 right, -1 left
    pub strafe: f32,
    pub sprint: bool,
    /// Jump on foot, ascend while flying
    pub jump: bool,
    /// Descend while flying
    pub descend: bool,
    /// Flip the mouse mode this tick
    pub toggle_mouse: bool,
    /// Mouse motion in pixels (x right, y down)
    pub look_delta: (f32, f32),
}

impl ControllerInput {
    /// Read the bound actions from the tick's input state
    pub fn from_input_state(input: &InputState) -> Self {
        let (dx, dy) = input.raw_mouse_delta();
        Self {
            forward: input.axis("move_forward", "move_backward"),
            strafe: input.axis("move_right", "move_left"),
            sprint: input.is_action_pressed("sprint"),
            jump: input.is_action_pressed("jump"),
            descend: input.is_action_pressed("descend"),
            toggle_mouse: input.is_action_just_pressed("toggle_mouse"),
            look_delta: (dx as f32, dy as f32),
        }
    }
}

/// Kinematic first-person controller confined to the room
pub struct PlayerController {
    /// Eye position
    pub position: Vec3,
    /// Horizontal look angle in radians; 0 looks toward -Z
    pub yaw: f32,
    /// Vertical look angle in radians
    pub pitch: f32,
    /// Current vertical velocity for gravity/jumping
    pub vertical_velocity: f32,
    /// Whether the character rests on the floor
    pub grounded: bool,
    pub mouse_mode: MouseMode,
    settings: PlayerSettings,
    room: RoomBoundary,
}

impl PlayerController {
    /// Start at the room centre, looking toward -Z, mouse captured
    pub fn new(settings: PlayerSettings, room: RoomBoundary) -> Self {
        Self {
            position: Vec3::ZERO,
            yaw: 0.0,
            pitch: 0.0,
            vertical_velocity: 0.0,
            grounded: false,
            mouse_mode: MouseMode::Captured,
            settings,
            room,
        }
    }

    pub fn room(&self) -> &RoomBoundary {
        &self.room
    }

    /// Horizontal forward unit vector
    pub fn forward(&self) -> Vec3 {
        Vec3::new(self.yaw.sin(), 0.0, -self.yaw.cos())
    }

    /// Horizontal right unit vector (forward × up)
    pub fn right(&self) -> Vec3 {
        self.forward().cross(Vec3::Y)
    }

    /// Unit view direction including pitch
    pub fn look_direction(&self) -> Vec3 {
        let (sin_p, cos_p) = self.pitch.sin_cos();
        Vec3::new(cos_p * self.yaw.sin(), sin_p, -cos_p * self.yaw.cos())
    }

    /// Point the camera looks at
    pub fn target(&self) -> Vec3 {
        self.position + self.look_direction()
    }

    /// Y the eye rests at when standing on the floor
    pub fn standing_height(&self) -> f32 {
        self.room.floor_y + self.settings.half_height
    }

    /// Advance one tick of `dt` seconds
    pub fn update(&mut self, input: &ControllerInput, controls: &LiveControls, dt: f32) {
        if input.toggle_mouse {
            self.mouse_mode = self.mouse_mode.toggled();
            log::debug!("Mouse mode: {:?}", self.mouse_mode);
        }

        let speed = if input.sprint {
            self.settings.speed * self.settings.sprint_multiplier
        } else {
            self.settings.speed
        };
        let desired = (self.forward() * input.forward + self.right() * input.strafe) * speed * dt;
        let (x, z) = self.resolve_walls(desired);
        self.position.x = x;
        self.position.z = z;

        self.apply_vertical(input, controls.can_fly, dt);
        self.apply_look(input.look_delta);
    }

    /// Horizontal position after `desired`, each axis stopped exactly at the
    /// wall while the other keeps moving.
    fn resolve_walls(&self, desired: Vec3) -> (f32, f32) {
        (
            self.room.clamp(Axis::X, self.position.x + desired.x),
            self.room.clamp(Axis::Z, self.position.z + desired.z),
        )
    }

    fn apply_vertical(&mut self, input: &ControllerInput, can_fly: bool, dt: f32) {
        let gravity = self.settings.gravity;
        let floor = self.standing_height();

        if can_fly {
            self.vertical_velocity = 0.0;
        } else {
            self.vertical_velocity -= gravity * dt;
        }

        let mut y = self.position.y + self.vertical_velocity * dt;
        let landed = y < floor;
        if landed {
            y = floor;
            self.vertical_velocity = 0.0;
        }

        if can_fly {
            if input.jump {
                y += gravity * dt;
            }
            if input.descend {
                y = (y - gravity / 2.0 * dt).max(floor);
            }
        } else if landed && input.jump {
            self.vertical_velocity = self.settings.jump_impulse;
        }

        self.position.y = y;
        self.grounded = y <= floor;
    }

    fn apply_look(&mut self, (dx, dy): (f32, f32)) {
        if !self.mouse_mode.is_captured() {
            return;
        }
        let sensitivity = self.settings.mouse_sensitivity.to_radians();
        let limit = PITCH_LIMIT_DEG.to_radians();
        self.yaw += dx * sensitivity;
        self.pitch = (self.pitch - dy * sensitivity).clamp(-limit, limit);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-3;

    fn controller() -> PlayerController {
        PlayerController::new(
            PlayerSettings::default(),
            RoomBoundary::from_frame(640.0, 480.0),
        )
    }

    fn walking() -> LiveControls {
        LiveControls::default()
    }

    fn flying() -> LiveControls {
        LiveControls {
            can_fly: true,
            ..LiveControls::default()
        }
    }

    fn forward() -> ControllerInput {
        ControllerInput {
            forward: 1.0,
            ..ControllerInput::default()
        }
    }

    fn settle(player: &mut PlayerController) {
        for _ in 0..200 {
            player.update(&ControllerInput::default(), &walking(), 0.05);
        }
        assert!(player.grounded);
    }

    #[test]
    fn basis_vectors_follow_yaw() {
        let mut player = controller();
        assert!((player.forward() - Vec3::NEG_Z).length() < EPS);
        assert!((player.right() - Vec3::X).length() < EPS);

        player.yaw = std::f32::consts::FRAC_PI_2;
        assert!((player.forward() - Vec3::X).length() < EPS);
        assert!((player.right() - Vec3::Z).length() < EPS);
    }

    #[test]
    fn walking_forward_covers_speed_times_time() {
        let mut player = controller();
        for _ in 0..10 {
            player.update(&forward(), &flying(), 0.1);
        }
        assert!((player.position.z + 80.0).abs() < EPS);
        assert!(player.position.x.abs() < EPS);
    }

    #[test]
    fn sprint_doubles_speed() {
        let mut player = controller();
        let input = ControllerInput {
            sprint: true,
            ..forward()
        };
        player.update(&input, &flying(), 0.5);
        assert!((player.position.z + 80.0).abs() < EPS);
    }

    #[test]
    fn diagonal_is_not_normalised() {
        let mut player = controller();
        let input = ControllerInput {
            forward: 1.0,
            strafe: -1.0,
            ..ControllerInput::default()
        };
        player.update(&input, &flying(), 0.1);
        let horizontal = Vec3::new(player.position.x, 0.0, player.position.z);
        assert!((horizontal.length() - 8.0 * std::f32::consts::SQRT_2).abs() < EPS);
        assert!(player.position.x < 0.0 && player.position.z < 0.0);
    }

    #[test]
    fn wall_collision_slides_along_other_axis() {
        let mut player = controller();
        player.position.x = 315.0;
        player.yaw = std::f32::consts::FRAC_PI_4; // forward = (+x, -z)

        player.update(&forward(), &flying(), 0.5);

        let step = 40.0 * std::f32::consts::FRAC_1_SQRT_2;
        assert_eq!(player.position.x, 320.0);
        assert!((player.position.z + step).abs() < EPS);
    }

    #[test]
    fn corner_clamps_both_axes() {
        let mut player = controller();
        player.position = Vec3::new(-318.0, 0.0, -319.0);
        player.yaw = -std::f32::consts::FRAC_PI_4; // forward = (-x, -z)
        player.update(&forward(), &flying(), 1.0);
        assert_eq!(player.position.x, -320.0);
        assert_eq!(player.position.z, -320.0);
    }

    #[test]
    fn never_leaves_the_room() {
        let mut player = controller();
        let room = *player.room();
        for tick in 0..500 {
            player.yaw = tick as f32 * 0.37;
            let input = ControllerInput {
                sprint: tick % 3 == 0,
                strafe: if tick % 2 == 0 { 1.0 } else { -1.0 },
                ..forward()
            };
            player.update(&input, &walking(), 0.2);
            assert!(room.contains(Axis::X, player.position.x));
            assert!(room.contains(Axis::Z, player.position.z));
            assert!(player.position.y - 10.0 >= room.floor_y - EPS);
        }
    }

    #[test]
    fn gravity_lands_on_floor() {
        let mut player = controller();
        assert!(!player.grounded);
        settle(&mut player);
        assert_eq!(player.position.y, -230.0);
        assert_eq!(player.vertical_velocity, 0.0);
    }

    #[test]
    fn jump_sets_impulse_then_velocity_decreases() {
        let mut player = controller();
        settle(&mut player);

        let jump = ControllerInput {
            jump: true,
            ..ControllerInput::default()
        };
        player.update(&jump, &walking(), 0.01);
        assert_eq!(player.vertical_velocity, 200.0);

        let mut last_v = player.vertical_velocity;
        let mut last_y = player.position.y;
        for _ in 0..5 {
            player.update(&ControllerInput::default(), &walking(), 0.01);
            assert!(player.vertical_velocity < last_v);
            assert!(player.position.y > last_y);
            assert!(!player.grounded);
            last_v = player.vertical_velocity;
            last_y = player.position.y;
        }
    }

    #[test]
    fn no_jump_in_mid_air() {
        let mut player = controller();
        let jump = ControllerInput {
            jump: true,
            ..ControllerInput::default()
        };
        player.update(&jump, &walking(), 0.01);
        assert!(player.vertical_velocity < 0.0);
    }

    #[test]
    fn flight_ascends_at_gravity_rate() {
        let mut player = controller();
        settle(&mut player);
        let ascend = ControllerInput {
            jump: true,
            ..ControllerInput::default()
        };
        for _ in 0..10 {
            player.update(&ascend, &flying(), 0.1);
        }
        assert!((player.position.y - (-230.0 + 200.0)).abs() < EPS);
        assert_eq!(player.vertical_velocity, 0.0);
    }

    #[test]
    fn flight_cancels_falling_velocity() {
        let mut player = controller();
        for _ in 0..3 {
            player.update(&ControllerInput::default(), &walking(), 0.1);
        }
        assert!((player.vertical_velocity + 60.0).abs() < EPS);
        assert!(!player.grounded);

        let ascend = ControllerInput {
            jump: true,
            ..ControllerInput::default()
        };
        let start = player.position.y;
        for _ in 0..5 {
            player.update(&ascend, &flying(), 0.1);
            assert_eq!(player.vertical_velocity, 0.0);
        }
        assert!((player.position.y - start - 100.0).abs() < EPS);
    }

    #[test]
    fn flight_hovers_without_input() {
        let mut player = controller();
        player.update(&ControllerInput::default(), &flying(), 0.5);
        assert_eq!(player.position.y, 0.0);
    }

    #[test]
    fn flight_descends_at_half_gravity_and_stops_at_floor() {
        let mut player = controller();
        let descend = ControllerInput {
            descend: true,
            ..ControllerInput::default()
        };
        player.update(&descend, &flying(), 0.1);
        assert!((player.position.y + 10.0).abs() < EPS);

        for _ in 0..100 {
            player.update(&descend, &flying(), 0.1);
        }
        assert_eq!(player.position.y, -230.0);
        assert!(player.grounded);
    }

    #[test]
    fn mouse_look_only_when_captured() {
        let mut player = controller();
        let look = ControllerInput {
            look_delta: (100.0, 50.0),
            ..ControllerInput::default()
        };
        player.update(&look, &flying(), 0.01);
        assert!((player.yaw - 10f32.to_radians()).abs() < EPS);
        assert!((player.pitch + 5f32.to_radians()).abs() < EPS);

        let toggle = ControllerInput {
            toggle_mouse: true,
            ..look
        };
        player.update(&toggle, &flying(), 0.01);
        assert_eq!(player.mouse_mode, MouseMode::Free);
        assert!((player.yaw - 10f32.to_radians()).abs() < EPS);
    }

    #[test]
    fn pitch_is_clamped() {
        let mut player = controller();
        let look_up = ControllerInput {
            look_delta: (0.0, -10_000.0),
            ..ControllerInput::default()
        };
        player.update(&look_up, &flying(), 0.01);
        assert!((player.pitch - 89f32.to_radians()).abs() < EPS);
        assert!(player.look_direction().y > 0.99);
    }

    #[test]
    fn target_moves_with_position() {
        let mut player = controller();
        let offset = player.target() - player.position;
        player.update(&forward(), &flying(), 0.3);
        assert!(((player.target() - player.position) - offset).length() < EPS);
    }

    #[test]
    fn input_state_maps_to_controller_input() {
        use winit::keyboard::KeyCode;

        let mut state = InputState::new();
        state.process_key_down(KeyCode::KeyW);
        state.process_key_down(KeyCode::KeyA);
        state.process_key_down(KeyCode::Tab);
        state.process_mouse_raw_delta(4.0, -2.0);

        let input = ControllerInput::from_input_state(&state);
        assert_eq!(input.forward, 1.0);
        assert_eq!(input.strafe, -1.0);
        assert!(input.toggle_mouse);
        assert!(!input.sprint);
        assert_eq!(input.look_delta, (4.0, -2.0));
    }
}
