//! Input state management

use std::collections::{HashMap, HashSet};
use winit::keyboard::KeyCode;

/// Tracks keyboard and mouse input state per tick
pub struct InputState {
    /// Keys currently held down
    keys_down: HashSet<KeyCode>,
    /// Keys pressed this tick
    keys_just_pressed: HashSet<KeyCode>,

    /// Raw accumulated mouse delta (device motion)
    raw_mouse_delta: (f64, f64),

    /// Action map: action name -> list of key bindings
    action_map: HashMap<String, Vec<KeyCode>>,
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

impl InputState {
    pub fn new() -> Self {
        Self {
            keys_down: HashSet::new(),
            keys_just_pressed: HashSet::new(),
            raw_mouse_delta: (0.0, 0.0),
            action_map: Self::default_action_map(),
        }
    }

    fn default_action_map() -> HashMap<String, Vec<KeyCode>> {
        let mut map = HashMap::new();
        map.insert("move_forward".into(), vec![KeyCode::KeyW]);
        map.insert("move_backward".into(), vec![KeyCode::KeyS]);
        map.insert("move_left".into(), vec![KeyCode::KeyA]);
        map.insert("move_right".into(), vec![KeyCode::KeyD]);
        map.insert("sprint".into(), vec![KeyCode::ShiftLeft]);
        // Space jumps on foot and ascends while flying
        map.insert("jump".into(), vec![KeyCode::Space]);
        map.insert("descend".into(), vec![KeyCode::ControlLeft]);
        map.insert("toggle_mouse".into(), vec![KeyCode::Tab]);
        map.insert("quit".into(), vec![KeyCode::Escape]);
        map
    }

    /// Bind an action to one or more keys
    pub fn bind_action(&mut self, action: impl Into<String>, keys: Vec<KeyCode>) {
        self.action_map.insert(action.into(), keys);
    }

    /// Process a key press event
    pub fn process_key_down(&mut self, key: KeyCode) {
        if !self.keys_down.contains(&key) {
            self.keys_just_pressed.insert(key);
        }
        self.keys_down.insert(key);
    }

    /// Process a key release event
    pub fn process_key_up(&mut self, key: KeyCode) {
        self.keys_down.remove(&key);
    }

    /// Process raw mouse delta (device motion, for locked cursor)
    pub fn process_mouse_raw_delta(&mut self, dx: f64, dy: f64) {
        self.raw_mouse_delta.0 += dx;
        self.raw_mouse_delta.1 += dy;
    }

    /// Forget held keys, e.g. when the window loses focus and releases go unseen
    pub fn release_all(&mut self) {
        self.keys_down.clear();
    }

    /// Call at end of tick to clear per-tick state
    pub fn end_frame(&mut self) {
        self.keys_just_pressed.clear();
        self.raw_mouse_delta = (0.0, 0.0);
    }

    // --- Query methods ---

    /// Is a key currently held down?
    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.keys_down.contains(&key)
    }

    /// Was a key pressed this tick?
    pub fn is_key_just_pressed(&self, key: KeyCode) -> bool {
        self.keys_just_pressed.contains(&key)
    }

    /// Is an action currently held? (any bound key is down)
    pub fn is_action_pressed(&self, action: &str) -> bool {
        self.action_map
            .get(action)
            .is_some_and(|keys| keys.iter().any(|k| self.keys_down.contains(k)))
    }

    /// Was an action just pressed this tick?
    pub fn is_action_just_pressed(&self, action: &str) -> bool {
        self.action_map
            .get(action)
            .is_some_and(|keys| keys.iter().any(|k| self.keys_just_pressed.contains(k)))
    }

    /// 1.0 if only `positive` is held, -1.0 if only `negative`, else 0.0
    pub fn axis(&self, positive: &str, negative: &str) -> f32 {
        let p = self.is_action_pressed(positive) as i8;
        let n = self.is_action_pressed(negative) as i8;
        (p - n) as f32
    }

    /// Get the raw mouse delta (accumulated device motion)
    pub fn raw_mouse_delta(&self) -> (f64, f64) {
        self.raw_mouse_delta
    }
}
