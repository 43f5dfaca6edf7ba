//! Live-adjustable session controls

use relief_core::config::MAX_HEIGHT_LIMIT;

/// Values the overlay widgets change while the session runs. Read once per tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LiveControls {
    /// Terrain elevation scale in [0, 480]
    pub max_height: f32,
    /// Whether flight is enabled
    pub can_fly: bool,
}

impl LiveControls {
    pub fn new(max_height: f32) -> Self {
        Self {
            max_height: max_height.clamp(0.0, MAX_HEIGHT_LIMIT),
            can_fly: false,
        }
    }

    pub fn set_max_height(&mut self, max_height: f32) {
        self.max_height = max_height.clamp(0.0, MAX_HEIGHT_LIMIT);
    }
}

impl Default for LiveControls {
    fn default() -> Self {
        Self::new(80.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let controls = LiveControls::default();
        assert_eq!(controls.max_height, 80.0);
        assert!(!controls.can_fly);
    }

    #[test]
    fn max_height_is_clamped() {
        let mut controls = LiveControls::new(1000.0);
        assert_eq!(controls.max_height, MAX_HEIGHT_LIMIT);
        controls.set_max_height(-5.0);
        assert_eq!(controls.max_height, 0.0);
        controls.set_max_height(240.0);
        assert_eq!(controls.max_height, 240.0);
    }
}
