//! Mouse capture state

/// Whether mouse motion drives the camera
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MouseMode {
    /// Cursor hidden and grabbed; motion rotates the view
    #[default]
    Captured,
    /// Cursor visible for the overlay widgets; motion is ignored
    Free,
}

impl MouseMode {
    pub fn toggled(self) -> Self {
        match self {
            MouseMode::Captured => MouseMode::Free,
            MouseMode::Free => MouseMode::Captured,
        }
    }

    pub fn is_captured(self) -> bool {
        self == MouseMode::Captured
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_captured_and_toggles() {
        let mode = MouseMode::default();
        assert!(mode.is_captured());
        assert_eq!(mode.toggled(), MouseMode::Free);
        assert_eq!(mode.toggled().toggled(), MouseMode::Captured);
    }
}
