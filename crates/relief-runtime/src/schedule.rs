//! Capture cadence

/// Decides on which ticks a new frame is captured.
///
/// An interval of 0 captures every tick; otherwise a capture happens once at
/// least `interval` seconds have passed since the previous one. The first
/// tick always captures.
#[derive(Debug, Clone)]
pub struct CaptureSchedule {
    interval: f64,
    last_capture: Option<f64>,
}

impl CaptureSchedule {
    pub fn new(interval: f64) -> Self {
        Self {
            interval: interval.max(0.0),
            last_capture: None,
        }
    }

    pub fn interval(&self) -> f64 {
        self.interval
    }

    /// Whether the tick at `now` (seconds) should capture; records the capture if so
    pub fn should_capture(&mut self, now: f64) -> bool {
        let due = match self.last_capture {
            None => true,
            Some(_) if self.interval == 0.0 => true,
            Some(last) => now - last >= self.interval,
        };
        if due {
            log::debug!("Capture due at {:.3}s", now);
            self.last_capture = Some(now);
        }
        due
    }
}
