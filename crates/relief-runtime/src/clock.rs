//! Tick clock and frame pacing

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Longest delta a single tick may report, in seconds
const MAX_DELTA: f64 = 0.25;

/// Tracks tick time and the measured tick rate
pub struct GameClock {
    /// Total elapsed time in seconds
    pub total_time: f64,
    /// Time since last tick in seconds
    pub delta_time: f64,
    /// Tick timestamps (in `total_time` seconds) within the last second
    tick_times: VecDeque<f64>,
    fps: f32,
    last_fps_update: f64,
    last_instant: Instant,
    first_tick: bool,
}

impl Default for GameClock {
    fn default() -> Self {
        Self {
            total_time: 0.0,
            delta_time: 0.0,
            tick_times: VecDeque::new(),
            fps: 0.0,
            last_fps_update: 0.0,
            last_instant: Instant::now(),
            first_tick: true,
        }
    }
}

impl GameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the clock from the wall clock. Call once per tick.
    pub fn tick(&mut self) {
        let now = Instant::now();

        if self.first_tick {
            self.first_tick = false;
            self.last_instant = now;
            self.advance(0.0);
            return;
        }

        let elapsed = now.duration_since(self.last_instant).as_secs_f64();
        self.last_instant = now;
        self.advance(elapsed);
    }

    /// Advance the clock by an explicit number of seconds
    pub fn advance(&mut self, elapsed: f64) {
        // Clamp so a stalled capture doesn't fling the player through the floor
        self.delta_time = elapsed.clamp(0.0, MAX_DELTA);
        self.total_time += self.delta_time;

        self.tick_times.push_back(self.total_time);
        let cutoff = self.total_time - 1.0;
        while self.tick_times.front().is_some_and(|&t| t <= cutoff) {
            self.tick_times.pop_front();
        }

        // Update FPS every 250ms
        if self.total_time - self.last_fps_update >= 0.25 {
            self.fps = self.tick_times.len() as f32;
            self.last_fps_update = self.total_time;
        }
    }

    /// Ticks per second over the last second
    pub fn fps(&self) -> f32 {
        self.fps
    }
}

/// Holds the tick rate to a target frame rate (the video's native rate in
/// file mode). An unpaced pacer lets every tick through immediately.
#[derive(Debug, Clone)]
pub struct FramePacer {
    frame_duration: Option<Duration>,
    next_tick: Option<Instant>,
}

impl FramePacer {
    pub fn unpaced() -> Self {
        Self {
            frame_duration: None,
            next_tick: None,
        }
    }

    /// Pace at `fps`; non-positive or non-finite rates mean unpaced
    pub fn with_fps(fps: f64) -> Self {
        if !fps.is_finite() || fps <= 0.0 {
            return Self::unpaced();
        }
        Self {
            frame_duration: Some(Duration::from_secs_f64(1.0 / fps)),
            next_tick: None,
        }
    }

    /// Target rate, if paced
    pub fn target_fps(&self) -> Option<f64> {
        self.frame_duration.map(|d| 1.0 / d.as_secs_f64())
    }

    /// Whether a tick may run at `now`
    pub fn is_due(&self, now: Instant) -> bool {
        self.next_tick.map_or(true, |next| now >= next)
    }

    /// Record a tick at `now` and return the deadline of the next one.
    /// Deadlines advance in whole frames; a tick that ran late restarts the cadence.
    pub fn mark_tick(&mut self, now: Instant) -> Option<Instant> {
        let duration = self.frame_duration?;
        let next = match self.next_tick {
            Some(previous) if previous + duration > now => previous + duration,
            _ => now + duration,
        };
        self.next_tick = Some(next);
        Some(next)
    }

    /// Deadline of the next tick, if paced and started
    pub fn next_tick(&self) -> Option<Instant> {
        self.next_tick
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_defaults() {
        let clock = GameClock::new();
        assert_eq!(clock.total_time, 0.0);
        assert_eq!(clock.delta_time, 0.0);
        assert_eq!(clock.fps(), 0.0);
    }

    #[test]
    fn test_first_tick_zero_delta() {
        let mut clock = GameClock::new();
        clock.tick();
        assert_eq!(clock.delta_time, 0.0);
    }

    #[test]
    fn test_delta_is_clamped() {
        let mut clock = GameClock::new();
        clock.advance(3.0);
        assert_eq!(clock.delta_time, MAX_DELTA);
        clock.advance(-1.0);
        assert_eq!(clock.delta_time, 0.0);
    }

    #[test]
    fn test_fps_counts_last_second() {
        let mut clock = GameClock::new();
        for _ in 0..120 {
            clock.advance(1.0 / 30.0);
        }
        assert!((clock.fps() - 30.0).abs() <= 1.0, "fps = {}", clock.fps());
    }

    #[test]
    fn test_unpaced_always_due() {
        let mut pacer = FramePacer::unpaced();
        let now = Instant::now();
        assert!(pacer.is_due(now));
        assert_eq!(pacer.mark_tick(now), None);
        assert!(pacer.is_due(now));
        assert_eq!(FramePacer::with_fps(0.0).target_fps(), None);
        assert_eq!(FramePacer::with_fps(f64::NAN).target_fps(), None);
    }

    #[test]
    fn test_paced_deadlines_advance_in_whole_frames() {
        let mut pacer = FramePacer::with_fps(25.0);
        let frame = Duration::from_millis(40);
        let start = Instant::now();

        let first = pacer.mark_tick(start).unwrap();
        assert_eq!(first, start + frame);
        assert!(!pacer.is_due(start + Duration::from_millis(10)));
        assert!(pacer.is_due(first));

        // Slightly late tick keeps the original cadence
        let second = pacer.mark_tick(first + Duration::from_millis(5)).unwrap();
        assert_eq!(second, start + frame * 2);

        // Far behind: restart from now
        let late = second + Duration::from_millis(200);
        assert_eq!(pacer.mark_tick(late).unwrap(), late + frame);
    }
}
