//! Frame counting and FPS.
//!
//! The field advances a fixed amount per frame, so time is only used for
//! diagnostics: how many ticks have run and how fast they are coming.
//!
//! ```ignore
//! let mut time = Time::new();
//! // once per tick:
//! if time.tick() {
//!     log::debug!("{:.1} fps", time.fps());
//! }
//! ```

use std::time::{Duration, Instant};

/// Tick counter with a periodically refreshed FPS estimate.
#[derive(Debug)]
pub struct Time {
    /// When the timer was created.
    start: Instant,
    /// Total ticks since start.
    frame_count: u64,
    /// Calculated FPS (updated periodically).
    fps: f32,
    /// Frame count at last FPS update.
    fps_frame_count: u64,
    /// Time of last FPS calculation.
    fps_update_time: Instant,
    /// How often to update FPS calculation.
    fps_update_interval: Duration,
}

impl Time {
    /// Create a new time tracker starting from now.
    pub fn new() -> Self {
        Self::with_interval(Duration::from_secs(5))
    }

    /// Tracker that refreshes its FPS estimate every `interval`.
    pub fn with_interval(interval: Duration) -> Self {
        let now = Instant::now();
        Self {
            start: now,
            frame_count: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_update_time: now,
            fps_update_interval: interval,
        }
    }

    /// Count one tick. Returns `true` when the FPS estimate was refreshed.
    pub fn tick(&mut self) -> bool {
        let now = Instant::now();
        self.frame_count += 1;

        let fps_elapsed = now.duration_since(self.fps_update_time);
        if fps_elapsed < self.fps_update_interval {
            return false;
        }

        let frames_since = self.frame_count - self.fps_frame_count;
        self.fps = frames_since as f32 / fps_elapsed.as_secs_f32().max(f32::EPSILON);
        self.fps_frame_count = self.frame_count;
        self.fps_update_time = now;
        true
    }

    /// Total ticks since start.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    /// Last FPS estimate; zero until the first refresh.
    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Time since the tracker was created.
    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_time_new() {
        let time = Time::new();
        assert_eq!(time.frame(), 0);
        assert_eq!(time.fps(), 0.0);
    }

    #[test]
    fn test_tick_counts_frames() {
        let mut time = Time::new();
        for _ in 0..3 {
            time.tick();
        }
        assert_eq!(time.frame(), 3);
    }

    #[test]
    fn test_elapsed_advances() {
        let time = Time::new();
        thread::sleep(Duration::from_millis(20));
        assert!(time.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn test_fps_refresh() {
        let mut time = Time::with_interval(Duration::from_millis(200));
        assert!(!time.tick());
        thread::sleep(Duration::from_millis(250));
        assert!(time.tick());
        assert!(time.fps() > 0.0);
    }
}
