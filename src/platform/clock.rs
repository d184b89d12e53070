//! Frame pacing and fixed-step accumulation

use std::time::{Duration, Instant};

/// Longest frame gap fed into the accumulator
const MAX_FRAME_TIME: Duration = Duration::from_millis(100);

/// Frames averaged by `FpsCounter`
const FPS_WINDOW: usize = 60;

/// Fixed timestep accumulator
#[derive(Debug, Clone)]
pub struct FrameClock {
    step: Duration,
    max_substeps: u32,
    accumulator: Duration,
    last: Option<Instant>,
}

impl FrameClock {
    /// Clock stepping every `dt` seconds
    pub fn new(dt: f32, max_substeps: u32) -> Self {
        Self::with_step(Duration::from_secs_f32(dt), max_substeps)
    }

    pub fn with_step(step: Duration, max_substeps: u32) -> Self {
        Self {
            step: step.max(Duration::from_nanos(1)),
            max_substeps: max_substeps.max(1),
            accumulator: Duration::ZERO,
            last: None,
        }
    }

    /// Account for the time since the previous frame and return how many
    /// simulation steps to run now.
    pub fn advance(&mut self, now: Instant) -> u32 {
        let elapsed = match self.last.replace(now) {
            Some(prev) => now.saturating_duration_since(prev).min(MAX_FRAME_TIME),
            // First frame runs exactly one step
            None => self.step,
        };
        self.accumulator += elapsed;

        let mut substeps = 0;
        while self.accumulator >= self.step && substeps < self.max_substeps {
            self.accumulator -= self.step;
            substeps += 1;
        }
        if self.accumulator >= self.step {
            // Too far behind, let it go
            self.accumulator = Duration::ZERO;
        }
        substeps
    }

    /// When the next frame is due
    pub fn next_deadline(&self, now: Instant) -> Instant {
        match self.last {
            Some(last) => (last + self.step).max(now),
            None => now,
        }
    }
}

/// Frames per second over a sliding window
#[derive(Debug, Clone)]
pub struct FpsCounter {
    frame_times: [Option<Instant>; FPS_WINDOW],
    frame_index: usize,
    fps: u32,
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self {
            frame_times: [None; FPS_WINDOW],
            frame_index: 0,
            fps: 0,
        }
    }
}

impl FpsCounter {
    /// Record a presented frame
    pub fn frame(&mut self, now: Instant) {
        // The slot about to be overwritten is the oldest sample
        if let Some(oldest) = self.frame_times[self.frame_index] {
            let elapsed = now.saturating_duration_since(oldest).as_secs_f64();
            if elapsed > 0.0 {
                self.fps = (FPS_WINDOW as f64 / elapsed).round() as u32;
            }
        }
        self.frame_times[self.frame_index] = Some(now);
        self.frame_index = (self.frame_index + 1) % FPS_WINDOW;
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_first_frame_runs_one_step() {
        let mut clock = FrameClock::new(1.0 / 60.0, 4);
        assert_eq!(clock.advance(Instant::now()), 1);
    }

    #[test]
    fn test_steady_rate() {
        let mut clock = FrameClock::with_step(ms(20), 4);
        let start = Instant::now();
        clock.advance(start);
        assert_eq!(clock.advance(start + ms(20)), 1);
        assert_eq!(clock.advance(start + ms(30)), 0);
        assert_eq!(clock.advance(start + ms(40)), 1);
        assert_eq!(clock.advance(start + ms(80)), 2);
    }

    #[test]
    fn test_substeps_capped_and_backlog_dropped() {
        let mut clock = FrameClock::with_step(ms(10), 4);
        let start = Instant::now();
        clock.advance(start);
        // 100 ms is 10 steps; only 4 run and the rest is discarded
        assert_eq!(clock.advance(start + ms(100)), 4);
        assert_eq!(clock.advance(start + ms(100)), 0);
    }

    #[test]
    fn test_long_stall_clamped() {
        let mut clock = FrameClock::with_step(ms(100), 100);
        let start = Instant::now();
        clock.advance(start);
        // A 5 s hitch counts as 100 ms, one step at 10 Hz
        assert_eq!(clock.advance(start + Duration::from_secs(5)), 1);
    }

    #[test]
    fn test_deadline() {
        let mut clock = FrameClock::with_step(ms(20), 4);
        let start = Instant::now();
        assert_eq!(clock.next_deadline(start), start);
        clock.advance(start);
        assert_eq!(clock.next_deadline(start), start + ms(20));
        // Already late: due now
        assert_eq!(clock.next_deadline(start + ms(50)), start + ms(50));
    }

    #[test]
    fn test_fps_counter() {
        let mut fps = FpsCounter::default();
        let start = Instant::now();
        for i in 0..=FPS_WINDOW as u64 {
            fps.frame(start + ms(i * 20));
        }
        assert_eq!(fps.fps(), 50);
    }

    #[test]
    fn test_step_follows_settings_rate() {
        let settings = crate::settings::Settings {
            target_fps: 20,
            ..Default::default()
        };
        let mut clock = FrameClock::new(settings.sim_dt(), 4);
        let start = Instant::now();
        clock.advance(start);
        assert_eq!(clock.advance(start + ms(49)), 0);
        assert_eq!(clock.advance(start + ms(80)), 1);
    }
}
