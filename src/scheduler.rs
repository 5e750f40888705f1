//! Frame pacing
//!
//! The host delivers frame callbacks at whatever rate it likes. Each frame
//! that arrives at least `MIN_FRAME_INTERVAL_MS` after the last accepted one
//! runs exactly one simulation tick; faster frames are skipped. There is no
//! catch-up, so slow hosts simply run the game slower.

use std::cell::Cell;
use std::time::Instant;

use crate::consts::MIN_FRAME_INTERVAL_MS;

/// Source of frame timestamps in milliseconds
pub trait Clock {
    fn now_ms(&self) -> f64;
}

/// Wall clock measured from construction
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// Clock advanced by hand, for tests and headless replays
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<f64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, ms: f64) {
        self.now.set(self.now.get() + ms);
    }

    pub fn set(&self, ms: f64) {
        self.now.set(ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}

/// Decides which frames run a tick
#[derive(Debug, Clone)]
pub struct FrameScheduler {
    last_frame_ms: f64,
    min_interval_ms: f64,
    running: bool,
    ticks_run: u64,
    frames_skipped: u64,
}

impl Default for FrameScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::with_interval(MIN_FRAME_INTERVAL_MS)
    }

    pub fn with_interval(min_interval_ms: f64) -> Self {
        Self {
            last_frame_ms: 0.0,
            min_interval_ms,
            running: true,
            ticks_run: 0,
            frames_skipped: 0,
        }
    }

    /// Whether a frame arriving at `now_ms` should run a tick
    pub fn poll(&mut self, now_ms: f64) -> bool {
        if !self.running {
            return false;
        }
        if now_ms - self.last_frame_ms > self.min_interval_ms {
            self.last_frame_ms = now_ms;
            self.ticks_run += 1;
            true
        } else {
            self.frames_skipped += 1;
            false
        }
    }

    /// Handle one frame: runs `step` once if the frame is accepted
    pub fn frame<C: Clock>(&mut self, clock: &C, step: impl FnOnce()) -> bool {
        let accepted = self.poll(clock.now_ms());
        if accepted {
            step();
        }
        accepted
    }

    /// Stop scheduling ticks. Frames after this never run a step.
    pub fn stop(&mut self) {
        if self.running {
            log::debug!(
                "Frame scheduler stopped after {} ticks ({} frames skipped)",
                self.ticks_run,
                self.frames_skipped
            );
        }
        self.running = false;
    }

    /// Resume scheduling, treating `now_ms` as the last accepted frame
    pub fn restart(&mut self, now_ms: f64) {
        self.running = true;
        self.last_frame_ms = now_ms;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn ticks_run(&self) -> u64 {
        self.ticks_run
    }

    pub fn frames_skipped(&self) -> u64 {
        self.frames_skipped
    }
}
