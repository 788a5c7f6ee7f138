//! Time Manager
//!
//! Platform-agnostic frame timing plus the fixed-timestep accumulator.
//! - Native: Uses std::time::Instant
//! - WASM: Uses web_sys::window().performance().now()

/// Fixed timestep for game logic updates (60 Hz).
pub const FIXED_TIMESTEP: f32 = 1.0 / 60.0;

/// Maximum frame time to prevent spiral of death.
/// If a frame takes longer than this, accumulated time is capped.
pub const MAX_FRAME_TIME: f32 = 0.25;

#[cfg(not(target_arch = "wasm32"))]
type Instant = std::time::Instant;

#[cfg(target_arch = "wasm32")]
type Instant = f64;

#[cfg(not(target_arch = "wasm32"))]
fn now() -> Instant {
    std::time::Instant::now()
}

#[cfg(target_arch = "wasm32")]
fn now() -> Instant {
    // performance.now() in milliseconds; 0.0 if the page has no timing API
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

/// Seconds between two instants.
#[cfg(not(target_arch = "wasm32"))]
fn duration_since(start: Instant, end: Instant) -> f64 {
    end.duration_since(start).as_secs_f64()
}

#[cfg(target_arch = "wasm32")]
fn duration_since(start: Instant, end: Instant) -> f64 {
    (end - start) / 1000.0
}

// ============================================================================
// Frame Time
// ============================================================================

/// Wall-clock frame timing.
pub struct Time {
    last_frame: Instant,
    /// Time elapsed since the last frame (in seconds).
    delta_time: f32,
    /// Smoothed frames per second.
    fps: f32,
}

impl Time {
    pub fn new() -> Self {
        Self {
            last_frame: now(),
            delta_time: 0.0,
            fps: 0.0,
        }
    }

    /// Call once per frame.
    pub fn update(&mut self) {
        let current = now();
        self.delta_time = duration_since(self.last_frame, current) as f32;
        self.last_frame = current;

        if self.delta_time > 0.0 {
            let instant_fps = 1.0 / self.delta_time;
            self.fps = if self.fps == 0.0 {
                instant_fps
            } else {
                self.fps * 0.9 + instant_fps * 0.1
            };
        }
    }

    #[inline]
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Fixed Step
// ============================================================================

/// Accumulator turning variable frame deltas into whole fixed steps.
#[derive(Debug, Default)]
pub struct FixedStep {
    accumulator: f32,
}

impl FixedStep {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a frame's delta (capped at `MAX_FRAME_TIME`) and returns how many
    /// fixed updates to run now.
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt.clamp(0.0, MAX_FRAME_TIME);

        let mut steps = 0;
        while self.accumulator >= FIXED_TIMESTEP {
            self.accumulator -= FIXED_TIMESTEP;
            steps += 1;
        }
        steps
    }
}
