//! Per-frame state that does not depend on a GL context.

use std::cell::Cell;
use std::rc::Rc;

/// Seconds since start, shifted by a per-instance seed so instances sharing a
/// clock still animate differently.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderClock {
    seed: f64,
    origin_ms: f64,
}

impl RenderClock {
    pub fn new(seed: f64, origin_ms: f64) -> Self {
        Self { seed, origin_ms }
    }

    pub fn seed(&self) -> f64 {
        self.seed
    }

    /// Value for `iTime` at timestamp `now_ms` (same time base as `origin_ms`).
    pub fn time(&self, now_ms: f64) -> f32 {
        ((now_ms - self.origin_ms) / 1000.0 + self.seed) as f32
    }
}

/// Pointer position normalised by the window size. Not clamped: positions
/// outside the viewport may leave `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerPosition {
    pub x: f32,
    pub y: f32,
}

impl Default for PointerPosition {
    fn default() -> Self {
        Self { x: 0.5, y: 0.5 }
    }
}

impl PointerPosition {
    /// `None` when the window has no area to normalise against.
    pub fn from_client(client_x: f64, client_y: f64, width: f64, height: f64) -> Option<Self> {
        if width <= 0.0 || height <= 0.0 {
            return None;
        }
        Some(Self {
            x: (client_x / width) as f32,
            y: (client_y / height) as f32,
        })
    }
}

/// Shared pointer slot written by the pointer observer and read each frame.
#[derive(Debug, Clone, Default)]
pub struct PointerTracker(Rc<Cell<PointerPosition>>);

impl PointerTracker {
    pub fn get(&self) -> PointerPosition {
        self.0.get()
    }

    pub fn observe(&self, client_x: f64, client_y: f64, width: f64, height: f64) {
        if let Some(position) = PointerPosition::from_client(client_x, client_y, width, height) {
            self.0.set(position);
        }
    }
}

/// Cloneable stop signal for a [`FrameLoop`].
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Rc<Cell<bool>>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

/// Runs a frame callback once per tick until its token is cancelled.
///
/// In the browser each tick comes from `requestAnimationFrame`; tests call
/// [`tick`](Self::tick) directly.
pub struct FrameLoop<F> {
    frame: F,
    token: CancelToken,
    frames: u64,
}

impl<F: FnMut(f64)> FrameLoop<F> {
    pub fn new(frame: F, token: CancelToken) -> Self {
        Self {
            frame,
            token,
            frames: 0,
        }
    }

    /// Renders one frame at `now_ms`. Returns `false` once cancelled, in
    /// which case nothing is rendered and no further tick should be scheduled.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        if self.token.is_cancelled() {
            return false;
        }
        (self.frame)(now_ms);
        self.frames += 1;
        true
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn token(&self) -> &CancelToken {
        &self.token
    }
}
