use tracing::warn;

/// Maximum simulation step in seconds. Caps integration error when frames
/// stall (backgrounded window, debugger pauses).
pub const MAX_FRAME_DT: f64 = 0.05;

/// Supplies a clamped delta-time for each simulation step.
///
/// The first call establishes the baseline and yields dt = 0. Negative
/// clock jumps never propagate as negative motion.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameClock {
    last_ms: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance to `now_ms` and return the step in seconds, in [0, 0.05].
    pub fn tick(&mut self, now_ms: f64) -> f32 {
        if !now_ms.is_finite() {
            warn!(now_ms, "Ignoring non-finite frame timestamp");
            return 0.0;
        }

        let dt = match self.last_ms {
            Some(last) => ((now_ms - last) / 1000.0).clamp(0.0, MAX_FRAME_DT),
            None => 0.0,
        };
        self.last_ms = Some(now_ms);
        dt as f32
    }
}
