//! Turns host frame timestamps into fixed simulation substeps

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};
use crate::sim::{BoardEvent, SimState, tick};

/// Fixed-timestep accumulator driven by the host's animation callback
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    accumulator: f32,
    last_time_ms: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the previous timestamp (after a restart or a hidden tab)
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
        self.last_time_ms = None;
    }

    /// Step `state` up to the frame at `timestamp_ms`
    ///
    /// The first frame only records the timestamp. Long frames are clamped to
    /// `MAX_FRAME_DT` and at most `MAX_SUBSTEPS` ticks run per call. A
    /// non-finite timestamp is skipped entirely.
    pub fn advance(&mut self, state: &mut SimState, timestamp_ms: f64) -> Vec<BoardEvent> {
        if !timestamp_ms.is_finite() {
            log::warn!("Ignoring non-finite frame timestamp {timestamp_ms}");
            return Vec::new();
        }
        let dt = match self.last_time_ms {
            Some(last) => {
                let dt = ((timestamp_ms - last) / 1000.0) as f32;
                if dt.is_finite() { dt.clamp(0.0, MAX_FRAME_DT) } else { 0.0 }
            }
            None => 0.0,
        };
        self.last_time_ms = Some(timestamp_ms);
        self.accumulator += dt;

        let mut events = Vec::new();
        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            events.extend(tick(state, SIM_DT));
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        if substeps == MAX_SUBSTEPS {
            // Drop the backlog rather than spiral
            self.accumulator = self.accumulator.min(SIM_DT);
        }
        events
    }
}
