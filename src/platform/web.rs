//! Browser bindings
//!
//! JS owns a [`PlinkoBoard`], calls the command methods from its button
//! handlers and `frame` from `requestAnimationFrame`. Drawing stays on the JS
//! side; `ball_positions` and `filled_bins` expose what it needs.

use wasm_bindgen::prelude::*;

use crate::config::BoardConfig;
use crate::platform::FrameClock;
use crate::sim::{BoardEvent, SimState};

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    // A second init (hot reload) is harmless
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("Plinko Dial starting...");
}

#[wasm_bindgen]
pub struct PlinkoBoard {
    state: SimState,
    clock: FrameClock,
}

impl PlinkoBoard {
    fn with_config(config: BoardConfig) -> Result<PlinkoBoard, JsValue> {
        config
            .validate()
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        let seed = js_sys::Date::now() as u64;
        log::info!("Board initialized with seed: {}", seed);
        Ok(Self {
            state: SimState::with_config(config, seed),
            clock: FrameClock::new(),
        })
    }
}

#[wasm_bindgen]
impl PlinkoBoard {
    /// Stock board of the given size, seeded from the clock
    #[wasm_bindgen(constructor)]
    pub fn new(width: f32, height: f32) -> Result<PlinkoBoard, JsValue> {
        Self::with_config(BoardConfig::with_size(width, height))
    }

    /// Board from a JSON config
    #[wasm_bindgen(js_name = fromJson)]
    pub fn from_json(json: &str) -> Result<PlinkoBoard, JsValue> {
        let config = BoardConfig::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Self::with_config(config)
    }

    /// Drop a ball for the typed digit; throws a user-facing message on bad input
    #[wasm_bindgen(js_name = dropDigit)]
    pub fn drop_digit(&mut self, input: &str) -> Result<u32, JsValue> {
        self.state
            .drop_digit(input)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Returns false when there was nothing to undo
    pub fn undo(&mut self) -> bool {
        self.state.undo().is_some()
    }

    pub fn restart(&mut self) {
        self.state.restart();
        self.clock.reset();
    }

    /// Current number as `DDD-DDD-DDDD` with `_` for empty slots
    pub fn enter(&self) -> String {
        self.state.enter().to_string()
    }

    /// Same text as [`Self::enter`] without logging, for the live display
    pub fn display(&self) -> String {
        self.state.slots.to_string()
    }

    /// Advance to `timestamp_ms`; returns the bins filled during this frame
    pub fn frame(&mut self, timestamp_ms: f64) -> Vec<u32> {
        self.clock
            .advance(&mut self.state, timestamp_ms)
            .into_iter()
            .filter_map(|event| match event {
                BoardEvent::BinFilled { bin, .. } => Some(bin as u32),
                BoardEvent::BallLost { .. } => None,
            })
            .collect()
    }

    /// Flat `[x, y, digit, ...]` triples for every live ball
    #[wasm_bindgen(js_name = ballPositions)]
    pub fn ball_positions(&self) -> Vec<f32> {
        self.state
            .balls
            .iter()
            .flat_map(|b| [b.pos.x, b.pos.y, b.digit.value() as f32])
            .collect()
    }

    /// Flat `[x, y, radius, ...]` triples for every peg
    pub fn pegs(&self) -> Vec<f32> {
        self.state
            .pegs
            .iter()
            .flat_map(|p| [p.pos.x, p.pos.y, p.radius])
            .collect()
    }

    /// One byte per bin, 1 when filled
    #[wasm_bindgen(js_name = filledBins)]
    pub fn filled_bins(&self) -> Vec<u8> {
        self.state.bins.iter().map(|b| b.filled as u8).collect()
    }
}
