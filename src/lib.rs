//! Plinko Dial - a peg-board phone number entry toy
//!
//! Core modules:
//! - `sim`: Deterministic simulation (stepper, collisions, board state, commands)
//! - `config`: Data-driven board layout and physics tuning
//! - `platform`: Frame clock and the browser bindings
//! - `error`: Error types for commands and configuration

pub mod config;
pub mod error;
pub mod platform;
pub mod sim;

pub use config::BoardConfig;
pub use error::{ConfigError, DropError};

/// Board and physics constants (defaults for [`BoardConfig`])
pub mod consts {
    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta the clock will accept (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;
    /// Frame period the air drag coefficient is expressed against
    pub const DRAG_REFERENCE_DT: f32 = 1.0 / 60.0;

    /// Number of digit slots (and bins) in a phone number
    pub const DIGIT_SLOTS: usize = 10;

    /// Play field dimensions
    pub const FIELD_WIDTH: f32 = 480.0;
    pub const FIELD_HEIGHT: f32 = 640.0;

    /// Peg grid
    pub const PEG_COLS: u32 = 12;
    pub const PEG_ROWS: u32 = 12;
    pub const PEG_RADIUS: f32 = 9.0;
    /// Largest accepted peg column or row count
    pub const MAX_PEG_GRID: u32 = 256;
    /// Horizontal shift of the whole grid so balls don't get stuck on the walls
    pub const PEG_OFFSET_X: f32 = -70.0;
    /// Extra horizontal spacing added to the even column pitch
    pub const PEG_EXTRA_SPACING: f32 = 20.0;
    /// Vertical space reserved for the bins below the grid
    pub const PEG_FLOOR_CLEARANCE: f32 = 60.0;

    /// Bins
    pub const BIN_HEIGHT: f32 = 20.0;
    /// Horizontal gap between neighbouring bins
    pub const BIN_GAP: f32 = 4.0;
    /// Distance from field floor to bin centre
    pub const BIN_FLOOR_OFFSET: f32 = 10.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 12.0;
    /// Spawn height of a freshly dropped ball
    pub const DROP_HEIGHT: f32 = 20.0;

    /// Downward acceleration (pixels/s²)
    pub const GRAVITY: f32 = 800.0;
    /// Velocity retained after a bounce
    pub const RESTITUTION: f32 = 0.8;
    /// Horizontal velocity lost per reference frame
    pub const AIR_FRICTION: f32 = 0.02;
    /// Extra separation applied when pushing a ball out of a peg
    pub const SEPARATION_EPSILON: f32 = 0.1;
}
