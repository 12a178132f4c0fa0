//! Deterministic simulation module
//!
//! All board logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod commands;
pub mod layout;
pub mod state;
pub mod tick;

pub use collision::{CollisionResult, ball_peg_collision, reflect_velocity};
pub use layout::{bin_index_at, build_bins, build_pegs};
pub use state::{
    Ball, BallState, Bin, BoardEvent, Digit, DigitSlots, Peg, RngState, SimState, Undone,
};
pub use tick::{step, tick};
