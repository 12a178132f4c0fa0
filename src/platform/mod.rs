//! Platform abstraction layer
//!
//! Handles host differences for:
//! - Frame timing (`clock`)
//! - Browser bindings (`web`, wasm32 only)

pub mod clock;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use clock::FrameClock;
