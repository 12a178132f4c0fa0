//! Board layout: the staggered peg grid and the row of bins

use glam::Vec2;

use super::state::{Bin, Peg};
use crate::config::BoardConfig;
use crate::consts::{BIN_FLOOR_OFFSET, DIGIT_SLOTS, MAX_PEG_GRID};

/// Staggered peg grid; odd rows are shifted right by half a column pitch
pub fn build_pegs(config: &BoardConfig) -> Vec<Peg> {
    let (pitch_x, pitch_y) = config.peg_pitch();

    let capacity = (config.peg_rows as usize)
        .checked_mul(config.peg_cols as usize)
        .unwrap_or(0)
        .min((MAX_PEG_GRID * MAX_PEG_GRID) as usize);
    let mut pegs = Vec::with_capacity(capacity);
    for row in 0..config.peg_rows {
        let stagger = if row % 2 == 1 { pitch_x / 2.0 } else { 0.0 };
        let y = (row + 1) as f32 * pitch_y;
        for col in 0..config.peg_cols {
            let x = config.peg_offset_x + (col + 1) as f32 * pitch_x + stagger;
            pegs.push(Peg {
                pos: Vec2::new(x, y),
                radius: config.peg_radius,
            });
        }
    }
    pegs
}

/// One bin per digit slot, evenly dividing the floor
pub fn build_bins(config: &BoardConfig) -> Vec<Bin> {
    let slot_width = config.width / DIGIT_SLOTS as f32;
    (0..DIGIT_SLOTS)
        .map(|i| Bin {
            center: Vec2::new(
                i as f32 * slot_width + slot_width / 2.0,
                config.height - BIN_FLOOR_OFFSET,
            ),
            width: slot_width - config.bin_gap,
            height: config.bin_height,
            filled: false,
        })
        .collect()
}

/// Index of the bin whose span contains `x`
pub fn bin_index_at(bins: &[Bin], x: f32) -> Option<usize> {
    bins.iter().position(|b| b.spans(x))
}
