//! Board layout and physics tuning
//!
//! Loaded from JSON when the host wants something other than the stock board.
//! Missing fields fall back to the defaults in [`crate::consts`].

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{ConfigError, Result};

/// Board layout and physics parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    // === Field ===
    /// Play field width (pixels)
    pub width: f32,
    /// Play field height (pixels)
    pub height: f32,

    // === Pegs ===
    pub peg_cols: u32,
    pub peg_rows: u32,
    pub peg_radius: f32,
    /// Horizontal shift applied to every peg
    pub peg_offset_x: f32,
    /// Added to the even column pitch `width / (cols + 1)`
    pub peg_extra_spacing: f32,
    /// Space below the last row kept free for the bins
    pub peg_floor_clearance: f32,

    // === Bins ===
    pub bin_height: f32,
    pub bin_gap: f32,

    // === Balls ===
    pub ball_radius: f32,
    pub drop_height: f32,

    // === Physics ===
    /// Downward acceleration (pixels/s²)
    pub gravity: f32,
    /// Velocity retained after a bounce (0.0 - 1.0)
    pub restitution: f32,
    /// Horizontal velocity fraction lost per 60 Hz frame (0.0 - 1.0)
    pub air_friction: f32,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            width: FIELD_WIDTH,
            height: FIELD_HEIGHT,

            peg_cols: PEG_COLS,
            peg_rows: PEG_ROWS,
            peg_radius: PEG_RADIUS,
            peg_offset_x: PEG_OFFSET_X,
            peg_extra_spacing: PEG_EXTRA_SPACING,
            peg_floor_clearance: PEG_FLOOR_CLEARANCE,

            bin_height: BIN_HEIGHT,
            bin_gap: BIN_GAP,

            ball_radius: BALL_RADIUS,
            drop_height: DROP_HEIGHT,

            gravity: GRAVITY,
            restitution: RESTITUTION,
            air_friction: AIR_FRICTION,
        }
    }
}

impl BoardConfig {
    /// Config for a board of the given size, everything else stock
    pub fn with_size(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check that the parameters describe a playable board
    pub fn validate(&self) -> Result<()> {
        fn positive(name: &str, value: f32) -> Result<()> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::InvalidParameter(format!(
                    "{name} must be positive, got {value}"
                )))
            }
        }

        positive("width", self.width)?;
        positive("height", self.height)?;
        positive("peg_radius", self.peg_radius)?;
        positive("ball_radius", self.ball_radius)?;
        positive("bin_height", self.bin_height)?;

        if !(self.gravity.is_finite() && self.gravity >= 0.0) {
            return Err(ConfigError::InvalidParameter(format!(
                "gravity must be non-negative, got {}",
                self.gravity
            )));
        }
        if !(0.0..=1.0).contains(&self.restitution) {
            return Err(ConfigError::InvalidParameter(format!(
                "restitution must be within 0..=1, got {}",
                self.restitution
            )));
        }
        if !(0.0..1.0).contains(&self.air_friction) {
            return Err(ConfigError::InvalidParameter(format!(
                "air_friction must be within 0..1, got {}",
                self.air_friction
            )));
        }
        if self.ball_radius * 2.0 >= self.width {
            return Err(ConfigError::InvalidParameter(
                "ball does not fit between the walls".to_string(),
            ));
        }
        let slot_width = self.width / DIGIT_SLOTS as f32;
        if !(self.bin_gap >= 0.0 && self.bin_gap < slot_width) {
            return Err(ConfigError::InvalidParameter(format!(
                "bin_gap must be within 0..{slot_width}, got {}",
                self.bin_gap
            )));
        }
        if self.drop_height + self.ball_radius >= self.height - self.bin_height - BIN_FLOOR_OFFSET {
            return Err(ConfigError::InvalidParameter(
                "drop height is below the bins".to_string(),
            ));
        }
        if !(self.drop_height.is_finite() && self.drop_height >= 0.0) {
            return Err(ConfigError::InvalidParameter(format!(
                "drop_height must be inside the field, got {}",
                self.drop_height
            )));
        }
        if self.peg_floor_clearance >= self.height {
            return Err(ConfigError::InvalidParameter(
                "peg_floor_clearance leaves no room for pegs".to_string(),
            ));
        }
        if self.peg_cols > MAX_PEG_GRID || self.peg_rows > MAX_PEG_GRID {
            return Err(ConfigError::InvalidParameter(format!(
                "peg grid {}x{} exceeds {MAX_PEG_GRID}x{MAX_PEG_GRID}",
                self.peg_cols, self.peg_rows
            )));
        }
        if self.peg_cols > 0 && self.peg_rows > 0 {
            let (pitch_x, pitch_y) = self.peg_pitch();
            if self.peg_radius + self.ball_radius >= pitch_x.min(pitch_y) {
                return Err(ConfigError::InvalidParameter(format!(
                    "pegs too dense: pitch {pitch_x:.1}x{pitch_y:.1} for peg+ball radius {}",
                    self.peg_radius + self.ball_radius
                )));
            }
        }
        Ok(())
    }

    /// Column and row spacing of the peg grid
    pub fn peg_pitch(&self) -> (f32, f32) {
        let pitch_x = self.width / (self.peg_cols as f32 + 1.0) + self.peg_extra_spacing;
        let pitch_y = (self.height - self.peg_floor_clearance) / (self.peg_rows as f32 + 1.0);
        (pitch_x, pitch_y)
    }
}
