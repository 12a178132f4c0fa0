//! Board state and core simulation types
//!
//! Everything the stepper and the commands touch lives in [`SimState`].

use std::fmt;
use std::str::FromStr;

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::layout::{build_bins, build_pegs};
use crate::config::BoardConfig;
use crate::consts::DIGIT_SLOTS;
use crate::error::DropError;

/// A single decimal digit (0-9) carried by a ball
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Digit(u8);

impl Digit {
    pub fn new(value: u8) -> Result<Self, DropError> {
        Self::try_from(value)
    }

    #[inline]
    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Digit {
    type Error = DropError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value <= 9 {
            Ok(Self(value))
        } else {
            Err(DropError::OutOfRange(value as i64))
        }
    }
}

impl From<Digit> for u8 {
    fn from(digit: Digit) -> Self {
        digit.0
    }
}

impl FromStr for Digit {
    type Err = DropError;

    /// Parse user input such as `"7"` or `" 3 "`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let value: i64 = trimmed
            .parse()
            .map_err(|_| DropError::NotNumeric(trimmed.to_string()))?;
        if (0..=9).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(DropError::OutOfRange(value))
        }
    }
}

impl fmt::Display for Digit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A static circular obstacle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Peg {
    pub pos: Vec2,
    pub radius: f32,
}

/// A catch slot at the bottom of the field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bin {
    /// Centre of the bin rectangle
    pub center: Vec2,
    pub width: f32,
    pub height: f32,
    pub filled: bool,
}

impl Bin {
    #[inline]
    pub fn top(&self) -> f32 {
        self.center.y - self.height / 2.0
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.center.x - self.width / 2.0
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.center.x + self.width / 2.0
    }

    /// Strictly inside the horizontal span (edges excluded)
    #[inline]
    pub fn spans(&self, x: f32) -> bool {
        x > self.left() && x < self.right()
    }
}

/// Ball state - falling through the pegs or resting in a bin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BallState {
    Falling,
    /// Terminal: the ball rests in the bin at this index
    Settled { bin: usize },
}

/// A ball entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub digit: Digit,
    pub state: BallState,
}

impl Ball {
    pub fn new(id: u32, digit: Digit, pos: Vec2, radius: f32) -> Self {
        Self {
            id,
            pos,
            vel: Vec2::ZERO,
            radius,
            digit,
            state: BallState::Falling,
        }
    }

    #[inline]
    pub fn is_settled(&self) -> bool {
        matches!(self.state, BallState::Settled { .. })
    }

    /// Bin index this ball rests in, if settled
    pub fn bin(&self) -> Option<usize> {
        match self.state {
            BallState::Settled { bin } => Some(bin),
            BallState::Falling => None,
        }
    }

    /// Come to rest on top of the bin floor
    pub fn settle(&mut self, bin_index: usize, bin: &Bin) {
        self.state = BallState::Settled { bin: bin_index };
        self.vel = Vec2::ZERO;
        self.pos.y = bin.top() - self.radius;
    }
}

/// The ten-slot digit sequence read out as a phone number
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DigitSlots([Option<Digit>; DIGIT_SLOTS]);

impl DigitSlots {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, index: usize) -> Option<Digit> {
        self.0.get(index).copied().flatten()
    }

    pub fn set(&mut self, index: usize, digit: Digit) {
        if let Some(slot) = self.0.get_mut(index) {
            *slot = Some(digit);
        }
    }

    pub fn clear(&mut self, index: usize) {
        if let Some(slot) = self.0.get_mut(index) {
            *slot = None;
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<Digit>> + '_ {
        self.0.iter().copied()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(Option::is_none)
    }

    pub fn filled_count(&self) -> usize {
        self.0.iter().filter(|d| d.is_some()).count()
    }

    /// True once every slot holds a digit
    pub fn is_complete(&self) -> bool {
        self.0.iter().all(Option::is_some)
    }
}

/// `DDD-DDD-DDDD`, `_` for empty slots
impl fmt::Display for DigitSlots {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, slot) in self.0.iter().enumerate() {
            if i == 3 || i == 6 {
                f.write_str("-")?;
            }
            match slot {
                Some(d) => write!(f, "{d}")?,
                None => f.write_str("_")?,
            }
        }
        Ok(())
    }
}

/// Something that happened during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoardEvent {
    /// A ball landed and claimed a bin
    BinFilled { bin: usize, digit: Digit, ball_id: u32 },
    /// A ball left the field without landing and was removed
    BallLost { ball_id: u32, digit: Digit },
}

/// What an undo took back
#[derive(Debug, Clone, PartialEq)]
pub enum Undone {
    /// The ball was still on the board and has been removed
    Ball(Ball),
    /// The ball had already been lost; only its history entry was consumed
    Lost { ball_id: u32 },
}

impl Undone {
    pub fn ball_id(&self) -> u32 {
        match self {
            Undone::Ball(ball) => ball.id,
            Undone::Lost { ball_id } => *ball_id,
        }
    }
}

/// RNG state wrapper for serialization
///
/// Each draw uses a fresh PCG stream keyed by the draw counter, so the
/// state is just two integers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    pub draws: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed, draws: 0 }
    }

    /// Uniform sample from `[low, high)`, or `low` when the range is empty
    pub fn next_in_range(&mut self, low: f32, high: f32) -> f32 {
        let mut rng = Pcg32::new(self.seed, self.draws);
        self.draws += 1;
        if high > low {
            rng.random_range(low..high)
        } else {
            low
        }
    }
}

/// Complete board state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimState {
    pub config: BoardConfig,
    /// Seed the RNG started from
    pub seed: u64,
    pub rng_state: RngState,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub pegs: Vec<Peg>,
    /// Always `DIGIT_SLOTS` bins, left to right
    pub bins: Vec<Bin>,
    /// Live balls (sorted by id)
    pub balls: Vec<Ball>,
    pub slots: DigitSlots,
    /// Ids of every drop in order (most recent last), including balls since lost
    pub history: Vec<u32>,
    next_id: u32,
}

impl SimState {
    /// Stock board with the given seed
    pub fn new(seed: u64) -> Self {
        Self::with_config(BoardConfig::default(), seed)
    }

    /// Board laid out from `config`; the config is assumed validated
    pub fn with_config(config: BoardConfig, seed: u64) -> Self {
        let pegs = build_pegs(&config);
        let bins = build_bins(&config);
        Self {
            config,
            seed,
            rng_state: RngState::new(seed),
            time_ticks: 0,
            pegs,
            bins,
            balls: Vec::new(),
            slots: DigitSlots::new(),
            history: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn ball(&self, id: u32) -> Option<&Ball> {
        self.balls.iter().find(|b| b.id == id)
    }

    pub fn falling_count(&self) -> usize {
        self.balls.iter().filter(|b| !b.is_settled()).count()
    }

    /// Remove a ball from the board; its history entry stays until undone
    pub(crate) fn remove_ball(&mut self, id: u32) -> Option<Ball> {
        let index = self.balls.iter().position(|b| b.id == id)?;
        Some(self.balls.remove(index))
    }

    /// Bins, slots and settled balls agree with each other
    pub fn is_consistent(&self) -> bool {
        if self.bins.len() != DIGIT_SLOTS || self.slots.len() != DIGIT_SLOTS {
            return false;
        }
        self.bins.iter().enumerate().all(|(i, bin)| {
            let occupants: Vec<&Ball> = self
                .balls
                .iter()
                .filter(|b| b.bin() == Some(i))
                .collect();
            match (bin.filled, occupants.as_slice()) {
                (false, []) => self.slots.get(i).is_none(),
                (true, [ball]) => self.slots.get(i) == Some(ball.digit) && ball.vel == Vec2::ZERO,
                _ => false,
            }
        })
    }
}
