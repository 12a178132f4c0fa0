//! Player commands: drop, undo, restart, enter
//!
//! These run between ticks, on the same thread as the stepper.

use glam::Vec2;

use super::layout::build_bins;
use super::state::{Ball, Digit, DigitSlots, SimState, Undone};
use crate::error::DropError;

impl SimState {
    /// Validate raw user input and drop a ball carrying it
    ///
    /// Invalid input leaves the board untouched.
    pub fn drop_digit(&mut self, input: &str) -> Result<u32, DropError> {
        match input.parse::<Digit>() {
            Ok(digit) => Ok(self.drop_ball(digit)),
            Err(err) => {
                log::warn!("Rejected drop: {err}");
                Err(err)
            }
        }
    }

    /// Drop a ball at a random horizontal position along the top
    pub fn drop_ball(&mut self, digit: Digit) -> u32 {
        let r = self.config.ball_radius;
        let x = self.rng_state.next_in_range(r, self.config.width - r);
        self.drop_ball_at(digit, x)
    }

    /// Drop a ball at a chosen horizontal position (clamped inside the walls)
    pub fn drop_ball_at(&mut self, digit: Digit, x: f32) -> u32 {
        let r = self.config.ball_radius;
        let x = x.clamp(r, self.config.width - r);
        let id = self.next_entity_id();
        let pos = Vec2::new(x, self.config.drop_height);

        self.balls.push(Ball::new(id, digit, pos, r));
        self.history.push(id);
        log::info!("Dropped ball {id} with digit {digit} at x={x:.1}");
        id
    }

    /// Take back the most recent drop
    ///
    /// If the ball had settled its bin and slot are freed. A drop whose ball
    /// was already lost is consumed without touching any other ball, bin or
    /// slot. Returns `None` when there is nothing to undo.
    pub fn undo(&mut self) -> Option<Undone> {
        let id = self.history.pop()?;
        let Some(ball) = self.remove_ball(id) else {
            log::info!("Undid lost ball {id}");
            return Some(Undone::Lost { ball_id: id });
        };

        if let Some(index) = ball.bin() {
            self.slots.clear(index);
            if let Some(bin) = self.bins.get_mut(index) {
                bin.filled = false;
            }
        }
        log::info!("Undid ball {} (digit {})", ball.id, ball.digit);
        Some(Undone::Ball(ball))
    }

    /// Clear every ball, bin and slot; pegs, config and RNG stream carry on
    pub fn restart(&mut self) {
        self.balls.clear();
        self.history.clear();
        self.slots = DigitSlots::new();
        self.bins = build_bins(&self.config);
        self.time_ticks = 0;
        log::info!("Board restarted");
    }

    /// Read out the current number
    pub fn enter(&self) -> DigitSlots {
        log::info!("Entered number: {}", self.slots);
        self.slots
    }
}
