//! Collision detection and response for balls against walls, pegs and bins
//!
//! All responses are single-pass: each obstacle is checked once per tick and
//! resolved on the spot. Fast balls can tunnel through pegs; that is accepted.

use glam::Vec2;

use super::state::{Ball, Bin, Peg};

/// Result of a collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Surface normal at collision (pointing toward ball center, for reflection)
    pub normal: Vec2,
    /// Penetration depth (for position correction)
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// Check overlap between a ball and a peg
///
/// The normal points from the peg centre to the ball centre. Coincident
/// centres resolve straight up.
pub fn ball_peg_collision(ball_pos: Vec2, ball_radius: f32, peg: &Peg) -> CollisionResult {
    let delta = ball_pos - peg.pos;
    let dist = delta.length();
    let min_dist = ball_radius + peg.radius;

    if dist >= min_dist {
        return CollisionResult::miss();
    }

    let normal = if dist > f32::EPSILON {
        delta / dist
    } else {
        Vec2::NEG_Y
    };
    CollisionResult {
        hit: true,
        normal,
        penetration: min_dist - dist,
    }
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Bounce a ball off a peg if it is moving into it
///
/// Returns true when the ball was pushed out and reflected.
pub fn resolve_peg(ball: &mut Ball, peg: &Peg, restitution: f32, epsilon: f32) -> bool {
    let result = ball_peg_collision(ball.pos, ball.radius, peg);
    if !result.hit {
        return false;
    }

    // Only if moving into the peg
    if ball.vel.dot(result.normal) >= 0.0 {
        return false;
    }

    ball.pos += result.normal * (result.penetration + epsilon);
    ball.vel = reflect_velocity(ball.vel, result.normal) * restitution;
    true
}

/// Bounce a ball off the side walls of a field `width` wide
///
/// Horizontal velocity is flipped and damped whenever the ball pokes past a
/// wall, then the ball is clamped back inside.
pub fn resolve_walls(ball: &mut Ball, width: f32, restitution: f32) -> bool {
    let r = ball.radius;
    if ball.pos.x - r < 0.0 || ball.pos.x + r > width {
        ball.vel.x *= -restitution;
        ball.pos.x = ball.pos.x.clamp(r, width - r);
        return true;
    }
    false
}

/// Has the ball's lower edge crossed into an open bin?
#[inline]
pub fn ball_enters_bin(ball_pos: Vec2, ball_radius: f32, bin: &Bin) -> bool {
    !bin.filled && ball_pos.y + ball_radius > bin.top() && bin.spans(ball_pos.x)
}

/// Has the ball dropped completely below the floor?
#[inline]
pub fn ball_below_floor(ball_pos: Vec2, ball_radius: f32, height: f32) -> bool {
    ball_pos.y - ball_radius > height
}
