//! Terrain collision detection and response
//!
//! Each substep a body is integrated to a *potential* position, then a fan of
//! probe points on its leading half-circle is tested against the terrain.
//! Blocked probes add up to an approximate surface normal. A blocked body stays
//! where it was and bounces off that normal, losing speed to friction.
//!
//! Probe points are clamped into the grid, so bodies hugging the map edge can
//! pick up a phantom contact from the boundary cells. Bounce behavior is tuned
//! around that, so it is kept.

use std::f32::consts::{FRAC_PI_2, FRAC_PI_8};

use glam::Vec2;

use super::entity::{DeathAction, Entity};
use super::terrain::TerrainField;
use crate::consts::RESPONSE_EPSILON;

/// Probe samples across the leading half-circle (`-π/2 .. π/2` in `π/8` steps)
pub const PROBE_COUNT: usize = 8;

/// Physics constants used while resolving a body
#[derive(Debug, Clone, Copy)]
pub struct PhysicsParams {
    /// Downward acceleration added every substep
    pub gravity: f32,
    /// Speed under which a body is forced stable
    pub rest_speed: f32,
}

/// Result of a terrain probe
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether any probe point was inside terrain
    pub hit: bool,
    /// Sum of `potential - probe` over blocked probes
    pub response: Vec2,
    /// Number of blocked probes
    pub blocked: usize,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            response: Vec2::ZERO,
            blocked: 0,
        }
    }

    /// Unit surface normal, or `None` if the contacts cancel out
    pub fn normal(&self) -> Option<Vec2> {
        let len = self.response.length();
        (self.hit && len > RESPONSE_EPSILON).then(|| self.response / len)
    }
}

/// What happened to a body during one substep
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Moved freely to its potential position
    Moved,
    /// Touched terrain and bounced in place
    Bounced,
    /// Touched terrain and used up its bounce budget
    Died(DeathAction),
}

/// Probe the terrain around `potential` on the half-circle facing `heading`
pub fn probe_terrain(
    terrain: &TerrainField,
    potential: Vec2,
    radius: f32,
    heading: f32,
) -> CollisionResult {
    let mut result = CollisionResult::miss();

    for i in 0..PROBE_COUNT {
        let angle = heading - FRAC_PI_2 + i as f32 * FRAC_PI_8;
        let probe = clamp_to_grid(terrain, potential + radius * Vec2::new(angle.cos(), angle.sin()));

        if terrain.is_solid_at(probe) {
            result.response += potential - probe;
            result.blocked += 1;
            result.hit = true;
        }
    }

    result
}

/// Clamp a point into `[0, width - 1] × [0, height - 1]`
fn clamp_to_grid(terrain: &TerrainField, p: Vec2) -> Vec2 {
    Vec2::new(
        p.x.clamp(0.0, (terrain.width() - 1) as f32),
        p.y.clamp(0.0, (terrain.height() - 1) as f32),
    )
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Advance one body by one substep against the terrain.
///
/// Gravity, integration, probing and bounce response. A body that dies here
/// has its `dead` flag set; running its death action is up to the caller.
pub fn resolve(entity: &mut Entity, terrain: &TerrainField, dt: f32, params: PhysicsParams) -> Resolution {
    entity.acc.y += params.gravity;

    entity.vel += entity.acc * dt;
    let potential = entity.pos + entity.vel * dt;

    entity.acc = Vec2::ZERO;
    entity.stable = false;

    let result = probe_terrain(terrain, potential, entity.radius, entity.facing());
    let speed = entity.vel.length();

    let resolution = if result.hit {
        // Held in place so it cannot sink into the ground this substep
        entity.stable = true;

        if let Some(normal) = result.normal() {
            entity.vel = entity.friction * reflect_velocity(entity.vel, normal);
        }

        match entity.register_bounce() {
            Some(action) => Resolution::Died(action),
            None => Resolution::Bounced,
        }
    } else {
        entity.pos = potential;
        Resolution::Moved
    };

    if speed < params.rest_speed {
        entity.stable = true;
    }

    resolution
}
