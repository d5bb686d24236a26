//! Crater Fall - a turn-sequenced 2D artillery simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (terrain, physics, explosions, turn flow)
//! - `config`: Data-driven tuning loaded from JSON
//! - `error`: Construction and configuration failures

pub mod config;
pub mod error;
pub mod sim;

pub use config::SimConfig;
pub use error::SimError;

use glam::Vec2;

/// Simulation constants
pub mod consts {
    /// Default terrain dimensions (cells)
    pub const MAP_WIDTH: usize = 1024;
    pub const MAP_HEIGHT: usize = 512;

    /// Noise octaves used by terrain generation
    pub const TERRAIN_OCTAVES: u32 = 8;
    /// Each octave's weight is the previous one divided by this
    pub const TERRAIN_BIAS: f32 = 2.0;
    /// Seed value forced into the first column so the map starts at mid-height
    pub const TERRAIN_FIRST_SEED: f32 = 0.5;

    /// Downward acceleration added every substep (units/s²)
    pub const GRAVITY: f32 = 2.0;
    /// Physics substeps per tick (physics runs faster than rendering)
    pub const PHYSICS_SUBSTEPS: u32 = 10;
    /// Below this speed an entity counts as at rest
    pub const REST_SPEED: f32 = 0.1;

    /// Distance floor used by the shockwave to avoid dividing by zero
    pub const BLAST_MIN_DISTANCE: f32 = 0.0001;
    /// Below this the collision response is too small to normalize
    pub const RESPONSE_EPSILON: f32 = 1.0e-6;

    /// Speed debris is launched at from a blast centre
    pub const DEBRIS_SPEED: f32 = 10.0;
    /// Blast radius of a projectile that runs out of bounces
    pub const PROJECTILE_BLAST_RADIUS: f32 = 20.0;
    /// Blast radius of the sandbox pointer detonation
    pub const SANDBOX_BLAST_RADIUS: f32 = 10.0;
    /// Largest configurable sandbox blast; one debris piece spawns per unit
    pub const MAX_BLAST_RADIUS: f32 = 256.0;

    /// Where the turn flow drops the player's unit
    pub const UNIT_SPAWN_X: f32 = 32.0;
    pub const UNIT_SPAWN_Y: f32 = 1.0;

    /// Aim rotation speed (radians/s)
    pub const AIM_RATE: f32 = 1.0;
    /// Charge accumulated per second while the fire key is held
    pub const CHARGE_RATE: f32 = 0.75;
    /// Launch speed of a fully charged projectile
    pub const LAUNCH_SPEED: f32 = 40.0;

    /// Camera follow rate (fraction of the remaining distance per second)
    pub const CAMERA_SMOOTHING: f32 = 5.0;
    /// Pointer edge-scroll speed (units/s)
    pub const CAMERA_SCROLL_SPEED: f32 = 400.0;
    /// Pointer distance from a viewport edge that triggers edge scroll
    pub const CAMERA_EDGE_MARGIN: f32 = 5.0;

    /// Elapsed time assumed when the host does not supply one
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Default viewport size (screen cells)
    pub const VIEWPORT_WIDTH: f32 = 256.0;
    pub const VIEWPORT_HEIGHT: f32 = 160.0;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}
