//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied timestep only
//! - Seeded RNG only
//! - Stable iteration order (arena order)
//! - No rendering or platform dependencies

pub mod camera;
pub mod collision;
pub mod entity;
pub mod explosion;
pub mod physics;
pub mod state;
pub mod terrain;
pub mod tick;
pub mod view;
pub mod world;

pub use camera::Camera;
pub use collision::{CollisionResult, PhysicsParams, Resolution, probe_terrain, resolve};
pub use entity::{DeathAction, DrawShape, Entity, EntityKind};
pub use explosion::detonate;
pub use physics::substep;
pub use state::{Simulation, SimulationState, TurnPhase};
pub use terrain::{Cell, TerrainField, perlin_noise_1d};
pub use tick::{KeyState, TickInput, tick};
pub use view::{DrawRequest, draw_requests, terrain_mask};
pub use world::{EntityId, World};
