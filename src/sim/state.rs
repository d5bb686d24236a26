//! Turn state and the simulation aggregate
//!
//! Everything `tick` mutates between frames lives here, threaded explicitly
//! by `&mut` rather than held in globals.

use super::camera::Camera;
use super::entity::Entity;
use super::tick::{TickInput, tick};
use super::world::{EntityId, World};
use crate::config::SimConfig;
use crate::error::SimError;

/// Turn flow phases, in the order a round visits them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnPhase {
    /// Revoke control before a new map
    Reset,
    /// Regenerate the terrain
    GenerateTerrain,
    /// One tick for the new terrain to be observed
    GeneratingTerrain,
    /// Drop the player's unit onto the map
    AllocateUnits,
    /// Wait for the unit to land
    AllocatingUnits,
    /// Player aims and fires
    StartPlay,
    /// Follow the shot until everything settles
    CameraMode,
}

/// Mutable state carried from one tick to the next
#[derive(Debug, Clone)]
pub struct SimulationState {
    pub phase: TurnPhase,
    /// Ticks spent in the current phase; 0 means the entry action is pending
    pub phase_ticks: u64,
    /// Ticks since the run started
    pub time_ticks: u64,
    /// Every live entity was at rest at the end of the last tick
    pub world_stable: bool,
    pub player_has_control: bool,
    pub player_action_complete: bool,
    /// Unit the player aims and fires from (weak)
    pub controlled: Option<EntityId>,
    pub camera: Camera,
    /// Charge of the pending shot in `[0, 1]`
    pub energy: f32,
    /// Fire key went down and the shot has not been released yet
    pub charging: bool,
}

impl Default for SimulationState {
    fn default() -> Self {
        Self {
            phase: TurnPhase::Reset,
            phase_ticks: 0,
            time_ticks: 0,
            world_stable: true,
            player_has_control: false,
            player_action_complete: false,
            controlled: None,
            camera: Camera::new(),
            energy: 0.0,
            charging: false,
        }
    }
}

impl SimulationState {
    /// Switch phase; the new phase's entry action runs on its first tick
    pub fn enter(&mut self, phase: TurnPhase) {
        log::info!("Turn phase {:?} -> {:?}", self.phase, phase);
        self.phase = phase;
        self.phase_ticks = 0;
    }

    /// Put a unit under player control and track it
    pub fn take_control_of(&mut self, id: EntityId) {
        self.controlled = Some(id);
        self.camera.follow(id);
    }

    /// Drop every weak reference to a reaped entity
    pub fn forget(&mut self, id: EntityId) {
        if self.controlled == Some(id) {
            self.controlled = None;
            self.charging = false;
        }
        self.camera.forget(id);
    }
}

/// World, turn state and configuration of one run
#[derive(Debug, Clone)]
pub struct Simulation {
    config: SimConfig,
    pub world: World,
    pub state: SimulationState,
}

impl Simulation {
    /// Validate the config and allocate the terrain.
    ///
    /// The map stays empty until the turn flow generates it on the second tick.
    pub fn new(config: SimConfig) -> Result<Self, SimError> {
        config.validate()?;
        let world = World::new(&config)?;
        log::info!(
            "Simulation created: {}x{} map, seed {}",
            config.map_width,
            config.map_height,
            config.seed
        );
        Ok(Self {
            config,
            world,
            state: SimulationState::default(),
        })
    }

    /// Advance one frame
    pub fn tick(&mut self, input: &TickInput) {
        tick(&mut self.world, &mut self.state, &self.config, input);
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn phase(&self) -> TurnPhase {
        self.state.phase
    }

    /// Charge of the pending shot, for a charge meter
    pub fn energy(&self) -> f32 {
        self.state.energy
    }

    pub fn controlled_unit(&self) -> Option<&Entity> {
        self.state.controlled.and_then(|id| self.world.get(id))
    }
}
