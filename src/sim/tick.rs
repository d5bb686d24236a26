//! Per-frame simulation tick
//!
//! One tick runs the turn state machine, applies sandbox and player input,
//! steps physics `substeps` times and finally refreshes stability and the
//! camera. Given the same seed and the same inputs it always produces the
//! same world.

use glam::Vec2;

use super::collision::PhysicsParams;
use super::entity::Entity;
use super::explosion::detonate;
use super::physics::substep;
use super::state::{SimulationState, TurnPhase};
use super::world::World;
use crate::config::SimConfig;
use crate::consts::{SIM_DT, VIEWPORT_HEIGHT, VIEWPORT_WIDTH};
use crate::{normalize_angle, polar_to_cartesian};

/// Edge-triggered key state for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyState {
    /// Went down this tick
    pub pressed: bool,
    /// Down this tick (including the tick it was pressed)
    pub held: bool,
    /// Went up this tick
    pub released: bool,
}

impl KeyState {
    pub const UP: Self = Self {
        pressed: false,
        held: false,
        released: false,
    };
    pub const PRESSED: Self = Self {
        pressed: true,
        held: true,
        released: false,
    };
    pub const HELD: Self = Self {
        pressed: false,
        held: true,
        released: false,
    };
    pub const RELEASED: Self = Self {
        pressed: false,
        held: false,
        released: true,
    };
}

/// Pointer buttons the sandbox reacts to
pub const BUTTON_DETONATE: usize = 0;
pub const BUTTON_SPAWN_PROJECTILE: usize = 1;
pub const BUTTON_SPAWN_UNIT: usize = 2;

/// Everything the host feeds in for one tick
#[derive(Debug, Clone)]
pub struct TickInput {
    /// Seconds since the previous tick; also the dt of every substep
    pub elapsed: f32,
    /// Pointer in screen space, `None` when outside the window
    pub pointer: Option<Vec2>,
    /// Viewport size in screen cells
    pub viewport: Vec2,
    /// Pointer buttons released this tick
    pub released_buttons: [bool; 3],
    pub regenerate: KeyState,
    pub rotate_left: KeyState,
    pub rotate_right: KeyState,
    pub fire: KeyState,
}

impl Default for TickInput {
    fn default() -> Self {
        Self {
            elapsed: SIM_DT,
            pointer: None,
            viewport: Vec2::new(VIEWPORT_WIDTH, VIEWPORT_HEIGHT),
            released_buttons: [false; 3],
            regenerate: KeyState::UP,
            rotate_left: KeyState::UP,
            rotate_right: KeyState::UP,
            fire: KeyState::UP,
        }
    }
}

/// Advance the simulation by one frame
pub fn tick(world: &mut World, state: &mut SimulationState, config: &SimConfig, input: &TickInput) {
    let dt = input.elapsed;
    state.time_ticks += 1;

    advance_turn(world, state, config);
    apply_sandbox_input(world, state, config, input);
    apply_player_input(world, state, config, input, dt);

    let params = PhysicsParams {
        gravity: config.gravity,
        rest_speed: config.rest_speed,
    };
    for _ in 0..config.substeps {
        for id in substep(world, dt, params) {
            state.forget(id);
        }
    }

    state.world_stable = world.is_stable();
    state
        .camera
        .update(world, input.pointer, input.viewport, dt, config);
}

/// Run the current phase's entry action (first tick only) and its guard
fn advance_turn(world: &mut World, state: &mut SimulationState, config: &SimConfig) {
    let entering = state.phase_ticks == 0;
    state.phase_ticks += 1;

    match state.phase {
        TurnPhase::Reset => {
            if entering {
                state.player_has_control = false;
                state.player_action_complete = false;
            }
            state.enter(TurnPhase::GenerateTerrain);
        }
        TurnPhase::GenerateTerrain => {
            if entering {
                world.regenerate_terrain(config.octaves, config.bias);
            }
            state.enter(TurnPhase::GeneratingTerrain);
        }
        TurnPhase::GeneratingTerrain => state.enter(TurnPhase::AllocateUnits),
        TurnPhase::AllocateUnits => {
            if entering {
                let unit = world.spawn(Entity::control_unit(config.spawn_point));
                state.take_control_of(unit);
                log::info!(
                    "Dropped unit at ({:.0}, {:.0})",
                    config.spawn_point.x,
                    config.spawn_point.y
                );
            }
            state.enter(TurnPhase::AllocatingUnits);
        }
        TurnPhase::AllocatingUnits => {
            if state.world_stable {
                state.enter(TurnPhase::StartPlay);
            }
        }
        TurnPhase::StartPlay => {
            if entering {
                state.player_has_control = true;
                state.player_action_complete = false;
            }
            if state.player_action_complete {
                state.enter(TurnPhase::CameraMode);
            }
        }
        TurnPhase::CameraMode => {
            if entering {
                state.player_has_control = false;
                state.player_action_complete = false;
            }
            if state.world_stable {
                if let Some(unit) = state.controlled {
                    state.camera.follow(unit);
                }
                state.enter(TurnPhase::StartPlay);
            }
        }
    }
}

/// Debug entry points; honoured in every phase
fn apply_sandbox_input(
    world: &mut World,
    state: &mut SimulationState,
    config: &SimConfig,
    input: &TickInput,
) {
    if input.regenerate.released {
        world.regenerate_terrain(config.octaves, config.bias);
    }

    let Some(pointer) = input.pointer else {
        return;
    };
    let cursor = state.camera.screen_to_world(pointer);

    if input.released_buttons[BUTTON_DETONATE] {
        detonate(world, cursor, config.sandbox_blast_radius);
    }
    if input.released_buttons[BUTTON_SPAWN_PROJECTILE] {
        world.spawn(Entity::projectile(cursor, Vec2::ZERO));
    }
    if input.released_buttons[BUTTON_SPAWN_UNIT] {
        let unit = world.spawn(Entity::control_unit(cursor));
        state.take_control_of(unit);
    }
}

/// Aim, charge and fire from the controlled unit
fn apply_player_input(
    world: &mut World,
    state: &mut SimulationState,
    config: &SimConfig,
    input: &TickInput,
    dt: f32,
) {
    if !state.player_has_control || state.player_action_complete {
        return;
    }
    let Some(unit_id) = state.controlled else {
        return;
    };
    let Some(unit) = world.get_mut(unit_id) else {
        state.controlled = None;
        return;
    };
    if !unit.stable {
        return;
    }

    if input.rotate_left.held {
        unit.aim -= config.aim_rate * dt;
    }
    if input.rotate_right.held {
        unit.aim += config.aim_rate * dt;
    }
    unit.aim = normalize_angle(unit.aim);
    let (origin, aim) = (unit.pos, unit.aim);

    if input.fire.pressed {
        state.charging = true;
        state.energy = 0.0;
    }

    let mut fire = false;
    if state.charging && input.fire.held {
        state.energy = (state.energy + config.charge_rate * dt).min(1.0);
        fire = state.energy >= 1.0;
    }
    if state.charging && input.fire.released {
        fire = true;
    }

    if fire {
        let velocity = polar_to_cartesian(config.launch_speed * state.energy, aim);
        let shell = world.spawn(Entity::projectile(origin, velocity));
        state.camera.follow(shell);
        state.charging = false;
        state.player_action_complete = true;
        log::info!(
            "Fired at {:.2} rad with {:.0}% charge",
            aim,
            state.energy * 100.0
        );
    }
}
