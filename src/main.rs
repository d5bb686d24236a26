//! Crater Fall headless driver
//!
//! Plays a few scripted turns without a window and logs the turn flow.
//! Usage: `crater-fall [config.json]` (set `RUST_LOG=info` to see the log).

use crater_fall::sim::{KeyState, Simulation, TickInput, TurnPhase};
use crater_fall::{SimConfig, SimError};

/// Turns to play before exiting
const TURNS: u32 = 3;
/// Give up if a turn never settles
const MAX_TICKS: u64 = 200_000;

/// Scripted player: aim, charge, release
#[derive(Debug, Default)]
struct Pilot {
    turn: u32,
    /// Ticks spent on the current shot, `None` while waiting for control
    shot_ticks: Option<u32>,
}

impl Pilot {
    fn aim_ticks(&self) -> u32 {
        20 + self.turn * 15
    }

    fn charge_ticks(&self) -> u32 {
        30 + self.turn * 10
    }

    fn input(&mut self, sim: &Simulation) -> TickInput {
        let mut input = TickInput::default();

        let ready = sim.phase() == TurnPhase::StartPlay
            && sim.state.player_has_control
            && !sim.state.player_action_complete
            && sim.controlled_unit().is_some_and(|u| u.stable);

        let Some(ticks) = self.shot_ticks.filter(|_| ready) else {
            if ready {
                self.shot_ticks = Some(0);
            }
            return input;
        };

        let aim_end = self.aim_ticks();
        let charge_end = aim_end + self.charge_ticks();
        match ticks {
            t if t < aim_end => input.rotate_left = KeyState::HELD,
            t if t == aim_end => input.fire = KeyState::PRESSED,
            t if t < charge_end => input.fire = KeyState::HELD,
            _ => {
                input.fire = KeyState::RELEASED;
                self.shot_ticks = None;
                return input;
            }
        }
        self.shot_ticks = Some(ticks + 1);
        input
    }
}

fn run() -> Result<(), SimError> {
    let config = match std::env::args().nth(1) {
        Some(path) => SimConfig::load(path)?,
        None => {
            log::info!("No config given, using defaults");
            SimConfig::default()
        }
    };

    let mut sim = Simulation::new(config)?;
    let mut pilot = Pilot::default();
    let mut last_phase = sim.phase();

    for _ in 0..MAX_TICKS {
        let input = pilot.input(&sim);
        sim.tick(&input);

        if sim.phase() != last_phase {
            last_phase = sim.phase();
            if last_phase == TurnPhase::CameraMode {
                pilot.turn += 1;
            }
            if last_phase == TurnPhase::StartPlay && pilot.turn >= TURNS {
                log::info!(
                    "Played {} turns in {} ticks; {} bodies, {} solid cells left",
                    pilot.turn,
                    sim.state.time_ticks,
                    sim.world.len(),
                    sim.world.terrain.solid_count()
                );
                return Ok(());
            }
        }
    }

    log::warn!("Stopped after {MAX_TICKS} ticks in {:?}", sim.phase());
    Ok(())
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Crater Fall (headless) starting...");

    if let Err(e) = run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No headless driver on the web; the host embeds the library directly
}
