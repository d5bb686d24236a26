//! Physics substep
//!
//! One pass over every body: resolve against the terrain, run death actions
//! as they happen, then reap the dead once everyone has moved.

use super::collision::{PhysicsParams, Resolution, resolve};
use super::entity::DeathAction;
use super::explosion::detonate;
use super::world::{EntityId, World};

/// Run one substep; returns the handles reaped at the end of it
pub fn substep(world: &mut World, dt: f32, params: PhysicsParams) -> Vec<EntityId> {
    // Bodies spawned by a blast mid-pass wait for the next substep
    let ids: Vec<EntityId> = world.entities.keys().collect();

    for id in ids {
        let Some(entity) = world.entities.get_mut(id) else {
            continue;
        };
        let resolution = resolve(entity, &world.terrain, dt, params);

        if let Resolution::Died(DeathAction::Explode { radius }) = resolution {
            let at = entity.pos;
            detonate(world, at, radius);
        }
    }

    world.reap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SimConfig;
    use crate::sim::entity::{Entity, EntityKind};
    use glam::Vec2;

    const PARAMS: PhysicsParams = PhysicsParams {
        gravity: 2.0,
        rest_speed: 0.1,
    };

    /// 128x128 grid, flat ground from row 64
    fn flat_world() -> World {
        let config = SimConfig {
            map_width: 128,
            map_height: 128,
            ..SimConfig::with_seed(3)
        };
        let mut world = World::new(&config).unwrap();
        world.terrain.generate(&[0.5; 128], 8, 2.0);
        world
    }

    #[test]
    fn test_projectile_impact_detonates_and_reaps() {
        let mut world = flat_world();
        let solid_before = world.terrain.solid_count();
        let shell = world.spawn(Entity::projectile(Vec2::new(64.0, 60.0), Vec2::new(0.0, 20.0)));

        let mut reaped = Vec::new();
        for _ in 0..10 {
            reaped.extend(substep(&mut world, 0.05, PARAMS));
            if !reaped.is_empty() {
                break;
            }
        }

        assert_eq!(reaped, vec![shell]);
        assert!(world.get(shell).is_none());
        assert!(world.terrain.solid_count() < solid_before);
        assert_eq!(world.count_kind(EntityKind::Debris), 20);
        assert!(!world.terrain.is_solid(64, 64));
    }

    #[test]
    fn test_blast_spawned_debris_waits_a_substep() {
        let mut world = flat_world();
        world.spawn(Entity::projectile(Vec2::new(64.0, 61.0), Vec2::new(0.0, 20.0)));
        substep(&mut world, 0.05, PARAMS);

        // Fresh debris sits exactly on the blast centre with untouched state
        assert_eq!(world.count_kind(EntityKind::Debris), 20);
        let centres: Vec<Vec2> = world.entities.values().map(|e| e.pos).collect();
        assert!(centres.windows(2).all(|w| w[0] == w[1]));
        assert!(world.entities.values().all(|e| !e.stable));
    }

    #[test]
    fn test_finite_budgets_come_to_rest() {
        let mut world = flat_world();
        for i in 0..6 {
            let x = 20.0 + i as f32 * 15.0;
            world.spawn(Entity::debris(Vec2::new(x, 40.0), &mut rand_pcg::Pcg32::new(i, 7)));
        }
        world.spawn(Entity::projectile(Vec2::new(100.0, 30.0), Vec2::new(-4.0, 3.0)));

        let mut settled = false;
        for _ in 0..50_000 {
            substep(&mut world, 1.0 / 30.0, PARAMS);
            if world.is_stable() {
                settled = true;
                break;
            }
        }
        assert!(settled, "world never settled ({} bodies left)", world.len());
    }

    #[test]
    fn test_unit_comes_to_rest() {
        let mut world = flat_world();
        let unit = world.spawn(Entity::control_unit(Vec2::new(40.0, 10.0)));
        let mut stable_ticks = 0;
        for _ in 0..50_000 {
            substep(&mut world, 1.0 / 30.0, PARAMS);
            stable_ticks = if world.is_stable() { stable_ticks + 1 } else { 0 };
            if stable_ticks > 50 {
                break;
            }
        }
        assert!(stable_ticks > 50);
        let unit = world.get(unit).unwrap();
        assert!(unit.pos.y > 55.0 && unit.pos.y < 64.0);
    }
}
