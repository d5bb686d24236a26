//! Explosions
//!
//! A blast carves a crater, flings every nearby body straight away from the
//! centre at a speed equal to the blast radius, and throws out debris.

use glam::Vec2;

use super::world::World;
use crate::consts::BLAST_MIN_DISTANCE;

/// Detonate at `center` with the given radius.
///
/// Safe to call while a substep is in progress: entities spawned here are
/// picked up by the next substep, and nothing is removed until the reap pass.
pub fn detonate(world: &mut World, center: Vec2, radius: f32) {
    log::debug!(
        "Detonation at ({:.1}, {:.1}) radius {:.1}",
        center.x,
        center.y,
        radius
    );

    world
        .terrain
        .carve_disc(center.x as i32, center.y as i32, radius as i32);

    for entity in world.entities.values_mut().filter(|e| !e.dead) {
        let offset = entity.pos - center;
        let dist = offset.length().max(BLAST_MIN_DISTANCE);
        if dist < radius {
            entity.vel = offset / dist * radius;
            entity.stable = false;
        }
    }

    let debris = radius.max(0.0).floor() as usize;
    for _ in 0..debris {
        world.spawn_debris(center);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SimConfig;
    use crate::consts::DEBRIS_SPEED;
    use crate::sim::entity::{Entity, EntityKind};
    use crate::sim::terrain::Cell;

    fn world(width: usize, height: usize) -> World {
        let config = SimConfig {
            map_width: width,
            map_height: height,
            ..SimConfig::with_seed(21)
        };
        World::new(&config).unwrap()
    }

    #[test]
    fn test_shockwave_pushes_bodies_in_range() {
        let mut w = world(128, 128);
        let center = Vec2::new(64.0, 64.0);
        let near = w.spawn(Entity::probe(Vec2::new(70.0, 60.0)));
        let edge = w.spawn(Entity::probe(Vec2::new(64.0, 84.0)));
        let far = w.spawn(Entity::probe(Vec2::new(100.0, 64.0)).with_velocity(Vec2::new(1.0, 2.0)));
        for id in [near, edge, far] {
            w.get_mut(id).unwrap().stable = true;
        }

        detonate(&mut w, center, 20.0);

        let n = w.get(near).unwrap();
        assert!((n.vel.length() - 20.0).abs() < 1e-4);
        let away = (n.pos - center).normalize();
        assert!(n.vel.normalize().dot(away) > 0.9999);
        assert!(!n.stable);

        // Exactly at the radius is out of range
        let e = w.get(edge).unwrap();
        assert_eq!(e.vel, Vec2::ZERO);
        assert!(e.stable);

        let f = w.get(far).unwrap();
        assert_eq!(f.vel, Vec2::new(1.0, 2.0));
        assert!(f.stable);
    }

    #[test]
    fn test_body_at_centre_stays_finite() {
        let mut w = world(64, 64);
        let id = w.spawn(Entity::probe(Vec2::new(32.0, 32.0)));
        detonate(&mut w, Vec2::new(32.0, 32.0), 10.0);
        assert!(w.get(id).unwrap().vel.is_finite());
    }

    #[test]
    fn test_debris_count_and_speed() {
        let mut w = world(64, 64);
        detonate(&mut w, Vec2::new(30.0, 30.0), 7.9);
        assert_eq!(w.count_kind(EntityKind::Debris), 7);
        for debris in w.entities.values() {
            assert_eq!(debris.pos, Vec2::new(30.0, 30.0));
            assert!((debris.vel.length() - DEBRIS_SPEED).abs() < 1e-4);
        }
    }

    #[test]
    fn test_zero_radius_does_nothing() {
        let mut w = world(32, 32);
        w.terrain.fill(Cell::Solid);
        let id = w.spawn(Entity::probe(Vec2::new(16.0, 16.0)));
        detonate(&mut w, Vec2::new(16.0, 16.0), 0.0);
        assert_eq!(w.terrain.solid_count(), 32 * 32);
        assert_eq!(w.len(), 1);
        assert_eq!(w.get(id).unwrap().vel, Vec2::ZERO);
    }

    #[test]
    fn test_map_scale_blast() {
        // 1024x512 map opening on a mid-height ridge; blast 10 units into the sky
        let mut w = world(1024, 512);
        w.regenerate_terrain(8, 2.0);
        assert_eq!(w.terrain.surface_height(0), 256);
        w.terrain.fill(Cell::Solid);

        detonate(&mut w, Vec2::new(512.0, 100.0), 10.0);

        for y in 85i32..=115 {
            for x in 497i32..=527 {
                let d2 = (x - 512).pow(2) + (y - 100).pow(2);
                if d2 <= 10 * 10 {
                    assert!(!w.terrain.is_solid(x, y), "({x},{y}) should be carved");
                } else if d2 > 11 * 11 {
                    assert!(w.terrain.is_solid(x, y), "({x},{y}) should be intact");
                }
            }
        }

        assert_eq!(w.len(), 10);
        for debris in w.entities.values() {
            assert_eq!(debris.kind, EntityKind::Debris);
            assert_eq!(debris.friction, 0.8);
            assert!((debris.vel.length() - 10.0).abs() < 1e-4);
        }
    }
}
