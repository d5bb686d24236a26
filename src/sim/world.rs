//! Terrain plus the bodies living on it
//!
//! Entities sit in a generational arena. An `EntityId` stays valid only until
//! its entity is reaped; after that every lookup through it returns `None`,
//! even if the slot is reused.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use slotmap::{SlotMap, new_key_type};

use super::entity::{Entity, EntityKind};
use super::terrain::TerrainField;
use crate::config::SimConfig;
use crate::error::SimError;

new_key_type! {
    /// Weak, generation-checked handle to an entity
    pub struct EntityId;
}

/// Terrain, bodies and the run's random stream
#[derive(Debug, Clone)]
pub struct World {
    pub terrain: TerrainField,
    pub entities: SlotMap<EntityId, Entity>,
    rng: Pcg32,
}

impl World {
    /// Allocate the terrain (left empty until generated) and seed the RNG
    pub fn new(config: &SimConfig) -> Result<Self, SimError> {
        let terrain = TerrainField::new(config.map_width, config.map_height)?;
        Ok(Self {
            terrain,
            entities: SlotMap::with_key(),
            rng: Pcg32::seed_from_u64(config.seed),
        })
    }

    /// Overwrite the terrain with a freshly seeded profile
    pub fn regenerate_terrain(&mut self, octaves: u32, bias: f32) {
        self.terrain.generate_with_rng(&mut self.rng, octaves, bias);
    }

    pub fn spawn(&mut self, entity: Entity) -> EntityId {
        self.entities.insert(entity)
    }

    /// Spawn a blast fragment at `pos` with a random heading
    pub fn spawn_debris(&mut self, pos: Vec2) -> EntityId {
        let debris = Entity::debris(pos, &mut self.rng);
        self.entities.insert(debris)
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(id)
    }

    /// Resolve a weak handle, clearing it if its entity is gone
    pub fn resolve(&self, handle: &mut Option<EntityId>) -> Option<&Entity> {
        let entity = handle.and_then(|id| self.entities.get(id));
        if entity.is_none() {
            *handle = None;
        }
        entity
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Number of live entities of one variant
    pub fn count_kind(&self, kind: EntityKind) -> usize {
        self.entities.values().filter(|e| e.kind == kind).count()
    }

    /// True when every live entity is at rest (an empty world is at rest)
    pub fn is_stable(&self) -> bool {
        self.entities.values().all(|e| e.stable)
    }

    /// Remove dead entities, returning the handles that just went stale
    pub fn reap(&mut self) -> Vec<EntityId> {
        let dead: Vec<EntityId> = self
            .entities
            .iter()
            .filter(|(_, e)| e.dead)
            .map(|(id, _)| id)
            .collect();
        for &id in &dead {
            self.entities.remove(id);
        }
        if !dead.is_empty() {
            log::debug!("Reaped {} entities, {} remain", dead.len(), self.entities.len());
        }
        dead
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_world() -> World {
        let config = SimConfig {
            map_width: 64,
            map_height: 32,
            ..SimConfig::with_seed(11)
        };
        World::new(&config).unwrap()
    }

    #[test]
    fn test_empty_world_is_stable() {
        let world = small_world();
        assert!(world.is_empty());
        assert!(world.is_stable());
    }

    #[test]
    fn test_stability_needs_every_entity() {
        let mut world = small_world();
        let a = world.spawn(Entity::probe(Vec2::new(5.0, 5.0)));
        let b = world.spawn(Entity::probe(Vec2::new(9.0, 5.0)));
        assert!(!world.is_stable());

        world.get_mut(a).unwrap().stable = true;
        assert!(!world.is_stable());
        world.get_mut(b).unwrap().stable = true;
        assert!(world.is_stable());
    }

    #[test]
    fn test_reap_invalidates_handles() {
        let mut world = small_world();
        let keep = world.spawn(Entity::probe(Vec2::ZERO));
        let doomed = world.spawn(Entity::projectile(Vec2::ZERO, Vec2::X));
        world.get_mut(doomed).unwrap().dead = true;

        let reaped = world.reap();
        assert_eq!(reaped, vec![doomed]);
        assert!(world.get(doomed).is_none());
        assert!(world.get(keep).is_some());

        // A new entity may reuse the slot but not the handle
        let fresh = world.spawn(Entity::probe(Vec2::ONE));
        assert_ne!(fresh, doomed);
        assert!(world.get(doomed).is_none());
    }

    #[test]
    fn test_resolve_clears_stale_handle() {
        let mut world = small_world();
        let id = world.spawn(Entity::probe(Vec2::ZERO));
        let mut handle = Some(id);
        assert!(world.resolve(&mut handle).is_some());
        assert_eq!(handle, Some(id));

        world.get_mut(id).unwrap().dead = true;
        world.reap();
        assert!(world.resolve(&mut handle).is_none());
        assert_eq!(handle, None);
    }

    #[test]
    fn test_same_seed_same_world() {
        let mut a = small_world();
        let mut b = small_world();
        a.regenerate_terrain(8, 2.0);
        b.regenerate_terrain(8, 2.0);
        assert_eq!(a.terrain, b.terrain);

        let da = a.spawn_debris(Vec2::new(10.0, 10.0));
        let db = b.spawn_debris(Vec2::new(10.0, 10.0));
        assert_eq!(a.get(da).unwrap().vel, b.get(db).unwrap().vel);
    }
}
