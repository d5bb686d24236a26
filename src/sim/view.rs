//! Read-only snapshot for a renderer
//!
//! Nothing here mutates the simulation. Positions are already in screen space
//! (world minus camera origin).

use glam::{UVec2, Vec2};

use super::entity::{DrawShape, EntityKind};
use super::state::Simulation;
use super::terrain::TerrainField;
use super::world::EntityId;

/// One entity to draw this frame
#[derive(Debug, Clone, PartialEq)]
pub struct DrawRequest {
    pub id: EntityId,
    pub kind: EntityKind,
    /// Screen position of the entity centre
    pub position: Vec2,
    /// Heading; aim for the controlled unit
    pub angle: f32,
    pub radius: f32,
    pub shape: DrawShape,
}

/// Draw requests for every live entity, in arena order
pub fn draw_requests(sim: &Simulation) -> Vec<DrawRequest> {
    let camera = &sim.state.camera;
    sim.world
        .entities
        .iter()
        .map(|(id, entity)| {
            let angle = if Some(id) == sim.state.controlled && entity.kind.is_controllable() {
                entity.aim
            } else {
                entity.facing()
            };
            DrawRequest {
                id,
                kind: entity.kind,
                position: camera.world_to_screen(entity.pos),
                angle,
                radius: entity.radius,
                shape: entity.kind.draw_shape(),
            }
        })
        .collect()
}

/// Row-major solid mask of the terrain under a viewport at `origin`.
///
/// Cells past the map edge read as the nearest edge cell.
pub fn terrain_mask(terrain: &TerrainField, origin: Vec2, viewport: UVec2) -> Vec<bool> {
    let (ox, oy) = (origin.x as i32, origin.y as i32);
    (0..viewport.y as i32)
        .flat_map(|sy| (0..viewport.x as i32).map(move |sx| terrain.is_solid(ox + sx, oy + sy)))
        .collect()
}

impl Simulation {
    pub fn draw_requests(&self) -> Vec<DrawRequest> {
        draw_requests(self)
    }

    /// Terrain mask for the current camera position
    pub fn terrain_view(&self, viewport: UVec2) -> Vec<bool> {
        terrain_mask(&self.world.terrain, self.state.camera.pos, viewport)
    }
}
