//! Viewport tracking
//!
//! The camera eases toward whatever entity it tracks, can be nudged by
//! pushing the pointer against a viewport edge, and is always kept inside
//! the terrain.

use glam::Vec2;

use super::world::{EntityId, World};
use crate::config::SimConfig;

/// Viewport origin in world space plus the entity it follows
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Weak handle; cleared when the entity is reaped
    pub target: Option<EntityId>,
    /// Where the camera is easing toward
    pub target_pos: Vec2,
    /// Current (smoothed) viewport origin
    pub pos: Vec2,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

impl Camera {
    pub fn new() -> Self {
        Self {
            target: None,
            target_pos: Vec2::ONE,
            pos: Vec2::ONE,
        }
    }

    pub fn follow(&mut self, id: EntityId) {
        self.target = Some(id);
    }

    /// Drop the target if it is the given entity
    pub fn forget(&mut self, id: EntityId) {
        if self.target == Some(id) {
            self.target = None;
        }
    }

    /// Advance one tick.
    ///
    /// `pointer` is in screen space; `None` when the pointer is outside the
    /// window, which disables edge scrolling.
    pub fn update(
        &mut self,
        world: &World,
        pointer: Option<Vec2>,
        viewport: Vec2,
        dt: f32,
        config: &SimConfig,
    ) {
        if let Some(pointer) = pointer {
            let scroll = edge_scroll(pointer, viewport, config.camera_edge_margin)
                * config.camera_scroll_speed
                * dt;
            self.pos += scroll;
            self.target_pos += scroll;
        }

        if let Some(entity) = world.resolve(&mut self.target) {
            self.target_pos = entity.pos - viewport / 2.0;
        }

        let blend = (config.camera_smoothing * dt).clamp(0.0, 1.0);
        self.pos += (self.target_pos - self.pos) * blend;

        let map = world.terrain.size();
        self.pos = clamp_to_map(self.pos, viewport, map);
        self.target_pos = clamp_to_map(self.target_pos, viewport, map);
    }

    /// Convert a screen position to world space
    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        screen + self.pos
    }

    /// Convert a world position to screen space
    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        world - self.pos
    }
}

/// Unit scroll direction for a pointer near the viewport edges
fn edge_scroll(pointer: Vec2, viewport: Vec2, margin: f32) -> Vec2 {
    let mut dir = Vec2::ZERO;
    if pointer.x < margin {
        dir.x -= 1.0;
    }
    if pointer.x > viewport.x - margin {
        dir.x += 1.0;
    }
    if pointer.y < margin {
        dir.y -= 1.0;
    }
    if pointer.y > viewport.y - margin {
        dir.y += 1.0;
    }
    dir
}

/// Keep the viewport origin in `[1, map - viewport - 1]` on each axis
fn clamp_to_map(pos: Vec2, viewport: Vec2, map: Vec2) -> Vec2 {
    let max = (map - viewport - Vec2::ONE).max(Vec2::ONE);
    pos.clamp(Vec2::ONE, max)
}
