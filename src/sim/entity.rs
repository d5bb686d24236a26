//! Physical bodies and their per-variant behavior
//!
//! Every body shares one data layout; the variant tag selects its defaults,
//! how it is drawn and what happens when its bounce budget runs out.

use std::sync::LazyLock;

use glam::Vec2;
use rand::Rng;

use crate::consts::{DEBRIS_SPEED, PROJECTILE_BLAST_RADIUS};
use crate::polar_to_cartesian;

/// Body variants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    /// Short-lived blast fragment
    Debris,
    /// Inert debug body
    Probe,
    /// Fired shell; explodes on its first impact
    Projectile,
    /// The player's unit
    ControlUnit,
}

/// What a body does when its bounce budget reaches zero
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DeathAction {
    /// Just disappear
    None,
    /// Detonate at the body's position
    Explode { radius: f32 },
}

/// How the renderer should draw a variant
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawShape {
    /// Line loop in unit space, scaled by radius and rotated by facing
    Wireframe(&'static [Vec2]),
    /// Cell of the unit sprite sheet (`col`, `row`, size in pixels)
    Sprite { col: u32, row: u32, size: u32 },
}

/// Static per-variant data
#[derive(Debug, Clone, Copy)]
pub struct KindSpec {
    pub radius: f32,
    pub friction: f32,
    /// Negative means unlimited
    pub bounces: i32,
    pub death: DeathAction,
}

const DEBRIS_SPEC: KindSpec = KindSpec {
    radius: 1.0,
    friction: 0.8,
    bounces: 5,
    death: DeathAction::None,
};

const PROBE_SPEC: KindSpec = KindSpec {
    radius: 4.0,
    friction: 0.8,
    bounces: -1,
    death: DeathAction::None,
};

const PROJECTILE_SPEC: KindSpec = KindSpec {
    radius: 2.5,
    friction: 0.5,
    bounces: 1,
    death: DeathAction::Explode {
        radius: PROJECTILE_BLAST_RADIUS,
    },
};

const CONTROL_UNIT_SPEC: KindSpec = KindSpec {
    radius: 3.5,
    friction: 0.2,
    bounces: -1,
    death: DeathAction::None,
};

static DEBRIS_MODEL: [Vec2; 4] = [
    Vec2::new(0.0, 0.0),
    Vec2::new(1.0, 0.0),
    Vec2::new(1.0, 1.0),
    Vec2::new(0.0, 1.0),
];

/// Arrow outline, pre-divided by its 2.5 unit length so it scales by radius
static PROJECTILE_MODEL: [Vec2; 12] = [
    Vec2::new(0.0, 0.0),
    Vec2::new(0.4, 0.4),
    Vec2::new(0.8, 0.4),
    Vec2::new(1.0, 0.0),
    Vec2::new(0.8, -0.4),
    Vec2::new(0.4, -0.4),
    Vec2::new(0.0, 0.0),
    Vec2::new(-0.4, -0.4),
    Vec2::new(-1.0, -0.4),
    Vec2::new(-0.8, 0.0),
    Vec2::new(-1.0, 0.4),
    Vec2::new(-0.4, 0.4),
];

/// Centre point followed by a closed ring of ten points
static PROBE_MODEL: LazyLock<Vec<Vec2>> = LazyLock::new(|| {
    std::iter::once(Vec2::ZERO)
        .chain((0..10).map(|i| polar_to_cartesian(1.0, i as f32 / 9.0 * std::f32::consts::TAU)))
        .collect()
});

impl EntityKind {
    /// Physical defaults and death action
    pub fn spec(self) -> &'static KindSpec {
        match self {
            EntityKind::Debris => &DEBRIS_SPEC,
            EntityKind::Probe => &PROBE_SPEC,
            EntityKind::Projectile => &PROJECTILE_SPEC,
            EntityKind::ControlUnit => &CONTROL_UNIT_SPEC,
        }
    }

    pub fn death_action(self) -> DeathAction {
        self.spec().death
    }

    pub fn draw_shape(self) -> DrawShape {
        match self {
            EntityKind::Debris => DrawShape::Wireframe(&DEBRIS_MODEL),
            EntityKind::Probe => DrawShape::Wireframe(PROBE_MODEL.as_slice()),
            EntityKind::Projectile => DrawShape::Wireframe(&PROJECTILE_MODEL),
            EntityKind::ControlUnit => DrawShape::Sprite {
                col: 0,
                row: 0,
                size: 8,
            },
        }
    }

    /// Only the player's unit can be aimed and fired from
    pub fn is_controllable(self) -> bool {
        self == EntityKind::ControlUnit
    }
}

/// A physical body
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub kind: EntityKind,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Accumulated this substep; cleared after integration
    pub acc: Vec2,
    pub radius: f32,
    /// Fraction of speed kept on a bounce
    pub friction: f32,
    /// Impacts left before death; negative is unlimited
    pub bounces_left: i32,
    pub stable: bool,
    pub dead: bool,
    /// Facing used for aiming (ControlUnit only)
    pub aim: f32,
}

impl Entity {
    /// A body of `kind` at rest at `pos`
    pub fn new(kind: EntityKind, pos: Vec2) -> Self {
        let spec = kind.spec();
        Self {
            kind,
            pos,
            vel: Vec2::ZERO,
            acc: Vec2::ZERO,
            radius: spec.radius,
            friction: spec.friction,
            bounces_left: spec.bounces,
            stable: false,
            dead: false,
            aim: 0.0,
        }
    }

    pub fn with_velocity(mut self, vel: Vec2) -> Self {
        self.vel = vel;
        self
    }

    /// Blast fragment flung in a random direction
    pub fn debris<R: Rng + ?Sized>(pos: Vec2, rng: &mut R) -> Self {
        let angle = rng.random_range(0.0..std::f32::consts::TAU);
        Self::new(EntityKind::Debris, pos).with_velocity(polar_to_cartesian(DEBRIS_SPEED, angle))
    }

    pub fn projectile(pos: Vec2, vel: Vec2) -> Self {
        Self::new(EntityKind::Projectile, pos).with_velocity(vel)
    }

    pub fn control_unit(pos: Vec2) -> Self {
        Self::new(EntityKind::ControlUnit, pos)
    }

    pub fn probe(pos: Vec2) -> Self {
        Self::new(EntityKind::Probe, pos)
    }

    /// Direction of travel
    pub fn facing(&self) -> f32 {
        self.vel.y.atan2(self.vel.x)
    }

    /// Record one terrain impact against the bounce budget.
    ///
    /// Returns the death action if this impact used up the budget.
    pub fn register_bounce(&mut self) -> Option<DeathAction> {
        if self.bounces_left <= 0 {
            return None;
        }
        self.bounces_left -= 1;
        if self.bounces_left == 0 {
            self.dead = true;
            return Some(self.kind.death_action());
        }
        None
    }
}
