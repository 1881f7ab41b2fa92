//! Physics domain: kinematic integration and sweep-based collision resolution.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::physics::{ColliderShape, CollisionWorld, SurfaceFilter};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyTuning {
    /// Downward acceleration in units/s².
    pub gravity: f32,
    /// Gravity modifier the body spawns with and returns to after climbing.
    pub gravity_modifier: f32,
    /// Gap kept between the collider and any surface.
    pub shell_radius: f32,
    /// Sweeps shorter than this are skipped.
    pub min_move_distance: f32,
    /// Minimum normal y for a contact to count as ground.
    pub min_ground_normal_y: f32,
}

impl Default for BodyTuning {
    fn default() -> Self {
        Self {
            gravity: 1200.0,
            gravity_modifier: 1.0,
            shell_radius: 0.5,
            min_move_distance: 0.01,
            min_ground_normal_y: 0.65,
        }
    }
}

/// Who advances the body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BodyKind {
    /// Integrated and resolved every tick.
    #[default]
    Dynamic,
    /// Moved only through the position mutators.
    Kinematic,
}

/// Position, velocity and contact state of the character.
///
/// `grounded` is re-derived from contacts on every integrated tick; it is
/// never carried over.
#[derive(Debug, Clone)]
pub struct KinematicBody {
    position: Vec2,
    velocity: Vec2,
    target_velocity: Vec2,
    grounded: bool,
    ground_normal: Vec2,
    gravity_modifier: f32,
    frozen: bool,
    passive: bool,
    kind: BodyKind,
    shape: ColliderShape,
}

impl KinematicBody {
    pub fn new(position: Vec2, shape: ColliderShape, gravity_modifier: f32) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            target_velocity: Vec2::ZERO,
            grounded: false,
            ground_normal: Vec2::Y,
            gravity_modifier,
            frozen: false,
            passive: false,
            kind: BodyKind::Dynamic,
            shape,
        }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn grounded(&self) -> bool {
        self.grounded
    }

    pub fn ground_normal(&self) -> Vec2 {
        self.ground_normal
    }

    pub fn gravity_modifier(&self) -> f32 {
        self.gravity_modifier
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Whether the body currently ignores level geometry.
    pub fn is_passive(&self) -> bool {
        self.passive
    }

    pub fn kind(&self) -> BodyKind {
        self.kind
    }

    pub fn shape(&self) -> ColliderShape {
        self.shape
    }

    pub fn center(&self) -> Vec2 {
        self.shape.center(self.position)
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    pub fn add_position(&mut self, delta: Vec2) {
        self.position += delta;
    }

    pub fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity;
        self.target_velocity.x = velocity.x;
    }

    pub fn set_vertical_velocity(&mut self, vy: f32) {
        self.velocity.y = vy;
    }

    /// Horizontal velocity applied on the next integration.
    pub fn set_target_horizontal(&mut self, vx: f32) {
        self.target_velocity.x = vx;
    }

    pub fn set_gravity_modifier(&mut self, modifier: f32) {
        self.gravity_modifier = modifier;
    }

    pub fn set_shape(&mut self, shape: ColliderShape) {
        self.shape = shape;
    }

    pub fn set_kind(&mut self, kind: BodyKind) {
        self.kind = kind;
    }

    pub fn set_passive(&mut self, passive: bool) {
        self.passive = passive;
    }

    /// Force the grounded flag until the next integration re-derives it.
    pub fn mark_grounded(&mut self, grounded: bool) {
        self.grounded = grounded;
    }

    /// Zero all motion and stop integrating.
    pub fn freeze(&mut self) {
        self.frozen = true;
        self.velocity = Vec2::ZERO;
        self.target_velocity = Vec2::ZERO;
    }

    pub fn unfreeze(&mut self) {
        self.frozen = false;
    }

    /// Advance one tick: gravity, then a sweep along the ground tangent and a
    /// sweep along world up.
    pub fn integrate(&mut self, dt: f32, world: &impl CollisionWorld, tuning: &BodyTuning) {
        if self.frozen || self.kind == BodyKind::Kinematic {
            // No sweep ran, so there is no ground contact this tick.
            self.grounded = false;
            return;
        }

        if self.gravity_modifier != 0.0 {
            // Falling pulls twice as hard as rising.
            let modifier = if self.velocity.y < 0.0 {
                self.gravity_modifier * 2.0
            } else {
                self.gravity_modifier
            };
            self.velocity.y -= tuning.gravity * modifier * dt;
        }

        self.velocity.x = self.target_velocity.x;
        self.grounded = false;

        let delta = self.velocity * dt;

        if self.passive {
            self.position += delta;
            return;
        }

        let along_ground = Vec2::new(self.ground_normal.y, -self.ground_normal.x);
        self.sweep(along_ground * delta.x, false, world, tuning);
        self.sweep(Vec2::Y * delta.y, true, world, tuning);
    }

    fn sweep(
        &mut self,
        motion: Vec2,
        vertical: bool,
        world: &impl CollisionWorld,
        tuning: &BodyTuning,
    ) {
        let mut distance = motion.length();
        if distance <= tuning.min_move_distance {
            return;
        }
        let Ok(direction) = Dir2::new(motion) else {
            return;
        };

        let hits = world.cast_box(
            self.center(),
            self.shape.half_extents(),
            direction,
            distance + tuning.shell_radius,
            SurfaceFilter::SOLID,
        );

        for hit in hits {
            let mut normal = hit.normal;
            if normal.y > tuning.min_ground_normal_y {
                self.grounded = true;
                if vertical {
                    self.ground_normal = normal;
                    normal.x = 0.0;
                }
            }

            if self.grounded {
                // Remove the part of the velocity pointing into the surface.
                let projection = self.velocity.dot(normal);
                if projection < 0.0 {
                    self.velocity -= projection * normal;
                }
            } else {
                self.velocity.x = 0.0;
                self.velocity.y = self.velocity.y.min(0.0);
            }

            let allowed = (hit.distance - tuning.shell_radius).max(0.0);
            distance = distance.min(allowed);
        }

        self.position += *direction * distance;
    }
}
