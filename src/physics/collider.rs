//! Physics domain: the character's box collider and its crouch variant.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Standing collider dimensions, in world units.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ColliderTuning {
    pub width: f32,
    pub height: f32,
    pub offset_x: f32,
    pub offset_y: f32,
}

impl Default for ColliderTuning {
    fn default() -> Self {
        Self {
            width: 24.0,
            height: 48.0,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }
}

impl ColliderTuning {
    pub fn shape(&self) -> ColliderShape {
        ColliderShape {
            offset: Vec2::new(self.offset_x, self.offset_y),
            size: Vec2::new(self.width, self.height),
        }
    }
}

/// Axis-aligned box relative to the body position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColliderShape {
    pub offset: Vec2,
    pub size: Vec2,
}

impl ColliderShape {
    pub fn half_extents(&self) -> Vec2 {
        self.size * 0.5
    }

    /// World-space center when the body sits at `position`.
    pub fn center(&self, position: Vec2) -> Vec2 {
        position + self.offset
    }

    pub fn bottom(&self, position: Vec2) -> f32 {
        self.center(position).y - self.size.y * 0.5
    }

    pub fn top(&self, position: Vec2) -> f32 {
        self.center(position).y + self.size.y * 0.5
    }

    /// Same width, scaled height, recentered by half the height delta so the
    /// bottom edge does not move.
    pub fn shortened(&self, height_ratio: f32) -> Self {
        let height = self.size.y * height_ratio;
        let delta = self.size.y - height;
        Self {
            offset: Vec2::new(self.offset.x, self.offset.y - delta * 0.5),
            size: Vec2::new(self.size.x, height),
        }
    }
}

/// Standing and crouching shapes captured once at spawn.
///
/// Restoring always copies the captured standing shape back; it is never
/// recomputed from the crouching one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColliderProfile {
    standing: ColliderShape,
    crouching: ColliderShape,
}

impl ColliderProfile {
    pub fn capture(standing: ColliderShape, crouch_height_ratio: f32) -> Self {
        Self {
            standing,
            crouching: standing.shortened(crouch_height_ratio),
        }
    }

    pub fn standing(&self) -> ColliderShape {
        self.standing
    }

    pub fn crouching(&self) -> ColliderShape {
        self.crouching
    }
}
