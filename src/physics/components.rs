//! Physics domain: collision layers and surface tagging for level geometry.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::physics::SurfaceKind;

/// Physics layers for collision filtering
#[derive(PhysicsLayer, Clone, Copy, Debug, Default)]
pub enum GameLayer {
    #[default]
    Default,
    /// Floors, platforms and plain walls
    Ground,
    /// Solid walls that can be climbed
    ClimbableWall,
    /// Ledge corner zones - should not block movement
    Ledge,
    /// Player character
    Player,
    /// Other sensors and triggers
    Sensor,
}

impl From<SurfaceKind> for GameLayer {
    fn from(kind: SurfaceKind) -> Self {
        match kind {
            SurfaceKind::Ground => GameLayer::Ground,
            SurfaceKind::ClimbableWall => GameLayer::ClimbableWall,
            SurfaceKind::Ledge => GameLayer::Ledge,
        }
    }
}

/// Semantic tag for a static level collider.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Surface(pub SurfaceKind);

impl Surface {
    /// Collision layers a surface of this kind is spawned with.
    pub fn layers(self) -> CollisionLayers {
        CollisionLayers::new(GameLayer::from(self.0), [GameLayer::Player])
    }
}
