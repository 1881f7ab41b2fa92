//! Movement domain: ECS components attached to the player entity.

use bevy::prelude::*;

use crate::physics::ColliderShape;

#[derive(Component, Debug)]
pub struct Player;

/// Collider shape last pushed to the physics engine, so the avian collider
/// is only rebuilt when crouching or standing changes it.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct SyncedShape(pub ColliderShape);

/// Child entity carrying the player's sprite, placed at the motor's sprite
/// offset.
#[derive(Component, Debug)]
pub struct PlayerSprite;
