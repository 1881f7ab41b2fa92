//! Kinematic 2D platformer movement: a character motor with jumping, crouch
//! sliding, wall climbing, and ledge holds, driven by bevy and queried
//! against avian2d colliders.

pub mod content;
pub mod movement;
pub mod physics;

#[cfg(feature = "dev-tools")]
pub mod dev;
