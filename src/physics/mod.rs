//! Physics domain: kinematic body, collision queries, and proximity sensors.

mod avian;
mod body;
mod collider;
mod components;
mod geometry;
mod sensors;

#[cfg(test)]
mod tests;

pub use avian::AvianGeometry;
pub use body::{BodyKind, BodyTuning, KinematicBody};
pub use collider::{ColliderProfile, ColliderShape, ColliderTuning};
pub use components::{GameLayer, Surface};
pub use geometry::{
    CollisionWorld, RayHit, ShapeHit, StaticGeometry, SurfaceFilter, SurfaceKind,
};
pub use sensors::{
    LedgeProbe, SensorKind, SensorLayout, SensorState, SensorTransition, SensorVolume,
    TriggerSample, ceiling_above, ground_below, ledge_corner, sample_triggers, shape_is_clear,
    wall_ahead,
};
