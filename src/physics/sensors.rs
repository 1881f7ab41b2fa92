//! Physics domain: proximity sensors for ground, walls, ceilings and ledges.
//!
//! Two flavours live here. The free functions are stateless queries asked on
//! demand. [`SensorState`] holds the trigger-style booleans, which change only
//! when a probe volume starts or stops overlapping tagged geometry.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::physics::{
    ColliderShape, CollisionWorld, KinematicBody, RayHit, SurfaceFilter,
};

/// Probe box relative to the body position. `offset_x` points the way the
/// character faces and is mirrored when it turns.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorVolume {
    pub offset_x: f32,
    pub offset_y: f32,
    pub width: f32,
    pub height: f32,
}

impl SensorVolume {
    pub fn center(&self, position: Vec2, facing_sign: f32) -> Vec2 {
        position + Vec2::new(self.offset_x * facing_sign, self.offset_y)
    }

    pub fn half_extents(&self) -> Vec2 {
        Vec2::new(self.width, self.height) * 0.5
    }
}

/// Which probe volumes a character carries. A missing probe disables the
/// subsystem that depends on it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorLayout {
    /// In front of the head, overlapping ledge zones.
    pub ledge: Option<SensorVolume>,
    /// Just past the leading edge, overlapping solid walls.
    pub wall: Option<SensorVolume>,
    /// Just past the leading edge, overlapping climbable walls.
    pub climbable: Option<SensorVolume>,
}

impl Default for SensorLayout {
    fn default() -> Self {
        Self {
            ledge: Some(SensorVolume {
                offset_x: 14.0,
                offset_y: 22.0,
                width: 8.0,
                height: 10.0,
            }),
            wall: Some(SensorVolume {
                offset_x: 13.0,
                offset_y: 0.0,
                width: 4.0,
                height: 30.0,
            }),
            climbable: Some(SensorVolume {
                offset_x: 13.0,
                offset_y: 0.0,
                width: 6.0,
                height: 40.0,
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SensorKind {
    Ledge,
    Wall,
    Climbable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorTransition {
    Entered(SensorKind),
    Exited(SensorKind),
}

/// Raw overlap result for every probe this tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TriggerSample {
    pub ledge: bool,
    pub wall: bool,
    pub climbable: bool,
}

/// Trigger-style proximity flags. Read-only to the movement subsystems.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SensorState {
    near_ledge: bool,
    near_wall: bool,
    close_to_climbable_wall: bool,
}

impl SensorState {
    pub fn is_near_ledge(&self) -> bool {
        self.near_ledge
    }

    pub fn is_near_wall(&self) -> bool {
        self.near_wall
    }

    pub fn is_close_to_climbable_wall(&self) -> bool {
        self.close_to_climbable_wall
    }

    fn flag_mut(&mut self, kind: SensorKind) -> &mut bool {
        match kind {
            SensorKind::Ledge => &mut self.near_ledge,
            SensorKind::Wall => &mut self.near_wall,
            SensorKind::Climbable => &mut self.close_to_climbable_wall,
        }
    }

    /// Trigger enter. Returns whether the flag changed.
    pub fn enter(&mut self, kind: SensorKind) -> bool {
        !std::mem::replace(self.flag_mut(kind), true)
    }

    /// Trigger exit. Returns whether the flag changed.
    pub fn exit(&mut self, kind: SensorKind) -> bool {
        std::mem::replace(self.flag_mut(kind), false)
    }

    /// Turn a fresh overlap sample into enter/exit edges.
    pub fn apply(&mut self, sample: TriggerSample) -> Vec<SensorTransition> {
        let mut transitions = Vec::new();
        for (kind, overlapping) in [
            (SensorKind::Ledge, sample.ledge),
            (SensorKind::Wall, sample.wall),
            (SensorKind::Climbable, sample.climbable),
        ] {
            if overlapping && self.enter(kind) {
                transitions.push(SensorTransition::Entered(kind));
            } else if !overlapping && self.exit(kind) {
                transitions.push(SensorTransition::Exited(kind));
            }
        }
        transitions
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Overlap every configured probe against its tagged geometry.
pub fn sample_triggers(
    world: &impl CollisionWorld,
    position: Vec2,
    facing_sign: f32,
    layout: &SensorLayout,
) -> TriggerSample {
    let probe = |volume: Option<SensorVolume>, filter: SurfaceFilter| {
        volume.is_some_and(|v| {
            world.overlaps_box(v.center(position, facing_sign), v.half_extents(), filter)
        })
    };
    TriggerSample {
        ledge: probe(layout.ledge, SurfaceFilter::LEDGE),
        wall: probe(layout.wall, SurfaceFilter::SOLID),
        climbable: probe(layout.climbable, SurfaceFilter::CLIMBABLE),
    }
}

/// Solid ground within `reach` below the feet.
pub fn ground_below(world: &impl CollisionWorld, body: &KinematicBody, reach: f32) -> Option<RayHit> {
    let shape = body.shape();
    let feet = Vec2::new(body.center().x, shape.bottom(body.position()));
    world.cast_ray(feet, Dir2::NEG_Y, reach, SurfaceFilter::SOLID)
}

/// Solid wall within `reach` past the leading edge, measured from the center.
pub fn wall_ahead(
    world: &impl CollisionWorld,
    body: &KinematicBody,
    facing_sign: f32,
    reach: f32,
) -> Option<RayHit> {
    let direction = if facing_sign < 0.0 { Dir2::NEG_X } else { Dir2::X };
    let half_width = body.shape().half_extents().x;
    world.cast_ray(body.center(), direction, half_width + reach, SurfaceFilter::SOLID)
}

/// Solid ceiling within `reach` above the head.
pub fn ceiling_above(
    world: &impl CollisionWorld,
    body: &KinematicBody,
    reach: f32,
) -> Option<RayHit> {
    let shape = body.shape();
    let head = Vec2::new(body.center().x, shape.top(body.position()));
    world.cast_ray(head, Dir2::Y, reach, SurfaceFilter::SOLID)
}

/// Whether `shape` placed at `position` is free of solid geometry. The shell
/// is shaved off so resting contacts do not count.
pub fn shape_is_clear(
    world: &impl CollisionWorld,
    position: Vec2,
    shape: &ColliderShape,
    shell: f32,
) -> bool {
    let half = (shape.half_extents() - Vec2::splat(shell)).max(Vec2::ZERO);
    !world.overlaps_box(shape.center(position), half, SurfaceFilter::SOLID)
}

/// Ray probes used to locate a ledge corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgeProbe {
    /// How far below the head the wall must still be present.
    pub grab_depth: f32,
    /// How far above the head the top surface may sit.
    pub probe_height: f32,
    /// Horizontal step past the wall face for the downward probe.
    pub probe_inset: f32,
    /// Reach past the leading edge for the wall probe.
    pub reach: f32,
}

impl Default for LedgeProbe {
    fn default() -> Self {
        Self {
            grab_depth: 10.0,
            probe_height: 12.0,
            probe_inset: 2.0,
            reach: 8.0,
        }
    }
}

/// Find the top corner of a wall in front of the head.
///
/// A horizontal ray just below the head must find a wall face, and a
/// downward ray dropped just past that face from above the head must land on
/// the wall's top. Walls that continue above the probe yield nothing.
pub fn ledge_corner(
    world: &impl CollisionWorld,
    body: &KinematicBody,
    facing_sign: f32,
    probe: &LedgeProbe,
) -> Option<Vec2> {
    let shape = body.shape();
    let center = body.center();
    let head = shape.top(body.position());
    let direction = if facing_sign < 0.0 { Dir2::NEG_X } else { Dir2::X };

    let chest = Vec2::new(center.x, head - probe.grab_depth);
    let face = world.cast_ray(
        chest,
        direction,
        shape.half_extents().x + probe.reach,
        SurfaceFilter::SOLID,
    )?;

    let top_probe = Vec2::new(
        face.point.x + direction.x * probe.probe_inset,
        head + probe.probe_height,
    );
    let top = world.cast_ray(
        top_probe,
        Dir2::NEG_Y,
        probe.probe_height + probe.grab_depth,
        SurfaceFilter::SOLID,
    )?;
    if top.distance <= 0.0 {
        return None;
    }

    Some(Vec2::new(face.point.x, top.point.y))
}
