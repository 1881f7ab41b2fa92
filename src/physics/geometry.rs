//! Physics domain: collision queries against static level geometry.
//!
//! The movement core only ever talks to [`CollisionWorld`]. In game the
//! queries are answered by avian's spatial query pipeline; headless runs and
//! tests use [`StaticGeometry`], a flat list of axis-aligned boxes.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Semantic surface kinds, resolved once when geometry is spawned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Reflect)]
pub enum SurfaceKind {
    /// Floors, platforms and plain walls.
    Ground,
    /// Solid wall the character may attach to and climb.
    ClimbableWall,
    /// Non-solid zone marking a grabbable ledge corner.
    Ledge,
}

impl SurfaceKind {
    pub const ALL: [SurfaceKind; 3] = [
        SurfaceKind::Ground,
        SurfaceKind::ClimbableWall,
        SurfaceKind::Ledge,
    ];

    /// Whether the surface blocks movement.
    pub fn is_solid(self) -> bool {
        !matches!(self, SurfaceKind::Ledge)
    }

    const fn bit(self) -> u8 {
        match self {
            SurfaceKind::Ground => 1,
            SurfaceKind::ClimbableWall => 1 << 1,
            SurfaceKind::Ledge => 1 << 2,
        }
    }
}

/// Set of surface kinds a query considers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceFilter(u8);

impl SurfaceFilter {
    /// Everything that blocks movement.
    pub const SOLID: Self = Self(SurfaceKind::Ground.bit() | SurfaceKind::ClimbableWall.bit());
    pub const CLIMBABLE: Self = Self(SurfaceKind::ClimbableWall.bit());
    pub const LEDGE: Self = Self(SurfaceKind::Ledge.bit());

    pub fn contains(self, kind: SurfaceKind) -> bool {
        self.0 & kind.bit() != 0
    }

    pub fn kinds(self) -> impl Iterator<Item = SurfaceKind> {
        SurfaceKind::ALL
            .into_iter()
            .filter(move |kind| self.contains(*kind))
    }
}

/// One contact reported by a shape sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeHit {
    /// Travel along the sweep direction before touching the surface.
    pub distance: f32,
    /// Outward surface normal at the contact.
    pub normal: Vec2,
    pub kind: SurfaceKind,
}

/// Closest hit reported by a ray query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub distance: f32,
    pub point: Vec2,
    pub normal: Vec2,
    pub kind: SurfaceKind,
}

/// Read-only queries against the static "ground" layer and tagged surfaces.
///
/// Shapes are axis-aligned boxes given by center and half extents, which is
/// the only collider shape the character ever uses.
pub trait CollisionWorld {
    /// Sweep a box along `direction` and report every contact within
    /// `max_distance`, nearest first. A box already touching or overlapping a
    /// surface it moves into reports that surface at distance zero.
    fn cast_box(
        &self,
        center: Vec2,
        half_extents: Vec2,
        direction: Dir2,
        max_distance: f32,
        filter: SurfaceFilter,
    ) -> Vec<ShapeHit>;

    /// Whether a box strictly overlaps any matching surface.
    fn overlaps_box(&self, center: Vec2, half_extents: Vec2, filter: SurfaceFilter) -> bool;

    /// Cast a ray and return the closest matching hit. Rays starting inside a
    /// surface hit it at distance zero.
    fn cast_ray(
        &self,
        origin: Vec2,
        direction: Dir2,
        max_distance: f32,
        filter: SurfaceFilter,
    ) -> Option<RayHit>;
}

/// In-memory level made of axis-aligned boxes.
#[derive(Debug, Clone, Default)]
pub struct StaticGeometry {
    surfaces: Vec<(Rect, SurfaceKind)>,
}

impl StaticGeometry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, center: Vec2, size: Vec2, kind: SurfaceKind) -> &mut Self {
        self.surfaces.push((Rect::from_center_size(center, size), kind));
        self
    }

    pub fn with(mut self, center: Vec2, size: Vec2, kind: SurfaceKind) -> Self {
        self.add(center, size, kind);
        self
    }

    /// Solid ground block with ledge zones of `zone` size centered on both
    /// top corners.
    pub fn with_ledged_block(mut self, center: Vec2, size: Vec2, zone: Vec2) -> Self {
        self.add(center, size, SurfaceKind::Ground);
        let half = size * 0.5;
        for corner in [
            Vec2::new(center.x - half.x, center.y + half.y),
            Vec2::new(center.x + half.x, center.y + half.y),
        ] {
            self.add(corner, zone, SurfaceKind::Ledge);
        }
        self
    }

    fn matching(&self, filter: SurfaceFilter) -> impl Iterator<Item = &(Rect, SurfaceKind)> {
        self.surfaces
            .iter()
            .filter(move |(_, kind)| filter.contains(*kind))
    }
}

impl CollisionWorld for StaticGeometry {
    fn cast_box(
        &self,
        center: Vec2,
        half_extents: Vec2,
        direction: Dir2,
        max_distance: f32,
        filter: SurfaceFilter,
    ) -> Vec<ShapeHit> {
        let dir = *direction;
        let mut hits: Vec<ShapeHit> = self
            .matching(filter)
            .filter_map(|(rect, kind)| {
                // Sweeping a box against a box is a ray against the
                // Minkowski sum of the two.
                let expanded = Rect {
                    min: rect.min - half_extents,
                    max: rect.max + half_extents,
                };
                sweep_point(center, dir, expanded, max_distance).map(|(distance, normal)| {
                    ShapeHit {
                        distance,
                        normal,
                        kind: *kind,
                    }
                })
            })
            .collect();
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }

    fn overlaps_box(&self, center: Vec2, half_extents: Vec2, filter: SurfaceFilter) -> bool {
        let min = center - half_extents;
        let max = center + half_extents;
        self.matching(filter).any(|(rect, _)| {
            min.x < rect.max.x && max.x > rect.min.x && min.y < rect.max.y && max.y > rect.min.y
        })
    }

    fn cast_ray(
        &self,
        origin: Vec2,
        direction: Dir2,
        max_distance: f32,
        filter: SurfaceFilter,
    ) -> Option<RayHit> {
        let dir = *direction;
        self.matching(filter)
            .filter_map(|(rect, kind)| {
                if strictly_inside(origin, *rect) {
                    return Some(RayHit {
                        distance: 0.0,
                        point: origin,
                        normal: exit_normal(origin, *rect),
                        kind: *kind,
                    });
                }
                sweep_point(origin, dir, *rect, max_distance).map(|(distance, normal)| RayHit {
                    distance,
                    point: origin + dir * distance,
                    normal,
                    kind: *kind,
                })
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }
}

/// Slab test of a moving point against a box. Returns the entry distance and
/// the normal of the entry face. Points grazing a face while moving parallel
/// to it do not hit.
fn sweep_point(origin: Vec2, dir: Vec2, rect: Rect, max_distance: f32) -> Option<(f32, Vec2)> {
    if strictly_inside(origin, rect) {
        // Already penetrating: only block motion that digs further in.
        let normal = exit_normal(origin, rect);
        return (dir.dot(normal) < 0.0).then_some((0.0, normal));
    }

    let mut t_enter = f32::NEG_INFINITY;
    let mut t_exit = f32::INFINITY;
    let mut normal = Vec2::ZERO;

    for axis in 0..2 {
        let o = origin[axis];
        let d = dir[axis];
        if d.abs() <= f32::EPSILON {
            if o <= rect.min[axis] || o >= rect.max[axis] {
                return None;
            }
            continue;
        }
        let mut t0 = (rect.min[axis] - o) / d;
        let mut t1 = (rect.max[axis] - o) / d;
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }
        if t0 > t_enter {
            t_enter = t0;
            normal = Vec2::ZERO;
            normal[axis] = -d.signum();
        }
        t_exit = t_exit.min(t1);
    }

    if t_enter >= t_exit || t_exit <= 0.0 || t_enter > max_distance {
        return None;
    }
    Some((t_enter.max(0.0), normal))
}

fn strictly_inside(point: Vec2, rect: Rect) -> bool {
    point.x > rect.min.x && point.x < rect.max.x && point.y > rect.min.y && point.y < rect.max.y
}

/// Normal of the face closest to a point inside the box.
fn exit_normal(point: Vec2, rect: Rect) -> Vec2 {
    let candidates = [
        (point.x - rect.min.x, Vec2::NEG_X),
        (rect.max.x - point.x, Vec2::X),
        (point.y - rect.min.y, Vec2::NEG_Y),
        (rect.max.y - point.y, Vec2::Y),
    ];
    candidates
        .into_iter()
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, normal)| normal)
        .unwrap_or(Vec2::Y)
}
