//! Physics domain: tests for sweeps, integration, and sensors.

use bevy::prelude::*;
use std::cell::RefCell;

use super::{
    BodyKind, BodyTuning, ColliderProfile, ColliderShape, ColliderTuning, CollisionWorld, KinematicBody,
    LedgeProbe, RayHit, SensorKind, SensorLayout, SensorState, SensorTransition, ShapeHit,
    StaticGeometry, SurfaceFilter, SurfaceKind, TriggerSample, ceiling_above, ground_below, ledge_corner,
    sample_triggers, shape_is_clear, wall_ahead,
};

const DT: f32 = 1.0 / 60.0;

fn flat_ground() -> StaticGeometry {
    // Top surface at y = 0
    StaticGeometry::new().with(
        Vec2::new(0.0, -50.0),
        Vec2::new(2000.0, 100.0),
        SurfaceKind::Ground,
    )
}

fn body_at(position: Vec2) -> KinematicBody {
    KinematicBody::new(position, ColliderTuning::default().shape(), 1.0)
}

fn settle(body: &mut KinematicBody, world: &StaticGeometry, ticks: usize) {
    let tuning = BodyTuning::default();
    for _ in 0..ticks {
        body.integrate(DT, world, &tuning);
    }
}

// -----------------------------------------------------------------------------
// Geometry tests
// -----------------------------------------------------------------------------

#[test]
fn test_cast_box_reports_floor_distance_and_normal() {
    let world = flat_ground();
    let hits = world.cast_box(
        Vec2::new(0.0, 30.0),
        Vec2::new(12.0, 24.0),
        Dir2::NEG_Y,
        100.0,
        SurfaceFilter::SOLID,
    );

    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].distance, 6.0);
    assert_eq!(hits[0].normal, Vec2::Y);
    assert_eq!(hits[0].kind, SurfaceKind::Ground);
}

#[test]
fn test_cast_box_ignores_surface_beyond_max_distance() {
    let world = flat_ground();
    let hits = world.cast_box(
        Vec2::new(0.0, 30.0),
        Vec2::new(12.0, 24.0),
        Dir2::NEG_Y,
        5.0,
        SurfaceFilter::SOLID,
    );
    assert!(hits.is_empty());
}

#[test]
fn test_cast_box_grazing_parallel_surface_does_not_hit() {
    let world = flat_ground();
    // Bottom edge exactly on the floor, moving sideways
    let hits = world.cast_box(
        Vec2::new(0.0, 24.0),
        Vec2::new(12.0, 24.0),
        Dir2::X,
        50.0,
        SurfaceFilter::SOLID,
    );
    assert!(hits.is_empty());
}

#[test]
fn test_cast_box_penetrating_only_blocks_inward_motion() {
    let world = flat_ground();
    let center = Vec2::new(0.0, 20.0);
    let half = Vec2::new(12.0, 24.0);

    let up = world.cast_box(center, half, Dir2::Y, 10.0, SurfaceFilter::SOLID);
    assert!(up.is_empty());

    let down = world.cast_box(center, half, Dir2::NEG_Y, 10.0, SurfaceFilter::SOLID);
    assert_eq!(down.len(), 1);
    assert_eq!(down[0].distance, 0.0);
    assert_eq!(down[0].normal, Vec2::Y);
}

#[test]
fn test_cast_box_returns_all_contacts_nearest_first() {
    let world = flat_ground().with(
        Vec2::new(10.0, 5.0),
        Vec2::new(10.0, 10.0),
        SurfaceKind::Ground,
    );
    let hits = world.cast_box(
        Vec2::new(0.0, 40.0),
        Vec2::new(12.0, 24.0),
        Dir2::NEG_Y,
        100.0,
        SurfaceFilter::SOLID,
    );
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].distance, 6.0);
    assert_eq!(hits[1].distance, 16.0);
}

#[test]
fn test_surface_filter_excludes_other_kinds() {
    let world = StaticGeometry::new().with(Vec2::ZERO, Vec2::splat(10.0), SurfaceKind::Ledge);
    assert!(!world.overlaps_box(Vec2::ZERO, Vec2::splat(2.0), SurfaceFilter::SOLID));
    assert!(world.overlaps_box(Vec2::ZERO, Vec2::splat(2.0), SurfaceFilter::LEDGE));
    assert!(SurfaceFilter::SOLID.contains(SurfaceKind::ClimbableWall));
    assert!(!SurfaceFilter::SOLID.contains(SurfaceKind::Ledge));
    assert!(!SurfaceKind::Ledge.is_solid());
}

#[test]
fn test_overlap_is_strict() {
    let world = flat_ground();
    // Touching the top face is not an overlap
    assert!(!world.overlaps_box(Vec2::new(0.0, 24.0), Vec2::new(12.0, 24.0), SurfaceFilter::SOLID));
    assert!(world.overlaps_box(Vec2::new(0.0, 23.0), Vec2::new(12.0, 24.0), SurfaceFilter::SOLID));
}

#[test]
fn test_ray_from_inside_hits_at_zero() {
    let world = flat_ground();
    let hit = world
        .cast_ray(Vec2::new(0.0, -10.0), Dir2::Y, 50.0, SurfaceFilter::SOLID)
        .expect("ray starts inside the floor");
    assert_eq!(hit.distance, 0.0);
}

// -----------------------------------------------------------------------------
// Kinematic body tests
// -----------------------------------------------------------------------------

#[test]
fn test_body_falls_and_rests_on_ground_within_shell() {
    let world = flat_ground();
    let mut body = body_at(Vec2::new(0.0, 200.0));

    settle(&mut body, &world, 180);

    let shell = BodyTuning::default().shell_radius;
    let bottom = body.shape().bottom(body.position());
    assert!(body.grounded());
    assert!(body.velocity().y <= 0.0);
    assert!(bottom >= -1e-3, "bottom {bottom} sank into the floor");
    assert!(bottom <= shell + 1e-3, "bottom {bottom} floats above the shell");
    assert_eq!(body.ground_normal(), Vec2::Y);
}

#[test]
fn test_body_is_not_grounded_while_airborne() {
    let world = flat_ground();
    let mut body = body_at(Vec2::new(0.0, 500.0));
    settle(&mut body, &world, 1);
    assert!(!body.grounded());
}

#[test]
fn test_grounded_is_rederived_not_carried_over() {
    let world = flat_ground();
    let mut body = body_at(Vec2::new(0.0, 100.0));
    settle(&mut body, &world, 120);
    assert!(body.grounded());

    // Without gravity there is no vertical sweep and so no ground contact
    body.set_gravity_modifier(0.0);
    body.set_velocity(Vec2::ZERO);
    settle(&mut body, &world, 1);
    assert!(!body.grounded());
}

#[test]
fn test_gravity_doubles_while_falling() {
    let world = StaticGeometry::new();
    let tuning = BodyTuning::default();
    let mut body = body_at(Vec2::ZERO);

    body.integrate(DT, &world, &tuning);
    let first = body.velocity().y;
    assert!((first + tuning.gravity * DT).abs() < 1e-4);

    body.integrate(DT, &world, &tuning);
    let second = body.velocity().y;
    assert!((second - (first - tuning.gravity * 2.0 * DT)).abs() < 1e-4);
}

#[test]
fn test_airborne_wall_contact_zeroes_horizontal_velocity() {
    let world = StaticGeometry::new().with(
        Vec2::new(120.0, 0.0),
        Vec2::new(40.0, 400.0),
        SurfaceKind::Ground,
    );
    let mut body = body_at(Vec2::new(80.0, 0.0));
    body.set_velocity(Vec2::new(600.0, 0.0));

    settle(&mut body, &world, 10);

    assert!(!body.grounded());
    assert_eq!(body.velocity().x, 0.0);
    let right_edge = body.center().x + body.shape().half_extents().x;
    assert!(right_edge <= 100.0);
}

#[test]
fn test_ceiling_contact_clamps_upward_velocity() {
    let world = StaticGeometry::new().with(
        Vec2::new(0.0, 120.0),
        Vec2::new(200.0, 40.0),
        SurfaceKind::Ground,
    );
    // Head at 74, ceiling underside at 100
    let mut body = body_at(Vec2::new(0.0, 50.0));
    body.set_velocity(Vec2::new(0.0, 2000.0));

    settle(&mut body, &world, 1);

    assert!(body.velocity().y <= 0.0);
    assert!(body.shape().top(body.position()) <= 100.0);
}

#[test]
fn test_frozen_body_does_not_move() {
    let world = StaticGeometry::new();
    let mut body = body_at(Vec2::new(5.0, 5.0));
    body.set_velocity(Vec2::new(100.0, 100.0));
    body.freeze();

    settle(&mut body, &world, 30);

    assert_eq!(body.position(), Vec2::new(5.0, 5.0));
    assert_eq!(body.velocity(), Vec2::ZERO);
}

#[test]
fn test_passive_body_moves_through_geometry() {
    let world = flat_ground();
    let mut body = body_at(Vec2::new(0.0, 30.0));
    body.set_gravity_modifier(0.0);
    body.set_passive(true);
    body.set_velocity(Vec2::new(0.0, -600.0));

    settle(&mut body, &world, 6);

    assert!(body.position().y < 0.0);
}

#[test]
fn test_add_position_offsets_body() {
    let mut body = body_at(Vec2::new(10.0, 20.0));
    body.add_position(Vec2::new(3.0, -2.0));
    assert_eq!(body.position(), Vec2::new(13.0, 18.0));
}

#[test]
fn test_kinematic_body_is_not_integrated() {
    let world = flat_ground();
    let mut body = body_at(Vec2::new(0.0, 100.0));
    settle(&mut body, &world, 120);
    assert!(body.grounded());
    let rest = body.position();

    body.set_kind(BodyKind::Kinematic);
    body.set_velocity(Vec2::new(200.0, 0.0));
    settle(&mut body, &world, 10);

    assert_eq!(body.kind(), BodyKind::Kinematic);
    assert_eq!(body.position(), rest);
    assert!(!body.grounded());

    body.set_kind(BodyKind::Dynamic);
    settle(&mut body, &world, 10);
    assert!(body.position().x > rest.x);
    assert!(body.grounded());
}

#[test]
fn test_frozen_body_drops_grounded_flag() {
    let world = flat_ground();
    let mut body = body_at(Vec2::new(0.0, 100.0));
    settle(&mut body, &world, 120);
    assert!(body.grounded());

    body.freeze();
    settle(&mut body, &world, 1);
    assert!(!body.grounded());
}

// -----------------------------------------------------------------------------
// Slope tests
// -----------------------------------------------------------------------------

/// World answering sweeps with fixed contacts, split by sweep axis.
#[derive(Default)]
struct ScriptedWorld {
    horizontal: Vec<ShapeHit>,
    vertical: Vec<ShapeHit>,
    casts: RefCell<Vec<Dir2>>,
}

impl CollisionWorld for ScriptedWorld {
    fn cast_box(
        &self,
        _center: Vec2,
        _half_extents: Vec2,
        direction: Dir2,
        max_distance: f32,
        _filter: SurfaceFilter,
    ) -> Vec<ShapeHit> {
        self.casts.borrow_mut().push(direction);
        let hits = if direction.y.abs() > direction.x.abs() {
            &self.vertical
        } else {
            &self.horizontal
        };
        hits.iter()
            .copied()
            .filter(|hit| hit.distance <= max_distance)
            .collect()
    }

    fn overlaps_box(&self, _center: Vec2, _half_extents: Vec2, _filter: SurfaceFilter) -> bool {
        false
    }

    fn cast_ray(
        &self,
        _origin: Vec2,
        _direction: Dir2,
        _max_distance: f32,
        _filter: SurfaceFilter,
    ) -> Option<RayHit> {
        None
    }
}

fn ground_hit(distance: f32, normal: Vec2) -> ShapeHit {
    ShapeHit {
        distance,
        normal,
        kind: SurfaceKind::Ground,
    }
}

#[test]
fn test_horizontal_motion_follows_slope_tangent() {
    // Floor rising to the right at 3:4
    let normal = Vec2::new(-0.6, 0.8);
    let world = ScriptedWorld {
        vertical: vec![ground_hit(0.5, normal)],
        ..Default::default()
    };
    let tuning = BodyTuning::default();
    let mut body = body_at(Vec2::new(0.0, 100.0));
    body.set_velocity(Vec2::new(300.0, 0.0));

    // First tick still moves along flat ground, then adopts the slope
    body.integrate(DT, &world, &tuning);
    assert!((body.position() - Vec2::new(5.0, 100.0)).length() < 1e-3);
    assert_eq!(body.ground_normal(), normal);
    assert!(body.grounded());

    body.integrate(DT, &world, &tuning);
    let casts = world.casts.borrow();
    assert_eq!(casts.len(), 4);
    assert!((casts[2].as_vec2() - Vec2::new(0.8, 0.6)).length() < 1e-4);
    assert!((body.position() - Vec2::new(9.0, 103.0)).length() < 1e-3);
}

#[test]
fn test_ground_normal_only_adopted_from_vertical_sweep() {
    let tuning = BodyTuning::default();

    // Ground-like contact ahead but nothing below
    let world = ScriptedWorld {
        horizontal: vec![ground_hit(3.0, Vec2::new(-0.6, 0.8))],
        ..Default::default()
    };
    let mut body = body_at(Vec2::new(0.0, 100.0));
    body.set_velocity(Vec2::new(300.0, 0.0));
    body.integrate(DT, &world, &tuning);
    assert!(body.grounded());
    assert_eq!(body.ground_normal(), Vec2::Y);

    // Both sweeps hit; the vertical one decides
    let below = Vec2::new(0.28, 0.96);
    let world = ScriptedWorld {
        horizontal: vec![ground_hit(3.0, Vec2::new(-0.6, 0.8))],
        vertical: vec![ground_hit(0.5, below)],
        ..Default::default()
    };
    let mut body = body_at(Vec2::new(0.0, 100.0));
    body.set_velocity(Vec2::new(300.0, 0.0));
    body.integrate(DT, &world, &tuning);
    assert_eq!(body.ground_normal(), below);
}

#[test]
fn test_last_ground_contact_sets_normal() {
    let first = Vec2::new(-0.6, 0.8);
    let last = Vec2::new(0.28, 0.96);
    let world = ScriptedWorld {
        vertical: vec![ground_hit(0.5, first), ground_hit(0.7, last)],
        ..Default::default()
    };
    let mut body = body_at(Vec2::new(0.0, 100.0));

    body.integrate(DT, &world, &BodyTuning::default());

    assert!(body.grounded());
    assert_eq!(body.ground_normal(), last);
}

// -----------------------------------------------------------------------------
// Collider tests
// -----------------------------------------------------------------------------

#[test]
fn test_shortened_collider_keeps_feet_planted() {
    let standing = ColliderTuning::default().shape();
    let crouching = standing.shortened(0.5);
    let position = Vec2::new(3.0, 40.0);

    assert_eq!(crouching.size, Vec2::new(24.0, 24.0));
    assert_eq!(crouching.offset, Vec2::new(0.0, -12.0));
    assert_eq!(crouching.bottom(position), standing.bottom(position));
}

#[test]
fn test_profile_keeps_captured_standing_shape() {
    let standing = ColliderShape {
        offset: Vec2::new(0.1, 0.3),
        size: Vec2::new(23.7, 47.3),
    };
    let profile = ColliderProfile::capture(standing, 0.55);
    assert_eq!(profile.standing(), standing);
    assert!(profile.crouching().size.y < standing.size.y);
}

// -----------------------------------------------------------------------------
// Sensor tests
// -----------------------------------------------------------------------------

#[test]
fn test_sensor_state_reports_edges_only() {
    let mut sensors = SensorState::default();

    let entered = sensors.apply(TriggerSample {
        wall: true,
        ..Default::default()
    });
    assert_eq!(entered, vec![SensorTransition::Entered(SensorKind::Wall)]);
    assert!(sensors.is_near_wall());

    let steady = sensors.apply(TriggerSample {
        wall: true,
        ..Default::default()
    });
    assert!(steady.is_empty());

    let exited = sensors.apply(TriggerSample::default());
    assert_eq!(exited, vec![SensorTransition::Exited(SensorKind::Wall)]);
    assert!(!sensors.is_near_wall());
}

#[test]
fn test_missing_probe_never_triggers() {
    let world = StaticGeometry::new().with(Vec2::ZERO, Vec2::splat(500.0), SurfaceKind::Ledge);
    let layout = SensorLayout {
        ledge: None,
        ..Default::default()
    };
    let sample = sample_triggers(&world, Vec2::ZERO, 1.0, &layout);
    assert!(!sample.ledge);
}

#[test]
fn test_probes_mirror_with_facing() {
    // Climbable wall to the left of the body only
    let world = StaticGeometry::new().with(
        Vec2::new(-32.5, 0.0),
        Vec2::new(40.0, 200.0),
        SurfaceKind::ClimbableWall,
    );
    let layout = SensorLayout::default();

    let right = sample_triggers(&world, Vec2::ZERO, 1.0, &layout);
    assert!(!right.wall && !right.climbable);

    let left = sample_triggers(&world, Vec2::ZERO, -1.0, &layout);
    assert!(left.wall && left.climbable);
}

#[test]
fn test_stateless_proximity_queries() {
    let world = flat_ground()
        .with(Vec2::new(0.0, 100.0), Vec2::new(200.0, 20.0), SurfaceKind::Ground)
        .with(Vec2::new(40.0, 30.0), Vec2::new(10.0, 60.0), SurfaceKind::Ground);
    let body = body_at(Vec2::new(0.0, 30.0));

    let ground = ground_below(&world, &body, 20.0).expect("floor below the feet");
    assert_eq!(ground.distance, 6.0);

    let ceiling = ceiling_above(&world, &body, 50.0).expect("ceiling above the head");
    assert_eq!(ceiling.distance, 36.0);

    let wall = wall_ahead(&world, &body, 1.0, 30.0).expect("wall to the right");
    assert_eq!(wall.distance, 35.0);
    assert!(wall_ahead(&world, &body, -1.0, 30.0).is_none());
}

#[test]
fn test_shape_is_clear_ignores_resting_contact() {
    let world = flat_ground();
    let shape = ColliderTuning::default().shape();
    // Feet resting exactly on the floor
    assert!(shape_is_clear(&world, Vec2::new(0.0, 24.0), &shape, 0.5));
    assert!(!shape_is_clear(&world, Vec2::new(0.0, 10.0), &shape, 0.5));
}

#[test]
fn test_ledge_corner_found_below_head() {
    let world = StaticGeometry::new().with(
        Vec2::new(150.0, 40.0),
        Vec2::new(100.0, 80.0),
        SurfaceKind::Ground,
    );
    let body = body_at(Vec2::new(87.5, 60.0));

    let corner = ledge_corner(&world, &body, 1.0, &LedgeProbe::default());
    assert_eq!(corner, Some(Vec2::new(100.0, 80.0)));
}

#[test]
fn test_ledge_corner_rejects_wall_that_continues_upward() {
    let world = StaticGeometry::new().with(
        Vec2::new(150.0, 100.0),
        Vec2::new(100.0, 200.0),
        SurfaceKind::Ground,
    );
    let body = body_at(Vec2::new(87.5, 60.0));

    assert!(ledge_corner(&world, &body, 1.0, &LedgeProbe::default()).is_none());
}
