//! Dev room and debug keys for iterating on movement feel.
//!
//! Keys:
//! - F3: dump the player motor state as JSON
//! - R: respawn the player at the room spawn point
//! - X: kill the player (respawns after the configured delay)

use avian2d::prelude::*;
use bevy::ecs::message::{MessageReader, MessageWriter};
use bevy::prelude::*;

use crate::movement::{
    AnimationCue, AnimationNotice, CharacterMotor, ClimbFinished, EventLog, MotorEvent,
    MovementNotice, MovementTuning, Player, RespawnPlayer,
};
use crate::physics::{Surface, SurfaceKind};

/// Where the player returns to on respawn.
const ROOM_SPAWN: Vec2 = Vec2::new(0.0, 100.0);

/// Stand-in for the ledge climb animation length.
const CLIMB_ANIMATION_SECS: f32 = 0.35;

/// Size of the ledge zones placed on block corners.
const LEDGE_ZONE: Vec2 = Vec2::new(16.0, 16.0);

// ============================================================================
// Resources
// ============================================================================

/// Delayed signals the animation and respawn collaborators would normally send.
#[derive(Resource, Debug, Default)]
pub struct PendingSignals {
    climbs: Vec<(Entity, f32)>,
    respawns: Vec<(Entity, f32)>,
}

// ============================================================================
// Plugin
// ============================================================================

pub struct DevPlugin;

impl Plugin for DevPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PendingSignals>()
            .add_systems(Startup, (spawn_camera, spawn_dev_room))
            .add_systems(
                Update,
                (
                    handle_dev_hotkeys,
                    queue_pending_signals,
                    fire_pending_signals,
                )
                    .chain(),
            );
    }
}

// ============================================================================
// Room
// ============================================================================

fn spawn_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}

fn spawn_surface(commands: &mut Commands, center: Vec2, size: Vec2, kind: SurfaceKind) {
    let surface = Surface(kind);
    let color = match kind {
        SurfaceKind::Ground => Color::srgb(0.35, 0.4, 0.35),
        SurfaceKind::ClimbableWall => Color::srgb(0.45, 0.35, 0.25),
        SurfaceKind::Ledge => Color::srgba(0.9, 0.8, 0.2, 0.4),
    };
    let mut entity = commands.spawn((
        surface,
        Sprite {
            color,
            custom_size: Some(size),
            ..default()
        },
        Transform::from_xyz(center.x, center.y, 0.0),
        RigidBody::Static,
        Collider::rectangle(size.x, size.y),
        surface.layers(),
    ));
    if !kind.is_solid() {
        entity.insert(Sensor);
    }
}

/// Solid block with a ledge zone on each top corner.
fn spawn_ledged_block(commands: &mut Commands, center: Vec2, size: Vec2) {
    spawn_surface(commands, center, size, SurfaceKind::Ground);
    let half = size * 0.5;
    for corner in [
        Vec2::new(center.x - half.x, center.y + half.y),
        Vec2::new(center.x + half.x, center.y + half.y),
    ] {
        spawn_surface(commands, corner, LEDGE_ZONE, SurfaceKind::Ledge);
    }
}

/// Floor, a climbable wall, a ledged block, and a low tunnel for crouching.
fn spawn_dev_room(mut commands: Commands) {
    // Floor, top at y = 0
    spawn_surface(
        &mut commands,
        Vec2::new(0.0, -20.0),
        Vec2::new(1600.0, 40.0),
        SurfaceKind::Ground,
    );

    // Climbable wall on the left
    spawn_surface(
        &mut commands,
        Vec2::new(-420.0, 150.0),
        Vec2::new(40.0, 300.0),
        SurfaceKind::ClimbableWall,
    );

    // Block to hang from on the right
    spawn_ledged_block(&mut commands, Vec2::new(320.0, 50.0), Vec2::new(160.0, 100.0));

    // Tunnel ceiling, only passable crouched
    spawn_surface(
        &mut commands,
        Vec2::new(-180.0, 56.0),
        Vec2::new(200.0, 40.0),
        SurfaceKind::Ground,
    );

    info!("Dev room spawned, player spawn at {:?}", ROOM_SPAWN);
}

// ============================================================================
// Systems
// ============================================================================

fn handle_dev_hotkeys(
    keyboard: Res<ButtonInput<KeyCode>>,
    tuning: Res<MovementTuning>,
    mut players: Query<(Entity, &mut CharacterMotor), With<Player>>,
    mut respawns: MessageWriter<RespawnPlayer>,
    mut notices: MessageWriter<MovementNotice>,
) {
    for (entity, mut motor) in &mut players {
        if keyboard.just_pressed(KeyCode::F3) {
            match serde_json::to_string_pretty(&motor.snapshot()) {
                Ok(json) => info!("Motor state for {:?}:\n{}", entity, json),
                Err(e) => warn!("Failed to serialize motor state: {}", e),
            }
        }

        if keyboard.just_pressed(KeyCode::KeyR) {
            respawns.write(RespawnPlayer {
                entity,
                position: ROOM_SPAWN,
            });
        }

        if keyboard.just_pressed(KeyCode::KeyX) {
            let mut log = EventLog::default();
            motor.kill(&tuning, &mut log);
            info!("Player killed at {:?}", motor.position());
            for scheduled in log.scheduled {
                notices.write(MovementNotice {
                    entity,
                    event: scheduled.event,
                    delay: scheduled.delay,
                });
            }
        }
    }
}

/// Start timers for the signals an animator and a respawn manager would send.
fn queue_pending_signals(
    mut cues: MessageReader<AnimationNotice>,
    mut notices: MessageReader<MovementNotice>,
    mut pending: ResMut<PendingSignals>,
) {
    for notice in cues.read() {
        if notice.cue == AnimationCue::LedgeClimbStarted {
            pending.climbs.push((notice.entity, CLIMB_ANIMATION_SECS));
        }
    }
    for notice in notices.read() {
        if notice.event == MotorEvent::RespawnDue {
            pending
                .respawns
                .push((notice.entity, notice.delay.unwrap_or(0.0)));
        }
    }
}

fn fire_pending_signals(
    time: Res<Time>,
    mut pending: ResMut<PendingSignals>,
    mut finished: MessageWriter<ClimbFinished>,
    mut respawns: MessageWriter<RespawnPlayer>,
) {
    let dt = time.delta_secs();

    for entity in tick_down(&mut pending.climbs, dt) {
        finished.write(ClimbFinished { entity });
    }
    for entity in tick_down(&mut pending.respawns, dt) {
        respawns.write(RespawnPlayer {
            entity,
            position: ROOM_SPAWN,
        });
    }
}

/// Advance countdowns and drain the ones that expired.
fn tick_down(timers: &mut Vec<(Entity, f32)>, dt: f32) -> Vec<Entity> {
    let mut due = Vec::new();
    timers.retain_mut(|(entity, remaining)| {
        *remaining -= dt;
        if *remaining <= 0.0 {
            due.push(*entity);
            false
        } else {
            true
        }
    });
    due
}
