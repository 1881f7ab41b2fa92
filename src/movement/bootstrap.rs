//! Movement domain: player bootstrap from the loaded tuning.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::movement::{CharacterMotor, MovementTuning, Player, PlayerSprite, SyncedShape};
use crate::physics::GameLayer;

const SPAWN_POSITION: Vec2 = Vec2::new(0.0, 100.0);

/// Spawn the player with a motor built from the current tuning.
pub fn spawn_player(
    mut commands: Commands,
    tuning: Res<MovementTuning>,
    existing_player: Query<Entity, With<Player>>,
) {
    // Don't spawn if player already exists
    if !existing_player.is_empty() {
        info!("Player already exists, skipping spawn");
        return;
    }

    let motor = CharacterMotor::new(SPAWN_POSITION, &tuning);
    let shape = motor.profile().standing();

    info!(
        "Spawning player: size={:?}, hold_enabled={}, climb_enabled={}, air_jumps={}",
        shape.size,
        motor.is_hold_enabled(),
        motor.is_climb_enabled(),
        tuning.jump.max_air_jumps
    );

    let sprite_offset = motor.sprite_offset();

    commands
        .spawn((
            // Identity & Movement
            (Player, motor, SyncedShape(shape)),
            Transform::from_xyz(SPAWN_POSITION.x, SPAWN_POSITION.y, 0.0),
            Visibility::default(),
            // Physics: the motor moves the body, avian only answers queries
            (
                RigidBody::Kinematic,
                Collider::compound(vec![(
                    shape.offset,
                    0.0,
                    Collider::rectangle(shape.size.x, shape.size.y),
                )]),
                CollisionLayers::new(
                    GameLayer::Player,
                    [
                        GameLayer::Ground,
                        GameLayer::ClimbableWall,
                        GameLayer::Ledge,
                        GameLayer::Sensor,
                    ],
                ),
            ),
        ))
        .with_children(|parent| {
            // Rendering
            parent.spawn((
                PlayerSprite,
                Sprite {
                    color: Color::srgb(0.9, 0.9, 0.9),
                    custom_size: Some(shape.size),
                    ..default()
                },
                Transform::from_translation(sprite_offset.extend(0.0)),
            ));
        });
}
