//! Movement domain: stepping motors against the physics world.

use avian2d::prelude::*;
use bevy::ecs::message::MessageWriter;
use bevy::prelude::*;

use crate::movement::{
    AnimationNotice, CharacterMotor, EventLog, MotorEvent, MovementInput, MovementNotice,
    MovementTuning, Player, PlayerSprite, SyncedShape,
};
use crate::physics::AvianGeometry;

pub(crate) fn drive_motors(
    time: Res<Time>,
    input: Res<MovementInput>,
    tuning: Res<MovementTuning>,
    spatial_query: SpatialQuery,
    mut query: Query<(Entity, &mut CharacterMotor, &mut Transform), With<Player>>,
    mut notices: MessageWriter<MovementNotice>,
    mut animation: MessageWriter<AnimationNotice>,
) {
    let dt = time.delta_secs();
    if dt <= 0.0 {
        return;
    }

    for (entity, mut motor, mut transform) in &mut query {
        let world = AvianGeometry::new(&spatial_query).excluding(entity);
        let mut log = EventLog::default();
        motor.tick(&input, dt, &world, &tuning, &mut log);

        let position = motor.position();
        transform.translation.x = position.x;
        transform.translation.y = position.y;

        for scheduled in log.scheduled {
            if matches!(scheduled.event, MotorEvent::Landed | MotorEvent::Jumped) {
                debug!(
                    "{:?}: pos={:?}, vel={:?}",
                    scheduled.event,
                    position,
                    motor.velocity()
                );
            }
            notices.write(MovementNotice {
                entity,
                event: scheduled.event,
                delay: scheduled.delay,
            });
        }
        for cue in log.cues {
            animation.write(AnimationNotice { entity, cue });
        }
    }
}

/// Mirror the live collider shape, passivity and facing onto the ECS side.
pub(crate) fn sync_motor_visuals(
    mut commands: Commands,
    mut players: Query<
        (
            Entity,
            &CharacterMotor,
            &mut SyncedShape,
            &Children,
            Has<ColliderDisabled>,
        ),
        With<Player>,
    >,
    mut sprites: Query<(&mut Sprite, &mut Transform), With<PlayerSprite>>,
) {
    for (entity, motor, mut synced, children, disabled) in &mut players {
        let shape = motor.body().shape();
        let sprite_offset = motor.sprite_offset();
        for child in children.iter() {
            let Ok((mut sprite, mut transform)) = sprites.get_mut(child) else {
                continue;
            };
            sprite.flip_x = motor.facing().sign() < 0.0;
            sprite.custom_size = Some(shape.size);
            transform.translation.x = sprite_offset.x;
            transform.translation.y = sprite_offset.y;
        }

        let passive = motor.body().is_passive();
        if passive && !disabled {
            commands.entity(entity).insert(ColliderDisabled);
        } else if !passive && disabled {
            commands.entity(entity).remove::<ColliderDisabled>();
        }

        if synced.0 == shape {
            continue;
        }
        synced.0 = shape;
        commands.entity(entity).insert(Collider::compound(vec![(
            shape.offset,
            0.0,
            Collider::rectangle(shape.size.x, shape.size.y),
        )]));
    }
}
