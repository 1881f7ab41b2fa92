//! Movement domain: inbound signals from animation and respawn handling.

use bevy::ecs::message::{MessageReader, MessageWriter};
use bevy::prelude::*;

use crate::movement::{
    CharacterMotor, ClimbFinished, EventLog, MovementNotice, MovementTuning, RespawnPlayer,
};

pub(crate) fn apply_climb_finished(
    mut finished: MessageReader<ClimbFinished>,
    mut query: Query<&mut CharacterMotor>,
) {
    for message in finished.read() {
        let Ok(mut motor) = query.get_mut(message.entity) else {
            continue;
        };
        if !motor.signal_climb_finished() {
            debug!("Climb finish ignored for {:?}, no climb pending", message.entity);
        }
    }
}

pub(crate) fn apply_respawns(
    tuning: Res<MovementTuning>,
    mut respawns: MessageReader<RespawnPlayer>,
    mut query: Query<(&mut CharacterMotor, &mut Transform)>,
    mut notices: MessageWriter<MovementNotice>,
) {
    for request in respawns.read() {
        let Ok((mut motor, mut transform)) = query.get_mut(request.entity) else {
            warn!("Respawn requested for missing motor {:?}", request.entity);
            continue;
        };
        let mut log = EventLog::default();
        motor.reset(request.position, &tuning, &mut log);
        transform.translation.x = request.position.x;
        transform.translation.y = request.position.y;
        for scheduled in log.scheduled {
            notices.write(MovementNotice {
                entity: request.entity,
                event: scheduled.event,
                delay: scheduled.delay,
            });
        }
    }
}
