//! Movement domain: the character motor and its ECS wiring.

mod bootstrap;
mod climb;
mod components;
mod crouch;
mod events;
mod jump;
mod ledge;
mod locomotion;
mod mode;
mod motor;
mod resources;
mod systems;


use bevy::prelude::*;

pub use bootstrap::spawn_player;
pub use climb::{ClimbOutcome, WallClimb};
pub use components::{Player, PlayerSprite, SyncedShape};
pub use crouch::{CrouchSlide, Posture};
pub use events::{
    AnimationCue, AnimationNotice, ClimbFinished, EventLog, MotorEvent, MotorEvents,
    MovementNotice, RespawnPlayer, ScheduledEvent,
};
pub use jump::{JumpController, JumpPhase, Launch};
pub use ledge::{HoldPhase, LedgeHold};
pub use locomotion::{AXIS_DEADZONE, Facing, Gait, Locomotion};
pub use mode::{ModeOwner, ModeState, MovementMode};
pub use motor::{CharacterMotor, MotorSnapshot};
pub use resources::{
    Button, ClimbTuning, CrouchTuning, HoldOffsets, HoldPreset, HoldTuning, JumpTuning,
    LocomotionTuning, MovementInput, MovementTuning,
};

pub struct MovementPlugin;

impl Plugin for MovementPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MovementTuning>()
            .init_resource::<MovementInput>()
            .add_message::<MovementNotice>()
            .add_message::<AnimationNotice>()
            .add_message::<ClimbFinished>()
            .add_message::<RespawnPlayer>()
            .add_systems(Startup, spawn_player)
            .add_systems(
                Update,
                (
                    systems::read_input,
                    systems::apply_climb_finished,
                    systems::apply_respawns,
                    systems::drive_motors,
                    systems::sync_motor_visuals,
                )
                    .chain(),
            );
    }
}
