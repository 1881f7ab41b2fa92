//! Movement domain: outbound notifications and inbound signals.

use bevy::ecs::message::Message;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::movement::{Facing, MovementMode};

/// Gameplay events handed to the deferred event scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MotorEvent {
    Jumped,
    AirJumped,
    Landed,
    /// Jump released early; upward velocity was damped.
    StopJump,
    WallJumped,
    SlideStarted,
    SlideEnded,
    LedgeGrabbed,
    LedgeReleased,
    ClimbedUp,
    Died,
    RespawnDue,
    Respawned,
}

/// One-way cues for the animation and audio sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationCue {
    ModeEntered(MovementMode),
    Flipped(Facing),
    /// Looking away from a climbable wall without letting go.
    Peek(bool),
    /// The climb-up clip should play; finish is signalled back later.
    LedgeClimbStarted,
}

/// Fire-and-forget sink for everything the motor reports.
pub trait MotorEvents {
    /// Schedule `event`, optionally after `delay` seconds.
    fn schedule(&mut self, event: MotorEvent, delay: Option<f32>);

    fn cue(&mut self, cue: AnimationCue);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduledEvent {
    pub event: MotorEvent,
    pub delay: Option<f32>,
}

/// Records events in order. Drained by the ECS bridge each tick.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    pub scheduled: Vec<ScheduledEvent>,
    pub cues: Vec<AnimationCue>,
}

impl EventLog {
    pub fn contains(&self, event: MotorEvent) -> bool {
        self.scheduled.iter().any(|s| s.event == event)
    }

    pub fn count(&self, event: MotorEvent) -> usize {
        self.scheduled.iter().filter(|s| s.event == event).count()
    }

    pub fn has_cue(&self, cue: AnimationCue) -> bool {
        self.cues.contains(&cue)
    }
}

impl MotorEvents for EventLog {
    fn schedule(&mut self, event: MotorEvent, delay: Option<f32>) {
        self.scheduled.push(ScheduledEvent { event, delay });
    }

    fn cue(&mut self, cue: AnimationCue) {
        self.cues.push(cue);
    }
}

/// A motor event leaving the movement core.
#[derive(Debug, Clone, Copy)]
pub struct MovementNotice {
    pub entity: Entity,
    pub event: MotorEvent,
    pub delay: Option<f32>,
}

impl Message for MovementNotice {}

#[derive(Debug, Clone, Copy)]
pub struct AnimationNotice {
    pub entity: Entity,
    pub cue: AnimationCue,
}

impl Message for AnimationNotice {}

/// Sent by the animation side when the ledge climb-up clip completes.
#[derive(Debug, Clone, Copy)]
pub struct ClimbFinished {
    pub entity: Entity,
}

impl Message for ClimbFinished {}

/// Authoritative reset request from checkpoints or death handling.
#[derive(Debug, Clone, Copy)]
pub struct RespawnPlayer {
    pub entity: Entity,
    pub position: Vec2,
}

impl Message for RespawnPlayer {}
