//! Movement domain: horizontal speed targets, acceleration, and facing.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::movement::{AnimationCue, LocomotionTuning, MotorEvents};

/// Axis values at or below this magnitude count as no input.
pub const AXIS_DEADZONE: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Reflect)]
pub enum Facing {
    #[default]
    Right,
    Left,
}

impl Facing {
    pub fn sign(self) -> f32 {
        match self {
            Facing::Right => 1.0,
            Facing::Left => -1.0,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Facing::Right => Facing::Left,
            Facing::Left => Facing::Right,
        }
    }

    /// Facing implied by a horizontal axis, if it is outside the deadzone.
    pub fn from_axis(x: f32) -> Option<Self> {
        if x > AXIS_DEADZONE {
            Some(Facing::Right)
        } else if x < -AXIS_DEADZONE {
            Some(Facing::Left)
        } else {
            None
        }
    }
}

/// Speed class for the current mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gait {
    Walk,
    Run,
    Crouch,
}

impl Gait {
    pub fn multiplier(self, tuning: &LocomotionTuning) -> f32 {
        match self {
            Gait::Walk => tuning.walk_multiplier,
            Gait::Run => tuning.run_multiplier,
            Gait::Crouch => tuning.crouch_multiplier,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Locomotion {
    facing: Facing,
    /// Sprite offset relative to the body, authored for facing right.
    visual_offset: Vec2,
}

impl Locomotion {
    pub fn new(visual_offset: Vec2) -> Self {
        Self {
            facing: Facing::Right,
            visual_offset,
        }
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    /// Visual offset mirrored for the current facing.
    pub fn visual_offset(&self) -> Vec2 {
        Vec2::new(self.visual_offset.x * self.facing.sign(), self.visual_offset.y)
    }

    pub fn target_speed(axis_x: f32, gait: Gait, tuning: &LocomotionTuning) -> f32 {
        axis_x.clamp(-1.0, 1.0) * tuning.max_speed * gait.multiplier(tuning)
    }

    /// Move `current` toward `target`, accelerating while there is a target
    /// and braking at the deceleration rate otherwise.
    pub fn approach(current: f32, target: f32, dt: f32, tuning: &LocomotionTuning) -> f32 {
        let rate = if target.abs() > f32::EPSILON {
            tuning.accel
        } else {
            tuning.decel
        };
        let max_step = rate * dt;
        current + (target - current).clamp(-max_step, max_step)
    }

    /// Turn toward the input direction. Never moves the body.
    pub fn update_facing(&mut self, axis_x: f32, events: &mut impl MotorEvents) -> bool {
        match Facing::from_axis(axis_x) {
            Some(facing) if facing != self.facing => {
                self.face(facing, events);
                true
            }
            _ => false,
        }
    }

    pub fn face(&mut self, facing: Facing, events: &mut impl MotorEvents) {
        if self.facing == facing {
            return;
        }
        self.facing = facing;
        events.cue(AnimationCue::Flipped(facing));
    }

    pub fn reset(&mut self) {
        self.facing = Facing::Right;
    }
}
