//! Movement domain: grabbing ledges and the two-phase climb-up.
//!
//! Confirming a climb only starts it. The body stays frozen and passive until
//! the animation side reports the climb finished, polled on the next tick.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::movement::{
    AnimationCue, Facing, ModeOwner, ModeState, MotorEvent, MotorEvents, MovementInput,
    MovementMode, MovementTuning, WallClimb,
};
use crate::physics::{CollisionWorld, KinematicBody, SensorState, ground_below, ledge_corner};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HoldPhase {
    #[default]
    Inactive,
    Holding,
    AwaitingClimbFinish,
}

#[derive(Debug, Clone)]
pub struct LedgeHold {
    enabled: bool,
    phase: HoldPhase,
    facing_sign: f32,
    regrab_cooldown: f32,
    finish_signalled: bool,
}

impl LedgeHold {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            phase: HoldPhase::Inactive,
            facing_sign: 1.0,
            regrab_cooldown: 0.0,
            finish_signalled: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn phase(&self) -> HoldPhase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase != HoldPhase::Inactive
    }

    /// External "climb finished" callback. Ignored unless a climb is pending.
    pub fn signal_climb_finished(&mut self) -> bool {
        if self.phase != HoldPhase::AwaitingClimbFinish {
            return false;
        }
        self.finish_signalled = true;
        true
    }

    /// Returns whether the hold owns the character after this tick.
    pub fn update(
        &mut self,
        input: &MovementInput,
        body: &mut KinematicBody,
        sensors: &SensorState,
        mode: &mut ModeState,
        climb: &mut WallClimb,
        facing: Facing,
        world: &impl CollisionWorld,
        tuning: &MovementTuning,
        dt: f32,
        events: &mut impl MotorEvents,
    ) -> bool {
        match self.phase {
            HoldPhase::Inactive => {
                self.regrab_cooldown = (self.regrab_cooldown - dt).max(0.0);
                self.try_grab(body, sensors, mode, climb, facing, world, tuning, events);
            }
            HoldPhase::Holding => {
                if input.jump.just_pressed || input.up.just_pressed {
                    self.phase = HoldPhase::AwaitingClimbFinish;
                    self.finish_signalled = false;
                    body.set_passive(true);
                    mode.set(MovementMode::Climb, ModeOwner::LedgeHold);
                    events.cue(AnimationCue::LedgeClimbStarted);
                    debug!("Ledge climb started, awaiting finish");
                } else if input.crouch.just_pressed || input.axis.y < -0.5 {
                    self.release(body, mode, tuning);
                    events.schedule(MotorEvent::LedgeReleased, None);
                    debug!("Ledge released");
                }
            }
            HoldPhase::AwaitingClimbFinish => {
                if self.finish_signalled {
                    self.finish(body, mode, tuning);
                    events.schedule(MotorEvent::ClimbedUp, None);
                    debug!("Ledge climb finished at {:?}", body.position());
                }
            }
        }
        self.is_active()
    }

    fn try_grab(
        &mut self,
        body: &mut KinematicBody,
        sensors: &SensorState,
        mode: &mut ModeState,
        climb: &mut WallClimb,
        facing: Facing,
        world: &impl CollisionWorld,
        tuning: &MovementTuning,
        events: &mut impl MotorEvents,
    ) -> bool {
        let hold = &tuning.hold;
        if !self.enabled
            || body.grounded()
            || !sensors.is_near_ledge()
            || self.regrab_cooldown > 0.0
        {
            return false;
        }
        if ground_below(world, body, hold.min_ground_clearance).is_some() {
            return false;
        }
        let Some(corner) = ledge_corner(world, body, facing.sign(), &hold.probe) else {
            return false;
        };

        let locked = if mode.lock_owner() == Some(ModeOwner::WallClimb) {
            mode.transfer(ModeOwner::WallClimb, ModeOwner::LedgeHold, MovementMode::Hold)
        } else {
            mode.lock(MovementMode::Hold, ModeOwner::LedgeHold)
        };
        if !locked {
            return false;
        }
        if climb.is_climbing() {
            climb.yield_to_hold();
        }

        let offsets = hold.offsets();
        let shape = body.shape();
        let half = shape.half_extents();
        let sign = facing.sign();
        let center = corner + Vec2::new(-sign * (half.x + offsets.snap_x), -(half.y + offsets.snap_y));
        body.set_position(center - shape.offset);
        body.freeze();
        body.set_gravity_modifier(0.0);

        self.phase = HoldPhase::Holding;
        self.facing_sign = sign;
        events.schedule(MotorEvent::LedgeGrabbed, None);
        debug!("Ledge grabbed: corner={:?}, snapped to {:?}", corner, body.position());
        true
    }

    fn release(&mut self, body: &mut KinematicBody, mode: &mut ModeState, tuning: &MovementTuning) {
        body.unfreeze();
        body.set_passive(false);
        body.set_gravity_modifier(tuning.body.gravity_modifier);
        mode.unlock(ModeOwner::LedgeHold);
        mode.set(MovementMode::Idle, ModeOwner::LedgeHold);
        self.phase = HoldPhase::Inactive;
        self.finish_signalled = false;
        self.regrab_cooldown = tuning.hold.regrab_cooldown;
    }

    fn finish(&mut self, body: &mut KinematicBody, mode: &mut ModeState, tuning: &MovementTuning) {
        let offsets = tuning.hold.offsets();
        body.add_position(Vec2::new(self.facing_sign * offsets.finish_x, offsets.finish_y));
        self.release(body, mode, tuning);
        // Standing on top now; keep the falling state from flashing.
        body.mark_grounded(true);
    }

    pub fn reset(&mut self) {
        self.phase = HoldPhase::Inactive;
        self.regrab_cooldown = 0.0;
        self.finish_signalled = false;
    }
}
