//! Movement domain: attaching to and climbing tagged walls.

use bevy::prelude::*;

use crate::movement::{
    AXIS_DEADZONE, AnimationCue, Facing, Locomotion, ModeOwner, ModeState, MotorEvent,
    MotorEvents, MovementInput, MovementMode, MovementTuning,
};
use crate::physics::{CollisionWorld, KinematicBody, SensorState, wall_ahead};

/// What the climb did this tick, for the coordinating layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClimbOutcome {
    pub climbing: bool,
    /// The jump press was spent on a jump-away.
    pub jumped_away: bool,
}

#[derive(Debug, Clone)]
pub struct WallClimb {
    enabled: bool,
    climbing: bool,
    peeking: bool,
}

impl WallClimb {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            climbing: false,
            peeking: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_climbing(&self) -> bool {
        self.climbing
    }

    pub fn update(
        &mut self,
        input: &MovementInput,
        body: &mut KinematicBody,
        sensors: &SensorState,
        mode: &mut ModeState,
        locomotion: &mut Locomotion,
        world: &impl CollisionWorld,
        tuning: &MovementTuning,
        events: &mut impl MotorEvents,
    ) -> ClimbOutcome {
        let mut entered = false;
        if !self.climbing {
            if !self.can_attach(input, body, sensors) {
                return ClimbOutcome::default();
            }
            if !self.attach(body, mode, locomotion.facing(), world, tuning) {
                return ClimbOutcome::default();
            }
            entered = true;
        }

        let facing = locomotion.facing();
        let climb = &tuning.climb;
        let away = input.axis.x * facing.sign() < -0.5;
        let vertical_input = input.axis.y.abs() > AXIS_DEADZONE;

        if input.jump.just_pressed && away {
            body.set_velocity(Vec2::new(
                -facing.sign() * climb.jump_away_horizontal,
                climb.jump_away_vertical,
            ));
            self.detach(body, mode, tuning, events);
            mode.set(MovementMode::Jump, ModeOwner::WallClimb);
            locomotion.face(facing.flipped(), events);
            events.schedule(MotorEvent::WallJumped, None);
            debug!("Wall jump-away: facing={:?}", facing.flipped());
            return ClimbOutcome {
                climbing: false,
                jumped_away: true,
            };
        }

        let landed = body.grounded() && !entered && input.axis.y <= 0.0;
        if !input.climb.held || !sensors.is_near_wall() || sensors.is_near_ledge() || landed {
            debug!(
                "Climb exit: climb_held={}, near_wall={}, near_ledge={}, grounded={}",
                input.climb.held,
                sensors.is_near_wall(),
                sensors.is_near_ledge(),
                body.grounded()
            );
            self.detach(body, mode, tuning, events);
            mode.set(MovementMode::Idle, ModeOwner::WallClimb);
            return ClimbOutcome::default();
        }

        let vy = if vertical_input {
            input.axis.y * climb.climb_speed
        } else {
            -climb.slide_speed
        };
        body.set_velocity(Vec2::new(0.0, vy));

        // Looking away is only a pose; the attachment keeps its side.
        let peek = away && !vertical_input;
        if peek != self.peeking {
            self.peeking = peek;
            events.cue(AnimationCue::Peek(peek));
        }

        ClimbOutcome {
            climbing: true,
            jumped_away: false,
        }
    }

    fn can_attach(&self, input: &MovementInput, body: &KinematicBody, sensors: &SensorState) -> bool {
        self.enabled
            && input.climb.held
            && sensors.is_close_to_climbable_wall()
            && sensors.is_near_wall()
            && (!body.grounded() || input.axis.y > AXIS_DEADZONE)
    }

    fn attach(
        &mut self,
        body: &mut KinematicBody,
        mode: &mut ModeState,
        facing: Facing,
        world: &impl CollisionWorld,
        tuning: &MovementTuning,
    ) -> bool {
        if !mode.lock(MovementMode::WallClimb, ModeOwner::WallClimb) {
            return false;
        }
        self.climbing = true;
        self.peeking = false;
        body.set_gravity_modifier(0.0);
        body.set_velocity(Vec2::ZERO);

        let climb = &tuning.climb;
        if let Some(hit) = wall_ahead(world, body, facing.sign(), climb.attach_reach) {
            let gap = hit.distance - body.shape().half_extents().x;
            body.add_position(Vec2::X * facing.sign() * (gap - climb.attach_gap));
        }
        debug!("Wall climb attached at {:?}", body.position());
        true
    }

    fn detach(
        &mut self,
        body: &mut KinematicBody,
        mode: &mut ModeState,
        tuning: &MovementTuning,
        events: &mut impl MotorEvents,
    ) {
        self.climbing = false;
        if self.peeking {
            self.peeking = false;
            events.cue(AnimationCue::Peek(false));
        }
        body.set_gravity_modifier(tuning.body.gravity_modifier);
        mode.unlock(ModeOwner::WallClimb);
    }

    /// Hand the character to a ledge hold without touching the body; the
    /// hold owns gravity from here.
    pub fn yield_to_hold(&mut self) {
        self.climbing = false;
        self.peeking = false;
    }

    pub fn reset(&mut self) {
        self.climbing = false;
        self.peeking = false;
    }
}
