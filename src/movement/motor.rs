//! Movement domain: the coordinating layer that runs one character per tick.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::movement::{
    AXIS_DEADZONE, AnimationCue, CrouchSlide, Facing, Gait, HoldPhase, JumpController, JumpPhase,
    Launch, LedgeHold, Locomotion, ModeOwner, ModeState, MotorEvent, MotorEvents,
    MovementInput, MovementMode, MovementTuning, Posture, WallClimb,
};
use crate::physics::{
    BodyKind, ColliderProfile, CollisionWorld, KinematicBody, SensorState, SensorTransition,
    sample_triggers,
};

/// Movement state of one character.
///
/// Each tick runs in a fixed order: sensors, the exclusive subsystems
/// (ledge hold, wall climb, crouch/slide), jump, horizontal locomotion, and
/// finally body integration.
#[derive(Component, Debug, Clone)]
pub struct CharacterMotor {
    body: KinematicBody,
    profile: ColliderProfile,
    mode: ModeState,
    jump: JumpController,
    locomotion: Locomotion,
    crouch: CrouchSlide,
    climb: WallClimb,
    hold: LedgeHold,
    sensors: SensorState,
    /// Last mode locomotion asked for. Only a change is written, so a mode
    /// set by someone else survives until the input situation changes.
    locomotion_opinion: Option<MovementMode>,
}

impl CharacterMotor {
    pub fn new(position: Vec2, tuning: &MovementTuning) -> Self {
        let standing = tuning.collider.shape();
        let profile = ColliderProfile::capture(standing, tuning.crouch.crouch_height_ratio);

        let sensors = &tuning.sensors;
        let hold_enabled = sensors.ledge.is_some();
        if !hold_enabled {
            warn!("No ledge sensor configured, ledge hold disabled");
        }
        let climb_enabled = sensors.wall.is_some() && sensors.climbable.is_some();
        if !climb_enabled {
            warn!("Wall or climbable sensor missing, wall climb disabled");
        }

        Self {
            body: KinematicBody::new(position, standing, tuning.body.gravity_modifier),
            profile,
            mode: ModeState::default(),
            jump: JumpController::new(&tuning.jump),
            locomotion: Locomotion::new(tuning.locomotion.visual_offset()),
            crouch: CrouchSlide::default(),
            climb: WallClimb::new(climb_enabled),
            hold: LedgeHold::new(hold_enabled),
            sensors: SensorState::default(),
            locomotion_opinion: Some(MovementMode::Idle),
        }
    }

    pub fn tick(
        &mut self,
        input: &MovementInput,
        dt: f32,
        world: &impl CollisionWorld,
        tuning: &MovementTuning,
        events: &mut impl MotorEvents,
    ) {
        let mode_at_start = self.mode.mode();

        let sample = sample_triggers(
            world,
            self.body.position(),
            self.locomotion.facing().sign(),
            &tuning.sensors,
        );
        for transition in self.sensors.apply(sample) {
            match transition {
                SensorTransition::Entered(kind) => debug!("Sensor entered: {:?}", kind),
                SensorTransition::Exited(kind) => debug!("Sensor exited: {:?}", kind),
            }
        }

        // Exclusive subsystems first; the first one active owns the tick.
        let mut exclusive = self.hold.update(
            input,
            &mut self.body,
            &self.sensors,
            &mut self.mode,
            &mut self.climb,
            self.locomotion.facing(),
            world,
            tuning,
            dt,
            events,
        );
        let mut jumped_away = false;
        if !exclusive {
            let outcome = self.climb.update(
                input,
                &mut self.body,
                &self.sensors,
                &mut self.mode,
                &mut self.locomotion,
                world,
                tuning,
                events,
            );
            exclusive = outcome.climbing;
            jumped_away = outcome.jumped_away;
        }
        if !exclusive {
            self.crouch.update(
                input,
                &mut self.body,
                &self.profile,
                &mut self.mode,
                world,
                tuning,
                dt,
                events,
            );
        }
        if self.mode.mode() != mode_at_start {
            self.locomotion_opinion = None;
        }

        if exclusive || jumped_away {
            self.jump.suspend();
        } else {
            let can_launch = !self.mode.is_locked() && self.crouch.posture() == Posture::Standing;
            if let Some(launch) = self.jump.update(
                input,
                self.body.grounded(),
                can_launch,
                dt,
                &tuning.jump,
                events,
            ) {
                self.apply_launch(launch);
            }
            if let Some(vy) =
                self.jump
                    .release_damping(self.body.velocity().y, &tuning.jump, events)
            {
                self.body.set_vertical_velocity(vy);
            }
        }

        self.drive_horizontal(input, dt, tuning, events);

        self.body.integrate(dt, world, &tuning.body);

        let mode = self.mode.mode();
        if mode != mode_at_start {
            events.cue(AnimationCue::ModeEntered(mode));
        }
    }

    fn apply_launch(&mut self, launch: Launch) {
        match launch {
            Launch::Ground {
                vertical,
                horizontal,
            } => {
                let mut velocity = self.body.velocity();
                velocity.y = vertical;
                velocity.x += self.locomotion.facing().sign() * horizontal;
                self.body.set_velocity(velocity);
                self.mode.set(MovementMode::Jump, ModeOwner::Jump);
                debug!("Jump launched: vy={:.1}, vx={:.1}", vertical, velocity.x);
            }
            Launch::Air { vertical } => {
                self.body.set_vertical_velocity(vertical);
                self.mode.set(MovementMode::DoubleJump, ModeOwner::Jump);
            }
        }
        self.locomotion_opinion = None;
    }

    fn drive_horizontal(
        &mut self,
        input: &MovementInput,
        dt: f32,
        tuning: &MovementTuning,
        events: &mut impl MotorEvents,
    ) {
        if self.hold.is_active() || self.climb.is_climbing() {
            self.body.set_target_horizontal(0.0);
            return;
        }
        if let Some(vx) = self.crouch.slide_velocity(tuning) {
            self.body.set_target_horizontal(vx);
            return;
        }

        let posture = self.crouch.posture();
        let gait = if posture == Posture::Crouching {
            Gait::Crouch
        } else if input.walk.held {
            Gait::Walk
        } else {
            Gait::Run
        };
        let target = Locomotion::target_speed(input.axis.x, gait, &tuning.locomotion);
        let vx = Locomotion::approach(self.body.velocity().x, target, dt, &tuning.locomotion);
        self.body.set_target_horizontal(vx);
        self.locomotion.update_facing(input.axis.x, events);

        let settled = matches!(self.jump.phase(), JumpPhase::Grounded | JumpPhase::Landed);
        if !settled || !self.body.grounded() || posture != Posture::Standing || self.mode.is_locked()
        {
            return;
        }

        let opinion = if input.axis.x.abs() > AXIS_DEADZONE {
            match gait {
                Gait::Walk => MovementMode::Walk,
                _ => MovementMode::Run,
            }
        } else if input.up.held {
            MovementMode::Up
        } else {
            MovementMode::Idle
        };
        if self.locomotion_opinion != Some(opinion)
            && self.mode.set(opinion, ModeOwner::Locomotion)
        {
            self.locomotion_opinion = Some(opinion);
        }
    }

    /// Confirm the ledge climb-up. Takes effect on the next tick.
    pub fn signal_climb_finished(&mut self) -> bool {
        self.hold.signal_climb_finished()
    }

    /// Authoritative reset: clears every lock and restores the captured
    /// collider, gravity, and flags.
    pub fn reset(&mut self, position: Vec2, tuning: &MovementTuning, events: &mut impl MotorEvents) {
        self.cancel_subsystems(tuning);
        self.body = KinematicBody::new(position, self.profile.standing(), tuning.body.gravity_modifier);
        self.locomotion.reset();
        events.schedule(MotorEvent::Respawned, None);
        info!("Character reset at {:?}", position);
    }

    /// Stop in place and ask for a respawn after the configured delay.
    pub fn kill(&mut self, tuning: &MovementTuning, events: &mut impl MotorEvents) {
        self.cancel_subsystems(tuning);
        self.body.set_shape(self.profile.standing());
        self.body.freeze();
        events.schedule(MotorEvent::Died, None);
        events.schedule(MotorEvent::RespawnDue, Some(tuning.respawn_delay));
    }

    fn cancel_subsystems(&mut self, tuning: &MovementTuning) {
        self.hold.reset();
        self.climb.reset();
        self.crouch.reset();
        self.jump.reset(&tuning.jump);
        self.sensors.clear();
        // Climb and hold zero gravity and may leave the body passive.
        self.body.set_gravity_modifier(tuning.body.gravity_modifier);
        self.body.set_passive(false);
        self.mode.force(MovementMode::Idle);
        self.locomotion_opinion = Some(MovementMode::Idle);
    }

    pub fn position(&self) -> Vec2 {
        self.body.position()
    }

    pub fn velocity(&self) -> Vec2 {
        self.body.velocity()
    }

    pub fn grounded(&self) -> bool {
        self.body.grounded()
    }

    pub fn facing(&self) -> Facing {
        self.locomotion.facing()
    }

    pub fn mode(&self) -> MovementMode {
        self.mode.mode()
    }

    pub fn is_locked(&self) -> bool {
        self.mode.is_locked()
    }

    pub fn lock_owner(&self) -> Option<ModeOwner> {
        self.mode.lock_owner()
    }

    pub fn jump_phase(&self) -> JumpPhase {
        self.jump.phase()
    }

    pub fn jump(&self) -> &JumpController {
        &self.jump
    }

    pub fn posture(&self) -> Posture {
        self.crouch.posture()
    }

    pub fn crouch(&self) -> &CrouchSlide {
        &self.crouch
    }

    pub fn hold_phase(&self) -> HoldPhase {
        self.hold.phase()
    }

    pub fn is_climbing(&self) -> bool {
        self.climb.is_climbing()
    }

    pub fn is_hold_enabled(&self) -> bool {
        self.hold.is_enabled()
    }

    pub fn is_climb_enabled(&self) -> bool {
        self.climb.is_enabled()
    }

    pub fn sensors(&self) -> &SensorState {
        &self.sensors
    }

    pub fn body(&self) -> &KinematicBody {
        &self.body
    }

    pub fn profile(&self) -> &ColliderProfile {
        &self.profile
    }

    pub fn visual_offset(&self) -> Vec2 {
        self.locomotion.visual_offset()
    }

    /// Where the sprite sits relative to the body position: the live collider
    /// center plus the facing-mirrored visual offset.
    pub fn sprite_offset(&self) -> Vec2 {
        self.body.shape().offset + self.locomotion.visual_offset()
    }

    /// Mode change from outside the movement core. Refused while locked.
    pub fn set_mode(&mut self, mode: MovementMode) -> bool {
        self.mode.set(mode, ModeOwner::External)
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.body.set_position(position);
    }

    pub fn add_position(&mut self, delta: Vec2) {
        self.body.add_position(delta);
    }

    pub fn set_velocity(&mut self, velocity: Vec2) {
        self.body.set_velocity(velocity);
    }

    pub fn freeze(&mut self) {
        self.body.freeze();
    }

    pub fn unfreeze(&mut self) {
        self.body.unfreeze();
    }

    pub fn set_body_kind(&mut self, kind: BodyKind) {
        self.body.set_kind(kind);
    }

    pub fn snapshot(&self) -> MotorSnapshot {
        MotorSnapshot {
            position: self.body.position().to_array(),
            velocity: self.body.velocity().to_array(),
            grounded: self.body.grounded(),
            facing: self.locomotion.facing(),
            mode: self.mode.mode(),
            lock_owner: self.mode.lock_owner(),
            jump_phase: self.jump.phase(),
            posture: self.crouch.posture(),
            hold_phase: self.hold.phase(),
            climbing: self.climb.is_climbing(),
        }
    }
}

/// Serializable view of a motor for dumps and debugging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotorSnapshot {
    pub position: [f32; 2],
    pub velocity: [f32; 2],
    pub grounded: bool,
    pub facing: Facing,
    pub mode: MovementMode,
    pub lock_owner: Option<ModeOwner>,
    pub jump_phase: JumpPhase,
    pub posture: Posture,
    pub hold_phase: HoldPhase,
    pub climbing: bool,
}
