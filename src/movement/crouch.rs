//! Movement domain: crouching, timed slides, and deferred stand-up.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::movement::{
    ModeOwner, ModeState, MotorEvent, MotorEvents, MovementInput, MovementMode, MovementTuning,
};
use crate::physics::{
    ColliderProfile, CollisionWorld, KinematicBody, ceiling_above, shape_is_clear,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Posture {
    #[default]
    Standing,
    Crouching,
    Sliding,
}

#[derive(Debug, Clone, Default)]
pub struct CrouchSlide {
    posture: Posture,
    slide_elapsed: f32,
    slide_start_speed: f32,
    slide_direction: f32,
    cooldown: f32,
    /// Crouch was released but the standing shape has not fit yet.
    stand_pending: bool,
    retry_timer: f32,
}

impl CrouchSlide {
    pub fn posture(&self) -> Posture {
        self.posture
    }

    pub fn is_stand_pending(&self) -> bool {
        self.stand_pending
    }

    pub fn cooldown(&self) -> f32 {
        self.cooldown
    }

    pub fn update(
        &mut self,
        input: &MovementInput,
        body: &mut KinematicBody,
        profile: &ColliderProfile,
        mode: &mut ModeState,
        world: &impl CollisionWorld,
        tuning: &MovementTuning,
        dt: f32,
        events: &mut impl MotorEvents,
    ) {
        let crouch = &tuning.crouch;
        self.cooldown = (self.cooldown - dt).max(0.0);

        match self.posture {
            Posture::Standing => {
                if !input.crouch.held
                    || !body.grounded()
                    || !mode.mode().is_crouch_eligible()
                    || mode.is_locked()
                {
                    return;
                }

                let speed = body.velocity().x;
                if speed.abs() > crouch.slide_threshold && self.cooldown <= 0.0 {
                    if !mode.lock(MovementMode::Slide, ModeOwner::CrouchSlide) {
                        return;
                    }
                    self.posture = Posture::Sliding;
                    self.slide_elapsed = 0.0;
                    self.slide_start_speed = speed.abs();
                    self.slide_direction = speed.signum();
                    body.set_shape(profile.crouching());
                    events.schedule(MotorEvent::SlideStarted, None);
                    debug!("Slide started: speed={:.1}", speed);
                } else if mode.set(MovementMode::Crouch, ModeOwner::CrouchSlide) {
                    self.posture = Posture::Crouching;
                    self.stand_pending = false;
                    body.set_shape(profile.crouching());
                }
            }
            Posture::Sliding => {
                self.slide_elapsed += dt;
                let finished = self.slide_elapsed >= crouch.slide_duration;
                if input.crouch.held && body.grounded() && !finished {
                    return;
                }

                self.posture = Posture::Crouching;
                self.cooldown = crouch.slide_cooldown;
                mode.unlock(ModeOwner::CrouchSlide);
                events.schedule(MotorEvent::SlideEnded, None);
                debug!(
                    "Slide ended: elapsed={:.2}, released={}",
                    self.slide_elapsed, !input.crouch.held
                );

                mode.set(MovementMode::Crouch, ModeOwner::CrouchSlide);
                if !(input.crouch.held && body.grounded()) {
                    self.request_stand();
                    self.try_stand(body, profile, mode, world, tuning, dt);
                }
            }
            Posture::Crouching => {
                if input.crouch.held {
                    self.stand_pending = false;
                    return;
                }
                if !self.stand_pending {
                    self.request_stand();
                }
                self.try_stand(body, profile, mode, world, tuning, dt);
            }
        }
    }

    /// Live horizontal velocity while sliding: a linear blend from the entry
    /// speed down to the floor over the slide duration.
    pub fn slide_velocity(&self, tuning: &MovementTuning) -> Option<f32> {
        if self.posture != Posture::Sliding {
            return None;
        }
        let crouch = &tuning.crouch;
        let t = if crouch.slide_duration > 0.0 {
            (self.slide_elapsed / crouch.slide_duration).clamp(0.0, 1.0)
        } else {
            1.0
        };
        let floor = crouch.slide_floor_speed.min(self.slide_start_speed);
        let speed = self.slide_start_speed + (floor - self.slide_start_speed) * t;
        Some(self.slide_direction * speed)
    }

    fn request_stand(&mut self) {
        self.stand_pending = true;
        self.retry_timer = 0.0;
    }

    /// Restore the standing shape once it no longer overlaps solid geometry.
    fn try_stand(
        &mut self,
        body: &mut KinematicBody,
        profile: &ColliderProfile,
        mode: &mut ModeState,
        world: &impl CollisionWorld,
        tuning: &MovementTuning,
        dt: f32,
    ) {
        self.retry_timer -= dt;
        if self.retry_timer > 0.0 {
            return;
        }

        let standing = profile.standing();
        if shape_is_clear(world, body.position(), &standing, tuning.body.shell_radius) {
            body.set_shape(standing);
            self.posture = Posture::Standing;
            self.stand_pending = false;
            mode.set(MovementMode::Idle, ModeOwner::CrouchSlide);
            return;
        }

        self.retry_timer = tuning.crouch.stand_retry_interval;
        let missing = standing.size.y - body.shape().size.y;
        if let Some(ceiling) = ceiling_above(world, body, missing) {
            debug!(
                "Stand-up blocked: headroom={:.1}, needed={:.1}",
                ceiling.distance, missing
            );
        }
    }

    /// Drop any crouch or slide state. The caller restores the collider.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
