//! Movement domain: jump phases with input buffering and coyote time.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::movement::{JumpTuning, MotorEvent, MotorEvents, MovementInput};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum JumpPhase {
    #[default]
    Grounded,
    PrepareToJump,
    Jumping,
    InFlight,
    Landed,
}

/// Velocity the motor should apply after a successful start.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Launch {
    /// `horizontal` is along the facing direction.
    Ground { vertical: f32, horizontal: f32 },
    Air { vertical: f32 },
}

#[derive(Debug, Clone, Default)]
pub struct JumpController {
    phase: JumpPhase,
    buffer_counter: f32,
    coyote_counter: f32,
    stop_requested: bool,
    damped: bool,
    air_jumps_remaining: u8,
}

impl JumpController {
    pub fn new(tuning: &JumpTuning) -> Self {
        Self {
            air_jumps_remaining: tuning.max_air_jumps,
            ..default()
        }
    }

    pub fn phase(&self) -> JumpPhase {
        self.phase
    }

    pub fn buffer_counter(&self) -> f32 {
        self.buffer_counter
    }

    pub fn coyote_counter(&self) -> f32 {
        self.coyote_counter
    }

    pub fn air_jumps_remaining(&self) -> u8 {
        self.air_jumps_remaining
    }

    /// Advance counters and phase for one tick. `can_launch` is false while
    /// another subsystem owns the character; counters still run.
    pub fn update(
        &mut self,
        input: &MovementInput,
        grounded: bool,
        can_launch: bool,
        dt: f32,
        tuning: &JumpTuning,
        events: &mut impl MotorEvents,
    ) -> Option<Launch> {
        if grounded {
            self.coyote_counter = tuning.coyote_time;
        } else {
            self.coyote_counter = (self.coyote_counter - dt).max(0.0);
        }

        self.buffer_counter = (self.buffer_counter - dt).max(0.0);
        if input.jump.just_pressed {
            self.buffer_counter = tuning.jump_buffer_time;
        }

        if input.jump.just_released
            && matches!(self.phase, JumpPhase::Jumping | JumpPhase::InFlight)
        {
            self.stop_requested = true;
        }

        match self.phase {
            JumpPhase::Jumping if !grounded => {
                self.enter(JumpPhase::InFlight);
                events.schedule(MotorEvent::Jumped, None);
            }
            JumpPhase::InFlight if grounded => {
                self.enter(JumpPhase::Landed);
                self.air_jumps_remaining = tuning.max_air_jumps;
                events.schedule(MotorEvent::Landed, None);
            }
            JumpPhase::Landed => self.enter(JumpPhase::Grounded),
            // Walked off an edge.
            JumpPhase::Grounded if !grounded => self.enter(JumpPhase::InFlight),
            _ => {}
        }

        if !can_launch || self.buffer_counter <= 0.0 {
            return None;
        }

        let ground_window = matches!(self.phase, JumpPhase::Grounded | JumpPhase::Landed)
            || (self.phase == JumpPhase::InFlight && self.coyote_counter > 0.0);
        if ground_window {
            self.enter(JumpPhase::PrepareToJump);
            return self.try_start(grounded, tuning);
        }

        if self.phase == JumpPhase::InFlight && self.air_jumps_remaining > 0 {
            self.buffer_counter = 0.0;
            self.air_jumps_remaining -= 1;
            self.stop_requested = false;
            self.damped = false;
            events.schedule(MotorEvent::AirJumped, None);
            debug!(
                "Air jump: air_jumps_remaining={}",
                self.air_jumps_remaining
            );
            return Some(Launch::Air {
                vertical: tuning.takeoff_speed * tuning.jump_modifier,
            });
        }

        None
    }

    /// Launch from `PrepareToJump` if the buffered press is still inside the
    /// ground or coyote window. Both counters are consumed on success.
    pub fn try_start(&mut self, grounded: bool, tuning: &JumpTuning) -> Option<Launch> {
        if self.phase != JumpPhase::PrepareToJump {
            return None;
        }
        if !((grounded || self.coyote_counter > 0.0) && self.buffer_counter > 0.0) {
            self.enter(if grounded {
                JumpPhase::Grounded
            } else {
                JumpPhase::InFlight
            });
            return None;
        }

        self.buffer_counter = 0.0;
        self.coyote_counter = 0.0;
        self.stop_requested = false;
        self.damped = false;
        self.enter(JumpPhase::Jumping);

        let energy = tuning.takeoff_speed * tuning.jump_modifier;
        Some(Launch::Ground {
            vertical: energy * tuning.balance,
            horizontal: energy * (1.0 - tuning.balance),
        })
    }

    /// Short-hop damping after an early release. Returns the new vertical
    /// velocity when applied; applies at most once per launch.
    pub fn release_damping(
        &mut self,
        vertical_velocity: f32,
        tuning: &JumpTuning,
        events: &mut impl MotorEvents,
    ) -> Option<f32> {
        if !self.stop_requested {
            return None;
        }
        self.stop_requested = false;
        if self.damped || vertical_velocity <= 0.0 {
            return None;
        }
        self.damped = true;
        events.schedule(MotorEvent::StopJump, None);
        Some(vertical_velocity * tuning.deceleration)
    }

    /// Drop pending input while another subsystem owns the body.
    pub fn suspend(&mut self) {
        self.buffer_counter = 0.0;
        self.coyote_counter = 0.0;
        self.stop_requested = false;
        if self.phase != JumpPhase::InFlight {
            self.enter(JumpPhase::InFlight);
        }
    }

    pub fn reset(&mut self, tuning: &JumpTuning) {
        *self = Self::new(tuning);
    }

    fn enter(&mut self, phase: JumpPhase) {
        if self.phase != phase {
            debug!("Jump phase: {:?} -> {:?}", self.phase, phase);
            self.phase = phase;
        }
    }
}
