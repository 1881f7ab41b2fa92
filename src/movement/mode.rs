//! Movement domain: the single active movement mode and its lock.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Reflect)]
pub enum MovementMode {
    #[default]
    Idle,
    Walk,
    Run,
    Crouch,
    Jump,
    DoubleJump,
    /// Climbing up from a ledge hold, waiting for the climb to finish.
    Climb,
    WallClimb,
    Hold,
    Slide,
    /// Standing still and looking up.
    Up,
}

impl MovementMode {
    /// Modes from which crouching or sliding may start.
    pub fn is_crouch_eligible(self) -> bool {
        matches!(
            self,
            MovementMode::Idle | MovementMode::Walk | MovementMode::Run
        )
    }
}

/// Identity of whoever is changing the mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModeOwner {
    Locomotion,
    Jump,
    CrouchSlide,
    WallClimb,
    LedgeHold,
    /// Systems outside the movement core (checkpoints, cutscenes).
    External,
}

/// Current mode plus an optional lock.
///
/// While locked only the lock owner may change the mode; everyone else is
/// silently refused. [`ModeState::force`] is the authoritative reset and
/// ignores the lock.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModeState {
    mode: MovementMode,
    lock: Option<ModeOwner>,
}

impl ModeState {
    pub fn mode(&self) -> MovementMode {
        self.mode
    }

    pub fn is_locked(&self) -> bool {
        self.lock.is_some()
    }

    pub fn lock_owner(&self) -> Option<ModeOwner> {
        self.lock
    }

    fn permits(&self, by: ModeOwner) -> bool {
        self.lock.is_none_or(|owner| owner == by)
    }

    /// Change the mode. Returns false if another owner holds the lock.
    pub fn set(&mut self, mode: MovementMode, by: ModeOwner) -> bool {
        if !self.permits(by) {
            debug!(
                "Mode change to {:?} by {:?} refused, locked by {:?}",
                mode, by, self.lock
            );
            return false;
        }
        self.mode = mode;
        true
    }

    /// Set the mode and take the lock.
    pub fn lock(&mut self, mode: MovementMode, owner: ModeOwner) -> bool {
        if !self.permits(owner) {
            return false;
        }
        self.mode = mode;
        self.lock = Some(owner);
        true
    }

    /// Release the lock. Only the owner can.
    pub fn unlock(&mut self, owner: ModeOwner) -> bool {
        if self.lock != Some(owner) {
            return false;
        }
        self.lock = None;
        true
    }

    /// Hand the lock from one owner straight to another.
    pub fn transfer(&mut self, from: ModeOwner, to: ModeOwner, mode: MovementMode) -> bool {
        if self.lock != Some(from) {
            return false;
        }
        self.lock = Some(to);
        self.mode = mode;
        true
    }

    /// Authoritative reset used by death and respawn.
    pub fn force(&mut self, mode: MovementMode) {
        self.mode = mode;
        self.lock = None;
    }
}
