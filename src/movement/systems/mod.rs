//! Movement domain: system modules driving character motors.

pub(crate) mod input;
pub(crate) mod motor;
pub(crate) mod signals;

pub(crate) use input::read_input;
pub(crate) use motor::{drive_motors, sync_motor_visuals};
pub(crate) use signals::{apply_climb_finished, apply_respawns};
