//! Validation for movement tuning values.

use crate::movement::MovementTuning;

/// A validation error naming the offending field.
#[derive(Debug)]
pub struct TuningError {
    pub field: &'static str,
    pub message: String,
}

impl std::fmt::Display for TuningError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Tuning field '{}' {}", self.field, self.message)
    }
}

/// Helper macro for checking a value is strictly positive
macro_rules! check_positive {
    ($errors:expr, $value:expr, $field:expr) => {
        if $value <= 0.0 {
            $errors.push(TuningError {
                field: $field,
                message: format!("must be positive, got {}", $value),
            });
        }
    };
}

/// Helper macro for checking a value is not negative
macro_rules! check_non_negative {
    ($errors:expr, $value:expr, $field:expr) => {
        if $value < 0.0 {
            $errors.push(TuningError {
                field: $field,
                message: format!("must not be negative, got {}", $value),
            });
        }
    };
}

/// Helper macro for checking a value lies in a closed range
macro_rules! check_range {
    ($errors:expr, $value:expr, $min:expr, $max:expr, $field:expr) => {
        if !($min..=$max).contains(&$value) {
            $errors.push(TuningError {
                field: $field,
                message: format!("must be within [{}, {}], got {}", $min, $max, $value),
            });
        }
    };
}

/// Validate tuning values.
/// Returns a list of validation errors, empty if the tuning is usable.
pub fn validate_tuning(tuning: &MovementTuning) -> Vec<TuningError> {
    let mut errors = Vec::new();

    // Body
    let body = &tuning.body;
    check_positive!(errors, body.gravity, "body.gravity");
    check_non_negative!(errors, body.gravity_modifier, "body.gravity_modifier");
    check_non_negative!(errors, body.shell_radius, "body.shell_radius");
    check_non_negative!(errors, body.min_move_distance, "body.min_move_distance");
    check_range!(errors, body.min_ground_normal_y, 0.0, 1.0, "body.min_ground_normal_y");

    // Collider
    check_positive!(errors, tuning.collider.width, "collider.width");
    check_positive!(errors, tuning.collider.height, "collider.height");
    let shell = body.shell_radius * 2.0;
    if tuning.collider.width <= shell || tuning.collider.height <= shell {
        errors.push(TuningError {
            field: "collider",
            message: format!("must be larger than twice the shell radius ({})", shell),
        });
    }

    // Locomotion
    let locomotion = &tuning.locomotion;
    check_positive!(errors, locomotion.max_speed, "locomotion.max_speed");
    check_positive!(errors, locomotion.accel, "locomotion.accel");
    check_positive!(errors, locomotion.decel, "locomotion.decel");
    check_non_negative!(errors, locomotion.walk_multiplier, "locomotion.walk_multiplier");
    check_non_negative!(errors, locomotion.run_multiplier, "locomotion.run_multiplier");
    check_non_negative!(errors, locomotion.crouch_multiplier, "locomotion.crouch_multiplier");

    // Jump
    let jump = &tuning.jump;
    check_positive!(errors, jump.takeoff_speed, "jump.takeoff_speed");
    check_positive!(errors, jump.jump_modifier, "jump.jump_modifier");
    check_range!(errors, jump.balance, 0.0, 1.0, "jump.balance");
    check_range!(errors, jump.deceleration, 0.0, 1.0, "jump.deceleration");
    check_non_negative!(errors, jump.jump_buffer_time, "jump.jump_buffer_time");
    check_non_negative!(errors, jump.coyote_time, "jump.coyote_time");

    // Crouch and slide
    let crouch = &tuning.crouch;
    if !(crouch.crouch_height_ratio > 0.0 && crouch.crouch_height_ratio <= 1.0) {
        errors.push(TuningError {
            field: "crouch.crouch_height_ratio",
            message: format!("must be within (0, 1], got {}", crouch.crouch_height_ratio),
        });
    }
    check_non_negative!(errors, crouch.slide_threshold, "crouch.slide_threshold");
    check_non_negative!(errors, crouch.slide_floor_speed, "crouch.slide_floor_speed");
    check_positive!(errors, crouch.slide_duration, "crouch.slide_duration");
    check_non_negative!(errors, crouch.slide_cooldown, "crouch.slide_cooldown");
    check_positive!(errors, crouch.stand_retry_interval, "crouch.stand_retry_interval");
    if crouch.slide_floor_speed > crouch.slide_threshold {
        errors.push(TuningError {
            field: "crouch.slide_floor_speed",
            message: format!(
                "exceeds slide_threshold ({} > {})",
                crouch.slide_floor_speed, crouch.slide_threshold
            ),
        });
    }

    // Climb
    let climb = &tuning.climb;
    check_positive!(errors, climb.climb_speed, "climb.climb_speed");
    check_non_negative!(errors, climb.slide_speed, "climb.slide_speed");
    check_non_negative!(errors, climb.attach_gap, "climb.attach_gap");
    check_non_negative!(errors, climb.attach_reach, "climb.attach_reach");

    // Hold
    let hold = &tuning.hold;
    check_non_negative!(errors, hold.regrab_cooldown, "hold.regrab_cooldown");
    check_non_negative!(errors, hold.min_ground_clearance, "hold.min_ground_clearance");
    check_positive!(errors, hold.probe.reach, "hold.probe.reach");
    check_positive!(errors, hold.probe.probe_height, "hold.probe.probe_height");

    // Sensors
    for (volume, field) in [
        (tuning.sensors.ledge, "sensors.ledge"),
        (tuning.sensors.wall, "sensors.wall"),
        (tuning.sensors.climbable, "sensors.climbable"),
    ] {
        if let Some(volume) = volume {
            if volume.width <= 0.0 || volume.height <= 0.0 {
                errors.push(TuningError {
                    field,
                    message: format!("has empty size {}x{}", volume.width, volume.height),
                });
            }
        }
    }

    check_non_negative!(errors, tuning.respawn_delay, "respawn_delay");

    errors
}
