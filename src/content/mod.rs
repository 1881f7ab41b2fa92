//! Content domain: data-driven movement tuning.

mod loader;
mod validation;


use bevy::prelude::*;
use std::path::Path;

pub use loader::{TuningLoadError, load_tuning, tuning_from_str};
pub use validation::{TuningError, validate_tuning};

use crate::movement::MovementTuning;

/// Location of the tuning file relative to the working directory.
pub const TUNING_PATH: &str = "assets/data/movement.ron";

pub struct ContentPlugin;

impl Plugin for ContentPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(PreStartup, load_movement_tuning);
    }
}

/// Replace the default tuning with the file contents when they load and
/// validate; otherwise keep the defaults.
fn load_movement_tuning(mut commands: Commands) {
    commands.insert_resource(tuning_or_default(Path::new(TUNING_PATH)));
}

pub fn tuning_or_default(path: &Path) -> MovementTuning {
    let tuning = match load_tuning(path) {
        Ok(tuning) => tuning,
        Err(e) => {
            warn!("{}, using default movement tuning", e);
            return MovementTuning::default();
        }
    };

    let errors = validate_tuning(&tuning);
    if !errors.is_empty() {
        for error in &errors {
            warn!("{}", error);
        }
        warn!(
            "{} tuning validation errors in {}, using default movement tuning",
            errors.len(),
            path.display()
        );
        return MovementTuning::default();
    }

    info!(
        "Loaded movement tuning from {}: max_speed={}, takeoff_speed={}, hold_preset={:?}",
        path.display(),
        tuning.locomotion.max_speed,
        tuning.jump.takeoff_speed,
        tuning.hold.preset
    );
    tuning
}
