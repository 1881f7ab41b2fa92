use avian2d::prelude::*;
use bevy::prelude::*;

use platform_motor::{content, movement};

fn main() {
    let mut app = App::new();
    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "Platform Motor".to_string(),
            resolution: (1280u32, 720u32).into(),
            resizable: true,
            ..default()
        }),
        ..default()
    }))
    .add_plugins(PhysicsPlugins::default())
    .add_plugins((content::ContentPlugin, movement::MovementPlugin));

    #[cfg(feature = "dev-tools")]
    app.add_plugins(platform_motor::dev::DevPlugin);

    app.run();
}
