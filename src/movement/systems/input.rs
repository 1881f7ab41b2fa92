//! Movement domain: input sampling for the character motor.

use bevy::prelude::*;

use crate::movement::{Button, MovementInput};

fn button(keyboard: &ButtonInput<KeyCode>, keys: &[KeyCode]) -> Button {
    Button {
        just_pressed: keyboard.any_just_pressed(keys.iter().copied()),
        held: keyboard.any_pressed(keys.iter().copied()),
        just_released: keyboard.any_just_released(keys.iter().copied()),
    }
}

pub(crate) fn read_input(keyboard: Res<ButtonInput<KeyCode>>, mut input: ResMut<MovementInput>) {
    // Horizontal axis
    let mut x = 0.0;
    if keyboard.pressed(KeyCode::KeyA) || keyboard.pressed(KeyCode::ArrowLeft) {
        x -= 1.0;
    }
    if keyboard.pressed(KeyCode::KeyD) || keyboard.pressed(KeyCode::ArrowRight) {
        x += 1.0;
    }

    // Vertical axis (climbing, ledge drop)
    let mut y = 0.0;
    if keyboard.pressed(KeyCode::KeyS) || keyboard.pressed(KeyCode::ArrowDown) {
        y -= 1.0;
    }
    if keyboard.pressed(KeyCode::KeyW) || keyboard.pressed(KeyCode::ArrowUp) {
        y += 1.0;
    }

    input.axis = Vec2::new(x, y);
    input.jump = button(&keyboard, &[KeyCode::Space, KeyCode::KeyK]);
    input.crouch = button(&keyboard, &[KeyCode::ControlLeft, KeyCode::KeyC]);
    input.walk = button(&keyboard, &[KeyCode::ShiftLeft]);
    input.climb = button(&keyboard, &[KeyCode::KeyL, KeyCode::KeyJ]);
    input.up = button(&keyboard, &[KeyCode::KeyW, KeyCode::ArrowUp]);
}
