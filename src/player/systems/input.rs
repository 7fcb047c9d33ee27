//! Player domain: frame-tick input sampling.
//!
//! Discrete presses become command messages consumed at the next fixed
//! dispatch; only the held-jump flag is sampled as state.

use bevy::ecs::message::MessageWriter;
use bevy::prelude::*;

use crate::player::components::{Player, PlayerInput, RuntimeState};
use crate::player::events::{BreakAttackCommand, DropThroughCommand, JumpCommand};

pub(crate) fn read_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mouse: Res<ButtonInput<MouseButton>>,
    mut input: ResMut<PlayerInput>,
    mut jump_commands: MessageWriter<JumpCommand>,
    mut drop_commands: MessageWriter<DropThroughCommand>,
    mut break_commands: MessageWriter<BreakAttackCommand>,
    players: Query<&RuntimeState, With<Player>>,
) {
    if keyboard.just_pressed(KeyCode::Space) || mouse.just_pressed(MouseButton::Left) {
        jump_commands.write(JumpCommand);
    }
    input.jump_held = keyboard.pressed(KeyCode::Space) || mouse.pressed(MouseButton::Left);

    if keyboard.just_pressed(KeyCode::KeyS) || keyboard.just_pressed(KeyCode::ArrowDown) {
        drop_commands.write(DropThroughCommand);
    }

    if keyboard.just_pressed(KeyCode::KeyF) {
        // Break attacks aim where the player runs.
        let direction = players.iter().next().map(|r| r.move_direction).unwrap_or(1);
        break_commands.write(BreakAttackCommand { direction });
    }
}
