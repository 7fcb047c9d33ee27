//! Player domain: commands accepted from outside and messages raised by
//! the locomotion state machine.

use bevy::ecs::message::Message;
use bevy::prelude::*;

use crate::player::states::PlayerState;

/// Jump press, queued from the frame tick, dispatched at the next
/// fixed-tick state update.
#[derive(Debug)]
pub struct JumpCommand;

impl Message for JumpCommand {}

/// Request to drop through the one-way platform the player stands on.
#[derive(Debug)]
pub struct DropThroughCommand;

impl Message for DropThroughCommand {}

/// Request to break a breakable obstacle ahead of the player.
#[derive(Debug)]
pub struct BreakAttackCommand {
    pub direction: i8,
}

impl Message for BreakAttackCommand {}

/// Raised when the auto-run direction flips.
#[derive(Debug)]
pub struct DirectionChanged {
    pub direction: i8,
}

impl Message for DirectionChanged {}

/// Raised on every consumed jump, with the jump count after consuming.
#[derive(Debug)]
pub struct Jumped {
    pub jump_count: u8,
}

impl Message for Jumped {}

/// Raised on landing with a noticeable impact speed.
#[derive(Debug)]
pub struct Landed {
    pub fall_speed: f32,
}

impl Message for Landed {}

/// Raised when a wall contact redirects or stops the player.
#[derive(Debug)]
pub struct WallHit {
    pub normal: Vec2,
}

impl Message for WallHit {}

/// Raised when the player sticks to a wall.
#[derive(Debug)]
pub struct WallClingStarted {
    pub position: Vec2,
}

impl Message for WallClingStarted {}

/// Raised when the player kicks off a wall, with the new run direction.
#[derive(Debug)]
pub struct WallJumped {
    pub new_direction: i8,
}

impl Message for WallJumped {}

/// Raised after every state transition, once Enter has completed.
#[derive(Debug)]
pub struct StateChanged {
    pub state: PlayerState,
}

impl Message for StateChanged {}

/// Internal event queue filled by the state machine during a dispatch and
/// published as the typed messages above before the dispatch system
/// returns. Keeps transition messages strictly after Enter logic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlayerEvent {
    DirectionChanged(i8),
    Jumped(u8),
    Landed(f32),
    WallHit(Vec2),
    WallCling(Vec2),
    WallJumped(i8),
    StateChanged(PlayerState),
}
