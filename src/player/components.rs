//! Player domain: markers, physics layers, and per-tick sensor state.

use avian2d::prelude::*;
use bevy::prelude::*;

/// Physics layers for collision filtering
#[derive(PhysicsLayer, Clone, Copy, Debug, Default)]
pub enum GameLayer {
    #[default]
    Default,
    /// Solid ground that cannot be passed through
    Ground,
    /// One-way platforms (pass from below, stand on top)
    OneWayPlatform,
    /// Wall surfaces the player clings to and bounces off
    Wall,
    /// Breakable obstacles, treated as walls until broken
    Breakable,
    /// Player character
    Player,
    /// Hazards (lava) - kill on contact, never block movement
    Hazard,
    /// Pickups and other non-blocking sensors
    Pickup,
}

#[derive(Component, Debug)]
pub struct Player;

/// Marker for solid ground colliders
#[derive(Component, Debug)]
pub struct Ground;

/// Marker for wall colliders
#[derive(Component, Debug)]
pub struct Wall;

/// Mutable per-player locomotion bookkeeping, reset on respawn.
#[derive(Component, Debug, Clone)]
pub struct RuntimeState {
    /// Always -1 or +1; the player auto-runs in this direction.
    pub move_direction: i8,
    /// Jumps consumed since last grounded, within [0, max_jumps].
    pub jump_count: u8,
    /// One-shot permission to wall-cling, re-armed on entering Moving.
    pub cling_available: bool,
    /// Latest wall contact normal.
    pub wall_normal: Vec2,
}

impl RuntimeState {
    pub fn new(initial_direction: i8) -> Self {
        Self {
            move_direction: initial_direction,
            jump_count: 0,
            cling_available: true,
            wall_normal: Vec2::ZERO,
        }
    }

    pub fn reset(&mut self, initial_direction: i8) {
        *self = Self::new(initial_direction);
    }
}

impl Default for RuntimeState {
    fn default() -> Self {
        Self::new(1)
    }
}

/// Environment queries cached once per physics tick by the sensor systems.
/// All flags degrade to false when the underlying cast finds nothing.
#[derive(Component, Debug, Default, Clone)]
pub struct SensorReadings {
    pub grounded: bool,
    pub on_one_way_platform: bool,
    pub wall_left: bool,
    pub wall_right: bool,
    /// -1, 0, or +1; prefers +1 when both sides touch.
    pub wall_direction: i8,
    /// Obstacle ahead at chest height in the current move direction.
    pub front_blocked: bool,
    /// The entity of that frontal obstacle, for collaborators that care
    /// which dead-end was hit.
    pub front_obstacle: Option<Entity>,
    pub blocked_left: bool,
    pub blocked_right: bool,
}

impl SensorReadings {
    pub fn touching_wall(&self) -> bool {
        self.wall_direction != 0
    }

    /// Whether the snapshotted side still has wall contact.
    pub fn touching_side(&self, direction: i8) -> bool {
        match direction {
            -1 => self.wall_left,
            1 => self.wall_right,
            _ => false,
        }
    }

    /// Whether a physical contact blocks movement toward `direction`.
    pub fn blocked(&self, direction: i8) -> bool {
        if direction < 0 {
            self.blocked_left
        } else {
            self.blocked_right
        }
    }
}

/// Frame-tick input state sampled for the physics tick.
#[derive(Resource, Debug, Default)]
pub struct PlayerInput {
    pub jump_held: bool,
}
