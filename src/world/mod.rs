//! World domain: level geometry, one-way platforms, breakables, hazards.

mod breakables;
mod hazards;
#[cfg(feature = "dev-tools")]
mod level;
mod platforms;

pub use breakables::{BreakAttemptFailed, Breakable, ObjectBroken};
pub use hazards::{LavaStartMode, PlayerDied, RisingLava};
pub use platforms::{pass_through, OneWayPlatform, OneWayPlatformHooks};

use bevy::prelude::*;

/// Where the player spawns and respawns.
#[derive(Resource, Debug, Clone, Copy)]
pub struct PlayerSpawnPoint(pub Vec2);

impl Default for PlayerSpawnPoint {
    fn default() -> Self {
        Self(Vec2::new(0.0, 2.0))
    }
}

pub struct WorldPlugin;

impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PlayerSpawnPoint>()
            .add_message::<ObjectBroken>()
            .add_message::<BreakAttemptFailed>()
            .add_message::<PlayerDied>()
            .add_systems(
                FixedUpdate,
                (
                    hazards::start_lava_on_first_jump,
                    hazards::rise_lava,
                    hazards::detect_lava_contact,
                    breakables::handle_break_attacks,
                )
                    .chain(),
            );

        #[cfg(feature = "dev-tools")]
        app.add_systems(Startup, level::spawn_test_level);
    }
}
