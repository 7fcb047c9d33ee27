//! Player domain: the locomotion core - environment sensing, motor,
//! state machine, mask-modifier hook, and the event stream collaborators
//! subscribe to.

mod bootstrap;
mod components;
mod events;
mod motor;
mod resources;
mod states;
mod systems;
#[cfg(test)]
mod tests;

pub use components::{
    GameLayer, Ground, Player, PlayerInput, RuntimeState, SensorReadings, Wall,
};
pub use events::{
    BreakAttackCommand, DirectionChanged, DropThroughCommand, JumpCommand, Jumped, Landed,
    PlayerEvent, StateChanged, WallClingStarted, WallHit, WallJumped,
};
pub use motor::{DropThrough, Motor};
pub use resources::PlayerConfig;
pub use states::{Contact, ContactLayer, Locomotion, PlayerState, StateCtx};
pub use systems::collisions::{
    ascent_blocks_grounding, blocking_direction, box_contact_normal, ground_hit_counts,
    is_walkable_normal, penetration_tolerance, player_half_extents, OneWayHit, ASCENT_SPEED,
};

use bevy::prelude::*;

pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(PlayerConfig::load_or_default())
            .init_resource::<PlayerInput>()
            .add_message::<JumpCommand>()
            .add_message::<DropThroughCommand>()
            .add_message::<BreakAttackCommand>()
            .add_message::<DirectionChanged>()
            .add_message::<Jumped>()
            .add_message::<Landed>()
            .add_message::<WallHit>()
            .add_message::<WallClingStarted>()
            .add_message::<WallJumped>()
            .add_message::<StateChanged>()
            .add_systems(Startup, bootstrap::spawn_player)
            .add_systems(Update, systems::read_input)
            .add_systems(
                FixedUpdate,
                (
                    systems::update_sensors,
                    systems::drive_locomotion,
                    systems::apply_better_jump,
                    systems::handle_drop_through_requests,
                    systems::tick_drop_through,
                    bootstrap::respawn_player,
                )
                    .chain(),
            );
    }
}
