mod content;
mod core;
mod masks;
mod player;
mod world;

use avian2d::prelude::*;
use bevy::prelude::*;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Maskfall".to_string(),
                resolution: (1280u32, 720u32).into(),
                resizable: true,
                ..default()
            }),
            ..default()
        }))
        .add_plugins(
            PhysicsPlugins::default().with_collision_hooks::<world::OneWayPlatformHooks>(),
        )
        .insert_resource(Gravity(Vec2::NEG_Y * 9.81))
        .add_plugins((
            core::CorePlugin,
            player::PlayerPlugin,
            masks::MasksPlugin,
            world::WorldPlugin,
        ))
        .run();
}
