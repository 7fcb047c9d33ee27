//! World domain: hand-built test level for development.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::masks::MaskPickup;
use crate::player::{GameLayer, Ground, Wall};
use crate::world::breakables::Breakable;
use crate::world::hazards::{LavaStartMode, RisingLava};
use crate::world::platforms::OneWayPlatform;

pub(crate) fn spawn_test_level(mut commands: Commands) {
    let wall_color = Color::srgb(0.3, 0.3, 0.4);
    let ground_color = Color::srgb(0.4, 0.5, 0.4);
    let platform_color = Color::srgb(0.5, 0.4, 0.3);
    let breakable_color = Color::srgb(0.6, 0.5, 0.2);
    let lava_color = Color::srgb(0.9, 0.3, 0.1);
    let pickup_color = Color::srgb(0.8, 0.8, 0.3);

    let ground_layers = CollisionLayers::new(GameLayer::Ground, [GameLayer::Player]);
    let platform_layers = CollisionLayers::new(GameLayer::OneWayPlatform, [GameLayer::Player]);
    let wall_layers = CollisionLayers::new(GameLayer::Wall, [GameLayer::Player]);
    let breakable_layers = CollisionLayers::new(GameLayer::Breakable, [GameLayer::Player]);
    let hazard_layers = CollisionLayers::new(GameLayer::Hazard, [GameLayer::Player]);
    let pickup_layers = CollisionLayers::new(GameLayer::Pickup, [GameLayer::Player]);

    // Ground slab, top surface at y = 0
    commands.spawn((
        Ground,
        Sprite {
            color: ground_color,
            custom_size: Some(Vec2::new(24.0, 2.0)),
            ..default()
        },
        Transform::from_xyz(0.0, -1.0, 0.0),
        RigidBody::Static,
        Collider::rectangle(24.0, 2.0),
        ground_layers,
    ));

    // Side walls for wall jumping up the shaft
    for x in [-11.0, 11.0] {
        commands.spawn((
            Wall,
            Sprite {
                color: wall_color,
                custom_size: Some(Vec2::new(2.0, 40.0)),
                ..default()
            },
            Transform::from_xyz(x, 18.0, 0.0),
            RigidBody::Static,
            Collider::rectangle(2.0, 40.0),
            wall_layers,
        ));
    }

    // One-way platforms at increasing heights
    for (x, y) in [(-5.0, 3.0), (5.0, 6.0), (-5.0, 9.0), (5.0, 12.0)] {
        commands.spawn((
            OneWayPlatform,
            Sprite {
                color: platform_color,
                custom_size: Some(Vec2::new(4.0, 0.3)),
                ..default()
            },
            Transform::from_xyz(x, y, 0.0),
            RigidBody::Static,
            Collider::rectangle(4.0, 0.3),
            ActiveCollisionHooks::FILTER_PAIRS,
            platform_layers,
        ));
    }

    // Pillar for wall-cling practice
    commands.spawn((
        Wall,
        Sprite {
            color: wall_color,
            custom_size: Some(Vec2::new(1.0, 6.0)),
            ..default()
        },
        Transform::from_xyz(-2.0, 3.0, 0.0),
        RigidBody::Static,
        Collider::rectangle(1.0, 6.0),
        wall_layers,
    ));

    // Breakable block requiring the strength mask
    commands.spawn((
        Breakable::requiring("mask_strength"),
        Sprite {
            color: breakable_color,
            custom_size: Some(Vec2::new(1.0, 2.0)),
            ..default()
        },
        Transform::from_xyz(4.0, 1.0, 0.0),
        RigidBody::Static,
        Collider::rectangle(1.0, 2.0),
        breakable_layers,
    ));

    // Lava pool below the ground line
    commands.spawn((
        RisingLava::new(0.4, 0.0, LavaStartMode::OnFirstJump),
        Sprite {
            color: lava_color,
            custom_size: Some(Vec2::new(24.0, 2.0)),
            ..default()
        },
        Transform::from_xyz(0.0, -5.0, 0.0),
        RigidBody::Kinematic,
        Collider::rectangle(24.0, 2.0),
        Sensor,
        CollisionEventsEnabled,
        hazard_layers,
    ));

    // Strength mask pickup on the first platform
    commands.spawn((
        MaskPickup {
            mask_id: "mask_strength".to_string(),
        },
        Sprite {
            color: pickup_color,
            custom_size: Some(Vec2::new(0.6, 0.6)),
            ..default()
        },
        Transform::from_xyz(-5.0, 3.7, 0.0),
        RigidBody::Static,
        Collider::rectangle(0.6, 0.6),
        Sensor,
        CollisionEventsEnabled,
        pickup_layers,
    ));

    info!("test level spawned");
}
