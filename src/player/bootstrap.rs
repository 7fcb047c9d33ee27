//! Player domain: spawn and respawn.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::core::RoundOver;
use crate::player::components::{GameLayer, Player, RuntimeState, SensorReadings};
use crate::player::motor::DropThrough;
use crate::player::resources::PlayerConfig;
use crate::player::states::Locomotion;
use crate::world::PlayerSpawnPoint;

pub(crate) const PLAYER_SIZE: Vec2 = Vec2::new(0.9, 1.8);
const INITIAL_DIRECTION: i8 = 1;

pub(crate) fn spawn_player(
    mut commands: Commands,
    config: Res<PlayerConfig>,
    spawn_point: Option<Res<PlayerSpawnPoint>>,
    existing: Query<Entity, With<Player>>,
) {
    if !existing.is_empty() {
        info!("player already exists, skipping spawn");
        return;
    }

    let position = spawn_point.map(|p| p.0).unwrap_or(Vec2::ZERO);

    commands.spawn((
        // Identity & locomotion
        (
            Player,
            RuntimeState::new(INITIAL_DIRECTION),
            Locomotion::default(),
            SensorReadings::default(),
            DropThrough::default(),
        ),
        // Rendering
        Sprite {
            color: Color::srgb(0.9, 0.9, 0.9),
            custom_size: Some(PLAYER_SIZE),
            ..default()
        },
        Transform::from_translation(position.extend(0.0)),
        // Physics
        (
            RigidBody::Dynamic,
            Collider::rectangle(PLAYER_SIZE.x, PLAYER_SIZE.y),
            LockedAxes::ROTATION_LOCKED,
            LinearVelocity::default(),
            GravityScale(config.gravity_scale),
            Friction::new(0.0),
            CollisionEventsEnabled,
            ActiveCollisionHooks::FILTER_PAIRS,
            CollisionLayers::new(
                GameLayer::Player,
                [
                    GameLayer::Ground,
                    GameLayer::OneWayPlatform,
                    GameLayer::Wall,
                    GameLayer::Breakable,
                    GameLayer::Hazard,
                    GameLayer::Pickup,
                ],
            ),
        ),
    ));
}

/// Once the round-over countdown elapses, put the player back at the
/// spawn point with every piece of runtime state reset.
pub(crate) fn respawn_player(
    time: Res<Time>,
    mut round_over: ResMut<RoundOver>,
    config: Res<PlayerConfig>,
    spawn_point: Option<Res<PlayerSpawnPoint>>,
    mut players: Query<
        (
            &mut Transform,
            &mut LinearVelocity,
            &mut GravityScale,
            &mut RuntimeState,
            &mut Locomotion,
            &mut DropThrough,
        ),
        With<Player>,
    >,
) {
    if !round_over.active {
        return;
    }
    round_over.timer -= time.delta_secs();
    if round_over.timer > 0.0 {
        return;
    }

    let position = spawn_point.map(|p| p.0).unwrap_or(Vec2::ZERO);
    for (mut transform, mut velocity, mut gravity, mut runtime, mut locomotion, mut drop) in
        &mut players
    {
        transform.translation = position.extend(transform.translation.z);
        velocity.0 = Vec2::ZERO;
        gravity.0 = config.gravity_scale;
        runtime.reset(INITIAL_DIRECTION);
        locomotion.reset();
        drop.clear();
    }
    round_over.active = false;
    info!("player respawned");
}
