//! Player domain: fixed-tick locomotion dispatch and motor upkeep.

use avian2d::prelude::*;
use bevy::ecs::message::{MessageReader, MessageWriter};
use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use crate::masks::{EquippedMask, MaskRegistry};
use crate::player::components::{
    GameLayer, Ground, Player, PlayerInput, RuntimeState, SensorReadings, Wall,
};
use crate::player::events::{
    DirectionChanged, DropThroughCommand, JumpCommand, Jumped, Landed, PlayerEvent, StateChanged,
    WallClingStarted, WallHit, WallJumped,
};
use crate::player::motor::{DropThrough, Motor};
use crate::player::resources::PlayerConfig;
use crate::player::states::{Contact, ContactLayer, Locomotion, StateCtx};
use crate::player::systems::collisions::box_contact_normal;
use crate::world::{Breakable, OneWayPlatform};

/// Downward offset of the overlap probe that captures the platforms a
/// drop-through request must suppress; standing contact alone does not
/// intersect.
const DROP_PROBE_OFFSET: f32 = 0.05;

/// Classifies collision-begin partners into contact layers and derives
/// contact normals from collider bounds.
#[derive(SystemParam)]
pub(crate) struct ContactClassifier<'w, 's> {
    aabbs: Query<'w, 's, &'static ColliderAabb>,
    ground: Query<'w, 's, (), With<Ground>>,
    one_way: Query<'w, 's, (), With<OneWayPlatform>>,
    walls: Query<'w, 's, (), With<Wall>>,
    breakables: Query<'w, 's, (), With<Breakable>>,
}

impl ContactClassifier<'_, '_> {
    fn classify(&self, player: Entity, other: Entity) -> Option<Contact> {
        let layer = if self.one_way.contains(other) {
            ContactLayer::OneWayPlatform
        } else if self.ground.contains(other) {
            ContactLayer::Ground
        } else if self.breakables.contains(other) {
            ContactLayer::Breakable
        } else if self.walls.contains(other) {
            ContactLayer::Wall
        } else {
            return None;
        };
        let player_aabb = self.aabbs.get(player).ok()?;
        let other_aabb = self.aabbs.get(other).ok()?;
        let normal = box_contact_normal(
            (player_aabb.min + player_aabb.max) / 2.0,
            (player_aabb.max - player_aabb.min) / 2.0,
            (other_aabb.min + other_aabb.max) / 2.0,
            (other_aabb.max - other_aabb.min) / 2.0,
        );
        Some(Contact { layer, normal })
    }
}

/// The typed message outlets the internal event queue publishes into.
#[derive(SystemParam)]
pub(crate) struct PlayerEventWriters<'w> {
    direction_changed: MessageWriter<'w, DirectionChanged>,
    jumped: MessageWriter<'w, Jumped>,
    landed: MessageWriter<'w, Landed>,
    wall_hit: MessageWriter<'w, WallHit>,
    wall_cling: MessageWriter<'w, WallClingStarted>,
    wall_jumped: MessageWriter<'w, WallJumped>,
    state_changed: MessageWriter<'w, StateChanged>,
}

impl PlayerEventWriters<'_> {
    fn publish(&mut self, events: impl Iterator<Item = PlayerEvent>) {
        for event in events {
            match event {
                PlayerEvent::DirectionChanged(direction) => {
                    self.direction_changed.write(DirectionChanged { direction });
                }
                PlayerEvent::Jumped(jump_count) => {
                    self.jumped.write(Jumped { jump_count });
                }
                PlayerEvent::Landed(fall_speed) => {
                    self.landed.write(Landed { fall_speed });
                }
                PlayerEvent::WallHit(normal) => {
                    self.wall_hit.write(WallHit { normal });
                }
                PlayerEvent::WallCling(position) => {
                    self.wall_cling.write(WallClingStarted { position });
                }
                PlayerEvent::WallJumped(new_direction) => {
                    self.wall_jumped.write(WallJumped { new_direction });
                }
                PlayerEvent::StateChanged(state) => {
                    self.state_changed.write(StateChanged { state });
                }
            }
        }
    }
}

/// One fixed-tick dispatch: collision-begin contacts first (they catch
/// single-frame contacts the poll misses), then queued jump presses,
/// then the per-tick state update, then publish everything the state
/// machine queued - strictly after each Enter completed.
#[allow(clippy::too_many_arguments)]
pub(crate) fn drive_locomotion(
    time: Res<Time>,
    config: Res<PlayerConfig>,
    registry: Res<MaskRegistry>,
    equipped: Res<EquippedMask>,
    mut collision_starts: MessageReader<CollisionStart>,
    mut jump_commands: MessageReader<JumpCommand>,
    classifier: ContactClassifier,
    mut players: Query<
        (
            Entity,
            &Transform,
            &SensorReadings,
            &mut Locomotion,
            &mut RuntimeState,
            &mut LinearVelocity,
            &mut GravityScale,
        ),
        With<Player>,
    >,
    mut writers: PlayerEventWriters,
) {
    let dt = time.delta_secs();
    let contact_pairs: Vec<(Entity, Entity)> = collision_starts
        .read()
        .map(|event| (event.collider1, event.collider2))
        .collect();
    let jump_presses = jump_commands.read().count();
    let mask = equipped.effect(&registry);
    let mut events: Vec<PlayerEvent> = Vec::new();

    for (entity, transform, sensors, mut locomotion, mut runtime, mut velocity, mut gravity) in
        &mut players
    {
        let mut ctx = StateCtx {
            config: &config,
            mask,
            sensors,
            position: transform.translation.truncate(),
            runtime: &mut runtime,
            motor: Motor::new(&mut velocity, &mut gravity, config.gravity_scale),
            events: &mut events,
        };

        for &(a, b) in &contact_pairs {
            let other = if a == entity {
                b
            } else if b == entity {
                a
            } else {
                continue;
            };
            if let Some(contact) = classifier.classify(entity, other) {
                locomotion.on_contact(contact, &mut ctx);
            }
        }

        for _ in 0..jump_presses {
            locomotion.on_jump_pressed(&mut ctx);
        }

        locomotion.tick(dt, &mut ctx);

        writers.publish(events.drain(..));
    }
}

/// Cross-cutting jump-feel gravity adjustment, applied every physics tick
/// underneath whatever the active state decided.
pub(crate) fn apply_better_jump(
    time: Res<Time>,
    gravity: Res<Gravity>,
    config: Res<PlayerConfig>,
    input: Res<PlayerInput>,
    mut players: Query<(&mut LinearVelocity, &mut GravityScale), With<Player>>,
) {
    let dt = time.delta_secs();
    for (mut velocity, mut gravity_scale) in &mut players {
        let mut motor = Motor::new(&mut velocity, &mut gravity_scale, config.gravity_scale);
        motor.apply_better_jump(
            gravity.0.y,
            config.fall_multiplier,
            config.low_jump_multiplier,
            input.jump_held,
            dt,
        );
    }
}

/// Start (or supersede) a drop through the platforms under the player.
/// A request while not standing on a one-way platform is a silent no-op.
pub(crate) fn handle_drop_through_requests(
    mut requests: MessageReader<DropThroughCommand>,
    spatial_query: SpatialQuery,
    config: Res<PlayerConfig>,
    mut players: Query<(&Transform, &Collider, &SensorReadings, &mut DropThrough), With<Player>>,
) {
    if requests.read().count() == 0 {
        return;
    }
    for (transform, collider, sensors, mut drop) in &mut players {
        if !(sensors.on_one_way_platform && sensors.grounded) {
            continue;
        }
        let probe_position = transform.translation.truncate() - Vec2::new(0.0, DROP_PROBE_OFFSET);
        let overlapping = spatial_query.shape_intersections(
            collider,
            probe_position,
            0.0,
            &SpatialQueryFilter::from_mask(GameLayer::OneWayPlatform),
        );
        drop.begin(config.drop_through_duration, overlapping);
        debug!(
            "drop-through started, suppressing {} platform(s)",
            drop.platform_count()
        );
    }
}

/// Advance drop-through countdowns; expiry restores the captured set.
pub(crate) fn tick_drop_through(time: Res<Time>, mut query: Query<&mut DropThrough>) {
    let dt = time.delta_secs();
    for mut drop in &mut query {
        drop.tick(dt);
    }
}
