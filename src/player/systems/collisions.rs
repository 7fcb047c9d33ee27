//! Player domain: environment sensing.
//!
//! The spatial-query systems refresh [`SensorReadings`] once per physics
//! tick; the geometry policies they apply are pure functions shared with
//! the one-way platform hooks in the world domain.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::player::components::{GameLayer, Player, RuntimeState, SensorReadings};
use crate::player::resources::PlayerConfig;
use crate::world::OneWayPlatform;

/// Surfaces with less vertical normal than this are walls, not floor
/// (roughly 45 degrees).
pub const WALKABLE_NORMAL_Y: f32 = 0.7;
/// Upward speed beyond which ground contact is never reported; prevents
/// false positives while rising through a one-way platform.
pub const ASCENT_SPEED: f32 = 0.5;
/// Contact normals with more horizontal component than this block
/// movement toward the obstacle.
pub const BLOCKING_NORMAL_X: f32 = 0.5;
/// Cap for the one-way penetration tolerance on thick platforms.
const MAX_PENETRATION_TOLERANCE: f32 = 0.2;
/// Reach of the contact probe for horizontal blocking.
const CONTACT_PROBE_DISTANCE: f32 = 0.05;
/// Thickness of the chest-height frontal probe box.
const FRONT_PROBE_THICKNESS: f32 = 0.05;

pub fn is_walkable_normal(normal: Vec2) -> bool {
    normal.y > WALKABLE_NORMAL_Y
}

pub fn ascent_blocks_grounding(velocity_y: f32) -> bool {
    velocity_y > ASCENT_SPEED
}

/// How far the player's lower bound may sink below a one-way platform's
/// top while still counting as standing on it. Scales with platform
/// thickness: thin platforms must not report grounded mid-pass, thick
/// ones must not reject a resting contact.
pub fn penetration_tolerance(platform_half_thickness: f32) -> f32 {
    MAX_PENETRATION_TOLERANCE.min(platform_half_thickness)
}

/// Bounds involved in a one-way platform ground hit.
#[derive(Debug, Clone, Copy)]
pub struct OneWayHit {
    pub player_bottom: f32,
    pub platform_top: f32,
    pub platform_half_thickness: f32,
}

/// Full grounded policy for a downward cast hit: ascent guard, walkable
/// normal, and the penetration rule for one-way platforms.
pub fn ground_hit_counts(velocity_y: f32, normal: Vec2, one_way: Option<OneWayHit>) -> bool {
    if ascent_blocks_grounding(velocity_y) {
        return false;
    }
    if !is_walkable_normal(normal) {
        return false;
    }
    match one_way {
        Some(hit) => {
            hit.player_bottom
                >= hit.platform_top - penetration_tolerance(hit.platform_half_thickness)
        }
        None => true,
    }
}

/// Direction a contact normal blocks: a wall to the right pushes left
/// (normal.x < 0) and blocks +1, and vice versa. 0 when the contact is
/// too shallow to block.
pub fn blocking_direction(normal_x: f32) -> i8 {
    if normal_x > BLOCKING_NORMAL_X {
        -1
    } else if normal_x < -BLOCKING_NORMAL_X {
        1
    } else {
        0
    }
}

/// Contact normal between two boxes estimated from centers and half
/// extents: the axis of least overlap, pointing toward the first box.
pub fn box_contact_normal(
    player_center: Vec2,
    player_half: Vec2,
    other_center: Vec2,
    other_half: Vec2,
) -> Vec2 {
    let delta = player_center - other_center;
    let overlap_x = player_half.x + other_half.x - delta.x.abs();
    let overlap_y = player_half.y + other_half.y - delta.y.abs();
    if overlap_x < overlap_y {
        Vec2::new(if delta.x >= 0.0 { 1.0 } else { -1.0 }, 0.0)
    } else {
        Vec2::new(0.0, if delta.y >= 0.0 { 1.0 } else { -1.0 })
    }
}

/// Half extents of the player cuboid, with a conservative fallback when
/// the collider is some other shape.
pub fn player_half_extents(collider: &Collider) -> Vec2 {
    match collider.shape_scaled().as_cuboid() {
        Some(cuboid) => Vec2::new(cuboid.half_extents.x, cuboid.half_extents.y),
        None => Vec2::new(0.45, 0.9),
    }
}

/// Refresh every sensor flag from spatial queries. Runs first in the
/// fixed-tick chain so the state machine sees a consistent snapshot.
pub(crate) fn update_sensors(
    spatial_query: SpatialQuery,
    config: Res<PlayerConfig>,
    one_way_platforms: Query<&ColliderAabb, With<OneWayPlatform>>,
    mut players: Query<
        (
            &Transform,
            &Collider,
            &ColliderAabb,
            &LinearVelocity,
            &RuntimeState,
            &mut SensorReadings,
        ),
        With<Player>,
    >,
) {
    for (transform, collider, aabb, velocity, runtime, mut sensors) in &mut players {
        let half = player_half_extents(collider);
        let center = transform.translation.truncate();
        let feet = center - Vec2::new(0.0, half.y);

        // Grounded + one-way, from a single downward ray each.
        let ground_filter = SpatialQueryFilter::from_mask(PlayerConfig::all_ground_layers());
        sensors.grounded = spatial_query
            .cast_ray(
                feet,
                Dir2::NEG_Y,
                config.ground_check_distance,
                true,
                &ground_filter,
            )
            .map(|hit| {
                let one_way = one_way_platforms.get(hit.entity).ok().map(|platform| OneWayHit {
                    player_bottom: aabb.min.y,
                    platform_top: platform.max.y,
                    platform_half_thickness: (platform.max.y - platform.min.y) / 2.0,
                });
                ground_hit_counts(velocity.y, hit.normal, one_way)
            })
            .unwrap_or(false);

        let one_way_filter = SpatialQueryFilter::from_mask(GameLayer::OneWayPlatform);
        sensors.on_one_way_platform = spatial_query
            .cast_ray(
                feet,
                Dir2::NEG_Y,
                config.ground_check_distance,
                true,
                &one_way_filter,
            )
            .is_some_and(|hit| is_walkable_normal(hit.normal));

        // Wall contact on both sides; +1 wins when both touch.
        let wall_filter = SpatialQueryFilter::from_mask(PlayerConfig::all_wall_layers());
        let reach = half.x + config.wall_check_distance;
        sensors.wall_left = spatial_query
            .cast_ray(center, Dir2::NEG_X, reach, true, &wall_filter)
            .is_some();
        sensors.wall_right = spatial_query
            .cast_ray(center, Dir2::X, reach, true, &wall_filter)
            .is_some();
        sensors.wall_direction = if sensors.wall_right {
            1
        } else if sensors.wall_left {
            -1
        } else {
            0
        };

        // Frontal dead-end probe at chest height in the run direction.
        let front_shape = Collider::rectangle(FRONT_PROBE_THICKNESS, config.front_check_height);
        let front_dir = if runtime.move_direction >= 0 {
            Dir2::X
        } else {
            Dir2::NEG_X
        };
        let front_origin = center
            + Vec2::new(
                runtime.move_direction as f32 * half.x,
                half.y * 0.5,
            );
        let front_filter = SpatialQueryFilter::from_mask([
            GameLayer::Wall,
            GameLayer::Breakable,
            GameLayer::Ground,
        ]);
        sensors.front_obstacle = spatial_query
            .cast_shape(
                &front_shape,
                front_origin,
                0.0,
                front_dir,
                &ShapeCastConfig::from_max_distance(config.front_check_distance),
                &front_filter,
            )
            .map(|hit| hit.entity);
        sensors.front_blocked = sensors.front_obstacle.is_some();

        // Horizontal blocking from near-touching contacts with any solid.
        let solid_filter = SpatialQueryFilter::from_mask([
            GameLayer::Ground,
            GameLayer::Wall,
            GameLayer::Breakable,
        ]);
        let probe = ShapeCastConfig::from_max_distance(CONTACT_PROBE_DISTANCE);
        sensors.blocked_left = spatial_query
            .cast_shape(collider, center, 0.0, Dir2::NEG_X, &probe, &solid_filter)
            .is_some_and(|hit| blocking_direction(hit.normal1.x) == -1);
        sensors.blocked_right = spatial_query
            .cast_shape(collider, center, 0.0, Dir2::X, &probe, &solid_filter)
            .is_some_and(|hit| blocking_direction(hit.normal1.x) == 1);
    }
}
