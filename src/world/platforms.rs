//! World domain: one-way platforms.
//!
//! The physical pass-through lives in collision hooks so the solver never
//! sees a contact the rules forbid; the sensor side applies the same pure
//! policy when deciding grounded.

use avian2d::prelude::*;
use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use crate::player::{penetration_tolerance, DropThrough, Player, ASCENT_SPEED};

/// Marker for one-way platform colliders.
#[derive(Component, Debug)]
pub struct OneWayPlatform;

/// Whether a player-platform contact must be suppressed: while dropping
/// through that platform, while ascending through it, or while the
/// player's lower bound is beyond penetration tolerance below its top.
pub fn pass_through(
    player_bottom: f32,
    velocity_y: f32,
    platform_top: f32,
    platform_half_thickness: f32,
    dropping_through: bool,
) -> bool {
    if dropping_through {
        return true;
    }
    if velocity_y > ASCENT_SPEED {
        return true;
    }
    player_bottom < platform_top - penetration_tolerance(platform_half_thickness)
}

/// Broad-phase filter suppressing player contacts with one-way platforms
/// per [`pass_through`]. Pairs not involving a player and a platform are
/// untouched.
#[derive(SystemParam)]
pub struct OneWayPlatformHooks<'w, 's> {
    platforms: Query<'w, 's, &'static ColliderAabb, With<OneWayPlatform>>,
    players: Query<
        'w,
        's,
        (&'static ColliderAabb, &'static LinearVelocity, &'static DropThrough),
        With<Player>,
    >,
}

impl CollisionHooks for OneWayPlatformHooks<'_, '_> {
    fn filter_pairs(&self, collider1: Entity, collider2: Entity, _commands: &mut Commands) -> bool {
        let (player, platform) = if self.players.contains(collider1)
            && self.platforms.contains(collider2)
        {
            (collider1, collider2)
        } else if self.players.contains(collider2) && self.platforms.contains(collider1) {
            (collider2, collider1)
        } else {
            return true;
        };

        let Ok((player_aabb, velocity, drop)) = self.players.get(player) else {
            return true;
        };
        let Ok(platform_aabb) = self.platforms.get(platform) else {
            return true;
        };

        !pass_through(
            player_aabb.min.y,
            velocity.y,
            platform_aabb.max.y,
            (platform_aabb.max.y - platform_aabb.min.y) / 2.0,
            drop.ignores(platform),
        )
    }
}
