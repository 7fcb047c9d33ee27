//! World domain: breakable obstacles.
//!
//! Breakables sit on their own layer and behave like walls until broken.
//! A break attack raycasts ahead of the player and is gated on the
//! equipped mask's capability.

use avian2d::prelude::*;
use bevy::ecs::message::{Message, MessageReader, MessageWriter};
use bevy::prelude::*;

use crate::masks::EquippedMask;
use crate::player::{
    player_half_extents, BreakAttackCommand, GameLayer, Player, PlayerConfig,
};

/// A breakable obstacle. Broken ones stop colliding but stay in the world
/// so collaborators can render the debris.
#[derive(Component, Debug)]
pub struct Breakable {
    /// If false, anything breaks it, mask or not.
    pub requires_mask: bool,
    /// Specific mask id required; None accepts any equipped mask.
    pub required_mask_id: Option<String>,
    pub broken: bool,
}

impl Breakable {
    pub fn requiring(mask_id: &str) -> Self {
        Self {
            requires_mask: true,
            required_mask_id: Some(mask_id.to_string()),
            broken: false,
        }
    }

    pub fn any_mask() -> Self {
        Self {
            requires_mask: true,
            required_mask_id: None,
            broken: false,
        }
    }

    /// Capability check: already-broken objects never break again; no
    /// mask requirement breaks freely; a required id must match exactly;
    /// otherwise any equipped mask will do.
    pub fn can_break(&self, mask_id: Option<&str>) -> bool {
        if self.broken {
            return false;
        }
        if !self.requires_mask {
            return true;
        }
        let Some(mask_id) = mask_id else {
            return false;
        };
        match &self.required_mask_id {
            Some(required) => mask_id == required,
            None => true,
        }
    }
}

/// Raised when a breakable is destroyed.
#[derive(Debug)]
pub struct ObjectBroken {
    pub entity: Entity,
}

impl Message for ObjectBroken {}

/// Raised when a break attack hits something it cannot break.
#[derive(Debug)]
pub struct BreakAttemptFailed {
    pub entity: Entity,
}

impl Message for BreakAttemptFailed {}

pub(crate) fn handle_break_attacks(
    mut attacks: MessageReader<BreakAttackCommand>,
    spatial_query: SpatialQuery,
    config: Res<PlayerConfig>,
    equipped: Res<EquippedMask>,
    players: Query<(&Transform, &Collider), With<Player>>,
    mut breakables: Query<(&mut Breakable, &mut CollisionLayers)>,
    mut broken_writer: MessageWriter<ObjectBroken>,
    mut failed_writer: MessageWriter<BreakAttemptFailed>,
) {
    for attack in attacks.read() {
        for (transform, collider) in &players {
            let half = player_half_extents(collider);
            let origin = transform.translation.truncate();
            let direction = if attack.direction >= 0 {
                Dir2::X
            } else {
                Dir2::NEG_X
            };
            let filter = SpatialQueryFilter::from_mask(GameLayer::Breakable);
            let Some(hit) = spatial_query.cast_ray(
                origin,
                direction,
                half.x + config.front_check_distance,
                true,
                &filter,
            ) else {
                continue;
            };
            let Ok((mut breakable, mut layers)) = breakables.get_mut(hit.entity) else {
                continue;
            };
            if breakable.can_break(equipped.mask_id.as_deref()) {
                breakable.broken = true;
                // Stop blocking; the sprite swap is a collaborator concern.
                *layers = CollisionLayers::NONE;
                broken_writer.write(ObjectBroken { entity: hit.entity });
                info!("breakable {:?} broken", hit.entity);
            } else {
                failed_writer.write(BreakAttemptFailed { entity: hit.entity });
                debug!("break attempt failed on {:?}", hit.entity);
            }
        }
    }
}
