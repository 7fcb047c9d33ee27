//! Masks domain: equipped-mask state, the numeric modifier hook the
//! locomotion core queries, and pickup handling.


use avian2d::prelude::*;
use bevy::ecs::message::{Message, MessageReader, MessageWriter};
use bevy::prelude::*;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

use crate::content;
use crate::player::Player;

/// A mask definition from `assets/data/masks.ron`.
#[derive(Debug, Clone, Deserialize)]
pub struct MaskDef {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub effect: MaskEffect,
}

/// Numeric effect of a mask: the closed set of modifier variants. Each
/// adjustment function touches its value at most once; a mask without the
/// relevant variant leaves the value untouched.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub enum MaskEffect {
    /// No numeric modifiers (cosmetic or out-of-core abilities).
    #[default]
    None,
    /// Multiplies jump force and move speed.
    Strength {
        jump_multiplier: f32,
        speed_multiplier: f32,
    },
    /// Scales how long a wall cling can hold.
    Grip { cling_multiplier: f32 },
}

impl MaskEffect {
    pub fn modify_jump(&self, force: &mut f32) {
        if let MaskEffect::Strength { jump_multiplier, .. } = self {
            *force *= jump_multiplier;
        }
    }

    pub fn modify_speed(&self, speed: &mut f32) {
        if let MaskEffect::Strength {
            speed_multiplier, ..
        } = self
        {
            *speed *= speed_multiplier;
        }
    }

    pub fn modify_wall_cling(&self, duration: &mut f32) {
        if let MaskEffect::Grip { cling_multiplier } = self {
            *duration *= cling_multiplier;
        }
    }
}

/// All known masks by id.
#[derive(Resource, Debug, Default)]
pub struct MaskRegistry {
    pub masks: HashMap<String, MaskDef>,
}

impl MaskRegistry {
    /// Load from `assets/data/masks.ron`; a missing or malformed file
    /// degrades to an empty registry (every query becomes identity).
    pub fn load_or_default() -> Self {
        let path = Path::new("assets/data/masks.ron");
        let mut registry = MaskRegistry::default();
        match content::load_data_file::<MaskDef>(path) {
            Ok(defs) => {
                for def in defs {
                    registry.masks.insert(def.id.clone(), def);
                }
            }
            Err(e) => warn!("{e}; no masks available"),
        }
        registry
    }
}

/// The currently equipped mask, if any. The locomotion core borrows the
/// effect for the duration of a query and never owns it.
#[derive(Resource, Debug, Default)]
pub struct EquippedMask {
    pub mask_id: Option<String>,
}

impl EquippedMask {
    /// Resolve the equipped effect; absent or unknown ids are identity.
    pub fn effect<'a>(&self, registry: &'a MaskRegistry) -> Option<&'a MaskEffect> {
        let id = self.mask_id.as_deref()?;
        registry.masks.get(id).map(|def| &def.effect)
    }
}

/// Raised when a mask is equipped.
#[derive(Debug)]
pub struct MaskEquipped {
    pub mask_id: String,
}

impl Message for MaskEquipped {}

/// Raised when an equipped mask is replaced.
#[derive(Debug)]
pub struct MaskUnequipped {
    pub mask_id: String,
}

impl Message for MaskUnequipped {}

/// A mask lying in the world, equipped on contact.
#[derive(Component, Debug)]
pub struct MaskPickup {
    pub mask_id: String,
}

pub(crate) fn handle_mask_pickups(
    mut collision_starts: MessageReader<CollisionStart>,
    pickups: Query<&MaskPickup>,
    players: Query<(), With<Player>>,
    registry: Res<MaskRegistry>,
    mut equipped: ResMut<EquippedMask>,
    mut equipped_writer: MessageWriter<MaskEquipped>,
    mut unequipped_writer: MessageWriter<MaskUnequipped>,
    mut commands: Commands,
) {
    for event in collision_starts.read() {
        let pairs = [
            (event.collider1, event.collider2),
            (event.collider2, event.collider1),
        ];
        for (player, other) in pairs {
            if !players.contains(player) {
                continue;
            }
            let Ok(pickup) = pickups.get(other) else {
                continue;
            };
            if !registry.masks.contains_key(&pickup.mask_id) {
                warn!("pickup references unknown mask '{}'", pickup.mask_id);
                continue;
            }
            if let Some(previous) = equipped.mask_id.replace(pickup.mask_id.clone()) {
                unequipped_writer.write(MaskUnequipped { mask_id: previous });
            }
            equipped_writer.write(MaskEquipped {
                mask_id: pickup.mask_id.clone(),
            });
            info!("equipped mask '{}'", pickup.mask_id);
            commands.entity(other).despawn();
        }
    }
}

pub struct MasksPlugin;

impl Plugin for MasksPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(MaskRegistry::load_or_default())
            .init_resource::<EquippedMask>()
            .add_message::<MaskEquipped>()
            .add_message::<MaskUnequipped>()
            .add_systems(Update, handle_mask_pickups);
    }
}
