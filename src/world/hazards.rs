//! World domain: hazards.
//!
//! Rising lava chases the player upward and kills on contact. Hazards
//! freeze on the shared [`RoundOver`] signal, so one death stops every
//! instance at once.

use avian2d::prelude::*;
use bevy::ecs::message::{Message, MessageReader, MessageWriter};
use bevy::prelude::*;

use crate::core::RoundOver;
use crate::player::{Jumped, Player};

/// Delay before the player respawns after dying.
const RESPAWN_DELAY: f32 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LavaStartMode {
    Manual,
    Immediate,
    /// Starts rising the first time the player jumps.
    #[default]
    OnFirstJump,
}

#[derive(Component, Debug)]
pub struct RisingLava {
    /// Units per second.
    pub rise_speed: f32,
    /// Y the lava stops at; 0 means no limit.
    pub max_height: f32,
    pub start_mode: LavaStartMode,
    pub rising: bool,
}

impl RisingLava {
    pub fn new(rise_speed: f32, max_height: f32, start_mode: LavaStartMode) -> Self {
        Self {
            rise_speed,
            max_height,
            start_mode,
            rising: start_mode == LavaStartMode::Immediate,
        }
    }
}

/// Raised once per death, before the respawn countdown starts.
#[derive(Debug)]
pub struct PlayerDied {
    pub position: Vec2,
}

impl Message for PlayerDied {}

pub(crate) fn start_lava_on_first_jump(
    mut jumps: MessageReader<Jumped>,
    mut lavas: Query<&mut RisingLava>,
) {
    if jumps.read().count() == 0 {
        return;
    }
    for mut lava in &mut lavas {
        if lava.start_mode == LavaStartMode::OnFirstJump && !lava.rising {
            lava.rising = true;
            info!("lava started rising");
        }
    }
}

pub(crate) fn rise_lava(
    time: Res<Time>,
    round_over: Res<RoundOver>,
    mut lavas: Query<(&mut Transform, &RisingLava)>,
) {
    // Every instance freezes once any hazard ends the round.
    if round_over.active {
        return;
    }
    for (mut transform, lava) in &mut lavas {
        if !lava.rising {
            continue;
        }
        transform.translation.y += lava.rise_speed * time.delta_secs();
        if lava.max_height > 0.0 && transform.translation.y > lava.max_height {
            transform.translation.y = lava.max_height;
        }
    }
}

pub(crate) fn detect_lava_contact(
    mut collision_starts: MessageReader<CollisionStart>,
    lavas: Query<(), With<RisingLava>>,
    players: Query<&Transform, With<Player>>,
    mut round_over: ResMut<RoundOver>,
    mut died_writer: MessageWriter<PlayerDied>,
) {
    for event in collision_starts.read() {
        let pairs = [
            (event.collider1, event.collider2),
            (event.collider2, event.collider1),
        ];
        for (player, hazard) in pairs {
            let Ok(transform) = players.get(player) else {
                continue;
            };
            if !lavas.contains(hazard) || round_over.active {
                continue;
            }
            round_over.trigger(RESPAWN_DELAY);
            died_writer.write(PlayerDied {
                position: transform.translation.truncate(),
            });
            info!("player touched lava, round over");
        }
    }
}
