//! Player domain: tuning configuration loaded from RON.

use bevy::prelude::*;
use serde::Deserialize;
use std::path::Path;

use crate::content;
use crate::player::components::GameLayer;

/// Immutable player tuning. Loaded once from `assets/data/player.ron`;
/// a missing or malformed file degrades to these compiled defaults.
#[derive(Resource, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub move_speed: f32,

    pub jump_force: f32,
    pub double_jump_force: f32,
    /// Total jumps per airborne excursion, ground jump included.
    pub max_jumps: u8,

    /// Descent cap while sliding down a wall with the cling spent.
    pub wall_slide_speed: f32,
    pub wall_cling_duration: f32,
    pub wall_jump_force_x: f32,
    pub wall_jump_force_y: f32,

    pub gravity_scale: f32,
    /// Extra gravity while falling, for a snappier arc.
    pub fall_multiplier: f32,
    /// Extra gravity while rising without holding jump (variable height).
    pub low_jump_multiplier: f32,

    /// Downward ray length for the grounded check.
    pub ground_check_distance: f32,
    /// Horizontal ray length past the collider edge for wall contact.
    pub wall_check_distance: f32,
    /// Reach of the chest-height box cast for frontal dead-ends.
    pub front_check_distance: f32,
    pub front_check_height: f32,

    pub drop_through_duration: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            move_speed: 8.0,
            jump_force: 16.5,
            double_jump_force: 16.5,
            max_jumps: 2,
            wall_slide_speed: 3.0,
            wall_cling_duration: 0.5,
            wall_jump_force_x: 8.0,
            wall_jump_force_y: 16.5,
            gravity_scale: 3.0,
            fall_multiplier: 2.5,
            low_jump_multiplier: 2.0,
            ground_check_distance: 0.2,
            wall_check_distance: 0.5,
            front_check_distance: 0.3,
            front_check_height: 0.9,
            drop_through_duration: 0.25,
        }
    }
}

impl PlayerConfig {
    /// Load from `assets/data/player.ron`, falling back to defaults on any
    /// load failure. Always returns a sanitized config.
    pub fn load_or_default() -> Self {
        let path = Path::new("assets/data/player.ron");
        match content::load_single_file::<PlayerConfig>(path) {
            Ok(config) => config.sanitized(),
            Err(e) => {
                warn!("{e}; using default player tuning");
                PlayerConfig::default()
            }
        }
    }

    /// Clamp out-of-range values, warning about each correction.
    pub fn sanitized(mut self) -> Self {
        if self.max_jumps < 1 {
            warn!("player config: max_jumps must be at least 1, clamping");
            self.max_jumps = 1;
        }
        if self.ground_check_distance <= 0.0 {
            warn!("player config: ground_check_distance must be positive, using default");
            self.ground_check_distance = Self::default().ground_check_distance;
        }
        if self.wall_check_distance <= 0.0 {
            warn!("player config: wall_check_distance must be positive, using default");
            self.wall_check_distance = Self::default().wall_check_distance;
        }
        if self.drop_through_duration <= 0.0 {
            warn!("player config: drop_through_duration must be positive, using default");
            self.drop_through_duration = Self::default().drop_through_duration;
        }
        self
    }

    pub fn wall_jump_force(&self) -> Vec2 {
        Vec2::new(self.wall_jump_force_x, self.wall_jump_force_y)
    }

    /// Everything the player can stand on. Computed, never stored.
    pub fn all_ground_layers() -> [GameLayer; 2] {
        [GameLayer::Ground, GameLayer::OneWayPlatform]
    }

    /// Everything the player bounces off and clings to. Computed, never stored.
    pub fn all_wall_layers() -> [GameLayer; 2] {
        [GameLayer::Wall, GameLayer::Breakable]
    }
}
