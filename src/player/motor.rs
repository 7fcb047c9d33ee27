//! Player domain: the motor translating state-machine intents into body
//! velocity, and the timer-based drop-through state.

use avian2d::prelude::*;
use bevy::prelude::*;

/// Borrowed view over the player's physical body for one dispatch. Jumps
/// are direct velocity sets, not impulses, so peak heights are
/// deterministic regardless of the velocity at press time.
pub struct Motor<'a> {
    velocity: &'a mut LinearVelocity,
    gravity_scale: &'a mut GravityScale,
    base_gravity_scale: f32,
}

impl<'a> Motor<'a> {
    pub fn new(
        velocity: &'a mut LinearVelocity,
        gravity_scale: &'a mut GravityScale,
        base_gravity_scale: f32,
    ) -> Self {
        Self {
            velocity,
            gravity_scale,
            base_gravity_scale,
        }
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity.0
    }

    pub fn gravity_scale(&self) -> f32 {
        self.gravity_scale.0
    }

    /// Set horizontal velocity, preserving the vertical component.
    pub fn move_horizontal(&mut self, direction: i8, speed: f32) {
        self.velocity.x = direction as f32 * speed;
    }

    pub fn jump(&mut self, force: f32) {
        self.velocity.y = force;
    }

    /// Launch away from a wall with the configured force vector.
    pub fn wall_jump(&mut self, direction: i8, force: Vec2) {
        self.velocity.0 = Vec2::new(direction as f32 * force.x, force.y);
    }

    /// Clamp descent while sliding down a wall.
    pub fn apply_wall_slide(&mut self, slide_speed: f32) {
        if self.velocity.y < -slide_speed {
            self.velocity.y = -slide_speed;
        }
    }

    /// Cling is a true zero-gravity hold, not a slow fall.
    pub fn start_wall_cling(&mut self) {
        self.velocity.0 = Vec2::ZERO;
        self.gravity_scale.0 = 0.0;
    }

    pub fn end_wall_cling(&mut self) {
        self.gravity_scale.0 = self.base_gravity_scale;
    }

    /// Extra gravity while falling, and while rising without holding jump.
    /// Applied every physics tick underneath whatever the active state
    /// decided. `gravity_y` is the (negative) world gravity.
    pub fn apply_better_jump(
        &mut self,
        gravity_y: f32,
        fall_multiplier: f32,
        low_jump_multiplier: f32,
        holding_jump: bool,
        dt: f32,
    ) {
        if self.velocity.y < 0.0 {
            self.velocity.y += gravity_y * (fall_multiplier - 1.0) * dt;
        } else if self.velocity.y > 0.0 && !holding_jump {
            self.velocity.y += gravity_y * (low_jump_multiplier - 1.0) * dt;
        }
    }
}

/// Drop-through bookkeeping: while the countdown runs, the one-way
/// platform hooks suppress contacts with every captured platform. A new
/// request while dropping supersedes the old one: the countdown restarts
/// and newly overlapping platforms join the captured set, so the single
/// teardown restores everything the superseded call had suppressed.
#[derive(Component, Debug, Default)]
pub struct DropThrough {
    timer: f32,
    platforms: Vec<Entity>,
}

impl DropThrough {
    pub fn is_dropping(&self) -> bool {
        self.timer > 0.0
    }

    /// Whether contacts with `platform` are currently suppressed.
    pub fn ignores(&self, platform: Entity) -> bool {
        self.is_dropping() && self.platforms.contains(&platform)
    }

    pub fn platform_count(&self) -> usize {
        self.platforms.len()
    }

    /// Begin a drop, or supersede the one in progress.
    pub fn begin(&mut self, duration: f32, overlapping: impl IntoIterator<Item = Entity>) {
        self.timer = duration;
        for platform in overlapping {
            if !self.platforms.contains(&platform) {
                self.platforms.push(platform);
            }
        }
    }

    /// Advance the countdown; releases the captured set exactly once when
    /// it expires.
    pub fn tick(&mut self, dt: f32) {
        if self.timer <= 0.0 {
            return;
        }
        self.timer -= dt;
        if self.timer <= 0.0 {
            self.timer = 0.0;
            self.platforms.clear();
        }
    }

    pub fn clear(&mut self) {
        self.timer = 0.0;
        self.platforms.clear();
    }
}
