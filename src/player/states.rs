//! Player domain: the locomotion state machine.
//!
//! One authoritative transition body serves the per-tick sensor poll, the
//! queued jump input, and the collision-begin path, so the three triggers
//! cannot drift apart. Pure with respect to [`StateCtx`], which carries
//! plain data and a borrowed motor - no physics world needed to exercise
//! any transition.

use bevy::prelude::*;

use crate::masks::MaskEffect;
use crate::player::components::{RuntimeState, SensorReadings};
use crate::player::events::PlayerEvent;
use crate::player::motor::Motor;
use crate::player::resources::PlayerConfig;

/// Delay before re-checking wall contact after entering WallCling, letting
/// the zeroed body settle against the wall.
const WALL_CHECK_GRACE: f32 = 0.05;
/// Window after a wall jump during which no horizontal push is applied,
/// preserving the launch arc.
const WALL_JUMP_LOCK: f32 = 0.15;
/// Minimum fall speed that still counts as a landing impact.
const LAND_IMPACT_SPEED: f32 = 1.0;
/// Highest vertical speed at which a grounded check may settle into
/// Moving. Guards against "landing" while rising through a platform.
const LANDING_SETTLE_SPEED: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayerState {
    #[default]
    Moving,
    Jumping,
    Falling,
    WallCling,
    WallJump,
}

/// Layer classification of a collision-begin contact, resolved by the
/// dispatch system so the state machine never sees engine types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactLayer {
    Ground,
    OneWayPlatform,
    Wall,
    Breakable,
}

#[derive(Debug, Clone, Copy)]
pub struct Contact {
    pub layer: ContactLayer,
    /// World-space normal pointing from the obstacle toward the player.
    pub normal: Vec2,
}

impl Contact {
    fn is_ground(&self) -> bool {
        matches!(self.layer, ContactLayer::Ground | ContactLayer::OneWayPlatform)
    }

    fn is_wall(&self) -> bool {
        matches!(self.layer, ContactLayer::Wall | ContactLayer::Breakable)
    }
}

/// Everything one fixed-tick dispatch may read or write.
pub struct StateCtx<'a> {
    pub config: &'a PlayerConfig,
    /// Equipped mask effect; None degrades to identity adjustments.
    pub mask: Option<&'a MaskEffect>,
    pub sensors: &'a SensorReadings,
    pub position: Vec2,
    pub runtime: &'a mut RuntimeState,
    pub motor: Motor<'a>,
    pub events: &'a mut Vec<PlayerEvent>,
}

impl StateCtx<'_> {
    /// Baseline jump force adjusted by the equipped mask, once per query.
    pub fn modified_jump_force(&self, base: f32) -> f32 {
        let mut force = base;
        if let Some(mask) = self.mask {
            mask.modify_jump(&mut force);
        }
        force
    }

    pub fn modified_move_speed(&self) -> f32 {
        let mut speed = self.config.move_speed;
        if let Some(mask) = self.mask {
            mask.modify_speed(&mut speed);
        }
        speed
    }

    pub fn modified_cling_duration(&self) -> f32 {
        let mut duration = self.config.wall_cling_duration;
        if let Some(mask) = self.mask {
            mask.modify_wall_cling(&mut duration);
        }
        duration
    }

    fn pushing_into_wall(&self) -> bool {
        self.sensors.wall_direction != 0
            && self.sensors.wall_direction == self.runtime.move_direction
    }

    fn set_direction(&mut self, direction: i8) {
        if self.runtime.move_direction != direction {
            self.runtime.move_direction = direction;
            self.events.push(PlayerEvent::DirectionChanged(direction));
        }
    }
}

/// Current state plus per-state elapsed time. Exactly one state is active;
/// transitions to the already-active state are no-ops.
#[derive(Component, Debug, Default)]
pub struct Locomotion {
    state: PlayerState,
    timer: f32,
    /// Wall side snapshotted when entering WallCling.
    cling_wall_direction: i8,
}

impl Locomotion {
    pub fn state(&self) -> PlayerState {
        self.state
    }

    /// Seconds since the current state was entered, fixed-tick monotonic.
    pub fn timer(&self) -> f32 {
        self.timer
    }

    /// Wholesale reset for respawn; skips Exit/Enter and events.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// The single transition body: Exit, switch, Enter, then queue the
    /// state-changed event after Enter has completed.
    pub fn change_to(&mut self, new_state: PlayerState, ctx: &mut StateCtx) {
        if self.state == new_state {
            return;
        }
        self.exit(ctx);
        self.state = new_state;
        self.timer = 0.0;
        self.enter(ctx);
        ctx.events.push(PlayerEvent::StateChanged(new_state));
    }

    fn enter(&mut self, ctx: &mut StateCtx) {
        match self.state {
            PlayerState::Moving => {
                ctx.runtime.jump_count = 0;
                ctx.runtime.cling_available = true;
                let fall_speed = ctx.motor.velocity().y.abs();
                if fall_speed > LAND_IMPACT_SPEED {
                    ctx.events.push(PlayerEvent::Landed(fall_speed));
                }
                // Landed while sliding along a wall: turn around.
                if ctx.pushing_into_wall() {
                    let flipped = -ctx.runtime.move_direction;
                    ctx.set_direction(flipped);
                }
            }
            PlayerState::WallCling => {
                self.cling_wall_direction = if ctx.sensors.wall_direction != 0 {
                    ctx.sensors.wall_direction
                } else if ctx.runtime.wall_normal.x > 0.0 {
                    // Contact-driven entry before the poll caught up.
                    -1
                } else {
                    1
                };
                ctx.runtime.wall_normal = Vec2::new(-self.cling_wall_direction as f32, 0.0);
                ctx.runtime.cling_available = false;
                ctx.motor.start_wall_cling();
                ctx.events.push(PlayerEvent::WallCling(ctx.position));
            }
            PlayerState::WallJump => {
                ctx.motor
                    .wall_jump(ctx.runtime.move_direction, ctx.config.wall_jump_force());
            }
            PlayerState::Jumping | PlayerState::Falling => {}
        }
    }

    fn exit(&mut self, ctx: &mut StateCtx) {
        if self.state == PlayerState::WallCling {
            ctx.motor.end_wall_cling();
        }
    }

    /// Per-tick update on the physics clock. Guards that all fail leave
    /// the state unchanged for one more tick.
    pub fn tick(&mut self, dt: f32, ctx: &mut StateCtx) {
        self.timer += dt;
        match self.state {
            PlayerState::Moving => {
                let speed = ctx.modified_move_speed();
                ctx.motor.move_horizontal(ctx.runtime.move_direction, speed);
                if !ctx.sensors.grounded {
                    self.change_to(PlayerState::Falling, ctx);
                }
            }
            PlayerState::Jumping => {
                self.airborne_drive(ctx);
                if ctx.motor.velocity().y <= 0.0 {
                    self.change_to(PlayerState::Falling, ctx);
                    return;
                }
                self.try_wall_cling(ctx);
            }
            PlayerState::Falling => {
                // Frontal dead-end with the cling spent: turn around.
                if ctx.sensors.front_blocked && !ctx.runtime.cling_available {
                    let flipped = -ctx.runtime.move_direction;
                    ctx.set_direction(flipped);
                    let normal = Vec2::new(flipped as f32, 0.0);
                    ctx.runtime.wall_normal = normal;
                    ctx.events.push(PlayerEvent::WallHit(normal));
                }
                self.airborne_drive(ctx);
                if ctx.sensors.grounded && ctx.motor.velocity().y <= LANDING_SETTLE_SPEED {
                    self.change_to(PlayerState::Moving, ctx);
                    return;
                }
                self.try_wall_cling(ctx);
            }
            PlayerState::WallCling => {
                if self.timer > WALL_CHECK_GRACE
                    && !ctx.sensors.touching_side(self.cling_wall_direction)
                {
                    self.change_to(PlayerState::Falling, ctx);
                    return;
                }
                if ctx.sensors.grounded {
                    self.change_to(PlayerState::Moving, ctx);
                    return;
                }
                if self.timer >= ctx.modified_cling_duration() {
                    self.change_to(PlayerState::Falling, ctx);
                }
            }
            PlayerState::WallJump => {
                if self.timer < WALL_JUMP_LOCK {
                    return;
                }
                self.airborne_drive(ctx);
                if ctx.motor.velocity().y <= 0.0 {
                    self.change_to(PlayerState::Falling, ctx);
                    return;
                }
                self.try_wall_cling(ctx);
            }
        }
    }

    /// Jump input, dispatched synchronously from the queued command.
    pub fn on_jump_pressed(&mut self, ctx: &mut StateCtx) {
        match self.state {
            PlayerState::Moving => {
                if ctx.runtime.jump_count < ctx.config.max_jumps {
                    let force = ctx.config.jump_force;
                    self.perform_jump(ctx, force);
                    self.change_to(PlayerState::Jumping, ctx);
                }
            }
            PlayerState::Jumping | PlayerState::Falling => {
                // Kicking off a wall never consumes the jump budget.
                if ctx.pushing_into_wall() {
                    let new_direction = -ctx.runtime.move_direction;
                    self.begin_wall_jump(ctx, new_direction);
                    return;
                }
                if ctx.runtime.jump_count < ctx.config.max_jumps {
                    let force = ctx.config.double_jump_force;
                    self.perform_jump(ctx, force);
                    self.change_to(PlayerState::Jumping, ctx);
                }
            }
            PlayerState::WallCling => {
                let new_direction = if self.cling_wall_direction != 0 {
                    -self.cling_wall_direction
                } else {
                    -ctx.runtime.move_direction
                };
                self.begin_wall_jump(ctx, new_direction);
            }
            PlayerState::WallJump => {
                if ctx.runtime.jump_count < ctx.config.max_jumps {
                    let force = ctx.config.double_jump_force;
                    self.perform_jump(ctx, force);
                    self.change_to(PlayerState::Jumping, ctx);
                }
            }
        }
    }

    /// Collision-begin contacts, funneled into the same transitions as the
    /// per-tick poll. The physics engine reports single-frame contacts the
    /// periodic casts can miss.
    pub fn on_contact(&mut self, contact: Contact, ctx: &mut StateCtx) {
        match self.state {
            PlayerState::Moving => {
                if contact.is_wall() && contact.normal.x.abs() > 0.5 {
                    let new_direction = if contact.normal.x > 0.0 { 1 } else { -1 };
                    if new_direction != ctx.runtime.move_direction {
                        ctx.runtime.wall_normal = contact.normal;
                        ctx.set_direction(new_direction);
                        ctx.events.push(PlayerEvent::WallHit(contact.normal));
                    }
                }
            }
            PlayerState::Jumping | PlayerState::Falling | PlayerState::WallJump => {
                if contact.is_ground()
                    && contact.normal.y > 0.5
                    && ctx.motor.velocity().y <= LANDING_SETTLE_SPEED
                {
                    self.change_to(PlayerState::Moving, ctx);
                    return;
                }
                if contact.is_wall() && contact.normal.x.abs() > 0.5 {
                    let wall_direction = if contact.normal.x > 0.0 { -1 } else { 1 };
                    if wall_direction == ctx.runtime.move_direction && ctx.runtime.cling_available
                    {
                        ctx.runtime.wall_normal = contact.normal;
                        ctx.events.push(PlayerEvent::WallHit(contact.normal));
                        self.change_to(PlayerState::WallCling, ctx);
                    }
                }
            }
            PlayerState::WallCling => {}
        }
    }

    /// Shared airborne horizontal policy: push toward the run direction
    /// unless blocked by a contact, or pushing into a wall with the cling
    /// already spent - in which case slide down instead of sticking.
    fn airborne_drive(&mut self, ctx: &mut StateCtx) {
        let pushing = ctx.pushing_into_wall();
        let blocked = ctx.sensors.blocked(ctx.runtime.move_direction);
        if (!pushing || ctx.runtime.cling_available) && !blocked {
            let speed = ctx.modified_move_speed();
            ctx.motor.move_horizontal(ctx.runtime.move_direction, speed);
        } else if pushing && !ctx.runtime.cling_available {
            ctx.motor.apply_wall_slide(ctx.config.wall_slide_speed);
        }
    }

    fn try_wall_cling(&mut self, ctx: &mut StateCtx) {
        if ctx.runtime.cling_available && ctx.pushing_into_wall() {
            self.change_to(PlayerState::WallCling, ctx);
        }
    }

    fn perform_jump(&mut self, ctx: &mut StateCtx, base_force: f32) {
        ctx.runtime.jump_count += 1;
        let force = ctx.modified_jump_force(base_force);
        ctx.motor.jump(force);
        ctx.events.push(PlayerEvent::Jumped(ctx.runtime.jump_count));
    }

    fn begin_wall_jump(&mut self, ctx: &mut StateCtx, new_direction: i8) {
        ctx.set_direction(new_direction);
        ctx.events.push(PlayerEvent::WallJumped(new_direction));
        self.change_to(PlayerState::WallJump, ctx);
    }
}
