//! Player domain: unit tests for the locomotion core.

use avian2d::prelude::*;
use bevy::prelude::{Entity, Vec2};

use super::components::{RuntimeState, SensorReadings};
use super::events::PlayerEvent;
use super::motor::{DropThrough, Motor};
use super::resources::PlayerConfig;
use super::states::{Contact, ContactLayer, Locomotion, PlayerState, StateCtx};
use super::systems::collisions::{
    blocking_direction, box_contact_normal, ground_hit_counts, penetration_tolerance, OneWayHit,
};
use crate::masks::MaskEffect;

const DT: f32 = 1.0 / 64.0;

/// Everything a dispatch needs, owned flat so the borrows split.
struct Rig {
    config: PlayerConfig,
    mask: Option<MaskEffect>,
    sensors: SensorReadings,
    runtime: RuntimeState,
    velocity: LinearVelocity,
    gravity: GravityScale,
    events: Vec<PlayerEvent>,
    locomotion: Locomotion,
}

impl Rig {
    fn new() -> Self {
        let config = PlayerConfig::default();
        let gravity = GravityScale(config.gravity_scale);
        Self {
            config,
            mask: None,
            sensors: SensorReadings::default(),
            runtime: RuntimeState::new(1),
            velocity: LinearVelocity::default(),
            gravity,
            events: Vec::new(),
            locomotion: Locomotion::default(),
        }
    }

    fn grounded(mut self) -> Self {
        self.sensors.grounded = true;
        self
    }

    fn take_events(&mut self) -> Vec<PlayerEvent> {
        std::mem::take(&mut self.events)
    }
}

fn tick(rig: &mut Rig, dt: f32) {
    let mut ctx = StateCtx {
        config: &rig.config,
        mask: rig.mask.as_ref(),
        sensors: &rig.sensors,
        position: Vec2::ZERO,
        runtime: &mut rig.runtime,
        motor: Motor::new(&mut rig.velocity, &mut rig.gravity, rig.config.gravity_scale),
        events: &mut rig.events,
    };
    rig.locomotion.tick(dt, &mut ctx);
}

fn press_jump(rig: &mut Rig) {
    let mut ctx = StateCtx {
        config: &rig.config,
        mask: rig.mask.as_ref(),
        sensors: &rig.sensors,
        position: Vec2::ZERO,
        runtime: &mut rig.runtime,
        motor: Motor::new(&mut rig.velocity, &mut rig.gravity, rig.config.gravity_scale),
        events: &mut rig.events,
    };
    rig.locomotion.on_jump_pressed(&mut ctx);
}

fn send_contact(rig: &mut Rig, layer: ContactLayer, normal: Vec2) {
    let mut ctx = StateCtx {
        config: &rig.config,
        mask: rig.mask.as_ref(),
        sensors: &rig.sensors,
        position: Vec2::ZERO,
        runtime: &mut rig.runtime,
        motor: Motor::new(&mut rig.velocity, &mut rig.gravity, rig.config.gravity_scale),
        events: &mut rig.events,
    };
    rig.locomotion.on_contact(Contact { layer, normal }, &mut ctx);
}

// -----------------------------------------------------------------------------
// Jump budget
// -----------------------------------------------------------------------------

#[test]
fn test_ground_jump_starts_jumping() {
    let mut rig = Rig::new().grounded();

    press_jump(&mut rig);

    assert_eq!(rig.locomotion.state(), PlayerState::Jumping);
    assert_eq!(rig.velocity.y, 16.5);
    assert_eq!(rig.runtime.jump_count, 1);
    let events = rig.take_events();
    assert!(events.contains(&PlayerEvent::Jumped(1)));
    assert!(events.contains(&PlayerEvent::StateChanged(PlayerState::Jumping)));
}

#[test]
fn test_jump_budget_consumed_exactly() {
    let mut rig = Rig::new().grounded();

    // Ground jump, then double jump mid-air.
    press_jump(&mut rig);
    rig.sensors.grounded = false;
    rig.velocity.y = 3.0;
    press_jump(&mut rig);
    assert_eq!(rig.velocity.y, 16.5);
    assert_eq!(rig.runtime.jump_count, 2);

    // Budget spent: the third press changes nothing and raises nothing.
    rig.velocity.y = 5.0;
    rig.take_events();
    press_jump(&mut rig);
    assert_eq!(rig.velocity.y, 5.0);
    assert_eq!(rig.runtime.jump_count, 2);
    assert!(rig.take_events().is_empty());
    assert_eq!(rig.locomotion.state(), PlayerState::Jumping);
}

#[test]
fn test_double_jump_from_falling_reenters_jumping() {
    let mut rig = Rig::new().grounded();
    press_jump(&mut rig);
    rig.sensors.grounded = false;

    // Arc over the top into Falling.
    rig.velocity.y = -1.0;
    tick(&mut rig, DT);
    assert_eq!(rig.locomotion.state(), PlayerState::Falling);

    press_jump(&mut rig);
    assert_eq!(rig.locomotion.state(), PlayerState::Jumping);
    assert_eq!(rig.velocity.y, 16.5);
    assert_eq!(rig.runtime.jump_count, 2);
}

#[test]
fn test_jump_count_resets_on_landing() {
    let mut rig = Rig::new().grounded();
    press_jump(&mut rig);
    rig.sensors.grounded = false;
    rig.velocity.y = -2.0;
    tick(&mut rig, DT);
    assert_eq!(rig.locomotion.state(), PlayerState::Falling);

    rig.sensors.grounded = true;
    rig.velocity.y = -2.0;
    tick(&mut rig, DT);
    assert_eq!(rig.locomotion.state(), PlayerState::Moving);
    assert_eq!(rig.runtime.jump_count, 0);
}

// -----------------------------------------------------------------------------
// Wall cling
// -----------------------------------------------------------------------------

fn falling_at_wall() -> Rig {
    let mut rig = Rig::new().grounded();
    press_jump(&mut rig);
    rig.sensors.grounded = false;
    rig.velocity.y = -1.0;
    tick(&mut rig, DT);
    assert_eq!(rig.locomotion.state(), PlayerState::Falling);
    rig.sensors.wall_right = true;
    rig.sensors.wall_direction = 1;
    rig
}

#[test]
fn test_wall_cling_zeroes_velocity_and_gravity() {
    let mut rig = falling_at_wall();
    rig.take_events();

    tick(&mut rig, DT);

    assert_eq!(rig.locomotion.state(), PlayerState::WallCling);
    assert_eq!(rig.velocity.0, Vec2::ZERO);
    assert_eq!(rig.gravity.0, 0.0);
    assert!(!rig.runtime.cling_available);
    // Cling event queued from Enter, state change strictly after.
    let events = rig.take_events();
    let cling = events
        .iter()
        .position(|e| matches!(e, PlayerEvent::WallCling(_)));
    let changed = events
        .iter()
        .position(|e| *e == PlayerEvent::StateChanged(PlayerState::WallCling));
    assert!(cling.unwrap() < changed.unwrap());
}

#[test]
fn test_wall_cling_times_out_to_falling() {
    let mut rig = falling_at_wall();
    tick(&mut rig, DT);
    assert_eq!(rig.locomotion.state(), PlayerState::WallCling);

    // Hold to the configured duration; gravity returns on release.
    tick(&mut rig, 0.6);
    assert_eq!(rig.locomotion.state(), PlayerState::Falling);
    assert_eq!(rig.gravity.0, rig.config.gravity_scale);
}

#[test]
fn test_wall_cling_is_one_shot_per_excursion() {
    let mut rig = falling_at_wall();
    tick(&mut rig, DT);
    tick(&mut rig, 0.6);
    assert_eq!(rig.locomotion.state(), PlayerState::Falling);

    // Still pressed against the same wall; the cling is spent.
    tick(&mut rig, DT);
    assert_eq!(rig.locomotion.state(), PlayerState::Falling);

    // Landing re-arms it.
    rig.sensors.grounded = true;
    rig.sensors.wall_right = false;
    rig.sensors.wall_direction = 0;
    rig.velocity.y = 0.0;
    tick(&mut rig, DT);
    assert_eq!(rig.locomotion.state(), PlayerState::Moving);
    assert!(rig.runtime.cling_available);
}

#[test]
fn test_spent_cling_slides_down_wall() {
    let mut rig = falling_at_wall();
    tick(&mut rig, DT);
    tick(&mut rig, 0.6);
    assert_eq!(rig.locomotion.state(), PlayerState::Falling);

    // Push into the wall with the cling spent: descent clamps to the
    // slide speed and no horizontal push is applied.
    rig.velocity.0 = Vec2::new(0.0, -12.0);
    tick(&mut rig, DT);
    assert_eq!(rig.velocity.y, -rig.config.wall_slide_speed);
    assert_eq!(rig.velocity.x, 0.0);
}

#[test]
fn test_cling_leaves_when_wall_vanishes_after_grace() {
    let mut rig = falling_at_wall();
    tick(&mut rig, DT);
    assert_eq!(rig.locomotion.state(), PlayerState::WallCling);

    // Within the grace period a missing wall is tolerated.
    rig.sensors.wall_right = false;
    rig.sensors.wall_direction = 0;
    tick(&mut rig, DT);
    assert_eq!(rig.locomotion.state(), PlayerState::WallCling);

    tick(&mut rig, 0.05);
    assert_eq!(rig.locomotion.state(), PlayerState::Falling);
}

// -----------------------------------------------------------------------------
// Wall jump
// -----------------------------------------------------------------------------

#[test]
fn test_wall_jump_preserves_jump_budget() {
    let mut rig = Rig::new().grounded();
    press_jump(&mut rig);
    rig.sensors.grounded = false;
    press_jump(&mut rig);
    assert_eq!(rig.runtime.jump_count, rig.config.max_jumps);

    // Budget exhausted, but kicking off a wall is always allowed.
    rig.sensors.wall_right = true;
    rig.sensors.wall_direction = 1;
    rig.take_events();
    press_jump(&mut rig);

    assert_eq!(rig.locomotion.state(), PlayerState::WallJump);
    assert_eq!(rig.runtime.jump_count, rig.config.max_jumps);
    assert_eq!(rig.runtime.move_direction, -1);
    assert_eq!(rig.velocity.0, Vec2::new(-8.0, 16.5));
    let events = rig.take_events();
    assert!(events.contains(&PlayerEvent::WallJumped(-1)));
    assert!(events.contains(&PlayerEvent::DirectionChanged(-1)));
    assert!(!events.iter().any(|e| matches!(e, PlayerEvent::Jumped(_))));
}

#[test]
fn test_wall_jump_from_cling_flips_direction() {
    let mut rig = falling_at_wall();
    tick(&mut rig, DT);
    assert_eq!(rig.locomotion.state(), PlayerState::WallCling);

    press_jump(&mut rig);

    assert_eq!(rig.locomotion.state(), PlayerState::WallJump);
    assert_eq!(rig.runtime.move_direction, -1);
    assert_eq!(rig.velocity.0, Vec2::new(-8.0, 16.5));
    // Gravity restored by the cling exit.
    assert_eq!(rig.gravity.0, rig.config.gravity_scale);
}

#[test]
fn test_wall_jump_lock_suppresses_horizontal_push() {
    let mut rig = falling_at_wall();
    rig.config.move_speed = 5.0;
    tick(&mut rig, DT);
    press_jump(&mut rig);
    assert_eq!(rig.locomotion.state(), PlayerState::WallJump);
    assert_eq!(rig.velocity.x, -8.0);

    rig.sensors.wall_right = false;
    rig.sensors.wall_direction = 0;

    // Inside the lock window the launch arc is untouched.
    tick(&mut rig, 0.01);
    assert_eq!(rig.velocity.x, -8.0);

    // Past the lock the usual airborne push resumes.
    tick(&mut rig, 0.2);
    assert_eq!(rig.velocity.x, -5.0);
}

// -----------------------------------------------------------------------------
// Grounding policy
// -----------------------------------------------------------------------------

#[test]
fn test_grounded_monotonic_with_upward_velocity() {
    // Rising faster than the ascent threshold is never grounded,
    // whatever the cast reports.
    assert!(!ground_hit_counts(0.6, Vec2::Y, None));
    assert!(!ground_hit_counts(
        5.0,
        Vec2::Y,
        Some(OneWayHit {
            player_bottom: 5.0,
            platform_top: 5.0,
            platform_half_thickness: 0.15,
        })
    ));
    assert!(ground_hit_counts(0.4, Vec2::Y, None));
    assert!(ground_hit_counts(-3.0, Vec2::Y, None));
}

#[test]
fn test_steep_normals_are_not_ground() {
    assert!(!ground_hit_counts(0.0, Vec2::new(1.0, 0.0), None));
    assert!(!ground_hit_counts(0.0, Vec2::new(0.8, 0.6), None));
    // Within ~45 degrees of horizontal is walkable.
    assert!(ground_hit_counts(0.0, Vec2::new(0.5, 0.86), None));
}

#[test]
fn test_one_way_platform_tolerance() {
    let hit = |player_bottom: f32| OneWayHit {
        player_bottom,
        platform_top: 5.0,
        platform_half_thickness: 0.15,
    };
    // Within tolerance of the top: standing.
    assert!(ground_hit_counts(0.0, Vec2::Y, Some(hit(5.0))));
    assert!(ground_hit_counts(0.0, Vec2::Y, Some(hit(4.9))));
    // Below more than the tolerance: still passing through.
    assert!(!ground_hit_counts(0.0, Vec2::Y, Some(hit(4.8))));
}

#[test]
fn test_penetration_tolerance_scales_with_thickness() {
    // Thin platforms shrink the tolerance to their half thickness.
    assert_eq!(penetration_tolerance(0.05), 0.05);
    // Thick platforms cap at the fixed maximum.
    assert_eq!(penetration_tolerance(1.0), 0.2);
}

#[test]
fn test_blocking_direction_follows_normal_sign() {
    // A wall to the right pushes left and blocks +1.
    assert_eq!(blocking_direction(-1.0), 1);
    assert_eq!(blocking_direction(1.0), -1);
    // Floors and ceilings block nothing horizontally.
    assert_eq!(blocking_direction(0.2), 0);
}

#[test]
fn test_box_contact_normal_picks_shallow_axis() {
    // Player resting on a platform: vertical overlap is the shallow axis.
    let normal = box_contact_normal(
        Vec2::new(0.0, 1.0),
        Vec2::new(0.45, 0.9),
        Vec2::new(0.0, -0.1),
        Vec2::new(2.0, 0.15),
    );
    assert_eq!(normal, Vec2::Y);

    // Player brushing a wall on the right: normal points back left.
    let normal = box_contact_normal(
        Vec2::new(10.0, 0.0),
        Vec2::new(0.45, 0.9),
        Vec2::new(10.9, 0.0),
        Vec2::new(0.5, 3.0),
    );
    assert_eq!(normal, Vec2::new(-1.0, 0.0));
}

// -----------------------------------------------------------------------------
// Collision-begin path
// -----------------------------------------------------------------------------

#[test]
fn test_contact_landing_while_falling() {
    let mut rig = Rig::new().grounded();
    press_jump(&mut rig);
    rig.sensors.grounded = false;
    rig.velocity.y = -1.0;
    tick(&mut rig, DT);
    assert_eq!(rig.locomotion.state(), PlayerState::Falling);

    // The engine reports the touch before the downward ray does.
    send_contact(&mut rig, ContactLayer::OneWayPlatform, Vec2::Y);
    assert_eq!(rig.locomotion.state(), PlayerState::Moving);
    assert_eq!(rig.runtime.jump_count, 0);
}

#[test]
fn test_contact_wall_cling_with_stale_sensors() {
    let mut rig = Rig::new().grounded();
    press_jump(&mut rig);
    rig.sensors.grounded = false;

    // No poll has seen the wall yet; the contact alone must cling.
    send_contact(&mut rig, ContactLayer::Wall, Vec2::new(-1.0, 0.0));
    assert_eq!(rig.locomotion.state(), PlayerState::WallCling);
    assert_eq!(rig.runtime.wall_normal, Vec2::new(-1.0, 0.0));
    assert!(!rig.runtime.cling_available);

    // Snapshot came from the contact normal: a wall on the right.
    press_jump(&mut rig);
    assert_eq!(rig.locomotion.state(), PlayerState::WallJump);
    assert_eq!(rig.runtime.move_direction, -1);
}

#[test]
fn test_contact_upward_through_platform_does_not_land() {
    let mut rig = Rig::new().grounded();
    press_jump(&mut rig);
    rig.sensors.grounded = false;
    assert_eq!(rig.locomotion.state(), PlayerState::Jumping);

    // Rising through a one-way platform must not settle into Moving.
    send_contact(&mut rig, ContactLayer::OneWayPlatform, Vec2::Y);
    assert_eq!(rig.locomotion.state(), PlayerState::Jumping);
}

#[test]
fn test_contact_wall_flip_while_moving() {
    let mut rig = Rig::new().grounded();
    rig.take_events();

    // Running right into a wall: bounce back and report the hit.
    send_contact(&mut rig, ContactLayer::Wall, Vec2::new(-1.0, 0.0));
    assert_eq!(rig.runtime.move_direction, -1);
    let events = rig.take_events();
    assert!(events.contains(&PlayerEvent::DirectionChanged(-1)));
    assert!(events.contains(&PlayerEvent::WallHit(Vec2::new(-1.0, 0.0))));
}

// -----------------------------------------------------------------------------
// Moving / Falling details
// -----------------------------------------------------------------------------

#[test]
fn test_moving_pushes_at_configured_speed() {
    let mut rig = Rig::new().grounded();
    tick(&mut rig, DT);
    assert_eq!(rig.velocity.x, 8.0);
}

#[test]
fn test_landing_raises_impact_event() {
    let mut rig = Rig::new().grounded();
    press_jump(&mut rig);
    rig.sensors.grounded = false;
    rig.velocity.y = -1.0;
    tick(&mut rig, DT);

    rig.sensors.grounded = true;
    rig.velocity.y = -9.0;
    rig.take_events();
    tick(&mut rig, DT);
    assert_eq!(rig.locomotion.state(), PlayerState::Moving);
    assert!(rig.take_events().contains(&PlayerEvent::Landed(9.0)));
}

#[test]
fn test_falling_flips_at_front_dead_end_without_cling() {
    let mut rig = falling_at_wall();
    tick(&mut rig, DT);
    tick(&mut rig, 0.6);
    assert!(!rig.runtime.cling_available);
    assert_eq!(rig.locomotion.state(), PlayerState::Falling);

    rig.sensors.wall_right = false;
    rig.sensors.wall_direction = 0;
    rig.sensors.front_blocked = true;
    rig.take_events();
    tick(&mut rig, DT);

    assert_eq!(rig.runtime.move_direction, -1);
    assert!(rig
        .take_events()
        .contains(&PlayerEvent::DirectionChanged(-1)));
    assert_eq!(rig.locomotion.state(), PlayerState::Falling);
}

#[test]
fn test_moving_enter_flips_when_landing_against_wall() {
    let mut rig = Rig::new().grounded();
    press_jump(&mut rig);
    rig.sensors.grounded = false;
    rig.velocity.y = -1.0;
    tick(&mut rig, DT);

    // Sliding down a right-hand wall with the cling spent, then landing.
    rig.runtime.cling_available = false;
    rig.sensors.wall_right = true;
    rig.sensors.wall_direction = 1;
    rig.sensors.grounded = true;
    rig.velocity.y = 0.0;
    tick(&mut rig, DT);

    assert_eq!(rig.locomotion.state(), PlayerState::Moving);
    assert_eq!(rig.runtime.move_direction, -1);
}

#[test]
fn test_blocked_contact_suppresses_airborne_push() {
    let mut rig = Rig::new().grounded();
    press_jump(&mut rig);
    rig.sensors.grounded = false;

    rig.sensors.blocked_right = true;
    rig.velocity.x = 0.0;
    tick(&mut rig, DT);
    assert_eq!(rig.velocity.x, 0.0);
}

// -----------------------------------------------------------------------------
// Mask modifiers
// -----------------------------------------------------------------------------

#[test]
fn test_strength_mask_scales_jump_and_speed() {
    let mut rig = Rig::new().grounded();
    rig.mask = Some(MaskEffect::Strength {
        jump_multiplier: 1.2,
        speed_multiplier: 1.5,
    });

    tick(&mut rig, DT);
    assert_eq!(rig.velocity.x, 12.0);

    press_jump(&mut rig);
    assert!((rig.velocity.y - 19.8).abs() < 1e-4);
}

#[test]
fn test_grip_mask_extends_cling() {
    let mut rig = falling_at_wall();
    rig.mask = Some(MaskEffect::Grip {
        cling_multiplier: 2.0,
    });
    tick(&mut rig, DT);
    assert_eq!(rig.locomotion.state(), PlayerState::WallCling);

    // Past the base duration but inside the doubled one.
    tick(&mut rig, 0.7);
    assert_eq!(rig.locomotion.state(), PlayerState::WallCling);
    tick(&mut rig, 0.5);
    assert_eq!(rig.locomotion.state(), PlayerState::Falling);
}

// -----------------------------------------------------------------------------
// Drop-through
// -----------------------------------------------------------------------------

#[test]
fn test_drop_through_captures_and_releases() {
    let platform = Entity::from_bits(7);
    let mut drop = DropThrough::default();
    assert!(!drop.is_dropping());

    drop.begin(0.25, [platform]);
    assert!(drop.is_dropping());
    assert!(drop.ignores(platform));

    drop.tick(0.24);
    assert!(drop.ignores(platform));
    drop.tick(0.02);
    assert!(!drop.is_dropping());
    assert!(!drop.ignores(platform));
    assert_eq!(drop.platform_count(), 0);
}

#[test]
fn test_drop_through_supersede_restores_once() {
    let first = Entity::from_bits(7);
    let second = Entity::from_bits(8);
    let mut drop = DropThrough::default();

    drop.begin(0.25, [first]);
    drop.tick(0.1);

    // The superseding call restarts the clock and inherits the captured
    // set; both platforms stay suppressed until one shared expiry.
    drop.begin(0.25, [first, second]);
    drop.tick(0.2);
    assert!(drop.ignores(first));
    assert!(drop.ignores(second));

    drop.tick(0.06);
    assert!(!drop.is_dropping());
    assert_eq!(drop.platform_count(), 0);
}

#[test]
fn test_double_transition_is_noop() {
    let mut rig = Rig::new().grounded();
    press_jump(&mut rig);
    assert_eq!(rig.locomotion.state(), PlayerState::Jumping);
    rig.take_events();

    let mut ctx = StateCtx {
        config: &rig.config,
        mask: None,
        sensors: &rig.sensors,
        position: Vec2::ZERO,
        runtime: &mut rig.runtime,
        motor: Motor::new(&mut rig.velocity, &mut rig.gravity, rig.config.gravity_scale),
        events: &mut rig.events,
    };
    rig.locomotion.change_to(PlayerState::Jumping, &mut ctx);
    assert!(rig.events.is_empty());
}
