//! Player domain: system modules for sensing, input, and dispatch.

pub(crate) mod collisions;
pub(crate) mod input;
pub(crate) mod locomotion;

pub(crate) use collisions::update_sensors;
pub(crate) use input::read_input;
pub(crate) use locomotion::{
    apply_better_jump, drive_locomotion, handle_drop_through_requests, tick_drop_through,
};
