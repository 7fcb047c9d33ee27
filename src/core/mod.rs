//! Core domain: camera and the shared round-over signal.

use bevy::prelude::*;
use bevy::camera::ScalingMode;

/// Vertical world units visible to the camera.
const CAMERA_VIEW_HEIGHT: f32 = 24.0;

/// Shared end-of-round latch. Any hazard that kills the player sets it;
/// every hazard freezes while it is active and the respawn countdown
/// releases it. An explicit resource, so nothing hides in global state.
#[derive(Resource, Debug, Default)]
pub struct RoundOver {
    pub active: bool,
    /// Seconds until respawn once active.
    pub timer: f32,
}

impl RoundOver {
    /// Latch the round as over; later triggers while active are no-ops.
    pub fn trigger(&mut self, respawn_delay: f32) {
        if !self.active {
            self.active = true;
            self.timer = respawn_delay;
        }
    }
}

pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<RoundOver>()
            .add_systems(Startup, setup_camera);
    }
}

fn setup_camera(mut commands: Commands) {
    commands.spawn((
        Camera2d,
        Projection::Orthographic(OrthographicProjection {
            scaling_mode: ScalingMode::FixedVertical {
                viewport_height: CAMERA_VIEW_HEIGHT,
            },
            ..OrthographicProjection::default_2d()
        }),
        Transform::from_xyz(0.0, 8.0, 0.0),
    ));
}
