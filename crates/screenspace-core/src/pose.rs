//! Camera pose source port.

use glam::{Mat4, Vec3};

use crate::error::Result;

/// Options for (re)starting a tracking session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunOptions {
    /// Discard the current world-tracking state.
    pub reset_tracking: bool,
    /// Discard all previously recognized spatial anchors.
    pub remove_existing_anchors: bool,
}

impl RunOptions {
    /// Start from scratch: reset tracking and drop existing anchors.
    #[must_use]
    pub const fn fresh() -> Self {
        Self {
            reset_tracking: true,
            remove_existing_anchors: true,
        }
    }
}

/// The camera/world-tracking subsystem.
pub trait PoseSource {
    /// Samples the current camera-to-world transform.
    ///
    /// Returns `None` until tracking has produced a frame.
    fn current_camera_pose(&self) -> Option<Mat4>;

    /// Runs (or re-runs) the tracking session.
    fn run(&mut self, options: RunOptions) -> Result<()>;

    /// Pauses the tracking session.
    fn pause(&mut self);
}

/// World-space position of a camera pose.
#[must_use]
pub fn camera_position(pose: Mat4) -> Vec3 {
    pose.w_axis.truncate()
}

/// Pose `distance` units ahead of the camera along its forward (-Z) axis,
/// sharing the camera's orientation.
#[must_use]
pub fn ahead_of_camera(camera: Mat4, distance: f32) -> Mat4 {
    camera * Mat4::from_translation(Vec3::new(0.0, 0.0, -distance))
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;

    #[test]
    fn test_ahead_of_identity_camera() {
        let pose = ahead_of_camera(Mat4::IDENTITY, 1.0);
        assert_eq!(camera_position(pose), Vec3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn test_ahead_follows_camera_orientation() {
        // Turned 90 degrees left: forward becomes -X.
        let camera = Mat4::from_rotation_translation(
            Quat::from_rotation_y(std::f32::consts::FRAC_PI_2),
            Vec3::new(1.0, 2.0, 3.0),
        );
        let pos = camera_position(ahead_of_camera(camera, 2.0));
        assert!((pos - Vec3::new(-1.0, 2.0, 3.0)).length() < 1e-5);
    }

    #[test]
    fn test_fresh_run_options() {
        let options = RunOptions::fresh();
        assert!(options.reset_tracking);
        assert!(options.remove_existing_anchors);
        assert_eq!(RunOptions::default(), RunOptions {
            reset_tracking: false,
            remove_existing_anchors: false,
        });
    }
}
