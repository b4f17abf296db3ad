//! Virtual screens.
//!
//! A [`Screen`] is a flat plane in world space playing one media sink. Its
//! identity is the root node of its render-tree hierarchy. The node transform
//! pushed to the render tree is `pose * scale`.

use std::time::Duration;

use glam::{Mat4, Vec3};

use crate::error::{Result, ScreenSpaceError};
use crate::media::{ContentSource, MediaSink, SinkHandle, AUDIBLE, MUTED};
use crate::options::Options;
use crate::pose::camera_position;
use crate::scene::{NodeId, SpatialIndex};

/// A placed, scalable video screen.
#[derive(Debug)]
pub struct Screen {
    id: NodeId,
    surface: NodeId,
    sink: SinkHandle,
    source: ContentSource,
    pose: Mat4,
    scale: Vec3,
    volume: f32,
    /// `inverse(camera) * pose`, cached while the screen is held.
    anchor: Option<Mat4>,
}

impl Screen {
    /// Creates a screen playing `source`.
    ///
    /// The sink is created first; if that fails nothing is allocated in the
    /// render tree. The returned screen is detached from the scene root.
    pub fn create(
        source: ContentSource,
        media: &mut dyn MediaSink,
        scene: &mut dyn SpatialIndex,
        options: &Options,
    ) -> Result<Self> {
        let sink = media.create(&source)?;
        media.set_volume(sink, AUDIBLE);
        media.play(sink);

        let id = scene.create_node(None, None);
        let surface = scene.create_node(Some(id), Some(options.screen_bounds()));

        let screen = Self {
            id,
            surface,
            sink,
            source,
            pose: Mat4::IDENTITY,
            scale: options.base_scale,
            volume: AUDIBLE,
            anchor: None,
        };
        scene.set_transform(id, screen.node_transform(), None);

        log::debug!("created screen {id} for {}", screen.source);
        Ok(screen)
    }

    /// The root render-tree node, which is the screen's identity.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The child node carrying the plane geometry.
    pub fn surface(&self) -> NodeId {
        self.surface
    }

    pub fn sink(&self) -> SinkHandle {
        self.sink
    }

    pub fn source(&self) -> &ContentSource {
        &self.source
    }

    /// Rigid world transform, without scale.
    pub fn pose(&self) -> Mat4 {
        self.pose
    }

    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    /// World-space position of the screen center.
    pub fn position(&self) -> Vec3 {
        camera_position(self.pose)
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn is_audible(&self) -> bool {
        self.volume > MUTED
    }

    /// The cached anchor offset, present only while tracking.
    pub fn anchor_offset(&self) -> Option<Mat4> {
        self.anchor
    }

    pub fn is_tracking(&self) -> bool {
        self.anchor.is_some()
    }

    /// Transform pushed to the render tree: pose followed by scale.
    pub fn node_transform(&self) -> Mat4 {
        self.pose * Mat4::from_scale(self.scale)
    }

    /// Replaces the pose.
    pub fn set_pose(&mut self, pose: Mat4, scene: &mut dyn SpatialIndex) {
        self.pose = pose;
        scene.set_transform(self.id, self.node_transform(), None);
    }

    /// Replaces the pose with a smoothed transition. Scale is kept.
    pub fn set_pose_animated(
        &mut self,
        pose: Mat4,
        transition: Duration,
        scene: &mut dyn SpatialIndex,
    ) {
        self.pose = pose;
        scene.set_transform(self.id, self.node_transform(), Some(transition));
    }

    /// Multiplies every scale component by `factor`.
    ///
    /// A zero, negative or non-finite factor is rejected, as is one whose
    /// product underflows to zero or overflows. The scale is then left as it
    /// was.
    pub fn scale_by(&mut self, factor: f32, scene: &mut dyn SpatialIndex) -> Result<()> {
        if !(factor.is_finite() && factor > 0.0) {
            return Err(ScreenSpaceError::InvalidScaleFactor(factor));
        }
        let scaled = self.scale * factor;
        if !scaled.to_array().into_iter().all(|c| c.is_finite() && c > 0.0) {
            return Err(ScreenSpaceError::ScaleOutOfRange { factor, scaled });
        }
        self.scale = scaled;
        scene.set_transform(self.id, self.node_transform(), None);
        Ok(())
    }

    /// Sets the sink volume, clamped to `[0, 1]`. Playback is untouched.
    pub fn set_volume(&mut self, volume: f32, media: &mut dyn MediaSink) {
        self.volume = volume.clamp(MUTED, AUDIBLE);
        media.set_volume(self.sink, self.volume);
    }

    pub fn mute(&mut self, media: &mut dyn MediaSink) {
        self.set_volume(MUTED, media);
    }

    pub fn unmute(&mut self, media: &mut dyn MediaSink) {
        self.set_volume(AUDIBLE, media);
    }

    /// Caches the screen's offset from the camera so later camera poses can
    /// carry the screen along.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if the screen is already tracking. Release
    /// builds keep the existing anchor.
    pub fn begin_tracking(&mut self, camera_pose: Mat4) {
        debug_assert!(
            self.anchor.is_none(),
            "begin_tracking on screen {} which is already tracking",
            self.id
        );
        if self.anchor.is_some() {
            log::error!("screen {} is already tracking; keeping existing anchor", self.id);
            return;
        }
        self.anchor = Some(camera_pose.inverse() * self.pose);
    }

    /// Re-anchors the screen to a new camera pose: `pose = camera * anchor`.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if [`begin_tracking`](Self::begin_tracking)
    /// has not been called. Release builds leave the pose untouched.
    pub fn update_tracking(&mut self, camera_pose: Mat4, scene: &mut dyn SpatialIndex) {
        debug_assert!(
            self.anchor.is_some(),
            "update_tracking on screen {} without begin_tracking",
            self.id
        );
        let Some(anchor) = self.anchor else {
            log::error!("update_tracking on screen {} without an anchor", self.id);
            return;
        };
        self.set_pose(camera_pose * anchor, scene);
    }

    /// Drops the cached anchor. Safe to call when not tracking.
    pub fn end_tracking(&mut self) {
        self.anchor = None;
    }

    /// Stops playback and detaches the screen from the render tree.
    pub fn destroy(self, scene: &mut dyn SpatialIndex, media: &mut dyn MediaSink) {
        media.pause(self.sink);
        scene.remove_from_parent(self.id);
        log::debug!("destroyed screen {}", self.id);
    }
}
