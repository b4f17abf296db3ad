//! Headless collaborators.
//!
//! Stand-ins for the camera-tracking and media subsystems, for running the
//! whole stack without a device: integration tests, demos, and replaying
//! recorded camera paths.

use std::collections::{HashMap, HashSet};

use glam::Mat4;
use screenspace_core::{
    ContentSource, MediaSink, PoseSource, Result, RunOptions, ScreenSpaceError, SinkHandle,
};

/// A [`PoseSource`] whose camera pose is set by hand.
#[derive(Debug, Default)]
pub struct ScriptedPoseSource {
    pose: Option<Mat4>,
    runs: Vec<RunOptions>,
    paused: bool,
    fail_runs: Option<String>,
}

impl ScriptedPoseSource {
    /// A source with no pose yet, as before tracking initializes.
    pub fn new() -> Self {
        Self::default()
    }

    /// A source already reporting `pose`.
    pub fn at(pose: Mat4) -> Self {
        Self {
            pose: Some(pose),
            ..Self::default()
        }
    }

    pub fn set_pose(&mut self, pose: Mat4) {
        self.pose = Some(pose);
    }

    /// Simulates lost tracking.
    pub fn clear_pose(&mut self) {
        self.pose = None;
    }

    pub fn current(&self) -> Option<Mat4> {
        self.pose
    }

    /// Makes every later `run` fail with `reason`.
    pub fn fail_runs(&mut self, reason: impl Into<String>) {
        self.fail_runs = Some(reason.into());
    }

    /// Options passed to each successful `run`, oldest first.
    pub fn runs(&self) -> &[RunOptions] {
        &self.runs
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }
}

impl PoseSource for ScriptedPoseSource {
    fn current_camera_pose(&self) -> Option<Mat4> {
        self.pose
    }

    fn run(&mut self, options: RunOptions) -> Result<()> {
        if let Some(reason) = &self.fail_runs {
            return Err(ScreenSpaceError::SessionFailed(reason.clone()));
        }
        self.runs.push(options);
        self.paused = false;
        Ok(())
    }

    fn pause(&mut self) {
        self.paused = true;
    }
}

/// State of one headless player.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerState {
    pub source: ContentSource,
    pub volume: f32,
    pub playing: bool,
}

/// A [`MediaSink`] that tracks player state without decoding anything.
#[derive(Debug, Default)]
pub struct HeadlessMedia {
    players: HashMap<SinkHandle, PlayerState>,
    next_handle: u64,
    unreachable: HashSet<ContentSource>,
}

impl HeadlessMedia {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `create` fail for `source`.
    pub fn mark_unreachable(&mut self, source: impl Into<ContentSource>) {
        self.unreachable.insert(source.into());
    }

    pub fn player(&self, handle: SinkHandle) -> Option<&PlayerState> {
        self.players.get(&handle)
    }

    /// Number of players ever created.
    pub fn num_players(&self) -> usize {
        self.players.len()
    }

    /// Sources of every playing player that has sound, sorted.
    pub fn audible_sources(&self) -> Vec<ContentSource> {
        let mut sources: Vec<ContentSource> = self
            .players
            .values()
            .filter(|p| p.playing && p.volume > 0.0)
            .map(|p| p.source.clone())
            .collect();
        sources.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        sources
    }
}

impl MediaSink for HeadlessMedia {
    fn create(&mut self, source: &ContentSource) -> Result<SinkHandle> {
        if self.unreachable.contains(source) {
            return Err(ScreenSpaceError::SinkCreation {
                source_id: source.to_string(),
                reason: "source unreachable".into(),
            });
        }
        let handle = SinkHandle::new(self.next_handle);
        self.next_handle += 1;
        self.players.insert(
            handle,
            PlayerState {
                source: source.clone(),
                volume: 1.0,
                playing: false,
            },
        );
        Ok(handle)
    }

    fn set_volume(&mut self, handle: SinkHandle, volume: f32) {
        if let Some(player) = self.players.get_mut(&handle) {
            player.volume = volume.clamp(0.0, 1.0);
        }
    }

    fn play(&mut self, handle: SinkHandle) {
        if let Some(player) = self.players.get_mut(&handle) {
            player.playing = true;
        }
    }

    fn pause(&mut self, handle: SinkHandle) {
        if let Some(player) = self.players.get_mut(&handle) {
            player.playing = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_pose_source() {
        let mut poses = ScriptedPoseSource::new();
        assert!(poses.current_camera_pose().is_none());
        poses.set_pose(Mat4::IDENTITY);
        assert_eq!(poses.current_camera_pose(), Some(Mat4::IDENTITY));

        poses.run(RunOptions::fresh()).unwrap();
        poses.pause();
        assert!(poses.is_paused());
        assert_eq!(poses.runs(), &[RunOptions::fresh()]);

        poses.fail_runs("camera denied");
        assert!(poses.run(RunOptions::fresh()).is_err());
        assert_eq!(poses.runs().len(), 1);
    }

    #[test]
    fn test_headless_media_unreachable_source() {
        let mut media = HeadlessMedia::new();
        media.mark_unreachable("bad");
        assert!(media.create(&ContentSource::from("bad")).is_err());
        assert_eq!(media.num_players(), 0);

        let handle = media.create(&ContentSource::from("good")).unwrap();
        media.play(handle);
        assert_eq!(media.audible_sources(), vec![ContentSource::from("good")]);
        media.set_volume(handle, 0.0);
        assert!(media.audible_sources().is_empty());
    }
}
