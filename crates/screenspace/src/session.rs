//! Tracking session lifecycle.

use screenspace_core::{PoseSource, Result, RunOptions};

use crate::context::SceneContext;
use crate::gesture::GestureController;

/// Where the pose-source session stands.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    NotStarted,
    Running,
    Paused,
    /// The tracking subsystem was interrupted (camera taken by another app).
    Interrupted,
    Failed(String),
}

/// Starts, pauses, and resets the camera-tracking session.
#[derive(Debug, Default)]
pub struct SessionLifecycle {
    state: SessionState,
}

impl SessionLifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == SessionState::Running
    }

    /// Runs the session from scratch: tracking reset, anchors discarded.
    pub fn start(&mut self, poses: &mut dyn PoseSource) -> Result<()> {
        match poses.run(RunOptions::fresh()) {
            Ok(()) => {
                self.state = SessionState::Running;
                log::info!("tracking session started");
                Ok(())
            }
            Err(err) => {
                self.session_failed(&err.to_string());
                Err(err)
            }
        }
    }

    pub fn pause(&mut self, poses: &mut dyn PoseSource) {
        poses.pause();
        self.state = SessionState::Paused;
        log::info!("tracking session paused");
    }

    /// Releases any held screen, removes every screen, and restarts the
    /// session with cleared tracking state.
    pub fn reset(
        &mut self,
        gestures: &mut GestureController,
        ctx: &mut SceneContext<'_>,
    ) -> Result<()> {
        gestures.cancel_tracking(ctx.registry, ctx.scheduler);
        let removed = ctx.registry.remove_all(ctx.scene, ctx.media);
        log::info!("reset: removed {} screens", removed.len());
        self.start(ctx.poses)
    }

    /// Records a failure reported by the tracking subsystem.
    pub fn session_failed(&mut self, reason: &str) {
        log::error!("tracking session failed: {reason}");
        self.state = SessionState::Failed(reason.to_string());
    }

    /// Records an interruption. The caller releases any held screen.
    pub fn session_interrupted(&mut self) {
        log::warn!("tracking session interrupted");
        self.state = SessionState::Interrupted;
    }

    /// Records the end of an interruption.
    pub fn interruption_ended(&mut self) {
        if self.state == SessionState::Interrupted {
            log::info!("tracking session resumed");
            self.state = SessionState::Running;
        }
    }
}
