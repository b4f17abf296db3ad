//! screenspace: live video screens placed in a tracked camera space.
//!
//! Screens are flat video planes dropped one meter in front of the camera.
//! Touching a screen picks it up and keeps it locked in front of the moving
//! camera until the finger lifts; tapping one gives it the audio; pinching
//! rescales it.
//!
//! # Quick Start
//!
//! ```no_run
//! use screenspace::*;
//!
//! fn main() -> Result<()> {
//!     init_logging();
//!
//!     let mut space = ScreenSpace::new(
//!         Options::default(),
//!         ScriptedPoseSource::at(Mat4::IDENTITY),
//!         HeadlessMedia::new(),
//!         SceneTree::new(),
//!         IntervalScheduler::new(),
//!     )?;
//!     space.start()?;
//!
//!     // One meter ahead of the camera, playing the first catalog source.
//!     let screen = space.add_screen()?;
//!     assert!(screen.is_some());
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! The host supplies four collaborators:
//!
//! - a [`PoseSource`] reporting the camera pose each frame
//! - a [`MediaSink`] that plays content sources
//! - a [`SpatialIndex`] (the render tree) for node placement and hit tests
//! - a [`TickScheduler`] for the repeating tracking refresh
//!
//! [`ScreenSpace`] owns them together with the [`SourceRotation`],
//! [`ScreenRegistry`], [`GestureController`] and [`SessionLifecycle`], and
//! exposes the commands the UI layer issues.

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]

pub mod context;
pub mod gesture;
pub mod headless;
pub mod input;
pub mod session;
pub mod tick;

use std::time::Instant;

// Re-export core types
pub use screenspace_core::{
    error::{Result, ScreenSpaceError},
    media::{ContentSource, MediaSink, SinkHandle},
    options::Options,
    pick::PickResult,
    pose::{PoseSource, RunOptions},
    registry::ScreenRegistry,
    rotation::SourceRotation,
    scene::{Bounds, Hit, HitTestOptions, NodeId, SpatialIndex},
    scene_tree::{SceneTree, View},
    screen::Screen,
    Mat4, Quat, Vec2, Vec3,
};

pub use context::SceneContext;
pub use gesture::{GestureController, TrackingState};
pub use headless::{HeadlessMedia, PlayerState, ScriptedPoseSource};
pub use input::{PinchGesture, TouchEvent, TouchPhase};
pub use session::{SessionLifecycle, SessionState};
pub use tick::{IntervalScheduler, TickScheduler, TickToken};

/// Initializes `env_logger`. Safe to call more than once.
pub fn init_logging() {
    let _ = env_logger::try_init();
}

/// Screens, gestures and session state wired to their collaborators.
pub struct ScreenSpace<P, M, S = SceneTree, T = IntervalScheduler> {
    options: Options,
    poses: P,
    media: M,
    scene: S,
    scheduler: T,
    rotation: SourceRotation,
    registry: ScreenRegistry,
    gestures: GestureController,
    session: SessionLifecycle,
}

impl<P, M, S, T> ScreenSpace<P, M, S, T>
where
    P: PoseSource,
    M: MediaSink,
    S: SpatialIndex,
    T: TickScheduler,
{
    /// Creates a screen space. The source rotation is built from
    /// `options.sources`.
    pub fn new(options: Options, poses: P, media: M, scene: S, scheduler: T) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            rotation: SourceRotation::new(options.sources.iter().cloned()),
            gestures: GestureController::new(&options),
            registry: ScreenRegistry::new(),
            session: SessionLifecycle::new(),
            options,
            poses,
            media,
            scene,
            scheduler,
        })
    }

    fn split(&mut self) -> (&mut GestureController, &mut SessionLifecycle, SceneContext<'_>) {
        let ctx = SceneContext {
            registry: &mut self.registry,
            poses: &mut self.poses,
            scene: &mut self.scene,
            media: &mut self.media,
            scheduler: &mut self.scheduler,
        };
        (&mut self.gestures, &mut self.session, ctx)
    }

    /// Starts (or restarts) the tracking session.
    pub fn start(&mut self) -> Result<()> {
        self.session.start(&mut self.poses)
    }

    /// Pauses the tracking session. Any held screen is released.
    pub fn pause(&mut self) {
        self.gestures
            .cancel_tracking(&mut self.registry, &mut self.scheduler);
        self.session.pause(&mut self.poses);
    }

    /// Adds a screen playing the next source in the rotation, one placement
    /// distance ahead of the camera. The new screen takes the audio.
    ///
    /// Returns `Ok(None)` when there is no camera pose yet or the catalog is
    /// empty. If the media sink cannot be created, nothing is added.
    pub fn add_screen(&mut self) -> Result<Option<NodeId>> {
        let Some(camera) = self.poses.current_camera_pose() else {
            log::debug!("add_screen skipped: no camera pose");
            return Ok(None);
        };
        let Some(source) = self.rotation.next() else {
            log::warn!("add_screen skipped: source catalog is empty");
            return Ok(None);
        };

        let screen = Screen::create(source, &mut self.media, &mut self.scene, &self.options)?;
        self.registry.mute_all_except(None, &mut self.media);
        let id = self
            .registry
            .add_screen(screen, camera, &mut self.scene, &self.options);
        Ok(Some(id))
    }

    /// Removes one screen, releasing it first if it is held.
    pub fn remove_screen(&mut self, id: NodeId) -> Result<()> {
        if !self.registry.contains(id) {
            return Err(ScreenSpaceError::ScreenNotFound(id));
        }
        if self.gestures.tracked_screen() == Some(id) {
            self.gestures
                .cancel_tracking(&mut self.registry, &mut self.scheduler);
        }
        self.registry.remove(id, &mut self.scene, &mut self.media);
        Ok(())
    }

    /// Removes every screen without touching the session.
    pub fn remove_all_screens(&mut self) {
        self.gestures
            .cancel_tracking(&mut self.registry, &mut self.scheduler);
        self.registry.remove_all(&mut self.scene, &mut self.media);
    }

    /// Releases any held screen, removes all screens, and restarts tracking
    /// from scratch.
    pub fn reset(&mut self) -> Result<()> {
        let (gestures, session, mut ctx) = self.split();
        session.reset(gestures, &mut ctx)
    }

    pub fn handle_touch(&mut self, event: &TouchEvent) {
        let (gestures, _, mut ctx) = self.split();
        gestures.handle_touch(event, &mut ctx);
    }

    pub fn handle_tap(&mut self, point: Vec2) -> Option<NodeId> {
        let (gestures, _, mut ctx) = self.split();
        gestures.tap(point, &mut ctx)
    }

    pub fn handle_pinch(&mut self, gesture: &mut PinchGesture) -> Option<NodeId> {
        let (gestures, _, mut ctx) = self.split();
        gestures.pinch(gesture, &mut ctx)
    }

    /// Delivers a tick from the scheduler. Returns true if the held screen moved.
    pub fn tick(&mut self, token: TickToken) -> bool {
        let (gestures, _, mut ctx) = self.split();
        gestures.tick(token, &mut ctx)
    }

    /// Forwards a tracking failure. Any held screen is released.
    pub fn session_failed(&mut self, reason: &str) {
        self.gestures
            .cancel_tracking(&mut self.registry, &mut self.scheduler);
        self.session.session_failed(reason);
    }

    /// Forwards a tracking interruption. Any held screen is released.
    pub fn session_interrupted(&mut self) {
        self.gestures
            .cancel_tracking(&mut self.registry, &mut self.scheduler);
        self.session.session_interrupted();
    }

    pub fn interruption_ended(&mut self) {
        self.session.interruption_ended();
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn registry(&self) -> &ScreenRegistry {
        &self.registry
    }

    pub fn rotation(&self) -> &SourceRotation {
        &self.rotation
    }

    pub fn gestures(&self) -> &GestureController {
        &self.gestures
    }

    pub fn session(&self) -> &SessionLifecycle {
        &self.session
    }

    pub fn poses(&self) -> &P {
        &self.poses
    }

    pub fn poses_mut(&mut self) -> &mut P {
        &mut self.poses
    }

    pub fn media(&self) -> &M {
        &self.media
    }

    pub fn media_mut(&mut self) -> &mut M {
        &mut self.media
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut S {
        &mut self.scene
    }

    pub fn scheduler(&self) -> &T {
        &self.scheduler
    }
}

impl<P, M, S> ScreenSpace<P, M, S, IntervalScheduler>
where
    P: PoseSource,
    M: MediaSink,
    S: SpatialIndex,
{
    /// Polls the bundled scheduler and delivers every due tick.
    ///
    /// Returns the number of ticks that moved the held screen.
    pub fn advance(&mut self, now: Instant) -> usize {
        let due = self.scheduler.poll(now);
        due.into_iter().filter(|token| self.tick(*token)).count()
    }
}
