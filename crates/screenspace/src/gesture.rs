//! Gesture handling and the held-screen tracking loop.
//!
//! Touching a screen with one finger "picks it up": the screen snaps to the
//! touch distance straight ahead of the camera and stays locked there while
//! the camera moves, refreshed by a repeating tick until the finger lifts.
//! Taps select which screen plays sound; pinches rescale.

use std::time::Duration;

use glam::Vec2;
use screenspace_core::pose::{ahead_of_camera, camera_position};
use screenspace_core::{pick_screen, NodeId, Options, ScreenRegistry};

use crate::context::SceneContext;
use crate::input::{PinchGesture, TouchEvent, TouchPhase};
use crate::tick::{TickScheduler, TickToken};

/// Whether a screen is currently held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackingState {
    #[default]
    Idle,
    Tracking { screen: NodeId, token: TickToken },
}

/// Drives the touch state machine, taps and pinches.
#[derive(Debug)]
pub struct GestureController {
    state: TrackingState,
    tick_period: Duration,
    reposition_transition: Duration,
}

impl Default for GestureController {
    fn default() -> Self {
        Self::new(&Options::default())
    }
}

impl GestureController {
    pub fn new(options: &Options) -> Self {
        Self {
            state: TrackingState::Idle,
            tick_period: options.tracking_period(),
            reposition_transition: options.reposition_transition(),
        }
    }

    pub fn state(&self) -> TrackingState {
        self.state
    }

    /// The screen being held, if any.
    pub fn tracked_screen(&self) -> Option<NodeId> {
        match self.state {
            TrackingState::Idle => None,
            TrackingState::Tracking { screen, .. } => Some(screen),
        }
    }

    pub fn is_tracking(&self) -> bool {
        matches!(self.state, TrackingState::Tracking { .. })
    }

    /// Dispatches a raw touch event.
    pub fn handle_touch(&mut self, event: &TouchEvent, ctx: &mut SceneContext<'_>) {
        match event.phase {
            TouchPhase::Began => {
                if let Some(point) = event.single_touch() {
                    self.touch_began(point, ctx);
                }
            }
            TouchPhase::Moved => {
                self.refresh(ctx);
            }
            TouchPhase::Ended | TouchPhase::Cancelled => self.touch_ended(ctx),
        }
    }

    /// Picks up the screen under `point`. Returns the held screen.
    ///
    /// Ignored while a screen is already held, before the camera has a pose,
    /// or when nothing is hit.
    pub fn touch_began(&mut self, point: Vec2, ctx: &mut SceneContext<'_>) -> Option<NodeId> {
        if self.is_tracking() {
            log::debug!("touch-down ignored: already tracking");
            return None;
        }
        let camera = ctx.poses.current_camera_pose()?;
        let pick = pick_screen(point, &*ctx.scene, &*ctx.registry)?;
        let screen = ctx.registry.get_mut(pick.screen)?;

        let distance = camera_position(camera).distance(screen.position());
        screen.set_pose_animated(
            ahead_of_camera(camera, distance),
            self.reposition_transition,
            ctx.scene,
        );
        screen.begin_tracking(camera);

        let token = ctx.scheduler.schedule_repeating(self.tick_period);
        self.state = TrackingState::Tracking {
            screen: pick.screen,
            token,
        };
        log::debug!("holding screen {} at {distance:.3}", pick.screen);
        Some(pick.screen)
    }

    /// Releases the held screen, if any.
    pub fn touch_ended(&mut self, ctx: &mut SceneContext<'_>) {
        self.cancel_tracking(ctx.registry, ctx.scheduler);
    }

    /// Handles one repeating tick. Returns true if the held screen moved.
    ///
    /// Ticks carrying a token other than the active one are dropped, so a
    /// tick that races its own cancellation does nothing.
    pub fn tick(&mut self, token: TickToken, ctx: &mut SceneContext<'_>) -> bool {
        match self.state {
            TrackingState::Tracking { token: active, .. } if active == token => self.refresh(ctx),
            _ => {
                log::debug!("dropping stale tick {}", token.raw());
                false
            }
        }
    }

    /// Re-anchors the held screen to the current camera pose.
    fn refresh(&mut self, ctx: &mut SceneContext<'_>) -> bool {
        let TrackingState::Tracking { screen: id, .. } = self.state else {
            return false;
        };
        let Some(camera) = ctx.poses.current_camera_pose() else {
            return false;
        };
        let Some(screen) = ctx.registry.get_mut(id) else {
            log::warn!("held screen {id} vanished; releasing");
            self.cancel_tracking(ctx.registry, ctx.scheduler);
            return false;
        };
        screen.update_tracking(camera, ctx.scene);
        true
    }

    /// Stops tracking: clears the anchor and cancels the tick. Idempotent.
    pub fn cancel_tracking(
        &mut self,
        registry: &mut ScreenRegistry,
        scheduler: &mut dyn TickScheduler,
    ) {
        let TrackingState::Tracking { screen, token } = std::mem::take(&mut self.state) else {
            return;
        };
        scheduler.cancel(token);
        if let Some(screen) = registry.get_mut(screen) {
            screen.end_tracking();
        }
        log::debug!("released screen {screen}");
    }

    /// Gives the tapped screen the audio. Returns the tapped screen.
    pub fn tap(&mut self, point: Vec2, ctx: &mut SceneContext<'_>) -> Option<NodeId> {
        let pick = pick_screen(point, &*ctx.scene, &*ctx.registry)?;
        ctx.registry.mute_all_except(Some(pick.screen), ctx.media);
        log::debug!("screen {} selected for audio", pick.screen);
        Some(pick.screen)
    }

    /// Applies the pinch's accumulated scale to the screen under its
    /// midpoint, then resets the accumulator to `1.0`.
    ///
    /// Returns the scaled screen. Pinches without exactly two touches are
    /// ignored and leave the accumulator alone.
    pub fn pinch(
        &mut self,
        gesture: &mut PinchGesture,
        ctx: &mut SceneContext<'_>,
    ) -> Option<NodeId> {
        let midpoint = gesture.midpoint()?;
        let pick = pick_screen(midpoint, &*ctx.scene, &*ctx.registry)?;
        let screen = ctx.registry.get_mut(pick.screen)?;

        let factor = gesture.scale;
        gesture.scale = 1.0;
        match screen.scale_by(factor, ctx.scene) {
            Ok(()) => Some(pick.screen),
            Err(err) => {
                log::warn!("pinch on screen {} ignored: {err}", pick.screen);
                None
            }
        }
    }
}
