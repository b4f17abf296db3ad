//! Core abstractions for screenspace.
//!
//! This crate provides the data model and collaborator ports used by the
//! gesture layer:
//! - [`SourceRotation`] hands out content sources round-robin
//! - [`Screen`] is a placed video plane with pose, scale, volume and tracking anchor
//! - [`ScreenRegistry`] owns the live screens
//! - [`pick_screen`] resolves a touch point to the screen that owns the hit geometry
//! - [`PoseSource`], [`MediaSink`] and [`SpatialIndex`] are the external collaborators
//! - [`SceneTree`] is an in-memory [`SpatialIndex`]

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Accessors and constructors return values that don't need must_use
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod media;
pub mod options;
pub mod pick;
pub mod pose;
pub mod registry;
pub mod rotation;
pub mod scene;
pub mod scene_tree;
pub mod screen;

#[cfg(test)]
mod test_support;

pub use error::{Result, ScreenSpaceError};
pub use media::{ContentSource, MediaSink, SinkHandle, AUDIBLE, MUTED};
pub use options::{Options, DEFAULT_SOURCES, DEFAULT_TRACKING_RATE_HZ};
pub use pick::{owning_screen, pick_screen, PickResult};
pub use pose::{ahead_of_camera, camera_position, PoseSource, RunOptions};
pub use registry::ScreenRegistry;
pub use rotation::SourceRotation;
pub use scene::{Bounds, Hit, HitTestOptions, NodeId, SpatialIndex};
pub use scene_tree::{SceneTree, View};
pub use screen::Screen;

// Re-export glam types for convenience
pub use glam::{Mat4, Quat, Vec2, Vec3};
