//! Error types for screenspace.

use glam::Vec3;
use thiserror::Error;

use crate::scene::NodeId;

/// The main error type for screenspace operations.
#[derive(Error, Debug)]
pub enum ScreenSpaceError {
    /// The media subsystem could not create a sink for a source.
    #[error("failed to create media sink for '{source_id}': {reason}")]
    SinkCreation { source_id: String, reason: String },

    /// The camera-tracking session failed to run.
    #[error("tracking session failed: {0}")]
    SessionFailed(String),

    /// A scale factor that is zero, negative, or not finite.
    #[error("invalid scale factor {0}: must be finite and > 0")]
    InvalidScaleFactor(f32),

    /// A valid factor whose product underflows to zero or overflows.
    #[error("scaling by {factor} gives {scaled}, outside the representable range")]
    ScaleOutOfRange { factor: f32, scaled: Vec3 },

    /// No screen is registered under the given node.
    #[error("screen {0} not found")]
    ScreenNotFound(NodeId),

    /// Options failed validation.
    #[error("invalid options: {0}")]
    InvalidOptions(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// A specialized Result type for screenspace operations.
pub type Result<T> = std::result::Result<T, ScreenSpaceError>;
