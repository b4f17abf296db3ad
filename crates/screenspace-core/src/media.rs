//! Media playback port.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Opaque identifier for a playable stream.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentSource(String);

impl ContentSource {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ContentSource {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ContentSource {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ContentSource {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Handle for a sink created by a [`MediaSink`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SinkHandle(u64);

impl SinkHandle {
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Full volume.
pub const AUDIBLE: f32 = 1.0;
/// Silence.
pub const MUTED: f32 = 0.0;

/// The media decode/playback subsystem.
pub trait MediaSink {
    /// Creates a player for `source`. Fails if the source cannot be opened.
    fn create(&mut self, source: &ContentSource) -> Result<SinkHandle>;

    /// Sets the playback volume, in `[0, 1]`.
    fn set_volume(&mut self, handle: SinkHandle, volume: f32);

    fn play(&mut self, handle: SinkHandle);

    fn pause(&mut self, handle: SinkHandle);
}
