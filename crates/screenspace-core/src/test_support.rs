//! Test doubles shared by the unit tests in this crate.

use std::collections::HashMap;

use crate::error::{Result, ScreenSpaceError};
use crate::media::{ContentSource, MediaSink, SinkHandle};

#[derive(Debug, Default)]
struct Player {
    volume: f32,
    playing: bool,
}

/// Media sink that remembers volume and playback state per handle.
#[derive(Debug, Default)]
pub(crate) struct RecordingMedia {
    players: HashMap<SinkHandle, Player>,
    next: u64,
    fail: bool,
}

impl RecordingMedia {
    /// A sink whose `create` always fails.
    pub(crate) fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub(crate) fn volume(&self, handle: SinkHandle) -> Option<f32> {
        self.players.get(&handle).map(|p| p.volume)
    }

    pub(crate) fn is_playing(&self, handle: SinkHandle) -> bool {
        self.players.get(&handle).is_some_and(|p| p.playing)
    }
}

impl MediaSink for RecordingMedia {
    fn create(&mut self, source: &ContentSource) -> Result<SinkHandle> {
        if self.fail {
            return Err(ScreenSpaceError::SinkCreation {
                source_id: source.to_string(),
                reason: "unreachable host".into(),
            });
        }
        let handle = SinkHandle::new(self.next);
        self.next += 1;
        self.players.insert(handle, Player::default());
        Ok(handle)
    }

    fn set_volume(&mut self, handle: SinkHandle, volume: f32) {
        if let Some(p) = self.players.get_mut(&handle) {
            p.volume = volume;
        }
    }

    fn play(&mut self, handle: SinkHandle) {
        if let Some(p) = self.players.get_mut(&handle) {
            p.playing = true;
        }
    }

    fn pause(&mut self, handle: SinkHandle) {
        if let Some(p) = self.players.get_mut(&handle) {
            p.playing = false;
        }
    }
}
