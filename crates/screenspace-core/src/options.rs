//! Configuration options for screenspace.

use std::path::Path;
use std::time::Duration;

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScreenSpaceError};
use crate::media::ContentSource;

/// Live streams played when no catalog is configured.
pub const DEFAULT_SOURCES: [&str; 7] = [
    "http://bcliveuniv-lh.akamaihd.net/i/news_1@194050/master.m3u8",
    "http://content.jwplatform.com/manifests/vM7nH0Kl.m3u8",
    "http://voa-lh.akamaihd.net/i/voa_mpls_tvmc6@320298/master.m3u8",
    "https://cdn-videos.akamaized.net/btv/zixi/fastly/europe/live/primary.m3u8",
    "http://d383mxeq7zv96c.cloudfront.net/api/ott/getVideoStream/USNATIONAL/master.m3u8?country=us",
    "https://edge.free-speech-tv-live.top.comcast.net/out/u/fstv.m3u8",
    "http://cdnapi.kaltura.com/p/931702/sp/93170200/playManifest/entryId/1_oorxcge2/format/applehttp/protocol/http/uiConfId/28428751/a.m3u8",
];

/// Tracking refresh rate used when none is configured.
pub const DEFAULT_TRACKING_RATE_HZ: f32 = 60.0;

/// Global configuration options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Content sources, in rotation order.
    pub sources: Vec<ContentSource>,

    /// Width and height of the screen plane in world units (meters).
    pub screen_size: Vec2,

    /// Depth of the screen's bounding volume. The plane itself is flat.
    pub screen_depth: f32,

    /// Scale assigned to newly created screens.
    pub base_scale: Vec3,

    /// Distance in front of the camera at which new screens are placed.
    pub placement_distance: f32,

    /// Rate of the tracking refresh while a screen is held, in Hz.
    pub tracking_rate_hz: f32,

    /// Length of the smoothed move when a held screen snaps in front of the
    /// camera, in milliseconds.
    pub reposition_transition_ms: u64,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            sources: DEFAULT_SOURCES.iter().map(|s| ContentSource::from(*s)).collect(),
            screen_size: Vec2::new(1.280 / 2.0, 0.720 / 2.0),
            screen_depth: 0.01,
            base_scale: Vec3::ONE,
            placement_distance: 1.0,
            tracking_rate_hz: DEFAULT_TRACKING_RATE_HZ,
            reposition_transition_ms: 100,
        }
    }
}

impl Options {
    /// Parses options from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    /// Reads options from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Serializes options to pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Checks that every numeric option is usable.
    pub fn validate(&self) -> Result<()> {
        let positive = |v: f32| v.is_finite() && v > 0.0;

        if !(positive(self.screen_size.x) && positive(self.screen_size.y)) {
            return Err(ScreenSpaceError::InvalidOptions(format!(
                "screen_size must be positive, got {}",
                self.screen_size
            )));
        }
        if !(self.screen_depth.is_finite() && self.screen_depth >= 0.0) {
            return Err(ScreenSpaceError::InvalidOptions(format!(
                "screen_depth must be >= 0, got {}",
                self.screen_depth
            )));
        }
        if !self.base_scale.to_array().into_iter().all(positive) {
            return Err(ScreenSpaceError::InvalidOptions(format!(
                "base_scale components must be positive, got {}",
                self.base_scale
            )));
        }
        if !positive(self.placement_distance) {
            return Err(ScreenSpaceError::InvalidOptions(format!(
                "placement_distance must be positive, got {}",
                self.placement_distance
            )));
        }
        if !positive(self.tracking_rate_hz) {
            return Err(ScreenSpaceError::InvalidOptions(format!(
                "tracking_rate_hz must be positive, got {}",
                self.tracking_rate_hz
            )));
        }
        if Duration::try_from_secs_f32(1.0 / self.tracking_rate_hz).is_err() {
            return Err(ScreenSpaceError::InvalidOptions(format!(
                "tracking_rate_hz {} is too low to express as a period",
                self.tracking_rate_hz
            )));
        }
        Ok(())
    }

    /// Period of the tracking refresh.
    ///
    /// Rates that [`validate`](Self::validate) rejects fall back to
    /// [`DEFAULT_TRACKING_RATE_HZ`].
    pub fn tracking_period(&self) -> Duration {
        let period = |rate: f32| Duration::try_from_secs_f32(1.0 / rate).ok();
        period(self.tracking_rate_hz)
            .or_else(|| period(DEFAULT_TRACKING_RATE_HZ))
            .unwrap_or(Duration::from_millis(16))
    }

    /// Duration of the reposition transition.
    pub fn reposition_transition(&self) -> Duration {
        Duration::from_millis(self.reposition_transition_ms)
    }

    /// Local bounding volume of the screen plane.
    pub fn screen_bounds(&self) -> crate::scene::Bounds {
        crate::scene::Bounds::centered(self.screen_size.extend(self.screen_depth))
    }
}
