//! Media control port.
//!
//! The playback controller only talks to a player through [`MediaControl`].
//! Two bindings implement it: MPRIS over the session bus and `mpc` for MPD.
//! One of them is chosen once from settings by [`connect`].

mod mpd;
mod mpris;

pub use mpd::MpdControl;
pub use mpris::MprisControl;

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::config::PlayerSettings;
use crate::error::{Error, Result};

/// Identity of the media a player is currently on.
///
/// `id` is whatever the binding can tell tracks apart by (an MPRIS track id,
/// or artist and title for MPD). `url` is set when the player reports it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaIdentity {
    pub id: String,
    pub url: Option<String>,
}

impl MediaIdentity {
    /// Whether this identity can be the media opened from `uri`.
    ///
    /// Without a reported url there is nothing to contradict it.
    pub fn matches_uri(&self, uri: &str) -> bool {
        self.url.as_deref().is_none_or(|url| url == uri)
    }
}

/// Point-in-time view of what a player is doing.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaSnapshot {
    pub identity: MediaIdentity,
    pub artist: String,
    pub title: String,
    /// Seconds into the track.
    pub position: f64,
}

#[async_trait]
pub trait MediaControl: Send + Sync {
    fn name(&self) -> &str;

    /// Wait the controller should allow after `open` before dependent calls.
    fn settle_delay(&self) -> Option<Duration>;

    /// Fails with [`Error::NoMedia`] when the player has nothing loaded.
    async fn current_identity(&self) -> Result<MediaIdentity>;

    /// Whether the user (or anything else) has paused the player.
    async fn is_paused(&self) -> Result<bool>;

    /// Seconds into the current track; may be fractional.
    async fn current_position(&self) -> Result<f64>;

    async fn snapshot(&self) -> Result<MediaSnapshot>;

    /// Start loading `uri`. Playback may not have started when this returns.
    async fn open(&self, uri: &str) -> Result<()>;

    /// Absolute seek within the media identified by `anchor`.
    async fn seek(&self, anchor: &MediaIdentity, position: u64) -> Result<()>;

    async fn pause(&self) -> Result<()>;
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PlayerKind {
    Mpris,
    Mpd,
}

impl FromStr for PlayerKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mpris" => Ok(Self::Mpris),
            "mpd" => Ok(Self::Mpd),
            _ => Err(Error::PlayerUnsupported(s.to_string())),
        }
    }
}

/// Build the binding named by `settings.backend`.
pub async fn connect(settings: &PlayerSettings) -> Result<Arc<dyn MediaControl>> {
    let port: Arc<dyn MediaControl> = match settings.backend.parse::<PlayerKind>()? {
        PlayerKind::Mpris => Arc::new(MprisControl::connect(settings).await?),
        PlayerKind::Mpd => Arc::new(MpdControl::new(settings)),
    };
    tracing::debug!(binding = port.name(), "media control ready");
    Ok(port)
}

#[cfg(test)]
mod tests;
