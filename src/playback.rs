//! Playback controller: open a file, seek to the start, stop at the end.

pub mod watchdog;

use std::path::Path;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use async_io::{Timer, block_on};

use crate::config::WatchdogSettings;
use crate::control::{MediaControl, MediaIdentity};
use crate::error::{Error, Result};

/// How a playback session ended.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    /// Playing with no end time to enforce.
    Started,
    /// Paused at the end time, or by the user before it.
    Stopped,
    /// The player moved on to other media, or stopped, before the end time.
    Superseded,
}

/// Convert a local path into the `file://` URI players expect.
pub fn file_uri(path: &Path) -> Result<String> {
    let absolute = path
        .canonicalize()
        .map_err(|e| Error::ControlUnavailable(format!("{}: {e}", path.display())))?;
    url::Url::from_file_path(&absolute)
        .map(String::from)
        .map_err(|()| Error::ControlUnavailable(format!("not a file path: {}", absolute.display())))
}

/// Drives one playback session. Not reused across tracks.
pub struct PlaybackController<'a> {
    port: &'a dyn MediaControl,
    watchdog: &'a WatchdogSettings,
}

impl<'a> PlaybackController<'a> {
    pub fn new(port: &'a dyn MediaControl, watchdog: &'a WatchdogSettings) -> Self {
        Self { port, watchdog }
    }

    /// Open `uri`, seek to `start` if given and enforce `end` if given.
    ///
    /// An `end` at or before `start` is ignored: the track plays on.
    pub async fn play(&self, uri: &str, start: Option<u64>, end: Option<u64>) -> Result<SessionOutcome> {
        tracing::info!(%uri, ?start, ?end, binding = self.port.name(), "opening");
        self.port.open(uri).await?;
        self.settle().await;

        let anchor = self.port.current_identity().await?;
        if !anchor.matches_uri(uri) {
            tracing::debug!(active = %anchor.id, "opened media is not active");
            return Ok(SessionOutcome::Superseded);
        }

        if let Some(start) = start.filter(|&s| s > 0) {
            self.seek(&anchor, start).await?;
        }

        match end {
            Some(end) if end > start.unwrap_or(0) => {
                watchdog::watch(self.port, &anchor, end, self.watchdog).await
            }
            Some(end) => {
                tracing::warn!(?start, end, "end time not after start, playing on");
                Ok(SessionOutcome::Started)
            }
            None => Ok(SessionOutcome::Started),
        }
    }

    async fn settle(&self) {
        if let Some(delay) = self.port.settle_delay() {
            tracing::debug!(delay_ms = delay.as_millis() as u64, "waiting for player to settle");
            Timer::after(delay).await;
        }
    }

    /// One retry after a settle delay if the player was not ready to seek.
    async fn seek(&self, anchor: &MediaIdentity, start: u64) -> Result<()> {
        match self.port.seek(anchor, start).await {
            Err(Error::SeekUnsupported) => {
                tracing::warn!(start, "seek rejected, retrying once");
                self.settle().await;
                self.port.seek(anchor, start).await.map_err(|e| match e {
                    Error::SeekUnsupported => {
                        Error::ControlUnavailable(format!("player would not seek to {start}s"))
                    }
                    other => other,
                })
            }
            other => other,
        }
    }
}

/// Run a session for `path` on its own thread.
pub fn spawn(
    port: Arc<dyn MediaControl>,
    watchdog: WatchdogSettings,
    path: &Path,
    start: Option<u64>,
    end: Option<u64>,
) -> Result<JoinHandle<Result<SessionOutcome>>> {
    let uri = file_uri(path)?;
    let handle = thread::spawn(move || {
        block_on(async move {
            PlaybackController::new(port.as_ref(), &watchdog)
                .play(&uri, start, end)
                .await
        })
    });
    Ok(handle)
}
