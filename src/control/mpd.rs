use std::process::Command;
use std::time::Duration;

use async_trait::async_trait;

use super::{MediaControl, MediaIdentity, MediaSnapshot};
use crate::config::PlayerSettings;
use crate::error::{Error, Result};

/// `mpc` prints the current song in this format followed by the status line.
const STATUS_FORMAT: &str = "%artist%\n%title%";

/// Current song as reported by `mpc -f "%artist%\n%title%"`.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct StatusRecord {
    pub artist: String,
    pub title: String,
    pub position: u64,
    pub paused: bool,
}

impl StatusRecord {
    fn identity(&self) -> MediaIdentity {
        MediaIdentity {
            id: format!("{}\n{}", self.artist, self.title),
            url: None,
        }
    }
}

/// MPD binding driving the `mpc` command-line client.
///
/// MPD queues the file synchronously, so no settle delay is needed.
///
/// Every call waits on an `mpc` child process and blocks the calling thread.
/// Sessions run on their own thread under `playback::spawn`, so the blocking
/// only ever stalls that session's watchdog. Do not drive this binding from an
/// executor shared with other tasks.
pub struct MpdControl {
    program: String,
}

impl MpdControl {
    pub fn new(settings: &PlayerSettings) -> Self {
        Self {
            program: settings.mpc_command.clone(),
        }
    }

    fn run(&self, args: &[&str]) -> Result<String> {
        let output = Command::new(&self.program)
            .args(args)
            .output()
            .map_err(|e| Error::ControlUnavailable(format!("{}: {e}", self.program)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::ControlUnavailable(format!(
                "{} {} failed: {}",
                self.program,
                args.join(" "),
                stderr.trim()
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn status(&self) -> Result<StatusRecord> {
        let out = self.run(&["-f", STATUS_FORMAT])?;
        parse_status(&out)
    }
}

/// Parse `M:SS` or `H:MM:SS` into seconds.
fn parse_clock(clock: &str) -> Option<u64> {
    let mut total: u64 = 0;
    let mut parts = 0;
    for part in clock.split(':') {
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        total = total.checked_mul(60)?.checked_add(part.parse().ok()?)?;
        parts += 1;
    }
    (2..=3).contains(&parts).then_some(total)
}

/// Parse the three-line record: artist, title, and a status line such as
/// `[playing] #3/12   1:05/4:10 (26%)`. Anything else is rejected whole.
///
/// A stopped MPD prints only the `volume:` line, which is [`Error::NoMedia`].
pub(crate) fn parse_status(out: &str) -> Result<StatusRecord> {
    let bad = |why: &str| Error::ControlUnavailable(format!("unexpected mpc output ({why}): {out:?}"));

    if out.lines().next().is_none_or(|l| l.starts_with("volume:")) {
        return Err(Error::NoMedia);
    }

    let mut lines = out.lines();
    let (Some(artist), Some(title), Some(status)) = (lines.next(), lines.next(), lines.next())
    else {
        return Err(bad("fewer than three lines"));
    };

    let mut fields = status.split_whitespace();
    let state = fields.next().unwrap_or_default();
    if !(state.starts_with('[') && state.ends_with(']')) {
        return Err(bad("no player state"));
    }
    if !fields.next().is_some_and(|f| f.starts_with('#')) {
        return Err(bad("no queue position"));
    }
    let position = fields
        .next()
        .and_then(|f| f.split_once('/'))
        .and_then(|(elapsed, _)| parse_clock(elapsed))
        .ok_or_else(|| bad("no elapsed time"))?;

    Ok(StatusRecord {
        artist: artist.to_string(),
        title: title.to_string(),
        position,
        paused: state == "[paused]",
    })
}

fn clock(seconds: u64) -> String {
    format!("{}:{:02}:{:02}", seconds / 3600, (seconds % 3600) / 60, seconds % 60)
}

#[async_trait]
impl MediaControl for MpdControl {
    fn name(&self) -> &str {
        "mpd"
    }

    fn settle_delay(&self) -> Option<Duration> {
        None
    }

    async fn current_identity(&self) -> Result<MediaIdentity> {
        Ok(self.status()?.identity())
    }

    async fn is_paused(&self) -> Result<bool> {
        Ok(self.status()?.paused)
    }

    async fn current_position(&self) -> Result<f64> {
        Ok(self.status()?.position as f64)
    }

    async fn snapshot(&self) -> Result<MediaSnapshot> {
        let record = self.status()?;
        Ok(MediaSnapshot {
            identity: record.identity(),
            position: record.position as f64,
            artist: record.artist,
            title: record.title,
        })
    }

    async fn open(&self, uri: &str) -> Result<()> {
        self.run(&["clear"])?;
        self.run(&["add", uri])?;
        self.run(&["play"])?;
        Ok(())
    }

    async fn seek(&self, _anchor: &MediaIdentity, position: u64) -> Result<()> {
        // mpc refuses to seek while nothing is playing.
        self.run(&["seek", &clock(position)])
            .map_err(|_| Error::SeekUnsupported)?;
        Ok(())
    }

    async fn pause(&self) -> Result<()> {
        self.run(&["pause"])?;
        Ok(())
    }
}
