//! Stop-at-time watchdog.
//!
//! Each tick re-reads the player and either finishes or schedules exactly one
//! more tick. Ticks run sequentially on the session's task, so two ticks of the
//! same session never overlap.

use std::time::Duration;

use async_io::Timer;

use super::SessionOutcome;
use crate::config::WatchdogSettings;
use crate::control::{MediaControl, MediaIdentity};
use crate::error::{Error, Result};

/// What a single tick decided.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// The end time is reached; pause the player.
    Pause,
    /// Another track is active, or none is; leave the player alone.
    Superseded,
    /// Paused before the end time by someone else; nothing left to enforce.
    AlreadyPaused,
    /// Check again after this delay.
    Recheck(Duration),
}

/// Delay policy for `remaining` seconds before the end time.
///
/// Coarse polling while far away, then geometric homing inside the fine window.
pub fn next_step(remaining: f64, settings: &WatchdogSettings) -> Step {
    if remaining <= 0.0 {
        return Step::Pause;
    }

    let fine_window = Duration::from_millis(settings.fine_window_ms).as_secs_f64();
    if remaining < fine_window {
        let min = Duration::from_millis(settings.min_delay_ms).as_secs_f64();
        Step::Recheck(Duration::from_secs_f64((settings.fine_factor * remaining).max(min)))
    } else {
        Step::Recheck(Duration::from_millis(settings.coarse_interval_ms))
    }
}

/// `None` when the player has nothing loaded: the track ran out or was stopped.
fn loaded<T>(read: Result<T>) -> Result<Option<T>> {
    match read {
        Err(Error::NoMedia) => Ok(None),
        other => other.map(Some),
    }
}

/// One watchdog check against the player.
pub async fn tick(
    port: &dyn MediaControl,
    anchor: &MediaIdentity,
    end: u64,
    settings: &WatchdogSettings,
) -> Result<Step> {
    let Some(current) = loaded(port.current_identity().await)? else {
        return Ok(Step::Superseded);
    };
    if &current != anchor {
        return Ok(Step::Superseded);
    }

    match loaded(port.is_paused().await)? {
        None => return Ok(Step::Superseded),
        Some(true) => return Ok(Step::AlreadyPaused),
        Some(false) => {}
    }

    let Some(position) = loaded(port.current_position().await)? else {
        return Ok(Step::Superseded);
    };
    Ok(next_step(end as f64 - position, settings))
}

/// Run ticks until one of them ends the session.
pub async fn watch(
    port: &dyn MediaControl,
    anchor: &MediaIdentity,
    end: u64,
    settings: &WatchdogSettings,
) -> Result<SessionOutcome> {
    loop {
        match tick(port, anchor, end, settings).await? {
            Step::Superseded => {
                tracing::debug!(track = %anchor.id, "media changed, watchdog stands down");
                return Ok(SessionOutcome::Superseded);
            }
            Step::AlreadyPaused => {
                tracing::info!(track = %anchor.id, end, "player paused before end time");
                return Ok(SessionOutcome::Stopped);
            }
            Step::Pause => {
                port.pause().await?;
                tracing::info!(track = %anchor.id, end, "paused at end time");
                return Ok(SessionOutcome::Stopped);
            }
            Step::Recheck(delay) => {
                tracing::trace!(delay_ms = delay.as_millis() as u64, "watchdog rescheduled");
                Timer::after(delay).await;
            }
        }
    }
}
