use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use zbus::Connection;
use zbus::fdo::DBusProxy;
use zbus::proxy::CacheProperties;
use zvariant::{ObjectPath, OwnedValue, Value};

use super::{MediaControl, MediaIdentity, MediaSnapshot};
use crate::config::PlayerSettings;
use crate::error::{Error, Result};

const MICROS_PER_SECOND: f64 = 1_000_000.0;

#[zbus::proxy(
    interface = "org.mpris.MediaPlayer2.Player",
    default_path = "/org/mpris/MediaPlayer2"
)]
trait Player {
    fn open_uri(&self, uri: &str) -> zbus::Result<()>;

    fn set_position(&self, track_id: &ObjectPath<'_>, position: i64) -> zbus::Result<()>;

    fn pause(&self) -> zbus::Result<()>;

    #[zbus(property)]
    fn metadata(&self) -> zbus::Result<HashMap<String, OwnedValue>>;

    /// Microseconds.
    #[zbus(property(emits_changed_signal = "false"))]
    fn position(&self) -> zbus::Result<i64>;

    #[zbus(property)]
    fn can_seek(&self) -> zbus::Result<bool>;

    /// `Playing`, `Paused` or `Stopped`.
    #[zbus(property)]
    fn playback_status(&self) -> zbus::Result<String>;
}

/// MPRIS binding over the session bus.
///
/// `open` picks a player and pins its bus name; every later call goes to that
/// same player even if another one registers under an earlier-sorting name.
/// Before any `open` (as in `capture`) the player is selected per call.
pub struct MprisControl {
    connection: Connection,
    bus_prefix: String,
    exclude: Vec<String>,
    settle: Duration,
    pinned: Mutex<Option<String>>,
}

impl MprisControl {
    pub async fn connect(settings: &PlayerSettings) -> Result<Self> {
        let connection = Connection::session().await?;
        Ok(Self {
            connection,
            bus_prefix: settings.bus_prefix.clone(),
            exclude: settings.exclude.clone(),
            settle: Duration::from_millis(settings.settle_ms),
            pinned: Mutex::new(None),
        })
    }

    fn pinned(&self) -> Option<String> {
        self.pinned.lock().ok().and_then(|p| p.clone())
    }

    async fn bus_name(&self, pinned: Option<&str>) -> Result<String> {
        let names = DBusProxy::new(&self.connection).await?.list_names().await?;
        choose_player(
            pinned,
            names.iter().map(|n| n.as_str()),
            &self.bus_prefix,
            &self.exclude,
        )
    }

    async fn proxy(&self, name: String) -> Result<PlayerProxy<'static>> {
        tracing::trace!(player = %name, "using MPRIS player");
        let proxy = PlayerProxy::builder(&self.connection)
            .destination(name)?
            .cache_properties(CacheProperties::No)
            .build()
            .await?;
        Ok(proxy)
    }

    async fn player(&self) -> Result<PlayerProxy<'static>> {
        let name = self.bus_name(self.pinned().as_deref()).await?;
        self.proxy(name).await
    }
}

/// Bus name to talk to.
///
/// A pinned player that is no longer registered has taken its track with it,
/// which is [`Error::NoMedia`] rather than a reason to drive some other player.
pub(crate) fn choose_player<'a>(
    pinned: Option<&str>,
    names: impl IntoIterator<Item = &'a str>,
    prefix: &str,
    exclude: &[String],
) -> Result<String> {
    match pinned {
        Some(pinned) => names
            .into_iter()
            .any(|n| n == pinned)
            .then(|| pinned.to_string())
            .ok_or(Error::NoMedia),
        None => select_player(names, prefix, exclude).ok_or_else(|| {
            Error::ControlUnavailable(format!("no bus name starting with {prefix}"))
        }),
    }
}

/// First registered name (in sorted order) carrying `prefix` and none of `exclude`.
pub(crate) fn select_player<'a>(
    names: impl IntoIterator<Item = &'a str>,
    prefix: &str,
    exclude: &[String],
) -> Option<String> {
    let mut players: Vec<&str> = names
        .into_iter()
        .filter(|n| n.starts_with(prefix))
        .filter(|n| !exclude.iter().any(|x| !x.is_empty() && n.contains(x.as_str())))
        .collect();
    players.sort_unstable();
    players.first().map(|n| n.to_string())
}

/// First string inside a metadata value: plain strings, object paths, or the
/// first element of a string list (`xesam:artist` is a list).
pub(crate) fn text(value: &OwnedValue) -> Option<String> {
    match &**value {
        Value::Str(s) => Some(s.to_string()),
        Value::ObjectPath(p) => Some(p.to_string()),
        Value::Array(items) => items.iter().find_map(|item| match item {
            Value::Str(s) => Some(s.to_string()),
            _ => None,
        }),
        _ => None,
    }
}

fn field(metadata: &HashMap<String, OwnedValue>, key: &str) -> Option<String> {
    metadata.get(key).and_then(text)
}

pub(crate) fn identity_from_metadata(
    metadata: &HashMap<String, OwnedValue>,
) -> Result<MediaIdentity> {
    let url = field(metadata, "xesam:url");
    let id = field(metadata, "mpris:trackid")
        .or_else(|| url.clone())
        .ok_or(Error::NoMedia)?;
    Ok(MediaIdentity { id, url })
}

#[async_trait]
impl MediaControl for MprisControl {
    fn name(&self) -> &str {
        "mpris"
    }

    fn settle_delay(&self) -> Option<Duration> {
        (!self.settle.is_zero()).then_some(self.settle)
    }

    async fn current_identity(&self) -> Result<MediaIdentity> {
        let metadata = self.player().await?.metadata().await?;
        identity_from_metadata(&metadata)
    }

    async fn is_paused(&self) -> Result<bool> {
        let status = self.player().await?.playback_status().await?;
        Ok(status == "Paused")
    }

    async fn current_position(&self) -> Result<f64> {
        let micros = self.player().await?.position().await?;
        Ok(micros as f64 / MICROS_PER_SECOND)
    }

    async fn snapshot(&self) -> Result<MediaSnapshot> {
        let player = self.player().await?;
        let metadata = player.metadata().await?;
        let position = player.position().await? as f64 / MICROS_PER_SECOND;
        Ok(MediaSnapshot {
            identity: identity_from_metadata(&metadata)?,
            artist: field(&metadata, "xesam:artist").unwrap_or_default(),
            title: field(&metadata, "xesam:title").unwrap_or_default(),
            position,
        })
    }

    async fn open(&self, uri: &str) -> Result<()> {
        let name = self.bus_name(None).await?;
        if let Ok(mut pinned) = self.pinned.lock() {
            *pinned = Some(name.clone());
        }
        self.proxy(name).await?.open_uri(uri).await?;
        Ok(())
    }

    async fn seek(&self, anchor: &MediaIdentity, position: u64) -> Result<()> {
        let player = self.player().await?;
        if !player.can_seek().await.unwrap_or(true) {
            return Err(Error::SeekUnsupported);
        }
        // SetPosition is ignored unless the id names the current track.
        let track_id =
            ObjectPath::try_from(anchor.id.as_str()).map_err(|_| Error::SeekUnsupported)?;
        let micros = i64::try_from(position)
            .ok()
            .and_then(|s| s.checked_mul(1_000_000))
            .ok_or(Error::SeekUnsupported)?;
        player.set_position(&track_id, micros).await?;
        Ok(())
    }

    async fn pause(&self) -> Result<()> {
        self.player().await?.pause().await?;
        Ok(())
    }
}
