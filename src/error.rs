//! Error taxonomy shared by the codec, the control bindings and the controller.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Link text that does not have the `artist:title[::range]` shape.
    #[error("malformed link: {0}")]
    MalformedLink(String),

    /// Duration token that is not a sequence of `<digits><h|m|s>` groups.
    #[error("malformed duration: {0:?}")]
    MalformedDuration(String),

    #[error("no file found for {artist} - {title}")]
    TrackNotFound { artist: String, title: String },

    /// The player could not be reached, or a call to it failed.
    #[error("media control unavailable: {0}")]
    ControlUnavailable(String),

    /// The player is reachable but has no current track (stopped, or the
    /// player that was driven has gone away).
    #[error("player has no current track")]
    NoMedia,

    /// The player refused an absolute seek (usually because media is still loading).
    #[error("player does not accept a seek right now")]
    SeekUnsupported,

    #[error("unsupported player backend: {0:?}")]
    PlayerUnsupported(String),

    #[error("unsupported search backend: {0:?}")]
    BackendUnsupported(String),
}

impl From<zbus::Error> for Error {
    fn from(e: zbus::Error) -> Self {
        Self::ControlUnavailable(e.to_string())
    }
}

impl From<zbus::fdo::Error> for Error {
    fn from(e: zbus::fdo::Error) -> Self {
        Self::ControlUnavailable(e.to_string())
    }
}
