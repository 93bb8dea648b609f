use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/tracklink/config.toml` or `~/.config/tracklink/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `TRACKLINK__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub player: PlayerSettings,
    pub search: SearchSettings,
    pub watchdog: WatchdogSettings,
    pub log: LogSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PlayerSettings {
    /// Which player binding to drive: `mpris` or `mpd`.
    pub backend: String,
    /// Bus names starting with this are MPRIS players.
    pub bus_prefix: String,
    /// Bus names containing any of these are never treated as players.
    pub exclude: Vec<String>,
    /// `mpc` executable used by the `mpd` backend.
    pub mpc_command: String,
    /// Wait after opening a file before seeking (milliseconds, MPRIS only).
    pub settle_ms: u64,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            backend: "mpris".to_string(),
            bus_prefix: "org.mpris.MediaPlayer2.".to_string(),
            exclude: vec![
                "plasma-browser-integration".to_string(),
                "kdeconnect".to_string(),
            ],
            mpc_command: "mpc".to_string(),
            settle_ms: 500,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SearchSettings {
    /// How to find a track's file: `file` (scan `music_dir`) or `beets`.
    pub method: String,
    /// Root of the library scan. Defaults to `~/Music`.
    pub music_dir: Option<PathBuf>,
    /// File extensions to treat as audio (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// Whether to follow symlinks during scanning.
    pub follow_links: bool,
    /// Whether to look inside hidden files/directories (dotfiles).
    pub include_hidden: bool,
    /// `beet` executable used by the `beets` method.
    pub beet_command: String,
    /// Resolved paths kept in memory.
    pub cache_capacity: usize,
    /// Seconds before a cached path is looked up again.
    pub cache_ttl_secs: u64,
}

impl SearchSettings {
    pub fn music_dir(&self) -> PathBuf {
        self.music_dir.clone().unwrap_or_else(|| {
            env::var_os("HOME")
                .map(PathBuf::from)
                .unwrap_or_default()
                .join("Music")
        })
    }
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            method: "file".to_string(),
            music_dir: None,
            extensions: vec![
                "mp3".into(),
                "flac".into(),
                "ogg".into(),
                "opus".into(),
                "m4a".into(),
                "wav".into(),
            ],
            follow_links: true,
            include_hidden: false,
            beet_command: "beet".to_string(),
            cache_capacity: 256,
            cache_ttl_secs: 600,
        }
    }
}

/// Polling policy of the stop-at-time watchdog.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WatchdogSettings {
    /// Interval between checks while the end is far away (milliseconds).
    pub coarse_interval_ms: u64,
    /// Below this much remaining time, checks home in geometrically (milliseconds).
    pub fine_window_ms: u64,
    /// Fraction of the remaining time to wait inside the fine window.
    pub fine_factor: f64,
    /// Shortest delay between two checks (milliseconds).
    pub min_delay_ms: u64,
}

impl Default for WatchdogSettings {
    fn default() -> Self {
        Self {
            coarse_interval_ms: 5000,
            fine_window_ms: 6000,
            fine_factor: 0.9,
            min_delay_ms: 1,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LogSettings {
    /// Default `tracing` filter directive; `RUST_LOG` overrides it.
    pub level: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}
