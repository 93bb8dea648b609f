use std::path::PathBuf;
use std::process::Command;

use super::FileFinder;
use crate::config::SearchSettings;
use crate::error::{Error, Result};

/// Finds tracks through `beet ls -p`, which prints one path per match.
pub struct BeetsFinder {
    program: String,
}

impl BeetsFinder {
    pub fn new(settings: &SearchSettings) -> Self {
        Self {
            program: settings.beet_command.clone(),
        }
    }
}

/// Query terms for a whole-field, case-insensitive beets match.
///
/// A bare `field:value` term matches substrings, so `title:Roygbiv` would also
/// hit "Roygbiv (Remix)". `=~` compares the full field ignoring case, the same
/// equality `ScanFinder` applies to tags.
pub(crate) fn query(artist: &str, title: &str) -> Vec<String> {
    vec![
        format!("artist:=~{}", artist.trim()),
        format!("title:=~{}", title.trim()),
    ]
}

impl FileFinder for BeetsFinder {
    fn find_file(&self, artist: &str, title: &str) -> Result<Option<PathBuf>> {
        let output = Command::new(&self.program)
            .args(["ls", "-p"])
            .args(query(artist, title))
            .output()
            .map_err(|e| Error::BackendUnsupported(format!("{}: {e}", self.program)))?;

        if !output.status.success() {
            tracing::warn!(
                status = %output.status,
                stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                "beets query failed"
            );
            return Ok(None);
        }

        Ok(String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::trim)
            .find(|l| !l.is_empty())
            .map(PathBuf::from))
    }
}
