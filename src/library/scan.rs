use std::path::{Path, PathBuf};

use lofty::prelude::{Accessor, TaggedFileExt};
use walkdir::WalkDir;

use super::FileFinder;
use crate::config::SearchSettings;
use crate::error::Result;

/// Finds tracks by walking the music directory and reading tags.
///
/// Untagged files are matched by an `Artist - Title` file stem.
pub struct ScanFinder {
    root: PathBuf,
    extensions: Vec<String>,
    follow_links: bool,
    include_hidden: bool,
}

impl ScanFinder {
    pub fn new(settings: &SearchSettings) -> Self {
        let extensions = settings
            .extensions
            .iter()
            .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
            .filter(|e| !e.is_empty())
            .collect();

        Self {
            root: settings.music_dir(),
            extensions,
            follow_links: settings.follow_links,
            include_hidden: settings.include_hidden,
        }
    }

    fn is_audio_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|s| s.to_str())
            .map(|ext| {
                let ext = ext.to_ascii_lowercase();
                self.extensions.iter().any(|e| e == &ext)
            })
            .unwrap_or(false)
    }
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Artist and title for `path`: tags first, then the file stem.
pub(crate) fn track_names(path: &Path) -> Option<(String, String)> {
    if let Ok(tagged) = lofty::read_from_path(path) {
        if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
            if let (Some(artist), Some(title)) = (tag.artist(), tag.title()) {
                return Some((artist.into_owned(), title.into_owned()));
            }
        }
    }

    let stem = path.file_stem()?.to_str()?;
    let (artist, title) = stem.split_once(" - ")?;
    Some((artist.to_string(), title.to_string()))
}

impl FileFinder for ScanFinder {
    fn find_file(&self, artist: &str, title: &str) -> Result<Option<PathBuf>> {
        let (want_artist, want_title) = (normalize(artist), normalize(title));

        let found = WalkDir::new(&self.root)
            .follow_links(self.follow_links)
            .into_iter()
            .filter_entry(|e| self.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
            .filter_map(std::result::Result::ok)
            .filter(|e| e.file_type().is_file() || e.path().is_file())
            .map(|e| e.into_path())
            .filter(|p| self.is_audio_file(p))
            .find(|p| {
                track_names(p).is_some_and(|(a, t)| normalize(&a) == want_artist && normalize(&t) == want_title)
            });

        tracing::debug!(artist, title, found = ?found, root = %self.root.display(), "scanned library");
        Ok(found)
    }
}
