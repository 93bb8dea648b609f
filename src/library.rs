//! Resolving an artist and title to a file on disk.
//!
//! Two finders are available: a directory scan that reads tags, and a query
//! against a beets library. Either is wrapped in a [`CachedFinder`].

mod beets;
mod cache;
mod scan;

pub use beets::BeetsFinder;
pub use cache::CachedFinder;
pub use scan::ScanFinder;

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::config::SearchSettings;
use crate::error::{Error, Result};

/// Looks up the file for a track.
pub trait FileFinder: Send + Sync {
    fn find_file(&self, artist: &str, title: &str) -> Result<Option<PathBuf>>;
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SearchMethod {
    File,
    Beets,
}

impl FromStr for SearchMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" => Ok(Self::File),
            "beets" => Ok(Self::Beets),
            _ => Err(Error::BackendUnsupported(s.to_string())),
        }
    }
}

/// Build the finder named by `settings.method`, behind the resolution cache.
pub fn finder(settings: &SearchSettings) -> Result<CachedFinder> {
    let inner: Box<dyn FileFinder> = match settings.method.parse::<SearchMethod>()? {
        SearchMethod::File => Box::new(ScanFinder::new(settings)),
        SearchMethod::Beets => Box::new(BeetsFinder::new(settings)),
    };
    Ok(CachedFinder::new(
        inner,
        settings.cache_capacity,
        Duration::from_secs(settings.cache_ttl_secs),
    ))
}

/// Resolve or fail with [`Error::TrackNotFound`].
pub fn resolve(finder: &dyn FileFinder, artist: &str, title: &str) -> Result<PathBuf> {
    finder
        .find_file(artist, title)?
        .ok_or_else(|| Error::TrackNotFound {
            artist: artist.to_string(),
            title: title.to_string(),
        })
}
