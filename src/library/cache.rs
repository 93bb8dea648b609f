use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use lru::LruCache;

use super::FileFinder;
use crate::error::Result;

type Key = (String, String);

/// Memoizes resolved paths per `(artist, title)`.
///
/// At most `capacity` entries are kept, least recently used evicted first.
/// Entries older than `ttl` are looked up again. Misses are never stored, so a
/// file added to the library is found on the next lookup.
pub struct CachedFinder {
    inner: Box<dyn FileFinder>,
    entries: Mutex<LruCache<Key, (PathBuf, Instant)>>,
    ttl: Duration,
}

impl CachedFinder {
    pub fn new(inner: Box<dyn FileFinder>, capacity: usize, ttl: Duration) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner,
            entries: Mutex::new(LruCache::new(capacity)),
            ttl,
        }
    }

    fn cached(&self, key: &Key) -> Option<PathBuf> {
        let mut entries = self.entries.lock().ok()?;
        let entry = entries
            .get(key)
            .map(|(path, at)| (path.clone(), at.elapsed() < self.ttl));
        match entry {
            Some((path, true)) => Some(path),
            Some((_, false)) => {
                entries.pop(key);
                None
            }
            None => None,
        }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }
}

impl FileFinder for CachedFinder {
    fn find_file(&self, artist: &str, title: &str) -> Result<Option<PathBuf>> {
        let key = (artist.to_string(), title.to_string());
        if let Some(path) = self.cached(&key) {
            tracing::trace!(artist, title, "resolution cache hit");
            return Ok(Some(path));
        }

        let found = self.inner.find_file(artist, title)?;
        if let (Some(path), Ok(mut entries)) = (&found, self.entries.lock()) {
            entries.put(key, (path.clone(), Instant::now()));
        }
        Ok(found)
    }
}
