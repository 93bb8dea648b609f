//! Link codec.
//!
//! A link names a track as `artist:title`, optionally followed by a time range
//! `::1m15s` or `::1m15s-2m20s`. Literal colons and backslashes inside the
//! artist or title are escaped with a backslash, so the only unescaped colons
//! in a link are the field separators.

mod duration;

pub use duration::{decode_duration, encode_duration};

use crate::error::{Error, Result};

const ESCAPE: char = '\\';
const SEPARATOR: char = ':';
const RANGE_SEPARATOR: char = '-';

/// A decoded link.
///
/// `end` without `start` is never produced by decoding. `end <= start` is legal
/// here and left for callers to handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackReference {
    pub artist: String,
    pub title: String,
    pub start: Option<u64>,
    pub end: Option<u64>,
}

impl TrackReference {
    pub fn new(artist: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            artist: artist.into(),
            title: title.into(),
            start: None,
            end: None,
        }
    }

    pub fn with_range(mut self, start: Option<u64>, end: Option<u64>) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    pub fn encode(&self) -> String {
        encode_link(&self.artist, &self.title, self.start, self.end)
    }
}

fn escape(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    for c in field.chars() {
        if c == ESCAPE || c == SEPARATOR {
            out.push(ESCAPE);
        }
        out.push(c);
    }
    out
}

/// Encode a track and optional range into link text.
///
/// An `end` given without a `start` is encoded as a range starting at zero.
pub fn encode_link(artist: &str, title: &str, start: Option<u64>, end: Option<u64>) -> String {
    let mut link = format!("{}{SEPARATOR}{}", escape(artist), escape(title));

    let start = start.or(end.map(|_| 0));
    if let Some(start) = start {
        link.push(SEPARATOR);
        link.push(SEPARATOR);
        link.push_str(&encode_duration(start));
        if let Some(end) = end {
            link.push(RANGE_SEPARATOR);
            link.push_str(&encode_duration(end));
        }
    }
    link
}

/// Split on unescaped separators, unescaping each field as it goes.
fn split_fields(link: &str) -> Result<Vec<String>> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut chars = link.chars();

    while let Some(c) = chars.next() {
        match c {
            ESCAPE => match chars.next() {
                Some(escaped) => current.push(escaped),
                None => {
                    return Err(Error::MalformedLink(format!(
                        "dangling escape at end of {link:?}"
                    )));
                }
            },
            SEPARATOR => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    fields.push(current);
    Ok(fields)
}

fn decode_range(segment: &str) -> Result<(Option<u64>, Option<u64>)> {
    match segment.split_once(RANGE_SEPARATOR) {
        Some((start, end)) => Ok((Some(decode_duration(start)?), Some(decode_duration(end)?))),
        None => Ok((Some(decode_duration(segment)?), None)),
    }
}

/// Decode link text produced by [`encode_link`].
pub fn decode_link(link: &str) -> Result<TrackReference> {
    let mut fields = split_fields(link)?.into_iter();

    let (Some(artist), Some(title)) = (fields.next(), fields.next()) else {
        return Err(Error::MalformedLink(format!(
            "expected artist:title, got {link:?}"
        )));
    };

    let (start, end) = match (fields.next(), fields.next(), fields.next()) {
        (None, _, _) => (None, None),
        (Some(marker), Some(range), None) if marker.is_empty() => decode_range(&range)?,
        _ => {
            return Err(Error::MalformedLink(format!(
                "unexpected fields after title in {link:?}"
            )));
        }
    };

    Ok(TrackReference {
        artist,
        title,
        start,
        end,
    })
}

#[cfg(test)]
mod tests;
