use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Session-unique identifier of a track.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(pub u64);

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub id: TrackId,
    pub title: String,
    pub artist: String,
    /// URI of the media. Remote tracks use http(s) URLs, local tracks a filesystem path.
    pub src: String,
    pub category: String,
    /// Filled in once a probe has read the media's length.
    pub duration: Option<Duration>,
    /// Session-only track; never persisted.
    pub local: bool,
}

impl Track {
    pub fn remote(id: u64, title: &str, artist: &str, src: &str, category: &str) -> Self {
        Self {
            id: TrackId(id),
            title: title.to_string(),
            artist: artist.to_string(),
            src: src.to_string(),
            category: category.to_string(),
            duration: None,
            local: false,
        }
    }

    /// Where the audio element should read this track from.
    pub fn media_source(&self) -> MediaSource {
        MediaSource::from_src(&self.src, self.local)
    }
}

/// A playable location understood by the audio element and the probes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaSource {
    Url(String),
    File(PathBuf),
}

impl MediaSource {
    pub fn from_src(src: &str, local: bool) -> Self {
        if local {
            return Self::File(PathBuf::from(src));
        }
        if let Some(path) = src.strip_prefix("file://") {
            return Self::File(PathBuf::from(path));
        }
        let lower = src.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Self::Url(src.to_string())
        } else {
            Self::File(PathBuf::from(src))
        }
    }

    pub fn uri(&self) -> String {
        match self {
            Self::Url(u) => u.clone(),
            Self::File(p) => format!("file://{}", p.display()),
        }
    }
}

impl fmt::Display for MediaSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url(u) => f.write_str(u),
            Self::File(p) => write!(f, "{}", p.display()),
        }
    }
}
