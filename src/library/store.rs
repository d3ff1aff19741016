use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::debug;

use super::catalog::{default_tracks, sample_tracks};
use super::model::{Track, TrackId};

pub const LOCAL_ARTIST: &str = "Local";
pub const LOCAL_CATEGORY: &str = "Local";

/// Ordered, append-only collection of every track known to the session.
#[derive(Debug, Clone)]
pub struct TrackStore {
    tracks: Vec<Track>,
    next_id: u64,
}

impl Default for TrackStore {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl TrackStore {
    pub fn new(tracks: Vec<Track>) -> Self {
        let next_id = tracks.iter().map(|t| t.id.0 + 1).max().unwrap_or(1);
        Self { tracks, next_id }
    }

    /// A store seeded with the built-in remote tracks.
    pub fn with_defaults() -> Self {
        Self::new(default_tracks())
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn get(&self, id: TrackId) -> Option<&Track> {
        self.tracks.iter().find(|t| t.id == id)
    }

    pub fn contains_src(&self, src: &str) -> bool {
        self.tracks.iter().any(|t| t.src == src)
    }

    /// Tracks eligible for persistence, in store order.
    pub fn remote_tracks(&self) -> impl Iterator<Item = &Track> {
        self.tracks.iter().filter(|t| !t.local)
    }

    /// Append previously saved tracks whose `src` is not already present.
    ///
    /// Returns the ids of the appended tracks.
    pub fn merge_saved(&mut self, saved: Vec<Track>) -> Vec<TrackId> {
        let mut added = Vec::new();
        for mut track in saved {
            if self.contains_src(&track.src) {
                continue;
            }
            // Saved entries are always remote, whatever the file says.
            track.local = false;
            track.duration = None;
            added.push(self.push_with_unique_id(track));
        }
        added
    }

    /// Append the sample tracks, skipping any `src` already in the store.
    pub fn add_samples(&mut self) -> Vec<TrackId> {
        let mut added = Vec::new();
        for mut track in sample_tracks() {
            if self.contains_src(&track.src) {
                continue;
            }
            track.id = self.fresh_id();
            added.push(track.id);
            self.tracks.push(track);
        }
        added
    }

    /// Append one session-only track per file. Never de-duplicated.
    pub fn add_local_files(&mut self, paths: &[PathBuf]) -> Vec<TrackId> {
        paths
            .iter()
            .map(|path| {
                let track = Track {
                    id: self.fresh_id(),
                    title: local_title(path),
                    artist: LOCAL_ARTIST.to_string(),
                    src: path.display().to_string(),
                    category: LOCAL_CATEGORY.to_string(),
                    duration: None,
                    local: true,
                };
                debug!(id = %track.id, src = %track.src, "added local track");
                let id = track.id;
                self.tracks.push(track);
                id
            })
            .collect()
    }

    /// Record a probed duration. Returns false if the track is unknown.
    pub fn set_duration(&mut self, id: TrackId, duration: Duration) -> bool {
        match self.tracks.iter_mut().find(|t| t.id == id) {
            Some(track) => {
                track.duration = Some(duration);
                true
            }
            None => false,
        }
    }

    fn push_with_unique_id(&mut self, mut track: Track) -> TrackId {
        if self.get(track.id).is_some() {
            track.id = self.fresh_id();
        } else {
            self.next_id = self.next_id.max(track.id.0 + 1);
        }
        let id = track.id;
        self.tracks.push(track);
        id
    }

    fn fresh_id(&mut self) -> TrackId {
        let id = TrackId(self.next_id);
        self.next_id += 1;
        id
    }
}

fn local_title(path: &Path) -> String {
    path.file_stem()
        .or_else(|| path.file_name())
        .and_then(|s| s.to_str())
        .unwrap_or("UNKNOWN")
        .to_string()
}
