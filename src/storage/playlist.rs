use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::library::{Track, TrackId};

use super::error::StorageError;
use super::kv::KeyValueStore;

/// The saved shape of a remote track. Duration and the local flag are never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedTrack {
    pub id: TrackId,
    pub title: String,
    pub artist: String,
    pub src: String,
    pub category: String,
}

impl From<&Track> for PersistedTrack {
    fn from(t: &Track) -> Self {
        Self {
            id: t.id,
            title: t.title.clone(),
            artist: t.artist.clone(),
            src: t.src.clone(),
            category: t.category.clone(),
        }
    }
}

impl From<PersistedTrack> for Track {
    fn from(p: PersistedTrack) -> Self {
        Track {
            id: p.id,
            title: p.title,
            artist: p.artist,
            src: p.src,
            category: p.category,
            duration: None,
            local: false,
        }
    }
}

/// Reads and writes the remote playlist under a fixed key.
pub struct PlaylistStorage {
    store: Box<dyn KeyValueStore>,
    key: String,
}

impl PlaylistStorage {
    pub fn new(store: Box<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Saved tracks, or an empty list when nothing usable is stored.
    pub fn load(&self) -> Vec<Track> {
        match self.try_load() {
            Ok(tracks) => tracks,
            Err(e) => {
                warn!(key = %self.key, error = %e, "could not load saved playlist");
                Vec::new()
            }
        }
    }

    pub fn try_load(&self) -> Result<Vec<Track>, StorageError> {
        let Some(raw) = self.store.get(&self.key)? else {
            return Ok(Vec::new());
        };
        let saved: Vec<PersistedTrack> = serde_json::from_str(&raw)?;
        Ok(saved.into_iter().map(Track::from).collect())
    }

    /// Overwrite the saved playlist with the non-local subset of `tracks`.
    pub fn save<'a>(&mut self, tracks: impl IntoIterator<Item = &'a Track>) {
        if let Err(e) = self.try_save(tracks) {
            debug!(key = %self.key, error = %e, "ignoring playlist save failure");
        }
    }

    pub fn try_save<'a>(
        &mut self,
        tracks: impl IntoIterator<Item = &'a Track>,
    ) -> Result<(), StorageError> {
        let saved: Vec<PersistedTrack> = tracks
            .into_iter()
            .filter(|t| !t.local)
            .map(PersistedTrack::from)
            .collect();
        let raw = serde_json::to_string(&saved)?;
        self.store.set(&self.key, &raw)
    }
}
