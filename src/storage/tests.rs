use super::error::StorageError;
use super::*;
use crate::library::{Track, TrackStore};
use std::path::PathBuf;
use tempfile::tempdir;

const KEY: &str = "playlist_v1";

struct FailingStore;

impl KeyValueStore for FailingStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Io(std::io::Error::other("quota exceeded")))
    }

    fn set(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Io(std::io::Error::other("quota exceeded")))
    }
}

fn remote(id: u64, n: u32) -> Track {
    Track::remote(
        id,
        &format!("Song {n}"),
        "Artist",
        &format!("https://example.com/{n}.mp3"),
        "Rock",
    )
}

#[test]
fn file_store_missing_key_is_none() {
    let dir = tempdir().unwrap();
    let store = FileStore::new(dir.path());
    assert_eq!(store.get(KEY).unwrap(), None);
}

#[test]
fn file_store_round_trips_values_and_creates_dir() {
    let dir = tempdir().unwrap();
    let nested = dir.path().join("a").join("b");
    let mut store = FileStore::new(&nested);
    store.set(KEY, "[]").unwrap();
    assert_eq!(store.get(KEY).unwrap().as_deref(), Some("[]"));
    assert!(nested.join("playlist_v1.json").is_file());

    store.set(KEY, "[1]").unwrap();
    assert_eq!(store.get(KEY).unwrap().as_deref(), Some("[1]"));
}

#[test]
fn file_store_rejects_path_like_keys() {
    let dir = tempdir().unwrap();
    let mut store = FileStore::new(dir.path());
    assert!(matches!(
        store.set("../escape", "x"),
        Err(StorageError::InvalidKey(_))
    ));
    assert!(matches!(store.get(""), Err(StorageError::InvalidKey(_))));
}

#[test]
fn save_then_load_keeps_only_remote_tracks() {
    let dir = tempdir().unwrap();
    let mut storage = PlaylistStorage::new(Box::new(FileStore::new(dir.path())), KEY);

    let a = remote(10, 1);
    let mut b = remote(11, 2);
    b.local = true;
    b.src = "/home/me/b.mp3".into();
    storage.save([&a, &b]);

    let reloaded = PlaylistStorage::new(Box::new(FileStore::new(dir.path())), KEY).load();
    assert_eq!(reloaded, vec![a]);
}

#[test]
fn persisted_format_has_exactly_five_fields() {
    let dir = tempdir().unwrap();
    let mut storage = PlaylistStorage::new(Box::new(FileStore::new(dir.path())), KEY);
    let mut t = remote(3, 3);
    t.duration = Some(std::time::Duration::from_secs(200));
    storage.save([&t]);

    let raw = std::fs::read_to_string(dir.path().join("playlist_v1.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let obj = value[0].as_object().unwrap();
    let mut keys: Vec<&str> = obj.keys().map(String::as_str).collect();
    keys.sort();
    assert_eq!(keys, vec!["artist", "category", "id", "src", "title"]);
}

#[test]
fn reload_merges_against_defaults_by_src() {
    let mut storage = PlaylistStorage::new(Box::new(MemoryStore::default()), KEY);
    let mut store = TrackStore::with_defaults();
    store.add_samples();
    store.add_local_files(&[PathBuf::from("/tmp/x.mp3")]);
    storage.save(store.tracks());

    let mut fresh = TrackStore::with_defaults();
    let added = fresh.merge_saved(storage.load());
    assert_eq!(added.len(), 2);
    assert_eq!(fresh.len(), 5);
    assert!(fresh.tracks().iter().all(|t| !t.local));
}

#[test]
fn malformed_data_loads_as_empty() {
    let mut kv = MemoryStore::default();
    kv.set(KEY, "{not json").unwrap();
    let storage = PlaylistStorage::new(Box::new(kv), KEY);
    assert!(matches!(storage.try_load(), Err(StorageError::Json(_))));
    assert!(storage.load().is_empty());
}

#[test]
fn non_array_data_loads_as_empty() {
    let mut kv = MemoryStore::default();
    kv.set(KEY, r#"{"id":1}"#).unwrap();
    let storage = PlaylistStorage::new(Box::new(kv), KEY);
    assert!(storage.load().is_empty());
}

#[test]
fn storage_failures_are_swallowed() {
    let mut storage = PlaylistStorage::new(Box::new(FailingStore), KEY);
    assert!(storage.load().is_empty());
    // Must not panic.
    storage.save([&remote(1, 1)]);
    assert!(storage.try_save([&remote(1, 1)]).is_err());
}
