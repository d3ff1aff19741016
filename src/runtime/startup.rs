use std::ffi::OsString;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::app::App;
use crate::config;
use crate::playback::MediaElement;
use crate::storage::{FileStore, KeyValueStore, MemoryStore, PlaylistStorage};

/// The playlist adapter over the configured data directory, or an
/// in-memory store when no directory can be resolved.
pub fn open_storage(settings: &config::Settings) -> PlaylistStorage {
    let store: Box<dyn KeyValueStore> = match settings.data_dir() {
        Some(dir) => {
            let store = FileStore::new(dir);
            info!(dir = %store.dir().display(), "using data directory");
            Box::new(store)
        }
        None => {
            warn!("no data directory, the playlist will not be saved");
            Box::new(MemoryStore::default())
        }
    };
    let storage = PlaylistStorage::new(store, settings.storage.playlist_key.clone());
    debug!(key = storage.key(), "playlist storage ready");
    storage
}

pub fn apply_playback_defaults<M: MediaElement>(app: &mut App<M>, settings: &config::Settings) {
    app.player.set_shuffle(settings.playback.shuffle);
    app.player.set_repeat(settings.playback.repeat.into());
    app.player.set_volume(settings.playback.volume);
}

/// Add every file or directory named on the command line as local tracks.
pub fn add_cli_paths<M: MediaElement>(
    app: &mut App<M>,
    args: impl IntoIterator<Item = OsString>,
) -> usize {
    args.into_iter()
        .map(|arg| app.add_local_path(Path::new(&arg)))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{RepeatModeSetting, Settings};
    use crate::playback::RepeatMode;
    use crate::playback::fake::FakeMedia;
    use std::fs;

    fn app() -> App<FakeMedia> {
        let settings = Settings::default();
        let mut app = App::new(
            FakeMedia::default(),
            PlaylistStorage::new(Box::new(MemoryStore::default()), "playlist_v1"),
            settings.library.clone(),
            settings.controls.clone(),
        );
        app.initialize();
        app
    }

    #[test]
    fn playback_defaults_are_applied() {
        let mut settings = Settings::default();
        settings.playback.shuffle = true;
        settings.playback.repeat = RepeatModeSetting::All;
        settings.playback.volume = 0.3;

        let mut app = app();
        apply_playback_defaults(&mut app, &settings);
        assert!(app.player.shuffle());
        assert_eq!(app.player.repeat(), RepeatMode::All);
        assert!((app.player.volume() - 0.3).abs() < 1e-6);
    }

    #[test]
    fn cli_paths_become_local_tracks() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("single.flac");
        fs::write(&file, b"x").unwrap();
        let sub = dir.path().join("album");
        fs::create_dir_all(&sub).unwrap();
        fs::write(sub.join("01.mp3"), b"x").unwrap();
        fs::write(sub.join("02.mp3"), b"x").unwrap();

        let mut app = app();
        let added = add_cli_paths(
            &mut app,
            vec![file.into_os_string(), sub.into_os_string()],
        );
        assert_eq!(added, 3);
        assert_eq!(app.tracks().len(), 6);
        assert!(app.tracks()[3..].iter().all(|t| t.local));
    }

    #[test]
    fn storage_uses_configured_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = Settings::default();
        settings.storage.data_dir = Some(dir.path().to_path_buf());
        settings.storage.playlist_key = "custom".into();

        let mut storage = open_storage(&settings);
        assert_eq!(storage.key(), "custom");
        let tracks = crate::library::TrackStore::with_defaults();
        storage.try_save(tracks.tracks()).unwrap();
        assert!(dir.path().join("custom.json").exists());
    }
}
