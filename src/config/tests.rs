use super::load::{default_config_path, default_data_dir, default_log_file, resolve_config_path};
use super::schema::*;
use crate::playback::RepeatMode;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|e| e.into_inner())
}

struct EnvGuard {
    key: &'static str,
    old: Option<std::ffi::OsString>,
}

impl EnvGuard {
    fn set(key: &'static str, val: &str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::set_var(key, val);
        }
        Self { key, old }
    }

    fn remove(key: &'static str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::remove_var(key);
        }
        Self { key, old }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.old.take() {
            Some(v) => unsafe {
                std::env::set_var(self.key, v);
            },
            None => unsafe {
                std::env::remove_var(self.key);
            },
        }
    }
}

#[test]
fn defaults_match_documented_values() {
    let s = Settings::default();
    assert_eq!(s.controls.volume_step, 0.05);
    assert_eq!(s.controls.volume_slider_step, 0.1);
    assert_eq!(s.controls.scrub_seconds, 5);
    assert_eq!(s.audio.quit_fade_out_ms, 500);
    assert_eq!(s.playback.volume, 1.0);
    assert!(!s.playback.shuffle);
    assert_eq!(s.playback.repeat, RepeatModeSetting::Off);
    assert_eq!(s.storage.playlist_key, "playlist_v1");
    assert_eq!(s.logging.level, "info");
    assert!(s.validate().is_ok());
}

#[test]
fn partial_toml_keeps_defaults_for_missing_fields() {
    let s: Settings = toml::from_str(
        r#"
[controls]
scrub_seconds = 12
"#,
    )
    .unwrap();
    assert_eq!(s.controls.scrub_seconds, 12);
    assert_eq!(s.controls.volume_step, 0.05);
    assert_eq!(s.storage.playlist_key, "playlist_v1");
}

#[test]
fn repeat_setting_accepts_aliases() {
    #[derive(serde::Deserialize)]
    struct W {
        repeat: RepeatModeSetting,
    }
    for (raw, want) in [
        ("off", RepeatMode::Off),
        ("no-loop", RepeatMode::Off),
        ("one", RepeatMode::One),
        ("repeat-one", RepeatMode::One),
        ("all", RepeatMode::All),
        ("loop-all", RepeatMode::All),
    ] {
        let w: W = toml::from_str(&format!("repeat = {raw:?}")).unwrap();
        assert_eq!(RepeatMode::from(w.repeat), want, "alias {raw}");
    }
    assert!(toml::from_str::<W>("repeat = \"sometimes\"").is_err());
}

#[test]
fn validate_rejects_out_of_range_volume_and_steps() {
    let mut s = Settings::default();
    s.playback.volume = 1.5;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.controls.volume_step = 0.0;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.controls.volume_slider_step = 2.0;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.storage.playlist_key = "  ".into();
    assert!(s.validate().is_err());
}

#[test]
fn resolve_config_path_prefers_medley_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("MEDLEY_CONFIG_PATH", "/tmp/medley-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        PathBuf::from("/tmp/medley-test-config.toml")
    );
}

#[test]
fn default_config_path_prefers_xdg_config_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-config-home");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    assert_eq!(
        default_config_path().unwrap(),
        PathBuf::from("/tmp/xdg-config-home/medley/config.toml")
    );
}

#[test]
fn default_config_path_falls_back_to_home_dot_config() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_CONFIG_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    assert_eq!(
        default_config_path().unwrap(),
        PathBuf::from("/tmp/home-dir/.config/medley/config.toml")
    );
}

#[test]
fn data_and_log_locations_follow_xdg() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_DATA_HOME");
    let _g2 = EnvGuard::set("XDG_STATE_HOME", "/tmp/state");
    let _g3 = EnvGuard::set("HOME", "/tmp/home-dir");

    assert_eq!(
        default_data_dir().unwrap(),
        PathBuf::from("/tmp/home-dir/.local/share/medley")
    );
    assert_eq!(
        default_log_file().unwrap(),
        PathBuf::from("/tmp/state/medley/medley.log")
    );

    let mut s = Settings::default();
    s.storage.data_dir = Some(PathBuf::from("/srv/medley"));
    assert_eq!(s.data_dir().unwrap(), PathBuf::from("/srv/medley"));
}

#[test]
fn settings_load_from_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[playback]
shuffle = true
repeat = "repeat-one"
volume = 0.5

[audio]
quit_fade_out_ms = 123

[controls]
scrub_seconds = 9
volume_step = 0.1

[ui]
header_text = "hello"

[library]
extensions = ["mp3"]
recursive = false
include_hidden = false
follow_links = false

[storage]
data_dir = "/tmp/medley-data"
playlist_key = "mine"

[logging]
level = "debug"
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("MEDLEY_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("MEDLEY__AUDIO__QUIT_FADE_OUT_MS");

    let s = Settings::load().unwrap();
    assert!(s.playback.shuffle);
    assert_eq!(s.playback.repeat, RepeatModeSetting::One);
    assert_eq!(s.playback.volume, 0.5);
    assert_eq!(s.audio.quit_fade_out_ms, 123);
    assert_eq!(s.controls.scrub_seconds, 9);
    assert_eq!(s.controls.volume_step, 0.1);
    assert_eq!(s.ui.header_text, "hello");
    assert_eq!(s.library.extensions, vec!["mp3".to_string()]);
    assert!(!s.library.recursive);
    assert!(!s.library.include_hidden);
    assert!(!s.library.follow_links);
    assert_eq!(s.storage.data_dir, Some(PathBuf::from("/tmp/medley-data")));
    assert_eq!(s.storage.playlist_key, "mine");
    assert_eq!(s.logging.level, "debug");
}

#[test]
fn settings_env_overrides_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[audio]
quit_fade_out_ms = 250
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("MEDLEY_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::set("MEDLEY__AUDIO__QUIT_FADE_OUT_MS", "0");

    let s = Settings::load().unwrap();
    assert_eq!(s.audio.quit_fade_out_ms, 0);
}
