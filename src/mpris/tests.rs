use super::*;
use crate::library::Track;
use std::sync::mpsc;
use std::time::Duration;

fn make_track() -> Track {
    let mut t = Track::remote(
        7,
        "Test Title",
        "Test Artist",
        "https://example.com/test.mp3",
        "Rock",
    );
    t.duration = Some(Duration::from_micros(1_234_567));
    t
}

fn iface(state: &Arc<Mutex<SharedState>>) -> (PlayerIface, mpsc::Receiver<ControlCmd>) {
    let (tx, rx) = mpsc::channel::<ControlCmd>();
    (
        PlayerIface {
            tx,
            state: state.clone(),
        },
        rx,
    )
}

#[test]
fn set_track_metadata_sets_and_clears_shared_state() {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let handle = MprisHandle {
        state: state.clone(),
    };

    handle.set_track_metadata(Some(&make_track()));
    {
        let s = state.lock().unwrap();
        assert_eq!(s.title.as_deref(), Some("Test Title"));
        assert_eq!(s.artist, vec!["Test Artist".to_string()]);
        assert_eq!(s.url.as_deref(), Some("https://example.com/test.mp3"));
        assert_eq!(s.length_micros, Some(1_234_567));
        assert_eq!(
            s.track_id.as_ref().map(|p| p.as_str()),
            Some("/org/mpris/MediaPlayer2/track/7")
        );
    }

    handle.set_track_metadata(None);
    {
        let s = state.lock().unwrap();
        assert_eq!(s.title, None);
        assert!(s.artist.is_empty());
        assert_eq!(s.url, None);
        assert_eq!(s.length_micros, None);
        assert!(s.track_id.is_none());
    }
}

#[test]
fn local_tracks_publish_file_urls() {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let handle = MprisHandle {
        state: state.clone(),
    };
    let mut t = make_track();
    t.local = true;
    t.src = "/tmp/a.mp3".into();
    handle.set_track_metadata(Some(&t));
    assert_eq!(
        state.lock().unwrap().url.as_deref(),
        Some("file:///tmp/a.mp3")
    );
}

#[test]
fn status_derives_from_media_state() {
    use PlaybackStatus::*;
    assert_eq!(PlaybackStatus::from_media(MediaState::Empty, false), Stopped);
    assert_eq!(PlaybackStatus::from_media(MediaState::Playing, false), Playing);
    assert_eq!(PlaybackStatus::from_media(MediaState::Loading, false), Playing);
    assert_eq!(PlaybackStatus::from_media(MediaState::Ready, true), Paused);
    assert_eq!(PlaybackStatus::from_media(MediaState::Ended, true), Paused);
}

#[test]
fn playback_status_maps_state_to_mpris_strings() {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (iface, _rx) = iface(&state);
    let handle = MprisHandle {
        state: state.clone(),
    };

    assert_eq!(iface.playback_status(), "Stopped");
    handle.set_playback(PlaybackStatus::Playing);
    assert_eq!(iface.playback_status(), "Playing");
    handle.set_playback(PlaybackStatus::Paused);
    assert_eq!(iface.playback_status(), "Paused");
}

#[test]
fn metadata_includes_expected_keys_when_present() {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (iface, _rx) = iface(&state);
    MprisHandle {
        state: state.clone(),
    }
    .set_track_metadata(Some(&make_track()));

    let map = iface.metadata();
    for k in [
        "mpris:trackid",
        "xesam:title",
        "xesam:artist",
        "xesam:url",
        "mpris:length",
    ] {
        assert!(map.contains_key(k), "missing key: {k}");
    }
}

#[test]
fn metadata_is_empty_without_a_track() {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (iface, _rx) = iface(&state);
    assert!(iface.metadata().is_empty());
}

#[test]
fn methods_forward_control_commands() {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (mut iface, rx) = iface(&state);
    iface.play_pause();
    iface.next();
    iface.previous();
    iface.stop();
    iface.set_volume(0.25);

    let got: Vec<ControlCmd> = rx.try_iter().collect();
    assert_eq!(
        got,
        vec![
            ControlCmd::PlayPause,
            ControlCmd::Next,
            ControlCmd::Prev,
            ControlCmd::Stop,
            ControlCmd::SetVolume(0.25),
        ]
    );
}

#[test]
fn volume_and_position_are_reported() {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (iface, _rx) = iface(&state);
    let handle = MprisHandle {
        state: state.clone(),
    };
    handle.set_volume(0.5);
    handle.set_position(Duration::from_secs(2));
    assert_eq!(iface.volume(), 0.5);
    assert_eq!(iface.position(), 2_000_000);
}
