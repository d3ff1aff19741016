//! Render-ready snapshots of the app: playlist rows and the transport panel.
//!
//! Everything here is pure so it can be tested without a terminal.

use std::time::Duration;

use crate::app::App;
use crate::playback::{MediaElement, MediaState};

/// `m:ss`, minutes unpadded.
pub fn format_time(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// Row text for a duration that may not be known yet.
pub fn format_duration(d: Option<Duration>) -> String {
    d.map(format_time).unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistRow {
    pub title: String,
    pub local: bool,
    /// `artist • category`
    pub subtitle: String,
    pub duration: String,
    /// The row at the controller's current index.
    pub active: bool,
}

pub fn playlist_rows<M: MediaElement>(app: &App<M>) -> Vec<PlaylistRow> {
    let current = app.player.current_index();
    app.filtered_tracks()
        .enumerate()
        .map(|(pos, t)| PlaylistRow {
            title: t.title.clone(),
            local: t.local,
            subtitle: format!("{} • {}", t.artist, t.category),
            duration: format_duration(t.duration),
            active: pos == current,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transport {
    pub title: String,
    pub artist: String,
    pub state: &'static str,
    pub elapsed: String,
    pub total: String,
    /// Progress in `0.0..=1.0`; zero while the duration is unknown.
    pub ratio: f64,
    pub volume_percent: u16,
    pub shuffle: bool,
    pub repeat: &'static str,
}

pub fn transport<M: MediaElement>(app: &App<M>) -> Transport {
    let media = app.player.media();
    let elapsed = media.current_time();
    let duration = media.duration().filter(|d| !d.is_zero());
    let ratio = duration
        .map(|d| (elapsed.as_secs_f64() / d.as_secs_f64()).clamp(0.0, 1.0))
        .unwrap_or(0.0);
    let (title, artist) = match app.player.now_playing() {
        Some(np) => (np.title.clone(), np.artist.clone()),
        None => ("Nothing loaded".to_string(), String::new()),
    };

    Transport {
        title,
        artist,
        state: state_label(media.state()),
        elapsed: format_time(elapsed),
        total: format_time(duration.unwrap_or_default()),
        ratio,
        volume_percent: (app.player.volume() * 100.0).round() as u16,
        shuffle: app.player.shuffle(),
        repeat: app.player.repeat().label(),
    }
}

fn state_label(state: MediaState) -> &'static str {
    match state {
        MediaState::Empty => "Stopped",
        MediaState::Loading => "Loading",
        MediaState::Ready => "Ready",
        MediaState::Playing => "Playing",
        MediaState::Paused => "Paused",
        MediaState::Ended => "Ended",
    }
}
