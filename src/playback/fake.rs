//! In-memory media element for tests.

use std::time::Duration;

use crate::library::MediaSource;

use super::element::{MediaElement, MediaState};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    SetSource(MediaSource),
    Unload,
    Play,
    Pause,
    Seek(Duration),
    Volume(f32),
}

/// Records every call and loads instantly with a fixed duration.
#[derive(Debug)]
pub struct FakeMedia {
    pub calls: Vec<Call>,
    pub source: Option<MediaSource>,
    pub state: MediaState,
    pub position: Duration,
    pub duration: Option<Duration>,
    pub volume: f32,
    pub load_duration: Option<Duration>,
    ended: bool,
}

impl Default for FakeMedia {
    fn default() -> Self {
        Self {
            calls: Vec::new(),
            source: None,
            state: MediaState::Empty,
            position: Duration::ZERO,
            duration: None,
            volume: 1.0,
            load_duration: Some(Duration::from_secs(200)),
            ended: false,
        }
    }
}

impl FakeMedia {
    /// Simulate the track playing through to its end.
    pub fn finish(&mut self) {
        if let Some(d) = self.duration {
            self.position = d;
        }
        self.state = MediaState::Ended;
        self.ended = true;
    }

    pub fn plays(&self) -> usize {
        self.calls.iter().filter(|c| **c == Call::Play).count()
    }

    pub fn loads(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, Call::SetSource(_)))
            .count()
    }
}

impl MediaElement for FakeMedia {
    fn set_source(&mut self, source: MediaSource) {
        self.calls.push(Call::SetSource(source.clone()));
        self.source = Some(source);
        self.position = Duration::ZERO;
        self.duration = self.load_duration;
        self.state = MediaState::Ready;
    }

    fn unload(&mut self) {
        self.calls.push(Call::Unload);
        self.source = None;
        self.duration = None;
        self.position = Duration::ZERO;
        self.state = MediaState::Empty;
    }

    fn source(&self) -> Option<&MediaSource> {
        self.source.as_ref()
    }

    fn play(&mut self) {
        self.calls.push(Call::Play);
        if self.source.is_some() {
            if self.state == MediaState::Ended {
                self.position = Duration::ZERO;
            }
            self.state = MediaState::Playing;
        }
    }

    fn pause(&mut self) {
        self.calls.push(Call::Pause);
        if self.source.is_some() {
            self.state = MediaState::Paused;
        }
    }

    fn paused(&self) -> bool {
        self.state != MediaState::Playing
    }

    fn state(&self) -> MediaState {
        self.state
    }

    fn current_time(&self) -> Duration {
        self.position
    }

    fn set_current_time(&mut self, position: Duration) {
        self.calls.push(Call::Seek(position));
        self.position = position;
        if self.state == MediaState::Ended {
            self.state = MediaState::Paused;
        }
    }

    fn duration(&self) -> Option<Duration> {
        self.duration
    }

    fn volume(&self) -> f32 {
        self.volume
    }

    fn set_volume(&mut self, volume: f32) {
        self.calls.push(Call::Volume(volume));
        self.volume = volume;
    }

    fn take_ended(&mut self) -> bool {
        std::mem::take(&mut self.ended)
    }
}
