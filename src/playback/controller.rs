use std::time::Duration;

use rand::{rng, seq::IteratorRandom};
use tracing::debug;

use crate::library::TrackId;

use super::element::MediaElement;
use super::queue::Queue;
use super::types::{EndOutcome, RepeatMode};

/// Title and artist of the track bound to the element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NowPlaying {
    pub id: TrackId,
    pub title: String,
    pub artist: String,
}

/// Transport state machine over a single [`MediaElement`].
///
/// `current_index` always refers to a position in the filtered list passed
/// in as a [`Queue`], never to the full store.
pub struct PlaybackController<M> {
    media: M,
    current_index: usize,
    shuffle: bool,
    repeat: RepeatMode,
    now_playing: Option<NowPlaying>,
}

impl<M: MediaElement> PlaybackController<M> {
    pub fn new(media: M) -> Self {
        Self {
            media,
            current_index: 0,
            shuffle: false,
            repeat: RepeatMode::Off,
            now_playing: None,
        }
    }

    pub fn media(&self) -> &M {
        &self.media
    }

    pub fn media_mut(&mut self) -> &mut M {
        &mut self.media
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn now_playing(&self) -> Option<&NowPlaying> {
        self.now_playing.as_ref()
    }

    pub fn shuffle(&self) -> bool {
        self.shuffle
    }

    pub fn set_shuffle(&mut self, on: bool) {
        self.shuffle = on;
    }

    pub fn toggle_shuffle(&mut self) -> bool {
        self.shuffle = !self.shuffle;
        self.shuffle
    }

    pub fn repeat(&self) -> RepeatMode {
        self.repeat
    }

    pub fn set_repeat(&mut self, mode: RepeatMode) {
        self.repeat = mode;
    }

    pub fn cycle_repeat(&mut self) -> RepeatMode {
        self.repeat = self.repeat.cycle();
        self.repeat
    }

    /// Bind the element to the track at `index` without starting it.
    ///
    /// Rebinding the source the element already holds stops and rewinds it
    /// instead of loading the media again. Does nothing when there is no
    /// such track.
    pub fn load_track(&mut self, queue: &Queue<'_>, index: usize) {
        let Some(track) = queue.get(index) else {
            return;
        };
        let source = track.media_source();
        if self.media.source() == Some(&source) {
            debug!(index, id = %track.id, "rewinding bound track");
            if !self.media.paused() {
                self.media.pause();
            }
            if !self.media.current_time().is_zero() {
                self.media.set_current_time(Duration::ZERO);
            }
        } else {
            debug!(index, id = %track.id, src = %track.src, "loading track");
            self.media.set_source(source);
        }
        self.now_playing = Some(NowPlaying {
            id: track.id,
            title: track.title.clone(),
            artist: track.artist.clone(),
        });
    }

    /// Jump to the first entry of a freshly recomputed list without playing it.
    ///
    /// An empty list unloads the element so no stale track stays bound.
    pub fn reset(&mut self, queue: &Queue<'_>) {
        self.current_index = 0;
        if queue.is_empty() {
            self.media.unload();
            self.now_playing = None;
        } else {
            self.load_track(queue, 0);
        }
    }

    pub fn play(&mut self, queue: &Queue<'_>) {
        if self.media.source().is_none() {
            self.load_track(queue, self.current_index);
        }
        if self.media.source().is_some() {
            self.media.play();
        }
    }

    pub fn pause(&mut self) {
        self.media.pause();
    }

    pub fn toggle_play(&mut self, queue: &Queue<'_>) {
        if self.media.paused() {
            self.play(queue);
        } else {
            self.pause();
        }
    }

    /// Make `index` current, load it and start playing.
    pub fn play_from_index(&mut self, queue: &Queue<'_>, index: usize) {
        if index >= queue.len() {
            return;
        }
        self.current_index = index;
        self.load_track(queue, index);
        self.media.play();
    }

    /// The position "next" moves to, given the list length.
    ///
    /// Shuffle picks uniformly among every other position; a list of one
    /// (or none) stays put.
    pub fn pick_next_index(&self, len: usize) -> usize {
        if self.shuffle {
            if len <= 1 {
                return self.current_index;
            }
            // Draw from the other `len - 1` positions, skipping over the current one.
            let pick = (0..len - 1).choose(&mut rng()).unwrap_or(0);
            if pick >= self.current_index {
                pick + 1
            } else {
                pick
            }
        } else if len == 0 {
            self.current_index
        } else {
            (self.current_index + 1) % len
        }
    }

    pub fn next(&mut self, queue: &Queue<'_>) {
        if queue.is_empty() {
            return;
        }
        let idx = self.pick_next_index(queue.len());
        self.play_from_index(queue, idx);
    }

    /// Always sequential, whatever the shuffle mode.
    pub fn previous(&mut self, queue: &Queue<'_>) {
        if queue.is_empty() {
            return;
        }
        let len = queue.len();
        let idx = (self.current_index + len - 1) % len;
        self.play_from_index(queue, idx);
    }

    /// React to the element playing through to its end.
    pub fn on_ended(&mut self, queue: &Queue<'_>) -> EndOutcome {
        if self.repeat == RepeatMode::One {
            self.media.set_current_time(Duration::ZERO);
            self.media.play();
            return EndOutcome::Restarted;
        }
        if queue.is_empty() {
            self.media.pause();
            return EndOutcome::Stopped;
        }
        if self.repeat == RepeatMode::Off
            && !self.shuffle
            && self.current_index == queue.len() - 1
        {
            self.media.pause();
            return EndOutcome::Stopped;
        }
        self.next(queue);
        EndOutcome::Advanced
    }

    /// Seek to a percentage (0–100) of the duration. No-op while the duration is unknown.
    pub fn seek_percent(&mut self, percent: f64) {
        let Some(duration) = self.known_duration() else {
            return;
        };
        if !percent.is_finite() {
            return;
        }
        let fraction = percent.clamp(0.0, 100.0) / 100.0;
        self.media.set_current_time(duration.mul_f64(fraction));
    }

    /// Move the position by `secs` (negative rewinds), clamped to the track.
    pub fn seek_by(&mut self, secs: i64) {
        let Some(duration) = self.known_duration() else {
            return;
        };
        let current = self.media.current_time();
        let delta = Duration::from_secs(secs.unsigned_abs());
        let target = if secs < 0 {
            current.saturating_sub(delta)
        } else {
            (current + delta).min(duration)
        };
        self.media.set_current_time(target);
    }

    pub fn volume(&self) -> f32 {
        self.media.volume()
    }

    /// Set the linear volume, clamped to `0.0..=1.0`. Returns the applied value.
    pub fn set_volume(&mut self, volume: f32) -> f32 {
        if volume.is_nan() {
            return self.media.volume();
        }
        let v = volume.clamp(0.0, 1.0);
        self.media.set_volume(v);
        v
    }

    pub fn adjust_volume(&mut self, delta: f32) -> f32 {
        self.set_volume(self.media.volume() + delta)
    }

    fn known_duration(&self) -> Option<Duration> {
        self.media.duration().filter(|d| !d.is_zero())
    }
}
