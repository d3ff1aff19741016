use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use rodio::OutputStreamBuilder;
use tracing::{debug, error, warn};

use crate::library::MediaSource;
use crate::playback::MediaState;

use super::error::MediaError;
use super::sink::{Output, Voice};
use super::source::{fetch_bytes, probe_duration};
use super::types::{AudioCmd, Loaded, PlaybackHandle};

const TICK: Duration = Duration::from_millis(200);

pub(super) fn spawn_audio_thread(
    tx: Sender<AudioCmd>,
    rx: Receiver<AudioCmd>,
    playback_info: PlaybackHandle,
    volume: f32,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut stream = match OutputStreamBuilder::open_default_stream() {
            Ok(s) => s,
            Err(e) => {
                error!(error = %e, "no audio output device, playback disabled");
                return;
            }
        };
        // rodio logs to stderr when OutputStream is dropped. That's useful in debugging,
        // but noisy for a TUI app.
        stream.log_on_drop(false);

        let mut deck = Deck::new(playback_info, volume);

        loop {
            match rx.recv_timeout(TICK) {
                Ok(AudioCmd::Quit { fade_out_ms }) => {
                    deck.quit(fade_out_ms);
                    break;
                }
                Ok(cmd) => deck.handle(cmd, &stream, &tx),
                Err(RecvTimeoutError::Timeout) => deck.tick(),
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
    })
}

fn load_media(source: &MediaSource, cancel: &AtomicBool) -> Result<Loaded, MediaError> {
    let bytes = fetch_bytes(source, cancel)?;
    let duration = probe_duration(&bytes);
    Ok(Loaded {
        bytes: bytes.into(),
        duration,
    })
}

/// Everything the audio thread knows about the bound source.
pub(super) struct Deck<O: Output> {
    info: PlaybackHandle,
    generation: u64,
    state: MediaState,
    source: Option<MediaSource>,
    /// Cancel flag of the fetch still running for `source`.
    fetch: Option<Arc<AtomicBool>>,
    bytes: Option<Arc<[u8]>>,
    duration: Option<Duration>,
    sink: Option<O::Voice>,
    /// Play was requested and not paused since.
    want_play: bool,
    // Track start time and accumulated elapsed when paused.
    started_at: Option<Instant>,
    accumulated: Duration,
    volume: f32,
}

impl<O: Output> Deck<O> {
    pub(super) fn new(info: PlaybackHandle, volume: f32) -> Self {
        Self {
            info,
            generation: 0,
            state: MediaState::Empty,
            source: None,
            fetch: None,
            bytes: None,
            duration: None,
            sink: None,
            want_play: false,
            started_at: None,
            accumulated: Duration::ZERO,
            volume,
        }
    }

    pub(super) fn handle(&mut self, cmd: AudioCmd, out: &O, tx: &Sender<AudioCmd>) {
        match cmd {
            AudioCmd::Load { generation, source } => {
                self.clear(generation);
                self.state = MediaState::Loading;
                debug!(generation, %source, "loading source");
                self.source = Some(source);
                self.start_fetch(tx);
                self.publish();
            }

            AudioCmd::Loaded { generation, result } => {
                if generation != self.generation || self.state != MediaState::Loading {
                    debug!(generation, "dropping stale load result");
                    return;
                }
                self.fetch = None;
                match result {
                    Ok(loaded) => {
                        self.bytes = Some(loaded.bytes);
                        self.duration = loaded.duration;
                        // A seek issued while loading is kept in `accumulated`.
                        if let Some(d) = self.duration {
                            self.accumulated = self.accumulated.min(d);
                        }
                        if self.rebuild_sink(out, self.accumulated) {
                            self.state = MediaState::Ready;
                            if self.want_play {
                                self.start();
                            }
                        }
                    }
                    Err(e) => warn!(error = %e, "could not load media"),
                }
                self.publish();
            }

            AudioCmd::Unload { generation } => {
                self.clear(generation);
                self.publish();
            }

            AudioCmd::Play => {
                self.want_play = true;
                if self.sink.is_some() {
                    if self.state == MediaState::Ended {
                        self.accumulated = Duration::ZERO;
                        self.rebuild_sink(out, Duration::ZERO);
                    }
                    self.start();
                } else if self.state == MediaState::Loading && self.fetch.is_none() {
                    // The last fetch failed; try again.
                    self.start_fetch(tx);
                }
                self.publish();
            }

            AudioCmd::Pause => {
                self.want_play = false;
                if self.state == MediaState::Playing {
                    if let Some(s) = &self.sink {
                        s.pause();
                    }
                    if let Some(st) = self.started_at.take() {
                        self.accumulated += st.elapsed();
                    }
                    self.state = MediaState::Paused;
                }
                self.publish();
            }

            AudioCmd::Seek(pos) => {
                // Scrubbing: rebuild the current sink and skip into the media.
                let pos = match self.duration {
                    Some(d) => pos.min(d),
                    None => pos,
                };
                self.accumulated = pos;
                if self.started_at.is_some() {
                    self.started_at = Some(Instant::now());
                }
                if self.bytes.is_some() && self.rebuild_sink(out, pos) {
                    match self.state {
                        MediaState::Playing => {
                            if let Some(s) = &self.sink {
                                s.play();
                            }
                        }
                        MediaState::Ended => self.state = MediaState::Paused,
                        _ => {}
                    }
                }
                self.publish();
            }

            AudioCmd::SetVolume(v) => {
                self.volume = v;
                if let Some(s) = &self.sink {
                    s.set_volume(v);
                }
            }

            // Handled by the loop.
            AudioCmd::Quit { .. } => {}
        }
    }

    /// Periodic check for the natural end of playback.
    pub(super) fn tick(&mut self) {
        if self.state != MediaState::Playing {
            return;
        }
        let finished = self.sink.as_ref().is_some_and(|s| s.empty());
        if finished {
            self.accumulated = self.duration.unwrap_or_else(|| self.elapsed());
            self.started_at = None;
            self.want_play = false;
            self.state = MediaState::Ended;
            debug!(generation = self.generation, "playback ended");
            if let Ok(mut info) = self.info.lock() {
                info.ended = Some(self.generation);
            }
        }
        self.publish();
    }

    pub(super) fn quit(&mut self, fade_out_ms: u64) {
        self.cancel_fetch();
        if let Some(s) = &self.sink {
            // Fade out gently before stopping.
            fade_out_sink(s, self.volume, fade_out_ms);
            s.stop();
        }
        self.want_play = false;
        if self.state == MediaState::Playing {
            self.state = MediaState::Paused;
        }
        // Update shared state so UI/MPRIS don't keep showing Playing.
        self.publish();
    }

    fn start_fetch(&mut self, tx: &Sender<AudioCmd>) {
        let Some(source) = self.source.clone() else {
            return;
        };
        let cancel = Arc::new(AtomicBool::new(false));
        self.fetch = Some(cancel.clone());

        let generation = self.generation;
        let tx = tx.clone();
        let spawned = thread::Builder::new()
            .name("medley-fetch".into())
            .spawn(move || {
                let result = load_media(&source, &cancel);
                if cancel.load(Ordering::Acquire) {
                    debug!(generation, "fetch cancelled");
                    return;
                }
                let _ = tx.send(AudioCmd::Loaded { generation, result });
            });
        if let Err(e) = spawned {
            warn!(error = %e, "could not start fetch thread");
            self.fetch = None;
        }
    }

    fn cancel_fetch(&mut self) {
        if let Some(flag) = self.fetch.take() {
            flag.store(true, Ordering::Release);
        }
    }

    fn start(&mut self) {
        if let Some(s) = &self.sink {
            s.play();
        }
        if self.started_at.is_none() {
            self.started_at = Some(Instant::now());
        }
        self.state = MediaState::Playing;
    }

    fn clear(&mut self, generation: u64) {
        self.cancel_fetch();
        if let Some(s) = self.sink.take() {
            s.stop();
        }
        self.generation = generation;
        self.state = MediaState::Empty;
        self.source = None;
        self.bytes = None;
        self.duration = None;
        self.want_play = false;
        self.started_at = None;
        self.accumulated = Duration::ZERO;
    }

    fn rebuild_sink(&mut self, out: &O, at: Duration) -> bool {
        if let Some(old) = self.sink.take() {
            old.stop();
        }
        let Some(bytes) = self.bytes.clone() else {
            return false;
        };
        match out.open(bytes, at, self.volume) {
            Ok(sink) => {
                self.sink = Some(sink);
                if self.started_at.is_some() {
                    self.started_at = Some(Instant::now());
                }
                true
            }
            Err(e) => {
                warn!(error = %e, "could not decode media");
                self.bytes = None;
                self.state = MediaState::Loading;
                false
            }
        }
    }

    fn elapsed(&self) -> Duration {
        let e = self.accumulated + self.started_at.map_or(Duration::ZERO, |st| st.elapsed());
        match self.duration {
            Some(d) => e.min(d),
            None => e,
        }
    }

    fn publish(&self) {
        if let Ok(mut info) = self.info.lock() {
            if info.generation != self.generation {
                // The UI already moved on to a newer source.
                return;
            }
            info.state = self.state;
            info.paused = !self.want_play;
            info.elapsed = self.elapsed();
            info.duration = self.duration;
        }
    }
}

fn fade_out_sink(sink: &impl Voice, from: f32, fade_out_ms: u64) {
    if fade_out_ms == 0 {
        sink.set_volume(0.0);
        return;
    }
    let steps: u64 = 20;
    let step_ms = (fade_out_ms / steps).max(1);
    for step in 1..=steps {
        let t = step as f32 / steps as f32;
        sink.set_volume(from * (1.0 - t));
        thread::sleep(Duration::from_millis(step_ms));
    }
    sink.set_volume(0.0);
}
