use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use tracing::debug;

use crate::library::MediaSource;
use crate::playback::{MediaElement, MediaState};

use super::thread::spawn_audio_thread;
use super::types::{AudioCmd, PlaybackHandle, PlaybackInfo};

/// [`MediaElement`] backed by a rodio output on its own thread.
///
/// Commands are fire-and-forget; the shared [`PlaybackInfo`] is updated
/// optimistically here and authoritatively by the audio thread.
pub struct AudioPlayer {
    tx: Sender<AudioCmd>,
    playback: PlaybackHandle,
    source: Option<MediaSource>,
    generation: u64,
    volume: f32,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl AudioPlayer {
    pub fn new(volume: f32) -> Self {
        let (tx, rx) = mpsc::channel::<AudioCmd>();
        let playback_info: PlaybackHandle = Arc::new(Mutex::new(PlaybackInfo {
            paused: true,
            ..PlaybackInfo::default()
        }));
        let volume = volume.clamp(0.0, 1.0);

        let audio_handle = spawn_audio_thread(tx.clone(), rx, playback_info.clone(), volume);

        Self {
            tx,
            playback: playback_info,
            source: None,
            generation: 0,
            volume,
            join: Mutex::new(Some(audio_handle)),
        }
    }

    fn send(&self, cmd: AudioCmd) {
        if self.tx.send(cmd).is_err() {
            debug!("audio thread is gone, dropping command");
        }
    }

    fn update(&self, f: impl FnOnce(&mut PlaybackInfo)) {
        if let Ok(mut info) = self.playback.lock() {
            f(&mut info);
        }
    }

    fn read<T>(&self, f: impl FnOnce(&PlaybackInfo) -> T, fallback: T) -> T {
        match self.playback.lock() {
            Ok(info) => f(&info),
            Err(_) => fallback,
        }
    }

    pub fn quit_softly(&self, fade_out: Duration) {
        self.send(AudioCmd::Quit {
            fade_out_ms: fade_out.as_millis() as u64,
        });

        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }

    fn rebind(&mut self, state: MediaState) -> u64 {
        self.generation += 1;
        let generation = self.generation;
        self.update(|info| {
            *info = PlaybackInfo {
                generation,
                state,
                paused: true,
                ..PlaybackInfo::default()
            };
        });
        generation
    }
}

impl MediaElement for AudioPlayer {
    fn set_source(&mut self, source: MediaSource) {
        let generation = self.rebind(MediaState::Loading);
        self.source = Some(source.clone());
        self.send(AudioCmd::Load { generation, source });
    }

    fn unload(&mut self) {
        let generation = self.rebind(MediaState::Empty);
        self.source = None;
        self.send(AudioCmd::Unload { generation });
    }

    fn source(&self) -> Option<&MediaSource> {
        self.source.as_ref()
    }

    fn play(&mut self) {
        if self.source.is_none() {
            return;
        }
        self.update(|info| info.paused = false);
        self.send(AudioCmd::Play);
    }

    fn pause(&mut self) {
        self.update(|info| {
            info.paused = true;
            if info.state == MediaState::Playing {
                info.state = MediaState::Paused;
            }
        });
        self.send(AudioCmd::Pause);
    }

    fn paused(&self) -> bool {
        self.read(|i| i.paused, true)
    }

    fn state(&self) -> MediaState {
        self.read(|i| i.state, MediaState::Empty)
    }

    fn current_time(&self) -> Duration {
        self.read(|i| i.elapsed, Duration::ZERO)
    }

    fn set_current_time(&mut self, position: Duration) {
        self.update(|info| {
            info.elapsed = match info.duration {
                Some(d) => position.min(d),
                None => position,
            };
        });
        self.send(AudioCmd::Seek(position));
    }

    fn duration(&self) -> Option<Duration> {
        self.read(|i| i.duration, None)
    }

    fn volume(&self) -> f32 {
        self.volume
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
        self.send(AudioCmd::SetVolume(volume));
    }

    fn take_ended(&mut self) -> bool {
        let Ok(mut info) = self.playback.lock() else {
            return false;
        };
        info.ended.take() == Some(self.generation)
    }
}
