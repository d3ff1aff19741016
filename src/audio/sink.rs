//! Building `rodio` sinks from fetched media.

use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

use rodio::{Decoder, OutputStream, Sink, Source};

use super::error::MediaError;

/// Where the audio thread sends decoded media.
pub(super) trait Output {
    type Voice: Voice;

    /// A paused voice over `bytes` that starts playback at `start_at`.
    fn open(
        &self,
        bytes: Arc<[u8]>,
        start_at: Duration,
        volume: f32,
    ) -> Result<Self::Voice, MediaError>;
}

/// One playing (or paused) source on an [`Output`].
pub(super) trait Voice {
    fn play(&self);
    fn pause(&self);
    fn stop(&self);
    fn set_volume(&self, volume: f32);
    /// True once everything appended has been played.
    fn empty(&self) -> bool;
}

impl Output for OutputStream {
    type Voice = Sink;

    fn open(
        &self,
        bytes: Arc<[u8]>,
        start_at: Duration,
        volume: f32,
    ) -> Result<Sink, MediaError> {
        create_sink_at(self, bytes, start_at, volume)
    }
}

impl Voice for Sink {
    fn play(&self) {
        Sink::play(self);
    }

    fn pause(&self) {
        Sink::pause(self);
    }

    fn stop(&self) {
        Sink::stop(self);
    }

    fn set_volume(&self, volume: f32) {
        Sink::set_volume(self, volume);
    }

    fn empty(&self) -> bool {
        Sink::empty(self)
    }
}

/// Create a paused `Sink` over `bytes` that starts playback at `start_at`.
fn create_sink_at(
    stream: &OutputStream,
    bytes: Arc<[u8]>,
    start_at: Duration,
    volume: f32,
) -> Result<Sink, MediaError> {
    let source = Decoder::new(Cursor::new(bytes))
        .map_err(|e| MediaError::Decode(e.to_string()))?
        // `skip_duration` is our seeking primitive; even Duration::ZERO is fine.
        .skip_duration(start_at);

    let sink = Sink::connect_new(stream.mixer());
    sink.set_volume(volume);
    sink.append(source);
    sink.pause();
    Ok(sink)
}
