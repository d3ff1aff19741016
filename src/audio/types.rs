//! Commands and shared state of the audio thread.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::library::MediaSource;
use crate::playback::MediaState;

use super::error::MediaError;

/// Media fetched and measured off the audio thread.
pub(super) struct Loaded {
    pub bytes: Arc<[u8]>,
    pub duration: Option<Duration>,
}

pub(super) enum AudioCmd {
    /// Bind a new source. `generation` tags the matching [`AudioCmd::Loaded`].
    Load { generation: u64, source: MediaSource },
    /// Result of the fetch started by `Load`; stale generations are dropped.
    Loaded {
        generation: u64,
        result: Result<Loaded, MediaError>,
    },
    Unload { generation: u64 },
    Play,
    Pause,
    Seek(Duration),
    SetVolume(f32),
    /// Quit the audio thread, fading out over `fade_out_ms` milliseconds.
    Quit { fade_out_ms: u64 },
}

/// Playback information shared between the audio thread and the UI.
#[derive(Debug, Clone, Default)]
pub(super) struct PlaybackInfo {
    /// Source generation the UI side last bound; older publishes are ignored.
    pub generation: u64,
    pub state: MediaState,
    pub paused: bool,
    pub elapsed: Duration,
    pub duration: Option<Duration>,
    /// Generation that played to its end, cleared by the reader.
    pub ended: Option<u64>,
}

pub(super) type PlaybackHandle = Arc<Mutex<PlaybackInfo>>;
