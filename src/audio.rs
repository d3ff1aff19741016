//! The rodio-backed media element and the duration probes.
//!
//! Decoding and output run on a dedicated thread driven over a command
//! channel; the UI side only sees the [`MediaElement`](crate::playback::MediaElement)
//! surface of [`AudioPlayer`].

mod error;
mod player;
mod probe;
mod sink;
mod source;
mod thread;
mod types;

pub use player::AudioPlayer;
pub use probe::ProbeSet;
