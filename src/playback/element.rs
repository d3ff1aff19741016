use std::time::Duration;

use crate::library::MediaSource;

/// Lifecycle of the single playback resource.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum MediaState {
    /// No source bound.
    #[default]
    Empty,
    /// Source bound, media not decodable yet. Fetch or decode failures stay here.
    Loading,
    /// Decoded and positioned, not started.
    Ready,
    Playing,
    Paused,
    /// Played through to the end.
    Ended,
}

/// The one audio output the controller owns.
///
/// Mirrors the small surface of an HTML media element: a bound source,
/// play/pause, a seekable position, a known-or-unknown duration and a
/// linear volume. `play` on an element that is still loading starts
/// playback once loading completes.
pub trait MediaElement {
    /// Bind a new source. Playback stops and the element starts loading.
    fn set_source(&mut self, source: MediaSource);
    /// Drop the bound source, returning to [`MediaState::Empty`].
    fn unload(&mut self);
    fn source(&self) -> Option<&MediaSource>;

    fn play(&mut self);
    fn pause(&mut self);
    /// True unless playback has been requested and not paused or ended since.
    fn paused(&self) -> bool;
    fn state(&self) -> MediaState;

    fn current_time(&self) -> Duration;
    fn set_current_time(&mut self, position: Duration);
    /// `None` until the media's length is known.
    fn duration(&self) -> Option<Duration>;

    fn volume(&self) -> f32;
    fn set_volume(&mut self, volume: f32);

    /// Returns true once for each natural end of playback.
    fn take_ended(&mut self) -> bool;
}
