//! Application model: the single owned session state.
//!
//! `App` owns the track store, the filter and its derived view, the
//! playback controller, the persistence adapter and the bits of view
//! state (cursor, focus, prompt text) the UI draws from.

use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, info};

use crate::config::{ControlsSettings, LibrarySettings};
use crate::filter::{ALL_CATEGORIES, Filter, category_options};
use crate::library::{MediaSource, Track, TrackId, TrackStore, collect_audio_files};
use crate::playback::{EndOutcome, MediaElement, PlaybackController, Queue, RepeatMode};
use crate::storage::PlaylistStorage;

/// Where keyboard input goes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Playlist,
    Search,
    OpenPath,
}

/// The main application model.
pub struct App<M> {
    store: TrackStore,
    filter: Filter,
    categories: Vec<String>,
    filtered: Vec<usize>,
    pub player: PlaybackController<M>,
    storage: PlaylistStorage,

    library: LibrarySettings,
    pub controls: ControlsSettings,

    /// Highlighted row in the filtered list.
    pub cursor: usize,
    pub focus: Focus,
    pub path_input: String,
    status: Option<String>,
    probe_requests: Vec<(TrackId, MediaSource)>,
    quit: bool,
}

impl<M: MediaElement> App<M> {
    /// Create an empty `App`. Call [`App::initialize`] before use.
    pub fn new(
        media: M,
        storage: PlaylistStorage,
        library: LibrarySettings,
        controls: ControlsSettings,
    ) -> Self {
        Self {
            store: TrackStore::new(Vec::new()),
            filter: Filter::default(),
            categories: vec![ALL_CATEGORIES.to_string()],
            filtered: Vec::new(),
            player: PlaybackController::new(media),
            storage,
            library,
            controls,
            cursor: 0,
            focus: Focus::Playlist,
            path_input: String::new(),
            status: None,
            probe_requests: Vec::new(),
            quit: false,
        }
    }

    /// Seed the built-in tracks, merge the saved playlist, fix the category
    /// options and bind the first track.
    pub fn initialize(&mut self) {
        self.store = TrackStore::with_defaults();
        let saved = self.storage.load();
        let merged = self.store.merge_saved(saved);
        info!(
            tracks = self.store.len(),
            restored = merged.len(),
            "library initialized"
        );

        self.categories = category_options(self.store.tracks());
        let all: Vec<TrackId> = self.store.tracks().iter().map(|t| t.id).collect();
        self.request_probes(&all);
        self.apply_filters();
    }

    pub fn tracks(&self) -> &[Track] {
        self.store.tracks()
    }

    /// Store indices of the rows currently shown, in order.
    pub fn filtered(&self) -> &[usize] {
        &self.filtered
    }

    pub fn filtered_tracks(&self) -> impl Iterator<Item = &Track> {
        self.filtered.iter().map(|&i| &self.store.tracks()[i])
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn query(&self) -> &str {
        &self.filter.query
    }

    pub fn category(&self) -> &str {
        &self.filter.category
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status = Some(msg.into());
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn request_quit(&mut self) {
        self.quit = true;
    }

    /// Recompute the filtered view and rebind its first entry without playing.
    pub fn apply_filters(&mut self) {
        self.filtered = self.filter.apply(self.store.tracks());
        self.cursor = 0;
        let queue = Queue::new(self.store.tracks(), &self.filtered);
        self.player.reset(&queue);
        debug!(
            query = %self.filter.query,
            category = %self.filter.category,
            shown = self.filtered.len(),
            "filters applied"
        );
    }

    pub fn push_query_char(&mut self, c: char) {
        self.filter.query.push(c);
        self.apply_filters();
    }

    pub fn pop_query_char(&mut self) {
        if self.filter.query.pop().is_some() {
            self.apply_filters();
        }
    }

    pub fn clear_query(&mut self) {
        if !self.filter.query.is_empty() {
            self.filter.query.clear();
            self.apply_filters();
        }
    }

    /// Select a category. Unknown names are ignored.
    pub fn set_category(&mut self, category: &str) -> bool {
        if !self.categories.iter().any(|c| c == category) {
            return false;
        }
        self.filter.category = category.to_string();
        self.apply_filters();
        true
    }

    /// Step through the category options, wrapping at either end.
    pub fn cycle_category(&mut self, forward: bool) {
        let len = self.categories.len();
        if len == 0 {
            return;
        }
        let pos = self
            .categories
            .iter()
            .position(|c| *c == self.filter.category)
            .unwrap_or(0);
        let next = if forward {
            (pos + 1) % len
        } else {
            (pos + len - 1) % len
        };
        let name = self.categories[next].clone();
        self.set_category(&name);
    }

    /// Append the sample tracks, persist the remote playlist and refilter.
    pub fn add_samples(&mut self) -> usize {
        let added = self.store.add_samples();
        self.storage.save(self.store.remote_tracks());
        self.request_probes(&added);
        self.set_status(match added.len() {
            0 => "samples already loaded".to_string(),
            n => format!("added {n} sample tracks"),
        });
        self.apply_filters();
        added.len()
    }

    /// Append one session-only track per path. Never persisted.
    pub fn add_local_files(&mut self, paths: &[PathBuf]) -> usize {
        if paths.is_empty() {
            return 0;
        }
        let added = self.store.add_local_files(paths);
        self.request_probes(&added);
        self.apply_filters();
        added.len()
    }

    /// Add a file, or every audio file found under a directory.
    pub fn add_local_path(&mut self, path: &Path) -> usize {
        let files = collect_audio_files(path, &self.library);
        if files.is_empty() {
            self.set_status(format!("no audio files at {}", path.display()));
            return 0;
        }
        let n = self.add_local_files(&files);
        self.set_status(format!("added {n} local tracks"));
        n
    }

    /// Add whatever the open-path prompt holds, then leave the prompt.
    pub fn submit_path_input(&mut self) -> usize {
        let raw = std::mem::take(&mut self.path_input);
        self.focus = Focus::Playlist;
        let raw = raw.trim();
        if raw.is_empty() {
            return 0;
        }
        self.add_local_path(&expand_home(raw))
    }

    pub fn play(&mut self) {
        let queue = Queue::new(self.store.tracks(), &self.filtered);
        self.player.play(&queue);
    }

    pub fn pause(&mut self) {
        self.player.pause();
    }

    pub fn toggle_play(&mut self) {
        let queue = Queue::new(self.store.tracks(), &self.filtered);
        self.player.toggle_play(&queue);
    }

    pub fn play_from_index(&mut self, index: usize) {
        let queue = Queue::new(self.store.tracks(), &self.filtered);
        self.player.play_from_index(&queue, index);
        self.follow_current();
    }

    pub fn play_selected(&mut self) {
        self.play_from_index(self.cursor);
    }

    pub fn next(&mut self) {
        let queue = Queue::new(self.store.tracks(), &self.filtered);
        self.player.next(&queue);
        self.follow_current();
    }

    pub fn previous(&mut self) {
        let queue = Queue::new(self.store.tracks(), &self.filtered);
        self.player.previous(&queue);
        self.follow_current();
    }

    /// Dispatch a natural end of playback, if the element reported one.
    pub fn poll_media(&mut self) -> Option<EndOutcome> {
        if !self.player.media_mut().take_ended() {
            return None;
        }
        let queue = Queue::new(self.store.tracks(), &self.filtered);
        let outcome = self.player.on_ended(&queue);
        debug!(?outcome, index = self.player.current_index(), "track ended");
        self.follow_current();
        Some(outcome)
    }

    pub fn seek_percent(&mut self, percent: f64) {
        self.player.seek_percent(percent);
    }

    /// Scrub forwards (`forward`) or backwards by the configured seconds.
    pub fn scrub(&mut self, forward: bool) {
        let secs = self.controls.scrub_seconds as i64;
        self.player.seek_by(if forward { secs } else { -secs });
    }

    pub fn volume_up(&mut self) -> f32 {
        self.player.adjust_volume(self.controls.volume_step)
    }

    pub fn volume_down(&mut self) -> f32 {
        self.player.adjust_volume(-self.controls.volume_step)
    }

    /// The `-` / `=` slider: set the volume directly one slider notch away.
    pub fn nudge_volume_slider(&mut self, up: bool) -> f32 {
        let step = self.controls.volume_slider_step;
        let current = self.player.volume();
        self.player
            .set_volume(if up { current + step } else { current - step })
    }

    pub fn toggle_shuffle(&mut self) -> bool {
        self.player.toggle_shuffle()
    }

    pub fn cycle_repeat(&mut self) -> RepeatMode {
        self.player.cycle_repeat()
    }

    /// Record a probed duration against its track.
    pub fn on_duration_probed(&mut self, id: TrackId, duration: Duration) {
        if !self.store.set_duration(id, duration) {
            debug!(%id, "probe result for unknown track");
        }
    }

    /// Probes asked for since the last call, for the runtime to start.
    pub fn take_probe_requests(&mut self) -> Vec<(TrackId, MediaSource)> {
        std::mem::take(&mut self.probe_requests)
    }

    pub fn move_cursor(&mut self, delta: isize) {
        if self.filtered.is_empty() {
            self.cursor = 0;
            return;
        }
        let max = self.filtered.len() - 1;
        self.cursor = self.cursor.saturating_add_signed(delta).min(max);
    }

    /// The track bound to the element, if it is still in the filtered view.
    pub fn current_track(&self) -> Option<&Track> {
        let idx = *self.filtered.get(self.player.current_index())?;
        self.store.tracks().get(idx)
    }

    fn follow_current(&mut self) {
        if !self.filtered.is_empty() {
            self.cursor = self.player.current_index();
        }
    }

    fn request_probes(&mut self, ids: &[TrackId]) {
        for &id in ids {
            if let Some(track) = self.store.get(id) {
                self.probe_requests.push((id, track.media_source()));
            }
        }
    }
}

fn expand_home(raw: &str) -> PathBuf {
    match (raw.strip_prefix("~/"), env::var_os("HOME")) {
        (Some(rest), Some(home)) => PathBuf::from(home).join(rest),
        _ => PathBuf::from(raw),
    }
}
