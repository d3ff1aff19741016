//! Application module: exposes the app model used by the TUI and runtime.
//!
//! The `App` model lives in `app::model` and holds the track store, the
//! filtered view, the playback controller and the view state.

mod model;

pub use model::*;
