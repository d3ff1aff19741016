//! Track library: the track model, the session's track store and local
//! file discovery for the open-path prompt.

mod catalog;
mod model;
mod scan;
mod store;

pub use model::*;
pub use scan::collect_audio_files;
pub use store::TrackStore;
