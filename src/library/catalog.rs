//! Built-in remote tracks: the startup defaults and the "load more" samples.

use super::model::Track;

const SOUNDHELIX: &str = "SoundHelix";

fn soundhelix_url(n: u32) -> String {
    format!("https://www.soundhelix.com/examples/mp3/SoundHelix-Song-{n}.mp3")
}

fn soundhelix(id: u64, n: u32, category: &str) -> Track {
    Track::remote(
        id,
        &format!("SoundHelix Song {n}"),
        SOUNDHELIX,
        &soundhelix_url(n),
        category,
    )
}

/// Tracks every session starts with.
pub fn default_tracks() -> Vec<Track> {
    vec![
        soundhelix(1, 1, "Ambient"),
        soundhelix(2, 2, "Electronic"),
        soundhelix(3, 3, "Acoustic"),
    ]
}

/// Extra remote tracks offered by the "load more samples" action.
///
/// Ids here are placeholders; the store assigns fresh ones on insert.
pub fn sample_tracks() -> Vec<Track> {
    vec![soundhelix(0, 4, "Instrumental"), soundhelix(0, 5, "Ambient")]
}
