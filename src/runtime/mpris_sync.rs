use crate::app::App;
use crate::library::TrackId;
use crate::mpris::{MprisHandle, PlaybackStatus};
use crate::playback::MediaElement;

/// What was last pushed to MPRIS, so metadata is only rebuilt on change.
#[derive(Debug, Default, PartialEq)]
pub struct MprisSnapshot {
    track: Option<TrackId>,
    has_duration: bool,
    status: PlaybackStatus,
    volume: u32,
}

impl MprisSnapshot {
    fn of<M: MediaElement>(app: &App<M>) -> Self {
        let media = app.player.media();
        Self {
            track: app.player.now_playing().map(|np| np.id),
            has_duration: app.current_track().is_some_and(|t| t.duration.is_some()),
            status: PlaybackStatus::from_media(media.state(), media.paused()),
            volume: (app.player.volume() * 100.0).round() as u32,
        }
    }
}

pub fn update_mpris<M: MediaElement>(
    mpris: &MprisHandle,
    app: &App<M>,
    last: &mut Option<MprisSnapshot>,
) {
    mpris.set_position(app.player.media().current_time());

    let snapshot = MprisSnapshot::of(app);
    if last.as_ref() == Some(&snapshot) {
        return;
    }
    mpris.set_track_metadata(app.current_track());
    mpris.set_playback(snapshot.status);
    mpris.set_volume(app.player.volume());
    *last = Some(snapshot);
}
