use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{debug, trace};

use crate::app::App;
use crate::audio::ProbeSet;
use crate::config;
use crate::input::{self, Action, action_for_key};
use crate::mpris::{ControlCmd, MprisHandle};
use crate::playback::MediaElement;
use crate::runtime::mpris_sync::{MprisSnapshot, update_mpris};
use crate::ui;

const KEY_POLL: Duration = Duration::from_millis(50);

/// Translate an MPRIS request into the same action a key press would produce.
pub fn action_for_control(cmd: ControlCmd) -> Action {
    match cmd {
        ControlCmd::Quit => Action::Quit,
        ControlCmd::Play => Action::Play,
        ControlCmd::Pause | ControlCmd::Stop => Action::Pause,
        ControlCmd::PlayPause => Action::TogglePlay,
        ControlCmd::Next => Action::Next,
        ControlCmd::Prev => Action::Previous,
        ControlCmd::SetVolume(v) => Action::SetVolume(v as f32),
    }
}

/// Main terminal event loop: media events, probe results, MPRIS, drawing
/// and input. Returns `Ok(())` when shutdown is requested.
pub fn run<M: MediaElement>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App<M>,
    probes: &mut ProbeSet,
    mpris: &MprisHandle,
    control_rx: &mpsc::Receiver<ControlCmd>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut last_mpris: Option<MprisSnapshot> = None;

    loop {
        if let Some(outcome) = app.poll_media() {
            trace!(?outcome, "media ended");
        }

        for (id, duration) in probes.drain() {
            app.on_duration_probed(id, duration);
        }
        for (id, source) in app.take_probe_requests() {
            probes.spawn(id, source);
        }

        update_mpris(mpris, app, &mut last_mpris);

        terminal.draw(|f| ui::draw(f, app, &settings.ui, &settings.controls))?;

        while let Ok(cmd) = control_rx.try_recv() {
            debug!(?cmd, "MPRIS command");
            input::apply(app, action_for_control(cmd));
        }
        if app.should_quit() {
            break;
        }

        if event::poll(KEY_POLL)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if let Some(action) = action_for_key(key, app.focus) {
                        input::apply(app, action);
                    }
                }
            }
        }
        if app.should_quit() {
            break;
        }
    }

    Ok(())
}
