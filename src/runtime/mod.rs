use std::env;
use std::sync::mpsc;
use std::time::Duration;

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::info;

use crate::app::App;
use crate::audio::{AudioPlayer, ProbeSet};
use crate::mpris::ControlCmd;

mod event_loop;
mod logging;
mod mpris_sync;
mod settings;
mod startup;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = settings::load_settings();
    let log_file = logging::init(&settings);
    info!(
        version = env!("CARGO_PKG_VERSION"),
        log = ?log_file,
        "medley starting"
    );

    let storage = startup::open_storage(&settings);
    let player = AudioPlayer::new(settings.playback.volume);
    let mut app = App::new(
        player,
        storage,
        settings.library.clone(),
        settings.controls.clone(),
    );
    app.initialize();
    startup::apply_playback_defaults(&mut app, &settings);
    let opened = startup::add_cli_paths(&mut app, env::args_os().skip(1));
    if opened > 0 {
        info!(tracks = opened, "opened paths from the command line");
    }

    let (control_tx, control_rx) = mpsc::channel::<ControlCmd>();
    let mpris = crate::mpris::spawn_mpris(control_tx);
    let mut probes = ProbeSet::new();

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result = event_loop::run(
        &mut terminal,
        &settings,
        &mut app,
        &mut probes,
        &mpris,
        &control_rx,
    );

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if probes.pending() > 0 {
        info!(pending = probes.pending(), "cancelling duration probes");
    }
    probes.cancel_all();
    app.player
        .media()
        .quit_softly(Duration::from_millis(settings.audio.quit_fade_out_ms));
    info!("medley stopped");

    run_result
}
