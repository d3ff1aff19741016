//! Keyboard bindings: map key events to [`Action`]s and apply them to the app.
//!
//! While a text input (search or open-path) has focus, printable keys edit
//! the input and no shortcut fires.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, Focus};
use crate::playback::MediaElement;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    TogglePlay,
    Play,
    Pause,
    Next,
    Previous,
    VolumeUp,
    VolumeDown,
    /// `-` / `=`: move the volume slider one notch.
    VolumeSlider { up: bool },
    SetVolume(f32),
    /// Jump to a percentage of the track.
    SeekPercent(u8),
    Scrub { forward: bool },
    CursorDown,
    CursorUp,
    PlaySelected,
    FocusSearch,
    FocusOpenPath,
    NextCategory,
    PrevCategory,
    LoadSamples,
    ToggleShuffle,
    CycleRepeat,
    Quit,
    InputChar(char),
    InputBackspace,
    InputSubmit,
    InputCancel,
}

/// The action bound to `key` under the given focus, if any.
pub fn action_for_key(key: KeyEvent, focus: Focus) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }

    if focus != Focus::Playlist {
        return match key.code {
            KeyCode::Esc => Some(Action::InputCancel),
            KeyCode::Enter => Some(Action::InputSubmit),
            KeyCode::Backspace => Some(Action::InputBackspace),
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Action::InputChar(c))
            }
            _ => None,
        };
    }

    let action = match key.code {
        KeyCode::Char(' ') => Action::TogglePlay,
        KeyCode::Left => Action::Previous,
        KeyCode::Right => Action::Next,
        KeyCode::Up => Action::VolumeUp,
        KeyCode::Down => Action::VolumeDown,
        KeyCode::Char('-') => Action::VolumeSlider { up: false },
        KeyCode::Char('=') => Action::VolumeSlider { up: true },
        KeyCode::Char(d @ '0'..='9') => Action::SeekPercent((d as u8 - b'0') * 10),
        KeyCode::Char('H') => Action::Scrub { forward: false },
        KeyCode::Char('L') => Action::Scrub { forward: true },
        KeyCode::Char('j') => Action::CursorDown,
        KeyCode::Char('k') => Action::CursorUp,
        KeyCode::Enter => Action::PlaySelected,
        KeyCode::Char('/') => Action::FocusSearch,
        KeyCode::Char('o') => Action::FocusOpenPath,
        KeyCode::Char('c') => Action::NextCategory,
        KeyCode::Char('C') => Action::PrevCategory,
        KeyCode::Char('m') => Action::LoadSamples,
        KeyCode::Char('s') => Action::ToggleShuffle,
        KeyCode::Char('r') => Action::CycleRepeat,
        KeyCode::Char('q') => Action::Quit,
        _ => return None,
    };
    Some(action)
}

/// Apply `action` to the app. Quitting only raises [`App::should_quit`].
pub fn apply<M: MediaElement>(app: &mut App<M>, action: Action) {
    match action {
        Action::TogglePlay => app.toggle_play(),
        Action::Play => app.play(),
        Action::Pause => app.pause(),
        Action::Next => app.next(),
        Action::Previous => app.previous(),
        Action::VolumeUp => {
            app.volume_up();
        }
        Action::VolumeDown => {
            app.volume_down();
        }
        Action::VolumeSlider { up } => {
            app.nudge_volume_slider(up);
        }
        Action::SetVolume(v) => {
            app.player.set_volume(v);
        }
        Action::SeekPercent(p) => app.seek_percent(f64::from(p)),
        Action::Scrub { forward } => app.scrub(forward),
        Action::CursorDown => app.move_cursor(1),
        Action::CursorUp => app.move_cursor(-1),
        Action::PlaySelected => app.play_selected(),
        Action::FocusSearch => app.focus = Focus::Search,
        Action::FocusOpenPath => {
            app.path_input.clear();
            app.focus = Focus::OpenPath;
        }
        Action::NextCategory => app.cycle_category(true),
        Action::PrevCategory => app.cycle_category(false),
        Action::LoadSamples => {
            app.add_samples();
        }
        Action::ToggleShuffle => {
            let on = app.toggle_shuffle();
            app.set_status(format!("shuffle {}", if on { "on" } else { "off" }));
        }
        Action::CycleRepeat => {
            let mode = app.cycle_repeat();
            app.set_status(format!("repeat {mode}"));
        }
        Action::Quit => app.request_quit(),

        Action::InputChar(c) => match app.focus {
            Focus::Search => app.push_query_char(c),
            Focus::OpenPath => app.path_input.push(c),
            Focus::Playlist => {}
        },
        Action::InputBackspace => match app.focus {
            Focus::Search => app.pop_query_char(),
            Focus::OpenPath => {
                app.path_input.pop();
            }
            Focus::Playlist => {}
        },
        Action::InputSubmit => match app.focus {
            Focus::OpenPath => {
                app.submit_path_input();
            }
            _ => app.focus = Focus::Playlist,
        },
        Action::InputCancel => {
            match app.focus {
                Focus::Search => app.clear_query(),
                Focus::OpenPath => app.path_input.clear(),
                Focus::Playlist => {}
            }
            app.focus = Focus::Playlist;
        }
    }
}
