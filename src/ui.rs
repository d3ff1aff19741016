//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`. It
//! only reads state; everything shown comes from [`crate::view`].

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Gauge, Padding, Paragraph, Row, Table, TableState, Wrap},
};

use crate::app::{App, Focus};
use crate::config::{ControlsSettings, UiSettings};
use crate::playback::MediaElement;
use crate::view::{PlaylistRow, playlist_rows, transport};

const CONTROLS: [(&str, &str); 14] = [
    ("space", "play/pause"),
    ("←/→", "prev/next"),
    ("↑/↓", "volume"),
    ("-/=", "volume slider"),
    ("0-9", "seek %"),
    ("j/k", "cursor"),
    ("enter", "play selected"),
    ("/", "search"),
    ("c/C", "category"),
    ("o", "open path"),
    ("m", "more samples"),
    ("s", "shuffle"),
    ("r", "repeat"),
    ("q", "quit"),
];

/// Render the controls help text, incorporating scrub seconds.
fn controls_text(scrub_seconds: u64) -> String {
    let mut parts: Vec<String> = CONTROLS
        .iter()
        .map(|(k, v)| format!("[{k}] {v}"))
        .collect();
    // Scrub sits next to seek.
    parts.insert(5, format!("[H/L] scrub -/+{scrub_seconds}s"));
    parts.join(" | ")
}

fn padded() -> Padding {
    Padding {
        left: 1,
        right: 0,
        top: 0,
        bottom: 0,
    }
}

/// Render the entire UI into the provided `frame` using `app` state and settings.
pub fn draw<M: MediaElement>(
    frame: &mut Frame,
    app: &App<M>,
    ui_settings: &UiSettings,
    controls_settings: &ControlsSettings,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(5),
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(4),
        ])
        .split(frame.area());

    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" medley ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    draw_transport(frame, app, chunks[1]);
    draw_filters(frame, app, chunks[2]);
    draw_playlist(frame, app, chunks[3]);

    let footer_text = match app.focus {
        Focus::Playlist => controls_text(controls_settings.scrub_seconds),
        Focus::Search => "typing filters the list | [enter] done | [esc] clear".to_string(),
        Focus::OpenPath => {
            format!("open: {}_  | [enter] add | [esc] cancel", app.path_input)
        }
    };
    let footer = Paragraph::new(footer_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(match app.status() {
                    Some(msg) => format!(" {msg} "),
                    None => " controls ".to_string(),
                })
                .padding(padded()),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[4]);
}

fn draw_transport<M: MediaElement>(frame: &mut Frame, app: &App<M>, area: Rect) {
    let t = transport(app);
    let block = Block::bordered().padding(padded()).title(" now playing ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner);

    let mut title = vec![Span::from(t.title).bold()];
    if !t.artist.is_empty() {
        title.push(Span::raw(" - "));
        title.push(Span::raw(t.artist));
    }
    frame.render_widget(Paragraph::new(Line::from(title)), rows[0]);

    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::Cyan))
        .ratio(t.ratio)
        .label(format!("{} / {}", t.elapsed, t.total));
    frame.render_widget(gauge, rows[1]);

    let modes = format!(
        "{} • Volume: {}% • Shuffle: {} • Repeat: {}",
        t.state,
        t.volume_percent,
        if t.shuffle { "ON" } else { "OFF" },
        t.repeat
    );
    frame.render_widget(Paragraph::new(modes), rows[2]);
}

fn draw_filters<M: MediaElement>(frame: &mut Frame, app: &App<M>, area: Rect) {
    let searching = app.focus == Focus::Search;
    let query = if searching {
        format!("{}_", app.query())
    } else {
        app.query().to_string()
    };
    let categories: Vec<Span> = app
        .categories()
        .iter()
        .map(|c| {
            let span = Span::raw(format!(" {c} "));
            if c == app.category() {
                span.reversed()
            } else {
                span
            }
        })
        .collect();

    let mut line = vec![Span::raw("Search: "), Span::raw(query)];
    line.push(Span::raw("   Category:"));
    line.extend(categories);

    let style = if searching {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let par = Paragraph::new(Line::from(line)).block(
        Block::bordered()
            .padding(padded())
            .border_style(style)
            .title(" filter "),
    );
    frame.render_widget(par, area);
}

fn row_cells(row: &PlaylistRow) -> Row<'static> {
    let mut title = vec![Span::raw(row.title.clone())];
    if row.local {
        title.push(Span::raw(" (local)").italic().dim());
    }
    let marker = if row.active { "▶" } else { " " };
    let r = Row::new(vec![
        Cell::from(marker),
        Cell::from(Line::from(title)),
        Cell::from(row.subtitle.clone()),
        Cell::from(Line::from(row.duration.clone()).alignment(Alignment::Right)),
    ]);
    if row.active {
        r.style(Style::default().add_modifier(Modifier::BOLD))
    } else {
        r
    }
}

fn draw_playlist<M: MediaElement>(frame: &mut Frame, app: &App<M>, area: Rect) {
    let rows = playlist_rows(app);
    let total = rows.len();
    let table = Table::new(
        rows.iter().map(row_cells),
        [
            Constraint::Length(2),
            Constraint::Percentage(50),
            Constraint::Percentage(40),
            Constraint::Length(6),
        ],
    )
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" tracks ({total}) ")),
    )
    .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
    .highlight_symbol("> ");

    let mut state = TableState::default();
    if total > 0 {
        state.select(Some(app.cursor.min(total - 1)));
    }
    frame.render_stateful_widget(table, area, &mut state);
}
