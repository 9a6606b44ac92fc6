//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`. It only
//! reads the [`App`]; nothing here talks to the engine.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Padding, Paragraph, Wrap},
};
use std::time::Duration;

use crate::app::{App, InputMode, NowPlaying, Status};
use crate::config::{ControlsSettings, TimeField, UiSettings};
use crate::engine::Position;
use crate::playlist::compose_label;

const LEFT_PAD: Padding = Padding {
    left: 1,
    right: 0,
    top: 0,
    bottom: 0,
};

/// Render the controls help text, incorporating the seek step.
fn controls_text(seek_seconds: u64) -> String {
    [
        "[j/k] up/down".to_string(),
        "[h/l] prev/next".to_string(),
        format!("[H/L] seek -/+{seek_seconds}s"),
        "[enter] play selected".to_string(),
        "[space/p] play/pause".to_string(),
        "[s] stop".to_string(),
        "[a] add".to_string(),
        "[d] remove".to_string(),
        "[gg/G] top/bottom".to_string(),
        "[zz] follow".to_string(),
        "[K] details".to_string(),
        "[q] quit".to_string(),
    ]
    .join(" | ")
}

/// Format a `Duration` as `MM:SS`.
fn format_mmss(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Build the now-playing track text according to `ui` settings.
fn now_playing_track_text(np: &NowPlaying, ui: &UiSettings) -> String {
    compose_label(
        &np.path,
        &np.metadata,
        Some(&np.label),
        &ui.now_playing_track_fields,
        &ui.now_playing_track_separator,
    )
}

/// Build the now-playing time text (elapsed/total/remaining) per `UiSettings`.
fn now_playing_time_text(position: Position, ui: &UiSettings) -> Option<String> {
    let parts: Vec<String> = ui
        .now_playing_time_fields
        .iter()
        .filter_map(|f| match f {
            TimeField::Elapsed => Some(format_mmss(position.elapsed)),
            TimeField::Total => position.total.map(format_mmss),
            TimeField::Remaining => position.remaining().map(|r| format!("-{}", format_mmss(r))),
        })
        .collect();

    (!parts.is_empty()).then(|| parts.join(&ui.now_playing_time_separator))
}

/// Window of `total` rows to show in `height` lines, keeping `selected`
/// centered when possible. Returns `(start, end, selected_in_window)`.
fn visible_window(total: usize, height: usize, selected: usize) -> (usize, usize, usize) {
    if total <= height || height == 0 {
        return (0, total, selected);
    }
    let start = selected.saturating_sub(height / 2).min(total - height);
    (start, start + height, selected - start)
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(width: u16, height: u16, r: Rect) -> Rect {
    let width = width.min(r.width.saturating_sub(2)).max(10);
    let height = height.min(r.height.saturating_sub(2)).max(5);

    Rect {
        x: r.x + (r.width.saturating_sub(width) / 2),
        y: r.y + (r.height.saturating_sub(height) / 2),
        width,
        height,
    }
}

fn or_dash<T: ToString>(v: Option<T>) -> String {
    v.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

/// Details of the selected entry, shown in the popup.
fn details_text(app: &App) -> String {
    let Some(entry) = app.playlist.get(app.selected) else {
        return "No entry selected".to_string();
    };
    let props = &entry.properties;
    let meta = &entry.metadata;
    format!(
        "Title: {}\nArtist: {}\nAlbum: {}\nDuration: {}\nFormat: {} Hz, {} ch\nArtwork: {}\nPath: {}",
        entry.title(),
        or_dash(meta.artist.as_deref()),
        or_dash(meta.album.as_deref()),
        or_dash(props.duration.map(format_mmss)),
        or_dash(props.sample_rate),
        or_dash(props.channels),
        if entry.has_artwork() {
            format!("{} image(s)", meta.artwork.len())
        } else {
            "none".to_string()
        },
        entry.path.display()
    )
}

/// Render the entire UI into the provided `frame` using `app` state and settings.
pub fn draw(
    frame: &mut Frame,
    app: &App,
    position: Position,
    ui_settings: &UiSettings,
    controls_settings: &ControlsSettings,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(5),
            Constraint::Min(1),
            Constraint::Length(4),
        ])
        .split(frame.area());

    let title = match &app.now_playing {
        Some(np) => format!(" segue · {} ", np.title),
        None => " segue ".to_string(),
    };
    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    // Status box
    let mut parts: Vec<String> = vec![
        if app.follow_playback {
            " CURSOR: Follow".to_string()
        } else {
            " CURSOR: Free-roam".to_string()
        },
        app.playback.label().to_string(),
    ];
    if let Some(np) = &app.now_playing {
        let mut song = now_playing_track_text(np, ui_settings);
        if np.has_artwork() {
            song.push_str(" [art]");
        }
        let position = Position {
            total: position.total.or(np.duration),
            ..position
        };
        match now_playing_time_text(position, ui_settings) {
            Some(time) => parts.push(format!("Now: {song} [{time}]")),
            None => parts.push(format!("Now: {song}")),
        }
    }
    parts.push(format!("{} entries", app.playlist.len()));

    let mut status_lines = vec![Line::from(parts.join(" • "))];
    match &app.status {
        Some(Status::Info(msg)) => status_lines.push(Line::from(format!(" {msg}"))),
        Some(Status::Error(msg)) => status_lines.push(Line::from(Span::styled(
            format!(" {msg}"),
            Style::default().fg(Color::Red),
        ))),
        None => {}
    }
    let status_par = Paragraph::new(status_lines)
        .block(Block::bordered().padding(LEFT_PAD).title(" status "))
        .wrap(Wrap { trim: true });
    frame.render_widget(status_par, chunks[1]);

    // Playlist
    {
        let entries = app.playlist.entries();
        let now_playing = app.now_playing_index();
        let (start, end, selected_in_window) =
            visible_window(entries.len(), chunks[2].height as usize, app.selected);

        // Only build items for the visible window.
        let items: Vec<ListItem> = entries[start..end]
            .iter()
            .enumerate()
            .map(|(offset, entry)| {
                if now_playing == Some(start + offset) {
                    ListItem::new(format!("♪ {}", entry.display))
                        .style(Style::default().add_modifier(Modifier::BOLD))
                } else {
                    ListItem::new(format!("  {}", entry.display))
                }
            })
            .collect();

        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(" playlist "))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        let mut state = ListState::default();
        if !entries.is_empty() {
            state.select(Some(selected_in_window));
        }
        frame.render_stateful_widget(list, chunks[2], &mut state);
    }

    // Details popup over the list
    if app.details_window {
        let popup_area = centered_rect_sized(72, 10, chunks[2]);
        frame.render_widget(Clear, popup_area);
        let details = Paragraph::new(details_text(app))
            .block(
                Block::default()
                    .padding(LEFT_PAD)
                    .borders(Borders::ALL)
                    .title(" details (K closes) "),
            )
            .wrap(Wrap { trim: true });
        frame.render_widget(details, popup_area);
    }

    let footer = match &app.input {
        InputMode::AddPath(buf) => Paragraph::new(format!("{buf}_")).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" add file or directory (enter adds, esc cancels) ")
                .padding(LEFT_PAD),
        ),
        InputMode::Normal => Paragraph::new(controls_text(controls_settings.seek_seconds))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" controls ")
                    .padding(LEFT_PAD),
            )
            .wrap(Wrap { trim: true }),
    };
    frame.render_widget(footer, chunks[3]);
}
