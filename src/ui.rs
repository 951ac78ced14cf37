//! UI rendering helpers for the terminal user interface.
//!
//! `draw` is a pure projection of [`App`]: it reads state and never mutates it.

use ratatui::{
    Frame,
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, ListState, Padding, Paragraph, Widget, Wrap},
};
use std::{collections::BTreeMap, sync::LazyLock, time::Duration};

use crate::app::App;
use crate::audio::Transport;
use crate::config::{ControlsSettings, UiSettings};
use crate::picker::{FileBrowser, PickerMode};

static CONTROLS_MAP: LazyLock<BTreeMap<&'static str, &'static str>> = LazyLock::new(|| {
    let mut map = BTreeMap::new();
    map.insert("j/k", "up/down");
    map.insert("gg/G", "top/bottom");
    map.insert("enter", "play row");
    map.insert("space", "play/pause");
    map.insert("h/l", "prev/next");
    // H/L is filled dynamically from config.
    map.insert("[/]", "speed");
    map.insert("-/+", "volume");
    map.insert("s", "sort");
    map.insert("zz", "follow");
    map.insert("o/a/O", "open/add files, open folder");
    map.insert("q", "quit");
    map
});

/// Render the controls help text, incorporating seek seconds.
fn controls_text(seek_seconds: u64) -> String {
    let order = [
        "j/k", "h/l", "H/L", "enter", "space", "gg/G", "zz", "[/]", "-/+", "s", "o/a/O", "q",
    ];
    order
        .iter()
        .filter_map(|k| {
            if *k == "H/L" {
                Some(format!("[H/L] seek -/+{seek_seconds}s"))
            } else {
                CONTROLS_MAP.get(*k).map(|v| format!("[{k}] {v}"))
            }
        })
        .collect::<Vec<String>>()
        .join(" | ")
}

/// Format a `Duration` as `m:ss`.
fn format_mss(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    width = width.min(r.width.saturating_sub(2)).max(10).min(r.width);
    height = height.min(r.height.saturating_sub(2)).max(5).min(r.height);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}

fn left_padded(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .padding(Padding {
            left: 1,
            right: 0,
            top: 0,
            bottom: 0,
        })
}

/// Half-block album art: each cell paints two pixel rows.
struct AlbumArt<'a> {
    pixels: &'a [Vec<(u8, u8, u8)>],
}

impl Widget for AlbumArt<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let art_rows = self.pixels.len() / 2;
        let art_cols = self.pixels.first().map(|r| r.len()).unwrap_or(0);
        let rows = (area.height as usize).min(art_rows);
        let cols = (area.width as usize).min(art_cols);
        for cy in 0..rows {
            for cx in 0..cols {
                let (tr, tg, tb) = self.pixels[cy * 2][cx];
                let (br, bg, bb) = self.pixels[cy * 2 + 1][cx];
                buf[(area.x + cx as u16, area.y + cy as u16)]
                    .set_char('▀')
                    .set_fg(Color::Rgb(tr, tg, tb))
                    .set_bg(Color::Rgb(br, bg, bb));
            }
        }
    }
}

/// Height of the now-playing panel including borders.
fn now_playing_height<T: Transport>(app: &App<T>, ui: &UiSettings) -> u16 {
    let art = if ui.show_album_art && app.art().is_some() {
        ui.art_rows
    } else {
        0
    };
    art.max(5) + 2
}

fn draw_now_playing<T: Transport>(frame: &mut Frame, area: Rect, app: &App<T>) {
    let block = Block::default().borders(Borders::ALL).title(" now playing ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(track) = app.now_playing() else {
        let hint = Paragraph::new("Nothing playing. Press o to pick files or O to pick a folder.")
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(hint, inner);
        return;
    };

    let mut text_area = inner;
    if let Some(pixels) = app.art() {
        let art_cols = pixels.first().map(|r| r.len() as u16).unwrap_or(0);
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(art_cols + 1), Constraint::Min(1)])
            .split(inner);
        frame.render_widget(AlbumArt { pixels }, cols[0]);
        text_area = cols[1];
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1), Constraint::Length(1)])
        .split(text_area);

    let session = app.session();
    let info = vec![
        Line::from(Span::styled(
            track.title.as_str(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(track.artist.as_str()),
        Line::from(Span::styled(track.format_badge(), Style::default().fg(Color::Cyan))),
    ];
    frame.render_widget(Paragraph::new(info).wrap(Wrap { trim: true }), rows[0]);

    let label = format!(
        "{} / {}",
        format_mss(session.position()),
        format_mss(session.duration())
    );
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::Cyan))
        .ratio(session.progress())
        .label(label);
    frame.render_widget(gauge, rows[1]);

    let icon = if session.is_playing() { "▶" } else { "⏸" };
    let transport_line = format!(
        "{icon}  speed {:.2}x  volume {:.0}%",
        session.rate(),
        session.volume() * 100.0
    );
    frame.render_widget(Paragraph::new(transport_line), rows[2]);
}

fn draw_queue<T: Transport>(frame: &mut Frame, area: Rect, app: &App<T>) {
    let playlist = app.playlist();
    let active = playlist.active_index();
    let tracks = playlist.tracks();

    // Only build ListItems for the visible window, centered on the cursor when possible.
    let total = tracks.len();
    let list_height = area.height.saturating_sub(2) as usize;
    let cursor = app.cursor().min(total.saturating_sub(1));
    let (start, end) = if total <= list_height || list_height == 0 {
        (0, total)
    } else {
        let half = list_height / 2;
        let mut start = cursor.saturating_sub(half);
        if start + list_height > total {
            start = total - list_height;
        }
        (start, start + list_height)
    };

    let items: Vec<ListItem> = tracks[start..end]
        .iter()
        .enumerate()
        .map(|(offset, track)| {
            let index = start + offset;
            let marker = if Some(index) == active { "▶ " } else { "  " };
            let line = format!(
                "{marker}{:>3}. {} - {}  {}",
                index + 1,
                track.title,
                track.artist,
                format_mss(track.duration)
            );
            if Some(index) == active {
                ListItem::new(line).style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            } else {
                ListItem::new(line)
            }
        })
        .collect();

    let title = format!(" Up Next ({}) · sorted by {} ", total, playlist.sort_key().label());
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    let mut state = ListState::default();
    if total > 0 {
        state.select(Some(cursor - start));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_browser(frame: &mut Frame, area: Rect, browser: &FileBrowser) {
    let popup = centered_rect_sized(area.width * 8 / 10, area.height * 8 / 10, area);
    frame.render_widget(Clear, popup);

    let (what, hint) = match browser.mode() {
        PickerMode::Files => ("files", " enter: open/confirm  space: mark  ←: up  esc: cancel "),
        PickerMode::Directory => ("folder", " enter: open  d: pick this folder  ←: up  esc: cancel "),
    };
    let mut title = format!(" pick {what}: {} ", browser.cwd().display());
    if browser.marked_count() > 0 {
        title.push_str(&format!("({} marked) ", browser.marked_count()));
    }

    let items: Vec<ListItem> = browser
        .entries()
        .iter()
        .map(|entry| {
            if entry.is_dir {
                ListItem::new(format!("    {}/", entry.name))
                    .style(Style::default().add_modifier(Modifier::BOLD))
            } else if browser.is_marked(&entry.path) {
                ListItem::new(format!("[x] {}", entry.name))
            } else {
                ListItem::new(format!("[ ] {}", entry.name))
            }
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .title_bottom(hint),
        )
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    if !browser.entries().is_empty() {
        state.select(Some(browser.cursor()));
    }
    frame.render_stateful_widget(list, popup, &mut state);
}

/// Render the entire UI into the provided `frame` using `app` state and settings.
pub fn draw<T: Transport>(
    frame: &mut Frame,
    app: &App<T>,
    ui_settings: &UiSettings,
    controls_settings: &ControlsSettings,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(now_playing_height(app, ui_settings)),
            Constraint::Min(3),
            Constraint::Length(3),
            Constraint::Length(4),
        ])
        .split(frame.area());

    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" hires ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    draw_now_playing(frame, chunks[1], app);
    draw_queue(frame, chunks[2], app);

    let cursor_mode = if app.follow_playback() {
        "CURSOR: Follow"
    } else {
        "CURSOR: Free-roam"
    };
    let mut parts = vec![cursor_mode.to_string()];
    if let Some(dir) = app.current_dir() {
        parts.push(format!("Dir: {}", dir.display()));
    }
    if let Some(msg) = app.status() {
        parts.push(msg.to_string());
    }
    let status = Paragraph::new(parts.join(" • "))
        .block(left_padded(" status "))
        .wrap(Wrap { trim: true });
    frame.render_widget(status, chunks[3]);

    let footer = Paragraph::new(controls_text(controls_settings.seek_seconds))
        .block(left_padded(" controls "))
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[4]);

    if let Some(browser) = app.browser() {
        let area = frame.area();
        draw_browser(frame, area, browser);
    }
}
