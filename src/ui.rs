//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, ListState, Padding, Paragraph, Wrap},
};
use std::{collections::BTreeMap, sync::LazyLock, time::Duration};

use crate::app::{App, Focus, GenState, InputMode, PlaybackState, StatusKind};
use crate::config::{ControlsSettings, UiSettings};

static CONTROLS_MAP: LazyLock<BTreeMap<String, String>> = LazyLock::new(|| {
    let mut map: BTreeMap<String, String> = BTreeMap::new();
    map.insert("i".to_string(), "edit prompt".to_string());
    map.insert("g".to_string(), "generate".to_string());
    map.insert("tab".to_string(), "tracks/prompts".to_string());
    map.insert("j/k".to_string(), "up/down".to_string());
    map.insert("enter".to_string(), "play / use prompt".to_string());
    map.insert("space/p".to_string(), "play/pause".to_string());
    map.insert("h/l".to_string(), "prev/next track".to_string());
    // H/L and +/- are filled dynamically from config.
    map.insert("r".to_string(), "random prompt".to_string());
    map.insert("1-8/t".to_string(), "add tag/next tags".to_string());
    map.insert("c".to_string(), "clear prompt".to_string());
    map.insert("d".to_string(), "delete track".to_string());
    map.insert("q".to_string(), "quit".to_string());
    map
});

/// Render the controls help text, incorporating scrub seconds and volume step.
fn controls_text(controls: &ControlsSettings) -> String {
    let order = [
        "i", "g", "tab", "j/k", "enter", "space/p", "h/l", "H/L", "+/-", "r", "1-8/t", "c", "d",
        "q",
    ];
    order
        .iter()
        .filter_map(|k| match *k {
            "H/L" => Some(format!("[H/L] scrub -/+{}s", controls.scrub_seconds)),
            "+/-" => Some(format!("[+/-] volume ±{}", controls.volume_step)),
            _ => CONTROLS_MAP.get(*k).map(|v| format!("[{}] {}", k, v)),
        })
        .collect::<Vec<String>>()
        .join(" | ")
}

/// Format a `Duration` as `MM:SS`.
fn format_mmss(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// One line per tag of the current set, numbered the way the keys pick them.
fn tags_text(tags: &[String]) -> String {
    tags.iter()
        .enumerate()
        .map(|(i, t)| format!("[{}] {}", i + 1, t))
        .collect::<Vec<String>>()
        .join("  ")
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(5);

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

fn status_text(app: &App) -> String {
    let mut parts: Vec<String> = Vec::new();

    match (&app.generation, app.generating_for()) {
        (GenState::Generating { prompt, .. }, Some(running)) => {
            parts.push(format!("GEN: \"{}\" ({})", prompt, format_mmss(running)))
        }
        _ => parts.push("GEN: idle".to_string()),
    }

    let playback = match app.playback {
        PlaybackState::Stopped => "Stopped".to_string(),
        PlaybackState::Playing | PlaybackState::Paused => {
            let state = if app.playback == PlaybackState::Playing {
                "Playing"
            } else {
                "Paused"
            };
            match app.now_playing_index().and_then(|i| app.tracks.get(i)) {
                Some(track) => format!("{}: {}", state, track.name),
                None => state.to_string(),
            }
        }
    };
    parts.push(playback);
    parts.push(format!("Vol: {}%", app.volume));
    parts.push(format!("Dir: {}", app.track_dir().display()));

    parts.join(" • ")
}

/// Render the entire UI into the provided `frame` using `app` state and settings.
pub fn draw(
    frame: &mut Frame,
    app: &App,
    ui_settings: &UiSettings,
    controls_settings: &ControlsSettings,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Min(3),
            Constraint::Length(3),
            Constraint::Length(4),
        ])
        .split(frame.area());

    // Header
    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" cadenza ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    // Prompt field
    let editing = app.mode == InputMode::Editing;
    let prompt_title = if editing {
        " prompt (enter generates, esc leaves) "
    } else {
        " prompt "
    };
    let mut prompt_block = left_padded(prompt_title);
    if editing {
        prompt_block = prompt_block.border_style(Style::default().fg(Color::Yellow));
    }
    let prompt = if app.input.is_empty() && !editing {
        Paragraph::new("press i to type a prompt").dim()
    } else {
        Paragraph::new(app.input.as_str())
    };
    frame.render_widget(prompt.block(prompt_block), chunks[1]);
    if editing {
        let area = chunks[1];
        let inner_width = area.width.saturating_sub(3);
        let typed = app.input.chars().count().min(inner_width as usize) as u16;
        frame.set_cursor_position((area.x + 2 + typed, area.y + 1));
    }

    // Tags
    let tags_title = format!(
        " tags {}/{} (t: next set) ",
        app.tag_set + 1,
        app.tag_sets.len().max(1)
    );
    let tags = Paragraph::new(tags_text(app.current_tags())).block(left_padded(&tags_title));
    frame.render_widget(tags, chunks[2]);

    // Status box
    let mut status_lines = vec![status_text(app)];
    if let Some(line) = &app.status {
        status_lines.push(line.text.clone());
    }
    let mut status_par = Paragraph::new(status_lines.join("\n"))
        .block(left_padded(" status "))
        .wrap(Wrap { trim: true });
    status_par = match app.status.as_ref().map(|s| &s.kind) {
        Some(StatusKind::Error) => status_par.fg(Color::Red),
        Some(StatusKind::Hint) => status_par.fg(Color::Yellow),
        _ if app.is_generating() => status_par.slow_blink(),
        _ => status_par,
    };
    frame.render_widget(status_par, chunks[3]);

    // Track and prompt lists
    let lists = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(chunks[4]);

    let playing = app.now_playing_index();
    let track_items: Vec<ListItem> = app
        .tracks
        .iter()
        .enumerate()
        .map(|(i, t)| {
            let marker = if Some(i) == playing { "♪ " } else { "  " };
            let length = t.duration.map(format_mmss).unwrap_or_else(|| "--:--".to_string());
            ListItem::new(format!("{}{}  {}", marker, t.name, length))
        })
        .collect();
    render_list(
        frame,
        lists[0],
        track_items,
        " tracks ",
        app.selected_track,
        app.focus == Focus::Tracks,
    );

    let prompt_items: Vec<ListItem> = app
        .prompts
        .iter()
        .map(|p| ListItem::new(p.as_str()))
        .collect();
    render_list(
        frame,
        lists[1],
        prompt_items,
        " prompts ",
        app.selected_prompt,
        app.focus == Focus::Prompts,
    );

    // Position within the current track
    let (elapsed, total) = app
        .playback_handle
        .as_ref()
        .and_then(|h| h.lock().ok().map(|info| info.elapsed))
        .filter(|_| app.playback != PlaybackState::Stopped)
        .map(|elapsed| {
            let total = app
                .now_playing_index()
                .and_then(|i| app.tracks.get(i))
                .and_then(|t| t.duration);
            (elapsed, total)
        })
        .unwrap_or((Duration::ZERO, None));
    let ratio = match total {
        Some(t) if !t.is_zero() => (elapsed.as_secs_f64() / t.as_secs_f64()).clamp(0.0, 1.0),
        _ => 0.0,
    };
    let label = match total {
        Some(t) => format!("{} / {}", format_mmss(elapsed), format_mmss(t)),
        None => format_mmss(elapsed),
    };
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(" position "))
        .gauge_style(Style::default().fg(Color::Cyan))
        .ratio(ratio)
        .label(label);
    frame.render_widget(gauge, chunks[5]);

    let footer = Paragraph::new(controls_text(controls_settings))
        .block(left_padded(" controls "))
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[6]);

    if app.mode == InputMode::ConfirmDelete {
        let popup_area = centered_rect_sized(48, 5, chunks[4]);
        frame.render_widget(Clear, popup_area);

        let name = app
            .tracks
            .get(app.selected_track)
            .map(|t| t.name.as_str())
            .unwrap_or("-");
        let question = Paragraph::new(format!("Delete {}?\n[y] yes   [n] no", name))
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Red))
                    .title(" delete "),
            );
        frame.render_widget(question, popup_area);
    }
}

fn render_list(
    frame: &mut Frame,
    area: Rect,
    items: Vec<ListItem>,
    title: &str,
    selected: usize,
    focused: bool,
) {
    let has_items = !items.is_empty();
    let mut block = Block::default().borders(Borders::ALL).title(title);
    if focused {
        block = block.border_style(Style::default().add_modifier(Modifier::BOLD));
    }
    let highlight = if focused {
        Style::default().add_modifier(Modifier::REVERSED)
    } else {
        Style::default().add_modifier(Modifier::UNDERLINED)
    };
    let list = List::new(items)
        .block(block)
        .highlight_style(highlight)
        .highlight_symbol("> ");

    let mut state = ListState::default();
    if has_items {
        state.select(Some(selected));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

#[cfg(test)]
mod tests;
