//! Terminal UI rendering for the taskdeck TUI.
//!
//! Design philosophy:
//! - Minimal chrome: no box drawing, no ASCII borders, no decorative labels
//! - Whitespace as structure: indentation and spacing create hierarchy
//! - Grayscale palette; selection uses the REVERSED modifier to adapt to
//!   the terminal theme
//! - Scrolloff navigation: selection stays centered, content flows past
//!
//! This module renders from RenderState (immutable snapshot) - it never
//! mutates application state. This enables the decoupled game loop.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph},
    Frame,
};

use crate::render::{RenderState, RowKind, RowView};
use crate::tea::{InputKind, Mode, Notification, NotificationLevel};

// Color tokens (selection uses REVERSED modifier to adapt to terminal theme)
const COLOR_TEXT_DIMMED: Color = Color::Gray;
const COLOR_TEXT_MUTED: Color = Color::DarkGray;

// -----------------------------------------------------------------------------
// Context-sensitive keymap system
// -----------------------------------------------------------------------------

/// Context for determining which keybindings to display.
/// Derived from RenderState - this is the "view model" for the statusbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeymapContext {
    /// Normal list browsing - shows navigation and task actions
    List { has_tasks: bool },
    /// Text input mode (task title, subtask title)
    TextInput,
}

impl KeymapContext {
    /// Derive keymap context from render state.
    pub fn from_render_state(state: &RenderState) -> Self {
        match state.mode {
            Mode::Input(_) => KeymapContext::TextInput,
            Mode::List => KeymapContext::List {
                has_tasks: !state.rows.is_empty(),
            },
        }
    }
}

/// A single keybinding entry for display.
struct Keybinding(&'static str, &'static str);

/// A group of related keybindings (separated by │).
struct KeybindingGroup(Vec<Keybinding>);

/// Get keybindings for a given context.
fn keybindings_for_context(ctx: KeymapContext) -> Vec<KeybindingGroup> {
    match ctx {
        KeymapContext::List { has_tasks } => {
            let task_actions = if has_tasks {
                vec![
                    Keybinding("Space", "toggle"),
                    Keybinding("Enter", "expand"),
                    Keybinding("a", "subtask"),
                ]
            } else {
                vec![]
            };

            vec![
                KeybindingGroup(vec![Keybinding("n", "new"), Keybinding("r", "refresh")]),
                KeybindingGroup(task_actions),
                KeybindingGroup(vec![Keybinding("q", "quit")]),
            ]
        }
        KeymapContext::TextInput => vec![KeybindingGroup(vec![
            Keybinding("Enter", "submit"),
            Keybinding("Esc", "cancel"),
        ])],
    }
}

/// Main render function - entry point for all UI drawing.
/// Takes an immutable RenderState snapshot.
pub fn draw(frame: &mut Frame, state: &RenderState) {
    render_main_layout(frame, state);

    // Render notification if present
    if let Some(ref notification) = state.notification {
        render_notification(frame, notification, frame.area());
    }
}

/// Render the main layout: header + task list + status bar.
fn render_main_layout(frame: &mut Frame, state: &RenderState) {
    let area = frame.area();

    if area.height < 3 {
        render_task_list(frame, state, area);
        return;
    }

    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .split(area);

    render_header(frame, state, chunks[0]);
    render_task_list(frame, state, chunks[1]);
    render_statusbar(frame, state, chunks[2]);
}

/// Render the header line: title, completion count, and a LOADING badge
/// on the right while a request is in flight.
fn render_header(frame: &mut Frame, state: &RenderState, area: Rect) {
    let total = state
        .rows
        .iter()
        .filter(|row| matches!(row.kind, RowKind::Task { .. }))
        .count();
    let done = state
        .rows
        .iter()
        .filter(|row| matches!(row.kind, RowKind::Task { .. }) && row.done)
        .count();

    let mut spans: Vec<Span> = vec![Span::styled(
        "Tasks",
        Style::default().add_modifier(Modifier::BOLD),
    )];

    if total > 0 {
        spans.push(Span::styled(
            format!("  {}/{} done", done, total),
            Style::default().fg(COLOR_TEXT_MUTED),
        ));
    }

    // Add LOADING badge on the right side while a request is in flight
    if state.loading {
        let badge = " LOADING ";
        let badge_len = badge.len();

        // Calculate current content width
        let content_width: usize = spans.iter().map(|s| s.content.chars().count()).sum();

        // Calculate spacer to right-align the badge
        let spacer_width = (area.width as usize)
            .saturating_sub(content_width)
            .saturating_sub(badge_len);

        if spacer_width > 0 {
            spans.push(Span::raw(" ".repeat(spacer_width)));
        }

        // Caution sign colorscheme: black text on yellow background
        spans.push(Span::styled(
            badge,
            Style::default().fg(Color::Black).bg(Color::Yellow),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Render the task list with scrolloff navigation.
fn render_task_list(frame: &mut Frame, state: &RenderState, area: Rect) {
    if state.rows.is_empty() {
        let text = if state.loading {
            "Loading tasks..."
        } else {
            "No tasks. Press 'n' to create one."
        };
        let msg = Line::from(Span::styled(
            text,
            Style::default().fg(COLOR_TEXT_DIMMED),
        ));
        frame.render_widget(Paragraph::new(msg), area);
        return;
    }

    let content_height = area.height as usize;

    // Scrolloff implementation: keep selection centered
    let center = content_height / 2;
    let start = state.selected.saturating_sub(center);
    let end = (start + content_height).min(state.rows.len());
    let start = end.saturating_sub(content_height);

    let lines: Vec<Line> = state
        .rows
        .iter()
        .enumerate()
        .skip(start)
        .take(content_height)
        .map(|(idx, row)| render_row(row, idx == state.selected, area.width))
        .collect();

    frame.render_widget(Paragraph::new(lines), area);
}

/// Render a single row.
/// Task rows carry an expansion marker and a subtask completion count;
/// subtask rows are indented under their parent.
fn render_row(row: &RowView, is_selected: bool, width: u16) -> Line<'static> {
    let checkbox = if row.done { "[x] " } else { "[ ] " };

    let (prefix, suffix) = match row.kind {
        RowKind::Task {
            expanded,
            sub_done,
            sub_total,
        } => {
            let marker = if sub_total == 0 {
                "  "
            } else if expanded {
                "▾ "
            } else {
                "▸ "
            };
            let suffix = if sub_total > 0 {
                format!(" ({}/{})", sub_done, sub_total)
            } else {
                String::new()
            };
            (marker, suffix)
        }
        RowKind::Sub => ("    ", String::new()),
    };

    let (row_style, suffix_style) = if is_selected {
        let selected = Style::default().add_modifier(Modifier::REVERSED);
        (selected, selected)
    } else if row.done {
        let dimmed = Style::default().fg(COLOR_TEXT_DIMMED);
        (dimmed, dimmed)
    } else {
        (Style::default(), Style::default().fg(COLOR_TEXT_MUTED))
    };

    let fixed = prefix.chars().count() + checkbox.len() + suffix.chars().count();
    let title = truncate(&row.title, (width as usize).saturating_sub(fixed));

    Line::from(vec![
        Span::styled(prefix, row_style),
        Span::styled(checkbox, row_style),
        Span::styled(title, row_style),
        Span::styled(suffix, suffix_style),
    ])
}

/// Render the status bar - single bottom line with conditional display.
/// Shows either:
/// - Input prompt (when in Input mode - no '?' shown)
/// - "?" indicator only (when keymap is collapsed)
/// - "? │ <full keymap>" (when keymap is expanded via '?' toggle)
fn render_statusbar(frame: &mut Frame, state: &RenderState, area: Rect) {
    let line = match state.mode {
        Mode::Input(kind) => render_input_line(state, kind),
        _ => render_keymap_line(state),
    };
    frame.render_widget(Paragraph::new(line), area);
}

/// Render keybindings legend for the bottom line.
/// When show_keymap is false: Shows just "?" (grayed out)
/// When show_keymap is true: Shows "? │ <full keymap legend>" with bright "?"
fn render_keymap_line(state: &RenderState) -> Line<'static> {
    let ctx = KeymapContext::from_render_state(state);
    let groups = keybindings_for_context(ctx);

    let key_style = Style::default().fg(COLOR_TEXT_DIMMED);
    let desc_style = Style::default().fg(COLOR_TEXT_MUTED);
    let sep_style = Style::default().fg(COLOR_TEXT_MUTED);

    let mut spans: Vec<Span> = Vec::new();

    // Always show '?' toggle indicator first
    // When collapsed: dimmed '?'
    // When expanded: bright '?' followed by the full keymap
    let help_style = if state.show_keymap {
        Style::default() // Bright (default foreground)
    } else {
        Style::default().fg(COLOR_TEXT_MUTED) // Grayed out
    };
    spans.push(Span::styled("?", help_style));

    // Only show the full keymap legend when expanded
    if state.show_keymap {
        for group in groups.iter() {
            if group.0.is_empty() {
                continue;
            }

            // Separator before each group (including first, since we have '?' prefix)
            if !spans.is_empty() {
                spans.push(Span::styled(" │ ", sep_style));
            }

            for (key_idx, keybinding) in group.0.iter().enumerate() {
                if key_idx > 0 {
                    spans.push(Span::styled(" • ", sep_style));
                }
                spans.push(Span::styled(keybinding.0, key_style));
                spans.push(Span::styled(format!(" {}", keybinding.1), desc_style));
            }
        }
    }

    Line::from(spans)
}

/// Render input prompt for the bottom line (replaces keymap when in input mode).
fn render_input_line(state: &RenderState, kind: InputKind) -> Line<'static> {
    let hint_key_style = Style::default().fg(COLOR_TEXT_MUTED);
    let hint_sep_style = Style::default().fg(COLOR_TEXT_MUTED);
    let label_style = Style::default().fg(Color::Reset);
    let input_style = Style::default().fg(Color::White);
    let cursor_style = Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::SLOW_BLINK);

    let label = kind.label();
    let buffer = state.input_buffer.clone();

    Line::from(vec![
        Span::styled("Enter ", hint_key_style),
        Span::styled("• ", hint_sep_style),
        Span::styled("Esc ", hint_key_style),
        Span::styled(" ", hint_sep_style),
        Span::styled(format!("{label}: "), label_style),
        Span::styled(buffer, input_style),
        Span::styled("_", cursor_style),
    ])
}

/// Render notification message on the bottom line of the screen.
///
/// Displays a single-line notification with appropriate styling based on the notification level:
/// - Error: Red text with "Error:" prefix and bold styling
/// - Info: Green text without prefix
fn render_notification(frame: &mut Frame, notification: &Notification, area: Rect) {
    let notification_area = Rect {
        x: area.x,
        y: area.y + area.height.saturating_sub(1),
        width: area.width,
        height: 1,
    };

    frame.render_widget(Clear, notification_area);

    let line = match notification.level {
        NotificationLevel::Error => Line::from(vec![
            Span::styled(
                "Error: ",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                notification.message.clone(),
                Style::default().fg(Color::Red),
            ),
        ]),
        NotificationLevel::Info => Line::from(Span::styled(
            notification.message.clone(),
            Style::default().fg(Color::Green),
        )),
    };

    let paragraph = Paragraph::new(line);
    frame.render_widget(paragraph, notification_area);
}

// Helper functions

fn truncate(s: &str, max_len: usize) -> String {
    if max_len == 0 {
        return String::new();
    }
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 1).collect();
        format!("{}~", truncated)
    }
}
