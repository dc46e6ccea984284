//! Pure view/render functions for the TUI.
//!
//! Functions here take `&AppState`, draw to a ratatui `Frame`, and never
//! mutate state or return effects.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

use crate::common::text::truncate_with_ellipsis;
use crate::features::revisions;
use crate::state::AppState;

/// Height of the status line below the revision list.
pub const STATUS_HEIGHT: u16 = 1;

/// Widest revset shown in the status line.
const REVSET_MAX_WIDTH: usize = 40;

const SPINNER_FRAMES: &[&str] = &["◐", "◓", "◑", "◒"];

const KEY_HINTS: &str = "j/k move  ⏎ details  r reload  q quit";

/// Renders the entire TUI to the frame.
pub fn render(app: &AppState, frame: &mut Frame) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(STATUS_HEIGHT)])
        .split(frame.area());

    revisions::render_revisions(&app.revisions, frame, chunks[0]);
    render_status_line(app, frame, chunks[1]);
}

fn render_status_line(app: &AppState, frame: &mut Frame, area: Rect) {
    let status = status_text(app);
    let style = if app.error.is_some() {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::Gray)
    };

    let used = status.width();
    let hints = KEY_HINTS.width();
    let mut spans = vec![Span::styled(status, style)];
    let room = usize::from(area.width).saturating_sub(used);
    if room > hints + 2 {
        spans.push(Span::raw(" ".repeat(room - hints)));
        spans.push(Span::styled(KEY_HINTS, Style::default().fg(Color::DarkGray)));
    }

    frame.render_widget(
        Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Indexed(235))),
        area,
    );
}

/// Text of the status line: revset, row count, stream state and position.
pub fn status_text(app: &AppState) -> String {
    let list = &app.revisions;
    let revset = truncate_with_ellipsis(&app.revset, REVSET_MAX_WIDTH);

    let stream = if let Some(error) = &app.error {
        format!("error: {error}")
    } else if list.loading {
        let spinner = SPINNER_FRAMES[app.spinner_frame % SPINNER_FRAMES.len()];
        format!("{spinner} loading…")
    } else if list.has_more {
        "more available".to_string()
    } else {
        "all loaded".to_string()
    };

    let mut text = format!(" {revset} │ {} revisions │ {stream}", list.rows.len());
    if !list.is_empty() {
        text.push_str(&format!(" │ {}/{}", list.cursor + 1, list.rows.len()));
        let lane = revisions::lane_members(list);
        if lane > 1 {
            text.push_str(&format!(" │ lane {lane}"));
        }
    }
    text
}
