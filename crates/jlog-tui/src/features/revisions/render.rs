//! Revision list rendering.
//!
//! Gutter cells keep jj's colors; cells on the selected revision's lane are
//! drawn with the lane style, and left tees on that lane are redrawn so the
//! highlighted path reads as one continuous line.

use jlog_core::StyledSegment;
use jlog_core::graph::{GraphGutter, LaneTracer, Row};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use super::state::RevisionListState;
use crate::common::style::to_style;

const SELECTION_BG: Color = Color::Indexed(236);
const LANE_FG: Color = Color::LightYellow;
const HINT_FG: Color = Color::DarkGray;

pub fn render_revisions(state: &RevisionListState, frame: &mut Frame, area: Rect) {
    let lines = build_lines(state);
    frame.render_widget(Paragraph::new(lines), area);
}

/// Builds the screen lines for the visible window.
pub fn build_lines(state: &RevisionListState) -> Vec<Line<'static>> {
    if state.is_empty() {
        let text = if state.is_exhausted_empty() {
            "no matching revisions"
        } else {
            "loading…"
        };
        return vec![Line::from(Span::styled(text, Style::default().fg(HINT_FG)))];
    }

    let tracer = state.tracer();
    let (start, end) = tracer.window();
    let mut lines = Vec::new();

    if start > 0 {
        lines.push(hint_line(state, start));
    }

    for idx in start..end {
        let row = &state.rows[idx];
        let selected = idx == state.cursor;

        for (line_idx, line) in row.lines.iter().enumerate() {
            let highlight = selected && line.is_highlightable();
            let mut spans: Vec<Span<'static>> = line
                .gutter
                .cells
                .iter()
                .enumerate()
                .map(|(col, cell)| gutter_span(state, &tracer, idx, line_idx, col, cell))
                .collect();
            spans.extend(line.segments.iter().map(|segment| {
                let mut style = to_style(segment.style);
                if highlight {
                    style = style.bg(SELECTION_BG);
                }
                Span::styled(segment.text.clone(), style)
            }));

            let mut rendered = Line::from(spans);
            if highlight {
                rendered = rendered.style(Style::default().bg(SELECTION_BG));
            }
            lines.push(rendered);
        }

        if selected && state.expanded {
            lines.push(details_line(row));
        }
    }

    lines.truncate(state.viewport_height.max(1));
    lines
}

fn gutter_span(
    state: &RevisionListState,
    tracer: &LaneTracer<'_>,
    row: usize,
    line: usize,
    col: usize,
    cell: &StyledSegment,
) -> Span<'static> {
    let mut style = to_style(cell.style);
    if !state.highlight_lanes {
        return Span::styled(cell.text.clone(), style);
    }

    let text = tracer.update_gutter_text(row, state.cursor, line, col, &cell.text);
    if tracer.is_gutter_in_lane(row, state.cursor, line, col) {
        style = style.fg(LANE_FG).add_modifier(Modifier::BOLD);
    }
    Span::styled(text.to_string(), style)
}

fn gutter_spans(gutter: &GraphGutter) -> Vec<Span<'static>> {
    gutter
        .cells
        .iter()
        .map(|cell| Span::styled(cell.text.clone(), to_style(cell.style)))
        .collect()
}

/// Line shown above the window when earlier rows are scrolled off.
/// Its gutter continues the columns of the row just above the window.
fn hint_line(state: &RevisionListState, start: usize) -> Line<'static> {
    let mut spans = state.rows[start]
        .previous
        .and_then(|previous| state.rows.get(previous))
        .map(|row| gutter_spans(&row.extend()))
        .unwrap_or_default();
    spans.push(Span::styled(
        format!("↑ {start} more"),
        Style::default().fg(HINT_FG),
    ));
    Line::from(spans)
}

fn details_line(row: &Row) -> Line<'static> {
    let label = Style::default().fg(HINT_FG);
    let mut spans = gutter_spans(&row.extend());
    spans.push(Span::styled("change ", label));
    spans.push(Span::styled(
        row.commit.change_id.clone(),
        Style::default()
            .fg(Color::Magenta)
            .add_modifier(Modifier::BOLD),
    ));
    spans.push(Span::styled("  commit ", label));
    spans.push(Span::styled(
        row.commit.commit_id.clone(),
        Style::default().fg(Color::Blue),
    ));
    if row.commit.is_working_copy {
        spans.push(Span::styled("  working copy", label));
    }
    if row.commit.hidden {
        spans.push(Span::styled("  hidden", label));
    }
    Line::from(spans)
}

/// Rows of the visible window whose node lies on the cursor's lane.
pub fn lane_members(state: &RevisionListState) -> usize {
    if !state.highlight_lanes {
        return 0;
    }
    let tracer = state.tracer();
    let (start, end) = tracer.window();
    (start..end)
        .filter(|idx| tracer.is_in_same_lane(*idx, state.cursor))
        .count()
}

#[cfg(test)]
mod tests {
    use jlog_core::graph::RowBatch;

    use super::*;
    use crate::features::revisions::sample_rows;

    fn text(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    fn loaded(rows: Vec<Row>, viewport: usize) -> RevisionListState {
        let mut state = RevisionListState::new(true);
        state.viewport_height = viewport;
        state.append(RowBatch {
            items: rows,
            has_more: false,
        });
        state
    }

    #[test]
    fn test_empty_finished_list_shows_placeholder() {
        let mut state = RevisionListState::new(true);
        state.has_more = false;
        let lines = build_lines(&state);
        assert_eq!(text(&lines[0]), "no matching revisions");
    }

    #[test]
    fn test_empty_pending_list_shows_loading() {
        let mut state = RevisionListState::new(true);
        state.loading = true;
        assert_eq!(text(&build_lines(&state)[0]), "loading…");
    }

    #[test]
    fn test_lines_keep_gutter_and_content() {
        let state = loaded(sample_rows(2), 10);
        let lines = build_lines(&state);
        assert_eq!(lines.len(), 4);
        assert!(text(&lines[0]).starts_with("@  "));
        assert_eq!(text(&lines[1]), "│  description 0");
        assert!(text(&lines[2]).starts_with("○  "));
    }

    #[test]
    fn test_selected_lines_get_selection_background() {
        let state = loaded(sample_rows(2), 10);
        let lines = build_lines(&state);
        assert_eq!(lines[0].style.bg, Some(SELECTION_BG));
        assert_eq!(lines[1].style.bg, Some(SELECTION_BG));
        assert_eq!(lines[2].style.bg, None);
    }

    #[test]
    fn test_lane_cells_highlighted() {
        let state = loaded(sample_rows(2), 10);
        let lines = build_lines(&state);
        // Node of the other row sits on the same lane.
        assert_eq!(lines[2].spans[0].style.fg, Some(LANE_FG));
        assert_eq!(lane_members(&state), 2);
    }

    #[test]
    fn test_details_line_uses_extended_gutter() {
        let mut state = loaded(sample_rows(2), 10);
        state.expanded = true;
        let lines = build_lines(&state);
        assert_eq!(lines.len(), 5);
        let details = text(&lines[2]);
        assert!(details.starts_with('│'), "{details}");
        assert!(details.contains("change kkkk"));
        assert!(details.contains("commit 00000000"));
        assert!(details.contains("working copy"));
    }

    #[test]
    fn test_scrolled_window_shows_hint() {
        let mut state = loaded(sample_rows(10), 5);
        state.move_to(6);
        state.sync_lanes();
        let lines = build_lines(&state);
        let hint = text(&lines[0]);
        assert!(hint.contains(&format!("↑ {} more", state.offset)), "{hint}");
        assert!(hint.starts_with('│'));
        assert!(lines.len() <= 5);
    }

    #[test]
    fn test_merge_tee_redrawn_for_cursor_lane() {
        let log = concat!(
            "○  \x1b[1mkkkk\x1b[0m a \x1b[34m1111\x1b[39m\n",
            "│ ○  \x1b[1mllll\x1b[0m b \x1b[34m2222\x1b[39m\n",
            "├─╯\n",
            "○  \x1b[1mmmmm\x1b[0m c \x1b[34m3333\x1b[39m\n",
        );
        let mut state = loaded(jlog_core::graph::parse_rows(log.as_bytes()), 20);

        // The side branch joins from the right only: the tee opens upward.
        state.move_to(1);
        let lines = build_lines(&state);
        assert_eq!(lines[2].spans[0].content, "╭");
        assert_eq!(lines[2].spans[0].style.fg, Some(LANE_FG));

        // The main lane passes straight down through the tee.
        state.move_to(0);
        let lines = build_lines(&state);
        assert_eq!(lines[2].spans[0].content, "│");
    }
}
