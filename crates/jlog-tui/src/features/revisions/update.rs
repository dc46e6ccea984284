//! Revision list reducer helpers.
//!
//! Every handler leaves the lane trace in sync with the visible window and
//! asks for the next batch when the cursor nears the loaded edge.

use crossterm::event::{KeyCode, KeyEvent, MouseEvent, MouseEventKind};
use jlog_core::graph::RowBatch;

use super::state::RevisionListState;
use crate::effects::UiEffect;

/// Rows moved per mouse wheel notch.
const WHEEL_STEP: isize = 3;

pub fn handle_key(state: &mut RevisionListState, key: KeyEvent) -> Vec<UiEffect> {
    match key.code {
        KeyCode::Down | KeyCode::Char('j') => state.move_by(1),
        KeyCode::Up | KeyCode::Char('k') => state.move_by(-1),
        KeyCode::Home | KeyCode::Char('g') => state.move_to(0),
        KeyCode::End | KeyCode::Char('G') => state.move_to(usize::MAX),
        KeyCode::PageDown => state.move_by(page_step(state)),
        KeyCode::PageUp => state.move_by(-page_step(state)),
        KeyCode::Enter | KeyCode::Char(' ') => {
            if state.is_empty() {
                return vec![];
            }
            state.expanded = !state.expanded;
            state.scroll_to_cursor();
        }
        _ => return vec![],
    }
    state.sync_lanes();
    request_more_if_needed(state)
}

pub fn handle_mouse(state: &mut RevisionListState, mouse: MouseEvent) -> Vec<UiEffect> {
    match mouse.kind {
        MouseEventKind::ScrollDown => state.move_by(WHEEL_STEP),
        MouseEventKind::ScrollUp => state.move_by(-WHEEL_STEP),
        _ => return vec![],
    }
    state.sync_lanes();
    request_more_if_needed(state)
}

fn page_step(state: &RevisionListState) -> isize {
    isize::try_from(state.page_rows()).unwrap_or(isize::MAX)
}

/// Marks a batch as requested when the list needs more rows.
pub fn request_more_if_needed(state: &mut RevisionListState) -> Vec<UiEffect> {
    if state.wants_more() {
        state.loading = true;
        vec![UiEffect::RequestMore]
    } else {
        vec![]
    }
}

pub fn handle_stream_started(state: &mut RevisionListState) -> Vec<UiEffect> {
    state.reset();
    request_more_if_needed(state)
}

pub fn handle_batch(state: &mut RevisionListState, batch: RowBatch) -> Vec<UiEffect> {
    state.append(batch);
    state.scroll_to_cursor();
    state.sync_lanes();
    request_more_if_needed(state)
}

pub fn handle_stream_ended(state: &mut RevisionListState) {
    state.has_more = false;
    state.loading = false;
}

/// Applies the list area height reported by the runtime.
pub fn handle_viewport(state: &mut RevisionListState, height: usize) -> Vec<UiEffect> {
    if state.viewport_height == height {
        return vec![];
    }
    state.viewport_height = height;
    state.scroll_to_cursor();
    state.sync_lanes();
    request_more_if_needed(state)
}
