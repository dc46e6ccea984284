//! TUI reducer (update function).
//!
//! All state mutations happen here. The runtime calls `update(app, event)`
//! and executes the returned effects.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::features::revisions;
use crate::render;
use crate::state::AppState;

/// The main reducer function.
pub fn update(app: &mut AppState, event: UiEvent) -> Vec<UiEffect> {
    match event {
        UiEvent::Tick => {
            if app.revisions.loading {
                app.spinner_frame = app.spinner_frame.wrapping_add(1);
            }
            vec![]
        }
        UiEvent::Frame { height, .. } => revisions::handle_viewport(
            &mut app.revisions,
            usize::from(height.saturating_sub(render::STATUS_HEIGHT)),
        ),
        UiEvent::Terminal(event) => handle_terminal_event(app, event),
        UiEvent::StreamStarted => {
            app.error = None;
            revisions::handle_stream_started(&mut app.revisions)
        }
        UiEvent::Batch(batch) => revisions::handle_batch(&mut app.revisions, batch),
        UiEvent::StreamEnded => {
            revisions::handle_stream_ended(&mut app.revisions);
            vec![]
        }
        UiEvent::StreamFailed(message) => {
            app.error = Some(message);
            revisions::handle_stream_ended(&mut app.revisions);
            vec![]
        }
    }
}

fn handle_terminal_event(app: &mut AppState, event: Event) -> Vec<UiEffect> {
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => handle_key(app, key),
        Event::Mouse(mouse) => revisions::handle_mouse(&mut app.revisions, mouse),
        _ => vec![],
    }
}

fn handle_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return vec![UiEffect::Quit];
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => vec![UiEffect::Quit],
        KeyCode::Char('r') => vec![UiEffect::Reload],
        _ => revisions::handle_key(&mut app.revisions, key),
    }
}
