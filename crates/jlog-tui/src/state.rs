//! Application state composition.
//!
//! ```text
//! AppState
//! ├── revisions: RevisionListState (rows, cursor, paging)
//! ├── revset: label of the streamed revset
//! └── error: last stream failure, shown in the status line
//! ```

use crate::features::revisions::RevisionListState;

#[derive(Debug)]
pub struct AppState {
    pub revisions: RevisionListState,
    pub revset: String,
    pub error: Option<String>,
    pub should_quit: bool,
    /// Advanced on every tick while loading.
    pub spinner_frame: usize,
}

impl AppState {
    pub fn new(revset: impl Into<String>, highlight_lanes: bool) -> Self {
        Self {
            revisions: RevisionListState::new(highlight_lanes),
            revset: revset.into(),
            error: None,
            should_quit: false,
            spinner_frame: 0,
        }
    }
}
