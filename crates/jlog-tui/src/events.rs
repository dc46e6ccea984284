//! UI event types.
//!
//! Everything the reducer reacts to arrives as a `UiEvent`: terminal input,
//! frame geometry, timer ticks and the lifecycle of the graph stream.

use crossterm::event::Event;
use jlog_core::graph::RowBatch;

#[derive(Debug)]
pub enum UiEvent {
    /// Timer tick; drives redraws.
    Tick,
    /// Current terminal size, sent before the other events of a frame.
    Frame { width: u16, height: u16 },
    /// Raw terminal input.
    Terminal(Event),
    /// A new stream was opened; any previously loaded rows are stale.
    StreamStarted,
    /// Rows delivered by the stream.
    Batch(RowBatch),
    /// The stream stopped without a final batch (no revisions, or the
    /// worker exited).
    StreamEnded,
    /// Opening a replacement stream failed.
    StreamFailed(String),
}
