//! Revision graph model: classification of `jj log` output into rows,
//! lane tracing across rows, and batched streaming.

pub mod classifier;
pub mod glyph;
pub mod lanes;
pub mod model;
pub mod stream;

pub use classifier::{RowClassifier, classify_lines};
pub use lanes::{LaneTracer, MAX_LANES};
pub use model::{
    Commit, ControlSignal, GraphGutter, GraphLine, LineFlags, Row, RowBatch, gutter_from_str,
};
pub use stream::{DEFAULT_BATCH_SIZE, GraphStream, StreamPoll, start_stream};

use crate::ansi::parse_styled_lines;

/// Parses a complete colored graph dump into rows in one pass.
///
/// Produces the same rows, in the same order, as draining a stream over the
/// same bytes.
pub fn parse_rows(bytes: &[u8]) -> Vec<Row> {
    classify_lines(parse_styled_lines(bytes))
}
