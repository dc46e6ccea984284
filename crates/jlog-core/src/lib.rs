//! Core jlog library (graph parsing, streaming, lane tracing, jj invocation, config).

pub mod ansi;
pub mod config;
pub mod graph;
pub mod jj;
pub mod segment;

pub use segment::{SegmentColor, SegmentModifiers, SegmentStyle, StyledLine, StyledSegment};
