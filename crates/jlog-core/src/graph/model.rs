//! Rows, graph lines and gutters produced by classification.

use bitflags::bitflags;

use super::glyph::{self, Continuation};
use crate::segment::{SegmentStyle, StyledSegment};

bitflags! {
    /// Role of one physical line within a row.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct LineFlags: u8 {
        /// The line carries the commit's identifying header.
        const REVISION = 1;
        /// The line takes part in cursor/selection highlighting.
        const HIGHLIGHTABLE = 1 << 1;
        /// Placeholder for hidden history (`~`).
        const ELIDED = 1 << 2;
    }
}

/// Graph columns of one line, one character per cell.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GraphGutter {
    pub cells: Vec<StyledSegment>,
}

impl GraphGutter {
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Glyph at `col`, if the gutter is that wide.
    pub fn glyph(&self, col: usize) -> Option<char> {
        self.cells.get(col).map(StyledSegment::glyph)
    }

    pub fn contains(&self, glyph: char) -> bool {
        self.cells.iter().any(|cell| cell.text.contains(glyph))
    }

    /// The gutter as plain text.
    pub fn text(&self) -> String {
        self.cells.iter().map(|cell| cell.text.as_str()).collect()
    }
}

/// One physical line of a row: gutter cells plus descriptive content.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GraphLine {
    pub segments: Vec<StyledSegment>,
    pub gutter: GraphGutter,
    pub flags: LineFlags,
}

impl GraphLine {
    pub fn is_highlightable(&self) -> bool {
        self.flags.contains(LineFlags::HIGHLIGHTABLE)
    }

    pub fn is_elided(&self) -> bool {
        self.flags.contains(LineFlags::ELIDED)
    }

    /// The content (non-gutter) part of the line as plain text.
    pub fn content_text(&self) -> String {
        self.segments.iter().map(|s| s.text.as_str()).collect()
    }
}

/// Identity of the commit shown by a row.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Commit {
    pub change_id: String,
    pub commit_id: String,
    pub is_working_copy: bool,
    pub hidden: bool,
}

/// All lines belonging to one commit in the rendered graph.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Row {
    pub commit: Commit,
    pub lines: Vec<GraphLine>,
    /// Display columns taken by the graph on the header line.
    pub indent: usize,
    /// Ordinal of the preceding row in the stream, used only to continue
    /// connectors across row boundaries. The predecessor may no longer be
    /// loaded.
    pub previous: Option<usize>,
}

impl Row {
    /// Gutter that visually continues this row into whatever is drawn below it.
    ///
    /// Each column of the last line becomes a vertical connector when the
    /// highlightable lines leave that column open, or a blank when a foot,
    /// blank or diagonal glyph closed it. Horizontal glyphs keep the
    /// previous decision.
    pub fn extend(&self) -> GraphGutter {
        let Some(last) = self.lines.last() else {
            return GraphGutter::default();
        };

        let cells = last
            .gutter
            .cells
            .iter()
            .enumerate()
            .map(|(col, cell)| {
                let mut state = Continuation::Terminate;
                for line in self.lines.iter().filter(|line| line.is_highlightable()) {
                    let Some(glyph) = line.gutter.glyph(col) else {
                        continue;
                    };
                    match glyph::continuation(glyph) {
                        Continuation::Carry => {}
                        next => state = next,
                    }
                }
                let text = if state == Continuation::Extend {
                    glyph::VERTICAL
                } else {
                    ' '
                };
                StyledSegment::new(text, cell.style)
            })
            .collect();

        GraphGutter { cells }
    }

    /// Position `(line, col)` of the row's node glyph on its first revision line.
    pub fn node_position(&self) -> Option<(usize, usize)> {
        self.lines
            .iter()
            .enumerate()
            .find(|(_, line)| line.flags.contains(LineFlags::REVISION))
            .and_then(|(idx, line)| {
                line.gutter
                    .cells
                    .iter()
                    .position(|cell| glyph::is_node(cell.glyph()))
                    .map(|col| (idx, col))
            })
    }

    /// Resets every gutter cell's lane to zero.
    pub fn clear_lanes(&mut self) {
        for line in &mut self.lines {
            for cell in &mut line.gutter.cells {
                cell.lane = 0;
            }
        }
    }

    /// Number of physical lines, including connector lines.
    pub fn height(&self) -> usize {
        self.lines.len()
    }
}

/// Unit exchanged between the stream worker and its consumer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RowBatch {
    pub items: Vec<Row>,
    /// `false` marks the last batch of the stream.
    pub has_more: bool,
}

/// Messages sent by the consumer to drive the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlSignal {
    RequestMore,
    Close,
}

/// Builds gutter cells from a string, one cell per character.
pub fn gutter_from_str(text: &str, style: SegmentStyle) -> GraphGutter {
    GraphGutter {
        cells: text
            .chars()
            .map(|c| StyledSegment::new(c.to_string(), style))
            .collect(),
    }
}
