//! Revision list state: loaded rows, cursor, scroll window and paging flags.

use jlog_core::graph::{LaneTracer, Row, RowBatch};

#[derive(Debug, Clone)]
pub struct RevisionListState {
    /// Every row received from the current stream, in emission order.
    /// Indices match the `previous` ordinals the stream assigns.
    pub rows: Vec<Row>,
    pub cursor: usize,
    /// First row of the visible window.
    pub offset: usize,
    /// The stream may still deliver rows.
    pub has_more: bool,
    /// A batch has been requested and not yet received.
    pub loading: bool,
    /// Show the details line under the cursor row.
    pub expanded: bool,
    /// Lines available to the list.
    pub viewport_height: usize,
    pub highlight_lanes: bool,
    /// Window whose lanes are currently traced.
    traced: Option<(usize, usize)>,
}

impl RevisionListState {
    pub fn new(highlight_lanes: bool) -> Self {
        Self {
            rows: Vec::new(),
            cursor: 0,
            offset: 0,
            has_more: true,
            loading: false,
            expanded: false,
            viewport_height: 0,
            highlight_lanes,
            traced: None,
        }
    }

    /// Drops all rows for a freshly started stream.
    pub fn reset(&mut self) {
        *self = Self {
            viewport_height: self.viewport_height,
            ..Self::new(self.highlight_lanes)
        };
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Whether the stream is finished and produced nothing.
    pub fn is_exhausted_empty(&self) -> bool {
        self.rows.is_empty() && !self.has_more && !self.loading
    }

    /// Lines taken by the "more above" hint for a window starting at `offset`.
    pub fn hint_height(offset: usize) -> usize {
        usize::from(offset > 0)
    }

    /// Screen lines taken by row `idx`, including the details line.
    pub fn row_height(&self, idx: usize) -> usize {
        let details = usize::from(self.expanded && idx == self.cursor);
        self.rows.get(idx).map_or(0, Row::height) + details
    }

    /// Rows `[start, end)` that are at least partly on screen.
    pub fn window(&self) -> (usize, usize) {
        let start = self.offset.min(self.rows.len());
        let budget = self
            .viewport_height
            .saturating_sub(Self::hint_height(start));
        let mut end = start;
        let mut used = 0;
        while end < self.rows.len() && used < budget {
            used += self.row_height(end);
            end += 1;
        }
        (start, end)
    }

    /// Number of rows fully visible in the current window (at least 1).
    pub fn page_rows(&self) -> usize {
        let (start, end) = self.window();
        let budget = self
            .viewport_height
            .saturating_sub(Self::hint_height(start));
        let mut used = 0;
        let mut count = 0;
        for idx in start..end {
            used += self.row_height(idx);
            if used > budget {
                break;
            }
            count += 1;
        }
        count.max(1)
    }

    /// Moves the cursor to `idx`, clamped to the loaded rows.
    pub fn move_to(&mut self, idx: usize) {
        self.cursor = idx.min(self.rows.len().saturating_sub(1));
        self.scroll_to_cursor();
    }

    pub fn move_by(&mut self, delta: isize) {
        let target = self.cursor.saturating_add_signed(delta);
        self.move_to(target);
    }

    /// Adjusts the offset so the whole cursor row is on screen when it fits.
    pub fn scroll_to_cursor(&mut self) {
        if self.cursor < self.offset {
            self.offset = self.cursor;
            return;
        }
        while self.offset < self.cursor && !self.fits(self.offset, self.cursor) {
            self.offset += 1;
        }
    }

    fn fits(&self, offset: usize, last: usize) -> bool {
        let used: usize = (offset..=last).map(|idx| self.row_height(idx)).sum();
        Self::hint_height(offset) + used <= self.viewport_height
    }

    /// Whether the cursor is within one viewport of the last loaded row and
    /// the stream can deliver more.
    pub fn wants_more(&self) -> bool {
        self.has_more
            && !self.loading
            && self.rows.len().saturating_sub(self.cursor) <= self.viewport_height.max(1)
    }

    /// Appends a received batch.
    pub fn append(&mut self, batch: RowBatch) {
        self.rows.extend(batch.items);
        self.has_more = batch.has_more;
        self.loading = false;
        self.traced = None;
        self.sync_lanes();
    }

    /// Retraces lanes when the visible window changed since the last trace.
    pub fn sync_lanes(&mut self) {
        let window = self.window();
        if self.traced == Some(window) {
            return;
        }
        if self.highlight_lanes {
            LaneTracer::new(&mut self.rows, window.0, window.1);
        }
        self.traced = Some(window);
    }

    /// Read-only view of the traced window.
    pub fn tracer(&self) -> LaneTracer<'_> {
        let (start, end) = self.traced.unwrap_or_default();
        LaneTracer::attach(&self.rows, start, end)
    }
}
