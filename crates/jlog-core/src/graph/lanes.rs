//! Lane tracing over the connector glyphs of a row window.
//!
//! Every node not yet reached by an earlier trace starts a new lane. A lane
//! is a power-of-two bit, so a cell shared by several lanes (a fork or merge
//! point) keeps all of them in its mask. Traces only move down, left or
//! right, which makes each one a finite breadth-first walk.
//!
//! Queries always test the *lowest* bit of the cursor's node mask: where
//! lanes join, the cursor keeps the first lane it was assigned.

use std::collections::{HashSet, VecDeque};

use tracing::debug;

use super::glyph::{self, Connector, Turn};
use super::model::Row;
use crate::segment::StyledSegment;

/// Maximum number of distinct lanes in one window.
pub const MAX_LANES: u32 = u64::BITS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Direction {
    Down,
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct Cursor {
    row: usize,
    line: usize,
    col: usize,
    dir: Direction,
}

impl Cursor {
    fn heading(self, dir: Direction) -> Self {
        Self { dir, ..self }
    }
}

/// Lane assignments for the rows `[start, end)`.
///
/// Construction writes the `lane` field of every gutter cell in the window;
/// the queries only read them.
#[derive(Debug)]
pub struct LaneTracer<'a> {
    rows: &'a [Row],
    start: usize,
    end: usize,
    nodes: Vec<Option<(usize, usize)>>,
}

impl<'a> LaneTracer<'a> {
    /// Resets and traces every lane of the window.
    pub fn new(rows: &'a mut [Row], start: usize, end: usize) -> Self {
        let end = end.min(rows.len());
        let start = start.min(end);

        for row in &mut rows[start..end] {
            row.clear_lanes();
        }
        let nodes: Vec<Option<(usize, usize)>> =
            rows[start..end].iter().map(Row::node_position).collect();

        let mut lane = 0u64;
        for (offset, node) in nodes.iter().enumerate() {
            let Some((line, col)) = *node else {
                continue;
            };
            let row = start + offset;
            if lane_at(rows, row, line, col) != 0 {
                continue;
            }
            lane = if lane == 0 { 1 } else { lane << 1 };
            if lane == 0 {
                debug!(row, "lane limit reached, remaining rows stay untraced");
                break;
            }
            trace(rows, end, row, line, col, lane);
        }

        let rows: &'a [Row] = rows;
        Self {
            rows,
            start,
            end,
            nodes,
        }
    }

    /// Attaches to a window whose lanes were already traced by [`new`](Self::new).
    pub fn attach(rows: &'a [Row], start: usize, end: usize) -> Self {
        let end = end.min(rows.len());
        let start = start.min(end);
        let nodes = rows[start..end].iter().map(Row::node_position).collect();
        Self {
            rows,
            start,
            end,
            nodes,
        }
    }

    pub fn window(&self) -> (usize, usize) {
        (self.start, self.end)
    }

    /// Whether `current`'s node lies on the cursor's lane.
    pub fn is_in_same_lane(&self, current: usize, cursor: usize) -> bool {
        let lane = self.cursor_lane(cursor);
        lane != 0 && self.node_lane(current) & lane != 0
    }

    /// Whether the gutter cell `(line, col)` of row `current` lies on the cursor's lane.
    pub fn is_gutter_in_lane(&self, current: usize, cursor: usize, line: usize, col: usize) -> bool {
        let lane = self.cursor_lane(cursor);
        lane != 0 && self.lane(current, line, col) & lane != 0
    }

    /// Glyph to draw for a gutter cell while `cursor` is selected.
    ///
    /// Only left tees on the cursor's lane are redrawn: when the lane enters
    /// from the right and not from above, the tee becomes a top-left corner;
    /// when it comes from above and does not leave to the right, it becomes
    /// a plain vertical bar.
    pub fn update_gutter_text<'g>(
        &self,
        current: usize,
        cursor: usize,
        line: usize,
        col: usize,
        text: &'g str,
    ) -> &'g str {
        let is_tee = text.chars().next().is_some_and(glyph::is_left_tee);
        if !is_tee || !self.is_gutter_in_lane(current, cursor, line, col) {
            return text;
        }

        let right = self.is_gutter_in_lane(current, cursor, line, col + 1);
        let up = self
            .cell_above(current, line)
            .is_some_and(|(row, above)| self.is_gutter_in_lane(row, cursor, above, col));

        match (right, up) {
            (true, false) => "╭",
            (false, true) => "│",
            _ => text,
        }
    }

    fn cell_above(&self, row: usize, line: usize) -> Option<(usize, usize)> {
        if line > 0 {
            return Some((row, line - 1));
        }
        let previous = row.checked_sub(1).filter(|r| *r >= self.start)?;
        let lines = self.rows.get(previous)?.lines.len();
        lines.checked_sub(1).map(|last| (previous, last))
    }

    fn cursor_lane(&self, cursor: usize) -> u64 {
        let mask = self.node_lane(cursor);
        mask & mask.wrapping_neg()
    }

    fn node_lane(&self, row: usize) -> u64 {
        if !self.in_window(row) {
            return 0;
        }
        self.nodes[row - self.start].map_or(0, |(line, col)| self.lane(row, line, col))
    }

    fn lane(&self, row: usize, line: usize, col: usize) -> u64 {
        if !self.in_window(row) {
            return 0;
        }
        lane_at(self.rows, row, line, col)
    }

    fn in_window(&self, row: usize) -> bool {
        (self.start..self.end).contains(&row)
    }
}

fn lane_at(rows: &[Row], row: usize, line: usize, col: usize) -> u64 {
    rows.get(row)
        .and_then(|r| r.lines.get(line))
        .and_then(|l| l.gutter.cells.get(col))
        .map_or(0, |cell| cell.lane)
}

fn cell_mut(rows: &mut [Row], at: Cursor) -> Option<&mut StyledSegment> {
    rows.get_mut(at.row)?
        .lines
        .get_mut(at.line)?
        .gutter
        .cells
        .get_mut(at.col)
}

/// Moves one step in the cursor's direction. Moving down past a row's last
/// line continues on the first line of the next row.
fn step(rows: &[Row], end: usize, at: Cursor) -> Option<Cursor> {
    match at.dir {
        Direction::Down => {
            let lines = rows.get(at.row)?.lines.len();
            if at.line + 1 < lines {
                Some(Cursor {
                    line: at.line + 1,
                    ..at
                })
            } else if at.row + 1 < end {
                Some(Cursor {
                    row: at.row + 1,
                    line: 0,
                    ..at
                })
            } else {
                None
            }
        }
        Direction::Left => at.col.checked_sub(1).map(|col| Cursor { col, ..at }),
        Direction::Right => Some(Cursor {
            col: at.col + 1,
            ..at
        }),
    }
}

/// Looks right of a left tee, across horizontal runs, for a corner opening a branch.
fn branches_right(rows: &[Row], at: Cursor) -> bool {
    let Some(line) = rows.get(at.row).and_then(|r| r.lines.get(at.line)) else {
        return false;
    };
    for cell in line.gutter.cells.iter().skip(at.col + 1) {
        let c = cell.glyph();
        if glyph::is_branch_corner(c) {
            return true;
        }
        if !glyph::is_horizontal_run(c) {
            return false;
        }
    }
    false
}

fn trace(rows: &mut [Row], end: usize, row: usize, line: usize, col: usize, lane: u64) {
    let origin = Cursor {
        row,
        line,
        col,
        dir: Direction::Down,
    };
    if let Some(cell) = cell_mut(rows, origin) {
        cell.lane |= lane;
    }

    let mut queue = VecDeque::from([origin]);
    let mut seen = HashSet::new();

    while let Some(at) = queue.pop_front() {
        if !seen.insert(at) {
            continue;
        }
        let Some(next) = step(rows, end, at) else {
            continue;
        };
        let Some(cell) = cell_mut(rows, next) else {
            continue;
        };
        cell.lane |= lane;
        let c = cell.glyph();

        match glyph::connector(c) {
            Connector::Horizontal => queue.push_back(next),
            Connector::RightTee | Connector::Other => {
                queue.push_back(next.heading(Direction::Down));
            }
            Connector::TopTee => {
                queue.push_back(next.heading(Direction::Down));
                queue.push_back(next);
            }
            Connector::LeftTee => {
                queue.push_back(next.heading(Direction::Down));
                if branches_right(rows, next) {
                    queue.push_back(next.heading(Direction::Right));
                }
            }
            Connector::Corner(Turn::Left) => queue.push_back(next.heading(Direction::Left)),
            Connector::Corner(Turn::Right) => queue.push_back(next.heading(Direction::Right)),
            Connector::Corner(Turn::Down) => queue.push_back(next.heading(Direction::Down)),
            Connector::Elision => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::model::{Commit, GraphLine, LineFlags, gutter_from_str};
    use crate::segment::SegmentStyle;

    /// Builds a row from gutter strings; the first is the revision line.
    fn row(id: &str, gutters: &[&str]) -> Row {
        let lines = gutters
            .iter()
            .enumerate()
            .map(|(idx, gutter)| GraphLine {
                segments: vec![StyledSegment::plain(id)],
                gutter: gutter_from_str(gutter, SegmentStyle::default()),
                flags: if idx == 0 {
                    LineFlags::REVISION | LineFlags::HIGHLIGHTABLE
                } else {
                    LineFlags::HIGHLIGHTABLE
                },
            })
            .collect();
        Row {
            commit: Commit {
                change_id: id.to_string(),
                ..Commit::default()
            },
            lines,
            indent: gutters[0].chars().count(),
            previous: None,
        }
    }

    fn lanes(rows: &[Row]) -> Vec<Vec<Vec<u64>>> {
        rows.iter()
            .map(|r| {
                r.lines
                    .iter()
                    .map(|l| l.gutter.cells.iter().map(|c| c.lane).collect())
                    .collect()
            })
            .collect()
    }

    /// Two children joining into one parent:
    ///
    /// ```text
    /// ○  c1
    /// │ ○  c2
    /// ├─╯
    /// ○  p
    /// ```
    fn fork() -> Vec<Row> {
        vec![
            row("c1", &["○  "]),
            row("c2", &["│ ○  ", "├─╯"]),
            row("p", &["○  "]),
        ]
    }

    /// A merge commit fanning out to two parents that join again:
    ///
    /// ```text
    /// @    m
    /// ├─╮
    /// │ ○  a
    /// ○ │  b
    /// ├─╯
    /// ◆  root
    /// ```
    fn merge() -> Vec<Row> {
        vec![
            row("m", &["@    ", "├─╮"]),
            row("a", &["│ ○  "]),
            row("b", &["○ │  ", "├─╯"]),
            row("root", &["◆  "]),
        ]
    }

    #[test]
    fn test_straight_line_is_one_lane() {
        let mut rows: Vec<Row> = (0..4).map(|i| row(&format!("r{i}"), &["│"])).collect();
        // A lone vertical bar has no node glyph, so seed the first row with one.
        rows[0] = row("r0", &["○"]);
        let tracer = LaneTracer::new(&mut rows, 0, 4);
        for r in 0..4 {
            assert_eq!(tracer.lane(r, 0, 0), 1, "row {r}");
        }
        for r in 1..4 {
            assert!(tracer.is_gutter_in_lane(r, 0, 0, 0));
        }
    }

    #[test]
    fn test_straight_nodes_share_lane() {
        let mut rows: Vec<Row> = (0..4).map(|i| row(&format!("r{i}"), &["○  ", "│  "])).collect();
        let tracer = LaneTracer::new(&mut rows, 0, 4);
        for r in 0..4 {
            assert_eq!(tracer.node_lane(r), 1);
            assert!(tracer.is_in_same_lane(r, 0));
        }
    }

    #[test]
    fn test_fork_assigns_two_lanes_reaching_parent() {
        let mut rows = fork();
        let tracer = LaneTracer::new(&mut rows, 0, 3);
        assert_eq!(tracer.node_lane(0), 1);
        assert_eq!(tracer.node_lane(1), 2);
        assert_eq!(tracer.node_lane(2), 3);
        // The joining connector carries both lanes at the tee, only lane 2 on the curve.
        assert_eq!(tracer.lane(1, 1, 0), 3);
        assert_eq!(tracer.lane(1, 1, 1), 2);
        assert_eq!(tracer.lane(1, 1, 2), 2);
        assert_eq!(tracer.lane(1, 0, 0), 1);
    }

    #[test]
    fn test_lowest_bit_precedence() {
        let mut rows = fork();
        let tracer = LaneTracer::new(&mut rows, 0, 3);
        // Cursor on c2 (mask 2): the parent's mask 3 shares bit 2.
        assert!(tracer.is_in_same_lane(2, 1));
        assert!(tracer.is_gutter_in_lane(1, 1, 1, 0));
        // Cursor on the parent (mask 3): only its lowest bit 1 counts, so the
        // curve carrying lane 2 alone is not on the path even though 3 & 2 != 0.
        assert!(!tracer.is_gutter_in_lane(1, 2, 1, 2));
        assert!(!tracer.is_in_same_lane(1, 2));
        assert!(tracer.is_in_same_lane(0, 2));
    }

    #[test]
    fn test_fan_out_redraw_depends_on_cursor_lane() {
        let mut rows = fork();
        let tracer = LaneTracer::new(&mut rows, 0, 3);
        // c2's lane enters the tee from the right only.
        assert_eq!(tracer.update_gutter_text(1, 1, 1, 0, "├"), "╭");
        // c1's lane passes straight through from above.
        assert_eq!(tracer.update_gutter_text(1, 0, 1, 0, "├"), "│");
        assert_eq!(tracer.update_gutter_text(1, 2, 1, 0, "├"), "│");
        // Other glyphs are never rewritten.
        assert_eq!(tracer.update_gutter_text(1, 1, 1, 1, "─"), "─");
    }

    #[test]
    fn test_merge_fan_out_reaches_both_parents() {
        let mut rows = merge();
        let tracer = LaneTracer::new(&mut rows, 0, 4);
        // Everything descends from the merge commit, so one lane covers both branches.
        for r in 0..4 {
            assert!(tracer.is_in_same_lane(r, 0), "row {r}");
        }
        assert_eq!(tracer.lane(0, 1, 2), 1);
        assert_eq!(tracer.lane(1, 0, 2), 1);
        assert_eq!(tracer.lane(2, 1, 2), 1);
        // The tee under the merge node is on the lane both from above and to the right.
        assert_eq!(tracer.update_gutter_text(0, 0, 1, 0, "├"), "├");
    }

    #[test]
    fn test_branch_and_merge_lanes_trace_back_to_origin() {
        // A side branch forks off the merge's second parent:
        //
        // ○  s
        // │ @    m
        // │ ├─╮
        // │ │ ○  a
        // ├───╯
        // │ ○  b
        // ├─╯
        // ◆  root
        let mut rows = vec![
            row("s", &["○  "]),
            row("m", &["│ @    ", "│ ├─╮"]),
            row("a", &["│ │ ○  ", "├───╯"]),
            row("b", &["│ ○  ", "├─╯"]),
            row("root", &["◆  "]),
        ];
        let tracer = LaneTracer::new(&mut rows, 0, 5);
        let s = tracer.node_lane(0);
        let m = tracer.node_lane(1);
        assert_ne!(s, m);
        assert_eq!(tracer.node_lane(4), s | m);
        assert!(tracer.is_in_same_lane(4, 0));
        assert!(tracer.is_in_same_lane(4, 1));
        assert!(tracer.is_in_same_lane(2, 1));
        assert!(!tracer.is_in_same_lane(2, 0));
        // The tee joining `a` redraws as a corner for m's lane, as a bar for s's.
        assert_eq!(tracer.update_gutter_text(2, 1, 1, 0, "├"), "╭");
        assert_eq!(tracer.update_gutter_text(2, 0, 1, 0, "├"), "│");
    }

    #[test]
    fn test_tracing_twice_is_idempotent() {
        let mut rows = merge();
        LaneTracer::new(&mut rows, 0, 4);
        let first = lanes(&rows);
        LaneTracer::new(&mut rows, 0, 4);
        assert_eq!(lanes(&rows), first);
    }

    #[test]
    fn test_window_limits_tracing() {
        let mut rows = fork();
        let tracer = LaneTracer::new(&mut rows, 1, 3);
        assert_eq!(tracer.window(), (1, 3));
        assert_eq!(tracer.node_lane(0), 0);
        assert_eq!(tracer.node_lane(1), 1);
        assert_eq!(tracer.node_lane(2), 1);
        assert!(!tracer.is_in_same_lane(0, 1));
        assert_eq!(rows[0].lines[0].gutter.cells[0].lane, 0);
    }

    #[test]
    fn test_attach_reads_existing_lanes() {
        let mut rows = fork();
        LaneTracer::new(&mut rows, 0, 3);
        let tracer = LaneTracer::attach(&rows, 0, 3);
        assert!(tracer.is_in_same_lane(2, 1));
        assert_eq!(tracer.update_gutter_text(1, 1, 1, 0, "├"), "╭");
    }

    #[test]
    fn test_elision_stops_trace() {
        let mut rows = vec![row("a", &["○  ", "~  "]), row("b", &["○  "])];
        let tracer = LaneTracer::new(&mut rows, 0, 2);
        assert_eq!(tracer.node_lane(0), 1);
        assert_eq!(tracer.node_lane(1), 2);
    }

    #[test]
    fn test_malformed_rows_do_not_panic() {
        let mut rows = vec![
            Row::default(),
            row("a", &["   "]),
            row("b", &["○"]),
            Row::default(),
        ];
        let tracer = LaneTracer::new(&mut rows, 0, 10);
        assert_eq!(tracer.window(), (0, 4));
        assert!(!tracer.is_in_same_lane(0, 0));
        assert!(!tracer.is_gutter_in_lane(2, 2, 5, 5));
        assert_eq!(tracer.update_gutter_text(9, 2, 0, 0, "├"), "├");
        assert_eq!(tracer.node_lane(2), 1);
    }

    #[test]
    fn test_lane_limit_leaves_extra_rows_untraced() {
        let count = MAX_LANES as usize + 2;
        // Every row is its own branch ending in an elision, so each needs a new lane.
        let mut rows: Vec<Row> = (0..count).map(|i| row(&format!("r{i}"), &["○ ", "~ "])).collect();
        let tracer = LaneTracer::new(&mut rows, 0, count);
        assert_eq!(tracer.node_lane(0), 1);
        assert_eq!(tracer.node_lane(63), 1 << 63);
        assert_eq!(tracer.node_lane(64), 0);
        assert!(!tracer.is_in_same_lane(64, 64));
    }

    /// Octopus merge fanning out to three parents:
    ///
    /// ```text
    /// @      m
    /// ├─┬─╮
    /// │ │ ○  a
    /// │ ○ │  b
    /// ○ │ │  c
    /// ```
    #[test]
    fn test_octopus_parents_share_merge_lane() {
        let mut rows = vec![
            row("m", &["@      ", "├─┬─╮"]),
            row("a", &["│ │ ○  "]),
            row("b", &["│ ○ │  "]),
            row("c", &["○ │ │  "]),
        ];
        let tracer = LaneTracer::new(&mut rows, 0, 4);
        let shared: Vec<bool> = (0..4).map(|r| tracer.is_in_same_lane(r, 0)).collect();
        assert_eq!(shared, [true, true, true, true]);
        // The top tee splits: downward to b and onward to a's corner.
        assert_eq!(tracer.lane(0, 1, 2), 1);
        assert_eq!(tracer.lane(0, 1, 4), 1);
        assert_eq!(tracer.lane(1, 0, 2), 1);
        assert_eq!(tracer.node_lane(1), 1);
    }

    /// A left branch swinging right into a right tee:
    ///
    /// ```text
    ///   ○  t
    /// ○ │  l
    /// ╰─┤
    ///   ○  p
    /// ```
    #[test]
    fn test_right_corner_joins_right_tee() {
        let mut rows = vec![
            row("t", &["  ○  "]),
            row("l", &["○ │  ", "╰─┤  "]),
            row("p", &["  ○  "]),
        ];
        let tracer = LaneTracer::new(&mut rows, 0, 3);
        assert_eq!(tracer.node_lane(0), 1);
        assert_eq!(tracer.node_lane(1), 2);
        assert_eq!(tracer.node_lane(2), 3);
        assert_eq!(tracer.lane(1, 1, 0), 2);
        assert_eq!(tracer.lane(1, 1, 1), 2);
        assert_eq!(tracer.lane(1, 1, 2), 3);
        assert!(tracer.is_in_same_lane(2, 1));
        assert!(!tracer.is_in_same_lane(0, 1));
    }

    /// A crossing turns a rightward path downward:
    ///
    /// ```text
    /// │ ○      x
    /// │ │ @    m
    /// │ │ ├─┼─╮
    /// │ │ │ │ ○  a
    /// ```
    #[test]
    fn test_crossing_turns_path_down() {
        let mut rows = vec![
            row("x", &["│ ○  "]),
            row("m", &["│ │ @    ", "│ │ ├─┼─╮"]),
            row("a", &["│ │ │ │ ○  "]),
        ];
        let tracer = LaneTracer::new(&mut rows, 0, 3);
        assert_eq!(tracer.node_lane(0), 1);
        assert_eq!(tracer.node_lane(1), 2);
        assert_eq!(tracer.node_lane(2), 4);
        assert_eq!(tracer.lane(1, 1, 6), 2);
        assert_eq!(tracer.lane(2, 0, 6), 2);
        assert_eq!(tracer.lane(1, 1, 7), 0);
        assert_eq!(tracer.lane(1, 1, 8), 0);
        assert!(!tracer.is_in_same_lane(2, 1));
    }
}
