//! Row classification: splits styled lines into commit rows.
//!
//! A line whose content holds a change-id-like token starts a new row; every
//! other line is appended to the row being built. The graph columns to the
//! left of the change id on the header line fix the row's indent, and every
//! line of the row is split at that indent into gutter cells and content.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::glyph;
use super::model::{Commit, GraphGutter, GraphLine, LineFlags, Row};
use crate::segment::{StyledLine, StyledSegment};

/// Incremental classifier. Feed lines with [`push_line`](Self::push_line)
/// and collect the final row with [`finish`](Self::finish).
#[derive(Debug, Default)]
pub struct RowClassifier {
    current: Option<Row>,
    completed: usize,
}

impl RowClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classifies one line. Returns the previous row when this line starts a
    /// new one. Lines seen before the first header are dropped.
    pub fn push_line(&mut self, line: StyledLine) -> Option<Row> {
        let mut finished = None;

        if let Some(idx) = find_identifier_index(&line) {
            let mut row = start_row(&line, idx);
            if let Some(previous) = self.current.take() {
                row.previous = Some(self.completed);
                self.completed += 1;
                finished = Some(previous);
            }
            self.current = Some(row);
        }

        if let Some(row) = self.current.as_mut() {
            add_line(row, line);
        }
        finished
    }

    /// Returns the last open row, if any header was ever recognized.
    pub fn finish(&mut self) -> Option<Row> {
        let row = self.current.take()?;
        self.completed += 1;
        Some(row)
    }
}

/// Index of the first change-id-like segment.
///
/// A candidate in the last segment is rejected: a trailing alphabetic run
/// with nothing after it is continuation text, not a header.
pub fn find_identifier_index(line: &[StyledSegment]) -> Option<usize> {
    let idx = line.iter().position(|s| is_identifier_like(&s.text))?;
    (idx + 1 < line.len()).then_some(idx)
}

/// Index of the first hex-only segment at or after `from`.
pub fn find_commit_id_index(segments: &[StyledSegment], from: usize) -> Option<usize> {
    segments
        .iter()
        .enumerate()
        .skip(from)
        .find(|(_, s)| is_hex_like(&s.text))
        .map(|(idx, _)| idx)
}

fn is_identifier_like(text: &str) -> bool {
    !text.is_empty() && text.chars().all(char::is_alphabetic)
}

fn is_hex_like(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| c.is_ascii_hexdigit())
}

/// Reads a token starting at `idx`, extended over adjacent segments that
/// contain no whitespace. Returns the token and the index after it.
fn read_token(line: &[StyledSegment], idx: usize) -> (String, usize) {
    let mut token = line[idx].text.clone();
    let mut end = idx + 1;
    while let Some(next) = line.get(end) {
        if next.text.trim().is_empty() || next.text.contains(char::is_whitespace) {
            break;
        }
        token.push_str(&next.text);
        end += 1;
    }
    (token, end)
}

fn start_row(line: &[StyledSegment], idx: usize) -> Row {
    let indent = line[..idx].iter().map(|s| s.text.width()).sum();
    let (change_id, end) = read_token(line, idx);
    let commit_id = find_commit_id_index(line, end)
        .map(|c| read_token(line, c).0)
        .unwrap_or_default();

    Row {
        commit: Commit {
            change_id,
            commit_id,
            ..Commit::default()
        },
        lines: Vec::new(),
        indent,
        previous: None,
    }
}

/// Appends a physical line to `row`, splitting off its gutter and deciding
/// its flags.
pub fn add_line(row: &mut Row, segments: StyledLine) {
    let mut line = chop(segments, row.indent);

    if row.lines.is_empty() {
        line.flags = LineFlags::REVISION | LineFlags::HIGHLIGHTABLE;
        row.commit.is_working_copy = line.gutter.contains(glyph::WORKING_COPY);
        row.commit.hidden = line.segments.iter().any(|s| s.text.trim() == "hidden");
    } else if line.gutter.contains(glyph::ELISION) {
        line.flags = LineFlags::ELIDED;
    } else if row.commit.commit_id.is_empty()
        && let Some(idx) = find_commit_id_index(&line.segments, 0)
    {
        row.commit.commit_id = read_token(&line.segments, idx).0;
        line.flags = LineFlags::REVISION | LineFlags::HIGHLIGHTABLE;
    } else if let Some(previous) = row.lines.last() {
        line.flags = previous.flags - LineFlags::REVISION - LineFlags::ELIDED;
    }

    row.lines.push(line);
}

/// Splits a line into `indent` columns of single-character gutter cells and
/// the remaining content segments.
fn chop(segments: StyledLine, indent: usize) -> GraphLine {
    let mut gutter = GraphGutter::default();
    let mut content = Vec::new();
    let mut remaining = indent;

    for segment in segments {
        if remaining == 0 {
            content.push(segment);
            continue;
        }

        let mut split_at = segment.text.len();
        for (offset, c) in segment.text.char_indices() {
            if remaining == 0 {
                split_at = offset;
                break;
            }
            gutter
                .cells
                .push(StyledSegment::new(c.to_string(), segment.style));
            remaining = remaining.saturating_sub(c.width().unwrap_or(0).max(1));
        }

        if split_at < segment.text.len() {
            content.push(StyledSegment::new(
                &segment.text[split_at..],
                segment.style,
            ));
        }
    }

    GraphLine {
        segments: content,
        gutter,
        flags: LineFlags::empty(),
    }
}

/// Classifies a complete sequence of lines.
pub fn classify_lines(lines: impl IntoIterator<Item = StyledLine>) -> Vec<Row> {
    let mut classifier = RowClassifier::new();
    let mut rows: Vec<Row> = lines
        .into_iter()
        .filter_map(|line| classifier.push_line(line))
        .collect();
    rows.extend(classifier.finish());
    rows
}
