//! Styled line source: turns colored terminal output into styled lines.
//!
//! Bytes are fed through a `vte` parser. Printable characters accumulate
//! into the current segment; SGR (`CSI ... m`) sequences update the pen and
//! start a new segment when the resulting style differs. Every other control
//! sequence is ignored. The pen carries across lines, as in a terminal.

use std::io;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use vte::{Params, Parser, Perform};

use crate::segment::{SegmentColor, SegmentModifiers, SegmentStyle, StyledLine, StyledSegment};

/// Width used when expanding a tab character.
const TAB_WIDTH: usize = 4;

/// Reads styled lines one at a time from an async byte stream.
pub struct StyledLineReader<R> {
    reader: R,
    parser: Parser,
    pen: SgrPen,
    buf: Vec<u8>,
}

impl<R: AsyncBufRead + Unpin> StyledLineReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            parser: Parser::new(),
            pen: SgrPen::default(),
            buf: Vec::new(),
        }
    }

    /// Reads the next line, or `None` once the stream is exhausted.
    ///
    /// # Errors
    /// Returns an error if the underlying reader fails.
    pub async fn next_line(&mut self) -> io::Result<Option<StyledLine>> {
        self.buf.clear();
        let read = self.reader.read_until(b'\n', &mut self.buf).await?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(decode_line(&mut self.parser, &mut self.pen, &self.buf)))
    }
}

/// Decodes a complete buffer into styled lines.
///
/// A trailing newline does not produce an extra empty line.
pub fn parse_styled_lines(bytes: &[u8]) -> Vec<StyledLine> {
    let mut parser = Parser::new();
    let mut pen = SgrPen::default();
    bytes
        .split_inclusive(|b| *b == b'\n')
        .map(|line| decode_line(&mut parser, &mut pen, line))
        .collect()
}

fn decode_line(parser: &mut Parser, pen: &mut SgrPen, raw: &[u8]) -> StyledLine {
    let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    parser.advance(pen, raw);
    pen.take_line()
}

/// `vte` performer that tracks the SGR pen and collects segments.
#[derive(Debug, Default)]
struct SgrPen {
    style: SegmentStyle,
    text: String,
    segments: StyledLine,
}

impl SgrPen {
    fn flush(&mut self) {
        if !self.text.is_empty() {
            let text = std::mem::take(&mut self.text);
            self.segments.push(StyledSegment::new(text, self.style));
        }
    }

    fn take_line(&mut self) -> StyledLine {
        self.flush();
        std::mem::take(&mut self.segments)
    }
}

impl Perform for SgrPen {
    fn print(&mut self, c: char) {
        self.text.push(c);
    }

    fn execute(&mut self, byte: u8) {
        if byte == b'\t' {
            self.text.extend(std::iter::repeat_n(' ', TAB_WIDTH));
        }
    }

    fn csi_dispatch(&mut self, params: &Params, _intermediates: &[u8], ignore: bool, action: char) {
        if ignore || action != 'm' {
            return;
        }
        let mut next = self.style;
        apply_sgr(&mut next, params);
        if next != self.style {
            self.flush();
            self.style = next;
        }
    }
}

/// Applies one SGR sequence to `style`.
///
/// Extended colors are accepted in both the `38;5;n` form and the colon
/// sub-parameter form `38:5:n`.
fn apply_sgr(style: &mut SegmentStyle, params: &Params) {
    let groups: Vec<&[u16]> = params.iter().collect();
    if groups.is_empty() {
        *style = SegmentStyle::default();
        return;
    }

    let mut i = 0;
    while i < groups.len() {
        let group = groups[i];
        let code = group.first().copied().unwrap_or(0);
        i += 1;
        match code {
            0 => *style = SegmentStyle::default(),
            1 => style.modifiers.insert(SegmentModifiers::BOLD),
            2 => style.modifiers.insert(SegmentModifiers::DIM),
            3 => style.modifiers.insert(SegmentModifiers::ITALIC),
            4 => style.modifiers.insert(SegmentModifiers::UNDERLINED),
            7 => style.modifiers.insert(SegmentModifiers::REVERSED),
            22 => style
                .modifiers
                .remove(SegmentModifiers::BOLD | SegmentModifiers::DIM),
            23 => style.modifiers.remove(SegmentModifiers::ITALIC),
            24 => style.modifiers.remove(SegmentModifiers::UNDERLINED),
            27 => style.modifiers.remove(SegmentModifiers::REVERSED),
            30..=37 => style.fg = Some(SegmentColor::Indexed((code - 30) as u8)),
            39 => style.fg = None,
            40..=47 => style.bg = Some(SegmentColor::Indexed((code - 40) as u8)),
            49 => style.bg = None,
            90..=97 => style.fg = Some(SegmentColor::Indexed((code - 90 + 8) as u8)),
            100..=107 => style.bg = Some(SegmentColor::Indexed((code - 100 + 8) as u8)),
            38 | 48 => {
                let color = if group.len() > 1 {
                    extended_color(&group[1..]).map(|(color, _)| color)
                } else {
                    let rest: Vec<u16> = groups[i..]
                        .iter()
                        .map(|g| g.first().copied().unwrap_or(0))
                        .collect();
                    extended_color(&rest).map(|(color, used)| {
                        i += used;
                        color
                    })
                };
                if code == 38 {
                    style.fg = color.or(style.fg);
                } else {
                    style.bg = color.or(style.bg);
                }
            }
            _ => {}
        }
    }
}

/// Parses `5;n` or `2;r;g;b`, returning the color and the number of values used.
fn extended_color(values: &[u16]) -> Option<(SegmentColor, usize)> {
    match values {
        [5, n, ..] => Some((SegmentColor::Indexed(*n as u8), 2)),
        [2, r, g, b, ..] => Some((SegmentColor::Rgb(*r as u8, *g as u8, *b as u8), 4)),
        _ => None,
    }
}
