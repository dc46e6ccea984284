//! Styled text runs decoded from terminal output.
//!
//! These types are UI-agnostic: the TUI converts `SegmentStyle` into its own
//! style type at render time, which keeps the core free of terminal
//! dependencies.

use bitflags::bitflags;

/// A terminal color as emitted by SGR sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentColor {
    /// Palette index (0-15 for the basic colors, 16-255 for the extended palette).
    Indexed(u8),
    /// 24-bit color.
    Rgb(u8, u8, u8),
}

bitflags! {
    /// Text attributes carried by a segment.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct SegmentModifiers: u8 {
        const BOLD = 1;
        const DIM = 1 << 1;
        const ITALIC = 1 << 2;
        const UNDERLINED = 1 << 3;
        const REVERSED = 1 << 4;
    }
}

/// Display attributes of a segment. Opaque to the graph parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SegmentStyle {
    pub fg: Option<SegmentColor>,
    pub bg: Option<SegmentColor>,
    pub modifiers: SegmentModifiers,
}

/// A run of text sharing one style.
///
/// `lane` is a bitmask written only by the lane tracer; every other stage
/// leaves it at zero.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StyledSegment {
    pub text: String,
    pub style: SegmentStyle,
    pub lane: u64,
}

impl StyledSegment {
    pub fn new(text: impl Into<String>, style: SegmentStyle) -> Self {
        Self {
            text: text.into(),
            style,
            lane: 0,
        }
    }

    /// Creates an unstyled segment.
    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, SegmentStyle::default())
    }

    /// Returns the first character of the segment, or a space for empty text.
    pub fn glyph(&self) -> char {
        self.text.chars().next().unwrap_or(' ')
    }
}

/// One physical line of terminal output.
pub type StyledLine = Vec<StyledSegment>;
