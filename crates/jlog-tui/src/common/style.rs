//! Conversion from parsed terminal styles to ratatui styles.

use jlog_core::{SegmentColor, SegmentModifiers, SegmentStyle};
use ratatui::style::{Color, Modifier, Style};

pub fn color(color: SegmentColor) -> Color {
    match color {
        SegmentColor::Indexed(idx) => match idx {
            0 => Color::Black,
            1 => Color::Red,
            2 => Color::Green,
            3 => Color::Yellow,
            4 => Color::Blue,
            5 => Color::Magenta,
            6 => Color::Cyan,
            7 => Color::Gray,
            8 => Color::DarkGray,
            9 => Color::LightRed,
            10 => Color::LightGreen,
            11 => Color::LightYellow,
            12 => Color::LightBlue,
            13 => Color::LightMagenta,
            14 => Color::LightCyan,
            15 => Color::White,
            _ => Color::Indexed(idx),
        },
        SegmentColor::Rgb(r, g, b) => Color::Rgb(r, g, b),
    }
}

/// Builds the ratatui style for a segment as jj colored it.
pub fn to_style(style: SegmentStyle) -> Style {
    let mut out = Style::default();
    if let Some(fg) = style.fg {
        out = out.fg(color(fg));
    }
    if let Some(bg) = style.bg {
        out = out.bg(color(bg));
    }

    let mut modifier = Modifier::empty();
    for (flag, m) in [
        (SegmentModifiers::BOLD, Modifier::BOLD),
        (SegmentModifiers::DIM, Modifier::DIM),
        (SegmentModifiers::ITALIC, Modifier::ITALIC),
        (SegmentModifiers::UNDERLINED, Modifier::UNDERLINED),
        (SegmentModifiers::REVERSED, Modifier::REVERSED),
    ] {
        if style.modifiers.contains(flag) {
            modifier |= m;
        }
    }
    out.add_modifier(modifier)
}
