//! Classification of the connector and node glyphs jj draws in its graph.

pub const WORKING_COPY: char = '@';
pub const ELISION: char = '~';
pub const VERTICAL: char = '│';

/// Whether `c` marks a commit node (working copy, normal, immutable, conflicted).
pub fn is_node(c: char) -> bool {
    matches!(c, '@' | '○' | '◆' | '×' | '◉' | '●' | '◌' | 'o' | 'x' | '*')
}

/// Whether a column keeps going below a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Continuation {
    /// Column continues as a vertical connector.
    Extend,
    /// Column keeps whatever the lines above decided.
    Carry,
    /// Column ends here.
    Terminate,
}

pub fn continuation(c: char) -> Continuation {
    match c {
        '─' | '-' => Continuation::Carry,
        '╯' | '╰' | '┘' | '└' | '┴' | ELISION | ' ' | '/' | '\\' => Continuation::Terminate,
        _ => Continuation::Extend,
    }
}

/// Turn implied by a corner glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Turn {
    Left,
    Right,
    Down,
}

/// How a lane trace reacts to a glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connector {
    /// `─`: keeps the current direction.
    Horizontal,
    /// `┤`: turns downward.
    RightTee,
    /// `┬`: splits into downward and the current direction.
    TopTee,
    /// `├`: continues downward, and right when a branch corner follows.
    LeftTee,
    Corner(Turn),
    /// `~`: hidden history, the trace stops.
    Elision,
    /// Vertical bars, crossings, nodes, blanks and anything unexpected: downward.
    Other,
}

pub fn connector(c: char) -> Connector {
    match c {
        '─' | '-' => Connector::Horizontal,
        '┤' => Connector::RightTee,
        '┬' => Connector::TopTee,
        '├' => Connector::LeftTee,
        '╯' | '┘' => Connector::Corner(Turn::Left),
        '╰' | '└' => Connector::Corner(Turn::Right),
        '╮' | '╭' | '┐' | '┌' => Connector::Corner(Turn::Down),
        ELISION => Connector::Elision,
        _ => Connector::Other,
    }
}

/// Corner glyphs that open a new branch to the right of a left tee.
pub fn is_branch_corner(c: char) -> bool {
    matches!(c, '╮' | '┐' | '┬')
}

/// Glyphs that may sit between a left tee and its branch corner.
pub fn is_horizontal_run(c: char) -> bool {
    connector(c) == Connector::Horizontal || matches!(c, '┼' | '+' | '┴')
}

pub fn is_left_tee(c: char) -> bool {
    connector(c) == Connector::LeftTee
}
