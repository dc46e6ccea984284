//! Shared helpers used across feature slices.

pub mod style;
pub mod text;
