//! UI effect types.
//!
//! Effects are commands returned by the reducer that the runtime executes.
//! They cover stream I/O only; state changes stay in the reducer.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiEffect {
    /// Quit the application.
    Quit,
    /// Ask the live stream for its next batch.
    RequestMore,
    /// Close the live stream and start a fresh one.
    Reload,
}
