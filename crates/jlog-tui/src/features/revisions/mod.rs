//! Revision list feature slice.
//!
//! - `state.rs`: loaded rows, cursor, scroll window, paging flags
//! - `update.rs`: key handling and stream events
//! - `render.rs`: graph lines with lane highlighting

mod render;
mod state;
mod update;

pub use render::{build_lines, lane_members, render_revisions};
pub use state::RevisionListState;
pub use update::{
    handle_batch, handle_key, handle_mouse, handle_stream_ended, handle_stream_started,
    handle_viewport, request_more_if_needed,
};

/// Colored jj-style rows: `count` revisions on one lane, two lines each.
#[cfg(test)]
pub(crate) fn sample_rows(count: usize) -> Vec<jlog_core::graph::Row> {
    let mut out = String::new();
    for i in 0..count {
        let node = if i == 0 { '@' } else { '○' };
        let change: String = (0..4)
            .map(|shift| char::from(b'k' + ((i >> (shift * 4)) % 16) as u8))
            .collect();
        out.push_str(&format!(
            "{node}  \x1b[1m\x1b[38;5;5m{change}\x1b[0m user \x1b[38;5;4m{i:08x}\x1b[39m\n"
        ));
        out.push_str(&format!("│  description {i}\n"));
    }
    jlog_core::graph::parse_rows(out.as_bytes())
}
