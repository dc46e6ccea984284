//! Render command handler.
//!
//! Summarizes a captured `jj log --color always` output, one line per revision.

use std::fmt::Write as _;
use std::io::{self, Read};
use std::path::Path;

use anyhow::{Context, Result};
use jlog_core::graph::{Row, parse_rows};
use tracing::debug;

pub fn run(file: Option<&Path>) -> Result<()> {
    let bytes = read_input(file)?;
    let rows = parse_rows(&bytes);
    debug!(bytes = bytes.len(), rows = rows.len(), "parsed captured log");

    print!("{}", summarize(&rows));
    Ok(())
}

fn read_input(file: Option<&Path>) -> Result<Vec<u8>> {
    if let Some(path) = file {
        return std::fs::read(path).with_context(|| format!("read {}", path.display()));
    }
    let mut bytes = Vec::new();
    io::stdin()
        .read_to_end(&mut bytes)
        .context("read log from stdin")?;
    Ok(bytes)
}

fn summarize(rows: &[Row]) -> String {
    if rows.is_empty() {
        return "no matching revisions\n".to_string();
    }

    let mut out = String::new();
    for row in rows {
        let commit = &row.commit;
        let _ = write!(
            out,
            "{} {} lines={}",
            commit.change_id,
            commit.commit_id,
            row.lines.len()
        );
        if commit.is_working_copy {
            out.push_str(" working-copy");
        }
        if commit.hidden {
            out.push_str(" hidden");
        }
        out.push('\n');
    }
    out
}
