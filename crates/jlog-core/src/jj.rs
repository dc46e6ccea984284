//! Sources of graph output: the `jj log` subprocess and in-memory buffers.

use std::io;
use std::path::PathBuf;
use std::pin::Pin;
use std::process::Stdio;
use std::task::{Context as TaskContext, Poll};

use anyhow::{Context, Result};
use tokio::io::{AsyncRead, ReadBuf};
use tokio::process::{Child, ChildStdout, Command};
use tracing::info;

/// Something that can be opened into a byte stream of colored graph output.
///
/// Opening is the only step of a stream that can fail; once the reader
/// exists, read errors end the stream like end of input.
pub trait LineSource {
    type Reader: AsyncRead + Unpin + Send + 'static;

    /// Opens the source.
    ///
    /// # Errors
    /// Returns an error if the source cannot be opened.
    fn open(self) -> Result<Self::Reader>;
}

impl<T> LineSource for io::Cursor<T>
where
    T: AsRef<[u8]> + Unpin + Send + 'static,
{
    type Reader = Self;

    fn open(self) -> Result<Self::Reader> {
        Ok(self)
    }
}

/// Builder for a `jj log` invocation with graph and color output enabled.
#[derive(Debug, Clone)]
pub struct JjLog {
    program: String,
    repository: Option<PathBuf>,
    revset: Option<String>,
    limit: Option<usize>,
    extra_args: Vec<String>,
}

impl JjLog {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            repository: None,
            revset: None,
            limit: None,
            extra_args: Vec::new(),
        }
    }

    #[must_use]
    pub fn repository(mut self, repository: Option<PathBuf>) -> Self {
        self.repository = repository;
        self
    }

    #[must_use]
    pub fn revset(mut self, revset: Option<String>) -> Self {
        self.revset = revset.filter(|r| !r.trim().is_empty());
        self
    }

    #[must_use]
    pub fn limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    #[must_use]
    pub fn extra_args(mut self, args: Vec<String>) -> Self {
        self.extra_args = args;
        self
    }

    pub fn revset_label(&self) -> &str {
        self.revset.as_deref().unwrap_or("(default)")
    }

    /// Arguments passed to the program, without the program itself.
    pub fn args(&self) -> Vec<String> {
        let mut args = vec![
            "log".to_string(),
            "--color".to_string(),
            "always".to_string(),
            "--no-pager".to_string(),
            "--quiet".to_string(),
        ];
        if let Some(revset) = &self.revset {
            args.push("-r".to_string());
            args.push(revset.clone());
        }
        if let Some(limit) = self.limit {
            args.push("--limit".to_string());
            args.push(limit.to_string());
        }
        if let Some(repository) = &self.repository {
            args.push("-R".to_string());
            args.push(repository.to_string_lossy().into_owned());
        }
        args.extend(self.extra_args.iter().cloned());
        args
    }
}

impl LineSource for JjLog {
    type Reader = LogOutput;

    fn open(self) -> Result<Self::Reader> {
        let args = self.args();
        info!(program = %self.program, ?args, "spawning jj log");

        let mut child = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("Failed to spawn '{}'", self.program))?;
        let stdout = child
            .stdout
            .take()
            .context("jj log stdout was not captured")?;

        Ok(LogOutput {
            stdout,
            _child: child,
        })
    }
}

/// Stdout of a running `jj log`. Dropping it kills the process.
#[derive(Debug)]
pub struct LogOutput {
    stdout: ChildStdout,
    _child: Child,
}

impl AsyncRead for LogOutput {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut TaskContext<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        Pin::new(&mut self.get_mut().stdout).poll_read(cx, buf)
    }
}
