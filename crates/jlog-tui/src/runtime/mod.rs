//! TUI runtime: owns the terminal and the graph stream, runs the event loop,
//! executes effects.
//!
//! This is the "Elm runtime" boundary: all side effects happen here. The
//! reducer stays pure and produces effects; this module executes them.

use std::io::Stdout;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event;
use jlog_core::graph::{GraphStream, StreamPoll, start_stream};
use jlog_core::jj::JjLog;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::{debug, info, warn};

use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::state::AppState;
use crate::{render, terminal, update};

/// Poll duration while a batch is in flight.
pub const FRAME_DURATION: Duration = Duration::from_millis(16);

/// Poll duration when idle.
pub const IDLE_POLL_DURATION: Duration = Duration::from_millis(100);

/// Full-screen TUI runtime.
///
/// Terminal state is restored on drop and on panic.
pub struct TuiRuntime {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    pub state: AppState,
    /// Invocation restarted on reload.
    source: JjLog,
    batch_size: usize,
    /// Live stream; `None` once it delivered its final batch or ended.
    stream: Option<GraphStream>,
    last_tick: Instant,
}

impl TuiRuntime {
    /// Takes over the terminal for an already started stream.
    ///
    /// # Errors
    /// Returns an error if the terminal cannot be set up.
    pub fn new(
        state: AppState,
        source: JjLog,
        batch_size: usize,
        stream: GraphStream,
    ) -> Result<Self> {
        terminal::install_panic_hook();
        let terminal = terminal::setup_terminal().context("Failed to setup terminal")?;

        Ok(Self {
            terminal,
            state,
            source,
            batch_size,
            stream: Some(stream),
            last_tick: Instant::now(),
        })
    }

    /// Runs the main event loop until the user quits.
    ///
    /// # Errors
    /// Returns an error if terminal I/O fails.
    pub fn run(&mut self) -> Result<()> {
        terminal::enable_input_features()?;

        self.dispatch_event(UiEvent::StreamStarted);
        let result = self.event_loop();

        let _ = terminal::disable_input_features();
        if let Some(stream) = self.stream.take() {
            stream.close();
        }
        result
    }

    fn event_loop(&mut self) -> Result<()> {
        let mut dirty = true;

        while !self.state.should_quit {
            let mut events = self.collect_events()?;

            // Layout first so every other event sees the current viewport.
            let size = self.terminal.size()?;
            events.insert(
                0,
                UiEvent::Frame {
                    width: size.width,
                    height: size.height,
                },
            );

            for event in events {
                if !matches!(event, UiEvent::Frame { .. }) {
                    dirty = true;
                }
                let effects = update::update(&mut self.state, event);
                self.execute_effects(effects);
            }

            if dirty {
                self.terminal.draw(|frame| render::render(&self.state, frame))?;
                dirty = false;
            }
        }

        Ok(())
    }

    // ========================================================================
    // Event Collection
    // ========================================================================

    /// Collects events from the stream and the terminal.
    fn collect_events(&mut self) -> Result<Vec<UiEvent>> {
        let mut events = Vec::new();
        self.collect_stream_events(&mut events);

        let tick_interval = if self.state.revisions.loading {
            FRAME_DURATION
        } else {
            IDLE_POLL_DURATION
        };
        let time_until_tick = tick_interval.saturating_sub(self.last_tick.elapsed());
        let poll_duration = if events.is_empty() {
            time_until_tick
        } else {
            Duration::ZERO
        };

        if event::poll(poll_duration)? {
            events.push(UiEvent::Terminal(event::read()?));
            while event::poll(Duration::ZERO)? {
                events.push(UiEvent::Terminal(event::read()?));
            }
        }

        if self.last_tick.elapsed() >= tick_interval {
            events.push(UiEvent::Tick);
            self.last_tick = Instant::now();
        }

        Ok(events)
    }

    /// Polls the live stream without blocking.
    fn collect_stream_events(&mut self, events: &mut Vec<UiEvent>) {
        let Some(stream) = self.stream.as_mut() else {
            return;
        };
        match stream.try_next() {
            StreamPoll::Batch(batch) => {
                debug!(rows = batch.items.len(), has_more = batch.has_more, "batch received");
                if !batch.has_more {
                    info!("stream finished");
                    self.stream = None;
                }
                events.push(UiEvent::Batch(batch));
            }
            StreamPoll::Pending => {}
            StreamPoll::Ended => {
                info!("stream ended without a final batch");
                self.stream = None;
                events.push(UiEvent::StreamEnded);
            }
        }
    }

    // ========================================================================
    // Effect Dispatch
    // ========================================================================

    fn execute_effects(&mut self, effects: Vec<UiEffect>) {
        for effect in effects {
            self.execute_effect(effect);
        }
    }

    fn dispatch_event(&mut self, event: UiEvent) {
        let effects = update::update(&mut self.state, event);
        if !effects.is_empty() {
            self.execute_effects(effects);
        }
    }

    fn execute_effect(&mut self, effect: UiEffect) {
        match effect {
            UiEffect::Quit => {
                self.state.should_quit = true;
            }
            UiEffect::RequestMore => self.request_more(),
            UiEffect::Reload => self.restart_stream(),
        }
    }

    fn request_more(&mut self) {
        let result = match self.stream.as_mut() {
            Some(stream) => stream.request_more(),
            None => Err(anyhow::anyhow!("no live stream")),
        };
        if let Err(err) = result {
            warn!(error = %err, "request for more rows failed");
            self.stream = None;
            self.dispatch_event(UiEvent::StreamEnded);
        }
    }

    /// Closes the live stream and starts a new one from the same source.
    fn restart_stream(&mut self) {
        if let Some(stream) = self.stream.take() {
            stream.close();
        }

        match start_stream(self.source.clone(), self.batch_size) {
            Ok(stream) => {
                info!(revset = self.source.revset_label(), "stream restarted");
                self.stream = Some(stream);
                self.dispatch_event(UiEvent::StreamStarted);
            }
            Err(err) => {
                let message = format!("{err:#}");
                warn!(error = %message, "failed to restart stream");
                self.dispatch_event(UiEvent::StreamFailed(message));
            }
        }
    }
}

impl Drop for TuiRuntime {
    fn drop(&mut self) {
        let _ = terminal::restore_terminal();
    }
}
