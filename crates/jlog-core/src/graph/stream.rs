//! Pull-driven streaming of classified rows.
//!
//! One background task reads styled lines, classifies them and hands rows to
//! the consumer in batches. The task never runs ahead of the consumer: once
//! more than `batch_size` completed rows are pending it waits for a
//! [`ControlSignal`]. `RequestMore` releases the pending rows as a batch,
//! `Close` (or dropping the stream) stops the task.
//!
//! At end of input the open row is finalized and, if anything is pending,
//! one more request releases it as the final batch (`has_more == false`).
//! The task then waits for one last control message before exiting, so a
//! consumer that sends after the final batch never blocks.

use anyhow::{Result, bail};
use tokio::io::{AsyncRead, BufReader};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;
use tracing::{debug, warn};

use super::classifier::RowClassifier;
use super::model::{ControlSignal, Row, RowBatch};
use crate::ansi::StyledLineReader;
use crate::jj::LineSource;

/// Default number of rows per batch.
pub const DEFAULT_BATCH_SIZE: usize = 50;

/// Consumer side of a running stream.
///
/// Holds the batch receiver and the control sender. After the final batch
/// has been received the control side is dropped, so further requests fail
/// immediately instead of waiting on a finished worker.
#[derive(Debug)]
pub struct GraphStream {
    batches: mpsc::Receiver<RowBatch>,
    control: Option<mpsc::Sender<ControlSignal>>,
}

/// Result of polling a stream without waiting.
#[derive(Debug)]
pub enum StreamPoll {
    Batch(RowBatch),
    Pending,
    /// The worker is gone; no further batches will arrive.
    Ended,
}

/// Starts streaming rows from `source`.
///
/// Must be called from within a Tokio runtime. The only failure is opening
/// the source; no task is spawned in that case.
///
/// # Errors
/// Returns an error if the source cannot be opened.
pub fn start_stream<S: LineSource>(source: S, batch_size: usize) -> Result<GraphStream> {
    let reader = source.open()?;
    let (batch_tx, batch_rx) = mpsc::channel(1);
    let (control_tx, control_rx) = mpsc::channel(1);

    tokio::spawn(run_worker(reader, batch_size, batch_tx, control_rx));

    Ok(GraphStream {
        batches: batch_rx,
        control: Some(control_tx),
    })
}

impl GraphStream {
    /// Asks the worker for the next batch.
    ///
    /// At most one request may be outstanding at a time.
    ///
    /// # Errors
    /// Returns an error once the final batch was received or the worker has stopped.
    pub fn request_more(&mut self) -> Result<()> {
        let Some(control) = &self.control else {
            bail!("graph stream has no more batches");
        };
        if control.try_send(ControlSignal::RequestMore).is_err() {
            self.control = None;
            bail!("graph stream worker is not accepting requests");
        }
        Ok(())
    }

    /// Waits for the next batch. `None` means the stream has ended.
    pub async fn next_batch(&mut self) -> Option<RowBatch> {
        let batch = self.batches.recv().await;
        self.observe(batch.as_ref());
        batch
    }

    /// Requests and waits for the next batch.
    ///
    /// # Errors
    /// Returns an error if no request can be sent.
    pub async fn fetch(&mut self) -> Result<Option<RowBatch>> {
        self.request_more()?;
        Ok(self.next_batch().await)
    }

    /// Returns a batch if one has arrived, without waiting.
    pub fn try_next(&mut self) -> StreamPoll {
        match self.batches.try_recv() {
            Ok(batch) => {
                self.observe(Some(&batch));
                StreamPoll::Batch(batch)
            }
            Err(TryRecvError::Empty) => StreamPoll::Pending,
            Err(TryRecvError::Disconnected) => {
                self.control = None;
                StreamPoll::Ended
            }
        }
    }

    /// Whether more batches may still be requested.
    pub fn is_open(&self) -> bool {
        self.control.is_some()
    }

    /// Stops the worker. No further batches are delivered.
    pub fn close(mut self) {
        if let Some(control) = self.control.take() {
            // A full channel means a request is in flight; dropping the
            // sender below stops the worker at its next wait instead.
            let _ = control.try_send(ControlSignal::Close);
        }
    }

    fn observe(&mut self, batch: Option<&RowBatch>) {
        if batch.is_none_or(|b| !b.has_more) {
            self.control = None;
        }
    }
}

async fn run_worker<R>(
    reader: R,
    batch_size: usize,
    batch_tx: mpsc::Sender<RowBatch>,
    mut control_rx: mpsc::Receiver<ControlSignal>,
) where
    R: AsyncRead + Unpin + Send + 'static,
{
    let mut lines = StyledLineReader::new(BufReader::new(reader));
    let mut classifier = RowClassifier::new();
    let mut pending: Vec<Row> = Vec::new();
    let mut emitted = 0usize;

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(err) => {
                warn!(error = %err, "reading graph output failed, ending stream");
                break;
            }
        };

        let Some(row) = classifier.push_line(line) else {
            continue;
        };
        pending.push(row);
        if pending.len() <= batch_size {
            continue;
        }

        match control_rx.recv().await {
            Some(ControlSignal::RequestMore) => {
                let items = std::mem::take(&mut pending);
                emitted += items.len();
                debug!(rows = items.len(), emitted, "emitting batch");
                if batch_tx
                    .send(RowBatch {
                        items,
                        has_more: true,
                    })
                    .await
                    .is_err()
                {
                    debug!("batch receiver dropped, stopping stream");
                    return;
                }
            }
            Some(ControlSignal::Close) | None => {
                debug!(emitted, "stream closed by consumer");
                return;
            }
        }
    }

    drop(lines);
    pending.extend(classifier.finish());
    debug!(pending = pending.len(), emitted, "graph input exhausted");

    if !pending.is_empty() {
        match control_rx.recv().await {
            Some(ControlSignal::RequestMore) => {
                let _ = batch_tx
                    .send(RowBatch {
                        items: pending,
                        has_more: false,
                    })
                    .await;
            }
            Some(ControlSignal::Close) | None => {
                debug!(emitted, "stream closed before final batch");
                return;
            }
        }
    }

    drop(batch_tx);
    let _ = control_rx.recv().await;
}
