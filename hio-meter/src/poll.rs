//! Cancellable periodic task
//!
//! Runs a closure on a fixed interval on its own thread until the closure
//! returns [`ControlFlow::Break`] or the task is cancelled. Dropping the
//! handle cancels and joins, so a task never outlives its owner.

use std::ops::ControlFlow;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{bounded, select, tick, Sender};

use crate::error::MeterError;

/// Handle to a running periodic task
pub struct PollTask {
    name: String,
    // Dropping the sender wakes the worker
    stop_tx: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl PollTask {
    /// Start calling `poll` every `interval`. The first call happens after one interval.
    pub fn spawn<F>(name: impl Into<String>, interval: Duration, mut poll: F) -> Result<Self, MeterError>
    where
        F: FnMut() -> ControlFlow<()> + Send + 'static,
    {
        if interval.is_zero() {
            return Err(MeterError::ZeroInterval("Poll"));
        }
        let name = name.into();
        let (stop_tx, stop_rx) = bounded::<()>(0);

        let task_name = name.clone();
        let handle = thread::Builder::new()
            .name(format!("poll-{}", name))
            .spawn(move || {
                let ticker = tick(interval);
                loop {
                    select! {
                        recv(stop_rx) -> _ => break,
                        recv(ticker) -> _ => {
                            if poll().is_break() {
                                tracing::debug!(task = %task_name, "poll task finished");
                                break;
                            }
                        },
                    }
                }
            })?;

        tracing::debug!(task = %name, interval_ms = interval.as_millis() as u64, "poll task started");

        Ok(Self {
            name,
            stop_tx: Some(stop_tx),
            handle: Some(handle),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Worker has exited (cancelled or the closure broke out)
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, |h| h.is_finished())
    }

    /// Stop the task and wait for the worker. Idempotent.
    pub fn cancel(&mut self) {
        self.stop_tx.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::error!(task = %self.name, "poll task panicked");
            }
        }
    }
}

impl Drop for PollTask {
    fn drop(&mut self) {
        self.cancel();
    }
}
