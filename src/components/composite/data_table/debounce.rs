//! Debounced Query Channel
//!
//! The displayed query follows every keystroke; the settled query is only
//! released after a quiet interval. One timer slot: new input aborts the
//! pending timer, and dropping the channel aborts it too.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::services::spawn_named_in_tokio;

/// Single-slot debounce for the search box
#[derive(Debug)]
pub struct DebouncedQuery {
    quiet: Duration,
    displayed: String,
    /// Bumped on every input; fired timers carry the value they were armed with
    generation: u64,
    pending: Option<JoinHandle<()>>,
    tx: mpsc::UnboundedSender<(u64, String)>,
    rx: mpsc::UnboundedReceiver<(u64, String)>,
}

impl DebouncedQuery {
    pub fn new(quiet: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            quiet,
            displayed: String::new(),
            generation: 0,
            pending: None,
            tx,
            rx,
        }
    }

    /// Text currently shown in the search box
    pub fn displayed(&self) -> &str {
        &self.displayed
    }

    pub fn quiet_interval(&self) -> Duration {
        self.quiet
    }

    /// Whether a timer is armed and has not been collected yet
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Record a keystroke
    ///
    /// Returns `Some("")` when the box was cleared: clearing is released
    /// immediately instead of waiting for the quiet interval.
    pub fn input(&mut self, raw: impl Into<String>) -> Option<String> {
        self.displayed = raw.into();
        self.cancel();
        self.generation += 1;

        if self.displayed.is_empty() {
            return Some(String::new());
        }

        let generation = self.generation;
        let query = self.displayed.clone();
        let tx = self.tx.clone();
        let quiet = self.quiet;
        self.pending = Some(spawn_named_in_tokio("search-debounce", async move {
            tokio::time::sleep(quiet).await;
            let _ = tx.send((generation, query));
        }));
        None
    }

    /// Abort the pending timer, if any
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    /// Forget the typed text and any pending timer
    pub fn reset(&mut self) {
        self.cancel();
        self.generation += 1;
        self.displayed.clear();
    }

    /// Collect a settled query without waiting
    pub fn try_settled(&mut self) -> Option<String> {
        let mut latest = None;
        while let Ok((generation, query)) = self.rx.try_recv() {
            if generation == self.generation {
                latest = Some(query);
            } else {
                tracing::trace!(generation, current = self.generation, "Dropped stale search");
            }
        }
        if latest.is_some() {
            self.pending = None;
        }
        latest
    }

    /// Wait for the pending timer to release its query
    ///
    /// Returns `None` immediately when nothing is pending.
    pub async fn settled(&mut self) -> Option<String> {
        while self.pending.is_some() {
            let (generation, query) = self.rx.recv().await?;
            if generation == self.generation {
                self.pending = None;
                return Some(query);
            }
        }
        None
    }
}

impl Drop for DebouncedQuery {
    fn drop(&mut self) {
        self.cancel();
    }
}
