use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::registry::{RegistryReader, SharedListener};

/// Decoded items produced by one fetch or one received payload.
///
/// A batch is consumed by value, exactly once.
#[derive(Debug)]
pub struct NotificationBatch<T> {
    items: Vec<T>,
}

impl<T> NotificationBatch<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T> From<Vec<T>> for NotificationBatch<T> {
    fn from(items: Vec<T>) -> Self {
        Self::new(items)
    }
}

impl<T> IntoIterator for NotificationBatch<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchOutcome {
    /// Listener invocations that returned `Ok`.
    pub delivered: usize,
    /// Listener invocations that returned `Err` or panicked.
    pub failed: usize,
    /// Items dropped because the dispatcher was cancelled mid-batch.
    pub discarded: usize,
}

/// Deliver every item of `batch` to every listener of `snapshot`.
///
/// Items are delivered in batch order and, for each item, listeners in snapshot order.
/// A failing listener is logged and skipped.
pub fn dispatch<T>(batch: NotificationBatch<T>, snapshot: &[SharedListener<T>]) -> DispatchOutcome {
    dispatch_until("notification", batch, snapshot, None)
}

fn dispatch_until<T>(
    kind: &'static str,
    batch: NotificationBatch<T>,
    snapshot: &[SharedListener<T>],
    cancel: Option<&CancellationToken>,
) -> DispatchOutcome {
    let mut outcome = DispatchOutcome::default();
    let total = batch.len();

    for (index, item) in batch.into_iter().enumerate() {
        if cancel.is_some_and(CancellationToken::is_cancelled) {
            outcome.discarded = total - index;
            debug!(kind, discarded = outcome.discarded, "dispatch cancelled");
            break;
        }

        for (position, listener) in snapshot.iter().enumerate() {
            match catch_unwind(AssertUnwindSafe(|| listener.on_notification(&item))) {
                Ok(Ok(())) => outcome.delivered += 1,
                Ok(Err(err)) => {
                    outcome.failed += 1;
                    warn!(kind, listener = position, error = %err, "listener failed");
                }
                Err(payload) => {
                    outcome.failed += 1;
                    warn!(
                        kind,
                        listener = position,
                        panic = panic_message(payload.as_ref()),
                        "listener panicked"
                    );
                }
            }
        }
    }

    outcome
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "non-string panic payload"
    }
}

/// Fan-out stage fed by a producer over a bounded channel.
///
/// Each received batch is dispatched against a fresh registry snapshot. When built with
/// [`Dispatcher::discard_after`], cancellation stops delivery immediately, including the
/// rest of an in-flight batch; otherwise the dispatcher drains until every sender is gone.
pub struct Dispatcher<T> {
    kind: &'static str,
    reader: RegistryReader<T>,
    cancel: Option<CancellationToken>,
}

impl<T> Dispatcher<T> {
    pub fn new(kind: &'static str, reader: RegistryReader<T>) -> Self {
        Self {
            kind,
            reader,
            cancel: None,
        }
    }

    pub fn discard_after(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn dispatch(&self, batch: NotificationBatch<T>) -> DispatchOutcome {
        let snapshot = self.reader.snapshot();
        dispatch_until(self.kind, batch, &snapshot, self.cancel.as_ref())
    }

    pub async fn run(self, mut batches: mpsc::Receiver<NotificationBatch<T>>) {
        loop {
            let batch = match self.cancel.as_ref() {
                Some(token) => tokio::select! {
                    biased;
                    _ = token.cancelled() => None,
                    batch = batches.recv() => batch,
                },
                None => batches.recv().await,
            };
            let Some(batch) = batch else {
                break;
            };

            let items = batch.len();
            let outcome = self.dispatch(batch);
            debug!(
                kind = self.kind,
                items,
                delivered = outcome.delivered,
                failed = outcome.failed,
                discarded = outcome.discarded,
                "dispatched notification batch"
            );
        }
        debug!(kind = self.kind, "dispatcher exited");
    }
}
