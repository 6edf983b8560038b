use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::dispatch::{Dispatcher, NotificationBatch};
use super::registry::RegistryReader;
use super::{ActivityState, BATCH_CHANNEL_CAPACITY, BoxFuture, lock};
use crate::client::OneApiError;
use crate::domain::ValidationError;

/// Source of notification batches for a [`PullRetriever`].
///
/// Implemented for closures returning a `Send + 'static` future.
pub trait Fetch<T>: Send + Sync {
    fn fetch(&self) -> BoxFuture<'_, Result<Vec<T>, OneApiError>>;
}

impl<T, F, Fut> Fetch<T> for F
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<Vec<T>, OneApiError>> + Send + 'static,
{
    fn fetch(&self) -> BoxFuture<'_, Result<Vec<T>, OneApiError>> {
        Box::pin(self())
    }
}

struct RunningPoll {
    token: CancellationToken,
    dispatcher: JoinHandle<()>,
}

/// Periodically fetches notifications and dispatches them to a registry.
///
/// `start` and `stop` are idempotent and may be called from any thread.
pub struct PullRetriever<T> {
    kind: &'static str,
    reader: RegistryReader<T>,
    running: Mutex<Option<RunningPoll>>,
}

impl<T> PullRetriever<T>
where
    T: Send + 'static,
{
    pub fn new(kind: &'static str, reader: RegistryReader<T>) -> Self {
        Self {
            kind,
            reader,
            running: Mutex::new(None),
        }
    }

    pub fn state(&self) -> ActivityState {
        if lock(&self.running).is_some() {
            ActivityState::Running
        } else {
            ActivityState::Stopped
        }
    }

    /// Start polling every `interval`. Returns `Ok(false)` if already running.
    ///
    /// The first fetch happens one `interval` after start. A failed fetch is logged and
    /// retried at the next tick.
    pub fn start(&self, interval: Duration, fetch: Arc<dyn Fetch<T>>) -> Result<bool, OneApiError> {
        let mut running = lock(&self.running);
        if running.is_some() {
            return Ok(false);
        }
        if interval.is_zero() {
            return Err(ValidationError::ZeroInterval { field: "interval" }.into());
        }
        let handle = Handle::try_current().map_err(|_| OneApiError::NoRuntime)?;

        let token = CancellationToken::new();
        let (batches, received) = mpsc::channel(BATCH_CHANNEL_CAPACITY);
        let dispatcher = handle.spawn(
            Dispatcher::new(self.kind, self.reader.clone())
                .discard_after(token.clone())
                .run(received),
        );
        handle.spawn(poll(self.kind, interval, fetch, batches, token.clone()));

        info!(
            kind = self.kind,
            interval_ms = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX),
            "pull retriever started"
        );
        *running = Some(RunningPoll { token, dispatcher });
        Ok(true)
    }

    /// Stop polling. Returns `false` if already stopped.
    ///
    /// A fetch in flight is allowed to finish but its result is discarded.
    pub fn stop(&self) -> bool {
        let running = lock(&self.running).take();
        let Some(running) = running else {
            return false;
        };
        running.token.cancel();
        running.dispatcher.abort();
        info!(kind = self.kind, "pull retriever stopped");
        true
    }
}

impl<T> Drop for PullRetriever<T> {
    fn drop(&mut self) {
        if let Some(running) = lock(&self.running).take() {
            running.token.cancel();
            running.dispatcher.abort();
        }
    }
}

async fn poll<T>(
    kind: &'static str,
    interval: Duration,
    fetch: Arc<dyn Fetch<T>>,
    batches: mpsc::Sender<NotificationBatch<T>>,
    token: CancellationToken,
) {
    let mut ticker = time::interval_at(Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = token.cancelled() => break,
            _ = ticker.tick() => {}
        }

        let result = fetch.fetch().await;
        if token.is_cancelled() {
            debug!(kind, "discarding fetch result completed after stop");
            break;
        }

        match result {
            Ok(items) if items.is_empty() => debug!(kind, "no new notifications"),
            Ok(items) => {
                debug!(kind, count = items.len(), "fetched notifications");
                tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    sent = batches.send(NotificationBatch::new(items)) => {
                        if sent.is_err() {
                            break;
                        }
                    }
                }
            }
            Err(err) => warn!(kind, error = %err, "fetch failed; retrying at next interval"),
        }
    }
    debug!(kind, "pull retriever loop exited");
}
