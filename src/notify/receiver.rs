use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{Method, StatusCode};
use tokio::net::TcpListener;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::dispatch::{Dispatcher, NotificationBatch};
use super::registry::RegistryReader;
use super::{ActivityState, BATCH_CHANNEL_CAPACITY, lock};
use crate::client::OneApiError;

/// Turns a pushed request body into notification items.
pub type Decode<T> = fn(&[u8]) -> Result<Vec<T>, OneApiError>;

/// How long `stop` waits for accepted requests and queued batches before giving up on them.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

struct RunningServer {
    addr: SocketAddr,
    token: CancellationToken,
    server: JoinHandle<()>,
    dispatcher: JoinHandle<()>,
}

struct PushState<T> {
    kind: &'static str,
    decode: Decode<T>,
    batches: mpsc::Sender<NotificationBatch<T>>,
}

/// Local HTTP endpoint standing in for the provider's webhook delivery.
///
/// Accepts `POST` on any path, decodes the body and dispatches the items to the
/// registry. Undecodable bodies are answered with `400` and logged; the endpoint keeps
/// running. Listener failures never affect the `200` acknowledgement.
pub struct PushReceiver<T> {
    kind: &'static str,
    reader: RegistryReader<T>,
    decode: Decode<T>,
    running: Mutex<Option<RunningServer>>,
}

impl<T> PushReceiver<T>
where
    T: Send + 'static,
{
    pub fn new(kind: &'static str, reader: RegistryReader<T>, decode: Decode<T>) -> Self {
        Self {
            kind,
            reader,
            decode,
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

    /// Address the endpoint is bound to, while running.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        lock(&self.running).as_ref().map(|running| running.addr)
    }

    /// Bind `addr` and start accepting pushed notifications.
    ///
    /// Returns the bound address (useful with port `0`). When already running, the
    /// existing address is returned and nothing is rebound.
    pub fn start(&self, addr: SocketAddr) -> Result<SocketAddr, OneApiError> {
        let mut running = lock(&self.running);
        if let Some(running) = running.as_ref() {
            return Ok(running.addr);
        }
        let handle = Handle::try_current().map_err(|_| OneApiError::NoRuntime)?;

        let bind_error = |source| OneApiError::Bind { addr, source };
        let listener = std::net::TcpListener::bind(addr).map_err(bind_error)?;
        listener.set_nonblocking(true).map_err(bind_error)?;
        let local_addr = listener.local_addr().map_err(bind_error)?;
        let listener = {
            let _runtime = handle.enter();
            TcpListener::from_std(listener).map_err(bind_error)?
        };

        let token = CancellationToken::new();
        let (batches, received) = mpsc::channel(BATCH_CHANNEL_CAPACITY);
        let dispatcher = handle.spawn(Dispatcher::new(self.kind, self.reader.clone()).run(received));

        let router = Router::new()
            .fallback(receive::<T>)
            .with_state(Arc::new(PushState {
                kind: self.kind,
                decode: self.decode,
                batches,
            }));
        let kind = self.kind;
        let shutdown = token.clone();
        let server = handle.spawn(async move {
            let served = axum::serve(listener, router)
                .with_graceful_shutdown(async move { shutdown.cancelled().await })
                .await;
            if let Err(err) = served {
                warn!(kind, error = %err, "push receiver terminated");
            }
        });

        info!(kind, addr = %local_addr, "push receiver listening");
        *running = Some(RunningServer {
            addr: local_addr,
            token,
            server,
            dispatcher,
        });
        Ok(local_addr)
    }

    /// Stop accepting connections. Returns `false` if already stopped.
    ///
    /// The listening socket is closed before this returns. Requests already accepted
    /// still have their notifications dispatched, and every batch they queued has been
    /// delivered by the time this returns. Whatever is left after the 5 s grace period is
    /// dropped, so nothing received before the stop reaches listeners added later.
    pub async fn stop(&self) -> bool {
        let running = lock(&self.running).take();
        let Some(RunningServer {
            addr,
            token,
            server,
            mut dispatcher,
        }) = running
        else {
            return false;
        };
        token.cancel();

        let deadline = Instant::now() + SHUTDOWN_GRACE;
        match time::timeout_at(deadline, server).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => warn!(kind = self.kind, error = %err, "push receiver task failed"),
            Err(_) => warn!(
                kind = self.kind,
                "push receiver did not drain in time; detaching in-flight requests"
            ),
        }
        // The server owned the only sender, so the dispatcher ends once the queue is empty.
        if time::timeout_at(deadline, &mut dispatcher).await.is_err() {
            dispatcher.abort();
            warn!(kind = self.kind, "queued push notifications dropped at shutdown");
        }
        info!(kind = self.kind, %addr, "push receiver stopped");
        true
    }
}

impl<T> Drop for PushReceiver<T> {
    fn drop(&mut self) {
        if let Some(running) = lock(&self.running).take() {
            running.token.cancel();
            running.dispatcher.abort();
        }
    }
}

async fn receive<T>(
    State(state): State<Arc<PushState<T>>>,
    method: Method,
    body: Bytes,
) -> StatusCode
where
    T: Send + 'static,
{
    if method != Method::POST {
        return StatusCode::METHOD_NOT_ALLOWED;
    }

    let items = match (state.decode)(&body) {
        Ok(items) => items,
        Err(err) => {
            warn!(kind = state.kind, error = %err, "rejecting undecodable push payload");
            return StatusCode::BAD_REQUEST;
        }
    };

    debug!(kind = state.kind, count = items.len(), "received push notification");
    if !items.is_empty()
        && state
            .batches
            .send(NotificationBatch::new(items))
            .await
            .is_err()
    {
        warn!(kind = state.kind, "dispatcher is gone; dropping pushed notifications");
    }
    StatusCode::OK
}
