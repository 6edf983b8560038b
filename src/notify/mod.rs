//! Notification delivery: listener registries, fan-out dispatch, and the background
//! PULL (polling) and PUSH (local callback endpoint) activities that feed them.
//!
//! Each kind of notification owns one [`ListenerRegistry`] and at most one running
//! background activity. Producers (the polling loop or the HTTP handler) hand decoded
//! [`NotificationBatch`]es to a dispatch task over a bounded channel; the dispatch task
//! snapshots the registry and delivers every item to every listener.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Mutex, MutexGuard, PoisonError};

mod dispatch;
mod receiver;
mod registry;
mod retriever;

pub use dispatch::{DispatchOutcome, Dispatcher, NotificationBatch, dispatch};
pub use receiver::{Decode, PushReceiver};
pub use registry::{Listener, ListenerError, ListenerRegistry, RegistryReader, SharedListener, Snapshot};
pub use retriever::{Fetch, PullRetriever};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Capacity of the channel between a producer and its dispatch task.
const BATCH_CHANNEL_CAPACITY: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActivityState {
    Stopped,
    Running,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    /// Delivery reports (PULL) and delivery status notifications (PUSH).
    DeliveryStatus,
    /// Inbound (mobile originated) messages.
    InboundMessage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeliveryMode {
    Pull,
    Push,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
