use std::error::Error as StdError;
use std::sync::{Arc, Mutex};

use super::lock;

/// Error a listener returns when it could not handle a notification.
pub type ListenerError = Box<dyn StdError + Send + Sync>;

/// Callback invoked once per notification item.
///
/// Implemented for any `Fn(&T) -> Result<(), ListenerError>` closure.
pub trait Listener<T>: Send + Sync {
    fn on_notification(&self, item: &T) -> Result<(), ListenerError>;
}

impl<T, F> Listener<T> for F
where
    F: Fn(&T) -> Result<(), ListenerError> + Send + Sync,
{
    fn on_notification(&self, item: &T) -> Result<(), ListenerError> {
        self(item)
    }
}

pub type SharedListener<T> = Arc<dyn Listener<T>>;

/// Immutable copy of a registry, used for one dispatch round.
pub type Snapshot<T> = Arc<[SharedListener<T>]>;

/// Thread-safe, ordered collection of listeners for one notification kind.
///
/// Duplicate registrations are kept: a listener added twice is invoked twice per item.
pub struct ListenerRegistry<T> {
    listeners: Arc<Mutex<Vec<SharedListener<T>>>>,
}

impl<T> ListenerRegistry<T> {
    pub fn new() -> Self {
        Self {
            listeners: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Append a listener. Returns `true` if the registry was empty before.
    pub fn add(&self, listener: SharedListener<T>) -> bool {
        let mut listeners = lock(&self.listeners);
        let first = listeners.is_empty();
        listeners.push(listener);
        first
    }

    /// Remove every listener, returning how many were registered.
    pub fn clear(&self) -> usize {
        std::mem::take(&mut *lock(&self.listeners)).len()
    }

    pub fn snapshot(&self) -> Snapshot<T> {
        lock(&self.listeners).iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        lock(&self.listeners).len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.listeners).is_empty()
    }

    /// Read-only handle for background tasks.
    pub fn reader(&self) -> RegistryReader<T> {
        RegistryReader {
            listeners: Arc::clone(&self.listeners),
        }
    }
}

impl<T> Default for ListenerRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for ListenerRegistry<T> {
    fn clone(&self) -> Self {
        Self {
            listeners: Arc::clone(&self.listeners),
        }
    }
}

impl<T> std::fmt::Debug for ListenerRegistry<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("len", &self.len())
            .finish()
    }
}

/// Snapshot-only view of a [`ListenerRegistry`].
pub struct RegistryReader<T> {
    listeners: Arc<Mutex<Vec<SharedListener<T>>>>,
}

impl<T> RegistryReader<T> {
    pub fn snapshot(&self) -> Snapshot<T> {
        lock(&self.listeners).iter().cloned().collect()
    }
}

impl<T> Clone for RegistryReader<T> {
    fn clone(&self) -> Self {
        Self {
            listeners: Arc::clone(&self.listeners),
        }
    }
}
