//! Topic-based event bus implementation.

use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::Value;
use tracing::{debug, error, trace};

use super::types::{Event, Topic};
use crate::repository::RepositoryError;

/// Failure reported by a listener. Isolated by the bus, never propagated.
#[derive(Debug, thiserror::Error)]
pub enum ListenerError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("{0}")]
    Failed(String),
}

pub type ListenerResult = std::result::Result<Value, ListenerError>;

/// Callback invoked for every event published on a subscribed topic.
pub trait Listener: Send + Sync {
    fn on_event(&self, event: &Event) -> ListenerResult;
}

impl<F> Listener for F
where
    F: Fn(&Event) -> ListenerResult + Send + Sync,
{
    fn on_event(&self, event: &Event) -> ListenerResult {
        self(event)
    }
}

type Subscribers = HashMap<Topic, Vec<Arc<dyn Listener>>>;

/// Topic-based, synchronous event bus
///
/// Listeners are kept per topic in registration order. The subscriber map is
/// only locked to mutate it or to take a snapshot; listeners always run with
/// the lock released, so a listener may subscribe or unsubscribe from inside
/// its own callback.
///
/// Listener identity is the `Arc` allocation: subscribing a clone of an
/// already registered `Arc` is a no-op.
pub struct EventBus {
    subscribers: Arc<Mutex<Subscribers>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            subscribers: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Registers `listener` on `topic`.
    ///
    /// Returns `false` if the same listener is already registered there.
    pub fn subscribe(&self, topic: Topic, listener: Arc<dyn Listener>) -> bool {
        let mut subscribers = self.lock();
        let listeners = subscribers.entry(topic).or_default();
        if listeners.iter().any(|l| same_listener(l, &listener)) {
            return false;
        }
        listeners.push(listener);
        debug!(target: "runtime::events", ?topic, count = listeners.len(), "listener subscribed");
        true
    }

    /// Removes `listener` from `topic`, dropping the topic once it is empty.
    ///
    /// Returns `false` if the listener was not registered there.
    pub fn unsubscribe(&self, topic: Topic, listener: &Arc<dyn Listener>) -> bool {
        let mut subscribers = self.lock();
        let Some(listeners) = subscribers.get_mut(&topic) else {
            return false;
        };
        let Some(position) = listeners.iter().position(|l| same_listener(l, listener)) else {
            return false;
        };
        listeners.remove(position);
        if listeners.is_empty() {
            subscribers.remove(&topic);
        }
        debug!(target: "runtime::events", ?topic, "listener unsubscribed");
        true
    }

    /// Publish an event to every listener of its topic
    ///
    /// Returns one entry per listener in the snapshot, in registration order.
    /// A listener that fails or panics yields `None` at its position and does
    /// not stop delivery to the others.
    pub fn publish(&self, event: &Event) -> Vec<Option<Value>> {
        let topic = event.topic();
        let snapshot: Vec<Arc<dyn Listener>> = match self.lock().get(&topic) {
            Some(listeners) => listeners.clone(),
            None => {
                trace!(target: "runtime::events", ?topic, "no listeners for topic");
                return Vec::new();
            }
        };

        snapshot
            .iter()
            .enumerate()
            .map(|(index, listener)| {
                match panic::catch_unwind(AssertUnwindSafe(|| listener.on_event(event))) {
                    Ok(Ok(value)) => Some(value),
                    Ok(Err(err)) => {
                        error!(
                            target: "runtime::events",
                            ?topic,
                            index,
                            error = %err,
                            "listener failed"
                        );
                        None
                    }
                    Err(_) => {
                        error!(target: "runtime::events", ?topic, index, "listener panicked");
                        None
                    }
                }
            })
            .collect()
    }

    /// Removes every listener of `topic`, or of all topics when `None`.
    pub fn clear(&self, topic: Option<Topic>) {
        let mut subscribers = self.lock();
        match topic {
            Some(topic) => {
                subscribers.remove(&topic);
            }
            None => subscribers.clear(),
        }
    }

    /// Number of listeners currently registered on `topic`.
    pub fn listener_count(&self, topic: Topic) -> usize {
        self.lock().get(&topic).map_or(0, Vec::len)
    }

    // Listeners never run under the lock, so the map is never half-mutated.
    fn lock(&self) -> MutexGuard<'_, Subscribers> {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

fn same_listener(a: &Arc<dyn Listener>, b: &Arc<dyn Listener>) -> bool {
    std::ptr::eq(
        Arc::as_ptr(a) as *const (),
        Arc::as_ptr(b) as *const (),
    )
}

impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            subscribers: Arc::clone(&self.subscribers),
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
