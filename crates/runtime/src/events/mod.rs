//! Topic-based event bus for runtime events.
//!
//! Events are published to topics, and listeners subscribe only to the topics
//! they need. Delivery is synchronous on the publishing thread.

mod bus;
mod types;

pub use bus::{EventBus, Listener, ListenerError, ListenerResult};
pub use types::{Event, Topic};
