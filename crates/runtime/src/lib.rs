//! Runtime layer of the sect simulation.
//!
//! This crate wires the pure domain rules of `cultivation-core` to storage,
//! events and threads.
//!
//! Modules are organized by responsibility:
//! - [`repository`] persists players in a [`Store`] with soft deletion
//! - [`events`] provides a topic-based, synchronous event bus
//! - [`service`] implements business operations over the repositories
//! - [`controller`] wraps every service result in a [`Response`] envelope
//! - [`handlers`] reacts to bus events, e.g. cultivating on time passing
//! - [`workers`] hosts background threads such as the time ticker
pub mod config;
pub mod controller;
pub mod error;
pub mod events;
pub mod handlers;
pub mod repository;
pub mod service;
pub mod workers;

pub use config::RuntimeConfig;
pub use controller::{PlayerController, Response, RootReport};
pub use error::{Result, ServiceError};
pub use events::{Event, EventBus, Listener, ListenerError, ListenerResult, Topic};
pub use handlers::{CultivationListener, CultivationSummary};
pub use repository::{PlayerRepository, RepositoryError, Store, StorePlayerRepository};
pub use service::{PlayerService, RealmProgress};
pub use workers::TimeTicker;
