//! Repository layer for persisted sect data
//!
//! - [`Store`]: the shared table store, in memory or backed by a JSON file
//! - [`PlayerRepository`]: soft-delete aware access to the `players` table

mod error;
mod player;
mod store;
mod traits;

pub use error::{RepositoryError, Result};
pub use player::StorePlayerRepository;
pub use store::{Store, Table};
pub use traits::PlayerRepository;
