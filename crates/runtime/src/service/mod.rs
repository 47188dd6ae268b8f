//! Service layer: business operations over the repositories.

mod player;

pub use player::{PlayerService, RealmProgress};
