//! Controller layer: turns service results into response envelopes.

mod player;
mod response;

pub use player::{PlayerController, RootReport};
pub use response::Response;
