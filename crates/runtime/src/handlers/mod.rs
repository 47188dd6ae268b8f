//! Listeners that react to bus events with domain logic.

mod cultivation;

pub use cultivation::{Advancement, CultivationListener, CultivationSummary};
