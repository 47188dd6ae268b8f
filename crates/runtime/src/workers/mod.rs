//! Worker threads that run alongside foreground requests.

mod ticker;

pub use ticker::TimeTicker;
