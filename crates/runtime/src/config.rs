//! Runtime tunables.

use std::time::Duration;

use cultivation_core::SpiritRootGenerator;

/// Runtime configuration shared by the controller and the workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Draw budget for target-constrained spirit root generation.
    pub max_root_attempts: u32,
    /// Target value for the master's spirit root.
    pub master_root_target: u64,
    /// Real time between two ticks of the time ticker.
    pub tick_interval: Duration,
    /// In-world years that pass per tick.
    pub years_per_tick: u32,
}

impl RuntimeConfig {
    /// The cheapest spirit root is worth 422, so aim just below it.
    pub const MASTER_ROOT_TARGET: u64 = 400;
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            max_root_attempts: SpiritRootGenerator::DEFAULT_MAX_ATTEMPTS,
            master_root_target: Self::MASTER_ROOT_TARGET,
            tick_interval: Duration::from_secs(1),
            years_per_tick: 1,
        }
    }
}
