pub mod config;
pub mod instrumented_pool;
pub mod stats;

pub use config::DbConfig;
pub use instrumented_pool::InstrumentedPool;
pub use stats::{PoolStats, PoolStatsSource};
