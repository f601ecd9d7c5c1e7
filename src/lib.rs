// Library exports
pub mod errors;
pub mod logging;
pub mod metrics;
pub mod pool;

pub use metrics::registrar::{register_pool_metrics, PoolMetricsRegistration};
pub use pool::config::DbConfig;
pub use pool::instrumented_pool::InstrumentedPool;
pub use pool::stats::{PoolStats, PoolStatsSource};
