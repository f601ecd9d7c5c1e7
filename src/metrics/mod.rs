pub mod registrar;

pub use registrar::{register_pool_metrics, PoolMetricsRegistration};
