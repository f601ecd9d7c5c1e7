use std::time::Duration;

/// Point-in-time snapshot of connection pool statistics.
///
/// Produced on demand by a [`PoolStatsSource`]; never cached or mutated by the
/// metrics layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Connections currently checked out of the pool.
    pub in_use: u32,
    /// Connections sitting idle in the pool.
    pub idle: u32,
    /// Configured maximum number of open connections. 0 means unlimited.
    pub max_open: u32,
    /// Cumulative time spent waiting to acquire a connection.
    pub wait_duration: Duration,
}

/// Read-only statistics accessor exposed by a connection pool.
///
/// The accessor is synchronous and total: it always returns a value, is
/// expected to be a cheap read of in-memory counters, and may be called from
/// whatever thread the metrics collector runs on.
pub trait PoolStatsSource: Send + Sync {
    /// Returns a fresh snapshot of the pool's current statistics.
    fn stats(&self) -> PoolStats;
}
