use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::Postgres;
use tracing::{error, info};

use crate::pool::config::DbConfig;
use crate::pool::stats::{PoolStats, PoolStatsSource};

/*
This is the instrumented connection pool for the postgres database.
The InstrumentedPool wraps sqlx's PgPool and times every acquire so that the
cumulative wait duration can be reported alongside the counters sqlx already
tracks (size, idle, configured max).
- The wait counter is incremented per acquire attempt, successful or not.
- Connections are returned to the pool automatically when dropped.
*/

/// Connection pool wrapper for PostgreSQL with acquire-wait accounting
#[derive(Clone)]
pub struct InstrumentedPool {
    pool: PgPool,
    /// Cumulative nanoseconds spent waiting in `acquire`.
    wait_nanos: Arc<AtomicU64>,
}

impl InstrumentedPool {
    /// Creates a new instrumented pool from the given configuration
    pub async fn connect(config: DbConfig) -> Result<Self, sqlx::Error> {
        info!(
            "Creating connection pool with max_connections: {}",
            config.max_connections
        );

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connection_timeout)
            .idle_timeout(config.idle_timeout)
            .max_lifetime(config.max_lifetime)
            .connect(&config.database_url)
            .await
            .map_err(|e| {
                error!("Failed to create connection pool: {}", e);
                e
            })?;

        info!("Connection pool created successfully");

        Ok(Self {
            pool,
            wait_nanos: Arc::new(AtomicU64::new(0)),
        })
    }

    /// Wraps an already-open pool
    pub fn from_pool(pool: PgPool) -> Self {
        Self {
            pool,
            wait_nanos: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Acquires a connection from the pool, recording the time spent waiting.
    /// The wait is counted whether or not the acquire succeeds, matching the
    /// pool's acquire-timeout semantics. The connection is returned to the
    /// pool automatically when dropped.
    pub async fn acquire(&self) -> Result<sqlx::pool::PoolConnection<Postgres>, sqlx::Error> {
        let started = Instant::now();
        let result = self.pool.acquire().await;
        self.wait_nanos
            .fetch_add(started.elapsed().as_nanos() as u64, Ordering::Relaxed);

        result.map_err(|e| {
            error!("Failed to acquire connection from pool: {}", e);
            e
        })
    }

    /// Closes the connection pool and all its connections
    pub async fn close(&self) {
        info!("Closing connection pool...");
        self.pool.close().await;
        info!("Connection pool closed successfully");
    }

    /// Gets a reference to the underlying PgPool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Cumulative time spent waiting in `acquire` since the pool was created
    pub fn wait_duration(&self) -> Duration {
        Duration::from_nanos(self.wait_nanos.load(Ordering::Relaxed))
    }

    /// Health check - verifies that the pool can acquire a connection
    pub async fn health_check(&self) -> Result<(), sqlx::Error> {
        let mut conn = self.acquire().await?;
        sqlx::query("SELECT 1").execute(&mut *conn).await?;
        Ok(())
    }
}

impl PoolStatsSource for InstrumentedPool {
    fn stats(&self) -> PoolStats {
        let size = self.pool.size();
        let idle = self.pool.num_idle() as u32;

        PoolStats {
            in_use: size.saturating_sub(idle),
            idle,
            max_open: self.pool.options().get_max_connections(),
            wait_duration: self.wait_duration(),
        }
    }
}
