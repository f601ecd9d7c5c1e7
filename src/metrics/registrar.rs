use std::any::Any;
use std::fmt;
use std::sync::Arc;

use opentelemetry::metrics::{CallbackRegistration, Meter};
use opentelemetry::KeyValue;
use tracing::debug;

use crate::pool::stats::PoolStatsSource;

/*
This is the pool metrics registrar.
- It creates the three db.client.connections.* observable instruments on the given meter.
- It registers one pull callback that reads a fresh pool statistics snapshot on every
  collection cycle and reports used/idle/max/wait_time tagged with the pool name.
- The metrics backend drives the callback at its own cadence; nothing here schedules,
  caches, or accumulates anything.
*/

/// Metric reporting the number of connections currently in the state
/// described by the `state` attribute.
pub const CONNECTIONS_USAGE: &str = "db.client.connections.usage";
/// Metric reporting the configured maximum number of open connections.
pub const CONNECTIONS_MAX: &str = "db.client.connections.max";
/// Metric reporting the cumulative time spent waiting for a connection.
pub const CONNECTIONS_WAIT_TIME: &str = "db.client.connections.wait_time";

const POOL_NAME_KEY: &str = "pool.name";
const STATE_KEY: &str = "state";
const STATE_USED: &str = "used";
const STATE_IDLE: &str = "idle";

/// Handle for an active pool metrics callback registration.
///
/// Dropping the handle does not unregister the callback; cancellation is
/// explicit via [`PoolMetricsRegistration::unregister`], typically at pool
/// shutdown.
pub struct PoolMetricsRegistration {
    registration: Option<Box<dyn CallbackRegistration>>,
}

impl PoolMetricsRegistration {
    /// Unregisters the callback. After this returns, the backend will not
    /// invoke the callback again. Safe to call more than once.
    pub fn unregister(&mut self) -> opentelemetry::metrics::Result<()> {
        match self.registration.take() {
            Some(mut registration) => registration.unregister(),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for PoolMetricsRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PoolMetricsRegistration")
            .field("active", &self.registration.is_some())
            .finish()
    }
}

/// Registers connection pool health metrics on the given meter.
///
/// Creates three observable up/down counters (usage, max, wait_time) and binds
/// them to a single callback that queries `pool` for a fresh statistics
/// snapshot on every collection cycle. All observations carry a `pool.name`
/// attribute with the supplied name; usage observations additionally carry a
/// `state` attribute of `used` or `idle`.
///
/// Errors from instrument creation or callback registration are returned
/// as-is. On an instrument creation error nothing has been registered; on a
/// callback registration error the created instruments are left to the meter
/// provider, which manages their lifecycle.
pub fn register_pool_metrics(
    pool: Arc<dyn PoolStatsSource>,
    meter: &Meter,
    pool_name: impl Into<String>,
) -> opentelemetry::metrics::Result<PoolMetricsRegistration> {
    let pool_name = pool_name.into();

    let usage = meter
        .i64_observable_up_down_counter(CONNECTIONS_USAGE)
        .with_unit("{connection}")
        .with_description(
            "The number of connections that are currently in state described by the state attribute",
        )
        .try_init()?;

    let max = meter
        .i64_observable_up_down_counter(CONNECTIONS_MAX)
        .with_unit("{connection}")
        .with_description("The maximum number of open connections allowed")
        .try_init()?;

    let wait_time = meter
        .i64_observable_up_down_counter(CONNECTIONS_WAIT_TIME)
        .with_unit("ms")
        .with_description("The time it took to obtain an open connection from the pool")
        .try_init()?;

    debug!(pool_name = %pool_name, "Registering connection pool metrics callback");

    let instruments: [Arc<dyn Any>; 3] = [usage.as_any(), max.as_any(), wait_time.as_any()];
    let registration = meter.register_callback(&instruments, move |observer| {
        let pool_attr = KeyValue::new(POOL_NAME_KEY, pool_name.clone());
        let used_attr = KeyValue::new(STATE_KEY, STATE_USED);
        let idle_attr = KeyValue::new(STATE_KEY, STATE_IDLE);

        let stats = pool.stats();

        observer.observe_i64(
            &usage,
            i64::from(stats.in_use),
            &[pool_attr.clone(), used_attr],
        );
        observer.observe_i64(
            &usage,
            i64::from(stats.idle),
            &[pool_attr.clone(), idle_attr],
        );
        observer.observe_i64(&max, i64::from(stats.max_open), &[pool_attr.clone()]);
        observer.observe_i64(
            &wait_time,
            stats.wait_duration.as_millis() as i64,
            &[pool_attr],
        );
    })?;

    Ok(PoolMetricsRegistration {
        registration: Some(registration),
    })
}
