use std::fmt;

use opentelemetry::metrics::MetricsError;
use opentelemetry::trace::TraceError;

/// Errors raised while bootstrapping the telemetry pipelines.
///
/// The pool metrics registrar itself returns `opentelemetry::metrics::MetricsError`
/// directly; this enum only covers pipeline initialization.
#[derive(Debug)]
pub enum TelemetryError {
    Metrics(MetricsError),
    Trace(TraceError),
    Subscriber(String),
}

impl fmt::Display for TelemetryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelemetryError::Metrics(e) => write!(f, "Metrics pipeline error: {}", e),
            TelemetryError::Trace(e) => write!(f, "Trace pipeline error: {}", e),
            TelemetryError::Subscriber(msg) => write!(f, "Subscriber setup error: {}", msg),
        }
    }
}

impl std::error::Error for TelemetryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TelemetryError::Metrics(e) => Some(e),
            TelemetryError::Trace(e) => Some(e),
            TelemetryError::Subscriber(_) => None,
        }
    }
}

impl From<MetricsError> for TelemetryError {
    fn from(e: MetricsError) -> Self {
        TelemetryError::Metrics(e)
    }
}

impl From<TraceError> for TelemetryError {
    fn from(e: TraceError) -> Self {
        TelemetryError::Trace(e)
    }
}
