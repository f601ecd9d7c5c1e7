use std::time::Duration;

use opentelemetry::{global, trace::TracerProvider as _, KeyValue};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{
    runtime,
    trace::{RandomIdGenerator, Sampler},
    Resource,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::errors::TelemetryError;

/// Configuration for OpenTelemetry
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Service name for telemetry
    pub service_name: String,
    /// Service version
    pub service_version: String,
    /// OTLP endpoint (e.g., "http://localhost:4317")
    pub otlp_endpoint: String,
    /// How often the metrics pipeline exports collected observations
    pub metric_export_period: Duration,
    /// Enable metrics collection
    pub enable_metrics: bool,
    /// Enable tracing
    pub enable_tracing: bool,
    /// Log level filter
    pub log_level: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: env!("CARGO_PKG_NAME").to_string(),
            service_version: env!("CARGO_PKG_VERSION").to_string(),
            otlp_endpoint: std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
                .unwrap_or_else(|_| "http://localhost:4317".to_string()),
            metric_export_period: Duration::from_secs(30),
            enable_metrics: true,
            enable_tracing: std::env::var("OTEL_ENABLE_TRACING")
                .unwrap_or_else(|_| "false".to_string())
                .parse()
                .unwrap_or(false),
            log_level: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        }
    }
}

impl TelemetryConfig {
    /// Create a new telemetry configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the service name
    pub fn with_service_name(mut self, name: impl Into<String>) -> Self {
        self.service_name = name.into();
        self
    }

    /// Set the OTLP endpoint
    pub fn with_otlp_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.otlp_endpoint = endpoint.into();
        self
    }

    /// Set the metric export period
    pub fn with_metric_export_period(mut self, period: Duration) -> Self {
        self.metric_export_period = period;
        self
    }

    /// Set whether to enable metrics
    pub fn with_metrics(mut self, enable: bool) -> Self {
        self.enable_metrics = enable;
        self
    }

    /// Set whether to enable tracing
    pub fn with_tracing(mut self, enable: bool) -> Self {
        self.enable_tracing = enable;
        self
    }

    /// Set the log level
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }
}

/// Initialize OpenTelemetry with structured logging, metrics, and optional tracing
///
/// This sets up:
/// - Structured logging with tracing-subscriber
/// - An OTLP metrics pipeline installed as the global meter provider, so that
///   `opentelemetry::global::meter(...)` hands out meters suitable for
///   registering pool metrics
/// - Optionally an OTLP trace pipeline bridged into tracing
pub fn init_telemetry(config: Option<TelemetryConfig>) -> Result<(), TelemetryError> {
    let config = config.unwrap_or_default();

    let resource = Resource::new(vec![
        KeyValue::new(
            opentelemetry_semantic_conventions::resource::SERVICE_NAME,
            config.service_name.clone(),
        ),
        KeyValue::new(
            opentelemetry_semantic_conventions::resource::SERVICE_VERSION,
            config.service_version.clone(),
        ),
    ]);

    let tracer = if config.enable_tracing {
        let tracer_provider = opentelemetry_otlp::new_pipeline()
            .tracing()
            .with_exporter(
                opentelemetry_otlp::new_exporter()
                    .tonic()
                    .with_endpoint(&config.otlp_endpoint),
            )
            .with_trace_config(
                opentelemetry_sdk::trace::Config::default()
                    .with_sampler(Sampler::ParentBased(Box::new(Sampler::AlwaysOn)))
                    .with_id_generator(RandomIdGenerator::default())
                    .with_resource(resource.clone()),
            )
            .install_batch(runtime::Tokio)?;

        global::set_tracer_provider(tracer_provider.clone());

        Some(tracer_provider.tracer(config.service_name.clone()))
    } else {
        None
    };

    if config.enable_metrics {
        let meter_provider = opentelemetry_otlp::new_pipeline()
            .metrics(runtime::Tokio)
            .with_exporter(
                opentelemetry_otlp::new_exporter()
                    .tonic()
                    .with_endpoint(&config.otlp_endpoint),
            )
            .with_resource(resource)
            .with_period(config.metric_export_period)
            .build()?;

        global::set_meter_provider(meter_provider);
    }

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_filter(env_filter);

    let registry = tracing_subscriber::registry().with(fmt_layer);

    if let Some(tracer) = tracer {
        let telemetry_layer = tracing_opentelemetry::layer().with_tracer(tracer);
        registry
            .with(telemetry_layer)
            .try_init()
            .map_err(|e| TelemetryError::Subscriber(e.to_string()))?;
    } else {
        registry
            .try_init()
            .map_err(|e| TelemetryError::Subscriber(e.to_string()))?;
    }

    info!(
        service = %config.service_name,
        endpoint = %config.otlp_endpoint,
        metrics = config.enable_metrics,
        tracing = config.enable_tracing,
        "Telemetry initialized"
    );

    Ok(())
}

/// Shutdown OpenTelemetry gracefully
///
/// This ensures all pending spans are flushed before shutdown
pub fn shutdown_telemetry() {
    info!("Shutting down OpenTelemetry...");
    global::shutdown_tracer_provider();
}
