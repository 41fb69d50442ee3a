use anyhow::{Context, Result, anyhow};
use once_cell::sync::OnceCell;
use opentelemetry::trace::TracerProvider;
use opentelemetry_otlp::{Protocol, SpanExporter, WithExportConfig};
use opentelemetry_sdk::{
    Resource,
    trace::{SdkTracer, SdkTracerProvider},
};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{LogFormat, TelemetryConfig};

static INIT: OnceCell<()> = OnceCell::new();

/// Installs the log subscriber described by `config`, plus OTLP span export
/// when an endpoint is configured. Only the first call has any effect.
pub fn init_tracing(config: &TelemetryConfig) -> Result<()> {
    if INIT.get().is_some() {
        return Ok(());
    }

    let filter = log_filter(&config.log_filter)?;
    let text = (config.log_format == LogFormat::Text).then(|| fmt::layer().with_target(false));
    let compact = (config.log_format == LogFormat::Compact)
        .then(|| fmt::layer().compact().with_target(false));
    let tracer = match config.otlp_endpoint.as_deref() {
        Some(endpoint) => Some(otlp_tracer(endpoint, &config.service_name)?),
        None => None,
    };
    let exported = tracer.is_some();

    tracing_subscriber::registry()
        .with(filter)
        .with(text)
        .with(compact)
        .with(tracer.map(|tracer| tracing_opentelemetry::layer().with_tracer(tracer)))
        .try_init()?;

    INIT.set(()).map_err(|_| anyhow!("tracing already initialized"))?;
    tracing::debug!(
        service = %config.service_name,
        filter = %config.log_filter,
        otlp = exported,
        "telemetry ready"
    );
    Ok(())
}

fn log_filter(directives: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(directives).with_context(|| format!("invalid log filter `{directives}`"))
}

fn otlp_tracer(endpoint: &str, service_name: &str) -> Result<SdkTracer> {
    let exporter = SpanExporter::builder()
        .with_http()
        .with_protocol(Protocol::HttpBinary)
        .with_endpoint(endpoint)
        .build()
        .with_context(|| format!("failed to build OTLP exporter for {endpoint}"))?;
    let provider = SdkTracerProvider::builder()
        .with_resource(
            Resource::builder()
                .with_service_name(service_name.to_string())
                .build(),
        )
        .with_batch_exporter(exporter)
        .build();
    Ok(provider.tracer(service_name.to_string()))
}
