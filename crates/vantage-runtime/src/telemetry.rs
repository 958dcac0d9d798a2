//! Tracing initialisation.
//!
//! Call [`init_tracing`] once at process startup to wire up the `tracing`
//! subscriber with an optional OTLP span exporter. Spans opened by
//! [`SelectionPipeline`][crate::pipeline::SelectionPipeline] are forwarded to
//! the collector when one is configured.
//!
//! # Environment variables
//!
//! | Variable | Effect |
//! |---|---|
//! | `OTEL_EXPORTER_OTLP_ENDPOINT` | OTLP collector base URL, used when the settings carry no endpoint. |
//! | `RUST_LOG` | Log filter (default `"info"`). |
//! | `VANTAGE_LOG_FORMAT=json` | Emit newline-delimited JSON logs. |
//!
//! # Example
//!
//! ```rust,no_run
//! use vantage_runtime::telemetry::{TelemetrySettings, init_tracing};
//!
//! let _guard = init_tracing("vantage", &TelemetrySettings::from_env());
//! ```

use std::fmt;
use std::str::FromStr;

use opentelemetry::trace::TracerProvider as _;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{Resource, trace::SdkTracerProvider};
use serde::{Deserialize, Serialize};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Console log layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "compact" | "text" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format `{other}` (expected compact or json)")),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LogFormat::Compact => "compact",
            LogFormat::Json => "json",
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TelemetrySettings {
    pub log_format: LogFormat,
    /// OTLP/HTTP collector base URL, e.g. `http://localhost:4318`.
    pub otlp_endpoint: Option<String>,
}

impl TelemetrySettings {
    /// Settings taken from `VANTAGE_LOG_FORMAT` and
    /// `OTEL_EXPORTER_OTLP_ENDPOINT` alone.
    pub fn from_env() -> Self {
        let log_format = std::env::var("VANTAGE_LOG_FORMAT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_default();
        Self {
            log_format,
            otlp_endpoint: None,
        }
        .with_env_endpoint()
    }

    /// Fill a missing endpoint from `OTEL_EXPORTER_OTLP_ENDPOINT`.
    pub fn with_env_endpoint(mut self) -> Self {
        if self.otlp_endpoint.is_none() {
            self.otlp_endpoint = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
                .ok()
                .filter(|v| !v.is_empty());
        }
        self
    }
}

/// Initialise the global `tracing` subscriber with an optional OTLP exporter.
///
/// Without an endpoint only the console formatter is installed. The returned
/// [`TracerProviderGuard`] must be held for the lifetime of the process;
/// dropping it flushes pending spans.
pub fn init_tracing(service_name: &str, settings: &TelemetrySettings) -> TracerProviderGuard {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let use_json = settings.log_format == LogFormat::Json;

    let provider = settings
        .otlp_endpoint
        .as_deref()
        .and_then(|endpoint| build_provider(service_name, endpoint));

    // The optional layer is `None` without a provider.
    let otel_layer = provider
        .as_ref()
        .map(|p| tracing_opentelemetry::layer().with_tracer(p.tracer("vantage")));

    let registry = tracing_subscriber::registry().with(env_filter).with(otel_layer);
    if use_json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer().compact()).init();
    }

    TracerProviderGuard(provider)
}

/// Shuts down the OTel [`SdkTracerProvider`] on drop, flushing pending spans.
pub struct TracerProviderGuard(Option<SdkTracerProvider>);

impl TracerProviderGuard {
    pub fn is_exporting(&self) -> bool {
        self.0.is_some()
    }
}

impl Drop for TracerProviderGuard {
    fn drop(&mut self) {
        if let Some(provider) = self.0.take()
            && let Err(e) = provider.shutdown()
        {
            eprintln!("[vantage] OpenTelemetry provider shutdown error: {e}");
        }
    }
}

/// Build an [`SdkTracerProvider`] exporting to `endpoint`.
///
/// Returns `None` when the exporter cannot be initialised; the error goes to
/// stderr and the caller falls back to console output only.
fn build_provider(service_name: &str, endpoint: &str) -> Option<SdkTracerProvider> {
    if endpoint.trim().is_empty() {
        return None;
    }

    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_http()
        .with_endpoint(endpoint)
        .build()
        .map_err(|e| eprintln!("[vantage] OTLP exporter init failed: {e}"))
        .ok()?;

    let resource = Resource::builder()
        .with_service_name(service_name.to_string())
        .build();

    Some(
        SdkTracerProvider::builder()
            .with_resource(resource)
            // Synchronous export: the CLI runs no async runtime.
            .with_simple_exporter(exporter)
            .build(),
    )
}
