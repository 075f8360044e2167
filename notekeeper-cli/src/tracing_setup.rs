//! Logging for the notekeeper binary
//!
//! One subscriber stack is built for every run: an `EnvFilter`, compact
//! console output, and (with the `telemetry` feature and `--otel`) an OTLP
//! span exporter layered on top.
//!
//! Environment variables:
//!   RUST_LOG                          # Log filter (default: info, or debug with --debug)
//!   OTEL_EXPORTER_OTLP_ENDPOINT       # OTLP endpoint (default: http://localhost:4317)
//!   OTEL_SERVICE_NAME                 # Service name (default: notekeeper)

use anyhow::{Context, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Default)]
pub struct TracingConfig {
    /// Default to debug level when RUST_LOG is unset
    pub debug: bool,
    /// Export spans over OTLP
    pub otel: bool,
}

fn env_filter(config: &TracingConfig) -> EnvFilter {
    let default_level = if config.debug { "debug" } else { "info" };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Install the global subscriber.
pub fn init(config: &TracingConfig) -> Result<()> {
    let console = tracing_subscriber::fmt::layer()
        .with_target(config.debug)
        .compact();
    let registry = tracing_subscriber::registry()
        .with(env_filter(config))
        .with(console);

    #[cfg(feature = "telemetry")]
    {
        let settings = config.otel.then(otel::OtelSettings::from_env);
        let exporter = settings.as_ref().map(otel::layer).transpose()?;

        registry
            .with(exporter)
            .try_init()
            .context("Failed to install tracing subscriber")?;

        if let Some(settings) = settings {
            tracing::info!(
                endpoint = %settings.endpoint,
                service = %settings.service_name,
                "OpenTelemetry export enabled"
            );
        }
    }

    #[cfg(not(feature = "telemetry"))]
    {
        registry
            .try_init()
            .context("Failed to install tracing subscriber")?;

        if config.otel {
            tracing::warn!("--otel ignored: built without the `telemetry` feature");
        }
    }

    Ok(())
}

/// Flush pending spans before exit.
#[cfg(feature = "telemetry")]
pub fn shutdown_otel() {
    opentelemetry::global::shutdown_tracer_provider();
}

#[cfg(not(feature = "telemetry"))]
pub fn shutdown_otel() {}

#[cfg(feature = "telemetry")]
mod otel {
    use anyhow::{Context, Result};
    use opentelemetry::trace::TracerProvider as _;
    use opentelemetry::KeyValue;
    use opentelemetry_otlp::WithExportConfig;
    use opentelemetry_sdk::trace::{Tracer, TracerProvider};
    use opentelemetry_sdk::Resource;
    use tracing::Subscriber;
    use tracing_opentelemetry::OpenTelemetryLayer;
    use tracing_subscriber::registry::LookupSpan;

    const DEFAULT_ENDPOINT: &str = "http://localhost:4317";
    const DEFAULT_SERVICE_NAME: &str = "notekeeper";

    #[derive(Debug, Clone, PartialEq)]
    pub struct OtelSettings {
        pub endpoint: String,
        pub service_name: String,
    }

    impl OtelSettings {
        pub fn from_env() -> Self {
            Self::from_lookup(|key| std::env::var(key).ok())
        }

        fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
            Self {
                endpoint: lookup("OTEL_EXPORTER_OTLP_ENDPOINT")
                    .unwrap_or_else(|| DEFAULT_ENDPOINT.to_owned()),
                service_name: lookup("OTEL_SERVICE_NAME")
                    .unwrap_or_else(|| DEFAULT_SERVICE_NAME.to_owned()),
            }
        }
    }

    /// Build the OTLP layer and register its provider globally.
    pub fn layer<S>(settings: &OtelSettings) -> Result<OpenTelemetryLayer<S, Tracer>>
    where
        S: Subscriber + for<'span> LookupSpan<'span>,
    {
        let exporter = opentelemetry_otlp::SpanExporter::builder()
            .with_tonic()
            .with_endpoint(&settings.endpoint)
            .build()
            .context("Failed to create OTLP exporter")?;

        let provider = TracerProvider::builder()
            .with_batch_exporter(exporter, opentelemetry_sdk::runtime::Tokio)
            .with_resource(Resource::new(vec![KeyValue::new(
                "service.name",
                settings.service_name.clone(),
            )]))
            .build();

        let tracer = provider.tracer(DEFAULT_SERVICE_NAME);
        // The global handle keeps the batch exporter alive until shutdown_otel
        let _ = opentelemetry::global::set_tracer_provider(provider);

        Ok(tracing_opentelemetry::layer().with_tracer(tracer))
    }

}
