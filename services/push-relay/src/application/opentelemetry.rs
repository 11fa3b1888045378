use crate::application::APPLICATION_NAME;
use anyhow::Result;
use opentelemetry::trace::TracerProvider;
use opentelemetry_otlp::WithExportConfig as _;
use opentelemetry_otlp::WithHttpConfig as _;
use opentelemetry_sdk::metrics::SdkMeterProvider;
use opentelemetry_sdk::trace::SdkTracerProvider;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;

/// Installs the tracing subscriber, plus the OTLP exporters when a collector is configured.
pub struct OpentelemetryHandler {
    tracer_provider: Option<SdkTracerProvider>,
    meter_provider: Option<SdkMeterProvider>,
}

impl OpentelemetryHandler {
    const OTLP_ENDPOINT_ENV_VAR: &str = "OTEL_EXPORTER_OTLP_ENDPOINT";
    const DEFAULT_LOG_FILTER: &str = "info";

    pub fn new() -> Result<Self> {
        let (tracer_provider, meter_provider) =
            if std::env::var_os(Self::OTLP_ENDPOINT_ENV_VAR).is_some() {
                (
                    Some(Self::create_trace_exporter()?),
                    Some(Self::create_metric_exporter()?),
                )
            } else {
                (None, None)
            };

        let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(Self::DEFAULT_LOG_FILTER));
        let metrics_layer = meter_provider
            .as_ref()
            .map(|provider| tracing_opentelemetry::MetricsLayer::new(provider.clone()));
        let trace_layer = tracer_provider.as_ref().map(|provider| {
            tracing_opentelemetry::OpenTelemetryLayer::new(provider.tracer(APPLICATION_NAME))
        });

        tracing_subscriber::registry()
            .with(tracing_subscriber::fmt::layer())
            .with(env_filter)
            .with(metrics_layer)
            .with(trace_layer)
            .try_init()?;

        if tracer_provider.is_none() {
            tracing::debug!(
                "{} is not set, telemetry export is disabled",
                Self::OTLP_ENDPOINT_ENV_VAR
            );
        }

        Ok(Self {
            tracer_provider,
            meter_provider,
        })
    }

    fn create_metric_exporter() -> Result<SdkMeterProvider> {
        let exporter = opentelemetry_otlp::MetricExporter::builder()
            .with_http()
            .with_protocol(opentelemetry_otlp::Protocol::HttpBinary)
            .with_compression(opentelemetry_otlp::Compression::Gzip)
            .build()?;

        let meter_provider = SdkMeterProvider::builder()
            .with_resource(Self::create_resource())
            .with_periodic_exporter(exporter)
            .build();
        opentelemetry::global::set_meter_provider(meter_provider.clone());

        Ok(meter_provider)
    }

    fn create_trace_exporter() -> Result<SdkTracerProvider> {
        let exporter = opentelemetry_otlp::SpanExporter::builder()
            .with_http()
            .with_protocol(opentelemetry_otlp::Protocol::HttpBinary)
            .with_compression(opentelemetry_otlp::Compression::Gzip)
            .build()?;

        let tracer_provider = SdkTracerProvider::builder()
            .with_resource(Self::create_resource())
            .with_batch_exporter(exporter)
            .build();
        opentelemetry::global::set_tracer_provider(tracer_provider.clone());

        opentelemetry::global::set_text_map_propagator(
            opentelemetry_sdk::propagation::TraceContextPropagator::new(),
        );

        Ok(tracer_provider)
    }

    fn create_resource() -> opentelemetry_sdk::Resource {
        const APPLICATION_VERSION: &str = env!("CARGO_PKG_VERSION");

        opentelemetry_sdk::Resource::builder()
            .with_service_name(APPLICATION_NAME)
            .with_attribute(opentelemetry::KeyValue::new(
                opentelemetry_semantic_conventions::resource::SERVICE_VERSION,
                APPLICATION_VERSION,
            ))
            .with_detectors(&[
                Box::new(opentelemetry_resource_detectors::OsResourceDetector),
                Box::new(opentelemetry_resource_detectors::ProcessResourceDetector),
                Box::new(opentelemetry_resource_detectors::K8sResourceDetector),
            ])
            .build()
    }
}

impl Drop for OpentelemetryHandler {
    fn drop(&mut self) {
        if let Some(tracer_provider) = &self.tracer_provider
            && let Err(err) = tracer_provider.shutdown()
        {
            eprintln!("{err:?}");
        }
        if let Some(meter_provider) = &self.meter_provider
            && let Err(err) = meter_provider.shutdown()
        {
            eprintln!("{err:?}");
        }
    }
}
