use reqwest::header::HeaderMap;
use reqwest::header::HeaderName;
use reqwest::header::HeaderValue;
use std::sync::LazyLock;

static ENABLE_OTEL_TRACES: LazyLock<bool> = LazyLock::new(|| {
    traces_enabled(
        std::env::var("OTEL_TRACES_SAMPLER").ok().as_deref(),
        std::env::var("OTEL_TRACES_SAMPLER_ARG").ok().as_deref(),
    )
});

fn traces_enabled(sampler: Option<&str>, sampler_arg: Option<&str>) -> bool {
    if matches!(sampler, Some("always_off" | "parentbased_always_off")) {
        return false;
    }

    sampler_arg != Some("0")
}

#[inline]
pub fn should_propagate_trace_context() -> bool {
    *ENABLE_OTEL_TRACES
}

/// Collects the propagation fields into outbound request headers.
#[derive(Default)]
pub struct HttpHeaderContextInjector(HeaderMap);

impl HttpHeaderContextInjector {
    pub fn into_headers(self) -> HeaderMap {
        self.0
    }
}

impl opentelemetry::propagation::Injector for HttpHeaderContextInjector {
    fn set(&mut self, key: &str, value: String) {
        match (
            HeaderName::from_bytes(key.as_bytes()),
            HeaderValue::from_str(&value),
        ) {
            (Ok(name), Ok(value)) => {
                self.0.insert(name, value);
            }
            _ => tracing::debug!("Skipping invalid propagation header '{key}'"),
        }
    }
}
