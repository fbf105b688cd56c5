use opentelemetry::trace::TracerProvider;
use opentelemetry::KeyValue;
use opentelemetry_otlp::{SpanExporter, WithExportConfig};
use opentelemetry_sdk::{trace::SdkTracerProvider, Resource};
use opentelemetry_semantic_conventions::resource::{SERVICE_NAME, SERVICE_VERSION};
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::{AppConfig, ApprovalStoreKind};

type TelemetryResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// What the trace resource says about this deployment.
pub struct TelemetryConfig {
    pub enabled: bool,
    pub service_name: String,
    pub service_version: String,
    pub environment: String,
    pub otlp_endpoint: String,
    pub approval_store: ApprovalStoreKind,
    pub live_provider: bool,
}

impl From<&AppConfig> for TelemetryConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            enabled: config.telemetry_enabled,
            service_name: config.telemetry_service_name.clone(),
            service_version: config.telemetry_service_version.clone(),
            environment: config.telemetry_environment.clone(),
            otlp_endpoint: config.telemetry_otlp_endpoint.clone(),
            approval_store: config.approval_store,
            live_provider: config.hostaway_credentials().is_some(),
        }
    }
}

fn resource_attributes(config: &TelemetryConfig) -> Vec<KeyValue> {
    let provider = if config.live_provider {
        "hostaway"
    } else {
        "fixtures"
    };

    vec![
        KeyValue::new(SERVICE_NAME, config.service_name.clone()),
        KeyValue::new(SERVICE_VERSION, config.service_version.clone()),
        KeyValue::new("deployment.environment.name", config.environment.clone()),
        KeyValue::new("reviews.approval_store", config.approval_store.as_str()),
        KeyValue::new("reviews.provider", provider),
    ]
}

fn tracer_provider(config: &TelemetryConfig) -> TelemetryResult<SdkTracerProvider> {
    let exporter = SpanExporter::builder()
        .with_tonic()
        .with_endpoint(&config.otlp_endpoint)
        .build()?;

    let resource = Resource::builder_empty()
        .with_attributes(resource_attributes(config))
        .build();

    Ok(SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .with_resource(resource)
        .build())
}

/// Keeps the tracer provider alive so buffered spans can be flushed on exit.
pub struct TelemetryGuard {
    provider: Option<SdkTracerProvider>,
}

impl TelemetryGuard {
    pub fn shutdown(self) {
        let Some(provider) = self.provider else {
            return;
        };

        match provider.shutdown() {
            Ok(()) => tracing::info!("OpenTelemetry tracer provider shut down"),
            Err(e) => tracing::warn!(error = ?e, "failed to flush OpenTelemetry spans"),
        }
    }
}

/// Installs the JSON log subscriber and, when enabled, the OTLP trace layer.
pub fn init(config: &TelemetryConfig, env_filter: EnvFilter) -> TelemetryResult<TelemetryGuard> {
    let provider = if config.enabled {
        Some(tracer_provider(config)?)
    } else {
        None
    };

    let otel_layer = provider
        .as_ref()
        .map(|provider| OpenTelemetryLayer::new(provider.tracer(config.service_name.clone())));

    if let Some(provider) = &provider {
        opentelemetry::global::set_tracer_provider(provider.clone());
    }

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().json())
        .with(otel_layer)
        .init();

    if config.enabled {
        tracing::info!(
            service = %config.service_name,
            endpoint = %config.otlp_endpoint,
            "OpenTelemetry initialized"
        );
    }

    Ok(TelemetryGuard { provider })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn telemetry_config(approval_store: ApprovalStoreKind, live_provider: bool) -> TelemetryConfig {
        TelemetryConfig {
            enabled: true,
            service_name: "reviews-dashboard".to_string(),
            service_version: "0.1.0".to_string(),
            environment: "staging".to_string(),
            otlp_endpoint: "http://localhost:4317".to_string(),
            approval_store,
            live_provider,
        }
    }

    fn attribute(attributes: &[KeyValue], key: &str) -> Option<String> {
        attributes
            .iter()
            .find(|kv| kv.key.as_str() == key)
            .map(|kv| kv.value.as_str().into_owned())
    }

    #[test]
    fn test_resource_describes_deployment() {
        let attributes = resource_attributes(&telemetry_config(ApprovalStoreKind::File, true));

        assert_eq!(attribute(&attributes, SERVICE_NAME).as_deref(), Some("reviews-dashboard"));
        assert_eq!(attribute(&attributes, SERVICE_VERSION).as_deref(), Some("0.1.0"));
        assert_eq!(attribute(&attributes, "deployment.environment.name").as_deref(), Some("staging"));
        assert_eq!(attribute(&attributes, "reviews.approval_store").as_deref(), Some("file"));
        assert_eq!(attribute(&attributes, "reviews.provider").as_deref(), Some("hostaway"));
    }

    #[test]
    fn test_resource_without_credentials_reports_fixtures() {
        let attributes = resource_attributes(&telemetry_config(ApprovalStoreKind::Memory, false));

        assert_eq!(attribute(&attributes, "reviews.approval_store").as_deref(), Some("memory"));
        assert_eq!(attribute(&attributes, "reviews.provider").as_deref(), Some("fixtures"));
    }

    #[test]
    fn test_disabled_guard_shuts_down_quietly() {
        TelemetryGuard { provider: None }.shutdown();
    }
}
