use config::{Config, ConfigError, Environment};
use serde::Deserialize;

use crate::repository::hostaway::HostawayCredentials;

/// Backing medium of the approval store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalStoreKind {
    #[default]
    Memory,
    File,
}

impl ApprovalStoreKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ApprovalStoreKind::Memory => "memory",
            ApprovalStoreKind::File => "file",
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    #[serde(default)]
    pub approval_store: ApprovalStoreKind,
    #[serde(default = "default_approvals_path")]
    pub approvals_path: String,
    #[serde(default = "default_hostaway_base_url")]
    pub hostaway_base_url: String,
    #[serde(default)]
    pub hostaway_account_id: Option<String>,
    #[serde(default)]
    pub hostaway_api_key: Option<String>,
    #[serde(default = "default_provider_timeout_secs")]
    pub provider_timeout_secs: u64,
    #[serde(default = "default_provider_fallback")]
    pub provider_fallback: bool,
    #[serde(default)]
    pub telemetry_enabled: bool,
    #[serde(default = "default_telemetry_service_name")]
    pub telemetry_service_name: String,
    #[serde(default = "default_telemetry_service_version")]
    pub telemetry_service_version: String,
    #[serde(default = "default_telemetry_environment")]
    pub telemetry_environment: String,
    #[serde(default = "default_telemetry_otlp_endpoint")]
    pub telemetry_otlp_endpoint: String,
}

fn default_listen_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_approvals_path() -> String {
    "data/approved_reviews.runtime.json".to_string()
}

fn default_hostaway_base_url() -> String {
    "https://api.hostaway.com/v1".to_string()
}

fn default_provider_timeout_secs() -> u64 {
    10
}

fn default_provider_fallback() -> bool {
    true
}

fn default_telemetry_service_name() -> String {
    "reviews-dashboard".to_string()
}

fn default_telemetry_service_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_telemetry_environment() -> String {
    "production".to_string()
}

fn default_telemetry_otlp_endpoint() -> String {
    "http://otel-collector.observability.svc.cluster.local:4317".to_string()
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(Environment::default())
    }

    fn from_source(environment: Environment) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(environment)
            .build()?
            .try_deserialize()
    }

    /// Live provider credentials; `None` unless both halves are set.
    pub fn hostaway_credentials(&self) -> Option<HostawayCredentials> {
        let account_id = self.hostaway_account_id.as_deref().filter(|v| !v.is_empty())?;
        let api_key = self.hostaway_api_key.as_deref().filter(|v| !v.is_empty())?;
        Some(HostawayCredentials {
            account_id: account_id.to_string(),
            api_key: api_key.to_string(),
        })
    }
}
