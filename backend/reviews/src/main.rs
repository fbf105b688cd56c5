mod config;
mod delivery;
mod domain;
mod repository;
mod telemetry;
mod usecase;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    routing::get,
    Router,
};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::config::{AppConfig, ApprovalStoreKind};
use crate::delivery::http::v1::approvals::{get_approvals, set_approval};
use crate::delivery::http::v1::properties::{get_performance, get_public_reviews, list_performance};
use crate::delivery::http::v1::reviews::{get_summary, list_reviews};
use crate::repository::approvals::{ConfiguredApprovalStore, FileApprovalStore, MemoryApprovalStore};
use crate::repository::hostaway::HostawayClient;
use crate::usecase::approvals::ApprovalsUseCase;
use crate::usecase::reviews::ReviewsUseCase;

pub struct AppState {
    pub reviews_usecase: ReviewsUseCase<HostawayClient, ConfiguredApprovalStore>,
    pub approvals_usecase: ApprovalsUseCase<ConfiguredApprovalStore>,
    pub metrics_handle: PrometheusHandle,
}

fn build_approval_store(config: &AppConfig) -> ConfiguredApprovalStore {
    match config.approval_store {
        ApprovalStoreKind::File => {
            ConfiguredApprovalStore::File(FileApprovalStore::new(&config.approvals_path))
        }
        ApprovalStoreKind::Memory => ConfiguredApprovalStore::Memory(MemoryApprovalStore::new()),
    }
}

fn build_router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route("/api/v1/reviews", get(list_reviews))
        .route("/api/v1/reviews/summary", get(get_summary))
        .route(
            "/api/v1/reviews/approvals",
            get(get_approvals).post(set_approval),
        )
        .route("/api/v1/properties/performance", get(list_performance))
        .route("/api/v1/properties/{id}/performance", get(get_performance))
        .route("/api/v1/properties/{id}/reviews", get(get_public_reviews));

    Router::new()
        .route("/healthz", get(healthz))
        .route("/metrics", get(metrics))
        .merge(api)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let telemetry = telemetry::init(&(&config).into(), env_filter).map_err(|e| anyhow::anyhow!(e))?;

    tracing::info!("starting the reviews service");

    let metrics_handle = PrometheusBuilder::new().install_recorder()?;
    metrics_process::Collector::default().describe();
    tracing::info!("prometheus metrics initialized");

    let approval_store = Arc::new(build_approval_store(&config));
    tracing::info!(medium = approval_store.medium(), "approval store configured");

    let credentials = config.hostaway_credentials();
    tracing::info!(
        live_provider = credentials.is_some(),
        fallback = config.provider_fallback,
        "review provider configured"
    );
    let provider = HostawayClient::new(
        config.hostaway_base_url.clone(),
        credentials,
        Duration::from_secs(config.provider_timeout_secs),
        config.provider_fallback,
    )?;

    let shared_state = Arc::new(AppState {
        reviews_usecase: ReviewsUseCase::new(provider, approval_store.clone()),
        approvals_usecase: ApprovalsUseCase::new(approval_store),
        metrics_handle,
    });

    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    tracing::info!(listen_addr = %config.listen_addr, "reviews service running");
    axum::serve(listener, build_router(shared_state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("reviews service stopped");
    telemetry.shutdown();

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

async fn metrics(State(state): State<Arc<AppState>>) -> String {
    metrics_process::Collector::default().collect();
    state.metrics_handle.render()
}

#[tracing::instrument]
async fn healthz() -> &'static str {
    "OK"
}
