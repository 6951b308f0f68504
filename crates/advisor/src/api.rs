//! HTTP API: recommendations, health checks and Prometheus metrics

use advisor_lib::{
    catalog::{CatalogRepository, InMemoryCatalog},
    health::{components, ComponentStatus, HealthRegistry},
    observability::{outcomes, AdvisorMetrics, StructuredLogger},
    ErrorResponse, ProjectDescription, RecommendOutcome, Recommender, RuleTables,
};
use anyhow::{Context, Result};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use prometheus::{Encoder, TextEncoder};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

use crate::config::AdvisorConfig;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub recommender: Recommender,
    pub health_registry: HealthRegistry,
    pub metrics: AdvisorMetrics,
    pub logger: StructuredLogger,
}

impl AppState {
    pub fn new(
        recommender: Recommender,
        health_registry: HealthRegistry,
        metrics: AdvisorMetrics,
        logger: StructuredLogger,
    ) -> Self {
        Self {
            recommender,
            health_registry,
            metrics,
            logger,
        }
    }

    /// Load rule tables and catalog and record their health.
    ///
    /// Invalid rule tables abort startup. A catalog that fails to load
    /// leaves the advisor running but unready, serving an empty catalog.
    pub async fn from_config(config: &AdvisorConfig, logger: StructuredLogger) -> Result<Self> {
        let health_registry = HealthRegistry::new();
        let metrics = AdvisorMetrics::new();

        let rules = match &config.rules_path {
            Some(path) => RuleTables::from_file(path)
                .with_context(|| format!("Failed to load rule tables from {}", path.display()))?,
            None => RuleTables::default(),
        };
        health_registry.set_healthy(components::RULES).await;

        let catalog_path = config.catalog_path.display().to_string();
        let catalog = match InMemoryCatalog::from_file(&config.catalog_path) {
            Ok(catalog) if catalog.instance_count() == 0 => {
                health_registry
                    .set_degraded(components::CATALOG, "Catalog is empty")
                    .await;
                catalog
            }
            Ok(catalog) => {
                health_registry.set_healthy(components::CATALOG).await;
                catalog
            }
            Err(e) => {
                error!(path = %catalog_path, error = %e, "Failed to load catalog");
                health_registry
                    .set_unhealthy(components::CATALOG, e.to_string())
                    .await;
                InMemoryCatalog::default()
            }
        };
        logger.log_catalog_loaded(&catalog_path, catalog.instance_count());
        metrics.set_catalog_instances(catalog.instance_count());

        let recommender = Recommender::new(Arc::new(rules), Arc::new(catalog));
        Ok(Self::new(recommender, health_registry, metrics, logger))
    }
}

fn error_reply(status: StatusCode, body: ErrorResponse) -> Response {
    (status, Json(body)).into_response()
}

/// Recommend instances for a project description
///
/// 200 with ranked results, 404 when nothing matches, 400 for invalid
/// input, 500 with an opaque message otherwise.
async fn recommend(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ProjectDescription>, JsonRejection>,
) -> Response {
    let started = Instant::now();

    let desc = match payload {
        Ok(Json(desc)) => desc,
        Err(rejection) => {
            state.metrics.record_outcome(outcomes::INVALID_INPUT);
            return error_reply(
                StatusCode::BAD_REQUEST,
                ErrorResponse::new(rejection.body_text(), outcomes::INVALID_INPUT),
            );
        }
    };

    let result = state.recommender.recommend(&desc);
    let elapsed = started.elapsed().as_secs_f64();
    state.metrics.observe_recommend_latency(elapsed);

    match result {
        Ok(RecommendOutcome::Recommended(recommendation)) => {
            state.metrics.record_outcome(outcomes::RECOMMENDED);
            state
                .metrics
                .observe_eligible_candidates(recommendation.results.len());
            state.logger.log_recommendation(&recommendation, elapsed);
            (StatusCode::OK, Json(recommendation)).into_response()
        }
        Ok(RecommendOutcome::NoMatch(no_match)) => {
            state.metrics.record_outcome(no_match.code());
            state.metrics.observe_eligible_candidates(0);
            state.logger.log_no_match(&no_match);
            error_reply(StatusCode::NOT_FOUND, ErrorResponse::from(&no_match))
        }
        Err(err) if err.is_client_error() => {
            state.metrics.record_outcome(outcomes::INVALID_INPUT);
            error_reply(
                StatusCode::BAD_REQUEST,
                ErrorResponse::new(err.public_message(), err.code()),
            )
        }
        Err(err) => {
            state.metrics.record_outcome(outcomes::INTERNAL_ERROR);
            state.logger.log_internal_error(&err);
            error_reply(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::new(err.public_message(), err.code()),
            )
        }
    }
}

/// 200 if healthy or degraded, 503 if any component is unhealthy
async fn healthz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let health = state.health_registry.health().await;

    let status_code = match health.status {
        ComponentStatus::Healthy | ComponentStatus::Degraded => StatusCode::OK,
        ComponentStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status_code, Json(health))
}

/// 200 if ready, 503 if not
async fn readyz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let readiness = state.health_registry.readiness().await;

    let status_code = if readiness.ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(readiness))
}

async fn metrics() -> Response {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();

    if let Err(e) = encoder.encode(&prometheus::gather(), &mut buffer) {
        error!(error = %e, "Failed to encode metrics");
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    (
        StatusCode::OK,
        [("content-type", encoder.format_type().to_string())],
        buffer,
    )
        .into_response()
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/recommend", post(recommend))
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/metrics", get(metrics))
        .with_state(state)
}

/// Start the API server
pub async fn serve(port: u16, state: Arc<AppState>) -> Result<()> {
    let app = create_router(state);

    let addr = format!("0.0.0.0:{}", port);
    info!(addr = %addr, "Starting API server");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}
