use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use tradewise_core::domain::request::{AdvisoryParams, ComparativeParams, ValidationError};
use tradewise_core::llm::anthropic::AnthropicClient;
use tradewise_core::llm::error::ReasoningError;
use tradewise_core::llm::LlmClient;
use tradewise_core::market::fetch::{LatencyProfile, MarketDataService};
use tradewise_core::recommend;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = tradewise_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let llm: Option<Arc<dyn LlmClient>> = match AnthropicClient::from_settings(&settings) {
        Ok(client) => Some(Arc::new(client)),
        Err(e) => {
            sentry_anyhow::capture_anyhow(&e);
            tracing::error!(error = %e, "LLM client unavailable; starting API in degraded mode");
            None
        }
    };

    let state = AppState {
        market: MarketDataService::synthesized(LatencyProfile::from_env()),
        llm,
    };

    let app = Router::new()
        .route("/healthz", get(healthz))
        .route("/analyses", post(post_analysis))
        .route("/recommendations", post(post_recommendation))
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3000);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));

    tracing::info!(%addr, "api listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn healthz() -> &'static str {
    "ok"
}

#[derive(Clone)]
struct AppState {
    market: MarketDataService,
    llm: Option<Arc<dyn LlmClient>>,
}

#[derive(Debug, Serialize)]
struct ApiRecommendation {
    request_id: Uuid,
    recommendation: String,
}

async fn post_analysis(
    State(state): State<AppState>,
    Json(params): Json<ComparativeParams>,
) -> Result<Json<ApiRecommendation>, (StatusCode, String)> {
    let llm = require_llm(&state)?;

    let out = recommend::comparative(&state.market, llm.as_ref(), params)
        .await
        .map_err(map_error)?;

    Ok(Json(ApiRecommendation {
        request_id: Uuid::new_v4(),
        recommendation: out.recommendation,
    }))
}

async fn post_recommendation(
    State(state): State<AppState>,
    Json(params): Json<AdvisoryParams>,
) -> Result<Json<ApiRecommendation>, (StatusCode, String)> {
    let llm = require_llm(&state)?;

    let out = recommend::advisory(&state.market, llm.as_ref(), params)
        .await
        .map_err(map_error)?;

    Ok(Json(ApiRecommendation {
        request_id: Uuid::new_v4(),
        recommendation: out.recommendation,
    }))
}

fn require_llm(state: &AppState) -> Result<Arc<dyn LlmClient>, (StatusCode, String)> {
    state.llm.clone().ok_or((
        StatusCode::SERVICE_UNAVAILABLE,
        "reasoning service is not configured".to_string(),
    ))
}

fn map_error(err: anyhow::Error) -> (StatusCode, String) {
    if let Some(validation) = err.downcast_ref::<ValidationError>() {
        return (StatusCode::UNPROCESSABLE_ENTITY, validation.to_string());
    }

    if let Some(reasoning) = err.downcast_ref::<ReasoningError>() {
        sentry_anyhow::capture_anyhow(&err);
        return (StatusCode::BAD_GATEWAY, reasoning.to_string());
    }

    sentry_anyhow::capture_anyhow(&err);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "internal error".to_string(),
    )
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

fn init_sentry(settings: &tradewise_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
