use std::sync::Arc;

use anyhow::{Context, Error, Result};
use axum::{
    Router,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use chrono::Utc;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use crate::{
    clients::{openai::OpenAiClient, slack::SlackClient},
    config::Config,
    models::{
        health::{HealthCheckResponse, HealthStatus},
        status::ProcessingStatus,
    },
    pipeline::{
        dedup::DedupCache,
        identity::IdentityResolver,
        language::LanguageHeuristic,
        router::EventRouter,
        sink::TracingSink,
        translation::TranslationGateway,
    },
};

pub struct AppState {
    pub router: Arc<EventRouter>,
}

impl AppState {
    pub fn from_config(config: &Config) -> Result<Self, Error> {
        let primary = Arc::new(SlackClient::new(
            &config.slack_api_base,
            &config.slack_bot_token,
            config.http_timeout(),
            config.retry_config(),
        )?);
        let mirror = Arc::new(SlackClient::new(
            &config.slack_api_base,
            &config.slack_debug_bot_token,
            config.http_timeout(),
            config.retry_config(),
        )?);
        let translator = Arc::new(OpenAiClient::new(config)?);

        let router = EventRouter::new(
            config.router_settings(),
            Arc::new(DedupCache::new(config.dedup_capacity)),
            LanguageHeuristic::new(config.english_threshold),
            TranslationGateway::new(translator, config.call_timeout()),
            Arc::new(IdentityResolver::new(primary.clone(), config.call_timeout())),
            primary,
            mirror,
            Arc::new(TracingSink),
        );

        Ok(Self {
            router: Arc::new(router),
        })
    }
}

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/events", post(slack_events))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run_api_server(config: Config) -> Result<(), Error> {
    let state = Arc::new(AppState::from_config(&config)?);
    let app = build_router(state);

    let addr = format!("0.0.0.0:{}", config.server_port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!(address = %addr, "Webhook server started");

    axum::serve(listener, app).await?;

    Ok(())
}

// The platform only needs an acknowledgement, so every outcome maps to 200.
async fn slack_events(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let payload = match serde_json::from_slice::<Value>(&body) {
        Ok(payload) => payload,
        Err(e) => {
            debug!(error = %e, "Ignoring non-JSON webhook body");
            return StatusCode::OK.into_response();
        }
    };

    debug!(payload = %payload, "Webhook payload received");

    match state.router.handle(&payload).await {
        ProcessingStatus::Verification { challenge } => {
            (StatusCode::OK, Json(json!({ "challenge": challenge }))).into_response()
        }
        status => {
            debug!(%status, "Webhook handled");
            StatusCode::OK.into_response()
        }
    }
}

async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let health = HealthCheckResponse {
        status: HealthStatus::Healthy,
        timestamp: Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
        dedup_entries: state.router.dedup().len(),
        cached_identities: state.router.identities().cached_len(),
    };

    (StatusCode::OK, Json(health))
}
