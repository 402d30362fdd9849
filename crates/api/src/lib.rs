mod rate_limit;

use std::env;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::body::Body;
use axum::extract::{Json, Path as AxumPath, Query, State};
use axum::http::{Method, Request, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use chrono::Timelike;
use reststop_agents::AssistantAgent;
use reststop_core::{
    ChatInput, Coordinates, Preferences, RestroomType, SearchFilters, UnitSystem,
};
use reststop_observability::AppMetrics;
use reststop_storage::{sample_restrooms, DatasetConfig, MemoryStore, COIMBATORE_CENTER};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::rate_limit::IpRateLimiter;

const DEFAULT_API_KEY: &str = "dev-reststop-key";
const MAX_BODY_BYTES: usize = 64 * 1024;

#[derive(Clone)]
pub struct ApiState {
    pub agent: Arc<AssistantAgent<MemoryStore>>,
    pub metrics: Arc<AppMetrics>,
    pub api_key: String,
    pub limiter: IpRateLimiter,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp_utc: String,
    metrics: reststop_observability::MetricsSnapshot,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatRequest {
    text: String,
}

#[derive(Debug, Clone, Deserialize)]
struct RecommendationRequest {
    lat: f64,
    lng: f64,
    #[serde(default)]
    preferences: Preferences,
}

#[derive(Debug, Clone, Deserialize)]
struct RestroomsQuery {
    kind: Option<String>,
    min_cleanliness: Option<f64>,
    max_distance: Option<f64>,
    /// Comma-separated amenity ids that must all be present.
    amenities: Option<String>,
    open_now: Option<bool>,
}

/// Build the full application with a dataset seeded from the environment.
pub async fn build_app() -> Result<Router> {
    let metrics = AppMetrics::shared();

    let units = env_parse("RESTSTOP_UNITS", UnitSystem::default());
    let seed = env_parse("RESTSTOP_DATASET_SEED", DatasetConfig::default().seed);
    let user_location = Coordinates {
        lat: env_parse("RESTSTOP_USER_LAT", COIMBATORE_CENTER.lat),
        lng: env_parse("RESTSTOP_USER_LNG", COIMBATORE_CENTER.lng),
    };

    let dataset = sample_restrooms(&DatasetConfig {
        seed,
        user_location,
        now_hour: chrono::Local::now().hour(),
        units,
    });
    let store = Arc::new(MemoryStore::with_restrooms(dataset));
    let agent = Arc::new(AssistantAgent::new(store, metrics.clone(), units));

    let api_key = env::var("RESTSTOP_API_KEY").unwrap_or_else(|_| DEFAULT_API_KEY.to_string());
    let rate_limit_window =
        Duration::from_secs(env_parse("RESTSTOP_RATE_LIMIT_WINDOW_SECONDS", 60));
    let rate_limit_max = env_parse("RESTSTOP_RATE_LIMIT_MAX", 120);

    let state = ApiState {
        agent,
        metrics,
        api_key,
        limiter: IpRateLimiter::new(rate_limit_window, rate_limit_max),
    };

    Ok(build_router(state))
}

pub fn build_router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/v1/chat", post(chat))
        .route("/v1/recommendations", post(recommendations))
        .route("/v1/restrooms", get(restrooms_list))
        .route("/v1/restrooms/:id", get(restroom_detail))
        .layer(build_cors_layer())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            api_key_middleware,
        ))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ))
        .with_state(state)
}

async fn health(State(state): State<ApiState>) -> impl IntoResponse {
    let payload = HealthResponse {
        status: "ok",
        timestamp_utc: chrono::Utc::now().to_rfc3339(),
        metrics: state.metrics.snapshot(),
    };
    (StatusCode::OK, Json(payload))
}

async fn chat(State(state): State<ApiState>, Json(input): Json<ChatRequest>) -> Response {
    match state.agent.handle_chat(ChatInput { text: input.text }).await {
        Ok(reply) => (StatusCode::OK, Json(reply)).into_response(),
        Err(error) => internal_error(&error),
    }
}

async fn recommendations(
    State(state): State<ApiState>,
    Json(input): Json<RecommendationRequest>,
) -> Response {
    let location = Coordinates {
        lat: input.lat,
        lng: input.lng,
    };

    match state.agent.recommend(location, &input.preferences).await {
        Ok(restrooms) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "count": restrooms.len(),
                "restrooms": restrooms,
            })),
        )
            .into_response(),
        Err(error) => internal_error(&error),
    }
}

async fn restrooms_list(
    State(state): State<ApiState>,
    Query(query): Query<RestroomsQuery>,
) -> Response {
    let mut filters = SearchFilters {
        min_cleanliness: query.min_cleanliness,
        max_distance: query.max_distance,
        open_now: query.open_now.unwrap_or(false),
        ..SearchFilters::default()
    };

    if let Some(kind) = query.kind.as_deref() {
        match kind.parse::<RestroomType>() {
            Ok(parsed) => filters.kinds.push(parsed),
            Err(error) => return bad_request(&error.to_string()),
        }
    }

    if let Some(list) = query.amenities.as_deref() {
        filters.amenity_ids = list
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .collect();
    }

    match state.agent.search(&filters).await {
        Ok(restrooms) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "count": restrooms.len(),
                "restrooms": restrooms,
            })),
        )
            .into_response(),
        Err(error) => internal_error(&error),
    }
}

async fn restroom_detail(State(state): State<ApiState>, AxumPath(id): AxumPath<String>) -> Response {
    match state.agent.restroom(&id).await {
        Ok(Some(restroom)) => (StatusCode::OK, Json(restroom)).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({
                "error": "not_found",
                "message": format!("no restroom with id {id}"),
            })),
        )
            .into_response(),
        Err(error) => internal_error(&error),
    }
}

async fn api_key_middleware(
    State(state): State<ApiState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if request.method() == Method::OPTIONS || is_public_endpoint(request.uri().path()) {
        return next.run(request).await;
    }

    let header_key = request
        .headers()
        .get("x-api-key")
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    if header_key == state.api_key {
        return next.run(request).await;
    }

    (
        StatusCode::UNAUTHORIZED,
        Json(serde_json::json!({
            "error": "unauthorized",
            "message": "missing or invalid x-api-key"
        })),
    )
        .into_response()
}

async fn rate_limit_middleware(
    State(state): State<ApiState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if request.method() == Method::OPTIONS || is_public_endpoint(request.uri().path()) {
        return next.run(request).await;
    }

    if !state.limiter.allow(&request_ip(&request)) {
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(serde_json::json!({
                "error": "rate_limited",
                "message": "rate limit exceeded for this IP"
            })),
        )
            .into_response();
    }

    next.run(request).await
}

fn is_public_endpoint(path: &str) -> bool {
    matches!(path, "/health")
}

fn request_ip(request: &Request<Body>) -> String {
    request
        .headers()
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .map(|value| value.split(',').next().unwrap_or("unknown").trim().to_string())
        .unwrap_or_else(|| "local".to_string())
}

fn build_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
}

fn internal_error(error: &anyhow::Error) -> Response {
    tracing::error!(error = %error, "request failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({
            "error": "internal",
            "message": "something went wrong handling the request"
        })),
    )
        .into_response()
}

fn bad_request(message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({
            "error": "bad_request",
            "message": message,
        })),
    )
        .into_response()
}

fn env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}
