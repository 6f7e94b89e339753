//! HTTP endpoint the browser extension posts visible comments to.

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use reelscope_core::{CoreError, ServerConfig};
use sentiment::{summarize_batch, PolarityScorer, VaderScorer};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::{debug, info};

pub type SharedScorer = Arc<dyn PolarityScorer + Send + Sync>;

pub fn build_router(scorer: SharedScorer) -> Router {
    Router::new()
        .route("/analyze", post(analyze).options(preflight))
        .with_state(scorer)
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(
            tower_http::trace::TraceLayer::new_for_http().make_span_with(
                |request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        path = %request.uri().path(),
                    )
                },
            ),
        )
}

/// Binds `host:port` and serves until the process is stopped.
pub async fn serve(config: &ServerConfig) -> Result<(), CoreError> {
    let app = build_router(Arc::new(VaderScorer::new()));

    let addr = format!("{}:{}", config.host, config.port);
    info!("Sentiment endpoint listening on http://{addr}/analyze");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn preflight() -> Response {
    (
        [
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
            (header::ACCESS_CONTROL_ALLOW_HEADERS, "*"),
            (header::ACCESS_CONTROL_ALLOW_METHODS, "POST, OPTIONS"),
        ],
        Json(json!({"status": "preflight"})),
    )
        .into_response()
}

async fn analyze(State(scorer): State<SharedScorer>, body: Bytes) -> Response {
    let comments = match parse_comments(&body) {
        Ok(comments) => comments,
        Err(message) => return error_response(StatusCode::BAD_REQUEST, message),
    };

    debug!("analyzing {} comments", comments.len());
    let summary = summarize_batch(scorer.as_ref(), &comments[..]);
    info!(
        "processed {} comments, mean compound {:.4}",
        summary.processed_comments, summary.compound
    );

    (
        [(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*")],
        Json(summary),
    )
        .into_response()
}

/// Pulls the `comments` array out of a request body. Non-string entries are
/// scored by their JSON text.
fn parse_comments(body: &[u8]) -> Result<Vec<String>, &'static str> {
    let value: Value = serde_json::from_slice(body).map_err(|_| "no comments provided")?;
    let comments = value
        .as_object()
        .and_then(|object| object.get("comments"))
        .ok_or("no comments provided")?;
    let entries = comments.as_array().ok_or("comments must be an array")?;

    Ok(entries
        .iter()
        .map(|entry| match entry {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        })
        .collect())
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        [(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*")],
        Json(json!({ "error": message })),
    )
        .into_response()
}
