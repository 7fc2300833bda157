//! Truss Solver HTTP Server

use std::sync::Arc;

use anyhow::Context;
use axum::{
    extract::{rejection::JsonRejection, Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use log::{error, info};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};

use truss_solver::prelude::*;

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

#[derive(Clone)]
struct AppState {
    options: Arc<AnalysisOptions>,
}

fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::Instability => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorKind::Numerical => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn analyze(
    State(state): State<AppState>,
    payload: Result<Json<TrussInput>, JsonRejection>,
) -> Response {
    let input = match payload {
        Ok(Json(input)) => input,
        Err(rejection) => {
            info!("Request rejected: {}", rejection.body_text());
            let body = ErrorResponse {
                success: false,
                kind: ErrorKind::Validation,
                error: format!("Failed to parse request: {}", rejection.body_text()),
            };
            return (StatusCode::BAD_REQUEST, Json(body)).into_response();
        }
    };

    let options = Arc::clone(&state.options);
    let outcome =
        tokio::task::spawn_blocking(move || truss_solver::analysis::analyze(&input, &options))
            .await;

    match outcome {
        Ok(Ok(result)) => (StatusCode::OK, Json(result.to_response())).into_response(),
        Ok(Err(err)) => {
            info!("Analysis rejected ({:?}): {}", err.kind(), err);
            (status_for(err.kind()), Json(ErrorResponse::from(&err))).into_response()
        }
        Err(join_err) => {
            error!("Analysis task failed: {join_err}");
            let body = ErrorResponse {
                success: false,
                kind: ErrorKind::Numerical,
                error: format!("Analysis task failed: {join_err}"),
            };
            (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
        }
    }
}

fn router(options: AnalysisOptions) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/analyze", post(analyze))
        .route("/api/v1/analyze", post(analyze))
        .with_state(AppState {
            options: Arc::new(options),
        })
        .layer(cors)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = ServerConfig::from_env().context("Invalid server configuration")?;
    let addr = config.bind_addr();
    let app = router(config.analysis);

    info!("Truss Solver Server listening on http://{addr}");
    info!("  Health check: GET  /health");
    info!("  Analysis:     POST /analyze (also /api/v1/analyze)");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
