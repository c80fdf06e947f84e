//! FEM Engine HTTP Server

use axum::{
    extract::Json,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Instant;
use tower_http::cors::{Any, CorsLayer};

use fem_engine::prelude::*;

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

#[derive(Debug, Deserialize)]
struct ExportRequest {
    config: AnalysisConfig,
    #[serde(default)]
    export: ExportOptions,
}

async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Io => StatusCode::BAD_REQUEST,
        ErrorKind::Aborted => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

async fn analyze(Json(config): Json<AnalysisConfig>) -> impl IntoResponse {
    let start = Instant::now();
    let outcome = tokio::task::spawn_blocking(move || config.run()).await;

    let response = match outcome {
        Ok(result) => AnalysisResponse::from_outcome(&result),
        Err(e) => AnalysisResponse::failure(format!("analysis task failed: {e}"), None),
    }
    .with_elapsed(start.elapsed().as_secs_f64() * 1e3);

    let status = match (response.success, response.error_kind) {
        (true, _) => StatusCode::OK,
        (false, Some(kind)) => status_for(kind),
        (false, None) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(response))
}

async fn export(Json(request): Json<ExportRequest>) -> impl IntoResponse {
    let ExportRequest { config, export } = request;
    let outcome = tokio::task::spawn_blocking(move || {
        config
            .run()
            .map(|analysis| fem_engine::report::export(&analysis, &export))
    })
    .await;

    match outcome {
        Ok(Ok(text)) => (StatusCode::OK, text),
        Ok(Err(e)) => (status_for(e.kind()), e.to_string()),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("export task failed: {e}"),
        ),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/health", get(health))
        .route("/api/v1/analyze", post(analyze))
        .route("/api/v1/export", post(export))
        .layer(cors);

    let port = std::env::var("FEM_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8086);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    log::info!("FEM Engine server listening on http://{addr}");
    println!("FEM Engine Server listening on http://{}", addr);
    println!("  Health check: GET  /health");
    println!("  Analysis:     POST /api/v1/analyze");
    println!("  Export:       POST /api/v1/export");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
