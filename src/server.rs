use std::net::SocketAddr;

use anyhow::Result;
use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json},
    routing::get,
};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::models::{ChapterContent, ChapterSummary, StoredMetadata};
use crate::services::library::Database;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
}

pub fn router(state: AppState, static_dir: &std::path::Path) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .route("/api/books", get(list_books))
        .route("/api/chapters/:book_name", get(list_chapters))
        .route("/api/content/:book_name/:ch_num", get(get_content))
        .route("/api/metadata/:book_name", get(get_metadata))
        .nest_service("/static", ServeDir::new(static_dir))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::AllowMethods::any())
                .allow_headers(tower_http::cors::AllowHeaders::any()),
        )
}

pub async fn run_server(config: AppConfig, db: Database) -> Result<()> {
    let app = router(AppState { db }, &config.static_dir);

    let addr: SocketAddr = config.bind_addr.parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}

async fn index() -> Html<&'static str> {
    Html(
        r#"<!DOCTYPE html>
<html>
<head>
    <title>Novel Shelf</title>
    <meta charset="utf-8">
    <style>
        body { font-family: Arial, sans-serif; margin: 40px; }
        .endpoint { background-color: #f5f5f5; padding: 10px; margin: 10px 0; border-radius: 4px; font-family: monospace; }
    </style>
</head>
<body>
    <h1>Novel Shelf</h1>
    <p>Read-only access to imported novels.</p>
    <h2>Available Endpoints:</h2>
    <div class="endpoint">GET /health</div>
    <div class="endpoint">GET /api/books</div>
    <div class="endpoint">GET /api/chapters/{book_name}</div>
    <div class="endpoint">GET /api/content/{book_name}/{chapter_num}</div>
    <div class="endpoint">GET /api/metadata/{book_name}</div>
</body>
</html>
"#,
    )
}

async fn health_check() -> &'static str {
    "OK"
}

async fn list_books(State(state): State<AppState>) -> Result<Json<Vec<String>>, ApiError> {
    Ok(Json(state.db.list_books().await?))
}

async fn list_chapters(
    State(state): State<AppState>,
    Path(book_name): Path<String>,
) -> Result<Json<Vec<ChapterSummary>>, ApiError> {
    let chapters = state.db.list_chapters(&book_name).await?;
    if chapters.is_empty() {
        return Err(ApiError::not_found("找不到這本書"));
    }
    Ok(Json(chapters))
}

async fn get_content(
    State(state): State<AppState>,
    Path((book_name, ch_num)): Path<(String, i64)>,
) -> Result<Json<ChapterContent>, ApiError> {
    state
        .db
        .get_chapter(&book_name, ch_num)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("找不到該章節"))
}

async fn get_metadata(
    State(state): State<AppState>,
    Path(book_name): Path<String>,
) -> Result<Json<StoredMetadata>, ApiError> {
    state
        .db
        .get_metadata(&book_name)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("找不到書籍資料"))
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(value: anyhow::Error) -> Self {
        tracing::error!("request failed: {:#}", value);
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: value.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let body = serde_json::json!({ "error": self.message });
        (self.status, Json(body)).into_response()
    }
}
