use axum::response::{Html, IntoResponse};
use axum::Json;
use serde_json::json;

pub async fn index() -> impl IntoResponse {
    Html("<h1>Hello, World!</h1>")
}

pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}
