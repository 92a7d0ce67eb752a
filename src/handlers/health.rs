use std::sync::Arc;

use axum::extract::State;
use axum::Json;

use crate::state::AppState;

// GET /api/health
pub async fn health(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let mut body = serde_json::Map::new();
    body.insert("status".to_string(), "healthy".into());
    body.insert(
        format!("{}_connected", state.travel.name()),
        state.travel.is_configured().into(),
    );
    body.insert(
        format!("{}_connected", state.llm.name()),
        state.llm.is_configured().into(),
    );
    Json(serde_json::Value::Object(body))
}

// GET /api/test
pub async fn test() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "message": "Backend is working!",
    }))
}
