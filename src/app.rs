use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::errors::panic_response;
use crate::handlers;
use crate::state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    let routes = Router::new()
        .route("/api/health", get(handlers::health::health))
        .route("/api/test", get(handlers::health::test))
        .route("/api/chat", post(handlers::chat::chat))
        .route("/api/chat/stream", post(handlers::chat::chat_stream))
        .route("/api/flights/search", post(handlers::search::search_flights))
        .route("/api/hotels/search", post(handlers::search::search_hotels))
        .route(
            "/api/hotels/offers",
            get(handlers::search::hotel_offers).post(handlers::search::hotel_offers),
        )
        .route("/api/ai-search", post(handlers::search::ai_search))
        .route("/api/register", post(handlers::account::register))
        .route("/api/login", post(handlers::account::login));

    with_layers(routes).with_state(state)
}

// Panics are caught innermost so the trace layer records the 500.
fn with_layers<S>(router: Router<S>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use super::*;

    async fn explode() -> &'static str {
        panic!("fare table corrupted")
    }

    #[tokio::test]
    async fn test_handler_panic_becomes_json_500() {
        let app = with_layers(Router::<()>::new().route("/explode", get(explode)));

        let res = app
            .oneshot(Request::builder().uri("/explode").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "An unexpected error occurred");
        assert!(!json["error"].as_str().unwrap().contains("fare table"));
    }
}
