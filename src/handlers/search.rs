use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::{ChatRequest, FlightSearchRequest, HotelSearchRequest};
use crate::services::chat;
use crate::services::search::{self, SearchFailure, SearchOutcome};
use crate::state::AppState;

use super::chat::required_message;

impl IntoResponse for SearchFailure {
    fn into_response(self) -> Response {
        let mut body = serde_json::json!({ "error": self.error.to_string() });
        if let Some(ai_response) = self.ai_response {
            body["ai_response"] = serde_json::json!(ai_response);
        }
        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}

// POST /api/flights/search
pub async fn search_flights(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<FlightSearchRequest>, JsonRejection>,
) -> Result<Json<SearchOutcome>, Response> {
    let Json(body) = payload.map_err(|e| AppError::from(e).into_response())?;
    let user_message = body.user_message.clone();
    let params = body
        .into_params()
        .map_err(|msg| AppError::Validation(msg).into_response())?;

    search::flight_search(&state, &params, user_message.as_deref())
        .await
        .map(Json)
        .map_err(IntoResponse::into_response)
}

// POST /api/hotels/search
pub async fn search_hotels(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<HotelSearchRequest>, JsonRejection>,
) -> Result<Json<SearchOutcome>, Response> {
    let Json(body) = payload.map_err(|e| AppError::from(e).into_response())?;
    let user_message = body.user_message.clone();
    let params = body
        .into_params()
        .map_err(|msg| AppError::Validation(msg).into_response())?;

    search::hotel_search(&state, &params, user_message.as_deref())
        .await
        .map(Json)
        .map_err(IntoResponse::into_response)
}

// GET /api/hotels/offers?hotelId=...
#[derive(Deserialize)]
pub struct HotelOffersQuery {
    #[serde(rename = "hotelId")]
    pub hotel_id: Option<String>,
}

pub async fn hotel_offers(
    State(state): State<Arc<AppState>>,
    query: Result<Query<HotelOffersQuery>, QueryRejection>,
) -> Result<Json<serde_json::Value>, AppError> {
    let query = query.map(|Query(q)| q).unwrap_or_else(|rejection| {
        tracing::debug!(error = %rejection, "rejected hotel offers query");
        HotelOffersQuery { hotel_id: None }
    });
    let hotel_id = query
        .hotel_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::Validation("Hotel ID is required".to_string()))?;

    let offers = state.travel.hotel_offers(hotel_id).await?;
    Ok(Json(offers))
}

// POST /api/ai-search
pub async fn ai_search(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<serde_json::Value>, Response> {
    let message = required_message(payload).map_err(IntoResponse::into_response)?;

    chat::ai_search(&state, &message)
        .await
        .map(Json)
        .map_err(IntoResponse::into_response)
}
