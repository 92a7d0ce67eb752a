use serde::Serialize;

use crate::models::{FlightSearchParams, HotelSearchParams, IntentRecord};
use crate::services::composer::{self, ComposeContext};
use crate::services::travel::ProviderError;
use crate::state::AppState;

/// Result of a flight or hotel search, as returned by the search endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct SearchOutcome {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flights: Option<Vec<serde_json::Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hotels: Option<Vec<serde_json::Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_response: Option<String>,
    pub search_params: serde_json::Value,
}

/// A failed search, with an apology composed when the caller supplied a message.
#[derive(Debug, Clone)]
pub struct SearchFailure {
    pub error: ProviderError,
    pub ai_response: Option<String>,
}

pub async fn flight_search(
    state: &AppState,
    params: &FlightSearchParams,
    user_message: Option<&str>,
) -> Result<SearchOutcome, SearchFailure> {
    let result = state.travel.search_flights(params).await;
    let intent = IntentRecord::from(params);
    let search_params = serde_json::to_value(params).unwrap_or_default();

    match result {
        Ok(flights) => {
            tracing::info!(count = flights.len(), "flight search succeeded");
            let ai_response = describe(state, user_message, intent, Ok(flights.as_slice())).await;
            Ok(SearchOutcome {
                flights: Some(flights),
                hotels: None,
                ai_response,
                search_params,
            })
        }
        Err(error) => {
            tracing::warn!(error = %error, "flight search failed");
            let ai_response = describe(state, user_message, intent, Err(&error)).await;
            Err(SearchFailure { error, ai_response })
        }
    }
}

pub async fn hotel_search(
    state: &AppState,
    params: &HotelSearchParams,
    user_message: Option<&str>,
) -> Result<SearchOutcome, SearchFailure> {
    let result = state.travel.search_hotels(params).await;
    let intent = IntentRecord::from(params);
    let search_params = serde_json::to_value(params).unwrap_or_default();

    match result {
        Ok(hotels) => {
            tracing::info!(count = hotels.len(), "hotel search succeeded");
            let ai_response = describe(state, user_message, intent, Ok(hotels.as_slice())).await;
            Ok(SearchOutcome {
                flights: None,
                hotels: Some(hotels),
                ai_response,
                search_params,
            })
        }
        Err(error) => {
            tracing::warn!(error = %error, "hotel search failed");
            let ai_response = describe(state, user_message, intent, Err(&error)).await;
            Err(SearchFailure { error, ai_response })
        }
    }
}

async fn describe(
    state: &AppState,
    user_message: Option<&str>,
    intent: IntentRecord,
    result: Result<&[serde_json::Value], &ProviderError>,
) -> Option<String> {
    let user_message = user_message.map(str::trim).filter(|m| !m.is_empty())?;

    let ctx = ComposeContext::new(user_message, intent);
    let ctx = match result {
        Ok(items) => ctx.with_results(items),
        Err(e) => ctx.with_error(e.to_string()),
    };
    Some(composer::compose(state.llm.as_ref(), &ctx).await)
}
