use async_trait::async_trait;
use serde::Deserialize;

use super::{ProviderError, TravelProvider};
use crate::models::{FlightSearchParams, HotelSearchParams};

const TOKEN_PATH: &str = "/v1/security/oauth2/token";
const FLIGHT_OFFERS_PATH: &str = "/v2/shopping/flight-offers";
const HOTEL_OFFERS_PATH: &str = "/v2/shopping/hotel-offers";
const HOTEL_OFFERS_BY_HOTEL_PATH: &str = "/v2/shopping/hotel-offers/by-hotel";

pub struct AmadeusProvider {
    api_key: String,
    api_secret: String,
    base_url: String,
    client: reqwest::Client,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

impl AmadeusProvider {
    pub fn new(api_key: String, api_secret: String, base_url: String) -> Self {
        Self {
            api_key,
            api_secret,
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    // Tokens are not cached; every request authenticates first.
    async fn access_token(&self) -> Result<String, ProviderError> {
        let resp = self
            .client
            .post(format!("{}{TOKEN_PATH}", self.base_url))
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.api_key.as_str()),
                ("client_secret", self.api_secret.as_str()),
            ])
            .send()
            .await
            .map_err(|e| ProviderError::new(None, format!("failed to reach Amadeus: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ProviderError::new(Some(status.as_u16()), body));
        }

        resp.json::<TokenResponse>()
            .await
            .map(|t| t.access_token)
            .map_err(|e| ProviderError::new(None, format!("invalid Amadeus token response: {e}")))
    }

    async fn get(
        &self,
        path: &str,
        query: &[(&'static str, String)],
    ) -> Result<serde_json::Value, ProviderError> {
        let token = self.access_token().await?;

        let resp = self
            .client
            .get(format!("{}{path}", self.base_url))
            .bearer_auth(token)
            .query(query)
            .send()
            .await
            .map_err(|e| ProviderError::new(None, format!("failed to reach Amadeus: {e}")))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| ProviderError::new(Some(status.as_u16()), e.to_string()))?;

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), path, "Amadeus returned an error");
            return Err(ProviderError::new(Some(status.as_u16()), body));
        }

        let data: serde_json::Value = serde_json::from_str(&body).map_err(|e| {
            ProviderError::new(Some(status.as_u16()), format!("invalid Amadeus response: {e}"))
        })?;
        Ok(data["data"].clone())
    }
}

/// Query string for a flight offer search. Pure function of the params.
pub fn flight_query(params: &FlightSearchParams) -> Vec<(&'static str, String)> {
    let mut query = vec![
        ("originLocationCode", params.origin.clone()),
        ("destinationLocationCode", params.destination.clone()),
        ("departureDate", params.departure_date.format("%Y-%m-%d").to_string()),
        ("adults", params.adults.to_string()),
        ("currencyCode", params.currency.clone()),
    ];
    if let Some(return_date) = params.return_date {
        query.push(("returnDate", return_date.format("%Y-%m-%d").to_string()));
    }
    query
}

pub fn hotel_query(params: &HotelSearchParams) -> Vec<(&'static str, String)> {
    vec![
        ("cityCode", params.city_code.clone()),
        ("checkInDate", params.check_in.format("%Y-%m-%d").to_string()),
        ("checkOutDate", params.check_out.format("%Y-%m-%d").to_string()),
        ("adults", params.adults.to_string()),
        ("radius", params.radius.to_string()),
        ("radiusUnit", params.radius_unit.clone()),
        ("currency", params.currency.clone()),
    ]
}

fn into_list(data: serde_json::Value) -> Vec<serde_json::Value> {
    match data {
        serde_json::Value::Array(items) => items,
        serde_json::Value::Null => Vec::new(),
        other => vec![other],
    }
}

#[async_trait]
impl TravelProvider for AmadeusProvider {
    fn name(&self) -> &'static str {
        "amadeus"
    }

    fn is_configured(&self) -> bool {
        !self.api_key.is_empty() && !self.api_secret.is_empty()
    }

    async fn search_flights(
        &self,
        params: &FlightSearchParams,
    ) -> Result<Vec<serde_json::Value>, ProviderError> {
        tracing::info!(
            origin = %params.origin,
            destination = %params.destination,
            departure_date = %params.departure_date,
            "searching flights"
        );
        self.get(FLIGHT_OFFERS_PATH, &flight_query(params))
            .await
            .map(into_list)
    }

    async fn search_hotels(
        &self,
        params: &HotelSearchParams,
    ) -> Result<Vec<serde_json::Value>, ProviderError> {
        tracing::info!(
            city_code = %params.city_code,
            check_in = %params.check_in,
            check_out = %params.check_out,
            "searching hotels"
        );
        self.get(HOTEL_OFFERS_PATH, &hotel_query(params))
            .await
            .map(into_list)
    }

    async fn hotel_offers(&self, hotel_id: &str) -> Result<serde_json::Value, ProviderError> {
        self.get(HOTEL_OFFERS_BY_HOTEL_PATH, &[("hotelId", hotel_id.to_string())])
            .await
    }
}
