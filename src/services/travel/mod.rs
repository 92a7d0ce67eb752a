pub mod amadeus;

use async_trait::async_trait;

use crate::models::{FlightSearchParams, HotelSearchParams};

/// Failure reported by the travel-search provider. The text is passed through verbatim.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct ProviderError {
    pub status: Option<u16>,
    pub message: String,
}

impl ProviderError {
    pub fn new(status: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

#[async_trait]
pub trait TravelProvider: Send + Sync {
    fn name(&self) -> &'static str;

    fn is_configured(&self) -> bool;

    async fn search_flights(
        &self,
        params: &FlightSearchParams,
    ) -> Result<Vec<serde_json::Value>, ProviderError>;

    async fn search_hotels(
        &self,
        params: &HotelSearchParams,
    ) -> Result<Vec<serde_json::Value>, ProviderError>;

    async fn hotel_offers(&self, hotel_id: &str) -> Result<serde_json::Value, ProviderError>;
}
