use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::intent::{Intent, IntentRecord};

pub const DEFAULT_CURRENCY: &str = "USD";
pub const DEFAULT_RADIUS: u32 = 5;
pub const DEFAULT_RADIUS_UNIT: &str = "KM";

/// Validated flight search parameters. Every field the provider requires is present.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FlightSearchParams {
    pub origin: String,
    pub destination: String,
    pub departure_date: NaiveDate,
    pub adults: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_date: Option<NaiveDate>,
    pub currency: String,
}

impl FlightSearchParams {
    pub fn new(origin: String, destination: String, departure_date: NaiveDate) -> Self {
        Self {
            origin,
            destination,
            departure_date,
            adults: 1,
            return_date: None,
            currency: DEFAULT_CURRENCY.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HotelSearchParams {
    pub city_code: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub adults: u32,
    pub radius: u32,
    pub radius_unit: String,
    pub currency: String,
}

impl HotelSearchParams {
    pub fn new(city_code: String, check_in: NaiveDate, check_out: NaiveDate) -> Self {
        Self {
            city_code,
            check_in,
            check_out,
            adults: 1,
            radius: DEFAULT_RADIUS,
            radius_unit: DEFAULT_RADIUS_UNIT.to_string(),
            currency: DEFAULT_CURRENCY.to_string(),
        }
    }
}

impl From<&FlightSearchParams> for IntentRecord {
    fn from(params: &FlightSearchParams) -> Self {
        IntentRecord {
            origin: Some(params.origin.clone()),
            destination: Some(params.destination.clone()),
            departure_date: Some(params.departure_date),
            return_date: params.return_date,
            adults: params.adults,
            confidence: 1.0,
            ..IntentRecord::new(Intent::FlightSearch)
        }
    }
}

impl From<&HotelSearchParams> for IntentRecord {
    fn from(params: &HotelSearchParams) -> Self {
        IntentRecord {
            destination: Some(params.city_code.clone()),
            check_in: Some(params.check_in),
            check_out: Some(params.check_out),
            adults: params.adults,
            confidence: 1.0,
            ..IntentRecord::new(Intent::HotelSearch)
        }
    }
}

// ── Request bodies of the dedicated search endpoints ──

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightSearchRequest {
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub departure_date: Option<String>,
    pub adults: Option<u32>,
    pub return_date: Option<String>,
    pub currency: Option<String>,
    #[serde(rename = "user_message")]
    pub user_message: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelSearchRequest {
    pub city_code: Option<String>,
    pub check_in: Option<String>,
    pub check_out: Option<String>,
    pub adults: Option<u32>,
    pub radius: Option<u32>,
    pub radius_unit: Option<String>,
    pub currency: Option<String>,
    #[serde(rename = "user_message")]
    pub user_message: Option<String>,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn missing_fields_error(fields: &[(&str, Option<&str>)]) -> String {
    let missing: Vec<&str> = fields
        .iter()
        .filter(|(_, value)| value.is_none())
        .map(|(name, _)| *name)
        .collect();
    format!("Missing required fields: {}", missing.join(", "))
}

fn parse_date(field: &str, value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| format!("Invalid date for {field}: expected YYYY-MM-DD"))
}

impl FlightSearchRequest {
    /// Validates the body, returning the message to report with a 400 on failure.
    pub fn into_params(self) -> Result<FlightSearchParams, String> {
        let (Some(origin), Some(destination), Some(departure)) = (
            present(&self.origin),
            present(&self.destination),
            present(&self.departure_date),
        ) else {
            return Err(missing_fields_error(&[
                ("origin", present(&self.origin)),
                ("destination", present(&self.destination)),
                ("departureDate", present(&self.departure_date)),
            ]));
        };

        let mut params = FlightSearchParams::new(
            origin.to_string(),
            destination.to_string(),
            parse_date("departureDate", departure)?,
        );
        params.adults = self.adults.unwrap_or(1).max(1);
        params.return_date = present(&self.return_date)
            .map(|d| parse_date("returnDate", d))
            .transpose()?;
        if let Some(currency) = present(&self.currency) {
            params.currency = currency.to_string();
        }
        Ok(params)
    }
}

impl HotelSearchRequest {
    pub fn into_params(self) -> Result<HotelSearchParams, String> {
        let (Some(city_code), Some(check_in), Some(check_out)) = (
            present(&self.city_code),
            present(&self.check_in),
            present(&self.check_out),
        ) else {
            return Err(missing_fields_error(&[
                ("cityCode", present(&self.city_code)),
                ("checkIn", present(&self.check_in)),
                ("checkOut", present(&self.check_out)),
            ]));
        };

        let mut params = HotelSearchParams::new(
            city_code.to_string(),
            parse_date("checkIn", check_in)?,
            parse_date("checkOut", check_out)?,
        );
        params.adults = self.adults.unwrap_or(1).max(1);
        if let Some(radius) = self.radius {
            params.radius = radius;
        }
        if let Some(unit) = present(&self.radius_unit) {
            params.radius_unit = unit.to_string();
        }
        if let Some(currency) = present(&self.currency) {
            params.currency = currency.to_string();
        }
        Ok(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flight_request_defaults() {
        let req: FlightSearchRequest = serde_json::from_str(
            r#"{"origin":"JFK","destination":"LAX","departureDate":"2024-06-02"}"#,
        )
        .unwrap();
        let params = req.into_params().unwrap();
        assert_eq!(params.adults, 1);
        assert_eq!(params.currency, "USD");
        assert!(params.return_date.is_none());
    }

    #[test]
    fn test_flight_request_missing_fields_in_order() {
        let req: FlightSearchRequest =
            serde_json::from_str(r#"{"destination":"  "}"#).unwrap();
        let err = req.into_params().unwrap_err();
        assert_eq!(
            err,
            "Missing required fields: origin, destination, departureDate"
        );
    }

    #[test]
    fn test_flight_request_bad_date() {
        let req: FlightSearchRequest = serde_json::from_str(
            r#"{"origin":"JFK","destination":"LAX","departureDate":"tomorrow"}"#,
        )
        .unwrap();
        assert!(req.into_params().unwrap_err().contains("departureDate"));
    }

    #[test]
    fn test_hotel_request_overrides() {
        let req: HotelSearchRequest = serde_json::from_str(
            r#"{"cityCode":"PAR","checkIn":"2024-07-01","checkOut":"2024-07-04","adults":2,"radius":10,"radiusUnit":"MILE","currency":"EUR","user_message":"cheap please"}"#,
        )
        .unwrap();
        assert_eq!(req.user_message.as_deref(), Some("cheap please"));
        let params = req.into_params().unwrap();
        assert_eq!(params.adults, 2);
        assert_eq!(params.radius, 10);
        assert_eq!(params.radius_unit, "MILE");
        assert_eq!(params.currency, "EUR");
    }

    #[test]
    fn test_params_serialize_camel_case() {
        let params = HotelSearchParams::new(
            "NYC".to_string(),
            NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 7, 3).unwrap(),
        );
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json["cityCode"], "NYC");
        assert_eq!(json["checkIn"], "2024-07-01");
        assert_eq!(json["radiusUnit"], "KM");
    }
}
