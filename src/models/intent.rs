use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    FlightSearch,
    HotelSearch,
    GeneralTravel,
    Greeting,
    Help,
}

/// Structured travel parameters extracted from a free-form message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IntentRecord {
    pub intent: Intent,
    #[serde(default)]
    pub origin: Option<String>,
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub departure_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub return_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub check_in: Option<NaiveDate>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub check_out: Option<NaiveDate>,
    #[serde(default = "default_adults", deserialize_with = "lenient_adults")]
    pub adults: u32,
    #[serde(default, deserialize_with = "null_confidence")]
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub missing_info: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

fn default_adults() -> u32 {
    1
}

// Models tend to emit `null` or `""` instead of omitting a field.
#[derive(Deserialize)]
#[serde(untagged)]
enum Count {
    Whole(u64),
    Fractional(f64),
    Text(String),
    Other(serde::de::IgnoredAny),
}

impl Count {
    fn value(self) -> Option<u32> {
        let n = match self {
            Count::Whole(n) => return Some(u32::try_from(n).unwrap_or(u32::MAX)),
            Count::Fractional(f) => f,
            Count::Text(s) => s.trim().parse::<f64>().ok()?,
            Count::Other(_) => return None,
        };
        (n.is_finite() && n >= 0.0).then(|| n.round().min(u32::MAX as f64) as u32)
    }
}

// A malformed count falls back to one traveller instead of failing the record.
fn lenient_adults<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
    Ok(Option::<Count>::deserialize(d)?
        .and_then(Count::value)
        .unwrap_or_else(default_adults))
}

fn null_confidence<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(d)?.unwrap_or(0.0))
}

fn blank_as_none<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDate>, D::Error> {
    match Option::<String>::deserialize(d)? {
        Some(s) if !s.trim().is_empty() => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(Some)
            .map_err(serde::de::Error::custom),
        _ => Ok(None),
    }
}

impl IntentRecord {
    pub fn new(intent: Intent) -> Self {
        Self {
            intent,
            origin: None,
            destination: None,
            departure_date: None,
            return_date: None,
            check_in: None,
            check_out: None,
            adults: default_adults(),
            confidence: 0.0,
            missing_info: None,
            error: None,
        }
    }

    /// Record used when extraction fails: general intent, zero confidence.
    pub fn degraded(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::new(Intent::GeneralTravel)
        }
    }

    /// Clamp model-provided numbers into their valid ranges.
    pub fn normalized(mut self) -> Self {
        self.adults = self.adults.max(1);
        self.confidence = if self.confidence.is_nan() {
            0.0
        } else {
            self.confidence.clamp(0.0, 1.0)
        };
        self
    }
}
