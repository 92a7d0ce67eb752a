use serde::{Deserialize, Serialize};

use super::intent::IntentRecord;

/// Which branch of the chat flow produced a reply.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReplyKind {
    Greeting,
    Help,
    FlightSearchIncomplete,
    FlightSearchResults,
    FlightSearchError,
    HotelSearchIncomplete,
    HotelSearchReady,
    GeneralTravel,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComposedReply {
    #[serde(rename = "type")]
    pub kind: ReplyKind,
    pub message: String,
    pub intent_data: IntentRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_params: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flights: Option<Vec<serde_json::Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hotels: Option<Vec<serde_json::Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing_info: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ComposedReply {
    pub fn new(kind: ReplyKind, message: String, intent_data: IntentRecord) -> Self {
        Self {
            kind,
            message,
            intent_data,
            search_params: None,
            flights: None,
            hotels: None,
            missing_info: None,
            error: None,
        }
    }
}

/// One piece of an incrementally delivered reply.
#[derive(Debug, Clone, PartialEq)]
pub enum ReplyFragment {
    Content(String),
    Done { intent_data: IntentRecord },
    Error(String),
}

impl ReplyFragment {
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            ReplyFragment::Content(content) => serde_json::json!({ "content": content }),
            ReplyFragment::Done { intent_data } => {
                serde_json::json!({ "done": true, "intent_data": intent_data })
            }
            ReplyFragment::Error(error) => serde_json::json!({ "error": error }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Intent;

    #[test]
    fn test_reply_type_tag() {
        let reply = ComposedReply::new(
            ReplyKind::FlightSearchIncomplete,
            "Where from?".to_string(),
            IntentRecord::new(Intent::FlightSearch),
        );
        let json = serde_json::to_value(&reply).unwrap();
        assert_eq!(json["type"], "flight_search_incomplete");
        assert_eq!(json["intent_data"]["intent"], "flight_search");
        assert!(json.get("flights").is_none());
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_fragment_shapes() {
        assert_eq!(
            ReplyFragment::Content("Hi".into()).to_json(),
            serde_json::json!({"content": "Hi"})
        );
        let done = ReplyFragment::Done {
            intent_data: IntentRecord::new(Intent::Greeting),
        }
        .to_json();
        assert_eq!(done["done"], true);
        assert_eq!(done["intent_data"]["intent"], "greeting");
        assert_eq!(
            ReplyFragment::Error("oops".into()).to_json(),
            serde_json::json!({"error": "oops"})
        );
    }
}
