use chrono::NaiveDate;

use crate::models::IntentRecord;
use crate::services::ai::{CompletionRequest, LlmProvider, Message};

const SYSTEM_PROMPT: &str = r#"You are an intent extraction engine for a travel booking assistant. Analyze the user's message and extract travel search parameters.

Return ONLY a single valid JSON object (no markdown, no explanation, no surrounding text) with this exact structure:
{
  "intent": "flight_search|hotel_search|general_travel|greeting|help",
  "origin": "departure city or IATA airport code, or null",
  "destination": "destination city or IATA code, or null",
  "departure_date": "YYYY-MM-DD or null",
  "return_date": "YYYY-MM-DD or null",
  "check_in": "YYYY-MM-DD or null",
  "check_out": "YYYY-MM-DD or null",
  "adults": 1,
  "confidence": 0.0
}

Intent rules:
- "flight_search": the user wants to find or book a flight
- "hotel_search": the user wants to find or book a hotel or accommodation
- "greeting": the user says hello or similar
- "help": the user asks what you can do
- "general_travel": any other travel question

Date rules:
- All dates use the format YYYY-MM-DD
- Resolve relative dates ("tomorrow", "next friday", "in two weeks") against the current date given below
- Use null for anything the user did not mention; never invent values

Prefer IATA codes (e.g. JFK, LAX, PAR) for origin and destination when the city is unambiguous.
"confidence" is a number between 0 and 1 describing how sure you are about the intent.
"#;

const TEMPERATURE: f64 = 0.1;
const MAX_TOKENS: u32 = 500;

/// Outcome of intent extraction. Extraction never fails the chat turn:
/// a failed call or unreadable output yields a `Degraded` general record.
#[derive(Debug, Clone)]
pub enum Extraction {
    Parsed(IntentRecord),
    Degraded { record: IntentRecord, error: String },
}

impl Extraction {
    fn degraded(error: String) -> Self {
        Extraction::Degraded {
            record: IntentRecord::degraded(error.clone()),
            error,
        }
    }

    pub fn record(&self) -> &IntentRecord {
        match self {
            Extraction::Parsed(record) => record,
            Extraction::Degraded { record, .. } => record,
        }
    }

    pub fn into_record(self) -> IntentRecord {
        match self {
            Extraction::Parsed(record) => record,
            Extraction::Degraded { record, .. } => record,
        }
    }
}

pub fn build_request(user_text: &str, today: NaiveDate) -> CompletionRequest {
    CompletionRequest {
        system: format!(
            "{SYSTEM_PROMPT}\nCurrent date: {}",
            today.format("%Y-%m-%d")
        ),
        messages: vec![Message::user(user_text)],
        temperature: TEMPERATURE,
        max_tokens: MAX_TOKENS,
    }
}

pub async fn extract_intent(llm: &dyn LlmProvider, user_text: &str, today: NaiveDate) -> Extraction {
    let response = match llm.chat(&build_request(user_text, today)).await {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!(error = %e, "intent extraction call failed, degrading to general intent");
            return Extraction::degraded(format!("intent extraction failed: {e}"));
        }
    };

    match parse_intent_response(&response) {
        Ok(record) => Extraction::Parsed(record),
        Err(e) => {
            tracing::warn!(error = %e, "failed to parse LLM response as intent JSON, degrading");
            Extraction::degraded(format!("could not parse intent: {e}"))
        }
    }
}

fn parse_intent_response(response: &str) -> Result<IntentRecord, serde_json::Error> {
    let cleaned = strip_code_fence(response);

    let first_err = match serde_json::from_str::<IntentRecord>(cleaned) {
        Ok(record) => return Ok(record.normalized()),
        Err(e) => e,
    };

    // Some models still wrap the object in prose.
    if let (Some(start), Some(end)) = (cleaned.find('{'), cleaned.rfind('}')) {
        if start < end {
            if let Ok(record) = serde_json::from_str::<IntentRecord>(&cleaned[start..=end]) {
                return Ok(record.normalized());
            }
        }
    }

    Err(first_err)
}

fn strip_code_fence(response: &str) -> &str {
    let trimmed = response.trim();
    let cleaned = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    cleaned.strip_suffix("```").unwrap_or(cleaned).trim()
}
