use crate::models::{ComposedReply, Intent, IntentRecord, ReplyKind};
use crate::services::ai::intent::{extract_intent, Extraction};
use crate::services::completeness::{self, Readiness};
use crate::services::composer::{self, ComposeContext, FragmentStream};
use crate::services::search::{self, SearchFailure};
use crate::state::AppState;

/// Everything decided for one chat turn before the reply is composed.
struct Turn {
    kind: ReplyKind,
    ctx: ComposeContext,
    search_params: Option<serde_json::Value>,
    flights: Option<Vec<serde_json::Value>>,
    error: Option<String>,
}

async fn extract(state: &AppState, message: &str) -> IntentRecord {
    let extraction = extract_intent(state.llm.as_ref(), message, state.clock.today()).await;
    if let Extraction::Degraded { error, .. } = &extraction {
        tracing::warn!(error = %error, "continuing with degraded intent");
    }
    extraction.into_record()
}

// Extracting -> Checking -> (Searching). Failures only change the compose context.
async fn prepare(state: &AppState, message: &str) -> Turn {
    let mut record = extract(state, message).await;
    let readiness = completeness::evaluate(&record);

    tracing::info!(
        intent = ?record.intent,
        confidence = record.confidence,
        ready = !matches!(readiness, Readiness::Incomplete { .. }),
        "processing chat message"
    );

    if let Readiness::Incomplete { missing } = &readiness {
        record.missing_info = Some(missing.clone());
    }

    let mut turn = Turn {
        kind: ReplyKind::GeneralTravel,
        ctx: ComposeContext::new(message, record.clone()),
        search_params: None,
        flights: None,
        error: None,
    };

    match (record.intent, readiness) {
        (Intent::FlightSearch, Readiness::Flight(params)) => {
            turn.search_params = serde_json::to_value(&params).ok();
            match state.travel.search_flights(&params).await {
                Ok(flights) => {
                    turn.kind = ReplyKind::FlightSearchResults;
                    turn.ctx = turn.ctx.with_results(&flights);
                    turn.flights = Some(flights);
                }
                Err(e) => {
                    tracing::warn!(error = %e, "flight search failed during chat");
                    turn.kind = ReplyKind::FlightSearchError;
                    turn.ctx = turn.ctx.with_error(e.to_string());
                    turn.error = Some(e.to_string());
                }
            }
        }
        (Intent::HotelSearch, Readiness::Hotel(params)) => {
            turn.kind = ReplyKind::HotelSearchReady;
            turn.search_params = serde_json::to_value(&params).ok();
        }
        (Intent::FlightSearch, _) => turn.kind = ReplyKind::FlightSearchIncomplete,
        (Intent::HotelSearch, _) => turn.kind = ReplyKind::HotelSearchIncomplete,
        (Intent::Greeting, _) => turn.kind = ReplyKind::Greeting,
        (Intent::Help, _) => turn.kind = ReplyKind::Help,
        (Intent::GeneralTravel, _) => turn.kind = ReplyKind::GeneralTravel,
    }

    turn
}

pub async fn process_message(state: &AppState, message: &str) -> ComposedReply {
    let turn = prepare(state, message).await;
    let text = composer::compose(state.llm.as_ref(), &turn.ctx).await;

    let missing_info = turn.ctx.intent.missing_info.clone();
    let mut reply = ComposedReply::new(turn.kind, text, turn.ctx.intent);
    reply.search_params = turn.search_params;
    reply.flights = turn.flights;
    reply.missing_info = missing_info;
    reply.error = turn.error;
    reply
}

pub async fn stream_message(state: &AppState, message: &str) -> FragmentStream {
    let turn = prepare(state, message).await;
    composer::compose_stream(state.llm.as_ref(), turn.ctx).await
}

/// Free-text search: run the dedicated search when the message carries
/// enough detail, otherwise return the analysis.
pub async fn ai_search(state: &AppState, message: &str) -> Result<serde_json::Value, SearchFailure> {
    let record = extract(state, message).await;

    let (kind, outcome) = match completeness::evaluate(&record) {
        Readiness::Flight(params) => (
            "flight_search",
            search::flight_search(state, &params, Some(message)).await?,
        ),
        Readiness::Hotel(params) => (
            "hotel_search",
            search::hotel_search(state, &params, Some(message)).await?,
        ),
        readiness => {
            let mut record = record;
            if let Readiness::Incomplete { missing } = readiness {
                record.missing_info = Some(missing);
            }
            let ctx = ComposeContext::new(message, record.clone());
            let ai_response = composer::compose(state.llm.as_ref(), &ctx).await;
            return Ok(serde_json::json!({
                "type": "analysis",
                "intent_data": record,
                "ai_response": ai_response,
                "can_search": false,
            }));
        }
    };

    let mut body = serde_json::to_value(&outcome).unwrap_or_default();
    body["type"] = serde_json::json!(kind);
    body["intent_data"] = serde_json::to_value(&record).unwrap_or_default();
    Ok(body)
}
