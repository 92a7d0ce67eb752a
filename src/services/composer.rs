use std::pin::Pin;

use futures::{Stream, StreamExt};

use crate::models::{IntentRecord, ReplyFragment};
use crate::services::ai::{CompletionRequest, LlmProvider, Message};

const SYSTEM_PROMPT: &str = r#"You are a friendly, concise travel assistant helping users find flights and hotels.

Guidelines:
- Keep replies short and conversational
- When API data is provided, summarize the most relevant options naturally (prices, times, carriers, hotel names)
- When information is missing, ask for it politely and specifically
- When a search failed, apologize briefly and offer alternatives (other dates, nearby airports, different cities)
- Never invent prices or availability that are not in the API data
"#;

const TEMPERATURE: f64 = 0.7;
const MAX_TOKENS: u32 = 500;

/// Provider records forwarded into the prompt, bounding prompt size.
pub const MAX_SAMPLE: usize = 3;

pub const APOLOGY: &str =
    "I'm sorry, I'm having trouble responding right now. Please try again in a moment.";

pub type FragmentStream = Pin<Box<dyn Stream<Item = ReplyFragment> + Send>>;

#[derive(Debug, Clone)]
pub struct ComposeContext {
    pub user_text: String,
    pub intent: IntentRecord,
    pub sample: Option<Vec<serde_json::Value>>,
    pub error: Option<String>,
}

impl ComposeContext {
    pub fn new(user_text: impl Into<String>, intent: IntentRecord) -> Self {
        Self {
            user_text: user_text.into(),
            intent,
            sample: None,
            error: None,
        }
    }

    /// Attach provider results; only the first few are kept.
    pub fn with_results(mut self, results: &[serde_json::Value]) -> Self {
        self.sample = Some(results.iter().take(MAX_SAMPLE).cloned().collect());
        self
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    fn render(&self) -> String {
        let intent = serde_json::to_string_pretty(&self.intent).unwrap_or_default();
        let mut context = format!(
            "User message: {}\n\nExtracted intent:\n{}",
            self.user_text, intent
        );

        if let Some(sample) = &self.sample {
            let data = serde_json::to_string_pretty(sample).unwrap_or_default();
            context.push_str(&format!(
                "\n\nAPI data (first {} results):\n{}",
                sample.len(),
                data
            ));
        }

        if let Some(error) = &self.error {
            context.push_str(&format!("\n\nThe search failed with this error: {error}"));
        }

        context
    }

    fn request(&self) -> CompletionRequest {
        CompletionRequest {
            system: SYSTEM_PROMPT.to_string(),
            messages: vec![Message::user(self.render())],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        }
    }
}

/// Single-shot reply. Provider failures become a generic apology.
pub async fn compose(llm: &dyn LlmProvider, ctx: &ComposeContext) -> String {
    match llm.chat(&ctx.request()).await {
        Ok(text) => text.trim().to_string(),
        Err(e) => {
            tracing::error!(error = %e, "response composition failed");
            APOLOGY.to_string()
        }
    }
}

/// Incremental reply: content fragments, then `Done` carrying the intent record.
/// A provider failure yields a single `Error` fragment and ends the stream.
pub async fn compose_stream(llm: &dyn LlmProvider, ctx: ComposeContext) -> FragmentStream {
    let upstream = match llm.chat_stream(&ctx.request()).await {
        Ok(upstream) => upstream,
        Err(e) => {
            tracing::error!(error = %e, "failed to start response stream");
            return Box::pin(futures::stream::once(async {
                ReplyFragment::Error(APOLOGY.to_string())
            }));
        }
    };

    let intent_data = ctx.intent;
    let stream = async_stream::stream! {
        let mut upstream = upstream;
        while let Some(delta) = upstream.next().await {
            match delta {
                Ok(delta) => yield ReplyFragment::Content(delta),
                Err(e) => {
                    tracing::error!(error = %e, "response stream failed");
                    yield ReplyFragment::Error(APOLOGY.to_string());
                    return;
                }
            }
        }
        yield ReplyFragment::Done { intent_data };
    };

    Box::pin(stream)
}
