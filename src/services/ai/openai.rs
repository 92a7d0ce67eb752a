use anyhow::Context;
use async_trait::async_trait;
use eventsource_stream::Eventsource;
use futures::StreamExt;
use serde_json::json;

use super::{chat_messages, CompletionRequest, LlmProvider, TextStream};

/// Any OpenAI-compatible `/chat/completions` endpoint (OpenAI, Groq, ...).
pub struct OpenAiProvider {
    api_key: String,
    base_url: String,
    model: String,
    client: reqwest::Client,
}

impl OpenAiProvider {
    pub fn new(api_key: String, base_url: String, model: String) -> Self {
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            client: reqwest::Client::new(),
        }
    }

    fn request_body(&self, request: &CompletionRequest, stream: bool) -> serde_json::Value {
        json!({
            "model": self.model,
            "messages": chat_messages(request),
            "temperature": request.temperature,
            "max_tokens": request.max_tokens,
            "stream": stream,
        })
    }

    async fn send(
        &self,
        request: &CompletionRequest,
        stream: bool,
    ) -> anyhow::Result<reqwest::Response> {
        let resp = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&self.request_body(request, stream))
            .send()
            .await
            .context("failed to call completion API")?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("completion API error ({}): {}", status, body);
        }
        Ok(resp)
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }

    async fn chat(&self, request: &CompletionRequest) -> anyhow::Result<String> {
        let data: serde_json::Value = self
            .send(request, false)
            .await?
            .json()
            .await
            .context("failed to parse completion response")?;

        data["choices"][0]["message"]["content"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| anyhow::anyhow!("missing content in completion response"))
    }

    async fn chat_stream(&self, request: &CompletionRequest) -> anyhow::Result<TextStream> {
        let mut events = Box::pin(self.send(request, true).await?.bytes_stream().eventsource());

        let stream = async_stream::stream! {
            while let Some(event) = events.next().await {
                let event = match event {
                    Ok(event) => event,
                    Err(e) => {
                        yield Err(anyhow::anyhow!("completion stream interrupted: {e}"));
                        return;
                    }
                };
                let data = event.data.trim();
                if data == "[DONE]" {
                    return;
                }
                if data.is_empty() {
                    continue;
                }
                match parse_delta(data) {
                    Ok(Some(delta)) => yield Ok(delta),
                    Ok(None) => {}
                    Err(e) => {
                        yield Err(e);
                        return;
                    }
                }
            }
        };

        Ok(Box::pin(stream))
    }
}

/// Content delta of one streamed chunk; `None` for role-only or finish chunks.
fn parse_delta(data: &str) -> anyhow::Result<Option<String>> {
    let chunk: serde_json::Value =
        serde_json::from_str(data).context("failed to parse completion stream chunk")?;
    Ok(chunk["choices"][0]["delta"]["content"]
        .as_str()
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string()))
}
