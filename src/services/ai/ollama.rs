use anyhow::Context;
use async_trait::async_trait;
use futures::StreamExt;
use serde_json::json;

use super::{chat_messages, CompletionRequest, LlmProvider, TextStream};

pub struct OllamaProvider {
    url: String,
    model: String,
    client: reqwest::Client,
}

impl OllamaProvider {
    pub fn new(url: String, model: String) -> Self {
        Self {
            url: url.trim_end_matches('/').to_string(),
            model,
            client: reqwest::Client::new(),
        }
    }

    async fn send(
        &self,
        request: &CompletionRequest,
        stream: bool,
    ) -> anyhow::Result<reqwest::Response> {
        let body = json!({
            "model": self.model,
            "messages": chat_messages(request),
            "stream": stream,
            "options": {
                "temperature": request.temperature,
                "num_predict": request.max_tokens,
            },
        });

        let resp = self
            .client
            .post(format!("{}/api/chat", self.url))
            .json(&body)
            .send()
            .await
            .context("failed to call Ollama API")?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("Ollama API error ({}): {}", status, body);
        }
        Ok(resp)
    }
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    fn name(&self) -> &'static str {
        "ollama"
    }

    fn is_configured(&self) -> bool {
        !self.url.is_empty()
    }

    async fn chat(&self, request: &CompletionRequest) -> anyhow::Result<String> {
        let data: serde_json::Value = self
            .send(request, false)
            .await?
            .json()
            .await
            .context("failed to parse Ollama response")?;

        data["message"]["content"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| anyhow::anyhow!("missing content in Ollama response"))
    }

    // Ollama streams newline-delimited JSON objects rather than SSE.
    async fn chat_stream(&self, request: &CompletionRequest) -> anyhow::Result<TextStream> {
        let mut bytes = Box::pin(self.send(request, true).await?.bytes_stream());

        let stream = async_stream::stream! {
            let mut buf: Vec<u8> = Vec::new();
            while let Some(chunk) = bytes.next().await {
                match chunk {
                    Ok(chunk) => buf.extend_from_slice(&chunk),
                    Err(e) => {
                        yield Err(anyhow::anyhow!("Ollama stream interrupted: {e}"));
                        return;
                    }
                }
                while let Some(pos) = buf.iter().position(|b| *b == b'\n') {
                    let line: Vec<u8> = buf.drain(..=pos).collect();
                    match parse_line(&line) {
                        Ok(Some(LineEvent::Delta(delta))) => yield Ok(delta),
                        Ok(Some(LineEvent::Done)) => return,
                        Ok(None) => {}
                        Err(e) => {
                            yield Err(e);
                            return;
                        }
                    }
                }
            }
        };

        Ok(Box::pin(stream))
    }
}

#[derive(Debug, PartialEq)]
enum LineEvent {
    Delta(String),
    Done,
}

fn parse_line(line: &[u8]) -> anyhow::Result<Option<LineEvent>> {
    let line = std::str::from_utf8(line)
        .context("Ollama stream is not valid UTF-8")?
        .trim();
    if line.is_empty() {
        return Ok(None);
    }

    let data: serde_json::Value =
        serde_json::from_str(line).context("failed to parse Ollama stream line")?;
    if let Some(error) = data["error"].as_str() {
        anyhow::bail!("Ollama API error: {error}");
    }

    let content = data["message"]["content"].as_str().unwrap_or("");
    if !content.is_empty() {
        return Ok(Some(LineEvent::Delta(content.to_string())));
    }
    if data["done"].as_bool().unwrap_or(false) {
        return Ok(Some(LineEvent::Done));
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_line_delta() {
        let line = br#"{"message":{"role":"assistant","content":"Bon"},"done":false}"#;
        assert_eq!(
            parse_line(line).unwrap(),
            Some(LineEvent::Delta("Bon".to_string()))
        );
    }

    #[test]
    fn test_parse_line_done() {
        let line = br#"{"message":{"role":"assistant","content":""},"done":true}"#;
        assert_eq!(parse_line(line).unwrap(), Some(LineEvent::Done));
    }

    #[test]
    fn test_parse_line_error() {
        assert!(parse_line(br#"{"error":"model not found"}"#).is_err());
        assert_eq!(parse_line(b"  \n").unwrap(), None);
    }
}
