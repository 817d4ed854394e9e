use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

use super::{drain_sse_lines, GenerationRequest, TextGenerator};

/// Streams chat completions over SSE and forwards each content delta as a
/// fragment.
pub struct OpenAIStream {
    api_base: String,
    client: Client,
    timeout_secs: u64,
    debug: bool,
}

impl OpenAIStream {
    pub fn new(api_base: String, timeout_secs: u64, debug: bool) -> Self {
        Self { api_base, client: Client::new(), timeout_secs, debug }
    }
}

#[async_trait]
impl TextGenerator for OpenAIStream {
    async fn stream_text(
        &self,
        req: &GenerationRequest,
        on_fragment: &mut (dyn for<'a> FnMut(&'a str) -> bool + Send),
    ) -> Result<()> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| anyhow!("OPENAI_API_KEY env var is not set"))?;

        let url = format!("{}/v1/chat/completions", self.api_base.trim_end_matches('/'));
        let body = json!({
            "model": req.model,
            "messages": [{ "role": "user", "content": req.prompt }],
            "max_tokens": req.max_output_tokens,
            "stream": true,
        });

        if self.debug {
            eprintln!("debug[openai]: POST {} (model {})", url, req.model);
        }

        let resp = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .timeout(Duration::from_secs(self.timeout_secs))
            .json(&body)
            .send()
            .await
            .context("openai request failed")?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(anyhow!("OpenAI API error ({}): {}", status, text));
        }

        let mut stream = resp.bytes_stream();
        let mut buffer = String::new();
        while let Some(chunk) = stream.next().await {
            let bytes = chunk.context("openai stream read failed")?;
            buffer.push_str(&String::from_utf8_lossy(&bytes));

            for payload in drain_sse_lines(&mut buffer) {
                if payload == "[DONE]" {
                    return Ok(());
                }
                let value: Value = serde_json::from_str(&payload)
                    .map_err(|e| anyhow!("openai event parse error: {e}"))?;
                if let Some(delta) = value
                    .pointer("/choices/0/delta/content")
                    .and_then(Value::as_str)
                {
                    if !delta.is_empty() && !on_fragment(delta) {
                        return Ok(());
                    }
                }
            }
        }

        Ok(())
    }
}
