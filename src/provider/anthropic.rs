use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

use super::{drain_sse_lines, GenerationRequest, TextGenerator};

pub struct AnthropicStream {
    api_base: String,
    api_version: String,
    client: Client,
    timeout_secs: u64,
    debug: bool,
}

impl AnthropicStream {
    pub fn new(api_base: String, api_version: String, timeout_secs: u64, debug: bool) -> Self {
        Self { api_base, api_version, client: Client::new(), timeout_secs, debug }
    }
}

#[async_trait]
impl TextGenerator for AnthropicStream {
    async fn stream_text(
        &self,
        req: &GenerationRequest,
        on_fragment: &mut (dyn for<'a> FnMut(&'a str) -> bool + Send),
    ) -> Result<()> {
        let api_key = std::env::var("ANTHROPIC_API_KEY")
            .map_err(|_| anyhow!("ANTHROPIC_API_KEY env var is not set"))?;

        let url = format!("{}/v1/messages", self.api_base.trim_end_matches('/'));
        let body = json!({
            "model": req.model,
            "max_tokens": req.max_output_tokens,
            "messages": [{ "role": "user", "content": req.prompt }],
            "stream": true,
        });

        if self.debug {
            eprintln!("debug[anthropic]: POST {} (model {})", url, req.model);
        }

        let resp = self
            .client
            .post(&url)
            .header("x-api-key", &api_key)
            .header("anthropic-version", &self.api_version)
            .timeout(Duration::from_secs(self.timeout_secs))
            .json(&body)
            .send()
            .await
            .context("anthropic request failed")?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(anyhow!("Anthropic API error ({}): {}", status, text));
        }

        let mut stream = resp.bytes_stream();
        let mut buffer = String::new();
        while let Some(chunk) = stream.next().await {
            let bytes = chunk.context("anthropic stream read failed")?;
            buffer.push_str(&String::from_utf8_lossy(&bytes));

            for payload in drain_sse_lines(&mut buffer) {
                let value: Value = serde_json::from_str(&payload)
                    .map_err(|e| anyhow!("anthropic event parse error: {e}"))?;
                match value.get("type").and_then(Value::as_str) {
                    Some("content_block_delta") => {
                        if let Some(text) =
                            value.pointer("/delta/text").and_then(Value::as_str)
                        {
                            if !text.is_empty() && !on_fragment(text) {
                                return Ok(());
                            }
                        }
                    }
                    Some("error") => {
                        return Err(anyhow!(
                            "anthropic stream error: {}",
                            value.pointer("/error/message").and_then(Value::as_str).unwrap_or("unknown")
                        ));
                    }
                    Some("message_stop") => return Ok(()),
                    _ => {}
                }
            }
        }

        Ok(())
    }
}
