use anyhow::Result;
use async_trait::async_trait;

use crate::cli::ProviderKind;
use crate::config::Config;

pub mod anthropic;
pub mod openai;

#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub prompt: String,
    pub model: String,
    pub max_output_tokens: u32,
}

/// Text-generation collaborator. Implementations deliver zero or more
/// fragments, strictly in order, then return; any transport or service
/// error surfaces as Err after the fragments delivered so far. The callback
/// returns `false` to abort the stream early (cancellation), in which case
/// the implementation stops delivering and returns Ok.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn stream_text(
        &self,
        req: &GenerationRequest,
        on_fragment: &mut (dyn for<'a> FnMut(&'a str) -> bool + Send),
    ) -> Result<()>;
}

pub type DynGenerator = Box<dyn TextGenerator + Send + Sync>;

pub fn make_generator(kind: ProviderKind, cfg: &Config, debug: bool) -> Result<DynGenerator> {
    match kind {
        ProviderKind::OpenAI => Ok(Box::new(openai::OpenAIStream::new(
            cfg.openai_base.clone(),
            cfg.timeout_secs,
            debug,
        ))),
        ProviderKind::Anthropic => Ok(Box::new(anthropic::AnthropicStream::new(
            cfg.anthropic_base.clone(),
            cfg.anthropic_version.clone(),
            cfg.timeout_secs,
            debug,
        ))),
    }
}

/// Splits an SSE byte buffer into complete `data:` payload lines, leaving
/// any trailing partial line in the buffer.
pub(crate) fn drain_sse_lines(buffer: &mut String) -> Vec<String> {
    let mut out = Vec::new();
    while let Some(idx) = buffer.find('\n') {
        let line: String = buffer.drain(..=idx).collect();
        let line = line.trim_end();
        if let Some(payload) = line.strip_prefix("data:") {
            let payload = payload.trim();
            if !payload.is_empty() {
                out.push(payload.to_string());
            }
        }
    }
    out
}
