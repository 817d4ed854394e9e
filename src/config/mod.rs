use serde::{Deserialize, Serialize};

use crate::cli::ProviderKind;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub provider: ProviderKind,
    pub model: String,
    pub max_output_tokens: u32,
    pub timeout_secs: u64,
    pub openai_base: String,
    pub anthropic_base: String,
    pub anthropic_version: String,
    /// SQLite database for project and deployment records.
    pub db_path: String,
    /// Root directory backing the local blob store.
    pub storage_root: String,
    /// Prefix prepended to blob paths to form public URLs.
    pub public_base: String,
    /// Host page the preview pane renders into.
    pub preview_path: String,
    pub deploy_delay_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider: ProviderKind::OpenAI,
            model: "gpt-4o-mini".into(),
            max_output_tokens: 4000,
            timeout_secs: 2400,
            openai_base: "https://api.openai.com".into(),
            anthropic_base: "https://api.anthropic.com".into(),
            anthropic_version: "2023-06-01".into(),
            db_path: ".sitesmith/projects.db".into(),
            storage_root: ".sitesmith/storage".into(),
            public_base: "https://storage.sitesmith.app".into(),
            preview_path: ".sitesmith/preview.html".into(),
            deploy_delay_ms: 3000,
        }
    }
}
