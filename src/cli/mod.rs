use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    OpenAI,
    Anthropic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DeviceArg {
    Mobile,
    Tablet,
    Desktop,
}

#[derive(Parser, Debug)]
#[command(name = "sitesmith", version)]
pub struct Args {
    /// What to build, e.g. "Create a bakery site".
    #[arg(long)]
    pub task: Option<String>,

    /// Resume an existing project instead of creating one.
    #[arg(long)]
    pub project: Option<String>,

    /// List the current user's projects and exit.
    #[arg(long, default_value_t = false)]
    pub list: bool,

    /// Files to attach to the request (screenshots, archives, code).
    #[arg(long = "attach")]
    pub attachments: Vec<String>,

    /// Website URL to clone instead of a free-text task.
    #[arg(long)]
    pub clone_url: Option<String>,

    /// Template name to frame the request with.
    #[arg(long)]
    pub template_name: Option<String>,

    /// Template description, used alongside --template-name.
    #[arg(long)]
    pub template_description: Option<String>,

    /// Deploy after a successful generation (netlify, vercel, github-pages, surge).
    #[arg(long)]
    pub deploy: Option<String>,

    /// Directory to export the generated document into.
    #[arg(long)]
    pub export: Option<String>,

    /// Preview viewport to emulate.
    #[arg(long)]
    pub device: Option<DeviceArg>,

    #[arg(long)]
    pub provider: Option<ProviderKind>,

    #[arg(long)]
    pub model: Option<String>,

    #[arg(long)]
    pub user: Option<String>,

    #[arg(long)]
    pub db: Option<String>,

    #[arg(long)]
    pub storage_root: Option<String>,

    #[arg(long, default_value_t = 2400)]
    pub timeout_secs: u64,

    #[arg(long, default_value_t = false)]
    pub yes: bool,

    #[arg(long, default_value_t = false)]
    pub debug: bool,
}
