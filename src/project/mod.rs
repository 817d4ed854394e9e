use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::SmithError;

/// ========================================
/// Durable records and the status lifecycle
/// ========================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Draft,
    Generating,
    Completed,
    Deployed,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Draft => "draft",
            Status::Generating => "generating",
            Status::Completed => "completed",
            Status::Deployed => "deployed",
        }
    }

    pub fn parse(s: &str) -> Option<Status> {
        match s {
            "draft" => Some(Status::Draft),
            "generating" => Some(Status::Generating),
            "completed" => Some(Status::Completed),
            "deployed" => Some(Status::Deployed),
            _ => None,
        }
    }

    /// Legal transitions. A fresh generation request may leave any
    /// non-generating state, including `deployed` (the stale deployment
    /// reference is retained until the next successful deploy).
    pub fn can_transition(self, next: Status) -> bool {
        matches!(
            (self, next),
            (Status::Draft, Status::Generating)
                | (Status::Completed, Status::Generating)
                | (Status::Deployed, Status::Generating)
                | (Status::Generating, Status::Completed)
                | (Status::Generating, Status::Draft)
                | (Status::Completed, Status::Deployed)
                | (Status::Deployed, Status::Deployed)
        )
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub description: String,
    pub prompt: String,
    pub generated_code: String,
    pub preview_url: Option<String>,
    pub deployment_url: Option<String>,
    pub template_id: Option<String>,
    pub status: Status,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// A project is created on first build intent. The name is derived from
    /// the prompt when one is given.
    pub fn new(user_id: &str, prompt: &str, template_id: Option<&str>) -> Self {
        let now = Utc::now();
        let name = if prompt.is_empty() {
            "New Website".to_string()
        } else if prompt.chars().count() > 50 {
            let head: String = prompt.chars().take(50).collect();
            format!("{head}...")
        } else {
            prompt.to_string()
        };
        Self {
            id: format!("proj_{}", now.timestamp_millis()),
            user_id: user_id.to_string(),
            name,
            description: prompt.to_string(),
            prompt: prompt.to_string(),
            generated_code: String::new(),
            preview_url: None,
            deployment_url: None,
            template_id: template_id.map(str::to_string),
            status: Status::Draft,
            created_at: now,
            updated_at: now,
        }
    }

    fn transition(&mut self, next: Status) -> Result<(), SmithError> {
        if !self.status.can_transition(next) {
            return Err(SmithError::Transition(self.status, next));
        }
        self.status = next;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Submission of a generation request: the new prompt and template
    /// reference are recorded at this point.
    pub fn begin_generation(
        &mut self,
        prompt: &str,
        template_id: Option<&str>,
    ) -> Result<(), SmithError> {
        self.transition(Status::Generating)?;
        self.prompt = prompt.to_string();
        self.template_id = template_id.map(str::to_string);
        Ok(())
    }

    pub fn complete_generation(
        &mut self,
        generated_code: String,
        preview_url: String,
    ) -> Result<(), SmithError> {
        if generated_code.is_empty() {
            return Err(SmithError::EmptyDocument);
        }
        self.transition(Status::Completed)?;
        self.generated_code = generated_code;
        self.preview_url = Some(preview_url);
        Ok(())
    }

    /// Generation failure: partial output is discarded, the document keeps
    /// its pre-attempt value.
    pub fn fail_generation(&mut self) -> Result<(), SmithError> {
        self.transition(Status::Draft)
    }

    pub fn mark_deployed(&mut self, deployment_url: String) -> Result<(), SmithError> {
        if deployment_url.is_empty() {
            return Err(SmithError::Transition(self.status, Status::Deployed));
        }
        self.transition(Status::Deployed)?;
        self.deployment_url = Some(deployment_url);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeployStatus {
    Deploying,
    Success,
    Failure,
}

impl DeployStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            DeployStatus::Deploying => "deploying",
            DeployStatus::Success => "success",
            DeployStatus::Failure => "failure",
        }
    }

    pub fn parse(s: &str) -> Option<DeployStatus> {
        match s {
            "deploying" => Some(DeployStatus::Deploying),
            "success" => Some(DeployStatus::Success),
            "failure" => Some(DeployStatus::Failure),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deployment {
    pub id: String,
    pub project_id: String,
    pub user_id: String,
    pub platform: String,
    pub deployment_url: String,
    pub status: DeployStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Template {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub tags: Vec<String>,
}

/// Lower-cased, whitespace runs replaced with hyphens. Used for deployment
/// hosts and export file names.
pub fn slug(name: &str) -> String {
    name.to_lowercase().split_whitespace().collect::<Vec<_>>().join("-")
}
