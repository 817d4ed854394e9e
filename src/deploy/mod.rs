use anyhow::Result;
use chrono::Utc;
use std::time::Duration;

use crate::errors::SmithError;
use crate::project::{slug, DeployStatus, Deployment, Project};
use crate::store::Store;

/// Platforms the simulator knows how to target.
pub const PLATFORMS: &[&str] = &["netlify", "vercel", "github-pages", "surge"];

#[derive(Debug)]
pub struct DeployOutcome {
    pub deployment: Deployment,
    pub error: Option<String>,
}

impl DeployOutcome {
    pub fn succeeded(&self) -> bool {
        self.deployment.status == DeployStatus::Success
    }
}

/// Simulated deployment lifecycle: a `deploying` record, a fixed latency,
/// then a deterministic URL derived from the project name and the target
/// platform. On failure the record goes terminal in `failure` and the
/// project stays `completed`.
pub async fn deploy(
    store: &dyn Store,
    project: &mut Project,
    platform: &str,
    delay: Duration,
) -> Result<DeployOutcome> {
    if project.generated_code.is_empty() {
        return Err(SmithError::EmptyDocument.into());
    }

    let mut deployment = Deployment {
        id: format!("dep_{}", Utc::now().timestamp_millis()),
        project_id: project.id.clone(),
        user_id: project.user_id.clone(),
        platform: platform.to_string(),
        deployment_url: String::new(),
        status: DeployStatus::Deploying,
        created_at: Utc::now(),
    };
    store.create_deployment(&deployment)?;

    match simulate(store, project, &mut deployment, platform, delay).await {
        Ok(()) => Ok(DeployOutcome { deployment, error: None }),
        Err(e) => {
            deployment.status = DeployStatus::Failure;
            store.update_deployment(&deployment)?;
            Ok(DeployOutcome { deployment, error: Some(e.to_string()) })
        }
    }
}

async fn simulate(
    store: &dyn Store,
    project: &mut Project,
    deployment: &mut Deployment,
    platform: &str,
    delay: Duration,
) -> Result<()> {
    if !PLATFORMS.contains(&platform) {
        return Err(SmithError::UnknownPlatform(platform.to_string()).into());
    }

    tokio::time::sleep(delay).await;

    let url = format!(
        "https://{}-{}.{}.app",
        slug(&project.name),
        Utc::now().timestamp_millis(),
        platform
    );

    deployment.status = DeployStatus::Success;
    deployment.deployment_url = url.clone();
    store.update_deployment(deployment)?;

    project.mark_deployed(url)?;
    store.update_project(project)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::Status;
    use crate::store::SqliteStore;

    fn completed_project(store: &SqliteStore) -> Project {
        let mut p = Project::new("user_1", "My Shop", None);
        store.create_project(&p).unwrap();
        p.begin_generation("My Shop", None).unwrap();
        p.complete_generation("<html>shop</html>".into(), "https://p".into()).unwrap();
        store.update_project(&p).unwrap();
        p
    }

    #[tokio::test]
    async fn successful_deploy_to_vercel() {
        let store = SqliteStore::open_in_memory().unwrap();
        let mut p = completed_project(&store);

        let outcome = deploy(&store, &mut p, "vercel", Duration::ZERO).await.unwrap();
        assert!(outcome.succeeded());
        assert!(outcome.deployment.deployment_url.contains("vercel"));
        assert!(outcome.deployment.deployment_url.starts_with("https://my-shop-"));

        assert_eq!(p.status, Status::Deployed);
        assert_eq!(p.deployment_url, Some(outcome.deployment.deployment_url.clone()));

        let stored = store.get_deployment(&outcome.deployment.id).unwrap().unwrap();
        assert_eq!(stored.status, DeployStatus::Success);
        let reloaded = store.get_project(&p.id).unwrap().unwrap();
        assert_eq!(reloaded.status, Status::Deployed);
    }

    #[tokio::test]
    async fn unknown_platform_fails_and_project_stays_completed() {
        let store = SqliteStore::open_in_memory().unwrap();
        let mut p = completed_project(&store);

        let outcome = deploy(&store, &mut p, "heroku", Duration::ZERO).await.unwrap();
        assert!(!outcome.succeeded());
        assert!(outcome.error.unwrap().contains("heroku"));
        assert_eq!(outcome.deployment.status, DeployStatus::Failure);
        assert_eq!(p.status, Status::Completed);

        let stored = store.get_deployment(&outcome.deployment.id).unwrap().unwrap();
        assert_eq!(stored.status, DeployStatus::Failure);
    }

    #[tokio::test]
    async fn empty_document_is_rejected_up_front() {
        let store = SqliteStore::open_in_memory().unwrap();
        let mut p = Project::new("user_1", "empty", None);
        store.create_project(&p).unwrap();

        assert!(deploy(&store, &mut p, "netlify", Duration::ZERO).await.is_err());
        assert!(store.list_deployments(&p.id).unwrap().is_empty());
    }
}
