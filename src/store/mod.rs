use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rusqlite::{params, Connection, Row};
use std::path::Path;

use crate::project::{DeployStatus, Deployment, Project, Status};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderField {
    CreatedAt,
    UpdatedAt,
    Name,
}

impl OrderField {
    fn column(self) -> &'static str {
        match self {
            OrderField::CreatedAt => "created_at",
            OrderField::UpdatedAt => "updated_at",
            OrderField::Name => "name",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct OrderBy {
    pub field: OrderField,
    pub descending: bool,
}

impl Default for OrderBy {
    fn default() -> Self {
        Self { field: OrderField::UpdatedAt, descending: true }
    }
}

/// Persistence collaborator for project and deployment records. Filters are
/// equality on the owner identity; ordering is a single whitelisted field.
pub trait Store: Send + Sync {
    fn create_project(&self, project: &Project) -> Result<()>;
    fn update_project(&self, project: &Project) -> Result<()>;
    fn delete_project(&self, id: &str) -> Result<()>;
    fn get_project(&self, id: &str) -> Result<Option<Project>>;
    fn list_projects(&self, user_id: &str, order: OrderBy) -> Result<Vec<Project>>;

    fn create_deployment(&self, deployment: &Deployment) -> Result<()>;
    fn update_deployment(&self, deployment: &Deployment) -> Result<()>;
    fn get_deployment(&self, id: &str) -> Result<Option<Deployment>>;
    fn list_deployments(&self, project_id: &str) -> Result<Vec<Deployment>>;
}

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS projects (
    id             TEXT PRIMARY KEY,
    user_id        TEXT NOT NULL,
    name           TEXT NOT NULL,
    description    TEXT NOT NULL,
    prompt         TEXT NOT NULL,
    generated_code TEXT NOT NULL,
    preview_url    TEXT,
    deployment_url TEXT,
    template_id    TEXT,
    status         TEXT NOT NULL,
    created_at     TEXT NOT NULL,
    updated_at     TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS deployments (
    id             TEXT PRIMARY KEY,
    project_id     TEXT NOT NULL,
    user_id        TEXT NOT NULL,
    platform       TEXT NOT NULL,
    deployment_url TEXT NOT NULL,
    status         TEXT NOT NULL,
    created_at     TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_projects_user ON projects(user_id);
CREATE INDEX IF NOT EXISTS idx_deployments_project ON deployments(project_id);
"#;

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs_err::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open database at {}", path.display()))?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn: Mutex::new(conn) })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn: Mutex::new(conn) })
    }
}

fn parse_ts(s: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(s)
        .map_err(|e| anyhow!("bad timestamp {s:?}: {e}"))?
        .with_timezone(&Utc))
}

fn project_from_row(row: &Row<'_>) -> rusqlite::Result<(Project, String, String, String)> {
    let status: String = row.get("status")?;
    let created: String = row.get("created_at")?;
    let updated: String = row.get("updated_at")?;
    let project = Project {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        name: row.get("name")?,
        description: row.get("description")?,
        prompt: row.get("prompt")?,
        generated_code: row.get("generated_code")?,
        preview_url: row.get("preview_url")?,
        deployment_url: row.get("deployment_url")?,
        template_id: row.get("template_id")?,
        status: Status::Draft, // patched by the caller from the raw column
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };
    Ok((project, status, created, updated))
}

fn finish_project(raw: (Project, String, String, String)) -> Result<Project> {
    let (mut project, status, created, updated) = raw;
    project.status =
        Status::parse(&status).ok_or_else(|| anyhow!("unknown project status {status:?}"))?;
    project.created_at = parse_ts(&created)?;
    project.updated_at = parse_ts(&updated)?;
    Ok(project)
}

impl Store for SqliteStore {
    fn create_project(&self, p: &Project) -> Result<()> {
        self.conn.lock().execute(
            "INSERT INTO projects (id, user_id, name, description, prompt, generated_code,
                 preview_url, deployment_url, template_id, status, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            params![
                p.id,
                p.user_id,
                p.name,
                p.description,
                p.prompt,
                p.generated_code,
                p.preview_url,
                p.deployment_url,
                p.template_id,
                p.status.as_str(),
                p.created_at.to_rfc3339(),
                p.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    fn update_project(&self, p: &Project) -> Result<()> {
        let n = self.conn.lock().execute(
            "UPDATE projects SET name = ?2, description = ?3, prompt = ?4, generated_code = ?5,
                 preview_url = ?6, deployment_url = ?7, template_id = ?8, status = ?9,
                 updated_at = ?10
             WHERE id = ?1",
            params![
                p.id,
                p.name,
                p.description,
                p.prompt,
                p.generated_code,
                p.preview_url,
                p.deployment_url,
                p.template_id,
                p.status.as_str(),
                p.updated_at.to_rfc3339(),
            ],
        )?;
        if n == 0 {
            return Err(anyhow!("no project with id {}", p.id));
        }
        Ok(())
    }

    fn delete_project(&self, id: &str) -> Result<()> {
        self.conn.lock().execute("DELETE FROM projects WHERE id = ?1", params![id])?;
        Ok(())
    }

    fn get_project(&self, id: &str) -> Result<Option<Project>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare("SELECT * FROM projects WHERE id = ?1")?;
        let mut rows = stmt.query_map(params![id], project_from_row)?;
        match rows.next() {
            Some(raw) => Ok(Some(finish_project(raw?)?)),
            None => Ok(None),
        }
    }

    fn list_projects(&self, user_id: &str, order: OrderBy) -> Result<Vec<Project>> {
        let dir = if order.descending { "DESC" } else { "ASC" };
        let sql = format!(
            "SELECT * FROM projects WHERE user_id = ?1 ORDER BY {} {}",
            order.field.column(),
            dir
        );
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params![user_id], project_from_row)?;
        let mut out = Vec::new();
        for raw in rows {
            out.push(finish_project(raw?)?);
        }
        Ok(out)
    }

    fn create_deployment(&self, d: &Deployment) -> Result<()> {
        self.conn.lock().execute(
            "INSERT INTO deployments (id, project_id, user_id, platform, deployment_url,
                 status, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                d.id,
                d.project_id,
                d.user_id,
                d.platform,
                d.deployment_url,
                d.status.as_str(),
                d.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    fn update_deployment(&self, d: &Deployment) -> Result<()> {
        let n = self.conn.lock().execute(
            "UPDATE deployments SET platform = ?2, deployment_url = ?3, status = ?4 WHERE id = ?1",
            params![d.id, d.platform, d.deployment_url, d.status.as_str()],
        )?;
        if n == 0 {
            return Err(anyhow!("no deployment with id {}", d.id));
        }
        Ok(())
    }

    fn get_deployment(&self, id: &str) -> Result<Option<Deployment>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare("SELECT * FROM deployments WHERE id = ?1")?;
        let mut rows = stmt.query_map(params![id], deployment_from_row)?;
        match rows.next() {
            Some(raw) => Ok(Some(finish_deployment(raw?)?)),
            None => Ok(None),
        }
    }

    fn list_deployments(&self, project_id: &str) -> Result<Vec<Deployment>> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare("SELECT * FROM deployments WHERE project_id = ?1 ORDER BY created_at ASC")?;
        let rows = stmt.query_map(params![project_id], deployment_from_row)?;
        let mut out = Vec::new();
        for raw in rows {
            out.push(finish_deployment(raw?)?);
        }
        Ok(out)
    }
}

fn deployment_from_row(row: &Row<'_>) -> rusqlite::Result<(Deployment, String, String)> {
    let status: String = row.get("status")?;
    let created: String = row.get("created_at")?;
    let d = Deployment {
        id: row.get("id")?,
        project_id: row.get("project_id")?,
        user_id: row.get("user_id")?,
        platform: row.get("platform")?,
        deployment_url: row.get("deployment_url")?,
        status: DeployStatus::Deploying,
        created_at: Utc::now(),
    };
    Ok((d, status, created))
}

fn finish_deployment(raw: (Deployment, String, String)) -> Result<Deployment> {
    let (mut d, status, created) = raw;
    d.status =
        DeployStatus::parse(&status).ok_or_else(|| anyhow!("unknown deploy status {status:?}"))?;
    d.created_at = parse_ts(&created)?;
    Ok(d)
}
