use anyhow::{anyhow, Result};
use clap::Parser;
use indicatif::ProgressBar;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

mod auth;
mod builder;
mod cli;
mod config;
mod deploy;
mod errors;
mod preview;
mod project;
mod prompt;
mod provider;
mod storage;
mod store;
mod transcript;
mod uploads;
mod ux;

use builder::{BuildRequest, BuilderSession, GenerationOutcome};
use preview::{FileSurface, PreviewPane};
use project::{Project, Template};
use store::{OrderBy, SqliteStore, Store};

fn spinner(message: &'static str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_message(message);
    bar.enable_steady_tick(Duration::from_millis(120));
    bar
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Args::parse();

    let mut cfg = config::Config::default();
    if let Some(provider) = args.provider {
        cfg.provider = provider;
    }
    if let Some(model) = &args.model {
        cfg.model = model.clone();
    }
    if let Some(db) = &args.db {
        cfg.db_path = db.clone();
    }
    if let Some(root) = &args.storage_root {
        cfg.storage_root = root.clone();
    }
    cfg.timeout_secs = args.timeout_secs;

    if args.debug {
        eprintln!("debug: provider {:?}, model {}", cfg.provider, cfg.model);
    }

    // Identity is session-owned; the CLI logs in a local user up front.
    let auth = auth::AuthContext::new();
    let auth_sub = args.debug.then(|| {
        auth.subscribe(|state| {
            eprintln!(
                "debug[auth]: user={:?} loading={}",
                state.user.as_ref().map(|u| u.id.as_str()),
                state.is_loading
            );
        })
    });
    let user_id = args.user.clone().unwrap_or_else(|| "local".to_string());
    auth.login(auth::User {
        id: user_id.clone(),
        email: format!("{user_id}@localhost"),
        display_name: None,
    });
    let user = auth.current_user().ok_or_else(|| anyhow!("no authenticated user"))?;
    if args.debug {
        eprintln!("debug: signed in as {}", user.label());
    }

    let store: Arc<dyn Store> = Arc::new(SqliteStore::open(Path::new(&cfg.db_path))?);
    let blobs = Arc::new(storage::LocalStorage::new(&cfg.storage_root, &cfg.public_base));

    if args.list {
        let projects = store.list_projects(&user.id, OrderBy::default())?;
        ux::show_projects(&projects);
        return Ok(());
    }

    // Resolve the working project: resume by id or create from the request.
    let project = match &args.project {
        Some(id) => store
            .get_project(id)?
            .ok_or_else(|| anyhow!("no project with id {id}"))?,
        None => {
            let seed = args.task.as_deref().unwrap_or("");
            let p = Project::new(&user.id, seed, None);
            store.create_project(&p)?;
            p
        }
    };

    let generator = provider::make_generator(cfg.provider, &cfg, args.debug)?;
    let mut session = BuilderSession::new(
        store.clone(),
        blobs,
        generator,
        project,
        cfg.model.clone(),
        cfg.max_output_tokens,
        Duration::from_millis(cfg.deploy_delay_ms),
    );

    if !args.attachments.is_empty() {
        let mut pending = Vec::new();
        for path in &args.attachments {
            pending.push(uploads::PendingUpload::from_path(Path::new(path))?);
        }
        let outcome = session.attach_files(&pending, args.debug);
        ux::show_upload_batch(&outcome);
    }

    if let Some(url) = &args.clone_url {
        session.install_clone_prompt(url);
    }

    // An explicit task beats the installed auto/clone prompt; a template
    // beats both.
    let request = if let Some(name) = &args.template_name {
        Some(BuildRequest::Template(Template {
            id: format!("tpl_{}", chrono::Utc::now().timestamp_millis()),
            name: name.clone(),
            description: args.template_description.clone().unwrap_or_default(),
            category: "custom".into(),
            tags: Vec::new(),
        }))
    } else if let Some(task) = &args.task {
        Some(BuildRequest::Prompt(task.clone()))
    } else {
        session.take_pending_prompt().map(BuildRequest::Prompt)
    };

    let mut pane = PreviewPane::new(Box::new(FileSurface::new(&cfg.preview_path)));
    if let Some(device) = args.device {
        pane.set_device(match device {
            cli::DeviceArg::Mobile => preview::Device::Mobile,
            cli::DeviceArg::Tablet => preview::Device::Tablet,
            cli::DeviceArg::Desktop => preview::Device::Desktop,
        })?;
    }

    if let Some(request) = request {
        if !args.yes && !ux::confirm("Generate the website now?") {
            println!("Aborted by user.");
            return Ok(());
        }

        let bar = spinner("generating website…");
        let outcome = session.generate(request, &mut pane).await?;
        bar.finish_and_clear();

        match outcome {
            GenerationOutcome::Completed => {
                println!("Preview written to {}", cfg.preview_path);
            }
            GenerationOutcome::Failed | GenerationOutcome::Cancelled => {}
            GenerationOutcome::Stale => {
                println!("(result discarded; a newer request took over)");
            }
        }
    } else if !session.project.generated_code.is_empty() {
        // Resumed without a new request: re-render the persisted document.
        pane.refresh(Some(&session.project.generated_code))?;
        println!("Preview written to {}", cfg.preview_path);
    }

    if let Some(platform) = &args.deploy {
        let bar = spinner("deploying…");
        let outcome = session.deploy(platform).await?;
        bar.finish_and_clear();
        if args.debug && !outcome.succeeded() {
            eprintln!("debug: deployment failed: {:?}", outcome.error);
        }
    }

    if let Some(dir) = &args.export {
        let path = session.export_document(Path::new(dir))?;
        println!("Exported to {}", path.display());
    }

    ux::show_transcript(&session.transcript);
    ux::show_project(&session.project);
    let deployments = store.list_deployments(&session.project.id)?;
    ux::show_deployments(&deployments);

    if let Some(sub) = auth_sub {
        auth.unsubscribe(sub);
    }

    Ok(())
}
