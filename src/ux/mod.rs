use colored::Colorize;
use std::io::{self, Write};

use crate::project::{DeployStatus, Deployment, Project, Status};
use crate::transcript::Transcript;
use crate::uploads::BatchOutcome;

fn status_label(status: Status) -> String {
    match status {
        Status::Draft => "[DRAFT]".yellow().bold().to_string(),
        Status::Generating => "[GENERATING]".cyan().bold().to_string(),
        Status::Completed => "[COMPLETED]".green().bold().to_string(),
        Status::Deployed => "[DEPLOYED]".magenta().bold().to_string(),
    }
}

pub fn show_transcript(transcript: &Transcript) {
    println!("\n=== CONVERSATION ===");
    for m in transcript.messages() {
        let who = match m.role {
            crate::transcript::Role::User => "you".cyan().bold(),
            crate::transcript::Role::Assistant => "builder".green().bold(),
        };
        println!("{} {}", who, m.body);
    }
    if let Some(partial) = transcript.streaming() {
        println!("{} {}…", "builder".green().bold(), partial.dimmed());
    }
    println!();
}

pub fn show_project(project: &Project) {
    println!(
        "\n{}",
        "┏━━━━━━━━━━━━━━━━━━━━━━━━ Project ━━━━━━━━━━━━━━━━━━━━━━━━┓".bold()
    );
    println!("  {} {}  {}", project.id.dimmed(), status_label(project.status), project.name.bold());
    if let Some(url) = &project.preview_url {
        println!("  {}: {}", "Preview".bold(), url);
    }
    if let Some(url) = &project.deployment_url {
        println!("  {}: {}", "Deployed".bold(), url);
    }
    println!("  {}: {}B  {}: {}", "Document".bold(), project.generated_code.len(), "Updated".bold(), project.updated_at.to_rfc3339());
    println!("{}", "┗━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━┛".bold());
}

pub fn show_projects(projects: &[Project]) {
    println!("\n=== PROJECTS ===");
    if projects.is_empty() {
        println!("(none yet)");
        return;
    }
    for (i, p) in projects.iter().enumerate() {
        println!(
            "{}. {}  {}  {}  {}",
            i + 1,
            status_label(p.status),
            p.name.bold(),
            p.id.dimmed(),
            p.updated_at.format("%Y-%m-%d %H:%M").to_string().dimmed()
        );
    }
    println!();
}

pub fn show_upload_batch(outcome: &BatchOutcome) {
    for f in &outcome.accepted {
        println!("{}  {} ({})", "[UPLOADED]".green().bold(), f.name, f.content_type);
    }
    for name in &outcome.skipped {
        println!("{}  {}", "[SKIPPED]".yellow().bold(), name);
    }
    if let Some(err) = &outcome.error {
        println!("{}  {}", "[FAILED]".red().bold(), err);
    }
}

pub fn show_deployments(deployments: &[Deployment]) {
    if deployments.is_empty() {
        return;
    }
    println!("\n=== DEPLOYMENTS ===");
    for d in deployments {
        let label = match d.status {
            DeployStatus::Deploying => "[DEPLOYING]".cyan().bold(),
            DeployStatus::Success => "[SUCCESS]".green().bold(),
            DeployStatus::Failure => "[FAILURE]".red().bold(),
        };
        println!("{}  {}  {}", label, d.platform.bold(), d.deployment_url);
    }
    println!();
}

pub fn confirm(prompt: &str) -> bool {
    print!("{} [y/N]: ", prompt);
    let _ = io::stdout().flush();
    let mut s = String::new();
    if io::stdin().read_line(&mut s).is_ok() {
        let ans = s.trim().to_lowercase();
        ans == "y" || ans == "yes"
    } else {
        false
    }
}
