use anyhow::Result;
use fs_err as fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::deploy::{self, DeployOutcome};
use crate::errors::SmithError;
use crate::preview::PreviewPane;
use crate::project::{slug, Project, Template};
use crate::prompt;
use crate::provider::{DynGenerator, GenerationRequest};
use crate::storage::BlobStorage;
use crate::store::Store;
use crate::transcript::Transcript;
use crate::uploads::{self, BatchOutcome, PendingUpload, UploadedFile};

const GENERATED_MSG: &str = "Your website has been generated! You can see the live preview \
     on the right. Would you like me to make any modifications or add new features?";
const GENERATION_FAILED_MSG: &str = "Oops! Something went wrong while generating your \
     website. Please try again with a different prompt and I'll make it work.";
const UPLOAD_FAILED_MSG: &str = "Oops! There was an issue uploading your files. Please try \
     again with supported file types (images, ZIP files, or code files).";
const INVALID_URL_MSG: &str = "Please enter a valid URL starting with 'http://' or \
     'https://'. For example: https://example.com";
const CANCELLED_MSG: &str = "Generation cancelled.";

/// What a user action asks the session to build.
#[derive(Debug, Clone)]
pub enum BuildRequest {
    Prompt(String),
    Template(Template),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationOutcome {
    Completed,
    Failed,
    Cancelled,
    /// A completion whose token was retired before it landed; nothing was
    /// persisted.
    Stale,
}

/// Cooperative cancellation for an in-flight generation.
#[derive(Clone)]
pub struct CancelHandle {
    flag: Arc<AtomicBool>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// One generation in flight per project. Tokens are monotonic so a stale
/// completion can be recognized and dropped instead of overwriting newer
/// state.
#[derive(Debug, Default)]
struct InflightGuard {
    seq: u64,
    active: Option<u64>,
}

impl InflightGuard {
    fn begin(&mut self) -> Result<u64, SmithError> {
        if self.active.is_some() {
            return Err(SmithError::Busy);
        }
        self.seq += 1;
        self.active = Some(self.seq);
        Ok(self.seq)
    }

    /// True when the finishing request still owns the in-flight slot.
    fn finish(&mut self, token: u64) -> bool {
        if self.active == Some(token) {
            self.active = None;
            true
        } else {
            false
        }
    }

    fn retire(&mut self) {
        self.active = None;
    }
}

/// One builder session: a project, its transcript, its attachments, and the
/// collaborators needed to drive a generation end to end. Session state is
/// ephemeral; only the project and deployment records outlive it.
pub struct BuilderSession {
    store: Arc<dyn Store>,
    storage: Arc<dyn BlobStorage>,
    generator: DynGenerator,
    model: String,
    max_output_tokens: u32,
    deploy_delay: Duration,
    pub project: Project,
    pub transcript: Transcript,
    uploads: Vec<UploadedFile>,
    pending_prompt: Option<String>,
    guard: InflightGuard,
    cancel: Arc<AtomicBool>,
}

impl BuilderSession {
    pub fn new(
        store: Arc<dyn Store>,
        storage: Arc<dyn BlobStorage>,
        generator: DynGenerator,
        project: Project,
        model: String,
        max_output_tokens: u32,
        deploy_delay: Duration,
    ) -> Self {
        let mut transcript = Transcript::new();
        transcript.push_assistant(format!(
            "I'm ready to help you build \"{}\". What would you like to create or modify?",
            project.name
        ));
        Self {
            store,
            storage,
            generator,
            model,
            max_output_tokens,
            deploy_delay,
            project,
            transcript,
            uploads: Vec::new(),
            pending_prompt: None,
            guard: InflightGuard::default(),
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn uploads(&self) -> &[UploadedFile] {
        &self.uploads
    }

    pub fn pending_prompt(&self) -> Option<&str> {
        self.pending_prompt.as_deref()
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle { flag: self.cancel.clone() }
    }

    /// Classifies and stores a batch of attachments. Accepted files join
    /// the session's upload list; a successful non-empty batch installs the
    /// auto-prompt for its highest-priority bucket.
    pub fn attach_files(&mut self, files: &[PendingUpload], debug: bool) -> BatchOutcome {
        let outcome = uploads::upload_batch(self.storage.as_ref(), &self.project.user_id, files, debug);
        self.uploads.extend(outcome.accepted.iter().cloned());

        if outcome.failed() {
            self.transcript.push_assistant(UPLOAD_FAILED_MSG);
        } else if let Some(fragment) = prompt::auto_prompt(&outcome.accepted) {
            self.pending_prompt = Some(fragment);
        }
        outcome
    }

    /// Drops an attachment the user removed before it was consumed.
    pub fn remove_upload(&mut self, index: usize) {
        if index < self.uploads.len() {
            self.uploads.remove(index);
        }
    }

    /// Validates a clone URL and installs the structured clone instruction
    /// as the pending prompt. Invalid input surfaces a transcript notice
    /// and leaves the pending prompt unchanged; empty input is a no-op.
    pub fn install_clone_prompt(&mut self, input: &str) {
        let input = input.trim();
        if input.is_empty() {
            return;
        }
        if prompt::is_clone_url(input) {
            self.pending_prompt = Some(prompt::clone_prompt(input));
        } else {
            self.transcript.push_assistant(INVALID_URL_MSG);
        }
    }

    pub fn take_pending_prompt(&mut self) -> Option<String> {
        self.pending_prompt.take()
    }

    /// Drives one full generation: transcript entry, status transition,
    /// streamed accumulation into the preview pane, then persistence. All
    /// generation-service failures are absorbed into the transcript; only
    /// collaborator (store/storage) errors propagate.
    pub async fn generate(
        &mut self,
        request: BuildRequest,
        pane: &mut PreviewPane,
    ) -> Result<GenerationOutcome> {
        let token = self.guard.begin()?;
        self.cancel.store(false, Ordering::SeqCst);

        // The recorded prompt is the user-facing request; the composition
        // task is what the template framing wraps.
        let (user_message, recorded, compose_task, template) = match &request {
            BuildRequest::Prompt(text) => (text.clone(), text.clone(), text.clone(), None),
            BuildRequest::Template(t) => (
                format!("Use the {} template", t.name),
                format!("Create a {} website", t.name.to_lowercase()),
                String::new(),
                Some(t.clone()),
            ),
        };
        self.transcript.push_user(user_message);

        let template_id = template.as_ref().map(|t| t.id.as_str());
        if let Err(e) = self.project.begin_generation(&recorded, template_id) {
            self.guard.retire();
            return Err(e.into());
        }
        self.store.update_project(&self.project)?;

        let composed = prompt::compose(&compose_task, template.as_ref(), &self.uploads);
        let req = GenerationRequest {
            prompt: composed,
            model: self.model.clone(),
            max_output_tokens: self.max_output_tokens,
        };

        let mut accumulator = String::new();
        let stream_result = {
            let transcript = &mut self.transcript;
            let cancel = self.cancel.clone();
            let mut on_fragment = |fragment: &str| {
                if cancel.load(Ordering::SeqCst) {
                    return false;
                }
                accumulator.push_str(fragment);
                transcript.set_streaming(&accumulator);
                // Preview failures must not poison the stream; the pane
                // simply falls behind until the next fragment.
                let _ = pane.update(&accumulator);
                true
            };
            self.generator.stream_text(&req, &mut on_fragment).await
        };

        if !self.guard.finish(token) {
            // A newer request owns the project now; drop this result.
            self.transcript.take_streaming();
            return Ok(GenerationOutcome::Stale);
        }

        if self.cancel.load(Ordering::SeqCst) {
            self.transcript.take_streaming();
            self.project.fail_generation()?;
            self.store.update_project(&self.project)?;
            self.transcript.push_assistant(CANCELLED_MSG);
            return Ok(GenerationOutcome::Cancelled);
        }

        match stream_result {
            Ok(()) if !accumulator.is_empty() => {
                let preview_path = format!("previews/{}.html", self.project.id);
                let preview_url =
                    self.storage.upload(accumulator.as_bytes(), &preview_path, true)?;
                self.project.complete_generation(accumulator, preview_url)?;
                self.store.update_project(&self.project)?;
                self.transcript.take_streaming();
                self.transcript.push_assistant(GENERATED_MSG);
                Ok(GenerationOutcome::Completed)
            }
            _ => {
                // Service failure or an empty stream: discard partial
                // output, revert, apologize once.
                self.transcript.take_streaming();
                self.project.fail_generation()?;
                self.store.update_project(&self.project)?;
                self.transcript.push_assistant(GENERATION_FAILED_MSG);
                Ok(GenerationOutcome::Failed)
            }
        }
    }

    /// Simulated deployment against one of the known platforms; the
    /// terminal outcome lands in the transcript either way.
    pub async fn deploy(&mut self, platform: &str) -> Result<DeployOutcome> {
        let outcome =
            deploy::deploy(self.store.as_ref(), &mut self.project, platform, self.deploy_delay)
                .await?;
        if outcome.succeeded() {
            self.transcript.push_assistant(format!(
                "Your website has been deployed successfully! You can access it at: {}",
                outcome.deployment.deployment_url
            ));
        } else {
            self.transcript.push_assistant(format!(
                "Sorry, the deployment to {platform} failed: {}. Your project is still \
                 completed, so you can try again.",
                outcome.error.as_deref().unwrap_or("unknown error")
            ));
        }
        Ok(outcome)
    }

    /// Writes the persisted generated document, byte for byte, to
    /// `{name-slug}.html` under `dir`.
    pub fn export_document(&self, dir: &Path) -> Result<PathBuf> {
        if self.project.generated_code.is_empty() {
            return Err(SmithError::EmptyDocument.into());
        }
        fs::create_dir_all(dir)?;
        let path = dir.join(format!("{}.html", slug(&self.project.name)));
        fs::write(&path, &self.project.generated_code)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preview::{PreviewPane, RenderSurface};
    use crate::project::{DeployStatus, Status};
    use crate::provider::TextGenerator;
    use crate::storage::LocalStorage;
    use crate::store::SqliteStore;
    use crate::transcript::Role;
    use anyhow::anyhow;
    use async_trait::async_trait;
    use parking_lot::Mutex;

    #[derive(Clone, Default)]
    struct Recorder {
        writes: Arc<Mutex<Vec<String>>>,
    }

    impl RenderSurface for Recorder {
        fn replace(&mut self, document: &str, _device: crate::preview::Device) -> Result<()> {
            self.writes.lock().push(document.to_string());
            Ok(())
        }
    }

    /// Scripted generator: emits fragments in order, optionally fails at
    /// the end, optionally cancels the session partway through.
    struct Scripted {
        fragments: Vec<String>,
        fail_with: Option<String>,
        cancel_at: Option<(usize, CancelHandle)>,
    }

    #[async_trait]
    impl TextGenerator for Scripted {
        async fn stream_text(
            &self,
            _req: &GenerationRequest,
            on_fragment: &mut (dyn for<'a> FnMut(&'a str) -> bool + Send),
        ) -> Result<()> {
            for (i, fragment) in self.fragments.iter().enumerate() {
                if let Some((at, handle)) = &self.cancel_at {
                    if i == *at {
                        handle.cancel();
                    }
                }
                if !on_fragment(fragment) {
                    return Ok(());
                }
            }
            match &self.fail_with {
                Some(msg) => Err(anyhow!("{msg}")),
                None => Ok(()),
            }
        }
    }

    const DOC: &str = "<!DOCTYPE html><html><body><h1>Bakery</h1></body></html>";

    fn fragments_of(doc: &str) -> Vec<String> {
        doc.as_bytes().chunks(16).map(|c| String::from_utf8_lossy(c).into_owned()).collect()
    }

    fn session_with(generator: DynGenerator) -> (BuilderSession, Arc<SqliteStore>, tempfile::TempDir) {
        let store = Arc::new(SqliteStore::open_in_memory().unwrap());
        let dir = tempfile::tempdir().unwrap();
        let storage = Arc::new(LocalStorage::new(dir.path(), "https://cdn.example"));
        let project = Project::new("user_1", "Create a bakery site", None);
        store.create_project(&project).unwrap();
        let session = BuilderSession::new(
            store.clone(),
            storage,
            generator,
            project,
            "gpt-4o-mini".into(),
            4000,
            Duration::ZERO,
        );
        (session, store, dir)
    }

    fn pane() -> (PreviewPane, Arc<Mutex<Vec<String>>>) {
        let rec = Recorder::default();
        let writes = rec.writes.clone();
        (PreviewPane::new(Box::new(rec)), writes)
    }

    #[tokio::test]
    async fn scenario_a_prompt_to_completed() {
        let gen = Box::new(Scripted {
            fragments: fragments_of(DOC),
            fail_with: None,
            cancel_at: None,
        });
        let (mut session, store, _dir) = session_with(gen);
        let (mut pane, writes) = pane();

        let outcome = session
            .generate(BuildRequest::Prompt("Create a bakery site".into()), &mut pane)
            .await
            .unwrap();

        assert_eq!(outcome, GenerationOutcome::Completed);
        assert_eq!(session.project.status, Status::Completed);
        assert_eq!(session.project.generated_code, DOC);
        assert!(session.project.preview_url.as_deref().unwrap().contains("previews/"));

        // The surface saw the full document once the stream finished.
        assert_eq!(writes.lock().last().unwrap(), DOC);

        // Persisted copy matches the accumulator, fragment order preserved.
        let stored = store.get_project(&session.project.id).unwrap().unwrap();
        assert_eq!(stored.generated_code, DOC);
        assert_eq!(stored.status, Status::Completed);

        // User turn first, then exactly one terminal assistant message.
        let msgs = session.transcript.messages();
        assert_eq!(msgs[1].role, Role::User);
        assert_eq!(msgs[1].body, "Create a bakery site");
        assert_eq!(msgs.last().unwrap().role, Role::Assistant);
        assert!(session.transcript.streaming().is_none());
    }

    #[tokio::test]
    async fn scenario_e_mid_stream_failure_reverts_to_draft() {
        let gen = Box::new(Scripted {
            fragments: fragments_of("<!DOCTYPE html><html><body>partial"),
            fail_with: Some("connection reset".into()),
            cancel_at: None,
        });
        let (mut session, store, _dir) = session_with(gen);
        let (mut pane, _writes) = pane();

        let outcome = session
            .generate(BuildRequest::Prompt("Create a bakery site".into()), &mut pane)
            .await
            .unwrap();

        assert_eq!(outcome, GenerationOutcome::Failed);
        assert_eq!(session.project.status, Status::Draft);
        assert!(session.project.generated_code.is_empty());

        let stored = store.get_project(&session.project.id).unwrap().unwrap();
        assert_eq!(stored.status, Status::Draft);
        assert!(stored.generated_code.is_empty());

        let apologies = session
            .transcript
            .messages()
            .iter()
            .filter(|m| m.body.contains("went wrong"))
            .count();
        assert_eq!(apologies, 1);
        assert!(session.transcript.streaming().is_none());
    }

    #[tokio::test]
    async fn failure_keeps_previous_document() {
        let gen = Box::new(Scripted {
            fragments: fragments_of(DOC),
            fail_with: None,
            cancel_at: None,
        });
        let (mut session, store, dir) = session_with(gen);
        let (mut first_pane, _w) = pane();
        session
            .generate(BuildRequest::Prompt("v1".into()), &mut first_pane)
            .await
            .unwrap();

        // Second attempt fails; v1 document must survive untouched.
        let store2 = store.clone();
        let storage = Arc::new(LocalStorage::new(dir.path(), "https://cdn.example"));
        let mut session = BuilderSession::new(
            store2,
            storage,
            Box::new(Scripted {
                fragments: vec!["<html>v2 part".into()],
                fail_with: Some("boom".into()),
                cancel_at: None,
            }),
            session.project,
            "gpt-4o-mini".into(),
            4000,
            Duration::ZERO,
        );
        let (mut pane, _w) = pane();
        let outcome =
            session.generate(BuildRequest::Prompt("v2".into()), &mut pane).await.unwrap();

        assert_eq!(outcome, GenerationOutcome::Failed);
        assert_eq!(session.project.status, Status::Draft);
        assert_eq!(session.project.generated_code, DOC);
        let stored = store.get_project(&session.project.id).unwrap().unwrap();
        assert_eq!(stored.generated_code, DOC);
    }

    #[tokio::test]
    async fn template_request_frames_prompt_and_transcript() {
        let gen = Box::new(Scripted {
            fragments: fragments_of(DOC),
            fail_with: None,
            cancel_at: None,
        });
        let (mut session, _store, _dir) = session_with(gen);
        let (mut pane, _w) = pane();

        let template = Template {
            id: "tpl_1".into(),
            name: "Portfolio".into(),
            description: "A clean portfolio".into(),
            category: "personal".into(),
            tags: vec![],
        };
        session.generate(BuildRequest::Template(template), &mut pane).await.unwrap();

        assert_eq!(session.transcript.messages()[1].body, "Use the Portfolio template");
        assert_eq!(session.project.prompt, "Create a portfolio website");
        assert_eq!(session.project.template_id.as_deref(), Some("tpl_1"));
    }

    #[tokio::test]
    async fn cancellation_aborts_and_reverts() {
        let (mut session, store, _dir) = session_with(Box::new(Scripted {
            fragments: vec![],
            fail_with: None,
            cancel_at: None,
        }));
        // Cancel the session after the second fragment lands.
        let handle = session.cancel_handle();
        session.generator = Box::new(Scripted {
            fragments: fragments_of(DOC),
            fail_with: None,
            cancel_at: Some((2, handle)),
        });

        let (mut pane, _w) = pane();
        let outcome =
            session.generate(BuildRequest::Prompt("cancel me".into()), &mut pane).await.unwrap();

        assert_eq!(outcome, GenerationOutcome::Cancelled);
        assert_eq!(session.project.status, Status::Draft);
        assert!(session.project.generated_code.is_empty());
        assert_eq!(session.transcript.last().unwrap().body, "Generation cancelled.");
        let stored = store.get_project(&session.project.id).unwrap().unwrap();
        assert!(stored.generated_code.is_empty());
    }

    #[test]
    fn inflight_guard_rejects_overlap_and_detects_stale() {
        let mut guard = InflightGuard::default();
        let t1 = guard.begin().unwrap();
        assert!(matches!(guard.begin(), Err(SmithError::Busy)));
        assert!(guard.finish(t1));

        let t2 = guard.begin().unwrap();
        guard.retire();
        assert!(!guard.finish(t2));
        // Slot is free again for the newer request.
        assert!(guard.begin().is_ok());
    }

    #[tokio::test]
    async fn scenario_b_png_upload_installs_image_prompt() {
        let gen = Box::new(Scripted { fragments: vec![], fail_with: None, cancel_at: None });
        let (mut session, _store, _dir) = session_with(gen);

        let files = [PendingUpload {
            name: "screenshot.png".into(),
            content_type: "image/png".into(),
            data: vec![0x89, 0x50],
        }];
        let outcome = session.attach_files(&files, false);

        assert!(!outcome.failed());
        assert_eq!(session.uploads().len(), 1);
        let pending = session.pending_prompt().unwrap();
        assert!(pending.contains("screenshot"));
        assert!(!pending.contains("ZIP file"));
        assert!(!pending.contains("uploaded code files"));
    }

    #[tokio::test]
    async fn removed_attachment_leaves_the_rest() {
        let gen = Box::new(Scripted { fragments: vec![], fail_with: None, cancel_at: None });
        let (mut session, _store, _dir) = session_with(gen);

        let files = [
            PendingUpload { name: "a.png".into(), content_type: "image/png".into(), data: vec![1] },
            PendingUpload { name: "b.png".into(), content_type: "image/png".into(), data: vec![2] },
        ];
        session.attach_files(&files, false);
        session.remove_upload(0);
        assert_eq!(session.uploads().len(), 1);
        assert_eq!(session.uploads()[0].name, "b.png");

        // Out-of-range removal is a no-op.
        session.remove_upload(5);
        assert_eq!(session.uploads().len(), 1);
    }

    #[tokio::test]
    async fn scenario_c_invalid_clone_url() {
        let gen = Box::new(Scripted { fragments: vec![], fail_with: None, cancel_at: None });
        let (mut session, _store, _dir) = session_with(gen);

        session.install_clone_prompt("notaurl");
        assert!(session.pending_prompt().is_none());
        assert!(session.transcript.last().unwrap().body.contains("valid URL"));

        session.install_clone_prompt("");
        assert_eq!(session.transcript.messages().len(), 2);

        session.install_clone_prompt("https://example.com");
        assert!(session.pending_prompt().unwrap().contains("https://example.com"));
    }

    #[tokio::test]
    async fn scenario_d_deploy_completed_project_to_vercel() {
        let gen = Box::new(Scripted {
            fragments: fragments_of(DOC),
            fail_with: None,
            cancel_at: None,
        });
        let (mut session, store, _dir) = session_with(gen);
        let (mut pane, _w) = pane();
        session.generate(BuildRequest::Prompt("bakery".into()), &mut pane).await.unwrap();

        let outcome = session.deploy("vercel").await.unwrap();
        assert!(outcome.succeeded());
        assert!(outcome.deployment.deployment_url.contains("vercel"));
        assert_eq!(session.project.status, Status::Deployed);

        let deployments = store.list_deployments(&session.project.id).unwrap();
        assert_eq!(deployments.len(), 1);
        assert_eq!(deployments[0].status, DeployStatus::Success);
        assert!(session.transcript.last().unwrap().body.contains("deployed successfully"));
    }

    #[tokio::test]
    async fn deploy_failure_keeps_project_completed() {
        let gen = Box::new(Scripted {
            fragments: fragments_of(DOC),
            fail_with: None,
            cancel_at: None,
        });
        let (mut session, _store, _dir) = session_with(gen);
        let (mut pane, _w) = pane();
        session.generate(BuildRequest::Prompt("bakery".into()), &mut pane).await.unwrap();

        let outcome = session.deploy("heroku").await.unwrap();
        assert!(!outcome.succeeded());
        assert_eq!(session.project.status, Status::Completed);
        assert!(session.transcript.last().unwrap().body.contains("failed"));
    }

    #[tokio::test]
    async fn export_round_trips_exact_bytes() {
        let gen = Box::new(Scripted {
            fragments: fragments_of(DOC),
            fail_with: None,
            cancel_at: None,
        });
        let (mut session, _store, _dir) = session_with(gen);
        let (mut pane, _w) = pane();
        session
            .generate(BuildRequest::Prompt("Create a bakery site".into()), &mut pane)
            .await
            .unwrap();

        let out = tempfile::tempdir().unwrap();
        let path = session.export_document(out.path()).unwrap();
        assert!(path.file_name().unwrap().to_string_lossy().ends_with(".html"));
        assert!(path.file_name().unwrap().to_string_lossy().contains("create-a-bakery-site"));
        let read_back = fs::read(&path).unwrap();
        assert_eq!(read_back, session.project.generated_code.as_bytes());
    }

    #[tokio::test]
    async fn export_without_document_errors() {
        let gen = Box::new(Scripted { fragments: vec![], fail_with: None, cancel_at: None });
        let (session, _store, _dir) = session_with(gen);
        let out = tempfile::tempdir().unwrap();
        assert!(session.export_document(out.path()).is_err());
    }

    #[tokio::test]
    async fn upload_failure_is_apologetic_and_keeps_earlier_accepts() {
        struct FailSecond {
            calls: Mutex<usize>,
        }
        impl BlobStorage for FailSecond {
            fn upload(&self, _d: &[u8], path: &str, _o: bool) -> Result<String> {
                let mut calls = self.calls.lock();
                *calls += 1;
                if *calls >= 2 {
                    Err(anyhow!("storage unavailable"))
                } else {
                    Ok(format!("https://cdn.example/{path}"))
                }
            }
        }

        let store = Arc::new(SqliteStore::open_in_memory().unwrap());
        let project = Project::new("user_1", "x", None);
        store.create_project(&project).unwrap();
        let mut session = BuilderSession::new(
            store,
            Arc::new(FailSecond { calls: Mutex::new(0) }),
            Box::new(Scripted { fragments: vec![], fail_with: None, cancel_at: None }),
            project,
            "gpt-4o-mini".into(),
            4000,
            Duration::ZERO,
        );

        let files = [
            PendingUpload { name: "a.png".into(), content_type: "image/png".into(), data: vec![1] },
            PendingUpload { name: "b.png".into(), content_type: "image/png".into(), data: vec![2] },
        ];
        let outcome = session.attach_files(&files, false);

        assert!(outcome.failed());
        assert_eq!(session.uploads().len(), 1);
        assert!(session.pending_prompt().is_none());
        assert!(session.transcript.last().unwrap().body.contains("uploading your files"));
    }
}
