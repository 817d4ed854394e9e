use chrono::Utc;
use fs_err as fs;
use std::path::Path;

use crate::storage::BlobStorage;

/// Declared content types the builder accepts.
const ALLOWED_TYPES: &[&str] = &[
    "image/png",
    "image/jpeg",
    "image/jpg",
    "image/gif",
    "image/webp",
    "image/svg+xml",
    "application/zip",
    "application/x-zip-compressed",
    "application/x-zip",
    "text/html",
    "text/css",
    "text/javascript",
    "application/javascript",
    "application/json",
    "text/plain",
    "application/pdf",
];

const ALLOWED_SUFFIXES: &[&str] = &[".zip", ".html", ".css", ".js"];

#[derive(Debug, Clone)]
pub struct PendingUpload {
    pub name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

impl PendingUpload {
    /// Reads a file from disk, inferring the declared type from its
    /// extension the way a browser would populate it.
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let data = fs::read(path)?;
        Ok(Self { content_type: guess_content_type(&name), name, data })
    }
}

pub fn guess_content_type(name: &str) -> String {
    let ext = name.rsplit('.').next().unwrap_or("").to_lowercase();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "zip" => "application/zip",
        "html" | "htm" => "text/html",
        "css" => "text/css",
        "js" => "text/javascript",
        "json" => "application/json",
        "txt" => "text/plain",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
    .to_string()
}

/// One stored attachment, recorded for the session after a successful
/// upload.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    pub content_type: String,
    pub public_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Image,
    Archive,
    Code,
    Other,
}

pub fn is_supported(name: &str, content_type: &str) -> bool {
    ALLOWED_TYPES.contains(&content_type)
        || ALLOWED_SUFFIXES.iter().any(|suffix| name.ends_with(suffix))
}

/// First-match classification, priority image > archive > code.
pub fn kind_of(name: &str, content_type: &str) -> FileKind {
    if content_type.starts_with("image/") {
        FileKind::Image
    } else if content_type.contains("zip") || name.ends_with(".zip") {
        FileKind::Archive
    } else if content_type.contains("html")
        || content_type.contains("css")
        || content_type.contains("javascript")
        || name.ends_with(".html")
        || name.ends_with(".css")
        || name.ends_with(".js")
    {
        FileKind::Code
    } else {
        FileKind::Other
    }
}

#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub accepted: Vec<UploadedFile>,
    pub skipped: Vec<String>,
    pub error: Option<String>,
}

impl BatchOutcome {
    pub fn failed(&self) -> bool {
        self.error.is_some()
    }
}

/// Stores a batch sequentially. Unsupported files are skipped without
/// aborting the rest; a storage failure stops the batch but everything
/// accepted up to that point stays recorded.
pub fn upload_batch(
    storage: &dyn BlobStorage,
    user_id: &str,
    files: &[PendingUpload],
    debug: bool,
) -> BatchOutcome {
    let mut outcome = BatchOutcome::default();

    for file in files {
        if !is_supported(&file.name, &file.content_type) {
            if debug {
                eprintln!("debug[uploads]: unsupported file type: {}", file.content_type);
            }
            outcome.skipped.push(file.name.clone());
            continue;
        }

        let path = format!(
            "uploads/{}/{}-{}",
            user_id,
            Utc::now().timestamp_millis(),
            file.name
        );
        match storage.upload(&file.data, &path, true) {
            Ok(public_url) => outcome.accepted.push(UploadedFile {
                name: file.name.clone(),
                content_type: file.content_type.clone(),
                public_url,
            }),
            Err(e) => {
                outcome.error = Some(e.to_string());
                break;
            }
        }
    }

    outcome
}
