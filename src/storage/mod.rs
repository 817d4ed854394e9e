use anyhow::{Context, Result};
use fs_err as fs;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use crate::errors::SmithError;

/// Object-storage collaborator: a blob plus a path in, a publicly
/// resolvable URL out.
pub trait BlobStorage: Send + Sync {
    fn upload(&self, data: &[u8], path: &str, overwrite: bool) -> Result<String>;
}

/// Directory-backed store. Blobs land under `root` and resolve to
/// `{public_base}/{path}`.
pub struct LocalStorage {
    root: PathBuf,
    public_base: String,
}

impl LocalStorage {
    pub fn new(root: impl Into<PathBuf>, public_base: impl Into<String>) -> Self {
        let mut public_base = public_base.into();
        while public_base.ends_with('/') {
            public_base.pop();
        }
        Self { root: root.into(), public_base }
    }

    fn blob_path(&self, path: &str) -> PathBuf {
        self.root.join(path.trim_start_matches('/'))
    }
}

impl BlobStorage for LocalStorage {
    fn upload(&self, data: &[u8], path: &str, overwrite: bool) -> Result<String> {
        let abs = self.blob_path(path);
        if !overwrite && abs.exists() {
            return Err(SmithError::Storage(format!("blob already exists at {path}")).into());
        }
        let parent = abs.parent().unwrap_or(Path::new("."));
        fs::create_dir_all(parent)?;
        let tmp = NamedTempFile::new_in(parent)?;
        fs::write(tmp.path(), data)?;
        tmp.persist(&abs)
            .with_context(|| format!("failed to persist blob at {}", abs.display()))?;
        Ok(format!("{}/{}", self.public_base, path.trim_start_matches('/')))
    }
}
