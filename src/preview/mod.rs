use anyhow::{Context, Result};
use fs_err as fs;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Minimum accumulator length before a document with no recognizable tags
/// is considered renderable.
const MIN_RENDER_LEN: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Device {
    Mobile,
    Tablet,
    Desktop,
}

impl Device {
    /// Logical viewport of the preview container; `None` means fill the
    /// window.
    pub fn viewport(self) -> Option<(u32, u32)> {
        match self {
            Device::Mobile => Some((375, 667)),
            Device::Tablet => Some((768, 1024)),
            Device::Desktop => None,
        }
    }
}

/// Partial streams flash broken markup if rendered too eagerly; hold off
/// until the accumulator plausibly looks like a document.
pub fn looks_renderable(html: &str) -> bool {
    let trimmed = html.trim();
    if trimmed.is_empty() {
        return false;
    }
    trimmed.contains("<html") || trimmed.contains("<body") || trimmed.len() > MIN_RENDER_LEN
}

/// Isolated rendering surface. Each call replaces the surface contents
/// wholesale; there is no incremental patching.
pub trait RenderSurface {
    fn replace(&mut self, document: &str, device: Device) -> Result<()>;
}

/// Writes a host page embedding the document in a sandboxed iframe. Scripts
/// run isolated from the host; styles, forms, pop-ups and modals stay
/// enabled for a realistic preview.
pub struct FileSurface {
    path: PathBuf,
}

impl FileSurface {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn escape_attr(s: &str) -> String {
    s.replace('&', "&amp;").replace('"', "&quot;").replace('<', "&lt;")
}

pub fn host_page(document: &str, device: Device) -> String {
    let dims = match device.viewport() {
        Some((w, h)) => format!("width: {w}px; height: {h}px;"),
        None => "width: 100%; height: 100vh;".to_string(),
    };
    format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>Preview</title></head>
<body style="margin:0;display:flex;justify-content:center;background:#f4f4f5;">
<iframe style="{dims} border:0;"
        sandbox="allow-scripts allow-same-origin allow-forms allow-popups allow-modals"
        srcdoc="{srcdoc}"></iframe>
</body>
</html>
"#,
        dims = dims,
        srcdoc = escape_attr(document),
    )
}

impl RenderSurface for FileSurface {
    fn replace(&mut self, document: &str, device: Device) -> Result<()> {
        let parent = self.path.parent().unwrap_or(Path::new("."));
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
        let tmp = NamedTempFile::new_in(parent)?;
        fs::write(tmp.path(), host_page(document, device))?;
        tmp.persist(&self.path)
            .with_context(|| format!("failed to write preview at {}", self.path.display()))?;
        Ok(())
    }
}

/// Live preview state: gates the first render behind the plausibility
/// heuristic, remembers the last rendered content, and re-renders on
/// refresh or device change.
pub struct PreviewPane {
    surface: Box<dyn RenderSurface + Send>,
    device: Device,
    last: Option<String>,
}

impl PreviewPane {
    pub fn new(surface: Box<dyn RenderSurface + Send>) -> Self {
        Self { surface, device: Device::Desktop, last: None }
    }

    pub fn device(&self) -> Device {
        self.device
    }

    /// Device emulation changes the container viewport only; the content is
    /// re-rendered unchanged.
    pub fn set_device(&mut self, device: Device) -> Result<()> {
        self.device = device;
        if let Some(content) = self.last.clone() {
            self.surface.replace(&content, device)?;
        }
        Ok(())
    }

    /// Called on every fragment with the full accumulator.
    pub fn update(&mut self, accumulator: &str) -> Result<()> {
        if !looks_renderable(accumulator) {
            return Ok(());
        }
        self.surface.replace(accumulator, self.device)?;
        self.last = Some(accumulator.to_string());
        Ok(())
    }

    /// Re-renders the last known content, preferring the in-memory copy
    /// over the persisted document.
    pub fn refresh(&mut self, persisted: Option<&str>) -> Result<()> {
        let content = match self.last.clone().or_else(|| persisted.map(str::to_string)) {
            Some(c) => c,
            None => return Ok(()),
        };
        self.surface.replace(&content, self.device)?;
        self.last = Some(content);
        Ok(())
    }
}
