//! Inline file parts sent to the extraction API.

use anyhow::{Context, Result, bail};
use base64::Engine;
use std::path::Path;

/// One document part, base64-encoded for inline transport.
#[derive(Debug, Clone, PartialEq)]
pub struct FilePart {
    pub mime_type: String,
    /// Base64-encoded file bytes.
    pub data: String,
}

impl FilePart {
    pub fn new(mime_type: impl Into<String>, bytes: &[u8]) -> Self {
        let b64 = base64::engine::general_purpose::STANDARD;
        Self {
            mime_type: mime_type.into(),
            data: b64.encode(bytes),
        }
    }

    /// Read a statement file from disk, inferring the mime type from its
    /// extension. PDFs are passed through whole; page rendering is the
    /// document viewer's job, not ours.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        let mime_type = match ext.as_str() {
            "jpg" | "jpeg" => "image/jpeg",
            "png" => "image/png",
            "webp" => "image/webp",
            "pdf" => "application/pdf",
            other => bail!("unsupported statement file type: .{other} (use jpg, png, webp, or pdf)"),
        };

        let bytes =
            std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        Ok(Self::new(mime_type, &bytes))
    }
}
