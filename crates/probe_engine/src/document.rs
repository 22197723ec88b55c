use std::path::Path;

use bytes::Bytes;
use probe_core::FileMeta;

/// A document ready for upload: metadata plus the raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub meta: FileMeta,
    pub data: Bytes,
}

impl Document {
    pub fn new(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        let data = data.into();
        Self {
            meta: FileMeta::new(name, data.len() as u64, mime_type),
            data,
        }
    }

    /// Reads `path` and derives the MIME type from its extension.
    pub async fn from_path(path: &Path) -> std::io::Result<Self> {
        let data = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::new(name, mime_type_for_path(path), data))
    }
}

/// MIME type for the document extensions the API understands.
pub fn mime_type_for_path(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("pdf") => "application/pdf",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        _ => "application/octet-stream",
    }
}
