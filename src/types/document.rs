use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidationError};

/// Magic bytes every PDF file starts with.
pub const PDF_HEADER: &[u8] = b"%PDF-";

/// Immutable document buffer selected for protection.
///
/// The buffer is read once and never mutated; the pipeline run that receives
/// it owns it exclusively and drops it when the run completes.
#[derive(Clone)]
pub struct SourceDocument {
    name: String,
    bytes: Vec<u8>,
}

impl SourceDocument {
    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// Reads a document from disk. The display name is the file name component.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document.pdf".to_string());
        Ok(Self { name, bytes })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Rejects empty buffers and content lacking a PDF header.
    pub fn ensure_pdf(&self) -> std::result::Result<(), ValidationError> {
        if self.bytes.is_empty() {
            return Err(ValidationError::EmptyDocument);
        }
        if !self.bytes.starts_with(PDF_HEADER) {
            return Err(ValidationError::NotAPdf(self.name.clone()));
        }
        Ok(())
    }

    /// Display name with the last extension removed.
    pub fn basename(&self) -> &str {
        strip_extension(&self.name)
    }
}

// Passwords and document contents stay out of logs; only sizes are shown.
impl fmt::Debug for SourceDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceDocument")
            .field("name", &self.name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Removes the last `.ext` from a file name. A name whose only dot is the
/// leading one (`.pdf`) or that has no dot at all is returned unchanged.
pub fn strip_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(0) | None => name,
        Some(idx) => &name[..idx],
    }
}

/// Page count shown in the document preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageCount {
    Known(u32),
    Unknown,
}

impl fmt::Display for PageCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageCount::Known(n) => write!(f, "{}", n),
            PageCount::Unknown => write!(f, "Could not read page count."),
        }
    }
}
