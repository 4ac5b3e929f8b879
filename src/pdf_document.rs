//! PDF document preview
//! Created: 2025-06-03
//! Author: kartik4905
//!
//! Page counting is decorative: any parse failure degrades to
//! [`PageCount::Unknown`] and never blocks protection.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::{PageCount, SourceDocument};

/// Summary shown to the user after a document is selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentPreview {
    pub name: String,
    pub size: usize,
    pub page_count: PageCount,
}

impl DocumentPreview {
    pub fn of(document: &SourceDocument) -> Self {
        Self {
            name: document.name().to_string(),
            size: document.len(),
            page_count: page_count(document.bytes()),
        }
    }
}

/// Count pages with lopdf.
pub fn page_count(bytes: &[u8]) -> PageCount {
    match lopdf::Document::load_mem(bytes) {
        Ok(doc) => {
            let pages = doc.get_pages().len();
            u32::try_from(pages)
                .map(PageCount::Known)
                .unwrap_or(PageCount::Unknown)
        }
        Err(e) => {
            debug!("Error getting page count: {}", e);
            PageCount::Unknown
        }
    }
}
