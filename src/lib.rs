//! Main Library File for PDF Password Protection
//! Protects a PDF either with native document encryption (open/owner
//! passwords and permission flags) or, when that backend is unavailable or
//! fails, with a password-protected store-only archive of the original.

// Configuration and Core Pipeline
pub mod config;
pub mod error;
pub mod pipeline;
pub mod session;
pub mod types;

// Document intake and preview
pub mod pdf_document;

// Options, strategy selection and backends
pub mod security;

// Outcome reporting and artifact delivery
pub mod report;

// Shared Utilities
pub mod hash_utils;
pub mod utils;

// Re-exports for crate consumers
pub use config::ProtectConfig;
pub use error::{Error, FailureKind, Result};
pub use pdf_document::DocumentPreview;
pub use pipeline::{Backends, Pipeline};
pub use report::{DirectorySink, Report, Reporter};
pub use security::{BackendAvailability, ProtectionRequest, RawOptions, RawPermissions, Strategy};
pub use session::Session;
pub use types::{Artifact, ArtifactKind, ProtectionOutcome, SourceDocument};
