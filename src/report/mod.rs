//! Result reporting for the protection pipeline
//! Author: kartik4091
//! Created: 2025-06-05
//!
//! Turns an outcome, or an unexpected error, into one authoritative status
//! and delivers the artifact on success.

use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::error::{FailureKind, Result};
use crate::hash_utils::sha256_hex;
use crate::types::{Artifact, ArtifactKind, ProtectionOutcome};

pub mod control;
pub mod delivery;
pub mod formatter;

pub use control::{ControlGuard, ProtectControl};
pub use delivery::{ArtifactSink, DirectorySink, MemorySink};
pub use formatter::{ReportFormat, ReportFormatter};

/// Status severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusLevel {
    Info,
    Success,
    Error,
}

/// User-facing status line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    pub level: StatusLevel,
    pub message: String,
    pub timestamp: String,
}

impl Status {
    pub fn new(level: StatusLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(StatusLevel::Info, message)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(StatusLevel::Success, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(StatusLevel::Error, message)
    }
}

/// Delivered artifact details
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveredArtifact {
    pub path: PathBuf,
    pub kind: ArtifactKind,
    pub size: usize,
    pub sha256: String,
}

/// Final report of one protection run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Informational statuses emitted before the final one.
    #[serde(default)]
    pub progress: Vec<Status>,
    pub status: Status,
    pub failure: Option<FailureKind>,
    pub delivered: Option<DeliveredArtifact>,
}

impl Report {
    pub fn is_success(&self) -> bool {
        self.status.level == StatusLevel::Success
    }

    /// Put `earlier` statuses ahead of the ones already recorded.
    pub fn with_progress(mut self, mut earlier: Vec<Status>) -> Self {
        earlier.append(&mut self.progress);
        self.progress = earlier;
        self
    }

    fn failed(message: impl Into<String>, failure: Option<FailureKind>) -> Self {
        Self {
            progress: Vec::new(),
            status: Status::error(message),
            failure,
            delivered: None,
        }
    }
}

pub struct Reporter {
    sink: Arc<dyn ArtifactSink>,
}

impl Reporter {
    pub fn new(sink: Arc<dyn ArtifactSink>) -> Self {
        Self { sink }
    }

    /// Report a pipeline result. Modeled failures and unexpected errors both
    /// end in an error status; nothing is delivered for either.
    pub async fn report(&self, result: Result<ProtectionOutcome>) -> Report {
        match result {
            Ok(ProtectionOutcome::Success(artifact)) => self.deliver(artifact).await,
            Ok(ProtectionOutcome::Failure(failure)) => {
                error!("❌ {}", failure);
                Report::failed(failure.message, Some(failure.kind))
            }
            Err(e) => {
                error!("❌ Protection failed: {}", e);
                Report::failed(format!("Protection failed: {}", e), None)
            }
        }
    }

    async fn deliver(&self, artifact: Artifact) -> Report {
        let Artifact {
            bytes,
            kind,
            suggested_filename,
        } = artifact;

        match self.sink.deliver(&suggested_filename, &bytes).await {
            Ok(path) => {
                info!("✅ {} successful, saved {}", kind, path.display());
                let mut progress = Vec::new();
                if kind == ArtifactKind::PasswordProtectedArchive {
                    progress.push(Status::info("Using password-protected ZIP fallback..."));
                }
                Report {
                    progress,
                    status: Status::success(format!("{} successful! Saved to {}", kind, path.display())),
                    failure: None,
                    delivered: Some(DeliveredArtifact {
                        path,
                        kind,
                        size: bytes.len(),
                        sha256: sha256_hex(&bytes),
                    }),
                }
            }
            Err(e) => {
                error!("❌ Failed to deliver {}: {}", suggested_filename, e);
                Report::failed(format!("Failed to save {}: {}", suggested_filename, e), None)
            }
        }
    }
}

impl std::fmt::Debug for Reporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reporter").finish_non_exhaustive()
    }
}
