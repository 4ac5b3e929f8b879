use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{BackendError, FailureKind, SelectionRejection, ValidationError};

/// Kind of artifact a successful run produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArtifactKind {
    NativeEncryptedDocument,
    PasswordProtectedArchive,
}

impl ArtifactKind {
    /// Suffix that replaces the source document's extension.
    pub fn suffix(&self) -> &'static str {
        match self {
            ArtifactKind::NativeEncryptedDocument => ".protected.pdf",
            ArtifactKind::PasswordProtectedArchive => ".protected.zip",
        }
    }

    pub fn file_name_for(&self, basename: &str) -> String {
        format!("{}{}", basename, self.suffix())
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactKind::NativeEncryptedDocument => write!(f, "PDF encryption"),
            ArtifactKind::PasswordProtectedArchive => write!(f, "ZIP creation"),
        }
    }
}

/// Protected bytes ready for delivery.
#[derive(Clone, PartialEq, Eq)]
pub struct Artifact {
    pub bytes: Vec<u8>,
    pub kind: ArtifactKind,
    pub suggested_filename: String,
}

impl fmt::Debug for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Artifact")
            .field("kind", &self.kind)
            .field("suggested_filename", &self.suggested_filename)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Modeled failure of a protection run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub kind: FailureKind,
    pub message: String,
}

impl Failure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl From<ValidationError> for Failure {
    fn from(err: ValidationError) -> Self {
        Failure::new(FailureKind::from(&err), err.to_string())
    }
}

impl From<SelectionRejection> for Failure {
    fn from(err: SelectionRejection) -> Self {
        Failure::new(FailureKind::from(&err), err.to_string())
    }
}

impl From<BackendError> for Failure {
    fn from(err: BackendError) -> Self {
        Failure::new(FailureKind::from(&err), err.to_string())
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

/// Result of one protection run: exactly one per document/request pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtectionOutcome {
    Success(Artifact),
    Failure(Failure),
}

impl ProtectionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ProtectionOutcome::Success(_))
    }

    pub fn artifact(&self) -> Option<&Artifact> {
        match self {
            ProtectionOutcome::Success(artifact) => Some(artifact),
            ProtectionOutcome::Failure(_) => None,
        }
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            ProtectionOutcome::Success(_) => None,
            ProtectionOutcome::Failure(failure) => Some(failure.kind),
        }
    }

    /// Discriminant used to compare runs: same kind of artifact or same failure tag.
    pub fn kind_tag(&self) -> OutcomeTag {
        match self {
            ProtectionOutcome::Success(a) => OutcomeTag::Success(a.kind),
            ProtectionOutcome::Failure(f) => OutcomeTag::Failure(f.kind),
        }
    }
}

impl From<Failure> for ProtectionOutcome {
    fn from(failure: Failure) -> Self {
        ProtectionOutcome::Failure(failure)
    }
}

impl From<ValidationError> for ProtectionOutcome {
    fn from(err: ValidationError) -> Self {
        ProtectionOutcome::Failure(err.into())
    }
}

impl From<SelectionRejection> for ProtectionOutcome {
    fn from(err: SelectionRejection) -> Self {
        ProtectionOutcome::Failure(err.into())
    }
}

impl From<BackendError> for ProtectionOutcome {
    fn from(err: BackendError) -> Self {
        ProtectionOutcome::Failure(err.into())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutcomeTag {
    Success(ArtifactKind),
    Failure(FailureKind),
}
