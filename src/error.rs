//! Error types and handling for the PDF protection pipeline
//! Author: kartik4905

use std::{io, result::Result as StdResult};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Custom result type for protection operations
pub type Result<T> = StdResult<T, Error>;

/// Core error type for protection operations
#[derive(Error, Debug)]
#[non_exhaustive]
#[allow(clippy::enum_variant_names)]
pub enum Error {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Validation error: {0}")]
    ValidationError(#[from] ValidationError),

    #[error("Selection rejected: {0}")]
    SelectionRejection(#[from] SelectionRejection),

    #[error("Backend error: {0}")]
    BackendError(#[from] BackendError),

    #[error("Delivery error: {0}")]
    DeliveryError(String),

    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    #[error("A protection request is already in progress")]
    Busy,
}

// -------------------- Sub-Error Categories --------------------

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationError {
    #[error("You must provide at least one password.")]
    NoPasswordProvided,

    #[error("Please select a PDF file: {0}")]
    NotAPdf(String),

    #[error("The selected document is empty")]
    EmptyDocument,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum SelectionRejection {
    #[error("An \"Open Password\" is required for ZIP encryption fallback.")]
    OpenPasswordRequiredForFallback,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum BackendError {
    #[error("Native encryption backend not loaded")]
    BackendUnavailable,

    #[error("PDF encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Failed to create ZIP file: {0}")]
    ArchiveCreationFailed(String),
}

/// Stable tag carried by a failed protection outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FailureKind {
    NoPasswordProvided,
    NotAPdf,
    EmptyDocument,
    OpenPasswordRequiredForFallback,
    EncryptionFailed,
    ArchiveCreationFailed,
}

impl From<&ValidationError> for FailureKind {
    fn from(err: &ValidationError) -> Self {
        match err {
            ValidationError::NoPasswordProvided => FailureKind::NoPasswordProvided,
            ValidationError::NotAPdf(_) => FailureKind::NotAPdf,
            ValidationError::EmptyDocument => FailureKind::EmptyDocument,
        }
    }
}

impl From<&SelectionRejection> for FailureKind {
    fn from(err: &SelectionRejection) -> Self {
        match err {
            SelectionRejection::OpenPasswordRequiredForFallback => {
                FailureKind::OpenPasswordRequiredForFallback
            }
        }
    }
}

impl From<&BackendError> for FailureKind {
    fn from(err: &BackendError) -> Self {
        match err {
            BackendError::BackendUnavailable | BackendError::EncryptionFailed(_) => {
                FailureKind::EncryptionFailed
            }
            BackendError::ArchiveCreationFailed(_) => FailureKind::ArchiveCreationFailed,
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FailureKind::NoPasswordProvided => "NoPasswordProvided",
            FailureKind::NotAPdf => "NotAPdf",
            FailureKind::EmptyDocument => "EmptyDocument",
            FailureKind::OpenPasswordRequiredForFallback => "OpenPasswordRequiredForFallback",
            FailureKind::EncryptionFailed => "EncryptionFailed",
            FailureKind::ArchiveCreationFailed => "ArchiveCreationFailed",
        };
        write!(f, "{}", name)
    }
}
