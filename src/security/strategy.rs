//! Protection strategy selection

use std::fmt;

use crate::error::SelectionRejection;
use crate::security::options::ProtectionRequest;

/// Protection path chosen for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Native PDF encryption with open/owner passwords and permission flags.
    NativeEncryption,
    /// Store-only encrypted archive holding the unmodified document.
    ArchiveFallback,
    Reject(SelectionRejection),
}

impl Strategy {
    pub fn is_backend_call(&self) -> bool {
        !matches!(self, Strategy::Reject(_))
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::NativeEncryption => write!(f, "native-encryption"),
            Strategy::ArchiveFallback => write!(f, "archive-fallback"),
            Strategy::Reject(reason) => write!(f, "reject ({})", reason),
        }
    }
}

/// Pick a strategy. First match wins:
/// 1. native backend available
/// 2. open password present, archive can enforce it
/// 3. reject, the archive has no owner/permission concept
pub fn select(request: &ProtectionRequest, backend_available: bool) -> Strategy {
    if backend_available {
        return Strategy::NativeEncryption;
    }
    fallback_for(request)
}

/// Strategy to use once native encryption is off the table, either because
/// the backend is unavailable or because it failed.
pub fn fallback_for(request: &ProtectionRequest) -> Strategy {
    if request.has_open_password() {
        Strategy::ArchiveFallback
    } else {
        Strategy::Reject(SelectionRejection::OpenPasswordRequiredForFallback)
    }
}
