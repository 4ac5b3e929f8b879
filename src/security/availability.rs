//! Process-wide availability of the native encryption backend.
//!
//! Resolved exactly once, on first use, and read-only afterwards. The
//! pipeline takes the resolved value by injection so callers and tests can
//! supply their own.

use std::env;
use std::fmt;
use std::sync::OnceLock;

use tracing::{debug, info};

/// Environment variable that switches native encryption off for the process.
pub const DISABLE_NATIVE_ENV: &str = "PDFLOCK_DISABLE_NATIVE";

static NATIVE_BACKEND: OnceLock<BackendAvailability> = OnceLock::new();

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendAvailability {
    Available,
    Unavailable(String),
}

impl BackendAvailability {
    pub fn is_available(&self) -> bool {
        matches!(self, BackendAvailability::Available)
    }

    /// Resolve the process-wide flag with `probe`, or return the value an
    /// earlier call already resolved. `probe` runs at most once per process.
    pub fn resolve_with<F>(probe: F) -> &'static BackendAvailability
    where
        F: FnOnce() -> BackendAvailability,
    {
        NATIVE_BACKEND.get_or_init(|| {
            let resolved = probe();
            info!("Native encryption backend: {}", resolved);
            resolved
        })
    }

    /// Process-wide flag, resolving it with the default probe on first use.
    pub fn current() -> &'static BackendAvailability {
        Self::resolve_with(|| Self::probe(false))
    }

    /// Inspect the build and the environment. `disabled_by_config` lets the
    /// configuration file switch the backend off.
    pub fn probe(disabled_by_config: bool) -> BackendAvailability {
        if !cfg!(feature = "native-encryption") {
            return BackendAvailability::Unavailable(
                "built without the native-encryption feature".into(),
            );
        }
        if disabled_by_config {
            return BackendAvailability::Unavailable("disabled by configuration".into());
        }
        match env::var(DISABLE_NATIVE_ENV) {
            Ok(value) if is_truthy(&value) => {
                debug!("{} is set, native backend switched off", DISABLE_NATIVE_ENV);
                BackendAvailability::Unavailable(format!("disabled by {}", DISABLE_NATIVE_ENV))
            }
            _ => BackendAvailability::Available,
        }
    }
}

fn is_truthy(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "" | "0" | "false" | "no" | "off"
    )
}

impl fmt::Display for BackendAvailability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendAvailability::Available => write!(f, "available"),
            BackendAvailability::Unavailable(reason) => write!(f, "unavailable ({})", reason),
        }
    }
}
