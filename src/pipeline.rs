//! PDF Protection Pipeline
//! Author: kartik4091
//! Created: 2025-06-05
//!
//! options → strategy → backend call → outcome. Native encryption is tried
//! first whenever its backend is available; a native failure is recovered
//! by re-selecting the archive fallback when the request allows it.

use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::{
    config::ProtectConfig,
    error::{SelectionRejection, ValidationError},
    security::{
        archive::{ArchiveCipher, ZipArchiver, STORE_ONLY},
        availability::BackendAvailability,
        encryption::{LopdfEncryptor, NativeEncryptor, UnavailableEncryptor},
        options::{ProtectionRequest, RawOptions},
        permissions::PrintPermission,
        strategy::{self, Strategy},
    },
    types::{Artifact, ArtifactKind, ProtectionOutcome, SourceDocument},
};

/// Backends the executor calls into, plus the resolved availability of the
/// native one.
#[derive(Clone)]
pub struct Backends {
    pub availability: BackendAvailability,
    pub native: Arc<dyn NativeEncryptor>,
    pub archive: Arc<dyn ArchiveCipher>,
}

impl Backends {
    /// Resolve the process-wide availability flag and build the matching
    /// backends from configuration.
    pub fn resolve(config: &ProtectConfig) -> Self {
        let availability =
            BackendAvailability::resolve_with(|| BackendAvailability::probe(!config.native.enabled))
                .clone();

        let native: Arc<dyn NativeEncryptor> = if availability.is_available() {
            Arc::new(LopdfEncryptor::from_config(&config.native))
        } else {
            Arc::new(UnavailableEncryptor)
        };

        Self {
            availability,
            native,
            archive: Arc::new(ZipArchiver::from_config(&config.archive)),
        }
    }
}

impl std::fmt::Debug for Backends {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Backends")
            .field("availability", &self.availability)
            .field("native", &self.native.name())
            .field("archive", &self.archive.name())
            .finish()
    }
}

/// Executor state transition after one backend call.
#[derive(Debug)]
enum Transition {
    Finished(ProtectionOutcome),
    /// Native path failed; continue with the re-selected strategy.
    Recover(Strategy),
}

#[derive(Debug)]
pub struct Pipeline {
    config: ProtectConfig,
    backends: Backends,
}

impl Pipeline {
    pub fn new(config: ProtectConfig) -> Self {
        let backends = Backends::resolve(&config);
        Self { config, backends }
    }

    pub fn with_backends(config: ProtectConfig, backends: Backends) -> Self {
        Self { config, backends }
    }

    pub fn backend_available(&self) -> bool {
        self.backends.availability.is_available()
    }

    /// Normalize raw options and apply operator permission settings. Pure.
    pub fn prepare(&self, options: &RawOptions) -> Result<ProtectionRequest, ValidationError> {
        let request = options.normalize()?;
        Ok(request.with_extra_permissions(
            self.config.native.allow_modify,
            self.config.native.allow_annotate,
        ))
    }

    /// Single entry point: one document and one set of options produce
    /// exactly one outcome.
    #[instrument(skip_all, fields(document = %document.name()))]
    pub async fn protect(&self, document: SourceDocument, options: &RawOptions) -> ProtectionOutcome {
        match self.prepare(options) {
            Ok(request) => self.protect_request(document, &request).await,
            Err(e) => {
                warn!("Rejected options: {}", e);
                e.into()
            }
        }
    }

    /// Protect with an already normalized request.
    #[instrument(skip_all, fields(document = %document.name()))]
    pub async fn protect_request(
        &self,
        document: SourceDocument,
        request: &ProtectionRequest,
    ) -> ProtectionOutcome {
        if let Err(e) = document.ensure_pdf() {
            warn!("Rejected document: {}", e);
            return e.into();
        }

        let selected = strategy::select(request, self.backend_available());
        info!("Selected strategy: {}", selected);

        self.execute(selected, &document, request).await
    }

    /// Run `initial`, following at most one recovery transition.
    pub async fn execute(
        &self,
        initial: Strategy,
        document: &SourceDocument,
        request: &ProtectionRequest,
    ) -> ProtectionOutcome {
        let mut current = initial;
        loop {
            let transition = match current {
                Strategy::NativeEncryption => self.run_native(document, request).await,
                Strategy::ArchiveFallback => {
                    Transition::Finished(self.run_archive(document, request).await)
                }
                Strategy::Reject(reason) => Transition::Finished(reason.into()),
            };

            match transition {
                Transition::Finished(outcome) => return outcome,
                Transition::Recover(next) => {
                    info!("Re-selected strategy: {}", next);
                    current = next;
                }
            }
        }
    }

    async fn run_native(&self, document: &SourceDocument, request: &ProtectionRequest) -> Transition {
        info!("Encrypting with native backend ({})", self.backends.native.name());

        let result = self
            .backends
            .native
            .encrypt(
                document.bytes(),
                request.user_password(),
                request.effective_owner_password(),
                request.permissions(),
            )
            .await;

        match result {
            Ok(bytes) => Transition::Finished(success(document, bytes, ArtifactKind::NativeEncryptedDocument)),
            Err(e) => {
                warn!("Native encryption failed: {}. Falling back to ZIP encryption.", e);
                // Only the archive can follow; it never re-enters the native path.
                Transition::Recover(strategy::fallback_for(request))
            }
        }
    }

    async fn run_archive(&self, document: &SourceDocument, request: &ProtectionRequest) -> ProtectionOutcome {
        let Some(password) = request.open_password() else {
            return SelectionRejection::OpenPasswordRequiredForFallback.into();
        };

        let perms = request.permissions();
        if request.owner_password().is_some() || perms.copy || perms.print == PrintPermission::Full {
            warn!("Archive fallback does not carry the owner password or print/copy permissions");
        }

        info!("Using password-protected ZIP fallback ({})", self.backends.archive.name());

        match self
            .backends
            .archive
            .create_protected_archive(document.bytes(), document.name(), password, STORE_ONLY)
            .await
        {
            Ok(bytes) => success(document, bytes, ArtifactKind::PasswordProtectedArchive),
            Err(e) => {
                warn!("{}", e);
                e.into()
            }
        }
    }
}

fn success(document: &SourceDocument, bytes: Vec<u8>, kind: ArtifactKind) -> ProtectionOutcome {
    ProtectionOutcome::Success(Artifact {
        bytes,
        kind,
        suggested_filename: kind.file_name_for(document.basename()),
    })
}
