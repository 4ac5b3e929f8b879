//! Native PDF encryption backend
//!
//! Writes a standard security handler into the document so the open and
//! owner passwords and the permission flags travel inside the PDF itself.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use lopdf::encryption::crypt_filters::{Aes128CryptFilter, CryptFilter};
use lopdf::{Document, EncryptionState, EncryptionVersion, Object, StringFormat};
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::config::{NativeCipher, NativeConfig};
use crate::error::BackendError;
use crate::security::permissions::Permissions;

const STD_CRYPT_FILTER: &[u8] = b"StdCF";

/// Native encryption capability. Implementations may be absent at runtime,
/// in which case every call fails with [`BackendError::BackendUnavailable`].
#[async_trait]
pub trait NativeEncryptor: Send + Sync {
    async fn encrypt(
        &self,
        bytes: &[u8],
        user_password: &str,
        owner_password: &str,
        permissions: &Permissions,
    ) -> Result<Vec<u8>, BackendError>;

    fn name(&self) -> &'static str;
}

/// lopdf-backed encryptor
#[derive(Debug, Clone)]
pub struct LopdfEncryptor {
    cipher: NativeCipher,
    encrypt_metadata: bool,
}

impl LopdfEncryptor {
    pub fn new() -> Self {
        Self::from_config(&NativeConfig::default())
    }

    pub fn from_config(config: &NativeConfig) -> Self {
        Self {
            cipher: config.cipher,
            encrypt_metadata: config.encrypt_metadata,
        }
    }

    fn encrypt_sync(
        &self,
        bytes: &[u8],
        user_password: &str,
        owner_password: &str,
        permissions: &Permissions,
    ) -> Result<Vec<u8>, BackendError> {
        let mut doc = Document::load_mem(bytes)
            .map_err(|e| BackendError::EncryptionFailed(format!("cannot parse PDF: {}", e)))?;

        if doc.is_encrypted() {
            return Err(BackendError::EncryptionFailed(
                "document is already encrypted".into(),
            ));
        }

        ensure_document_id(&mut doc, bytes);

        let flags = permissions.to_pdf_flags();
        debug!("Encrypting with {:?}, P={:?}", self.cipher, flags);

        let version = match self.cipher {
            NativeCipher::Aes128 => {
                let crypt_filter: Arc<dyn CryptFilter> = Arc::new(Aes128CryptFilter);
                EncryptionVersion::V4 {
                    document: &doc,
                    encrypt_metadata: self.encrypt_metadata,
                    crypt_filters: BTreeMap::from([(STD_CRYPT_FILTER.to_vec(), crypt_filter)]),
                    stream_filter: STD_CRYPT_FILTER.to_vec(),
                    string_filter: STD_CRYPT_FILTER.to_vec(),
                    owner_password,
                    user_password,
                    permissions: flags,
                }
            }
            NativeCipher::Rc4_128 => EncryptionVersion::V2 {
                document: &doc,
                owner_password,
                user_password,
                key_length: 128,
                permissions: flags,
            },
        };

        let state = EncryptionState::try_from(version)
            .map_err(|e| BackendError::EncryptionFailed(format!("cannot derive keys: {}", e)))?;

        doc.encrypt(&state)
            .map_err(|e| BackendError::EncryptionFailed(e.to_string()))?;

        let mut output = Vec::with_capacity(bytes.len());
        doc.save_to(&mut output)
            .map_err(|e| BackendError::EncryptionFailed(format!("cannot serialize PDF: {}", e)))?;

        Ok(output)
    }
}

/// Key derivation for revisions 2-4 reads the first `/ID` string. Documents
/// without one get a stable identifier derived from their content.
fn ensure_document_id(doc: &mut Document, bytes: &[u8]) {
    if doc.trailer.get(b"ID").is_ok() {
        return;
    }
    let digest = Sha256::digest(bytes);
    let id = digest[..16].to_vec();
    debug!("Document has no /ID, assigning {}", hex::encode(&id));
    doc.trailer.set(
        "ID",
        Object::Array(vec![
            Object::String(id.clone(), StringFormat::Hexadecimal),
            Object::String(id, StringFormat::Hexadecimal),
        ]),
    );
}

impl Default for LopdfEncryptor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NativeEncryptor for LopdfEncryptor {
    async fn encrypt(
        &self,
        bytes: &[u8],
        user_password: &str,
        owner_password: &str,
        permissions: &Permissions,
    ) -> Result<Vec<u8>, BackendError> {
        let output = self.encrypt_sync(bytes, user_password, owner_password, permissions)?;
        info!("Native encryption produced {} bytes", output.len());
        Ok(output)
    }

    fn name(&self) -> &'static str {
        "lopdf"
    }
}

/// Stand-in for a backend that is not loaded.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableEncryptor;

#[async_trait]
impl NativeEncryptor for UnavailableEncryptor {
    async fn encrypt(
        &self,
        _bytes: &[u8],
        _user_password: &str,
        _owner_password: &str,
        _permissions: &Permissions,
    ) -> Result<Vec<u8>, BackendError> {
        Err(BackendError::BackendUnavailable)
    }

    fn name(&self) -> &'static str {
        "unavailable"
    }
}
