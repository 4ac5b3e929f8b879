//! Password-protected archive backend
//!
//! Wraps the unmodified document in a single-entry ZIP archive. Entries are
//! stored without compression and encrypted with WinZip AES.

use std::io::{Cursor, Write};

use async_trait::async_trait;
use tracing::{debug, info};
use zip::write::SimpleFileOptions;
use zip::{AesMode, CompressionMethod, ZipWriter};

use crate::config::{ArchiveCipher as ArchiveCipherMode, ArchiveConfig};
use crate::error::BackendError;

/// Store-only. PDF payloads are already dense, compressing them before
/// encryption only costs CPU.
pub const STORE_ONLY: u32 = 0;

#[async_trait]
pub trait ArchiveCipher: Send + Sync {
    async fn create_protected_archive(
        &self,
        bytes: &[u8],
        entry_name: &str,
        password: &str,
        compression_level: u32,
    ) -> Result<Vec<u8>, BackendError>;

    fn name(&self) -> &'static str;
}

#[derive(Debug, Clone, Default)]
pub struct ZipArchiver {
    mode: ArchiveCipherMode,
}

impl ZipArchiver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &ArchiveConfig) -> Self {
        Self { mode: config.cipher }
    }

    fn aes_mode(&self) -> AesMode {
        match self.mode {
            ArchiveCipherMode::Aes128 => AesMode::Aes128,
            ArchiveCipherMode::Aes256 => AesMode::Aes256,
        }
    }

    fn build(
        &self,
        bytes: &[u8],
        entry_name: &str,
        password: &str,
        compression_level: u32,
    ) -> Result<Vec<u8>, BackendError> {
        if compression_level != STORE_ONLY {
            return Err(BackendError::ArchiveCreationFailed(format!(
                "unsupported compression level {}, archives are store-only",
                compression_level
            )));
        }
        if password.is_empty() {
            return Err(BackendError::ArchiveCreationFailed(
                "password must not be empty".into(),
            ));
        }
        if entry_name.is_empty() {
            return Err(BackendError::ArchiveCreationFailed(
                "entry name must not be empty".into(),
            ));
        }

        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Stored)
            .with_aes_encryption(self.aes_mode(), password);

        let mut writer = ZipWriter::new(Cursor::new(Vec::with_capacity(bytes.len() + 256)));
        writer.start_file(entry_name, options).map_err(archive_error)?;
        writer.write_all(bytes).map_err(archive_error)?;
        let cursor = writer.finish().map_err(archive_error)?;

        Ok(cursor.into_inner())
    }
}

fn archive_error<E: std::fmt::Display>(err: E) -> BackendError {
    BackendError::ArchiveCreationFailed(err.to_string())
}

#[async_trait]
impl ArchiveCipher for ZipArchiver {
    async fn create_protected_archive(
        &self,
        bytes: &[u8],
        entry_name: &str,
        password: &str,
        compression_level: u32,
    ) -> Result<Vec<u8>, BackendError> {
        debug!("Creating {:?} archive entry '{}'", self.mode, entry_name);
        let archive = self.build(bytes, entry_name, password, compression_level)?;
        info!("Archive created: {} bytes", archive.len());
        Ok(archive)
    }

    fn name(&self) -> &'static str {
        "zip"
    }
}
