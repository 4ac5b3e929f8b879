//! Configuration types and validation for the protection pipeline
//! Author: kartik4091
//! Created: 2025-06-03

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Cipher used by native PDF encryption
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NativeCipher {
    /// Security handler revision 4, AESV2 crypt filter
    #[default]
    Aes128,
    /// Security handler revision 3, 128-bit RC4
    Rc4_128,
}

/// WinZip AES strength used for the archive fallback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArchiveCipher {
    Aes128,
    #[default]
    Aes256,
}

/// Native encryption backend settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NativeConfig {
    pub enabled: bool,
    pub cipher: NativeCipher,
    pub encrypt_metadata: bool,
    pub allow_modify: bool,
    pub allow_annotate: bool,
}

/// Archive fallback settings. Archives are always store-only.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchiveConfig {
    pub cipher: ArchiveCipher,
}

/// Artifact delivery settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory protected artifacts are written to; the source document's
    /// directory when unset.
    pub directory: Option<PathBuf>,
    pub force_overwrite: bool,
}

/// Global protection config
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProtectConfig {
    pub native: NativeConfig,
    pub archive: ArchiveConfig,
    pub output: OutputConfig,
}

impl Default for NativeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            cipher: NativeCipher::default(),
            encrypt_metadata: true,
            allow_modify: true,
            allow_annotate: true,
        }
    }
}

impl ProtectConfig {
    /// Load from a JSON or YAML file. JSON is tried first.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            Error::ConfigError(format!("Failed to read config file {}: {}", path.display(), e))
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: ProtectConfig = serde_json::from_str(content)
            .or_else(|_| serde_yaml::from_str(content))
            .map_err(|e| Error::ConfigError(format!("Config parsing error: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(dir) = &self.output.directory {
            if dir.exists() && !dir.is_dir() {
                return Err(Error::ConfigError(format!(
                    "Output path is not a directory: {}",
                    dir.display()
                )));
            }
        }
        Ok(())
    }
}
