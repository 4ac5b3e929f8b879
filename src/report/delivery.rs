//! Artifact delivery

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::{Error, Result};

/// Destination for protected artifacts.
#[async_trait]
pub trait ArtifactSink: Send + Sync {
    /// Store `bytes` under `filename` and return where it ended up.
    async fn deliver(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf>;
}

/// Writes artifacts into a directory.
///
/// The file is written under a `.part` name and renamed into place, so a
/// failed write never leaves a partial artifact behind.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    directory: PathBuf,
    force_overwrite: bool,
}

impl DirectorySink {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            force_overwrite: false,
        }
    }

    pub fn force_overwrite(mut self, force: bool) -> Self {
        self.force_overwrite = force;
        self
    }
}

#[async_trait]
impl ArtifactSink for DirectorySink {
    async fn deliver(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf> {
        let name = Path::new(filename)
            .file_name()
            .filter(|n| n.len() == filename.len())
            .ok_or_else(|| Error::DeliveryError(format!("Invalid artifact name: {}", filename)))?;

        let target = self.directory.join(name);
        if !self.force_overwrite && fs::try_exists(&target).await? {
            return Err(Error::DeliveryError(format!(
                "Output file already exists: {} (use --force to overwrite)",
                target.display()
            )));
        }

        fs::create_dir_all(&self.directory).await?;

        let partial = self.directory.join(format!("{}.part", filename));
        if let Err(e) = fs::write(&partial, bytes).await {
            let _ = fs::remove_file(&partial).await;
            return Err(e.into());
        }
        if let Err(e) = fs::rename(&partial, &target).await {
            let _ = fs::remove_file(&partial).await;
            return Err(e.into());
        }

        debug!("Wrote {} bytes to {}", bytes.len(), target.display());
        Ok(target)
    }
}

/// Keeps delivered artifacts in memory, for embedding and tests.
#[derive(Debug, Default)]
pub struct MemorySink {
    artifacts: Mutex<Vec<(String, Vec<u8>)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn delivered(&self) -> Vec<(String, Vec<u8>)> {
        self.artifacts.lock().await.clone()
    }
}

#[async_trait]
impl ArtifactSink for MemorySink {
    async fn deliver(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf> {
        self.artifacts
            .lock()
            .await
            .push((filename.to_string(), bytes.to_vec()));
        Ok(PathBuf::from(filename))
    }
}
