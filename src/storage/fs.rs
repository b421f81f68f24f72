//! Filesystem blob store

use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use crate::{
    error::{AppError, AppResult},
    gateways::BlobStore,
};

/// Stores each blob as a single file inside one directory
#[derive(Debug, Clone)]
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create the storage directory if it does not exist yet
    pub async fn ensure_root(&self) -> AppResult<()> {
        fs::create_dir_all(&self.root).await?;
        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, name: &str) -> AppResult<PathBuf> {
        let flat = !name.is_empty()
            && name != "."
            && !name.contains("..")
            && !name.contains(['/', '\\', '\0']);

        if !flat {
            return Err(AppError::InvalidFile(format!("illegal blob name: {name}")));
        }

        Ok(self.root.join(name))
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn write(&self, name: &str, bytes: &[u8]) -> AppResult<()> {
        let path = self.path_for(name)?;
        fs::write(&path, bytes).await?;
        debug!(path = %path.display(), size = bytes.len(), "Blob written");
        Ok(())
    }

    async fn read(&self, name: &str) -> AppResult<Vec<u8>> {
        let path = self.path_for(name)?;
        match fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(AppError::ItemNotFound("PDF file not found".to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn remove(&self, name: &str) -> AppResult<()> {
        let path = self.path_for(name)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
