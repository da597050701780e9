//! Disk-backed artifact store
//!
//! [`DiskStore`] owns the upload directory. Callers ensure the directory,
//! open an [`ArtifactWriter`], stream chunks into it, then either
//! [`ArtifactWriter::finish`] or [`ArtifactWriter::discard`] it.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::fs::{self, File};
use tokio::io::{AsyncWriteExt, BufWriter};

use crate::error::{StoreError, StoreResult};
use crate::naming::{ArtifactNamer, UniqueNamer};

/// A file that was fully written to the upload directory
#[derive(Debug, Clone)]
pub struct StoredArtifact {
    /// File name inside the upload directory
    pub name: String,
    /// Full path of the file
    pub path: PathBuf,
    /// Number of bytes written
    pub size: u64,
    /// When the file was created
    pub created_at: DateTime<Utc>,
}

/// Store that writes artifacts into a single local directory
#[derive(Debug, Clone)]
pub struct DiskStore {
    root: PathBuf,
    namer: Arc<dyn ArtifactNamer>,
}

impl DiskStore {
    /// Create a store rooted at `root` using the given naming strategy
    pub fn new(root: impl Into<PathBuf>, namer: Arc<dyn ArtifactNamer>) -> Self {
        Self {
            root: root.into(),
            namer,
        }
    }

    /// Create a store with collision-resistant names
    pub fn with_unique_names(root: impl Into<PathBuf>) -> Self {
        Self::new(root, Arc::new(UniqueNamer))
    }

    /// Upload directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the upload directory (and parents) if it does not exist.
    ///
    /// Safe to call concurrently; an already existing directory is not an error.
    pub async fn ensure_dir(&self) -> StoreResult<()> {
        fs::create_dir_all(&self.root)
            .await
            .map_err(|source| StoreError::CreateDir {
                path: self.root.clone(),
                source,
            })
    }

    /// Open a new artifact for writing.
    ///
    /// An existing file with the same name is truncated.
    pub async fn create(&self) -> StoreResult<ArtifactWriter> {
        let created_at = Utc::now();
        let name = self.namer.name(created_at);
        let path = self.root.join(&name);

        let file = File::create(&path)
            .await
            .map_err(|source| StoreError::CreateFile {
                path: path.clone(),
                source,
            })?;

        tracing::debug!(path = %path.display(), "Artifact opened");

        Ok(ArtifactWriter {
            name,
            path,
            created_at,
            written: 0,
            file: BufWriter::new(file),
        })
    }
}

/// In-progress artifact
#[derive(Debug)]
pub struct ArtifactWriter {
    name: String,
    path: PathBuf,
    created_at: DateTime<Utc>,
    written: u64,
    file: BufWriter<File>,
}

impl ArtifactWriter {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Bytes accepted so far
    pub fn written(&self) -> u64 {
        self.written
    }

    /// Append a chunk to the artifact
    pub async fn write_chunk(&mut self, chunk: &[u8]) -> StoreResult<()> {
        self.file
            .write_all(chunk)
            .await
            .map_err(|source| StoreError::Write {
                path: self.path.clone(),
                source,
            })?;
        self.written += chunk.len() as u64;
        Ok(())
    }

    /// Flush buffered bytes and close the artifact.
    ///
    /// If the flush fails the partial file is removed.
    pub async fn finish(mut self) -> StoreResult<StoredArtifact> {
        if let Err(source) = self.file.flush().await {
            let path = self.path.clone();
            self.discard().await;
            return Err(StoreError::Write { path, source });
        }

        Ok(StoredArtifact {
            name: self.name,
            path: self.path,
            size: self.written,
            created_at: self.created_at,
        })
    }

    /// Close and delete the partially written artifact
    pub async fn discard(self) {
        let ArtifactWriter {
            path, written, file, ..
        } = self;
        drop(file);

        match fs::remove_file(&path).await {
            Ok(()) => {
                tracing::debug!(path = %path.display(), written, "Partial artifact removed")
            }
            Err(e) => tracing::warn!(
                path = %path.display(),
                error = %e,
                "Failed to remove partial artifact"
            ),
        }
    }
}
