//! Blob storage for uploaded résumé files.
//!
//! Files are written below a root directory that the HTTP layer also serves under
//! `/uploads`. A stored file is addressed by its key, the path relative to the root.

use async_trait::async_trait;
use bytes::Bytes;
use rand::distributions::Alphanumeric;
use rand::Rng;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, instrument, warn};

use crate::config::UploadConfig;
use crate::errors::{Result, StaffdeskError};

/// Sub-directory résumé files are written to
pub const RESUME_PREFIX: &str = "curriculos";

/// Limits a blob must satisfy before it is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobConstraints {
    pub max_size: usize,
    /// Lowercase extensions without the dot
    pub allowed_extensions: Vec<String>,
}

impl BlobConstraints {
    /// Checked in order: extension, emptiness, size.
    pub fn check(&self, file_name: &str, size: usize) -> Result<()> {
        let allowed = file_extension(file_name)
            .map(|ext| self.allowed_extensions.iter().any(|a| a.eq_ignore_ascii_case(&ext)))
            .unwrap_or(false);
        if !allowed {
            return Err(StaffdeskError::validation_field(
                format!("File type not allowed; accepted: {}", self.allowed_extensions.join(", ")),
                "file",
            ));
        }

        if size == 0 {
            return Err(StaffdeskError::validation_field("The file is empty", "file"));
        }

        if size > self.max_size {
            return Err(StaffdeskError::payload_too_large(self.max_size as u64));
        }

        Ok(())
    }
}

impl From<&UploadConfig> for BlobConstraints {
    fn from(config: &UploadConfig) -> Self {
        Self {
            max_size: config.max_file_size,
            allowed_extensions: config.allowed_extensions.clone(),
        }
    }
}

#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `contents` under a fresh key derived from `file_name`; returns the key.
    /// Nothing is written unless `constraints` accept the file.
    async fn put(
        &self,
        file_name: &str,
        contents: Bytes,
        constraints: &BlobConstraints,
    ) -> Result<String>;

    /// Remove a previously stored blob. Missing blobs are not an error.
    async fn remove(&self, key: &str) -> Result<()>;
}

/// Blob store backed by a local directory
#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    root: PathBuf,
}

impl LocalBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create the root and résumé directories if they do not exist
    pub async fn ensure_dirs(&self) -> Result<()> {
        let dir = self.root.join(RESUME_PREFIX);
        tokio::fs::create_dir_all(&dir).await.map_err(|e| {
            let mut err = StaffdeskError::from(e);
            err.add_context(format!("Creating upload directory {}", dir.display()));
            err
        })
    }

    fn resolve(&self, key: &str) -> Result<PathBuf> {
        let relative = Path::new(key);
        if relative.components().any(|c| !matches!(c, Component::Normal(_))) {
            return Err(StaffdeskError::validation_field("Invalid blob key", "file"));
        }
        Ok(self.root.join(relative))
    }
}

/// Reduce a client-supplied file name to a safe single path segment.
pub fn sanitize_file_name(file_name: &str) -> String {
    let base = file_name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') { c } else { '_' })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');

    if cleaned.is_empty() {
        "file".to_string()
    } else {
        cleaned.to_string()
    }
}

/// Lowercase extension of `file_name` without the dot
pub fn file_extension(file_name: &str) -> Option<String> {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    #[instrument(
        skip(self, contents, constraints),
        fields(size = contents.len()),
        name = "blob_put"
    )]
    async fn put(
        &self,
        file_name: &str,
        contents: Bytes,
        constraints: &BlobConstraints,
    ) -> Result<String> {
        constraints.check(file_name, contents.len())?;

        let suffix: String =
            rand::thread_rng().sample_iter(&Alphanumeric).take(8).map(char::from).collect();
        let key = format!(
            "{}/{}-{}-{}",
            RESUME_PREFIX,
            chrono::Utc::now().timestamp_millis(),
            suffix,
            sanitize_file_name(file_name)
        );

        self.ensure_dirs().await?;
        let path = self.resolve(&key)?;
        tokio::fs::write(&path, &contents).await.map_err(|e| {
            let mut err = StaffdeskError::from(e);
            err.add_context(format!("Writing blob {}", key));
            err
        })?;

        debug!(key = %key, "Stored blob");
        Ok(key)
    }

    #[instrument(skip(self), name = "blob_remove")]
    async fn remove(&self, key: &str) -> Result<()> {
        let path = self.resolve(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(key = %key, "Blob already absent");
                Ok(())
            }
            Err(e) => {
                let mut err = StaffdeskError::from(e);
                err.add_context(format!("Removing blob {}", key));
                Err(err)
            }
        }
    }
}
