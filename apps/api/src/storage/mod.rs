//! Stored resume files.
//!
//! Every upload is written under `<uuid>_<original name>`: the UUID is the
//! storage key, the original name is kept only for humans and downloads.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

/// Directory (local) or key prefix (S3) under which resumes are kept.
pub const RESUME_PREFIX: &str = "resumes";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("S3 error: {0}")]
    S3(String),

    #[error("file not found: {0}")]
    NotFound(String),

    #[error("invalid file path: {0}")]
    InvalidPath(String),
}

#[async_trait]
pub trait FileStore: Send + Sync {
    /// Stores `bytes` and returns the reference later passed to [`FileStore::load`].
    async fn save(&self, filename: &str, bytes: &[u8]) -> Result<String, StorageError>;

    async fn load(&self, file_path: &str) -> Result<Vec<u8>, StorageError>;
}

/// `<uuid>_<name>` where `name` is the final path component of `filename`.
pub fn storage_name(filename: &str) -> String {
    let name = Path::new(filename)
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|n| !n.is_empty())
        .unwrap_or("upload");
    format!("{}_{}", Uuid::new_v4(), name)
}

/// The original filename embedded in a stored reference.
pub fn original_filename(file_path: &str) -> &str {
    let name = file_path.rsplit('/').next().unwrap_or(file_path);
    match name.split_once('_') {
        Some((_, original)) if !original.is_empty() => original,
        _ => name,
    }
}

/// Rejects anything that is not a bare stored name, so a reference can never
/// escape the storage root.
fn stored_name(file_path: &str) -> Result<&str, StorageError> {
    let name = file_path
        .strip_prefix(RESUME_PREFIX)
        .and_then(|rest| rest.strip_prefix('/'))
        .unwrap_or(file_path);
    if name.is_empty() || name.contains(['/', '\\']) || name == ".." || name == "." {
        return Err(StorageError::InvalidPath(file_path.to_string()));
    }
    Ok(name)
}

// ────────────────────────────────────────────────────────────────────────────
// Local directory
// ────────────────────────────────────────────────────────────────────────────

pub struct LocalFileStore {
    root: PathBuf,
}

impl LocalFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl FileStore for LocalFileStore {
    async fn save(&self, filename: &str, bytes: &[u8]) -> Result<String, StorageError> {
        tokio::fs::create_dir_all(&self.root).await?;
        let name = storage_name(filename);
        let path = self.root.join(&name);
        tokio::fs::write(&path, bytes).await?;
        info!("Stored upload {filename} at {}", path.display());
        Ok(format!("{RESUME_PREFIX}/{name}"))
    }

    async fn load(&self, file_path: &str) -> Result<Vec<u8>, StorageError> {
        let path = self.root.join(stored_name(file_path)?);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(file_path.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// S3 / MinIO
// ────────────────────────────────────────────────────────────────────────────

pub struct S3FileStore {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3FileStore {
    pub fn new(client: aws_sdk_s3::Client, bucket: String) -> Self {
        Self { client, bucket }
    }
}

#[async_trait]
impl FileStore for S3FileStore {
    async fn save(&self, filename: &str, bytes: &[u8]) -> Result<String, StorageError> {
        let key = format!("{RESUME_PREFIX}/{}", storage_name(filename));
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(ByteStream::from(bytes.to_vec()))
            .content_type("application/octet-stream")
            .send()
            .await
            .map_err(|e| StorageError::S3(format!("upload failed: {e}")))?;

        info!("Uploaded {filename} to s3://{}/{}", self.bucket, key);
        Ok(key)
    }

    async fn load(&self, file_path: &str) -> Result<Vec<u8>, StorageError> {
        let key = format!("{RESUME_PREFIX}/{}", stored_name(file_path)?);
        let object = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(&key)
            .send()
            .await
            .map_err(|e| {
                if e.as_service_error().map(|s| s.is_no_such_key()) == Some(true) {
                    StorageError::NotFound(file_path.to_string())
                } else {
                    StorageError::S3(format!("download failed: {e}"))
                }
            })?;

        let data = object
            .body
            .collect()
            .await
            .map_err(|e| StorageError::S3(format!("download stream failed: {e}")))?;
        Ok(data.into_bytes().to_vec())
    }
}
