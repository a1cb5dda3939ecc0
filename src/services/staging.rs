use crate::api::error::AppError;
use axum::extract::multipart::{Field, MultipartError};
use axum::http::StatusCode;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;

/// Writes uploads to uniquely named temporary files.
#[derive(Debug, Clone, Default)]
pub struct UploadStager {
    temp_dir: Option<PathBuf>,
}

/// A staged upload on disk. The file is removed when this value is dropped.
#[derive(Debug)]
pub struct StagedUpload {
    file: Option<NamedTempFile>,
    path: PathBuf,
    size: u64,
}

impl UploadStager {
    pub fn new(temp_dir: Option<PathBuf>) -> Self {
        Self { temp_dir }
    }

    fn create(&self) -> std::io::Result<NamedTempFile> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("hashd-upload-");
        match &self.temp_dir {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        }
    }

    /// Copy a multipart field into a fresh temporary file.
    pub async fn stage_field(&self, mut field: Field<'_>) -> Result<StagedUpload, AppError> {
        let temp_file = self.create()?;
        let path = temp_file.path().to_owned();
        let mut writer = tokio::fs::File::from_std(temp_file.reopen()?);
        let mut staged = StagedUpload {
            file: Some(temp_file),
            path,
            size: 0,
        };

        while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
            writer.write_all(&chunk).await?;
            staged.size += chunk.len() as u64;
        }
        writer.flush().await?;
        writer.sync_all().await?;
        drop(writer);

        tracing::info!(
            "Upload saved temporarily to: {} ({} bytes)",
            staged.path.display(),
            staged.size
        );
        Ok(staged)
    }
}

impl StagedUpload {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn size(&self) -> u64 {
        self.size
    }
}

impl Drop for StagedUpload {
    fn drop(&mut self) {
        let Some(file) = self.file.take() else {
            return;
        };
        match file.close() {
            Ok(()) => {
                tracing::info!(
                    "Successfully cleaned up temporary file: {}",
                    self.path.display()
                )
            }
            Err(e) => {
                tracing::error!(
                    "Failed to delete temporary file {}: {}",
                    self.path.display(),
                    e
                )
            }
        }
    }
}

/// Map a multipart failure to a client-facing error.
pub fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(e.body_text())
    } else {
        AppError::BadRequest(e.body_text())
    }
}
