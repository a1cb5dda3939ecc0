use crate::api::error::AppError;
use crate::models::HashAlgorithm;
use crate::utils::hash;
use std::path::PathBuf;

/// Runs the blocking digest loop off the async executor.
#[derive(Debug, Clone)]
pub struct DigestService {
    block_size: usize,
}

impl DigestService {
    pub fn new(block_size: usize) -> Self {
        Self { block_size }
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    pub async fn hash_path(
        &self,
        path: PathBuf,
        algorithm: HashAlgorithm,
    ) -> Result<String, AppError> {
        let block_size = self.block_size;
        tokio::task::spawn_blocking(move || hash::hash_file(&path, algorithm, block_size))
            .await
            .map_err(|e| AppError::Internal(format!("Digest task failed: {}", e)))?
            .map_err(AppError::from)
    }
}

impl Default for DigestService {
    fn default() -> Self {
        Self::new(hash::DEFAULT_BLOCK_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_hash_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"hello world").unwrap();
        file.flush().unwrap();

        let service = DigestService::new(4);
        let hex = service
            .hash_path(file.path().to_owned(), HashAlgorithm::Sha256)
            .await
            .unwrap();
        assert_eq!(
            hex,
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
    }

    #[tokio::test]
    async fn test_missing_file_maps_to_server_error() {
        let service = DigestService::default();
        let err = service
            .hash_path(PathBuf::from("/definitely/not/here"), HashAlgorithm::Md5)
            .await
            .unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::INTERNAL_SERVER_ERROR);
    }
}
