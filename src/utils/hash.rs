use crate::models::{HashAlgorithm, UnsupportedAlgorithm};
use sha2::Digest;
use std::fs::File;
use std::io::{self, ErrorKind, Read};
use std::path::Path;
use thiserror::Error;

/// Default read size for the digest loop: 64 KiB.
pub const DEFAULT_BLOCK_SIZE: usize = 64 * 1024;

#[derive(Error, Debug)]
pub enum DigestError {
    #[error(transparent)]
    UnsupportedAlgorithm(#[from] UnsupportedAlgorithm),

    #[error("Block size must be greater than zero")]
    InvalidBlockSize,

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl DigestError {
    /// True for caller mistakes detected before any I/O.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            DigestError::UnsupportedAlgorithm(_) | DigestError::InvalidBlockSize
        )
    }
}

/// Hash the file at `path`, reading it `block_size` bytes at a time.
pub fn hash_file(
    path: &Path,
    algorithm: HashAlgorithm,
    block_size: usize,
) -> Result<String, DigestError> {
    if block_size == 0 {
        return Err(DigestError::InvalidBlockSize);
    }

    tracing::info!(
        "Starting {} hash calculation for file: {}",
        algorithm,
        path.display()
    );
    let file = File::open(path)?;
    let hex = digest_reader(file, algorithm, block_size)?;
    tracing::info!(
        "Successfully calculated {} hash for file.",
        algorithm.as_str().to_uppercase()
    );
    Ok(hex)
}

/// Like [`hash_file`], but takes the algorithm by name. Unknown names fail
/// before the file is opened.
pub fn hash_file_named(
    path: &Path,
    algorithm: &str,
    block_size: usize,
) -> Result<String, DigestError> {
    let algorithm = algorithm.parse::<HashAlgorithm>().inspect_err(|e| {
        tracing::error!("Attempted to use unsupported hash algorithm: {}", e.0);
    })?;
    hash_file(path, algorithm, block_size)
}

/// Stream `reader` through `algorithm` and return the lowercase hex digest.
pub fn digest_reader<R: Read>(
    reader: R,
    algorithm: HashAlgorithm,
    block_size: usize,
) -> Result<String, DigestError> {
    if block_size == 0 {
        return Err(DigestError::InvalidBlockSize);
    }

    let hex = match algorithm {
        HashAlgorithm::Md5 => stream_digest::<md5::Md5, _>(reader, block_size)?,
        HashAlgorithm::Sha1 => stream_digest::<sha1::Sha1, _>(reader, block_size)?,
        HashAlgorithm::Sha256 => stream_digest::<sha2::Sha256, _>(reader, block_size)?,
        HashAlgorithm::Sha512 => stream_digest::<sha2::Sha512, _>(reader, block_size)?,
    };
    Ok(hex)
}

fn stream_digest<D: Digest, R: Read>(mut reader: R, block_size: usize) -> io::Result<String> {
    let mut hasher = D::new();
    let mut buffer = vec![0u8; block_size];
    loop {
        let n = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(&buffer[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// Hash an in-memory buffer in one shot.
pub fn calculate_hash(data: &[u8], algorithm: HashAlgorithm) -> String {
    match algorithm {
        HashAlgorithm::Md5 => hex::encode(md5::Md5::digest(data)),
        HashAlgorithm::Sha1 => hex::encode(sha1::Sha1::digest(data)),
        HashAlgorithm::Sha256 => hex::encode(sha2::Sha256::digest(data)),
        HashAlgorithm::Sha512 => hex::encode(sha2::Sha512::digest(data)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn sample(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i * 31 % 251) as u8).collect()
    }

    /// Reader that fails with `Interrupted` on every other call.
    struct Flaky<R> {
        inner: R,
        trip: bool,
    }

    impl<R: Read> Read for Flaky<R> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.trip = !self.trip;
            if self.trip {
                return Err(io::Error::from(ErrorKind::Interrupted));
            }
            self.inner.read(buf)
        }
    }

    #[test]
    fn test_calculate_hash() {
        let data = b"hello world";
        // SHA-256 for "hello world"
        assert_eq!(
            calculate_hash(data, HashAlgorithm::Sha256),
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
        assert_eq!(
            calculate_hash(data, HashAlgorithm::Md5),
            "5eb63bbbe01eeed093cb22bb8f5acdc3"
        );
        assert_eq!(
            calculate_hash(data, HashAlgorithm::Sha1),
            "2aae6c35c94fcfb415dbe95f408b9ce91ee846ed"
        );
    }

    #[test]
    fn test_empty_input_digests() {
        let expected = [
            (
                HashAlgorithm::Sha256,
                "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855",
            ),
            (HashAlgorithm::Md5, "d41d8cd98f00b204e9800998ecf8427e"),
            (HashAlgorithm::Sha1, "da39a3ee5e6b4b0d3255bfef95601890afd80709"),
            (
                HashAlgorithm::Sha512,
                "cf83e1357eefb8bdf1542850d66d8007d620e4050b5715dc83f4a921d36ce9ce\
                 47d0d13c5d85f2b0ff8318d2877eec2f63b931bd47417a81a538327af927da3e",
            ),
        ];

        let file = NamedTempFile::new().unwrap();
        for (algorithm, digest) in expected {
            let hex = hash_file(file.path(), algorithm, DEFAULT_BLOCK_SIZE).unwrap();
            assert_eq!(hex, digest, "{algorithm}");
        }
    }

    #[test]
    fn test_file_digest_matches_reference() {
        let data = sample(200_000);
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&data).unwrap();
        file.flush().unwrap();

        for algorithm in HashAlgorithm::ALL {
            let first = hash_file(file.path(), algorithm, DEFAULT_BLOCK_SIZE).unwrap();
            let second = hash_file(file.path(), algorithm, DEFAULT_BLOCK_SIZE).unwrap();
            assert_eq!(first, second);
            assert_eq!(first, calculate_hash(&data, algorithm));
        }
    }

    #[test]
    fn test_block_size_does_not_change_digest() {
        let data = sample(70_001);
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&data).unwrap();
        file.flush().unwrap();

        for algorithm in HashAlgorithm::ALL {
            let expected = calculate_hash(&data, algorithm);
            for block_size in [1, 7, 64, 4096, DEFAULT_BLOCK_SIZE, 1 << 20] {
                let hex = hash_file(file.path(), algorithm, block_size).unwrap();
                assert_eq!(hex, expected, "{algorithm} with block size {block_size}");
            }
        }
    }

    #[test]
    fn test_digest_reader_retries_interrupted_reads() {
        let data = sample(10_000);
        let reader = Flaky {
            inner: &data[..],
            trip: false,
        };
        let hex = digest_reader(reader, HashAlgorithm::Sha512, 333).unwrap();
        assert_eq!(hex, calculate_hash(&data, HashAlgorithm::Sha512));
    }

    #[test]
    fn test_unknown_algorithm_fails_before_io() {
        // The path does not exist, so reaching the open would yield an I/O error.
        let missing = Path::new("/definitely/not/here.bin");
        let err = hash_file_named(missing, "crc32", DEFAULT_BLOCK_SIZE).unwrap_err();
        assert!(err.is_invalid_argument());
        assert_eq!(err.to_string(), "Unsupported algorithm: crc32");
    }

    #[test]
    fn test_named_lookup_is_case_insensitive() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"abc").unwrap();
        file.flush().unwrap();
        let hex = hash_file_named(file.path(), "SHA1", DEFAULT_BLOCK_SIZE).unwrap();
        assert_eq!(hex, "a9993e364706816aba3e25717850c26c9cd0d89d");
    }

    #[test]
    fn test_zero_block_size_rejected() {
        let missing = Path::new("/definitely/not/here.bin");
        let err = hash_file(missing, HashAlgorithm::Sha256, 0).unwrap_err();
        assert!(matches!(err, DigestError::InvalidBlockSize));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let missing = Path::new("/definitely/not/here.bin");
        let err = hash_file(missing, HashAlgorithm::Md5, DEFAULT_BLOCK_SIZE).unwrap_err();
        assert!(matches!(err, DigestError::Io(_)));
        assert!(!err.is_invalid_argument());
    }
}
