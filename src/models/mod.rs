use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use utoipa::ToSchema;

/// Hash algorithms a caller may request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    Md5,
    Sha1,
    #[default]
    Sha256,
    Sha512,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unsupported algorithm: {0}")]
pub struct UnsupportedAlgorithm(pub String);

impl HashAlgorithm {
    pub const ALL: [HashAlgorithm; 4] = [
        HashAlgorithm::Sha256,
        HashAlgorithm::Sha512,
        HashAlgorithm::Md5,
        HashAlgorithm::Sha1,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            HashAlgorithm::Md5 => "md5",
            HashAlgorithm::Sha1 => "sha1",
            HashAlgorithm::Sha256 => "sha256",
            HashAlgorithm::Sha512 => "sha512",
        }
    }
}

impl FromStr for HashAlgorithm {
    type Err = UnsupportedAlgorithm;

    /// Case-insensitive. The error carries the lower-cased name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.to_lowercase();
        match name.as_str() {
            "md5" => Ok(HashAlgorithm::Md5),
            "sha1" => Ok(HashAlgorithm::Sha1),
            "sha256" => Ok(HashAlgorithm::Sha256),
            "sha512" => Ok(HashAlgorithm::Sha512),
            _ => Err(UnsupportedAlgorithm(name)),
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Successful `/hash-file` response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DigestResult {
    /// Lowercase hex digest
    pub hash: String,
    pub algorithm: HashAlgorithm,
    /// Filename as declared by the client
    pub filename: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Multipart form accepted by `/hash-file`, described for the OpenAPI document.
#[derive(ToSchema)]
pub struct HashFileForm {
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
    #[schema(example = "sha256")]
    pub algorithm: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("SHA256".parse::<HashAlgorithm>(), Ok(HashAlgorithm::Sha256));
        assert_eq!("Md5".parse::<HashAlgorithm>(), Ok(HashAlgorithm::Md5));
        assert_eq!("sha1".parse::<HashAlgorithm>(), Ok(HashAlgorithm::Sha1));
        assert_eq!("sHa512".parse::<HashAlgorithm>(), Ok(HashAlgorithm::Sha512));
    }

    #[test]
    fn test_parse_rejects_unknown() {
        let err = "CRC32".parse::<HashAlgorithm>().unwrap_err();
        assert_eq!(err, UnsupportedAlgorithm("crc32".to_string()));
        assert_eq!(err.to_string(), "Unsupported algorithm: crc32");

        let err = "".parse::<HashAlgorithm>().unwrap_err();
        assert_eq!(err.to_string(), "Unsupported algorithm: ");
    }

    #[test]
    fn test_default_is_sha256() {
        assert_eq!(HashAlgorithm::default(), HashAlgorithm::Sha256);
    }

    #[test]
    fn test_serializes_lowercase() {
        let result = DigestResult {
            hash: "abc".to_string(),
            algorithm: HashAlgorithm::Sha512,
            filename: "report.pdf".to_string(),
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"hash": "abc", "algorithm": "sha512", "filename": "report.pdf"})
        );
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for algorithm in HashAlgorithm::ALL {
            assert_eq!(algorithm.to_string().parse::<HashAlgorithm>(), Ok(algorithm));
        }
    }
}
