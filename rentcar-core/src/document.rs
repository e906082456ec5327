use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Uploaded file categories and the folder each one lives in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum DocumentKind {
    PaymentProof,
    CarImage,
    IdentityCard,
    DriverLicense,
}

const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "webp", "gif"];

impl DocumentKind {
    pub fn folder(&self) -> &'static str {
        match self {
            DocumentKind::PaymentProof => "payment-proofs",
            DocumentKind::CarImage => "car-images",
            DocumentKind::IdentityCard => "ktp",
            DocumentKind::DriverLicense => "license",
        }
    }

    /// Lower-cased extension of `file_name` if this kind accepts it.
    pub fn accepted_extension(&self, file_name: &str) -> Result<String, DocumentError> {
        let ext = file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .filter(|ext| !ext.is_empty())
            .ok_or_else(|| DocumentError::UnsupportedType(file_name.to_string()))?;

        let accepted = IMAGE_EXTENSIONS.contains(&ext.as_str())
            || (ext == "pdf" && *self != DocumentKind::CarImage);

        if accepted {
            Ok(ext)
        } else {
            Err(DocumentError::UnsupportedType(file_name.to_string()))
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("Unsupported file type: {0}")]
    UnsupportedType(String),
    #[error("File is empty")]
    Empty,
    #[error("File too large: {size} bytes (limit {limit})")]
    TooLarge { size: usize, limit: usize },
    #[error("Storage failure: {0}")]
    Storage(#[from] std::io::Error),
}

/// Blob storage for uploaded documents. Callers only keep the returned URL.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Store `bytes` and return the public reference URL
    async fn store(
        &self,
        kind: DocumentKind,
        original_name: &str,
        bytes: &[u8],
    ) -> Result<String, DocumentError>;

    /// Whether `url` names a file this store handed out for `kind`.
    fn is_stored_url(&self, kind: DocumentKind, url: &str) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepted_extensions() {
        assert_eq!(DocumentKind::PaymentProof.accepted_extension("bukti.PDF").unwrap(), "pdf");
        assert_eq!(DocumentKind::CarImage.accepted_extension("brio.JPG").unwrap(), "jpg");
        assert!(DocumentKind::CarImage.accepted_extension("brio.pdf").is_err());
        assert!(DocumentKind::IdentityCard.accepted_extension("ktp").is_err());
        assert!(DocumentKind::DriverLicense.accepted_extension("sim.exe").is_err());
    }

    #[test]
    fn test_kind_from_path_segment() {
        let kind: DocumentKind = serde_json::from_str("\"payment-proof\"").unwrap();
        assert_eq!(kind.folder(), "payment-proofs");
    }
}
