use async_trait::async_trait;
use chrono::Utc;
use rentcar_core::document::{DocumentError, DocumentKind, DocumentStore};
use std::path::PathBuf;
use tracing::info;
use uuid::Uuid;

/// Stores uploads on the local filesystem, one folder per document kind,
/// and hands back URLs under `public_base_url`.
pub struct LocalDocumentStore {
    root: PathBuf,
    public_base_url: String,
    max_upload_bytes: usize,
}

impl LocalDocumentStore {
    pub fn new(root: impl Into<PathBuf>, public_base_url: &str, max_upload_bytes: usize) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
            max_upload_bytes,
        }
    }
}

#[async_trait]
impl DocumentStore for LocalDocumentStore {
    async fn store(
        &self,
        kind: DocumentKind,
        original_name: &str,
        bytes: &[u8],
    ) -> Result<String, DocumentError> {
        if bytes.is_empty() {
            return Err(DocumentError::Empty);
        }
        if bytes.len() > self.max_upload_bytes {
            return Err(DocumentError::TooLarge { size: bytes.len(), limit: self.max_upload_bytes });
        }
        let ext = kind.accepted_extension(original_name)?;

        let file_name = format!("{}_{}.{}", Utc::now().timestamp_millis(), Uuid::new_v4().simple(), ext);
        let dir = self.root.join(kind.folder());
        tokio::fs::create_dir_all(&dir).await?;
        tokio::fs::write(dir.join(&file_name), bytes).await?;

        info!("Stored {} bytes as {}/{}", bytes.len(), kind.folder(), file_name);
        Ok(format!("{}/{}/{}", self.public_base_url, kind.folder(), file_name))
    }

    fn is_stored_url(&self, kind: DocumentKind, url: &str) -> bool {
        url.strip_prefix(&self.public_base_url)
            .and_then(|rest| rest.strip_prefix('/'))
            .and_then(|rest| rest.strip_prefix(kind.folder()))
            .and_then(|rest| rest.strip_prefix('/'))
            .is_some_and(|name| !name.is_empty() && !name.contains('/') && !name.contains(".."))
    }
}
