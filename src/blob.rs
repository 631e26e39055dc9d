use std::path::PathBuf;

use async_trait::async_trait;
use base64::{Engine, engine::general_purpose::STANDARD};
use ulid::Ulid;

use crate::error::AppError;

/// Storage for uploaded recipe images.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Stores `bytes` and returns the reference to persist on the recipe.
    async fn put(&self, bytes: Vec<u8>, extension: &str) -> anyhow::Result<String>;

    /// Deletes a stored reference. Missing blobs are not an error.
    async fn remove(&self, reference: &str) -> anyhow::Result<()>;

    /// Public URL of a stored reference.
    fn url(&self, reference: &str) -> String;
}

/// Writes blobs under `root/recipes/images/<ulid>.<ext>`.
pub struct FsBlobStore {
    root: PathBuf,
    url_prefix: String,
}

impl FsBlobStore {
    pub fn new(root: impl Into<PathBuf>, url_prefix: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            url_prefix: url_prefix.into(),
        }
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn put(&self, bytes: Vec<u8>, extension: &str) -> anyhow::Result<String> {
        let reference = format!("recipes/images/{}.{extension}", Ulid::new().to_string().to_lowercase());
        let path = self.root.join(&reference);

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, bytes).await?;

        tracing::debug!(reference, "Stored blob");

        Ok(reference)
    }

    async fn remove(&self, reference: &str) -> anyhow::Result<()> {
        match tokio::fs::remove_file(self.root.join(reference)).await {
            Ok(()) => {
                tracing::debug!(reference, "Removed blob");
                Ok(())
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    fn url(&self, reference: &str) -> String {
        format!("{}/{reference}", self.url_prefix.trim_end_matches('/'))
    }
}

/// Decodes `data:image/<ext>;base64,<payload>` into the bytes and extension.
pub fn decode_data_url(value: &str) -> Result<(Vec<u8>, String), AppError> {
    let invalid = || AppError::BadRequest("Image must be a base64 encoded data URL.".to_owned());

    let rest = value.strip_prefix("data:image/").ok_or_else(invalid)?;
    let (extension, payload) = rest.split_once(";base64,").ok_or_else(invalid)?;

    if extension.is_empty()
        || extension.len() > 10
        || !extension.chars().all(|c| c.is_ascii_alphanumeric())
    {
        return Err(invalid());
    }

    let bytes = STANDARD.decode(payload.trim()).map_err(|_| invalid())?;
    if bytes.is_empty() {
        return Err(invalid());
    }

    Ok((bytes, extension.to_ascii_lowercase()))
}
