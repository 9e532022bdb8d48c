//! Content storage backed by an object store (S3/MinIO/local filesystem/memory).

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use object_store::aws::AmazonS3Builder;
use object_store::local::LocalFileSystem;
use object_store::memory::InMemory;
use object_store::path::Path as ObjectPath;
use object_store::ObjectStore;
use serde::{Deserialize, Serialize};

use common::content_store::{check_size, ContentStore, ContentStoreError};
use common::linked_data::ContentAddress;

/// Where staged board content lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentStoreConfig {
    /// In-memory storage, lost on restart
    #[default]
    Memory,

    /// Local filesystem storage. Without a path the content directory
    ///  inside the app directory is used.
    Local { path: Option<PathBuf> },

    /// S3-compatible storage (AWS S3, MinIO, etc.)
    S3 {
        /// Endpoint URL (e.g., "http://localhost:9000" for MinIO)
        endpoint: String,
        access_key: String,
        secret_key: String,
        bucket: String,
        /// Defaults to "us-east-1"
        region: Option<String>,
    },
}

impl ContentStoreConfig {
    pub fn backend(&self) -> &'static str {
        match self {
            ContentStoreConfig::Memory => "memory",
            ContentStoreConfig::Local { .. } => "local",
            ContentStoreConfig::S3 { .. } => "s3",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ContentStoreSetupError {
    #[error("invalid content store configuration: {0}")]
    InvalidConfig(String),
    #[error("bucket not found: {0}")]
    BucketNotFound(String),
    #[error("content store io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("content store error: {0}")]
    ObjectStore(#[from] object_store::Error),
}

/// A [`ContentStore`] over any `object_store` backend. Blobs are keyed
///  by their content address under `content/`.
#[derive(Debug, Clone)]
pub struct ObjectContentStore {
    inner: Arc<dyn ObjectStore>,
}

impl ObjectContentStore {
    pub async fn new(config: &ContentStoreConfig) -> Result<Self, ContentStoreSetupError> {
        let inner: Arc<dyn ObjectStore> = match config {
            ContentStoreConfig::Memory => Arc::new(InMemory::new()),

            ContentStoreConfig::Local { path } => {
                let path = path.as_ref().ok_or_else(|| {
                    ContentStoreSetupError::InvalidConfig(
                        "local content store requires a path".to_string(),
                    )
                })?;
                tokio::fs::create_dir_all(path).await?;
                Arc::new(
                    LocalFileSystem::new_with_prefix(path)
                        .map_err(|e| ContentStoreSetupError::InvalidConfig(e.to_string()))?,
                )
            }

            ContentStoreConfig::S3 {
                endpoint,
                access_key,
                secret_key,
                bucket,
                region,
            } => {
                let store: Arc<dyn ObjectStore> = Arc::new(
                    AmazonS3Builder::new()
                        .with_endpoint(endpoint)
                        .with_access_key_id(access_key)
                        .with_secret_access_key(secret_key)
                        .with_bucket_name(bucket)
                        .with_region(region.as_deref().unwrap_or("us-east-1"))
                        .with_allow_http(endpoint.starts_with("http://"))
                        .build()
                        .map_err(|e| ContentStoreSetupError::InvalidConfig(e.to_string()))?,
                );

                // fail fast on a missing bucket
                {
                    use futures::TryStreamExt;
                    let prefix = ObjectPath::from("");
                    let mut stream = store.list(Some(&prefix));
                    match stream.try_next().await {
                        Ok(_) => {}
                        Err(object_store::Error::NotFound { .. }) => {
                            return Err(ContentStoreSetupError::BucketNotFound(bucket.clone()));
                        }
                        Err(e) => {
                            if e.to_string().contains("NoSuchBucket") {
                                return Err(ContentStoreSetupError::BucketNotFound(
                                    bucket.clone(),
                                ));
                            }
                            return Err(e.into());
                        }
                    }
                }

                store
            }
        };

        Ok(Self { inner })
    }

    pub fn memory() -> Self {
        Self {
            inner: Arc::new(InMemory::new()),
        }
    }

    fn content_path(address: &ContentAddress) -> ObjectPath {
        ObjectPath::from(format!("content/{}", address))
    }

    /// Read a blob back, `None` if it was never stored.
    pub async fn get(&self, address: &ContentAddress) -> Result<Option<Bytes>, ContentStoreError> {
        match self.inner.get(&Self::content_path(address)).await {
            Ok(result) => {
                let bytes = result
                    .bytes()
                    .await
                    .map_err(|e| ContentStoreError::Unavailable(e.into()))?;
                Ok(Some(bytes))
            }
            Err(object_store::Error::NotFound { .. }) => Ok(None),
            Err(e) => Err(ContentStoreError::Unavailable(e.into())),
        }
    }
}

#[async_trait]
impl ContentStore for ObjectContentStore {
    async fn put(&self, content: Bytes) -> Result<ContentAddress, ContentStoreError> {
        check_size(&content)?;

        let address = ContentAddress::for_content(&content);
        self.inner
            .put(&Self::content_path(&address), content.into())
            .await
            .map_err(|e| ContentStoreError::Unavailable(e.into()))?;

        tracing::debug!(%address, "stored content");
        Ok(address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::content_store::MAX_CONTENT_SIZE_BYTES;

    #[tokio::test]
    async fn test_put_and_get() {
        let store = ObjectContentStore::memory();
        let content = Bytes::from_static(b"{\"title\":\"retro\"}");

        let address = store.put(content.clone()).await.unwrap();
        assert_eq!(address, ContentAddress::for_content(&content));
        assert_eq!(store.get(&address).await.unwrap(), Some(content.clone()));

        // idempotent
        assert_eq!(store.put(content).await.unwrap(), address);
    }

    #[tokio::test]
    async fn test_missing_content() {
        let store = ObjectContentStore::memory();
        let address = ContentAddress::for_content(b"never stored");
        assert_eq!(store.get(&address).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_rejects_oversized() {
        let store = ObjectContentStore::memory();
        let content = Bytes::from(vec![0u8; MAX_CONTENT_SIZE_BYTES + 1]);
        assert!(matches!(
            store.put(content).await,
            Err(ContentStoreError::TooLarge { .. })
        ));
    }

    #[tokio::test]
    async fn test_local_backend() {
        let dir = tempfile::tempdir().unwrap();
        let config = ContentStoreConfig::Local {
            path: Some(dir.path().join("content")),
        };
        let store = ObjectContentStore::new(&config).await.unwrap();

        let address = store.put(Bytes::from_static(b"on disk")).await.unwrap();
        assert!(dir
            .path()
            .join("content")
            .join("content")
            .join(address.to_string())
            .exists());
    }

    #[tokio::test]
    async fn test_local_backend_requires_path() {
        let config = ContentStoreConfig::Local { path: None };
        assert!(matches!(
            ObjectContentStore::new(&config).await,
            Err(ContentStoreSetupError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_config_toml() {
        let config: ContentStoreConfig = toml::from_str(
            r#"
            type = "s3"
            endpoint = "http://localhost:9000"
            access_key = "minioadmin"
            secret_key = "minioadmin"
            bucket = "boards"
            "#,
        )
        .unwrap();
        assert!(matches!(config, ContentStoreConfig::S3 { region: None, .. }));
    }
}
