use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use bytes::Bytes;

use super::{check_size, ContentStore, ContentStoreError};
use crate::linked_data::ContentAddress;

/// Content store backed by a `HashMap`
#[derive(Debug, Clone, Default)]
pub struct MemoryContentStore {
    blobs: Arc<RwLock<HashMap<ContentAddress, Bytes>>>,
}

impl MemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, address: &ContentAddress) -> Result<Option<Bytes>, ContentStoreError> {
        let blobs = self
            .blobs
            .read()
            .map_err(|e| anyhow::anyhow!("failed to acquire read lock: {}", e))?;
        Ok(blobs.get(address).cloned())
    }

    /// Number of distinct blobs held
    pub fn len(&self) -> usize {
        self.blobs.read().map(|blobs| blobs.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ContentStore for MemoryContentStore {
    async fn put(&self, content: Bytes) -> Result<ContentAddress, ContentStoreError> {
        check_size(&content)?;

        let address = ContentAddress::for_content(&content);
        let mut blobs = self
            .blobs
            .write()
            .map_err(|e| anyhow::anyhow!("failed to acquire write lock: {}", e))?;
        blobs.entry(address).or_insert(content);

        Ok(address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content_store::MAX_CONTENT_SIZE_BYTES;

    #[tokio::test]
    async fn test_put_is_content_addressed() {
        let store = MemoryContentStore::new();

        let a = store.put(Bytes::from_static(b"question 1")).await.unwrap();
        let b = store.put(Bytes::from_static(b"question 1")).await.unwrap();
        let c = store.put(Bytes::from_static(b"question 2")).await.unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a, ContentAddress::for_content(b"question 1"));
        assert_eq!(store.len(), 2);
        assert_eq!(
            store.get(&a).unwrap(),
            Some(Bytes::from_static(b"question 1"))
        );
    }

    #[tokio::test]
    async fn test_rejects_oversized_content() {
        let store = MemoryContentStore::new();
        let blob = Bytes::from(vec![0u8; MAX_CONTENT_SIZE_BYTES + 1]);

        let err = store.put(blob).await.unwrap_err();
        assert!(matches!(err, ContentStoreError::TooLarge { .. }));
        assert!(!err.is_transient());
        assert!(store.is_empty());
    }
}
