use std::fmt::Debug;

use async_trait::async_trait;
use bytes::Bytes;

use crate::linked_data::ContentAddress;

mod memory;

pub use memory::MemoryContentStore;

/// Largest blob a store accepts
pub const MAX_CONTENT_SIZE_BYTES: usize = 8 * 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum ContentStoreError {
    /// The store could not be reached or failed to persist the blob.
    ///  Safe to retry: a put is idempotent under content addressing.
    #[error("content store unavailable: {0}")]
    Unavailable(#[from] anyhow::Error),
    #[error("content is {size} bytes, at most {max} allowed")]
    TooLarge { size: usize, max: usize },
}

impl ContentStoreError {
    pub fn is_transient(&self) -> bool {
        matches!(self, ContentStoreError::Unavailable(_))
    }
}

/// A content-addressed blob store.
///
/// Identical bytes always yield the same address. Callers must not assume
///  a blob is readable everywhere right after `put` returns.
#[async_trait]
pub trait ContentStore: Send + Sync + Debug + Clone + 'static {
    /// Persist a blob and return its address
    async fn put(&self, content: Bytes) -> Result<ContentAddress, ContentStoreError>;
}

/// Reject blobs over `MAX_CONTENT_SIZE_BYTES`
pub fn check_size(content: &[u8]) -> Result<(), ContentStoreError> {
    if content.len() > MAX_CONTENT_SIZE_BYTES {
        return Err(ContentStoreError::TooLarge {
            size: content.len(),
            max: MAX_CONTENT_SIZE_BYTES,
        });
    }
    Ok(())
}
