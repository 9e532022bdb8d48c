use async_trait::async_trait;
use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::provider::{BoardRegistry, RegistryError, MAX_LIST_LIMIT};
use crate::board::{now_utc, BoardId, BoardRecord, INITIAL_VERSION};
use crate::crypto::PublicKey;
use crate::linked_data::ContentAddress;

/// In-memory board registry
///
/// A single lock guards the whole map; every check-and-set runs under the
///  write lock, which makes `update_pointer` atomic.
#[derive(Debug, Clone)]
pub struct MemoryBoardRegistry {
    inner: Arc<RwLock<MemoryBoardRegistryInner>>,
}

#[derive(Debug, Default)]
struct MemoryBoardRegistryInner {
    /// board_id -> (record, insertion sequence)
    boards: HashMap<BoardId, (BoardRecord, u64)>,
    /// Tiebreaker for boards created within the same microsecond
    next_seq: u64,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MemoryBoardRegistryError {
    #[error("memory registry error: {0}")]
    Internal(String),
}

impl MemoryBoardRegistry {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(MemoryBoardRegistryInner::default())),
        }
    }

    fn read(
        &self,
    ) -> Result<RwLockReadGuard<'_, MemoryBoardRegistryInner>, RegistryError<MemoryBoardRegistryError>>
    {
        self.inner.read().map_err(|e| {
            RegistryError::Unavailable(MemoryBoardRegistryError::Internal(format!(
                "failed to acquire read lock: {}",
                e
            )))
        })
    }

    fn write(
        &self,
    ) -> Result<
        RwLockWriteGuard<'_, MemoryBoardRegistryInner>,
        RegistryError<MemoryBoardRegistryError>,
    > {
        self.inner.write().map_err(|e| {
            RegistryError::Unavailable(MemoryBoardRegistryError::Internal(format!(
                "failed to acquire write lock: {}",
                e
            )))
        })
    }
}

impl Default for MemoryBoardRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Newest first; insertion order breaks timestamp ties
fn newest_first<'a>(
    entries: impl Iterator<Item = &'a (BoardRecord, u64)>,
) -> Vec<BoardRecord> {
    let mut entries: Vec<_> = entries.collect();
    entries.sort_by_key(|(record, seq)| Reverse((record.created_at, *seq)));
    entries.into_iter().map(|(record, _)| record.clone()).collect()
}

#[async_trait]
impl BoardRegistry for MemoryBoardRegistry {
    type Error = MemoryBoardRegistryError;

    async fn create(
        &self,
        owner: PublicKey,
        board_id: BoardId,
        initial_content_address: ContentAddress,
    ) -> Result<BoardRecord, RegistryError<Self::Error>> {
        let mut inner = self.write()?;

        if inner.boards.contains_key(&board_id) {
            return Err(RegistryError::AlreadyExists(board_id));
        }

        let now = now_utc();
        let record = BoardRecord {
            owner,
            board_id: board_id.clone(),
            content_address: initial_content_address,
            created_at: now,
            updated_at: now,
            version: INITIAL_VERSION,
        };

        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner.boards.insert(board_id, (record.clone(), seq));

        Ok(record)
    }

    async fn get(&self, board_id: &BoardId) -> Result<BoardRecord, RegistryError<Self::Error>> {
        let inner = self.read()?;

        inner
            .boards
            .get(board_id)
            .map(|(record, _)| record.clone())
            .ok_or_else(|| RegistryError::NotFound(board_id.clone()))
    }

    async fn list_by_owner(
        &self,
        owner: &PublicKey,
    ) -> Result<Vec<BoardRecord>, RegistryError<Self::Error>> {
        let inner = self.read()?;

        Ok(newest_first(
            inner
                .boards
                .values()
                .filter(|(record, _)| &record.owner == owner),
        ))
    }

    async fn list_recent(
        &self,
        limit: usize,
    ) -> Result<Vec<BoardRecord>, RegistryError<Self::Error>> {
        let inner = self.read()?;

        let mut records = newest_first(inner.boards.values());
        records.truncate(limit.min(MAX_LIST_LIMIT));
        Ok(records)
    }

    async fn update_pointer(
        &self,
        board_id: &BoardId,
        expected_version: u64,
        new_content_address: ContentAddress,
    ) -> Result<BoardRecord, RegistryError<Self::Error>> {
        let mut inner = self.write()?;

        let (record, _) = inner
            .boards
            .get_mut(board_id)
            .ok_or_else(|| RegistryError::NotFound(board_id.clone()))?;

        if record.version != expected_version {
            return Err(RegistryError::VersionConflict {
                board_id: board_id.clone(),
                expected: expected_version,
                actual: record.version,
            });
        }

        record.content_address = new_content_address;
        record.version += 1;
        record.updated_at = now_utc().max(record.updated_at);

        Ok(record.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::SecretKey;

    fn id(s: &str) -> BoardId {
        BoardId::new(s).unwrap()
    }

    fn cid(s: &str) -> ContentAddress {
        ContentAddress::for_content(s.as_bytes())
    }

    #[tokio::test]
    async fn test_create_starts_at_version_one() {
        let registry = MemoryBoardRegistry::new();
        let alice = SecretKey::generate().public();

        let record = registry.create(alice, id("b1"), cid("cid-1")).await.unwrap();
        assert_eq!(record.version, INITIAL_VERSION);
        assert_eq!(record.content_address, cid("cid-1"));
        assert_eq!(record.created_at, record.updated_at);
        assert_eq!(registry.get(&id("b1")).await.unwrap(), record);
    }

    #[tokio::test]
    async fn test_create_never_overwrites() {
        let registry = MemoryBoardRegistry::new();
        let alice = SecretKey::generate().public();
        let bob = SecretKey::generate().public();

        registry.create(alice, id("b1"), cid("cid-1")).await.unwrap();

        let result = registry.create(alice, id("b1"), cid("cid-9")).await;
        assert_eq!(result, Err(RegistryError::AlreadyExists(id("b1"))));

        // ids are global: another owner cannot claim it either
        let result = registry.create(bob, id("b1"), cid("cid-9")).await;
        assert_eq!(result, Err(RegistryError::AlreadyExists(id("b1"))));

        let record = registry.get(&id("b1")).await.unwrap();
        assert_eq!(record.content_address, cid("cid-1"));
        assert_eq!(record.owner, alice);
    }

    #[tokio::test]
    async fn test_get_missing() {
        let registry = MemoryBoardRegistry::new();
        assert_eq!(
            registry.get(&id("nope")).await,
            Err(RegistryError::NotFound(id("nope")))
        );
        assert_eq!(registry.find(&id("nope")).await, Ok(None));
    }

    #[tokio::test]
    async fn test_update_pointer_advances_version() {
        let registry = MemoryBoardRegistry::new();
        let alice = SecretKey::generate().public();
        let created = registry.create(alice, id("b1"), cid("cid-1")).await.unwrap();

        let updated = registry
            .update_pointer(&id("b1"), 1, cid("cid-2"))
            .await
            .unwrap();
        assert_eq!(updated.version, 2);
        assert_eq!(updated.content_address, cid("cid-2"));
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at >= created.updated_at);
    }

    #[tokio::test]
    async fn test_stale_update_writes_nothing() {
        let registry = MemoryBoardRegistry::new();
        let alice = SecretKey::generate().public();
        registry.create(alice, id("b1"), cid("cid-1")).await.unwrap();
        registry
            .update_pointer(&id("b1"), 1, cid("cid-2"))
            .await
            .unwrap();
        let before = registry.get(&id("b1")).await.unwrap();

        let result = registry.update_pointer(&id("b1"), 1, cid("cid-3")).await;
        assert_eq!(
            result,
            Err(RegistryError::VersionConflict {
                board_id: id("b1"),
                expected: 1,
                actual: 2,
            })
        );
        assert_eq!(registry.get(&id("b1")).await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_update_missing_board() {
        let registry = MemoryBoardRegistry::new();
        let result = registry.update_pointer(&id("b1"), 1, cid("cid-2")).await;
        assert_eq!(result, Err(RegistryError::NotFound(id("b1"))));
    }

    #[tokio::test]
    async fn test_list_by_owner_newest_first() {
        let registry = MemoryBoardRegistry::new();
        let alice = SecretKey::generate().public();
        let bob = SecretKey::generate().public();

        for name in ["a1", "a2", "a3"] {
            registry.create(alice, id(name), cid(name)).await.unwrap();
        }
        registry.create(bob, id("b1"), cid("b1")).await.unwrap();

        let boards = registry.list_by_owner(&alice).await.unwrap();
        let ids: Vec<_> = boards.iter().map(|b| b.board_id.as_str()).collect();
        assert_eq!(ids, vec!["a3", "a2", "a1"]);
        assert!(boards.iter().all(|b| b.owner == alice));
        assert!(boards.windows(2).all(|w| w[0].created_at >= w[1].created_at));

        let nobody = SecretKey::generate().public();
        assert!(registry.list_by_owner(&nobody).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_recent_respects_limit() {
        let registry = MemoryBoardRegistry::new();
        let alice = SecretKey::generate().public();
        for i in 0..5 {
            let name = format!("b{}", i);
            registry.create(alice, id(&name), cid(&name)).await.unwrap();
        }

        let recent = registry.list_recent(3).await.unwrap();
        let ids: Vec<_> = recent.iter().map(|b| b.board_id.as_str()).collect();
        assert_eq!(ids, vec!["b4", "b3", "b2"]);

        assert!(registry.list_recent(0).await.unwrap().is_empty());
        assert_eq!(registry.list_recent(100).await.unwrap().len(), 5);
    }
}
