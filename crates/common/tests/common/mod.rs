//! Shared test utilities for sync protocol integration tests
#![allow(dead_code)]

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;

use common::board::{BoardId, BoardRecord, INITIAL_VERSION};
use common::board_registry::{BoardRegistry, MemoryBoardRegistry, RegistryError};
use common::content_store::{ContentStore, ContentStoreError, MemoryContentStore};
use common::crypto::{PublicKey, SecretKey};
use common::linked_data::ContentAddress;
use common::mutation::{MutationRequest, Operation};
use common::sync::{
    CreateBoardRequest, PhaseTimeouts, PublishUpdateRequest, RetryPolicy, SyncConfig,
    SyncCoordinator,
};

pub type MemoryCoordinator = SyncCoordinator<MemoryBoardRegistry, MemoryContentStore>;

/// Timeouts short enough to exercise in tests
pub fn fast_config() -> SyncConfig {
    SyncConfig {
        timeouts: PhaseTimeouts {
            stage: Duration::from_millis(500),
            authenticate: Duration::from_millis(500),
            commit: Duration::from_millis(100),
            read: Duration::from_millis(500),
        },
        retry: RetryPolicy {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(1),
            max_backoff: Duration::from_millis(5),
        },
        commit_attempts: 2,
    }
}

pub fn setup() -> MemoryCoordinator {
    SyncCoordinator::new(MemoryBoardRegistry::new(), MemoryContentStore::new())
        .with_config(fast_config())
}

pub fn board(id: &str) -> BoardId {
    BoardId::new(id).unwrap()
}

pub fn address(label: &str) -> ContentAddress {
    ContentAddress::for_content(label.as_bytes())
}

pub fn signed_create(key: &SecretKey, board_id: &str, label: &str) -> CreateBoardRequest {
    MutationRequest::sign(
        key,
        Operation::Create,
        board(board_id),
        address(label),
        INITIAL_VERSION,
    )
    .unwrap()
    .into()
}

pub fn signed_update(
    key: &SecretKey,
    board_id: &str,
    label: &str,
    expected_version: u64,
) -> PublishUpdateRequest {
    MutationRequest::sign(
        key,
        Operation::Update,
        board(board_id),
        address(label),
        expected_version,
    )
    .unwrap()
    .into()
}

/// Create `board_id` owned by `key`, pointing at `label`
pub async fn create_board<R, S>(
    sync: &SyncCoordinator<R, S>,
    key: &SecretKey,
    board_id: &str,
    label: &str,
) -> BoardRecord
where
    R: BoardRegistry,
    S: ContentStore,
{
    sync.create_board(signed_create(key, board_id, label))
        .await
        .unwrap()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FaultKind {
    /// Fail before touching storage
    Unavailable,
    /// Stall before touching storage, so a timeout drops the write
    StallBeforeWrite(Duration),
    /// Apply the write, then stall, so a timeout hides a landed write
    StallAfterWrite(Duration),
}

#[derive(Debug, Default)]
struct FaultCounters {
    read_failures: AtomicU32,
    commit_faults: std::sync::Mutex<Vec<FaultKind>>,
    commit_calls: AtomicU32,
    reads: AtomicU32,
}

/// Registry that injects storage failures in front of a memory registry
#[derive(Debug, Clone, Default)]
pub struct FaultyRegistry {
    inner: MemoryBoardRegistry,
    counters: Arc<FaultCounters>,
}

impl FaultyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inner(&self) -> &MemoryBoardRegistry {
        &self.inner
    }

    /// Make the next `n` reads fail as unavailable
    pub fn fail_reads(&self, n: u32) {
        self.counters.read_failures.store(n, Ordering::SeqCst);
    }

    /// Queue faults for upcoming commits (`create` and `update_pointer`),
    ///  consumed in order
    pub fn fault_commits(&self, faults: Vec<FaultKind>) {
        let mut queue = self.counters.commit_faults.lock().unwrap();
        *queue = faults;
        queue.reverse();
    }

    pub fn commit_calls(&self) -> u32 {
        self.counters.commit_calls.load(Ordering::SeqCst)
    }

    pub fn reads(&self) -> u32 {
        self.counters.reads.load(Ordering::SeqCst)
    }

    fn read_fault(&self) -> Result<(), RegistryError<String>> {
        self.counters.reads.fetch_add(1, Ordering::SeqCst);
        let failing = self
            .counters
            .read_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(RegistryError::Unavailable("injected read failure".into()));
        }
        Ok(())
    }

    fn next_commit_fault(&self) -> Option<FaultKind> {
        self.counters.commit_calls.fetch_add(1, Ordering::SeqCst);
        self.counters.commit_faults.lock().unwrap().pop()
    }
}

fn lift<T>(result: Result<T, RegistryError<impl std::fmt::Display>>) -> Result<T, RegistryError<String>> {
    result.map_err(|e| match e {
        RegistryError::Unavailable(e) => RegistryError::Unavailable(e.to_string()),
        RegistryError::AlreadyExists(id) => RegistryError::AlreadyExists(id),
        RegistryError::NotFound(id) => RegistryError::NotFound(id),
        RegistryError::VersionConflict {
            board_id,
            expected,
            actual,
        } => RegistryError::VersionConflict {
            board_id,
            expected,
            actual,
        },
    })
}

#[async_trait]
impl BoardRegistry for FaultyRegistry {
    type Error = String;

    async fn create(
        &self,
        owner: PublicKey,
        board_id: BoardId,
        initial_content_address: ContentAddress,
    ) -> Result<BoardRecord, RegistryError<Self::Error>> {
        let fault = self.next_commit_fault();
        match fault {
            Some(FaultKind::Unavailable) => {
                Err(RegistryError::Unavailable("injected commit failure".into()))
            }
            Some(FaultKind::StallBeforeWrite(d)) => {
                tokio::time::sleep(d).await;
                lift(self.inner.create(owner, board_id, initial_content_address).await)
            }
            Some(FaultKind::StallAfterWrite(d)) => {
                let result =
                    lift(self.inner.create(owner, board_id, initial_content_address).await);
                tokio::time::sleep(d).await;
                result
            }
            None => lift(self.inner.create(owner, board_id, initial_content_address).await),
        }
    }

    async fn get(&self, board_id: &BoardId) -> Result<BoardRecord, RegistryError<Self::Error>> {
        self.read_fault()?;
        lift(self.inner.get(board_id).await)
    }

    async fn list_by_owner(
        &self,
        owner: &PublicKey,
    ) -> Result<Vec<BoardRecord>, RegistryError<Self::Error>> {
        self.read_fault()?;
        lift(self.inner.list_by_owner(owner).await)
    }

    async fn list_recent(
        &self,
        limit: usize,
    ) -> Result<Vec<BoardRecord>, RegistryError<Self::Error>> {
        self.read_fault()?;
        lift(self.inner.list_recent(limit).await)
    }

    async fn update_pointer(
        &self,
        board_id: &BoardId,
        expected_version: u64,
        new_content_address: ContentAddress,
    ) -> Result<BoardRecord, RegistryError<Self::Error>> {
        let fault = self.next_commit_fault();
        match fault {
            Some(FaultKind::Unavailable) => {
                Err(RegistryError::Unavailable("injected commit failure".into()))
            }
            Some(FaultKind::StallBeforeWrite(d)) => {
                tokio::time::sleep(d).await;
                lift(
                    self.inner
                        .update_pointer(board_id, expected_version, new_content_address)
                        .await,
                )
            }
            Some(FaultKind::StallAfterWrite(d)) => {
                let result = lift(
                    self.inner
                        .update_pointer(board_id, expected_version, new_content_address)
                        .await,
                );
                tokio::time::sleep(d).await;
                result
            }
            None => lift(
                self.inner
                    .update_pointer(board_id, expected_version, new_content_address)
                    .await,
            ),
        }
    }
}

/// Content store that fails its first `n` puts
#[derive(Debug, Clone, Default)]
pub struct FlakyStore {
    inner: MemoryContentStore,
    failures: Arc<AtomicU32>,
    puts: Arc<AtomicU32>,
    stall: Option<Duration>,
}

impl FlakyStore {
    pub fn failing(n: u32) -> Self {
        Self {
            failures: Arc::new(AtomicU32::new(n)),
            ..Self::default()
        }
    }

    pub fn stalling(d: Duration) -> Self {
        Self {
            stall: Some(d),
            ..Self::default()
        }
    }

    pub fn puts(&self) -> u32 {
        self.puts.load(Ordering::SeqCst)
    }

    pub fn inner(&self) -> &MemoryContentStore {
        &self.inner
    }
}

#[async_trait]
impl ContentStore for FlakyStore {
    async fn put(&self, content: Bytes) -> Result<ContentAddress, ContentStoreError> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        if let Some(d) = self.stall {
            tokio::time::sleep(d).await;
        }
        let failing = self
            .failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(ContentStoreError::Unavailable(anyhow::anyhow!(
                "injected store failure"
            )));
        }
        self.inner.put(content).await
    }
}
