use std::future::Future;
use std::time::Duration;

use bytes::Bytes;

use super::config::SyncConfig;
use super::error::{Phase, SyncError};
use super::request::{CreateBoardRequest, PublishUpdateRequest};
use crate::board::{BoardId, BoardRecord, INITIAL_VERSION};
use crate::board_registry::{BoardRegistry, RegistryError, MAX_LIST_LIMIT};
use crate::content_store::{check_size, ContentStore};
use crate::crypto::{Ed25519Verifier, PublicKey, SignatureVerifier};
use crate::linked_data::ContentAddress;
use crate::mutation::MutationRequest;

/// Runs the publish protocol against a registry and a content store.
///
/// A publish is three phases over two independently failing resources:
///
/// 1. **Stage**: put the content in the store. Failure aborts with no
///    effect anywhere.
/// 2. **Authenticate**: verify the signature over the canonical mutation
///    message. Failure aborts; staged content is left as an unreferenced
///    orphan.
/// 3. **Commit**: create the record, or swap its pointer conditionally on
///    the signed `expected_version`.
///
/// A version conflict is never retried here, since the signer only
///  authorized a swap from the version they signed. A commit that times out
///  may still have landed, so it is resolved by re-reading the record.
#[derive(Debug, Clone)]
pub struct SyncCoordinator<R, S, V = Ed25519Verifier> {
    registry: R,
    store: S,
    verifier: V,
    config: SyncConfig,
}

impl<R, S> SyncCoordinator<R, S, Ed25519Verifier>
where
    R: BoardRegistry,
    S: ContentStore,
{
    pub fn new(registry: R, store: S) -> Self {
        Self::with_verifier(registry, store, Ed25519Verifier)
    }
}

/// Outcome of a commit attempt that may or may not have been applied
enum Attempt {
    Done(BoardRecord),
    Ambiguous(String),
}

impl<R, S, V> SyncCoordinator<R, S, V>
where
    R: BoardRegistry,
    S: ContentStore,
    V: SignatureVerifier,
{
    pub fn with_verifier(registry: R, store: S, verifier: V) -> Self {
        Self {
            registry,
            store,
            verifier,
            config: SyncConfig::default(),
        }
    }

    pub fn with_config(mut self, config: SyncConfig) -> Self {
        self.config = config;
        self
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Phase 1: persist content and return its address
    pub async fn stage(&self, content: Bytes) -> Result<ContentAddress, SyncError> {
        check_size(&content).map_err(SyncError::from_store)?;

        let limit = self.config.timeouts.stage;
        let address = within(
            Phase::Stage,
            limit,
            self.config.retry.run(Phase::Stage, || {
                let content = content.clone();
                async move { self.store.put(content).await.map_err(SyncError::from_store) }
            }),
        )
        .await?;

        tracing::debug!(content_address = %address, "staged content");
        Ok(address)
    }

    /// Phase 2: check the request's signature against its owner
    pub async fn authenticate(&self, request: &MutationRequest) -> Result<(), SyncError> {
        let verifier = self.verifier.clone();
        let owned = request.clone();
        let limit = self.config.timeouts.authenticate;

        let verified = within(Phase::Authenticate, limit, async move {
            tokio::task::spawn_blocking(move || owned.verify(&verifier))
                .await
                .map_err(|e| SyncError::Unavailable {
                    phase: Phase::Authenticate,
                    reason: e.to_string(),
                })
        })
        .await?;

        if !verified {
            tracing::warn!(
                board_id = %request.board_id,
                owner = %request.owner,
                operation = ?request.operation,
                "rejected mutation with invalid signature"
            );
            return Err(SyncError::InvalidSignature(request.board_id.clone()));
        }
        Ok(())
    }

    /// Create a board whose initial content is already in the store
    pub async fn create_board(
        &self,
        request: CreateBoardRequest,
    ) -> Result<BoardRecord, SyncError> {
        let mutation = MutationRequest::create(
            request.owner,
            request.board_id,
            request.initial_content_address,
            request.signature,
        );

        self.authenticate(&mutation).await?;
        let record = self.commit_create(&mutation).await?;

        tracing::info!(
            board_id = %record.board_id,
            owner = %record.owner,
            content_address = %record.content_address,
            "created board"
        );
        Ok(record)
    }

    /// Stage `content`, then create a board pointing at it. The
    ///  signature must cover the address of `content`.
    pub async fn create_board_with_content(
        &self,
        owner: PublicKey,
        board_id: BoardId,
        content: Bytes,
        signature: Vec<u8>,
    ) -> Result<BoardRecord, SyncError> {
        let initial_content_address = self.stage(content).await?;
        self.create_board(CreateBoardRequest {
            owner,
            board_id,
            initial_content_address,
            signature,
        })
        .await
    }

    /// Swap a board's pointer to content already in the store
    pub async fn publish_update(
        &self,
        request: PublishUpdateRequest,
    ) -> Result<BoardRecord, SyncError> {
        if request.expected_version < INITIAL_VERSION {
            return Err(SyncError::MalformedRequest(format!(
                "expected_version must be at least {}",
                INITIAL_VERSION
            )));
        }

        // the signature is checked against the owner on record
        let current = self
            .read(|| self.registry.get(&request.board_id))
            .await?;

        let mutation = MutationRequest::update(
            current.owner,
            request.board_id,
            request.new_content_address,
            request.expected_version,
            request.signature,
        );

        self.authenticate(&mutation).await?;
        let record = self.commit_update(&mutation).await?;

        tracing::info!(
            board_id = %record.board_id,
            version = record.version,
            content_address = %record.content_address,
            "published board update"
        );
        Ok(record)
    }

    /// Stage `content`, then swap the board's pointer to it
    pub async fn publish_content(
        &self,
        board_id: BoardId,
        expected_version: u64,
        content: Bytes,
        signature: Vec<u8>,
    ) -> Result<BoardRecord, SyncError> {
        let new_content_address = self.stage(content).await?;
        self.publish_update(PublishUpdateRequest {
            board_id,
            expected_version,
            new_content_address,
            signature,
        })
        .await
    }

    pub async fn get_board(&self, board_id: &BoardId) -> Result<Option<BoardRecord>, SyncError> {
        self.read(|| self.registry.find(board_id)).await
    }

    pub async fn list_boards_by_owner(
        &self,
        owner: &PublicKey,
    ) -> Result<Vec<BoardRecord>, SyncError> {
        self.read(|| self.registry.list_by_owner(owner)).await
    }

    pub async fn list_recent_boards(&self, limit: usize) -> Result<Vec<BoardRecord>, SyncError> {
        let limit = limit.min(MAX_LIST_LIMIT);
        self.read(|| self.registry.list_recent(limit)).await
    }

    /// Registry read with the read timeout and retry policy applied
    async fn read<T, F, Fut>(&self, mut op: F) -> Result<T, SyncError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, RegistryError<R::Error>>>,
    {
        within(
            Phase::Read,
            self.config.timeouts.read,
            self.config.retry.run(Phase::Read, || {
                let fut = op();
                async move { fut.await.map_err(|e| SyncError::from_registry(e, Phase::Read)) }
            }),
        )
        .await
    }

    async fn commit_create(&self, request: &MutationRequest) -> Result<BoardRecord, SyncError> {
        let attempts = self.config.commit_attempts.max(1);
        let mut reason = String::new();

        for attempt in 1..=attempts {
            let outcome = tokio::time::timeout(
                self.config.timeouts.commit,
                self.registry.create(
                    request.owner,
                    request.board_id.clone(),
                    request.new_content_address,
                ),
            )
            .await;

            match classify(outcome, self.config.timeouts.commit)? {
                Attempt::Done(record) => return Ok(record),
                Attempt::Ambiguous(why) => reason = why,
            }

            tracing::warn!(
                board_id = %request.board_id,
                attempt,
                reason = %reason,
                "create outcome unknown, re-reading board"
            );

            match self.read(|| self.registry.find(&request.board_id)).await? {
                Some(record)
                    if record.owner == request.owner
                        && record.version == INITIAL_VERSION
                        && record.content_address == request.new_content_address =>
                {
                    tracing::info!(board_id = %record.board_id, "create had landed");
                    return Ok(record);
                }
                Some(_) => return Err(SyncError::AlreadyExists(request.board_id.clone())),
                // nothing landed, safe to resubmit
                None => continue,
            }
        }

        Err(SyncError::Unavailable {
            phase: Phase::Commit,
            reason,
        })
    }

    /// Conditional pointer swap. An ambiguous attempt is resolved by
    ///  re-reading the board. If another writer has already moved it past
    ///  `expected + 1`, this attempt's outcome cannot be told apart from a
    ///  lost race and is reported as a conflict.
    async fn commit_update(&self, request: &MutationRequest) -> Result<BoardRecord, SyncError> {
        let attempts = self.config.commit_attempts.max(1);
        let expected = request.expected_version;
        let mut reason = String::new();

        for attempt in 1..=attempts {
            let outcome = tokio::time::timeout(
                self.config.timeouts.commit,
                self.registry.update_pointer(
                    &request.board_id,
                    expected,
                    request.new_content_address,
                ),
            )
            .await;

            match classify(outcome, self.config.timeouts.commit)? {
                Attempt::Done(record) => return Ok(record),
                Attempt::Ambiguous(why) => reason = why,
            }

            tracing::warn!(
                board_id = %request.board_id,
                expected_version = expected,
                attempt,
                reason = %reason,
                "commit outcome unknown, re-reading board"
            );

            let current = self.read(|| self.registry.get(&request.board_id)).await?;
            if current.is_successor_of(expected, &request.new_content_address) {
                tracing::info!(
                    board_id = %current.board_id,
                    version = current.version,
                    "commit had landed"
                );
                return Ok(current);
            }
            if current.version != expected {
                if current.version > expected {
                    tracing::warn!(
                        board_id = %request.board_id,
                        expected_version = expected,
                        current_version = current.version,
                        "commit outcome unresolved, board moved on before the re-read"
                    );
                }
                return Err(SyncError::VersionConflict {
                    board_id: request.board_id.clone(),
                    expected,
                    current: current.version,
                });
            }
            // still at the signed version: nothing landed, safe to resubmit
        }

        Err(SyncError::Unavailable {
            phase: Phase::Commit,
            reason,
        })
    }
}

/// Split a commit result into a definite outcome and an ambiguous one.
///  Terminal registry errors are returned as errors.
fn classify<E: std::fmt::Display>(
    outcome: Result<Result<BoardRecord, RegistryError<E>>, tokio::time::error::Elapsed>,
    limit: Duration,
) -> Result<Attempt, SyncError> {
    match outcome {
        Ok(Ok(record)) => Ok(Attempt::Done(record)),
        Ok(Err(RegistryError::Unavailable(e))) => Ok(Attempt::Ambiguous(e.to_string())),
        Ok(Err(e)) => Err(SyncError::from_registry(e, Phase::Commit)),
        Err(_) => Ok(Attempt::Ambiguous(format!(
            "timed out after {}ms",
            limit.as_millis()
        ))),
    }
}

async fn within<T>(
    phase: Phase,
    limit: Duration,
    fut: impl Future<Output = Result<T, SyncError>>,
) -> Result<T, SyncError> {
    tokio::time::timeout(limit, fut)
        .await
        .unwrap_or_else(|_| Err(SyncError::timed_out(phase, limit)))
}
