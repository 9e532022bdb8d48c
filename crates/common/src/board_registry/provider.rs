use std::fmt::{Debug, Display};

use async_trait::async_trait;

use crate::board::{BoardId, BoardRecord};
use crate::crypto::PublicKey;
use crate::linked_data::ContentAddress;

/// Upper bound applied to `list_recent` limits
pub const MAX_LIST_LIMIT: usize = 1000;
/// Limit used when a caller does not ask for one
pub const DEFAULT_LIST_LIMIT: usize = 20;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError<T> {
    /// The backing store could not serve the request. The registry
    ///  never retries; callers decide whether a retry is safe.
    #[error("registry storage unavailable: {0}")]
    Unavailable(#[from] T),
    /// A create targeted a board id that is already taken
    #[error("board already exists: {0}")]
    AlreadyExists(BoardId),
    #[error("board not found: {0}")]
    NotFound(BoardId),
    /// A conditional update observed a different version than the
    ///  one the caller based its mutation on
    #[error("version conflict on board {board_id}: expected {expected}, found {actual}")]
    VersionConflict {
        board_id: BoardId,
        expected: u64,
        actual: u64,
    },
}

/// The authoritative index of boards.
///
/// Board ids are unique across the whole registry, which also makes every
///  `(owner, board_id)` pair unique.
#[async_trait]
pub trait BoardRegistry: Send + Sync + Debug + Clone + 'static {
    type Error: Display + Debug + Send + Sync + 'static;

    /// Register a new board at version 1
    ///
    /// # Arguments
    /// * `owner` - The wallet identity owning the board
    /// * `board_id` - The id to register
    /// * `initial_content_address` - Address of the board's first content
    ///
    /// Should fail with the following errors to be considered
    ///  correct:
    /// * `Err(RegistryError::AlreadyExists)` - The id is taken. The existing
    ///   record is left untouched.
    async fn create(
        &self,
        owner: PublicKey,
        board_id: BoardId,
        initial_content_address: ContentAddress,
    ) -> Result<BoardRecord, RegistryError<Self::Error>>;

    /// Look up a board by id
    ///
    /// # Returns
    /// * `Ok(BoardRecord)` - The current record
    /// * `Err(RegistryError::NotFound)` - No such board
    async fn get(&self, board_id: &BoardId) -> Result<BoardRecord, RegistryError<Self::Error>>;

    /// All boards owned by `owner`, newest first. An owner without
    ///  boards yields an empty list.
    async fn list_by_owner(
        &self,
        owner: &PublicKey,
    ) -> Result<Vec<BoardRecord>, RegistryError<Self::Error>>;

    /// The most recently created boards, newest first, at most
    ///  `limit` of them (capped at `MAX_LIST_LIMIT`).
    async fn list_recent(&self, limit: usize)
        -> Result<Vec<BoardRecord>, RegistryError<Self::Error>>;

    /// Swap a board's content pointer if, and only if, its stored
    ///  version still equals `expected_version`
    ///
    /// On success the record carries the new address, `version` is
    ///  incremented by one and `updated_at` is refreshed. The check and the
    ///  write must be atomic with respect to concurrent callers: of several
    ///  updates racing from the same version at most one may succeed.
    ///
    /// Should fail with the following errors to be considered
    ///  correct:
    /// * `Err(RegistryError::NotFound)` - No such board
    /// * `Err(RegistryError::VersionConflict)` - The stored version differs.
    ///   Nothing is written.
    async fn update_pointer(
        &self,
        board_id: &BoardId,
        expected_version: u64,
        new_content_address: ContentAddress,
    ) -> Result<BoardRecord, RegistryError<Self::Error>>;

    /// Like `get`, but a missing board is `None` rather than an error
    async fn find(
        &self,
        board_id: &BoardId,
    ) -> Result<Option<BoardRecord>, RegistryError<Self::Error>> {
        match self.get(board_id).await {
            Ok(record) => Ok(Some(record)),
            Err(RegistryError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
