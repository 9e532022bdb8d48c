use std::fmt::{self, Display};
use std::time::Duration;

use crate::board::BoardId;
use crate::board_registry::RegistryError;
use crate::content_store::ContentStoreError;

/// Step of the publish protocol an error surfaced from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Stage,
    Authenticate,
    Commit,
    Read,
}

impl Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Stage => "stage",
            Phase::Authenticate => "authenticate",
            Phase::Commit => "commit",
            Phase::Read => "read",
        };
        f.write_str(name)
    }
}

/// Outcome of a failed coordinator operation. Every variant except
///  `Unavailable` is terminal and reported to the caller as is.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyncError {
    #[error("board already exists: {0}")]
    AlreadyExists(BoardId),
    #[error("board not found: {0}")]
    NotFound(BoardId),
    /// The board moved past the version the signer authorized. The
    ///  caller has to re-read and re-sign.
    #[error("version conflict on board {board_id}: expected {expected}, current {current}")]
    VersionConflict {
        board_id: BoardId,
        expected: u64,
        current: u64,
    },
    #[error("invalid signature for board {0}")]
    InvalidSignature(BoardId),
    #[error("{phase} unavailable: {reason}")]
    Unavailable { phase: Phase, reason: String },
    #[error("malformed request: {0}")]
    MalformedRequest(String),
}

impl SyncError {
    /// Stable machine-readable name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            SyncError::AlreadyExists(_) => "already_exists",
            SyncError::NotFound(_) => "not_found",
            SyncError::VersionConflict { .. } => "version_conflict",
            SyncError::InvalidSignature(_) => "invalid_signature",
            SyncError::Unavailable { .. } => "unavailable",
            SyncError::MalformedRequest(_) => "malformed_request",
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, SyncError::Unavailable { .. })
    }

    pub fn from_registry<T: Display>(err: RegistryError<T>, phase: Phase) -> Self {
        match err {
            RegistryError::Unavailable(e) => SyncError::Unavailable {
                phase,
                reason: e.to_string(),
            },
            RegistryError::AlreadyExists(board_id) => SyncError::AlreadyExists(board_id),
            RegistryError::NotFound(board_id) => SyncError::NotFound(board_id),
            RegistryError::VersionConflict {
                board_id,
                expected,
                actual,
            } => SyncError::VersionConflict {
                board_id,
                expected,
                current: actual,
            },
        }
    }

    pub fn from_store(err: ContentStoreError) -> Self {
        match err {
            ContentStoreError::TooLarge { .. } => SyncError::MalformedRequest(err.to_string()),
            ContentStoreError::Unavailable(e) => SyncError::Unavailable {
                phase: Phase::Stage,
                reason: format!("{:#}", e),
            },
        }
    }

    pub fn timed_out(phase: Phase, after: Duration) -> Self {
        SyncError::Unavailable {
            phase,
            reason: format!("timed out after {}ms", after.as_millis()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_errors_keep_their_kind() {
        let id = BoardId::new("b1").unwrap();

        let err = SyncError::from_registry(
            RegistryError::<String>::VersionConflict {
                board_id: id.clone(),
                expected: 1,
                actual: 2,
            },
            Phase::Commit,
        );
        assert_eq!(
            err,
            SyncError::VersionConflict {
                board_id: id.clone(),
                expected: 1,
                current: 2,
            }
        );
        assert!(!err.is_retryable());

        let err = SyncError::from_registry(
            RegistryError::Unavailable("disk on fire".to_string()),
            Phase::Read,
        );
        assert_eq!(err.kind(), "unavailable");
        assert!(err.is_retryable());
        assert_eq!(err.to_string(), "read unavailable: disk on fire");
    }

    #[test]
    fn test_oversized_content_is_malformed() {
        let err = SyncError::from_store(ContentStoreError::TooLarge { size: 10, max: 5 });
        assert_eq!(err.kind(), "malformed_request");
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_timeout_reason() {
        let err = SyncError::timed_out(Phase::Commit, Duration::from_millis(250));
        assert_eq!(err.to_string(), "commit unavailable: timed out after 250ms");
    }
}
