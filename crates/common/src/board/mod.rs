use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use time::OffsetDateTime;

use crate::crypto::PublicKey;
use crate::linked_data::ContentAddress;

/// Version a board record carries right after creation
pub const INITIAL_VERSION: u64 = 1;
/// Longest accepted board id
pub const MAX_BOARD_ID_LEN: usize = 64;

const BOARD_ID_DOMAIN: &[u8] = b"feedboard/board-id/v1";
/// Bytes of the BLAKE3 digest kept by derived ids (hex doubles it)
const DERIVED_ID_BYTES: usize = 16;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum BoardIdError {
    #[error("board id cannot be empty")]
    Empty,
    #[error("board id is {0} characters, at most {max} allowed", max = MAX_BOARD_ID_LEN)]
    TooLong(usize),
    #[error("board id contains invalid character {0:?}")]
    InvalidCharacter(char),
}

/// Identifier of a board.
///
/// Immutable once the board is created. Restricted to ASCII alphanumerics,
/// `-` and `_` so it is safe to embed in URL paths.
#[derive(
    Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, SerializeDisplay, DeserializeFromStr,
)]
pub struct BoardId(String);

impl BoardId {
    pub fn new(id: impl Into<String>) -> Result<Self, BoardIdError> {
        let id = id.into();
        if id.is_empty() {
            return Err(BoardIdError::Empty);
        }
        if id.len() > MAX_BOARD_ID_LEN {
            return Err(BoardIdError::TooLong(id.len()));
        }
        if let Some(c) = id
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
        {
            return Err(BoardIdError::InvalidCharacter(c));
        }
        Ok(Self(id))
    }

    /// Deterministically derive a board id from its owner and a seed
    ///  (a title, a slug, a nonce). The same pair always derives the
    ///  same id; different owners never collide on the same seed.
    pub fn derive(owner: &PublicKey, seed: &str) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(BOARD_ID_DOMAIN);
        hasher.update(&owner.to_bytes());
        hasher.update(seed.as_bytes());
        let digest = hasher.finalize();
        Self(hex::encode(&digest.as_bytes()[..DERIVED_ID_BYTES]))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BoardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for BoardId {
    type Err = BoardIdError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// The registry's record of a board: who owns it and which content
///  version is current.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardRecord {
    pub owner: PublicKey,
    pub board_id: BoardId,
    pub content_address: ContentAddress,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    /// Incremented exactly once per accepted mutation
    pub version: u64,
}

impl BoardRecord {
    /// Whether this record is the result of installing `content_address`
    ///  on top of `expected_version`.
    pub fn is_successor_of(&self, expected_version: u64, content_address: &ContentAddress) -> bool {
        expected_version.checked_add(1) == Some(self.version)
            && &self.content_address == content_address
    }
}

/// Current UTC time at the precision registries persist (microseconds),
///  so a record read back from storage compares equal to the one returned
///  at write time.
pub fn now_utc() -> OffsetDateTime {
    let now = OffsetDateTime::now_utc();
    now.replace_nanosecond(now.nanosecond() / 1_000 * 1_000)
        .unwrap_or(now)
}
