use async_trait::async_trait;
use time::OffsetDateTime;

use common::board::{now_utc, BoardId, BoardRecord, INITIAL_VERSION};
use common::board_registry::{BoardRegistry, RegistryError, MAX_LIST_LIMIT};
use common::crypto::PublicKey;
use common::linked_data::ContentAddress;

use crate::database::types::{DContentAddress, DPublicKey};
use crate::database::Database;

const BOARD_COLUMNS: &str = "board_id, owner, content_address, created_at, updated_at, version";

#[derive(sqlx::FromRow)]
struct BoardRow {
    board_id: String,
    owner: DPublicKey,
    content_address: DContentAddress,
    created_at: i64,
    updated_at: i64,
    version: i64,
}

impl TryFrom<BoardRow> for BoardRecord {
    type Error = sqlx::Error;

    fn try_from(row: BoardRow) -> Result<Self, Self::Error> {
        Ok(BoardRecord {
            owner: row.owner.into(),
            board_id: BoardId::new(row.board_id).map_err(|e| sqlx::Error::Decode(e.into()))?,
            content_address: row.content_address.into(),
            created_at: from_micros(row.created_at)?,
            updated_at: from_micros(row.updated_at)?,
            version: u64::try_from(row.version).map_err(|e| sqlx::Error::Decode(e.into()))?,
        })
    }
}

fn to_micros(at: OffsetDateTime) -> i64 {
    (at.unix_timestamp_nanos() / 1_000) as i64
}

fn from_micros(micros: i64) -> Result<OffsetDateTime, sqlx::Error> {
    OffsetDateTime::from_unix_timestamp_nanos(i128::from(micros) * 1_000)
        .map_err(|e| sqlx::Error::Decode(e.into()))
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.is_unique_violation(),
        _ => false,
    }
}

fn rows_to_records(rows: Vec<BoardRow>) -> Result<Vec<BoardRecord>, RegistryError<sqlx::Error>> {
    rows.into_iter()
        .map(|row| BoardRecord::try_from(row).map_err(RegistryError::Unavailable))
        .collect()
}

#[async_trait]
impl BoardRegistry for Database {
    type Error = sqlx::Error;

    async fn create(
        &self,
        owner: PublicKey,
        board_id: BoardId,
        initial_content_address: ContentAddress,
    ) -> Result<BoardRecord, RegistryError<Self::Error>> {
        let now = to_micros(now_utc());

        let row: BoardRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO boards (board_id, owner, content_address, created_at, updated_at, version)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING {BOARD_COLUMNS}
            "#
        ))
        .bind(board_id.as_str())
        .bind(DPublicKey::from(owner))
        .bind(DContentAddress::from(initial_content_address))
        .bind(now)
        .bind(now)
        .bind(INITIAL_VERSION as i64)
        .fetch_one(&**self)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                RegistryError::AlreadyExists(board_id.clone())
            } else {
                RegistryError::Unavailable(e)
            }
        })?;

        Ok(BoardRecord::try_from(row)?)
    }

    async fn get(&self, board_id: &BoardId) -> Result<BoardRecord, RegistryError<Self::Error>> {
        let row: Option<BoardRow> = sqlx::query_as(&format!(
            "SELECT {BOARD_COLUMNS} FROM boards WHERE board_id = ?"
        ))
        .bind(board_id.as_str())
        .fetch_optional(&**self)
        .await?;

        match row {
            Some(row) => Ok(BoardRecord::try_from(row)?),
            None => Err(RegistryError::NotFound(board_id.clone())),
        }
    }

    async fn list_by_owner(
        &self,
        owner: &PublicKey,
    ) -> Result<Vec<BoardRecord>, RegistryError<Self::Error>> {
        let rows: Vec<BoardRow> = sqlx::query_as(&format!(
            r#"
            SELECT {BOARD_COLUMNS}
            FROM boards
            WHERE owner = ?
            ORDER BY created_at DESC, rowid DESC
            "#
        ))
        .bind(DPublicKey::from(*owner))
        .fetch_all(&**self)
        .await?;

        rows_to_records(rows)
    }

    async fn list_recent(
        &self,
        limit: usize,
    ) -> Result<Vec<BoardRecord>, RegistryError<Self::Error>> {
        let limit = limit.min(MAX_LIST_LIMIT) as i64;

        let rows: Vec<BoardRow> = sqlx::query_as(&format!(
            r#"
            SELECT {BOARD_COLUMNS}
            FROM boards
            ORDER BY created_at DESC, rowid DESC
            LIMIT ?
            "#
        ))
        .bind(limit)
        .fetch_all(&**self)
        .await?;

        rows_to_records(rows)
    }

    async fn update_pointer(
        &self,
        board_id: &BoardId,
        expected_version: u64,
        new_content_address: ContentAddress,
    ) -> Result<BoardRecord, RegistryError<Self::Error>> {
        let now = to_micros(now_utc());

        // no stored version is this large
        let Ok(expected) = i64::try_from(expected_version) else {
            let current = self.get(board_id).await?;
            return Err(RegistryError::VersionConflict {
                board_id: board_id.clone(),
                expected: expected_version,
                actual: current.version,
            });
        };

        // check and set in a single statement
        let row: Option<BoardRow> = sqlx::query_as(&format!(
            r#"
            UPDATE boards
            SET content_address = ?,
                version = version + 1,
                updated_at = MAX(updated_at, ?)
            WHERE board_id = ? AND version = ?
            RETURNING {BOARD_COLUMNS}
            "#
        ))
        .bind(DContentAddress::from(new_content_address))
        .bind(now)
        .bind(board_id.as_str())
        .bind(expected)
        .fetch_optional(&**self)
        .await?;

        if let Some(row) = row {
            return Ok(BoardRecord::try_from(row)?);
        }

        // nothing matched: either no such board or a stale version
        let current = self.get(board_id).await?;
        Err(RegistryError::VersionConflict {
            board_id: board_id.clone(),
            expected: expected_version,
            actual: current.version,
        })
    }
}
