//! SQLite storage for identity records and governance state

use crate::record::IdentityRecord;
use chrono::{DateTime, Utc};
use idsafe_core::{ActorId, IdentityHash};
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;
use thiserror::Error;

/// Errors from the identity store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Corrupt store data: {0}")]
    Corrupt(String),
}

/// Checkpointed governance state: administrator, validator set, threshold.
///
/// Saved on every governance mutation and loaded at startup; the seed
/// config is only consulted when no checkpoint exists yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernanceState {
    pub admin: ActorId,
    pub validators: Vec<ActorId>,
    pub required_approvals: u32,
}

/// SQLite storage for identity records
pub struct IdentityStore {
    conn: Connection,
}

impl IdentityStore {
    /// Open (or create) a store at the given database path
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    /// Create an in-memory store (for testing)
    pub fn in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<(), StoreError> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS identities (
                subject TEXT PRIMARY KEY,
                data_hash TEXT NOT NULL,
                approvers_json TEXT NOT NULL,
                registered INTEGER NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_identities_registered
             ON identities(registered)",
            [],
        )?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS governance (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
            [],
        )?;

        Ok(())
    }

    /// Save (insert or replace) a subject's record
    pub fn save(&self, subject: &ActorId, record: &IdentityRecord) -> Result<(), StoreError> {
        let approvers_json = serde_json::to_string(&record.approvers)?;

        self.conn.execute(
            "INSERT OR REPLACE INTO identities
             (subject, data_hash, approvers_json, registered, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                subject.as_str(),
                record.data_hash.to_hex(),
                approvers_json,
                record.registered as i64,
                record.created_at.to_rfc3339(),
                record.updated_at.to_rfc3339(),
            ],
        )?;

        Ok(())
    }

    /// Get a subject's record, or `None` if the subject was never registered
    pub fn get(&self, subject: &ActorId) -> Result<Option<IdentityRecord>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT data_hash, approvers_json, registered, created_at, updated_at
             FROM identities WHERE subject = ?1",
        )?;

        let row = stmt.query_row(params![subject.as_str()], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, i64>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
            ))
        });

        let (hash_hex, approvers_json, registered, created_at, updated_at) = match row {
            Ok(values) => values,
            Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
            Err(other) => return Err(StoreError::Database(other)),
        };

        let data_hash = IdentityHash::from_hex(&hash_hex)
            .map_err(|e| StoreError::Corrupt(format!("bad hash for {}: {}", subject, e)))?;
        let approvers: BTreeSet<ActorId> = serde_json::from_str(&approvers_json)?;

        Ok(Some(IdentityRecord {
            data_hash,
            approvers,
            registered: registered != 0,
            created_at: parse_timestamp(&created_at)?,
            updated_at: parse_timestamp(&updated_at)?,
        }))
    }

    /// Check whether a record exists for the subject
    pub fn contains(&self, subject: &ActorId) -> Result<bool, StoreError> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM identities WHERE subject = ?1",
            params![subject.as_str()],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// List all subjects with a record, in sorted order
    pub fn subjects(&self) -> Result<Vec<ActorId>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT subject FROM identities ORDER BY subject")?;

        let ids: Vec<String> = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<_>, _>>()?;

        ids.into_iter()
            .map(|id| {
                ActorId::new(id.clone())
                    .map_err(|e| StoreError::Corrupt(format!("bad subject {}: {}", id, e)))
            })
            .collect()
    }

    /// Count registered subjects
    pub fn count_registered(&self) -> Result<usize, StoreError> {
        self.count_where("registered = 1")
    }

    /// Count subjects with a record but no registration yet
    pub fn count_pending(&self) -> Result<usize, StoreError> {
        self.count_where("registered = 0")
    }

    fn count_where(&self, predicate: &str) -> Result<usize, StoreError> {
        let sql = format!("SELECT COUNT(*) FROM identities WHERE {}", predicate);
        let count: i64 = self.conn.query_row(&sql, [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Load the governance checkpoint, or `None` on a fresh store
    pub fn load_governance(&self) -> Result<Option<GovernanceState>, StoreError> {
        let row: Result<String, _> = self.conn.query_row(
            "SELECT value FROM governance WHERE key = 'state'",
            [],
            |row| row.get(0),
        );

        match row {
            Ok(json) => Ok(Some(serde_json::from_str(&json)?)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(other) => Err(StoreError::Database(other)),
        }
    }

    /// Checkpoint the governance state
    pub fn save_governance(&self, state: &GovernanceState) -> Result<(), StoreError> {
        let json = serde_json::to_string(state)?;
        self.conn.execute(
            "INSERT OR REPLACE INTO governance (key, value) VALUES ('state', ?1)",
            params![json],
        )?;
        Ok(())
    }
}

fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StoreError::Corrupt(format!("bad timestamp {}: {}", s, e)))
}
