//! Audit ledger - append-only JSONL history of registry events
//!
//! Each line is a JSON-serialized RegistryEvent. The file is append-only
//! and never rewritten; the SQLite store holds current state, this ledger
//! holds how it got there.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::event::RegistryEvent;

/// Errors from the audit ledger
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Append-only JSONL ledger of registry events
pub struct AuditLedger {
    path: PathBuf,
    file: Option<File>,
}

impl AuditLedger {
    /// Create a ledger at the given path, creating parent directories
    pub fn new(path: impl AsRef<Path>) -> Result<Self, AuditError> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new().create(true).append(true).open(&path)?;

        Ok(Self {
            path,
            file: Some(file),
        })
    }

    /// Create an in-memory ledger (for testing); appends are dropped
    pub fn in_memory() -> Self {
        Self {
            path: PathBuf::new(),
            file: None,
        }
    }

    /// Append an event, flushing before returning
    pub fn append(&mut self, event: &RegistryEvent) -> Result<(), AuditError> {
        if let Some(ref mut file) = self.file {
            let json = serde_json::to_string(event)?;
            writeln!(file, "{}", json)?;
            file.flush()?;
        } else {
            // In-memory mode - just validate serialization
            let _ = serde_json::to_string(event)?;
        }
        Ok(())
    }

    /// Read every event in append order
    pub fn read_all(&self) -> Result<Vec<RegistryEvent>, AuditError> {
        if self.file.is_none() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);
        let mut events = Vec::new();

        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            events.push(serde_json::from_str(&line)?);
        }

        Ok(events)
    }

    /// Path to the ledger file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check if this is an in-memory ledger
    pub fn is_in_memory(&self) -> bool {
        self.file.is_none()
    }
}
