//! # IDSafe Approval Engine
//!
//! The registration lifecycle state machine. Per subject:
//!
//! Unregistered -> PendingApproval -> Approved
//!
//! A subject becomes Approved once a quorum of distinct validators has
//! approved its current hash; revocation (admin-only) returns it to
//! Unregistered while retaining the hash.
//!
//! ## Atomicity
//! The engine exclusively owns all mutable state (roles, threshold,
//! records) and every mutating operation takes `&mut self`, so no two
//! mutations can interleave. Callers needing concurrent access wrap the
//! engine in a `Mutex` or a single-writer task.
//!
//! ## History
//! Every accepted mutation is appended to an append-only JSONL audit
//! ledger and checkpointed to the SQLite store before the call returns.

mod audit;
mod config;
mod engine;
mod error;
mod event;

pub use audit::{AuditError, AuditLedger};
pub use config::EngineConfig;
pub use engine::{ApprovalEngine, ApprovalOutcome, EngineStats};
pub use error::EngineError;
pub use event::RegistryEvent;
