//! # IDSafe Store
//!
//! Per-subject identity records and their SQLite-backed persistence.
//!
//! The store exclusively owns all `IdentityRecord`s. State is checkpointed
//! on every mutation and loaded at startup; governance state (admin,
//! validator set, threshold) is checkpointed alongside the records so a
//! restart resumes exactly where the last mutation left off.

mod record;
mod store;

pub use record::{IdentityRecord, IdentityStatus};
pub use store::{GovernanceState, IdentityStore, StoreError};
