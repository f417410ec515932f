//! IDSafe Core - Domain types
//!
//! This crate contains the fundamental types used across IDSafe:
//! - `ActorId`: Non-empty identifier for admins, NGOs, and subjects
//! - `IdentityHash`: Opaque 32-byte digest of off-system identity data

pub mod actor;
pub mod hash;

pub use actor::{ActorId, ActorIdError};
pub use hash::{HashError, IdentityHash};
