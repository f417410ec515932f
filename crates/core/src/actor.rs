//! ActorId - Validated identifier for participants
//!
//! Admins, validator NGOs, and registered subjects are all addressed by
//! an `ActorId`. The empty string is the null identifier and is rejected
//! at construction, so every `ActorId` in the system is non-empty.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur when constructing an ActorId
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ActorIdError {
    #[error("Actor identifier cannot be empty")]
    Empty,

    #[error("Actor identifier too long (max 128 chars): {0}")]
    TooLong(String),
}

/// A non-empty identifier for a participant (admin, NGO, or subject).
///
/// # Invariant
/// The inner string is never empty. This is enforced by the constructor.
///
/// # Example
/// ```
/// use idsafe_core::ActorId;
///
/// let ngo = ActorId::new("NGO-1").unwrap();
/// assert_eq!(ngo.as_str(), "NGO-1");
///
/// // The null identifier is rejected
/// assert!(ActorId::new("").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ActorId(String);

impl ActorId {
    /// Maximum identifier length in characters
    pub const MAX_LEN: usize = 128;

    /// Create a new ActorId.
    ///
    /// Returns an error if the identifier is empty or over [`Self::MAX_LEN`].
    pub fn new(id: impl Into<String>) -> Result<Self, ActorIdError> {
        let id = id.into();
        if id.is_empty() {
            return Err(ActorIdError::Empty);
        }
        if id.chars().count() > Self::MAX_LEN {
            return Err(ActorIdError::TooLong(id));
        }
        Ok(Self(id))
    }

    /// Get the identifier as a string slice
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ActorId {
    type Err = ActorIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for ActorId {
    type Error = ActorIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ActorId> for String {
    fn from(id: ActorId) -> Self {
        id.0
    }
}
