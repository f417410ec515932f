//! IdentityHash - Opaque 32-byte digest of off-system identity data
//!
//! The system never interprets the digest; it only stores and compares it.
//! Hex encoding is used at every boundary (serde, CLI, storage). The
//! all-zero digest is the defined empty value returned for absent records.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur when parsing an identity hash
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HashError {
    #[error("Invalid hash length: expected 32 bytes, got {0}")]
    InvalidLength(usize),

    #[error("Invalid hex encoding: {0}")]
    InvalidHex(String),
}

/// An opaque 32-byte digest over a subject's identity data.
///
/// # Example
/// ```
/// use idsafe_core::IdentityHash;
///
/// let hash = IdentityHash::digest(b"passport scan");
/// assert_eq!(hash.to_hex().len(), 64);
/// assert!(!hash.is_empty());
///
/// let parsed = IdentityHash::from_hex(&hash.to_hex()).unwrap();
/// assert_eq!(parsed, hash);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct IdentityHash([u8; 32]);

impl IdentityHash {
    /// The empty (all-zero) digest, returned for subjects with no record
    pub const EMPTY: Self = Self([0u8; 32]);

    /// Wrap raw digest bytes
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw digest bytes
    #[inline]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Compute the SHA-256 digest of arbitrary data
    pub fn digest(data: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(data);
        Self(hasher.finalize().into())
    }

    /// Parse a digest from a 64-character hex string
    pub fn from_hex(s: &str) -> Result<Self, HashError> {
        let bytes = hex::decode(s).map_err(|_| HashError::InvalidHex(s.to_string()))?;
        let bytes: [u8; 32] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| HashError::InvalidLength(bytes.len()))?;
        Ok(Self(bytes))
    }

    /// Encode the digest as a lowercase hex string
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Check whether this is the empty (all-zero) digest
    pub fn is_empty(&self) -> bool {
        self.0 == [0u8; 32]
    }
}

impl Default for IdentityHash {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl fmt::Display for IdentityHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl FromStr for IdentityHash {
    type Err = HashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl TryFrom<String> for IdentityHash {
    type Error = HashError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<IdentityHash> for String {
    fn from(hash: IdentityHash) -> Self {
        hash.to_hex()
    }
}
