//! Identity record data structures

use chrono::{DateTime, Utc};
use idsafe_core::{ActorId, IdentityHash};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Lifecycle state of a subject
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IdentityStatus {
    /// No record exists for the subject
    Unregistered,
    /// Record exists, approvals below the threshold
    PendingApproval,
    /// Quorum reached, identity is registered
    Approved,
}

impl IdentityStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdentityStatus::Unregistered => "unregistered",
            IdentityStatus::PendingApproval => "pending_approval",
            IdentityStatus::Approved => "approved",
        }
    }
}

/// Per-subject identity state.
///
/// `approvers` is a set keyed by validator identifier, never a counter:
/// duplicate approvals from the same validator cannot advance progress,
/// and any permutation of the same approving calls reaches the same state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityRecord {
    /// Opaque digest of the subject's off-system identity data
    pub data_hash: IdentityHash,

    /// Validators that have approved the current hash
    pub approvers: BTreeSet<ActorId>,

    /// True once a quorum of distinct validators has approved
    pub registered: bool,

    /// When the record was first created
    pub created_at: DateTime<Utc>,

    /// When the record was last mutated
    pub updated_at: DateTime<Utc>,
}

impl IdentityRecord {
    /// Create a fresh, unapproved record for a newly registered subject
    pub fn new(data_hash: IdentityHash) -> Self {
        let now = Utc::now();
        Self {
            data_hash,
            approvers: BTreeSet::new(),
            registered: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Record an approval from `validator`.
    ///
    /// Returns `false` if this validator already approved (idempotent
    /// no-op). Does not evaluate quorum; that is the engine's job.
    pub fn approve(&mut self, validator: ActorId) -> bool {
        let inserted = self.approvers.insert(validator);
        if inserted {
            self.updated_at = Utc::now();
        }
        inserted
    }

    /// Check whether `validator` has already approved
    pub fn has_approved(&self, validator: &ActorId) -> bool {
        self.approvers.contains(validator)
    }

    /// Number of distinct approving validators
    pub fn approval_count(&self) -> usize {
        self.approvers.len()
    }

    /// Replace the stored hash. The hash is opaque; no validation here.
    pub fn set_hash(&mut self, hash: IdentityHash) {
        self.data_hash = hash;
        self.updated_at = Utc::now();
    }

    /// Reset approval state: clear the approver set and the registered
    /// flag. The hash is retained.
    pub fn clear_approvals(&mut self) {
        self.approvers.clear();
        self.registered = false;
        self.updated_at = Utc::now();
    }

    /// Mark the record as registered (quorum reached)
    pub fn mark_registered(&mut self) {
        self.registered = true;
        self.updated_at = Utc::now();
    }

    /// Lifecycle status of this record.
    ///
    /// Registration alone does not count as an approval, so a record
    /// with no approvers (fresh or revoked) is still Unregistered; the
    /// first approval moves it to PendingApproval.
    pub fn status(&self) -> IdentityStatus {
        if self.registered {
            IdentityStatus::Approved
        } else if self.approvers.is_empty() {
            IdentityStatus::Unregistered
        } else {
            IdentityStatus::PendingApproval
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor(id: &str) -> ActorId {
        ActorId::new(id).unwrap()
    }

    #[test]
    fn test_new_record() {
        let hash = IdentityHash::digest(b"data");
        let record = IdentityRecord::new(hash);

        assert_eq!(record.data_hash, hash);
        assert_eq!(record.approval_count(), 0);
        assert!(!record.registered);
        assert_eq!(record.status(), IdentityStatus::Unregistered);
    }

    #[test]
    fn test_approve_is_idempotent() {
        let mut record = IdentityRecord::new(IdentityHash::digest(b"data"));

        assert!(record.approve(actor("NGO-1")));
        assert!(!record.approve(actor("NGO-1")));
        assert_eq!(record.approval_count(), 1);

        assert!(record.approve(actor("NGO-2")));
        assert_eq!(record.approval_count(), 2);
    }

    #[test]
    fn test_has_approved() {
        let mut record = IdentityRecord::new(IdentityHash::digest(b"data"));
        record.approve(actor("NGO-1"));

        assert!(record.has_approved(&actor("NGO-1")));
        assert!(!record.has_approved(&actor("NGO-2")));
    }

    #[test]
    fn test_clear_approvals_retains_hash() {
        let hash = IdentityHash::digest(b"data");
        let mut record = IdentityRecord::new(hash);
        record.approve(actor("NGO-1"));
        record.mark_registered();

        record.clear_approvals();

        assert_eq!(record.approval_count(), 0);
        assert!(!record.registered);
        assert_eq!(record.data_hash, hash);
    }

    #[test]
    fn test_status_lifecycle() {
        let mut record = IdentityRecord::new(IdentityHash::digest(b"data"));
        assert_eq!(record.status(), IdentityStatus::Unregistered);

        record.approve(actor("NGO-1"));
        assert_eq!(record.status(), IdentityStatus::PendingApproval);

        record.mark_registered();
        assert_eq!(record.status(), IdentityStatus::Approved);

        // Revocation returns the record to Unregistered; hash retained
        record.clear_approvals();
        assert_eq!(record.status(), IdentityStatus::Unregistered);
    }

    #[test]
    fn test_serde_round_trip() {
        let mut record = IdentityRecord::new(IdentityHash::digest(b"data"));
        record.approve(actor("NGO-1"));

        let json = serde_json::to_string(&record).unwrap();
        let parsed: IdentityRecord = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed, record);
    }
}
