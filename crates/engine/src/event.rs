//! Registry events (written to the audit ledger)
//!
//! One event per accepted mutation. Rejected calls (unauthorized,
//! unknown subject) and idempotent no-ops leave no trace here.

use chrono::{DateTime, Utc};
use idsafe_core::{ActorId, IdentityHash};
use serde::{Deserialize, Serialize};

/// Events appended to the audit ledger (append-only JSONL)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum RegistryEvent {
    /// A validator registered (or re-registered) a subject
    IdentityRegistered {
        id: String,
        caller: ActorId,
        subject: ActorId,
        data_hash: IdentityHash,
        timestamp: DateTime<Utc>,
    },

    /// A validator approved a subject's current hash
    IdentityApproved {
        id: String,
        caller: ActorId,
        subject: ActorId,
        approvals: usize,
        registered: bool,
        timestamp: DateTime<Utc>,
    },

    /// A validator replaced a subject's hash (approvals reset)
    HashUpdated {
        id: String,
        caller: ActorId,
        subject: ActorId,
        data_hash: IdentityHash,
        timestamp: DateTime<Utc>,
    },

    /// The admin revoked a subject's registration
    IdentityRevoked {
        id: String,
        caller: ActorId,
        subject: ActorId,
        timestamp: DateTime<Utc>,
    },

    /// The admin role was transferred
    AdminChanged {
        id: String,
        previous: ActorId,
        new_admin: ActorId,
        timestamp: DateTime<Utc>,
    },

    /// A validator joined the set
    ValidatorAdded {
        id: String,
        caller: ActorId,
        validator: ActorId,
        timestamp: DateTime<Utc>,
    },

    /// A validator left the set
    ValidatorRemoved {
        id: String,
        caller: ActorId,
        validator: ActorId,
        timestamp: DateTime<Utc>,
    },

    /// The approval threshold changed
    ThresholdChanged {
        id: String,
        caller: ActorId,
        required_approvals: u32,
        timestamp: DateTime<Utc>,
    },
}

fn event_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

impl RegistryEvent {
    pub fn identity_registered(caller: &ActorId, subject: &ActorId, hash: &IdentityHash) -> Self {
        RegistryEvent::IdentityRegistered {
            id: event_id(),
            caller: caller.clone(),
            subject: subject.clone(),
            data_hash: *hash,
            timestamp: Utc::now(),
        }
    }

    pub fn identity_approved(
        caller: &ActorId,
        subject: &ActorId,
        approvals: usize,
        registered: bool,
    ) -> Self {
        RegistryEvent::IdentityApproved {
            id: event_id(),
            caller: caller.clone(),
            subject: subject.clone(),
            approvals,
            registered,
            timestamp: Utc::now(),
        }
    }

    pub fn hash_updated(caller: &ActorId, subject: &ActorId, hash: &IdentityHash) -> Self {
        RegistryEvent::HashUpdated {
            id: event_id(),
            caller: caller.clone(),
            subject: subject.clone(),
            data_hash: *hash,
            timestamp: Utc::now(),
        }
    }

    pub fn identity_revoked(caller: &ActorId, subject: &ActorId) -> Self {
        RegistryEvent::IdentityRevoked {
            id: event_id(),
            caller: caller.clone(),
            subject: subject.clone(),
            timestamp: Utc::now(),
        }
    }

    pub fn admin_changed(previous: &ActorId, new_admin: &ActorId) -> Self {
        RegistryEvent::AdminChanged {
            id: event_id(),
            previous: previous.clone(),
            new_admin: new_admin.clone(),
            timestamp: Utc::now(),
        }
    }

    pub fn validator_added(caller: &ActorId, validator: &ActorId) -> Self {
        RegistryEvent::ValidatorAdded {
            id: event_id(),
            caller: caller.clone(),
            validator: validator.clone(),
            timestamp: Utc::now(),
        }
    }

    pub fn validator_removed(caller: &ActorId, validator: &ActorId) -> Self {
        RegistryEvent::ValidatorRemoved {
            id: event_id(),
            caller: caller.clone(),
            validator: validator.clone(),
            timestamp: Utc::now(),
        }
    }

    pub fn threshold_changed(caller: &ActorId, required_approvals: u32) -> Self {
        RegistryEvent::ThresholdChanged {
            id: event_id(),
            caller: caller.clone(),
            required_approvals,
            timestamp: Utc::now(),
        }
    }

    /// Get the event ID
    pub fn id(&self) -> &str {
        match self {
            RegistryEvent::IdentityRegistered { id, .. } => id,
            RegistryEvent::IdentityApproved { id, .. } => id,
            RegistryEvent::HashUpdated { id, .. } => id,
            RegistryEvent::IdentityRevoked { id, .. } => id,
            RegistryEvent::AdminChanged { id, .. } => id,
            RegistryEvent::ValidatorAdded { id, .. } => id,
            RegistryEvent::ValidatorRemoved { id, .. } => id,
            RegistryEvent::ThresholdChanged { id, .. } => id,
        }
    }

    /// Get the timestamp
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            RegistryEvent::IdentityRegistered { timestamp, .. } => *timestamp,
            RegistryEvent::IdentityApproved { timestamp, .. } => *timestamp,
            RegistryEvent::HashUpdated { timestamp, .. } => *timestamp,
            RegistryEvent::IdentityRevoked { timestamp, .. } => *timestamp,
            RegistryEvent::AdminChanged { timestamp, .. } => *timestamp,
            RegistryEvent::ValidatorAdded { timestamp, .. } => *timestamp,
            RegistryEvent::ValidatorRemoved { timestamp, .. } => *timestamp,
            RegistryEvent::ThresholdChanged { timestamp, .. } => *timestamp,
        }
    }
}
