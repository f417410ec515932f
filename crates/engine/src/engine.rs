//! Approval engine - orchestrates the registration lifecycle
//!
//! Every mutating call runs the same pipeline: authorize against the role
//! registry, consult the threshold policy where quorum math applies,
//! mutate the store, checkpoint, append an audit event.

use std::path::Path;

use idsafe_core::{ActorId, IdentityHash};
use idsafe_registry::{RoleRegistry, ThresholdPolicy};
use idsafe_store::{GovernanceState, IdentityRecord, IdentityStatus, IdentityStore};

use crate::audit::AuditLedger;
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::event::RegistryEvent;

/// Result of an approval call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApprovalOutcome {
    /// Whether this call added a new approver (false on duplicate)
    pub newly_approved: bool,
    /// Distinct approvals collected so far
    pub approvals: usize,
    /// Whether the subject is now registered
    pub registered: bool,
}

/// Snapshot of engine-wide counts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineStats {
    pub registered: usize,
    pub pending: usize,
    pub validators: usize,
    pub required_approvals: u32,
}

/// The identity registration state machine.
///
/// Exclusively owns the role registry, threshold policy, identity store,
/// and audit ledger. Mutations take `&mut self`, so each operation is an
/// atomic, totally-ordered step against the shared state.
pub struct ApprovalEngine {
    registry: RoleRegistry,
    policy: ThresholdPolicy,
    store: IdentityStore,
    audit: AuditLedger,
}

impl ApprovalEngine {
    /// Open an engine over a data directory.
    ///
    /// Governance state is loaded from the store when a checkpoint exists;
    /// otherwise the seed config is applied and checkpointed.
    pub fn open(data_dir: impl AsRef<Path>, config: &EngineConfig) -> Result<Self, EngineError> {
        let data_dir = data_dir.as_ref();
        std::fs::create_dir_all(data_dir).map_err(crate::audit::AuditError::Io)?;

        let store = IdentityStore::new(data_dir.join("identities.db"))?;
        let audit = AuditLedger::new(data_dir.join("audit.jsonl"))?;

        Self::bootstrap(store, audit, config)
    }

    /// Create an engine with in-memory storage (for testing)
    pub fn in_memory(config: &EngineConfig) -> Result<Self, EngineError> {
        Self::bootstrap(IdentityStore::in_memory()?, AuditLedger::in_memory(), config)
    }

    fn bootstrap(
        store: IdentityStore,
        audit: AuditLedger,
        config: &EngineConfig,
    ) -> Result<Self, EngineError> {
        let (registry, policy) = match store.load_governance()? {
            Some(state) => {
                let registry = RoleRegistry::new(state.admin, state.validators);
                let policy =
                    ThresholdPolicy::new(state.required_approvals, registry.validator_count())?;
                (registry, policy)
            }
            None => {
                let registry =
                    RoleRegistry::new(config.admin.clone(), config.validators.iter().cloned());
                let policy =
                    ThresholdPolicy::new(config.required_approvals, registry.validator_count())?;
                tracing::info!(
                    admin = %registry.admin(),
                    validators = registry.validator_count(),
                    threshold = policy.required(),
                    "Seeding governance from config"
                );
                (registry, policy)
            }
        };

        let engine = Self {
            registry,
            policy,
            store,
            audit,
        };
        engine.checkpoint_governance()?;
        Ok(engine)
    }

    fn checkpoint_governance(&self) -> Result<(), EngineError> {
        let state = GovernanceState {
            admin: self.registry.admin().clone(),
            validators: self.registry.validators().cloned().collect(),
            required_approvals: self.policy.required(),
        };
        self.store.save_governance(&state)?;
        Ok(())
    }

    // === Registration lifecycle ===

    /// Register a subject's identity. Validator-only.
    ///
    /// Creates the record if absent; registration itself is not an
    /// approval. Re-registering with the same hash is an idempotent
    /// no-op. Re-registering with a different hash replaces it and clears
    /// all approvals: an attestation is over a specific digest.
    pub fn register_identity(
        &mut self,
        caller: &ActorId,
        subject: &ActorId,
        hash: IdentityHash,
    ) -> Result<(), EngineError> {
        self.registry.require_validator(caller)?;

        match self.store.get(subject)? {
            Some(record) if record.data_hash == hash => return Ok(()),
            Some(mut record) => {
                record.set_hash(hash);
                record.clear_approvals();
                self.store.save(subject, &record)?;
            }
            None => {
                self.store.save(subject, &IdentityRecord::new(hash))?;
            }
        }

        tracing::info!(caller = %caller, subject = %subject, "Identity registered");
        self.audit
            .append(&RegistryEvent::identity_registered(caller, subject, &hash))?;
        Ok(())
    }

    /// Approve a subject's current hash. Validator-only.
    ///
    /// Duplicate approvals from the same validator are no-ops; the
    /// approver set never double-counts. Once distinct approvals reach
    /// the threshold, the subject becomes registered.
    pub fn approve_identity(
        &mut self,
        caller: &ActorId,
        subject: &ActorId,
    ) -> Result<ApprovalOutcome, EngineError> {
        self.registry.require_validator(caller)?;

        let mut record = self
            .store
            .get(subject)?
            .ok_or_else(|| EngineError::UnknownSubject(subject.clone()))?;

        let newly_approved = record.approve(caller.clone());
        if newly_approved {
            if self.policy.is_quorum(record.approval_count()) {
                record.mark_registered();
                tracing::info!(
                    subject = %subject,
                    approvals = record.approval_count(),
                    "Quorum reached, identity registered"
                );
            }
            self.store.save(subject, &record)?;
            self.audit.append(&RegistryEvent::identity_approved(
                caller,
                subject,
                record.approval_count(),
                record.registered,
            ))?;
        }

        Ok(ApprovalOutcome {
            newly_approved,
            approvals: record.approval_count(),
            registered: record.registered,
        })
    }

    /// Replace a subject's stored hash. Validator-only.
    ///
    /// A changed hash clears the approver set and registration: prior
    /// attestations were over the old digest. Storing the identical hash
    /// is an idempotent no-op.
    pub fn store_identity_hash(
        &mut self,
        caller: &ActorId,
        subject: &ActorId,
        new_hash: IdentityHash,
    ) -> Result<(), EngineError> {
        self.registry.require_validator(caller)?;

        let mut record = self
            .store
            .get(subject)?
            .ok_or_else(|| EngineError::UnknownSubject(subject.clone()))?;

        if record.data_hash == new_hash {
            return Ok(());
        }

        record.set_hash(new_hash);
        record.clear_approvals();
        self.store.save(subject, &record)?;

        tracing::info!(caller = %caller, subject = %subject, "Identity hash updated");
        self.audit
            .append(&RegistryEvent::hash_updated(caller, subject, &new_hash))?;
        Ok(())
    }

    /// Revoke a subject's registration. Admin-only.
    ///
    /// Clears the approver set and the registered flag; the hash is
    /// retained for audit history.
    pub fn revoke_identity(
        &mut self,
        caller: &ActorId,
        subject: &ActorId,
    ) -> Result<(), EngineError> {
        self.registry.require_admin(caller)?;

        let mut record = self
            .store
            .get(subject)?
            .ok_or_else(|| EngineError::UnknownSubject(subject.clone()))?;

        record.clear_approvals();
        self.store.save(subject, &record)?;

        tracing::info!(subject = %subject, "Identity revoked");
        self.audit
            .append(&RegistryEvent::identity_revoked(caller, subject))?;
        Ok(())
    }

    // === Governance ===

    /// Transfer the administrator role. Admin-only.
    pub fn change_admin(
        &mut self,
        caller: &ActorId,
        new_admin: ActorId,
    ) -> Result<(), EngineError> {
        let previous = self.registry.admin().clone();
        self.registry.change_admin(caller, new_admin.clone())?;
        self.checkpoint_governance()?;

        tracing::info!(previous = %previous, new_admin = %new_admin, "Admin changed");
        self.audit
            .append(&RegistryEvent::admin_changed(&previous, &new_admin))?;
        Ok(())
    }

    /// Add a validator. Admin-only; duplicate add is a no-op.
    ///
    /// Returns whether the validator was newly added.
    pub fn add_validator(&mut self, caller: &ActorId, id: ActorId) -> Result<bool, EngineError> {
        let inserted = self.registry.add_validator(caller, id.clone())?;
        if inserted {
            self.checkpoint_governance()?;
            tracing::info!(validator = %id, "Validator added");
            self.audit
                .append(&RegistryEvent::validator_added(caller, &id))?;
        }
        Ok(inserted)
    }

    /// Remove a validator. Admin-only.
    ///
    /// Fails with `ThresholdViolation` if removal would leave fewer
    /// validators than the current threshold; the admin must lower the
    /// threshold first. The threshold is never clamped implicitly.
    pub fn remove_validator(&mut self, caller: &ActorId, id: &ActorId) -> Result<(), EngineError> {
        self.registry.require_admin(caller)?;
        if !self.registry.is_validator(id) {
            return Err(idsafe_registry::RegistryError::UnknownValidator(id.clone()).into());
        }
        self.policy
            .validate_set_size(self.registry.validator_count() - 1)?;

        self.registry.remove_validator(caller, id)?;
        self.checkpoint_governance()?;

        tracing::info!(validator = %id, "Validator removed");
        self.audit
            .append(&RegistryEvent::validator_removed(caller, id))?;
        Ok(())
    }

    /// Change the approval threshold. Admin-only.
    ///
    /// Fails with `InvalidThreshold` unless 1 <= k <= validator count.
    /// Does not re-evaluate quorum on existing records; the new threshold
    /// applies from the next approval onward.
    pub fn change_threshold(&mut self, caller: &ActorId, k: u32) -> Result<(), EngineError> {
        self.registry.require_admin(caller)?;
        self.policy.set(k, self.registry.validator_count())?;
        self.checkpoint_governance()?;

        tracing::info!(required_approvals = k, "Threshold changed");
        self.audit
            .append(&RegistryEvent::threshold_changed(caller, k))?;
        Ok(())
    }

    // === Queries (no authorization) ===

    /// The stored hash for a subject, or the empty digest if no record
    pub fn identity_hash(&self, subject: &ActorId) -> Result<IdentityHash, EngineError> {
        Ok(self
            .store
            .get(subject)?
            .map(|r| r.data_hash)
            .unwrap_or(IdentityHash::EMPTY))
    }

    /// Whether a subject is registered (false if no record)
    pub fn is_registered(&self, subject: &ActorId) -> Result<bool, EngineError> {
        Ok(self.store.get(subject)?.map(|r| r.registered).unwrap_or(false))
    }

    /// Lifecycle status of a subject
    pub fn status(&self, subject: &ActorId) -> Result<IdentityStatus, EngineError> {
        Ok(self
            .store
            .get(subject)?
            .map(|r| r.status())
            .unwrap_or(IdentityStatus::Unregistered))
    }

    /// Distinct approvals collected for a subject (0 if no record)
    pub fn approval_count(&self, subject: &ActorId) -> Result<usize, EngineError> {
        Ok(self
            .store
            .get(subject)?
            .map(|r| r.approval_count())
            .unwrap_or(0))
    }

    /// Whether `id` is a recognized validator
    pub fn is_validator(&self, id: &ActorId) -> bool {
        self.registry.is_validator(id)
    }

    /// Whether `id` is the current administrator
    pub fn is_admin(&self, id: &ActorId) -> bool {
        self.registry.is_admin(id)
    }

    /// Current administrator
    pub fn admin(&self) -> &ActorId {
        self.registry.admin()
    }

    /// Current validator set, in sorted order
    pub fn validators(&self) -> Vec<ActorId> {
        self.registry.validators().cloned().collect()
    }

    /// Current approval threshold
    pub fn threshold(&self) -> u32 {
        self.policy.required()
    }

    /// All subjects with a record
    pub fn subjects(&self) -> Result<Vec<ActorId>, EngineError> {
        Ok(self.store.subjects()?)
    }

    /// Engine-wide counts
    pub fn stats(&self) -> Result<EngineStats, EngineError> {
        Ok(EngineStats {
            registered: self.store.count_registered()?,
            pending: self.store.count_pending()?,
            validators: self.registry.validator_count(),
            required_approvals: self.policy.required(),
        })
    }

    /// Full audit history, in append order
    pub fn audit_events(&self) -> Result<Vec<RegistryEvent>, EngineError> {
        Ok(self.audit.read_all()?)
    }
}
