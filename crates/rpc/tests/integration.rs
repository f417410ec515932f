//! Integration tests for IDSafe
//!
//! These tests verify the complete flow from the application context
//! through the engine, registry, store, and audit ledger.

use idsafe_core::{ActorId, IdentityHash};
use idsafe_engine::{EngineConfig, EngineError};
use idsafe_registry::RegistryError;
use idsafe_rpc::AppContext;
use idsafe_store::IdentityStatus;
use tempfile::TempDir;

fn actor(id: &str) -> ActorId {
    ActorId::new(id).unwrap()
}

fn seed_config() -> EngineConfig {
    EngineConfig {
        admin: actor("ADMIN"),
        validators: vec![actor("NGO-1"), actor("NGO-2")],
        required_approvals: 2,
    }
}

/// Test: init -> register -> approve x2 -> registered -> revoke
#[test]
fn test_full_registration_lifecycle() {
    let temp_dir = TempDir::new().unwrap();
    let mut ctx = AppContext::init(temp_dir.path(), &seed_config()).unwrap();

    let user = actor("USER");
    let hash = IdentityHash::digest(b"passport scan");

    // 1. NGO-1 registers the subject
    ctx.engine
        .register_identity(&actor("NGO-1"), &user, hash)
        .unwrap();
    assert!(!ctx.engine.is_registered(&user).unwrap());
    assert_eq!(ctx.engine.identity_hash(&user).unwrap(), hash);

    // 2. Two distinct approvals reach the threshold
    ctx.engine.approve_identity(&actor("NGO-1"), &user).unwrap();
    assert!(!ctx.engine.is_registered(&user).unwrap());

    let outcome = ctx.engine.approve_identity(&actor("NGO-2"), &user).unwrap();
    assert!(outcome.registered);
    assert!(ctx.engine.is_registered(&user).unwrap());
    assert_eq!(ctx.engine.status(&user).unwrap(), IdentityStatus::Approved);

    // 3. Admin revokes; hash is retained
    ctx.engine.revoke_identity(&actor("ADMIN"), &user).unwrap();
    assert!(!ctx.engine.is_registered(&user).unwrap());
    assert_eq!(ctx.engine.identity_hash(&user).unwrap(), hash);

    // 4. Everything is in the audit ledger
    let events = ctx.engine.audit_events().unwrap();
    assert_eq!(events.len(), 4);
}

/// Test: state survives closing and reopening the context
#[test]
fn test_state_survives_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let user = actor("USER");

    {
        let mut ctx = AppContext::init(temp_dir.path(), &seed_config()).unwrap();
        ctx.engine
            .register_identity(&actor("NGO-1"), &user, IdentityHash::digest(b"data"))
            .unwrap();
        ctx.engine.approve_identity(&actor("NGO-1"), &user).unwrap();
        ctx.engine.approve_identity(&actor("NGO-2"), &user).unwrap();
        ctx.engine
            .add_validator(&actor("ADMIN"), actor("NGO-3"))
            .unwrap();
    }

    let ctx = AppContext::new(temp_dir.path()).unwrap();

    assert!(ctx.engine.is_registered(&user).unwrap());
    assert!(ctx.engine.is_validator(&actor("NGO-3")));
    assert_eq!(ctx.engine.validators().len(), 3);
    assert_eq!(ctx.engine.audit_events().unwrap().len(), 4);
}

/// Test: opening an uninitialized directory fails, double-init fails
#[test]
fn test_init_guards() {
    let temp_dir = TempDir::new().unwrap();

    assert!(AppContext::new(temp_dir.path()).is_err());

    AppContext::init(temp_dir.path(), &seed_config()).unwrap();
    assert!(AppContext::init(temp_dir.path(), &seed_config()).is_err());
}

/// Test: hash update clears approvals and forces re-approval
#[test]
fn test_hash_update_forces_reapproval() {
    let temp_dir = TempDir::new().unwrap();
    let mut ctx = AppContext::init(temp_dir.path(), &seed_config()).unwrap();

    let user = actor("USER");
    let h1 = IdentityHash::digest(b"v1");
    let h2 = IdentityHash::digest(b"v2");

    ctx.engine.register_identity(&actor("NGO-1"), &user, h1).unwrap();
    ctx.engine.approve_identity(&actor("NGO-1"), &user).unwrap();
    ctx.engine.approve_identity(&actor("NGO-2"), &user).unwrap();
    assert!(ctx.engine.is_registered(&user).unwrap());

    ctx.engine
        .store_identity_hash(&actor("NGO-1"), &user, h2)
        .unwrap();

    assert_eq!(ctx.engine.identity_hash(&user).unwrap(), h2);
    assert!(!ctx.engine.is_registered(&user).unwrap());
    assert_eq!(ctx.engine.approval_count(&user).unwrap(), 0);

    // Re-approval over the new hash
    ctx.engine.approve_identity(&actor("NGO-1"), &user).unwrap();
    ctx.engine.approve_identity(&actor("NGO-2"), &user).unwrap();
    assert!(ctx.engine.is_registered(&user).unwrap());
}

/// Test: governance changes take effect for subsequent calls
#[test]
fn test_governance_changes() {
    let temp_dir = TempDir::new().unwrap();
    let mut ctx = AppContext::init(temp_dir.path(), &seed_config()).unwrap();

    // Admin transfer: new admin gains access, old admin loses it
    ctx.engine
        .change_admin(&actor("ADMIN"), actor("NEW-ADMIN"))
        .unwrap();
    assert!(ctx.engine.is_admin(&actor("NEW-ADMIN")));
    assert!(ctx
        .engine
        .add_validator(&actor("ADMIN"), actor("NGO-3"))
        .unwrap_err()
        .is_unauthorized());

    // New admin manages the NGO set
    ctx.engine
        .add_validator(&actor("NEW-ADMIN"), actor("NGO-3"))
        .unwrap();
    assert!(ctx.engine.is_validator(&actor("NGO-3")));

    ctx.engine
        .remove_validator(&actor("NEW-ADMIN"), &actor("NGO-1"))
        .unwrap();
    assert!(!ctx.engine.is_validator(&actor("NGO-1")));

    // Threshold 1: a single approval registers
    ctx.engine.change_threshold(&actor("NEW-ADMIN"), 1).unwrap();
    let user = actor("USER");
    ctx.engine
        .register_identity(&actor("NGO-2"), &user, IdentityHash::digest(b"data"))
        .unwrap();
    let outcome = ctx.engine.approve_identity(&actor("NGO-2"), &user).unwrap();
    assert!(outcome.registered);
}

/// Test: removal below the threshold floor is rejected
#[test]
fn test_remove_ngo_threshold_floor() {
    let temp_dir = TempDir::new().unwrap();
    let mut ctx = AppContext::init(temp_dir.path(), &seed_config()).unwrap();

    let result = ctx.engine.remove_validator(&actor("ADMIN"), &actor("NGO-2"));
    assert!(matches!(
        result,
        Err(EngineError::Registry(RegistryError::ThresholdViolation { .. }))
    ));

    // Both NGOs still present and functional
    assert!(ctx.engine.is_validator(&actor("NGO-1")));
    assert!(ctx.engine.is_validator(&actor("NGO-2")));
}

/// Test: callers without the required role are rejected
#[test]
fn test_unauthorized_callers() {
    let temp_dir = TempDir::new().unwrap();
    let mut ctx = AppContext::init(temp_dir.path(), &seed_config()).unwrap();

    let user = actor("USER");
    let outsider = actor("OUTSIDER");
    let hash = IdentityHash::digest(b"data");

    assert!(ctx
        .engine
        .register_identity(&outsider, &user, hash)
        .unwrap_err()
        .is_unauthorized());

    ctx.engine.register_identity(&actor("NGO-1"), &user, hash).unwrap();

    assert!(ctx
        .engine
        .approve_identity(&outsider, &user)
        .unwrap_err()
        .is_unauthorized());
    assert!(ctx
        .engine
        .store_identity_hash(&outsider, &user, hash)
        .unwrap_err()
        .is_unauthorized());

    // The admin is not a validator: registration is NGO-only
    assert!(ctx
        .engine
        .register_identity(&actor("ADMIN"), &actor("OTHER"), hash)
        .unwrap_err()
        .is_unauthorized());

    // NGOs cannot revoke
    assert!(ctx
        .engine
        .revoke_identity(&actor("NGO-1"), &user)
        .unwrap_err()
        .is_unauthorized());
}
