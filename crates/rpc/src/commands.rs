//! CLI commands

use idsafe_core::{ActorId, IdentityHash};
use idsafe_engine::RegistryEvent;

use crate::context::AppContext;

/// Register a subject's identity
pub fn register(
    ctx: &mut AppContext,
    caller: &ActorId,
    subject: &ActorId,
    hash: IdentityHash,
) -> Result<(), anyhow::Error> {
    ctx.engine.register_identity(caller, subject, hash)?;

    println!("✅ Registered {} with hash {}", subject, hash);
    println!(
        "   Needs {} distinct approvals to become registered",
        ctx.engine.threshold()
    );
    Ok(())
}

/// Approve a subject's current hash
pub fn approve(
    ctx: &mut AppContext,
    caller: &ActorId,
    subject: &ActorId,
) -> Result<(), anyhow::Error> {
    let outcome = ctx.engine.approve_identity(caller, subject)?;

    if !outcome.newly_approved {
        println!("⚠️  {} already approved {}; nothing changed", caller, subject);
    } else if outcome.registered {
        println!(
            "✅ {} approved {} ({}/{}) - identity registered",
            caller,
            subject,
            outcome.approvals,
            ctx.engine.threshold()
        );
    } else {
        println!(
            "✅ {} approved {} ({}/{})",
            caller,
            subject,
            outcome.approvals,
            ctx.engine.threshold()
        );
    }
    Ok(())
}

/// Replace a subject's stored hash
pub fn store_hash(
    ctx: &mut AppContext,
    caller: &ActorId,
    subject: &ActorId,
    hash: IdentityHash,
) -> Result<(), anyhow::Error> {
    ctx.engine.store_identity_hash(caller, subject, hash)?;

    println!("✅ Updated hash for {} to {}", subject, hash);
    println!("   Prior approvals were cleared; re-approval required");
    Ok(())
}

/// Revoke a subject's registration
pub fn revoke(
    ctx: &mut AppContext,
    caller: &ActorId,
    subject: &ActorId,
) -> Result<(), anyhow::Error> {
    ctx.engine.revoke_identity(caller, subject)?;

    println!("✅ Revoked registration for {}", subject);
    Ok(())
}

/// Show a subject's lifecycle status
pub fn status(ctx: &AppContext, subject: &ActorId) -> Result<(), anyhow::Error> {
    let status = ctx.engine.status(subject)?;
    let approvals = ctx.engine.approval_count(subject)?;

    println!("Subject:    {}", subject);
    println!("Status:     {}", status.as_str());
    println!(
        "Approvals:  {}/{}",
        approvals,
        ctx.engine.threshold()
    );

    let hash = ctx.engine.identity_hash(subject)?;
    if !hash.is_empty() {
        println!("Hash:       {}", hash);
    }
    Ok(())
}

/// Print a subject's stored hash
pub fn hash(ctx: &AppContext, subject: &ActorId) -> Result<(), anyhow::Error> {
    println!("{}", ctx.engine.identity_hash(subject)?);
    Ok(())
}

/// Add a validator NGO
pub fn add_ngo(ctx: &mut AppContext, caller: &ActorId, id: ActorId) -> Result<(), anyhow::Error> {
    let inserted = ctx.engine.add_validator(caller, id.clone())?;

    if inserted {
        println!("✅ Added NGO {}", id);
    } else {
        println!("⚠️  {} is already an NGO; nothing changed", id);
    }
    Ok(())
}

/// Remove a validator NGO
pub fn remove_ngo(
    ctx: &mut AppContext,
    caller: &ActorId,
    id: &ActorId,
) -> Result<(), anyhow::Error> {
    ctx.engine.remove_validator(caller, id)?;

    println!("✅ Removed NGO {}", id);
    Ok(())
}

/// Transfer the administrator role
pub fn change_admin(
    ctx: &mut AppContext,
    caller: &ActorId,
    new_admin: ActorId,
) -> Result<(), anyhow::Error> {
    ctx.engine.change_admin(caller, new_admin.clone())?;

    println!("✅ Admin transferred to {}", new_admin);
    Ok(())
}

/// Change the approval threshold
pub fn change_threshold(
    ctx: &mut AppContext,
    caller: &ActorId,
    k: u32,
) -> Result<(), anyhow::Error> {
    ctx.engine.change_threshold(caller, k)?;

    println!("✅ Approval threshold set to {}", k);
    Ok(())
}

/// List the validator set
pub fn ngos(ctx: &AppContext) -> Result<(), anyhow::Error> {
    let validators = ctx.engine.validators();

    println!("Admin: {}", ctx.engine.admin());
    println!("NGOs ({}):", validators.len());
    for ngo in validators {
        println!("  {}", ngo);
    }
    println!("Threshold: {}", ctx.engine.threshold());
    Ok(())
}

/// Print engine-wide counts
pub fn stats(ctx: &AppContext) -> Result<(), anyhow::Error> {
    let stats = ctx.engine.stats()?;

    println!("Registered: {}", stats.registered);
    println!("Pending:    {}", stats.pending);
    println!("NGOs:       {}", stats.validators);
    println!("Threshold:  {}", stats.required_approvals);
    Ok(())
}

/// Print the audit ledger
pub fn audit(ctx: &AppContext) -> Result<(), anyhow::Error> {
    let events = ctx.engine.audit_events()?;

    if events.is_empty() {
        println!("No audit events");
        return Ok(());
    }

    for event in &events {
        let line = match event {
            RegistryEvent::IdentityRegistered {
                caller, subject, data_hash, ..
            } => format!("{} registered {} ({})", caller, subject, data_hash),
            RegistryEvent::IdentityApproved {
                caller,
                subject,
                approvals,
                registered,
                ..
            } => {
                if *registered {
                    format!("{} approved {} ({} approvals, registered)", caller, subject, approvals)
                } else {
                    format!("{} approved {} ({} approvals)", caller, subject, approvals)
                }
            }
            RegistryEvent::HashUpdated {
                caller, subject, data_hash, ..
            } => format!("{} updated hash of {} to {}", caller, subject, data_hash),
            RegistryEvent::IdentityRevoked { caller, subject, .. } => {
                format!("{} revoked {}", caller, subject)
            }
            RegistryEvent::AdminChanged { previous, new_admin, .. } => {
                format!("admin transferred from {} to {}", previous, new_admin)
            }
            RegistryEvent::ValidatorAdded { caller, validator, .. } => {
                format!("{} added NGO {}", caller, validator)
            }
            RegistryEvent::ValidatorRemoved { caller, validator, .. } => {
                format!("{} removed NGO {}", caller, validator)
            }
            RegistryEvent::ThresholdChanged {
                caller,
                required_approvals,
                ..
            } => format!("{} set threshold to {}", caller, required_approvals),
        };
        println!("{}  {}", event.timestamp().to_rfc3339(), line);
    }
    Ok(())
}
