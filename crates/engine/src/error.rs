//! Engine errors

use idsafe_core::ActorId;
use idsafe_registry::RegistryError;
use idsafe_store::StoreError;
use thiserror::Error;

use crate::audit::AuditError;

/// Errors from the approval engine
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Audit ledger error: {0}")]
    Audit(#[from] AuditError),

    #[error("No identity record for subject: {0}")]
    UnknownSubject(ActorId),
}

impl EngineError {
    /// True if the error is an authorization failure
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            EngineError::Registry(RegistryError::Unauthorized { .. })
        )
    }
}
