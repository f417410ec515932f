//! Registry errors

use idsafe_core::ActorId;
use thiserror::Error;

/// Errors from role and threshold operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Unauthorized: {caller} is not {role}")]
    Unauthorized {
        caller: ActorId,
        role: &'static str,
    },

    #[error("Unknown validator: {0}")]
    UnknownValidator(ActorId),

    #[error("Invalid threshold {requested}: must be between 1 and {validators}")]
    InvalidThreshold { requested: u32, validators: usize },

    #[error("Removal would leave {validators_after} validators, below threshold {required}")]
    ThresholdViolation {
        validators_after: usize,
        required: u32,
    },
}
