//! Threshold policy - quorum math for N-of-M approval
//!
//! Owns the approval threshold k. Invariant: 1 <= k <= |validator set|
//! after any mutation touching either value; membership changes consult
//! `validate_set_size` before shrinking the set.

use crate::error::RegistryError;

/// The approval threshold: how many distinct validator approvals a
/// subject needs before it counts as registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThresholdPolicy {
    required_approvals: u32,
}

impl ThresholdPolicy {
    /// Create a policy, validating `k` against the current validator count
    pub fn new(k: u32, validator_count: usize) -> Result<Self, RegistryError> {
        Self::validate(k, validator_count)?;
        Ok(Self {
            required_approvals: k,
        })
    }

    /// Change the threshold, validating against the current validator count
    pub fn set(&mut self, k: u32, validator_count: usize) -> Result<(), RegistryError> {
        Self::validate(k, validator_count)?;
        self.required_approvals = k;
        Ok(())
    }

    /// Number of distinct approvals required for registration
    pub fn required(&self) -> u32 {
        self.required_approvals
    }

    /// Check whether `approver_count` distinct approvals reach quorum
    pub fn is_quorum(&self, approver_count: usize) -> bool {
        approver_count >= self.required_approvals as usize
    }

    /// Fail with `ThresholdViolation` if a validator set of
    /// `validators_after` members could no longer satisfy the threshold
    pub fn validate_set_size(&self, validators_after: usize) -> Result<(), RegistryError> {
        if validators_after < self.required_approvals as usize {
            return Err(RegistryError::ThresholdViolation {
                validators_after,
                required: self.required_approvals,
            });
        }
        Ok(())
    }

    fn validate(k: u32, validator_count: usize) -> Result<(), RegistryError> {
        if k < 1 || k as usize > validator_count {
            return Err(RegistryError::InvalidThreshold {
                requested: k,
                validators: validator_count,
            });
        }
        Ok(())
    }
}
