//! # IDSafe Registry
//!
//! Membership and policy state for the identity system:
//! - `RoleRegistry`: the administrator and the validator (NGO) set
//! - `ThresholdPolicy`: the approval threshold and quorum math
//!
//! Every privileged operation starts with an explicit capability check
//! (`require_admin` / `require_validator`); there is no implicit role
//! resolution anywhere else.

mod error;
mod roles;
mod threshold;

pub use error::RegistryError;
pub use roles::RoleRegistry;
pub use threshold::ThresholdPolicy;
