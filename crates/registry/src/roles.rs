//! Role registry - administrator and validator membership
//!
//! The registry exclusively owns the administrator identity and the
//! validator set. All mutation goes through role-gated methods; callers
//! outside this crate can only read membership.

use crate::error::RegistryError;
use idsafe_core::ActorId;
use std::collections::BTreeSet;

/// Administrator and validator (NGO) membership.
///
/// # Invariants
/// - There is always exactly one administrator.
/// - The validator set contains no duplicates (set semantics).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleRegistry {
    admin: ActorId,
    validators: BTreeSet<ActorId>,
}

impl RoleRegistry {
    /// Create a registry with the given administrator and initial validators
    pub fn new(admin: ActorId, validators: impl IntoIterator<Item = ActorId>) -> Self {
        Self {
            admin,
            validators: validators.into_iter().collect(),
        }
    }

    /// Check whether `id` is the current administrator
    pub fn is_admin(&self, id: &ActorId) -> bool {
        &self.admin == id
    }

    /// Check whether `id` is a recognized validator
    pub fn is_validator(&self, id: &ActorId) -> bool {
        self.validators.contains(id)
    }

    /// Fail with `Unauthorized` unless `caller` is the administrator
    pub fn require_admin(&self, caller: &ActorId) -> Result<(), RegistryError> {
        if self.is_admin(caller) {
            Ok(())
        } else {
            Err(RegistryError::Unauthorized {
                caller: caller.clone(),
                role: "the administrator",
            })
        }
    }

    /// Fail with `Unauthorized` unless `caller` is a validator
    pub fn require_validator(&self, caller: &ActorId) -> Result<(), RegistryError> {
        if self.is_validator(caller) {
            Ok(())
        } else {
            Err(RegistryError::Unauthorized {
                caller: caller.clone(),
                role: "a validator",
            })
        }
    }

    /// Transfer the administrator role to `new_admin`.
    ///
    /// Only the current administrator may call this. The null identifier
    /// is unrepresentable (`ActorId` rejects it at construction), so the
    /// admin can never be unset.
    pub fn change_admin(
        &mut self,
        caller: &ActorId,
        new_admin: ActorId,
    ) -> Result<(), RegistryError> {
        self.require_admin(caller)?;
        self.admin = new_admin;
        Ok(())
    }

    /// Add a validator. Admin-only.
    ///
    /// Returns `false` if `id` was already a member; the duplicate add is
    /// an idempotent no-op, not an error.
    pub fn add_validator(&mut self, caller: &ActorId, id: ActorId) -> Result<bool, RegistryError> {
        self.require_admin(caller)?;
        Ok(self.validators.insert(id))
    }

    /// Remove a validator. Admin-only.
    ///
    /// Fails with `UnknownValidator` if `id` is not a member. The caller
    /// (the engine) checks the threshold floor before invoking this, since
    /// the threshold lives in `ThresholdPolicy`.
    pub fn remove_validator(&mut self, caller: &ActorId, id: &ActorId) -> Result<(), RegistryError> {
        self.require_admin(caller)?;
        if !self.validators.remove(id) {
            return Err(RegistryError::UnknownValidator(id.clone()));
        }
        Ok(())
    }

    /// Current administrator
    pub fn admin(&self) -> &ActorId {
        &self.admin
    }

    /// Number of validators in the set
    pub fn validator_count(&self) -> usize {
        self.validators.len()
    }

    /// Iterate over the validator set in sorted order
    pub fn validators(&self) -> impl Iterator<Item = &ActorId> {
        self.validators.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor(id: &str) -> ActorId {
        ActorId::new(id).unwrap()
    }

    fn registry() -> RoleRegistry {
        RoleRegistry::new(actor("ADMIN"), vec![actor("NGO-1"), actor("NGO-2")])
    }

    #[test]
    fn test_membership_lookups() {
        let reg = registry();

        assert!(reg.is_admin(&actor("ADMIN")));
        assert!(!reg.is_admin(&actor("NGO-1")));

        assert!(reg.is_validator(&actor("NGO-1")));
        assert!(reg.is_validator(&actor("NGO-2")));
        assert!(!reg.is_validator(&actor("ADMIN")));
        assert!(!reg.is_validator(&actor("USER")));
    }

    #[test]
    fn test_change_admin() {
        let mut reg = registry();

        reg.change_admin(&actor("ADMIN"), actor("NEW-ADMIN")).unwrap();

        assert!(reg.is_admin(&actor("NEW-ADMIN")));
        assert!(!reg.is_admin(&actor("ADMIN")));
        // Old admin has lost privileged access
        assert!(matches!(
            reg.change_admin(&actor("ADMIN"), actor("ADMIN")),
            Err(RegistryError::Unauthorized { .. })
        ));
    }

    #[test]
    fn test_change_admin_unauthorized() {
        let mut reg = registry();

        let result = reg.change_admin(&actor("NGO-1"), actor("NGO-1"));
        assert!(matches!(result, Err(RegistryError::Unauthorized { .. })));
        assert!(reg.is_admin(&actor("ADMIN")));
    }

    #[test]
    fn test_add_validator() {
        let mut reg = registry();

        let inserted = reg.add_validator(&actor("ADMIN"), actor("NGO-3")).unwrap();
        assert!(inserted);
        assert!(reg.is_validator(&actor("NGO-3")));
        assert_eq!(reg.validator_count(), 3);
    }

    #[test]
    fn test_add_validator_duplicate_is_noop() {
        let mut reg = registry();

        let inserted = reg.add_validator(&actor("ADMIN"), actor("NGO-1")).unwrap();
        assert!(!inserted);
        assert_eq!(reg.validator_count(), 2);
    }

    #[test]
    fn test_add_validator_unauthorized() {
        let mut reg = registry();

        let result = reg.add_validator(&actor("NGO-1"), actor("NGO-3"));
        assert!(matches!(result, Err(RegistryError::Unauthorized { .. })));
        assert!(!reg.is_validator(&actor("NGO-3")));
    }

    #[test]
    fn test_remove_validator() {
        let mut reg = registry();

        reg.remove_validator(&actor("ADMIN"), &actor("NGO-1")).unwrap();

        assert!(!reg.is_validator(&actor("NGO-1")));
        assert_eq!(reg.validator_count(), 1);
    }

    #[test]
    fn test_remove_unknown_validator() {
        let mut reg = registry();

        let result = reg.remove_validator(&actor("ADMIN"), &actor("NOBODY"));
        assert!(matches!(result, Err(RegistryError::UnknownValidator(_))));
    }

    #[test]
    fn test_remove_validator_unauthorized() {
        let mut reg = registry();

        let result = reg.remove_validator(&actor("NGO-2"), &actor("NGO-1"));
        assert!(matches!(result, Err(RegistryError::Unauthorized { .. })));
        assert!(reg.is_validator(&actor("NGO-1")));
    }

    #[test]
    fn test_validators_iteration_sorted() {
        let reg = RoleRegistry::new(
            actor("ADMIN"),
            vec![actor("NGO-B"), actor("NGO-A"), actor("NGO-B")],
        );

        let ids: Vec<&str> = reg.validators().map(|v| v.as_str()).collect();
        assert_eq!(ids, vec!["NGO-A", "NGO-B"]);
    }
}
