// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration of the entity-level reconciliation flows.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::order::DuplicatePriorities;

const VALIDATE_PERMISSIONS: bool = true;
const RESET_DEFAULT_ROLES: bool = true;
const STRICT_ROLES: bool = false;
const RETAIN_ON_DELETE: bool = true;

/// Configuration parameters for creating, updating and deleting managed permissions.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ReconcileConfig {
    /// Treatment of desired assignment rules sharing a priority. Recorded rules are always
    /// resolved with [`DuplicatePriorities::LastWriteWins`].
    ///
    /// Default: `Reject`.
    pub(crate) duplicate_priorities: DuplicatePriorities,

    /// Check permission tokens of desired rules against the entity kind's allow-list.
    ///
    /// Default: true.
    pub(crate) validate_permissions: bool,

    /// Zero the permissions of the entity kind's implicit roles on create.
    ///
    /// Default: true.
    pub(crate) reset_default_roles: bool,

    /// Fail the create when zeroing an implicit role fails.
    ///
    /// Default: false.
    pub(crate) strict_roles: bool,

    /// Leave remote permissions untouched when managed permissions are deleted.
    ///
    /// Default: true.
    pub(crate) retain_on_delete: bool,
}

impl ReconcileConfig {
    /// Return a default instance of `ReconcileConfig`.
    pub fn new() -> Self {
        Default::default()
    }

    /// Define how desired rules sharing a priority are treated.
    pub fn duplicate_priorities(mut self, policy: DuplicatePriorities) -> Self {
        self.duplicate_priorities = policy;
        self
    }

    /// Enable or disable the allow-list check of permission tokens.
    pub fn validate_permissions(mut self, enabled: bool) -> Self {
        self.validate_permissions = enabled;
        self
    }

    /// Enable or disable zeroing implicit roles on create.
    pub fn reset_default_roles(mut self, enabled: bool) -> Self {
        self.reset_default_roles = enabled;
        self
    }

    /// Surface failures to zero implicit roles as errors.
    pub fn strict_roles(mut self, enabled: bool) -> Self {
        self.strict_roles = enabled;
        self
    }

    /// Keep or revoke remote permissions when managed permissions are deleted.
    pub fn retain_on_delete(mut self, retain: bool) -> Self {
        self.retain_on_delete = retain;
        self
    }

    /// Policy applied to desired rules sharing a priority.
    pub fn duplicate_priority_policy(&self) -> DuplicatePriorities {
        self.duplicate_priorities
    }

    pub fn is_validate_permissions(&self) -> bool {
        self.validate_permissions
    }

    pub fn is_reset_default_roles(&self) -> bool {
        self.reset_default_roles
    }

    pub fn is_strict_roles(&self) -> bool {
        self.strict_roles
    }

    pub fn is_retain_on_delete(&self) -> bool {
        self.retain_on_delete
    }
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            duplicate_priorities: DuplicatePriorities::default(),
            validate_permissions: VALIDATE_PERMISSIONS,
            reset_default_roles: RESET_DEFAULT_ROLES,
            strict_roles: STRICT_ROLES,
            retain_on_delete: RETAIN_ON_DELETE,
        }
    }
}
