// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reconcile a desired [`AssignmentOrder`] against the remote permission store.
//!
//! The engine runs strictly sequentially: users are processed before groups, principals in the
//! order they were first encountered during resolution. Every remote write is awaited before the
//! next principal is looked at.
//!
//! Two classes of failure exist:
//!
//! 1. A principal which can not be validated is skipped. Nothing gets pushed for it and it is
//!    missing from the computed result, but processing continues.
//! 2. A failing write to the remote store aborts the whole call with a [`ReconcileError`].
//!    Writes issued earlier in the same call are not rolled back; since every write replaces a
//!    full permission set, re-invoking the same operation converges.
use std::fmt::Display;

use thiserror::Error;
use tracing::{debug, debug_span, trace, warn};

use crate::computed::{AssignmentResult, ComputedAssignment};
use crate::delta::{Delta, delta, equals_ignore_order};
use crate::entity::{EntityId, Role};
use crate::order::{AssignmentOrder, PrincipalMap, ResolveError};
use crate::principal::{ObjectPermissions, Principal, PrincipalKind};
use crate::traits::{PermissionStore, PrincipalValidator};

/// Remote write performed by the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    UpdateUserPermissions,
    UpdateGroupPermissions,
    RemoveUserPermissions,
    RemoveGroupPermissions,
}

impl Operation {
    /// Push of a (possibly unchanged) permission set for the principal kind.
    pub fn update(kind: PrincipalKind) -> Self {
        match kind {
            PrincipalKind::User => Operation::UpdateUserPermissions,
            PrincipalKind::Group => Operation::UpdateGroupPermissions,
        }
    }

    /// Revocation of all permissions for the principal kind.
    pub fn remove(kind: PrincipalKind) -> Self {
        match kind {
            PrincipalKind::User => Operation::RemoveUserPermissions,
            PrincipalKind::Group => Operation::RemoveGroupPermissions,
        }
    }

    pub fn is_removal(&self) -> bool {
        matches!(
            self,
            Operation::RemoveUserPermissions | Operation::RemoveGroupPermissions
        )
    }
}

impl Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Operation::UpdateUserPermissions => "failed to update user permissions",
            Operation::UpdateGroupPermissions => "failed to update group permissions",
            Operation::RemoveUserPermissions => "failed to remove user permissions",
            Operation::RemoveGroupPermissions => "failed to remove group permissions",
        };

        write!(f, "{}", s)
    }
}

#[derive(Debug, Error)]
pub enum ReconcileError<E>
where
    E: std::error::Error + 'static,
{
    #[error("{operation} of {principal} on {entity}: {source}")]
    Write {
        operation: Operation,
        entity: EntityId,
        principal: Principal,
        #[source]
        source: E,
    },

    #[error("failed to read permissions of {entity}: {source}")]
    ReadPermissions {
        entity: EntityId,
        #[source]
        source: E,
    },

    #[error("failed to reset {role} permissions on {entity}: {source}")]
    RolePermissions {
        entity: EntityId,
        role: Role,
        #[source]
        source: E,
    },

    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

impl<E> ReconcileError<E>
where
    E: std::error::Error + 'static,
{
    /// The failed write, if this error was caused by one.
    pub fn operation(&self) -> Option<Operation> {
        match self {
            ReconcileError::Write { operation, .. } => Some(*operation),
            _ => None,
        }
    }

    /// Entity the failed remote call was addressed to.
    pub fn entity(&self) -> Option<&EntityId> {
        match self {
            ReconcileError::Write { entity, .. }
            | ReconcileError::ReadPermissions { entity, .. }
            | ReconcileError::RolePermissions { entity, .. } => Some(entity),
            ReconcileError::Resolve(_) => None,
        }
    }
}

/// Read the permissions currently assigned on the entity.
pub fn read_permissions<S>(
    store: &S,
    entity: &EntityId,
) -> Result<ObjectPermissions, ReconcileError<S::Error>>
where
    S: PermissionStore + ?Sized,
{
    store
        .read_permissions(entity)
        .map_err(|source| ReconcileError::ReadPermissions {
            entity: entity.clone(),
            source,
        })
}

/// Report the remote-held permission set of every principal which is also part of `order`.
///
/// Desired permissions are deliberately ignored: a principal holding something else than what
/// the order asks for shows up with what it actually holds.
pub fn compute(assigned: &ObjectPermissions, order: &AssignmentOrder) -> AssignmentResult {
    let held = |kind: PrincipalKind| -> Vec<ComputedAssignment> {
        let principals = order.principals(kind);
        assigned
            .of_kind(kind)
            .iter()
            .filter(|entry| principals.contains(&entry.name))
            .map(ComputedAssignment::from)
            .collect()
    };

    AssignmentResult::new(held(PrincipalKind::User), held(PrincipalKind::Group))
}

/// Pushes permission changes of one entity to the remote store.
#[derive(Debug)]
pub struct ReconciliationEngine<'s, S, V> {
    store: &'s mut S,
    validator: V,
    entity: EntityId,
}

impl<'s, S, V> ReconciliationEngine<'s, S, V>
where
    S: PermissionStore,
    V: PrincipalValidator<S>,
{
    pub fn new(store: &'s mut S, validator: V, entity: EntityId) -> Self {
        Self {
            store,
            validator,
            entity,
        }
    }

    pub fn entity(&self) -> &EntityId {
        &self.entity
    }

    /// Push the full permission set of every valid principal in `order`.
    ///
    /// Used when an entity is put under management for the first time, there is no previous
    /// state to compare against.
    pub fn apply(
        &mut self,
        order: &AssignmentOrder,
    ) -> Result<AssignmentResult, ReconcileError<S::Error>> {
        let span = debug_span!("apply", entity = %self.entity);
        let _enter = span.enter();

        let users = self.apply_principals(PrincipalKind::User, order.users())?;
        let groups = self.apply_principals(PrincipalKind::Group, order.groups())?;

        Ok(AssignmentResult::new(users, groups))
    }

    fn apply_principals(
        &mut self,
        kind: PrincipalKind,
        principals: &PrincipalMap,
    ) -> Result<Vec<ComputedAssignment>, ReconcileError<S::Error>> {
        let mut computed = Vec::with_capacity(principals.len());
        for (name, permissions) in principals.iter() {
            let principal = kind.principal(name);
            if !self.is_known(&principal) {
                continue;
            }

            self.push(Operation::update(kind), &principal, permissions)?;
            computed.push(ComputedAssignment::new(name, permissions));
        }
        Ok(computed)
    }

    /// Move the remote store from the `previous` order to the `current` one.
    ///
    /// Permission sets are only pushed when they differ from the previous ones, unless
    /// `force_update` is set. Principals missing from `current` get all their permissions
    /// revoked.
    pub fn update(
        &mut self,
        previous: &AssignmentOrder,
        current: &AssignmentOrder,
        force_update: bool,
    ) -> Result<AssignmentResult, ReconcileError<S::Error>> {
        let span = debug_span!("update", entity = %self.entity, force_update);
        let _enter = span.enter();

        let users = self.update_principals(
            PrincipalKind::User,
            previous.users(),
            current.users(),
            force_update,
        )?;
        let groups = self.update_principals(
            PrincipalKind::Group,
            previous.groups(),
            current.groups(),
            force_update,
        )?;

        Ok(AssignmentResult::new(users, groups))
    }

    fn update_principals(
        &mut self,
        kind: PrincipalKind,
        previous: &PrincipalMap,
        current: &PrincipalMap,
        force_update: bool,
    ) -> Result<Vec<ComputedAssignment>, ReconcileError<S::Error>> {
        let Delta { removed, .. } = delta(previous.names(), current.names());

        let mut computed = Vec::with_capacity(current.len());
        for (name, requested) in current.iter() {
            if removed.iter().any(|removed| removed == name) {
                continue;
            }

            let principal = kind.principal(name);
            if !self.is_known(&principal) {
                continue;
            }

            // The desired state is authoritative even when nothing needs to be pushed.
            computed.push(ComputedAssignment::new(name, requested));

            let recorded = previous.get(name).unwrap_or_default();
            if force_update || !equals_ignore_order(recorded, requested) {
                self.push(Operation::update(kind), &principal, requested)?;
            } else {
                trace!(%principal, "permissions unchanged");
            }
        }

        for name in removed {
            let principal = kind.principal(name);
            self.push(Operation::remove(kind), &principal, &[])?;
        }

        Ok(computed)
    }

    /// Revoke all permissions of every principal the remote store reports on the entity which
    /// is also part of `order`.
    pub fn delete(
        &mut self,
        assigned: &ObjectPermissions,
        order: &AssignmentOrder,
    ) -> Result<(), ReconcileError<S::Error>> {
        let span = debug_span!("delete", entity = %self.entity);
        let _enter = span.enter();

        for kind in [PrincipalKind::User, PrincipalKind::Group] {
            let principals = order.principals(kind);
            for entry in assigned.of_kind(kind) {
                if principals.contains(&entry.name) {
                    let principal = kind.principal(entry.name.as_str());
                    self.push(Operation::remove(kind), &principal, &[])?;
                }
            }
        }

        Ok(())
    }

    /// Zero the permissions of implicit roles.
    ///
    /// Failures are logged and ignored unless `strict` is set.
    pub fn reset_roles(
        &mut self,
        roles: &[Role],
        strict: bool,
    ) -> Result<(), ReconcileError<S::Error>> {
        for role in roles {
            debug!(entity = %self.entity, %role, "reset role permissions");
            if let Err(source) = self.store.set_role_permissions(&self.entity, *role, &[]) {
                if strict {
                    return Err(ReconcileError::RolePermissions {
                        entity: self.entity.clone(),
                        role: *role,
                        source,
                    });
                }
                warn!(entity = %self.entity, %role, "failed to reset role permissions: {source}");
            }
        }

        Ok(())
    }

    /// Read the permissions currently assigned on this engine's entity.
    pub fn read_permissions(&self) -> Result<ObjectPermissions, ReconcileError<S::Error>> {
        read_permissions(&*self.store, &self.entity)
    }

    fn is_known(&mut self, principal: &Principal) -> bool {
        let known = self.validator.is_known(&*self.store, &self.entity, principal);
        if !known {
            debug!(%principal, "skipping unknown principal");
        }
        known
    }

    fn push(
        &mut self,
        operation: Operation,
        principal: &Principal,
        permissions: &[String],
    ) -> Result<(), ReconcileError<S::Error>> {
        trace!(%principal, ?permissions, "push permissions");
        self.store
            .set_permissions(&self.entity, principal, permissions)
            .map_err(|source| ReconcileError::Write {
                operation,
                entity: self.entity.clone(),
                principal: principal.clone(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use std::convert::Infallible;

    use crate::entity::EntityId;
    use crate::entity::permission::{READ, WRITE};
    use crate::order::AssignmentOrder;
    use crate::principal::{ObjectPermissions, Principal, PrincipalPermissions};
    use crate::test_utils::user_rule;

    use super::{Operation, ReconcileError, compute};

    #[test]
    fn operation_messages() {
        assert_eq!(
            Operation::UpdateUserPermissions.to_string(),
            "failed to update user permissions"
        );
        assert_eq!(
            Operation::RemoveGroupPermissions.to_string(),
            "failed to remove group permissions"
        );
        assert!(Operation::RemoveUserPermissions.is_removal());
        assert!(!Operation::UpdateGroupPermissions.is_removal());
    }

    #[test]
    fn error_accessors() {
        let error: ReconcileError<std::io::Error> = ReconcileError::Write {
            operation: Operation::RemoveUserPermissions,
            entity: EntityId::Deployment(3),
            principal: Principal::user("bob"),
            source: std::io::Error::other("connection reset"),
        };

        assert_eq!(error.operation(), Some(Operation::RemoveUserPermissions));
        assert_eq!(error.entity(), Some(&EntityId::Deployment(3)));
        assert_eq!(
            error.to_string(),
            "failed to remove user permissions of user \"bob\" on deployment 3: connection reset"
        );

        let error: ReconcileError<Infallible> =
            ReconcileError::Resolve(crate::order::ResolveError::DuplicatePriority(2));
        assert_eq!(error.operation(), None);
        assert_eq!(error.entity(), None);
    }

    #[test]
    fn compute_reports_remote_permissions() {
        let order = AssignmentOrder::resolve(&[user_rule(1, &["alice", "bob"], &[WRITE])]);
        let assigned = ObjectPermissions {
            users: vec![
                PrincipalPermissions::new("alice", [READ]),
                PrincipalPermissions::new("mallory", [WRITE]),
            ],
            groups: vec![PrincipalPermissions::new("alice", [READ])],
        };

        let result = compute(&assigned, &order);
        assert_eq!(result.user("alice"), Some(&[READ.to_string()][..]));
        assert_eq!(result.user("bob"), None);
        assert_eq!(result.user("mallory"), None);
        assert!(result.groups().is_empty());
    }
}
