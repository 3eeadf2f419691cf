// SPDX-License-Identifier: MIT OR Apache-2.0

use std::error::Error;

use crate::entity::{EntityId, Role};
use crate::principal::{ObjectPermissions, Principal, PrincipalHandle, PrincipalKind};

/// API of the remote permission store holding user, group and role permissions per entity.
///
/// Writes replace the full permission set of a principal. Setting the same set twice must be a
/// no-op on the remote side and an empty set revokes everything.
pub trait PermissionStore {
    type Error: Error + Send + Sync + 'static;

    /// Fast, local check whether the principal is already known to exist.
    fn lookup_principal(&self, principal: &Principal) -> bool;

    /// Authoritative search for a principal which may be granted permissions on the entity.
    fn find_principal(
        &self,
        entity: &EntityId,
        principal: &Principal,
    ) -> Result<Option<PrincipalHandle>, Self::Error>;

    /// Read all user and group permissions currently assigned on the entity.
    fn read_permissions(&self, entity: &EntityId) -> Result<ObjectPermissions, Self::Error>;

    /// Replace the permissions of a user on the entity.
    fn set_user_permissions(
        &mut self,
        entity: &EntityId,
        name: &str,
        permissions: &[String],
    ) -> Result<(), Self::Error>;

    /// Replace the permissions of a group on the entity.
    fn set_group_permissions(
        &mut self,
        entity: &EntityId,
        name: &str,
        permissions: &[String],
    ) -> Result<(), Self::Error>;

    /// Replace the permissions of an implicit role on the entity.
    fn set_role_permissions(
        &mut self,
        entity: &EntityId,
        role: Role,
        permissions: &[String],
    ) -> Result<(), Self::Error>;

    /// Replace the permissions of any principal on the entity.
    fn set_permissions(
        &mut self,
        entity: &EntityId,
        principal: &Principal,
        permissions: &[String],
    ) -> Result<(), Self::Error> {
        match principal.kind() {
            PrincipalKind::User => self.set_user_permissions(entity, principal.name(), permissions),
            PrincipalKind::Group => {
                self.set_group_permissions(entity, principal.name(), permissions)
            }
        }
    }
}
