// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory permission store.
use std::collections::{BTreeMap, HashMap, HashSet};

use thiserror::Error;

use crate::entity::{EntityId, Role};
use crate::principal::{
    ObjectPermissions, Principal, PrincipalHandle, PrincipalKind, PrincipalPermissions,
};
use crate::traits::PermissionStore;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MemoryStoreError {
    #[error("{0} does not exist")]
    UnknownPrincipal(Principal),
}

/// Target of a recorded write.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WriteTarget {
    Principal(Principal),
    Role(Role),
}

/// One write issued against the store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WriteRecord {
    pub entity: EntityId,
    pub target: WriteTarget,
    pub permissions: Vec<String>,
}

#[derive(Clone, Debug, Default)]
struct EntityPermissions {
    users: BTreeMap<String, Vec<String>>,
    groups: BTreeMap<String, Vec<String>>,
    roles: BTreeMap<Role, Vec<String>>,
}

impl EntityPermissions {
    fn principals_mut(&mut self, kind: PrincipalKind) -> &mut BTreeMap<String, Vec<String>> {
        match kind {
            PrincipalKind::User => &mut self.users,
            PrincipalKind::Group => &mut self.groups,
        }
    }

    fn principals(&self, kind: PrincipalKind) -> &BTreeMap<String, Vec<String>> {
        match kind {
            PrincipalKind::User => &self.users,
            PrincipalKind::Group => &self.groups,
        }
    }
}

/// A permission store keeping everything in memory.
///
/// Principals must be registered with the directory before they can be granted permissions,
/// revoking permissions of unknown principals is accepted as a no-op. Every write is appended
/// to a journal which can be inspected to count remote calls.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    directory: HashSet<Principal>,
    cached: HashSet<Principal>,
    entities: HashMap<EntityId, EntityPermissions>,
    journal: Vec<WriteRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a principal which the authoritative search will find.
    pub fn with_principal(mut self, principal: Principal) -> Self {
        self.insert_principal(principal);
        self
    }

    /// Register a principal which is also known to the fast local lookup.
    pub fn with_cached_principal(mut self, principal: Principal) -> Self {
        self.cached.insert(principal.clone());
        self.insert_principal(principal);
        self
    }

    pub fn insert_principal(&mut self, principal: Principal) {
        self.directory.insert(principal);
    }

    /// Remove a principal from the directory, keeping permissions it already holds.
    pub fn forget_principal(&mut self, principal: &Principal) {
        self.directory.remove(principal);
        self.cached.remove(principal);
    }

    /// Assign permissions without recording a write, for seeding remote state.
    pub fn grant<P>(&mut self, entity: &EntityId, principal: &Principal, permissions: P)
    where
        P: IntoIterator,
        P::Item: Into<String>,
    {
        let permissions: Vec<String> = permissions.into_iter().map(Into::into).collect();
        self.store(entity, principal, &permissions);
    }

    /// Permissions the principal currently holds on the entity.
    pub fn permissions(&self, entity: &EntityId, principal: &Principal) -> Option<&[String]> {
        self.entities
            .get(entity)?
            .principals(principal.kind())
            .get(principal.name())
            .map(Vec::as_slice)
    }

    /// Permissions of an implicit role on the entity, `None` if never written.
    pub fn role_permissions(&self, entity: &EntityId, role: Role) -> Option<&[String]> {
        self.entities
            .get(entity)?
            .roles
            .get(&role)
            .map(Vec::as_slice)
    }

    /// All writes issued so far, oldest first.
    pub fn journal(&self) -> &[WriteRecord] {
        &self.journal
    }

    /// Writes issued for users and groups, ignoring role writes.
    pub fn principal_writes(&self) -> impl Iterator<Item = (&Principal, &[String])> {
        self.journal.iter().filter_map(|record| match &record.target {
            WriteTarget::Principal(principal) => Some((principal, record.permissions.as_slice())),
            WriteTarget::Role(_) => None,
        })
    }

    pub fn clear_journal(&mut self) {
        self.journal.clear();
    }

    fn store(&mut self, entity: &EntityId, principal: &Principal, permissions: &[String]) {
        let principals = self
            .entities
            .entry(entity.clone())
            .or_default()
            .principals_mut(principal.kind());

        if permissions.is_empty() {
            principals.remove(principal.name());
        } else {
            principals.insert(principal.name().to_owned(), permissions.to_vec());
        }
    }

    fn write(
        &mut self,
        entity: &EntityId,
        principal: Principal,
        permissions: &[String],
    ) -> Result<(), MemoryStoreError> {
        if !permissions.is_empty() && !self.directory.contains(&principal) {
            return Err(MemoryStoreError::UnknownPrincipal(principal));
        }

        self.store(entity, &principal, permissions);
        self.journal.push(WriteRecord {
            entity: entity.clone(),
            target: WriteTarget::Principal(principal),
            permissions: permissions.to_vec(),
        });
        Ok(())
    }
}

fn listing(principals: &BTreeMap<String, Vec<String>>) -> Vec<PrincipalPermissions> {
    principals
        .iter()
        .map(|(name, permissions)| PrincipalPermissions {
            name: name.clone(),
            permissions: permissions.clone(),
        })
        .collect()
}

impl PermissionStore for MemoryStore {
    type Error = MemoryStoreError;

    fn lookup_principal(&self, principal: &Principal) -> bool {
        self.cached.contains(principal)
    }

    fn find_principal(
        &self,
        _entity: &EntityId,
        principal: &Principal,
    ) -> Result<Option<PrincipalHandle>, Self::Error> {
        Ok(self
            .directory
            .get(principal)
            .map(|principal| PrincipalHandle::new(principal.clone())))
    }

    fn read_permissions(&self, entity: &EntityId) -> Result<ObjectPermissions, Self::Error> {
        Ok(self
            .entities
            .get(entity)
            .map(|permissions| ObjectPermissions {
                users: listing(&permissions.users),
                groups: listing(&permissions.groups),
            })
            .unwrap_or_default())
    }

    fn set_user_permissions(
        &mut self,
        entity: &EntityId,
        name: &str,
        permissions: &[String],
    ) -> Result<(), Self::Error> {
        self.write(entity, Principal::user(name), permissions)
    }

    fn set_group_permissions(
        &mut self,
        entity: &EntityId,
        name: &str,
        permissions: &[String],
    ) -> Result<(), Self::Error> {
        self.write(entity, Principal::group(name), permissions)
    }

    fn set_role_permissions(
        &mut self,
        entity: &EntityId,
        role: Role,
        permissions: &[String],
    ) -> Result<(), Self::Error> {
        self.entities
            .entry(entity.clone())
            .or_default()
            .roles
            .insert(role, permissions.to_vec());
        self.journal.push(WriteRecord {
            entity: entity.clone(),
            target: WriteTarget::Role(role),
            permissions: permissions.to_vec(),
        });
        Ok(())
    }
}
