// SPDX-License-Identifier: MIT OR Apache-2.0

use thiserror::Error;

use crate::entity::{EntityId, Role};
use crate::principal::{ObjectPermissions, Principal, PrincipalHandle};
use crate::traits::PermissionStore;

#[derive(Debug, Error)]
pub enum FailingStoreError<E>
where
    E: std::error::Error + 'static,
{
    #[error("injected failure")]
    Injected,

    #[error(transparent)]
    Inner(E),
}

/// Which remote call of a [`FailingStore`] fails.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FailOn {
    /// Every permission write for this principal.
    Write(Principal),

    /// The n-th user or group permission write (counting from 0).
    NthWrite(usize),

    /// The authoritative search for this principal.
    Find(Principal),

    /// Every permission read.
    Read,

    /// Every role write.
    Role,
}

/// Store wrapper injecting failures into selected remote calls.
#[derive(Debug)]
pub struct FailingStore<S> {
    pub inner: S,
    fail_on: FailOn,
    writes: usize,
}

impl<S> FailingStore<S> {
    pub fn new(inner: S, fail_on: FailOn) -> Self {
        Self {
            inner,
            fail_on,
            writes: 0,
        }
    }

    /// Number of user and group writes attempted so far, including failed ones.
    pub fn attempted_writes(&self) -> usize {
        self.writes
    }

    fn write_fails(&mut self, principal: &Principal) -> bool {
        let n = self.writes;
        self.writes += 1;
        match &self.fail_on {
            FailOn::Write(target) => target == principal,
            FailOn::NthWrite(target) => *target == n,
            _ => false,
        }
    }
}

impl<S> PermissionStore for FailingStore<S>
where
    S: PermissionStore,
{
    type Error = FailingStoreError<S::Error>;

    fn lookup_principal(&self, principal: &Principal) -> bool {
        self.inner.lookup_principal(principal)
    }

    fn find_principal(
        &self,
        entity: &EntityId,
        principal: &Principal,
    ) -> Result<Option<PrincipalHandle>, Self::Error> {
        if self.fail_on == FailOn::Find(principal.clone()) {
            return Err(FailingStoreError::Injected);
        }
        self.inner
            .find_principal(entity, principal)
            .map_err(FailingStoreError::Inner)
    }

    fn read_permissions(&self, entity: &EntityId) -> Result<ObjectPermissions, Self::Error> {
        if self.fail_on == FailOn::Read {
            return Err(FailingStoreError::Injected);
        }
        self.inner
            .read_permissions(entity)
            .map_err(FailingStoreError::Inner)
    }

    fn set_user_permissions(
        &mut self,
        entity: &EntityId,
        name: &str,
        permissions: &[String],
    ) -> Result<(), Self::Error> {
        if self.write_fails(&Principal::user(name)) {
            return Err(FailingStoreError::Injected);
        }
        self.inner
            .set_user_permissions(entity, name, permissions)
            .map_err(FailingStoreError::Inner)
    }

    fn set_group_permissions(
        &mut self,
        entity: &EntityId,
        name: &str,
        permissions: &[String],
    ) -> Result<(), Self::Error> {
        if self.write_fails(&Principal::group(name)) {
            return Err(FailingStoreError::Injected);
        }
        self.inner
            .set_group_permissions(entity, name, permissions)
            .map_err(FailingStoreError::Inner)
    }

    fn set_role_permissions(
        &mut self,
        entity: &EntityId,
        role: Role,
        permissions: &[String],
    ) -> Result<(), Self::Error> {
        if self.fail_on == FailOn::Role {
            return Err(FailingStoreError::Injected);
        }
        self.inner
            .set_role_permissions(entity, role, permissions)
            .map_err(FailingStoreError::Inner)
    }
}
