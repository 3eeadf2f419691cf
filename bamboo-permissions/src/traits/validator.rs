// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::entity::EntityId;
use crate::principal::Principal;
use crate::traits::PermissionStore;

/// Strategy deciding whether a principal exists before any permission is pushed for it.
///
/// Principals failing this check are skipped, they never cause a reconciliation to fail.
pub trait PrincipalValidator<S>
where
    S: PermissionStore + ?Sized,
{
    fn is_known(&mut self, store: &S, entity: &EntityId, principal: &Principal) -> bool;
}

impl<S, V> PrincipalValidator<S> for &mut V
where
    S: PermissionStore + ?Sized,
    V: PrincipalValidator<S> + ?Sized,
{
    fn is_known(&mut self, store: &S, entity: &EntityId, principal: &Principal) -> bool {
        (**self).is_known(store, entity, principal)
    }
}
