// SPDX-License-Identifier: MIT OR Apache-2.0

//! Principal existence checks run before permissions get pushed.
use std::collections::HashSet;

use tracing::{debug, trace, warn};

use crate::entity::EntityId;
use crate::principal::Principal;
use crate::traits::{PermissionStore, PrincipalValidator};

/// Accepts every principal without asking the remote store.
#[derive(Clone, Copy, Debug, Default)]
pub struct Unchecked;

impl<S> PrincipalValidator<S> for Unchecked
where
    S: PermissionStore + ?Sized,
{
    fn is_known(&mut self, _store: &S, _entity: &EntityId, _principal: &Principal) -> bool {
        true
    }
}

/// Two-tier existence check: the store's fast local lookup first, then its authoritative
/// search.
///
/// Principals confirmed by the search are remembered so they are not searched for again while
/// this validator is alive. A failing search counts as "not found".
#[derive(Clone, Debug, Default)]
pub struct TwoTier {
    confirmed: HashSet<Principal>,
}

impl TwoTier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the principal was confirmed by an earlier authoritative search.
    pub fn is_confirmed(&self, principal: &Principal) -> bool {
        self.confirmed.contains(principal)
    }
}

impl<S> PrincipalValidator<S> for TwoTier
where
    S: PermissionStore + ?Sized,
{
    fn is_known(&mut self, store: &S, entity: &EntityId, principal: &Principal) -> bool {
        if self.confirmed.contains(principal) || store.lookup_principal(principal) {
            return true;
        }

        match store.find_principal(entity, principal) {
            Ok(Some(_)) => {
                trace!(%entity, %principal, "confirmed principal");
                self.confirmed.insert(principal.clone());
                true
            }
            Ok(None) => {
                debug!(%entity, %principal, "principal not found");
                false
            }
            Err(err) => {
                warn!(%entity, %principal, "principal search failed: {err}");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::entity::EntityId;
    use crate::memory::MemoryStore;
    use crate::principal::Principal;
    use crate::test_utils::{FailOn, FailingStore};
    use crate::traits::PrincipalValidator;

    use super::{TwoTier, Unchecked};

    #[test]
    fn unchecked_accepts_everyone() {
        let store = MemoryStore::new();
        let entity = EntityId::project("PRJ");
        assert!(Unchecked.is_known(&store, &entity, &Principal::user("ghost")));
    }

    #[test]
    fn local_lookup_then_search() {
        let store = MemoryStore::new()
            .with_cached_principal(Principal::user("alice"))
            .with_principal(Principal::group("developers"));
        let entity = EntityId::project("PRJ");
        let mut validator = TwoTier::new();

        assert!(validator.is_known(&store, &entity, &Principal::user("alice")));
        assert!(!validator.is_confirmed(&Principal::user("alice")));

        assert!(validator.is_known(&store, &entity, &Principal::group("developers")));
        assert!(validator.is_confirmed(&Principal::group("developers")));

        assert!(!validator.is_known(&store, &entity, &Principal::user("ghost")));
        assert!(!validator.is_known(&store, &entity, &Principal::user("developers")));
    }

    #[test]
    fn failed_search_counts_as_not_found() {
        let bob = Principal::user("bob");
        let store = FailingStore::new(
            MemoryStore::new().with_principal(bob.clone()),
            FailOn::Find(bob.clone()),
        );
        let entity = EntityId::Repository(7);
        let mut validator = TwoTier::new();

        assert!(!validator.is_known(&store, &entity, &bob));
        assert!(!validator.is_confirmed(&bob));
    }
}
