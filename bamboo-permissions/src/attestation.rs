// SPDX-License-Identifier: MIT OR Apache-2.0

//! "Who can do X" view over the permissions reported by the remote store.
use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::principal::{ObjectPermissions, PrincipalPermissions};

/// Permission token mapped to the names of the principals holding it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Attestation {
    pub users: BTreeMap<String, Vec<String>>,
    pub groups: BTreeMap<String, Vec<String>>,
}

impl Attestation {
    /// Invert a principal to permissions listing into a permission to principals one.
    ///
    /// Within each bucket principals keep the order in which the remote store reported them.
    pub fn invert(assigned: &ObjectPermissions) -> Self {
        Self {
            users: invert_entries(&assigned.users),
            groups: invert_entries(&assigned.groups),
        }
    }

    /// Users holding the permission.
    pub fn users_with(&self, permission: &str) -> &[String] {
        self.users.get(permission).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Groups holding the permission.
    pub fn groups_with(&self, permission: &str) -> &[String] {
        self.groups.get(permission).map(Vec::as_slice).unwrap_or(&[])
    }
}

fn invert_entries(entries: &[PrincipalPermissions]) -> BTreeMap<String, Vec<String>> {
    let mut buckets: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for entry in entries {
        for permission in &entry.permissions {
            buckets
                .entry(permission.clone())
                .or_default()
                .push(entry.name.clone());
        }
    }
    buckets
}

#[cfg(test)]
mod tests {
    use crate::entity::permission::{ADMINISTRATION, BUILD, READ};
    use crate::principal::{ObjectPermissions, PrincipalPermissions};

    use super::Attestation;

    #[test]
    fn invert_users_and_groups() {
        let assigned = ObjectPermissions {
            users: vec![
                PrincipalPermissions::new("alice", [READ, ADMINISTRATION]),
                PrincipalPermissions::new("bob", [READ]),
            ],
            groups: vec![PrincipalPermissions::new("ci", [BUILD, READ])],
        };

        let attestation = Attestation::invert(&assigned);

        assert_eq!(attestation.users_with(READ), &["alice", "bob"]);
        assert_eq!(attestation.users_with(ADMINISTRATION), &["alice"]);
        assert!(attestation.users_with(BUILD).is_empty());
        assert_eq!(attestation.groups_with(BUILD), &["ci"]);
        assert_eq!(attestation.groups_with(READ), &["ci"]);
        assert_eq!(attestation.users.len(), 2);
    }

    #[test]
    fn principals_without_permissions_are_absent() {
        let assigned = ObjectPermissions {
            users: vec![PrincipalPermissions::new("nobody", Vec::<String>::new())],
            groups: vec![],
        };

        assert_eq!(Attestation::invert(&assigned), Attestation::default());
    }
}
