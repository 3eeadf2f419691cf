// SPDX-License-Identifier: MIT OR Apache-2.0

//! What principals actually end up provisioned with after reconciliation.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::principal::PrincipalPermissions;

/// Permissions a single principal is provisioned with.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ComputedAssignment {
    pub name: String,
    pub permissions: Vec<String>,
}

impl ComputedAssignment {
    pub fn new(name: impl Into<String>, permissions: &[String]) -> Self {
        Self {
            name: name.into(),
            permissions: permissions.to_vec(),
        }
    }
}

impl From<&PrincipalPermissions> for ComputedAssignment {
    fn from(value: &PrincipalPermissions) -> Self {
        Self {
            name: value.name.clone(),
            permissions: value.permissions.clone(),
        }
    }
}

/// Sort assignments by principal name and every permission list lexicographically.
///
/// Repeated computation over unchanged state yields identical output, which callers rely on
/// to detect that nothing changed.
pub fn normalize(mut assignments: Vec<ComputedAssignment>) -> Vec<ComputedAssignment> {
    assignments.sort_by(|a, b| a.name.cmp(&b.name));
    for assignment in assignments.iter_mut() {
        assignment.permissions.sort();
    }
    assignments
}

/// Computed users and groups of one entity, always in normalized order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AssignmentResult {
    users: Vec<ComputedAssignment>,
    groups: Vec<ComputedAssignment>,
}

impl AssignmentResult {
    pub fn new(users: Vec<ComputedAssignment>, groups: Vec<ComputedAssignment>) -> Self {
        Self {
            users: normalize(users),
            groups: normalize(groups),
        }
    }

    pub fn users(&self) -> &[ComputedAssignment] {
        &self.users
    }

    pub fn groups(&self) -> &[ComputedAssignment] {
        &self.groups
    }

    /// Computed permissions of a user, if it is part of the result.
    pub fn user(&self, name: &str) -> Option<&[String]> {
        find(&self.users, name)
    }

    /// Computed permissions of a group, if it is part of the result.
    pub fn group(&self, name: &str) -> Option<&[String]> {
        find(&self.groups, name)
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty() && self.groups.is_empty()
    }
}

fn find<'a>(assignments: &'a [ComputedAssignment], name: &str) -> Option<&'a [String]> {
    assignments
        .binary_search_by(|assignment| assignment.name.as_str().cmp(name))
        .ok()
        .map(|index| assignments[index].permissions.as_slice())
}
