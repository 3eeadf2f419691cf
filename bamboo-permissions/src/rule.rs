// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prioritized assignment rules, as read from configuration or recorded state.
use std::slice::Iter;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::entity::EntityKind;
use crate::principal::Principal;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RuleError {
    #[error("permission \"{permission}\" can not be assigned on a {entity_kind}")]
    UnknownPermission {
        permission: String,
        entity_kind: EntityKind,
    },
}

/// A prioritized statement mapping a set of users and groups to a permission set.
///
/// When a principal is named by several rules the one with the highest `priority` decides its
/// final permissions.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AssignmentRule {
    #[cfg_attr(feature = "serde", serde(default))]
    pub users: Vec<String>,

    #[cfg_attr(feature = "serde", serde(default))]
    pub groups: Vec<String>,

    pub permissions: Vec<String>,

    pub priority: i64,
}

impl AssignmentRule {
    pub fn new(priority: i64) -> Self {
        Self {
            priority,
            ..Default::default()
        }
    }

    pub fn with_users<I>(mut self, users: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.users.extend(users.into_iter().map(Into::into));
        self
    }

    pub fn with_groups<I>(mut self, groups: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.groups.extend(groups.into_iter().map(Into::into));
        self
    }

    pub fn with_permissions<I>(mut self, permissions: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.permissions.extend(permissions.into_iter().map(Into::into));
        self
    }

    /// All users, followed by all groups mentioned by this rule.
    pub fn principals(&self) -> impl Iterator<Item = Principal> + '_ {
        self.users
            .iter()
            .map(Principal::user)
            .chain(self.groups.iter().map(Principal::group))
    }

    /// Check every permission token against the allow-list of the entity kind.
    pub fn validate(&self, entity_kind: EntityKind) -> Result<(), RuleError> {
        match self
            .permissions
            .iter()
            .find(|permission| !entity_kind.allows(permission))
        {
            Some(permission) => Err(RuleError::UnknownPermission {
                permission: permission.clone(),
                entity_kind,
            }),
            None => Ok(()),
        }
    }
}

/// Ordered list of assignment rules.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Assignments(Vec<AssignmentRule>);

impl Assignments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_slice(&self) -> &[AssignmentRule] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Validate every rule against the allow-list of the entity kind, stopping at the first
    /// unknown permission.
    pub fn validate(&self, entity_kind: EntityKind) -> Result<(), RuleError> {
        self.into_iter().try_for_each(|rule| rule.validate(entity_kind))
    }
}

impl From<Vec<AssignmentRule>> for Assignments {
    fn from(rules: Vec<AssignmentRule>) -> Self {
        Self(rules)
    }
}

impl FromIterator<AssignmentRule> for Assignments {
    fn from_iter<T: IntoIterator<Item = AssignmentRule>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Assignments {
    type Item = &'a AssignmentRule;
    type IntoIter = Iter<'a, AssignmentRule>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
