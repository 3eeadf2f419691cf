// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collapse prioritized assignment rules into one permission set per principal.
//!
//! Rules are grouped by their priority and applied in ascending priority order, every rule
//! overwriting what lower priorities assigned to the principals it names. A principal mentioned
//! in several rules therefore ends up with the permission set of its highest-priority rule.
//!
//! Only one rule is kept per priority. [`AssignmentOrder::resolve`] keeps the rule which comes
//! last in the input, [`AssignmentOrder::resolve_strict`] refuses to pick one and returns an
//! error instead.
use std::collections::{BTreeMap, HashMap};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::principal::PrincipalKind;
use crate::rule::{AssignmentRule, RuleError};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("more than one assignment rule uses priority {0}")]
    DuplicatePriority(i64),

    #[error(transparent)]
    Rule(#[from] RuleError),
}

/// How to treat several assignment rules sharing the same priority.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DuplicatePriorities {
    /// Fail resolution with [`ResolveError::DuplicatePriority`].
    #[default]
    Reject,

    /// Keep the rule appearing last in the input, silently dropping earlier ones.
    LastWriteWins,
}

/// Principal names mapped to their resolved permission set, remembering the order in which
/// principals were first encountered.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PrincipalMap {
    permissions: HashMap<String, Vec<String>>,
    names: Vec<String>,
}

impl PrincipalMap {
    fn assign(&mut self, name: &str, permissions: &[String]) {
        if self
            .permissions
            .insert(name.to_owned(), permissions.to_vec())
            .is_none()
        {
            self.names.push(name.to_owned());
        }
    }

    /// Resolved permission set of the principal.
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.permissions.get(name).map(Vec::as_slice)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.permissions.contains_key(name)
    }

    /// Principal names in order of first encounter.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Principals with their permission sets, in order of first encounter.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.names.iter().filter_map(|name| {
            self.permissions
                .get(name)
                .map(|permissions| (name.as_str(), permissions.as_slice()))
        })
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Resolved principal to permission-set mapping produced from a list of assignment rules.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AssignmentOrder {
    users: PrincipalMap,
    groups: PrincipalMap,
}

impl AssignmentOrder {
    /// Resolve the rules, keeping the last rule in input order when priorities collide.
    ///
    /// This never fails; an empty list resolves to an empty order.
    pub fn resolve(rules: &[AssignmentRule]) -> Self {
        let mut slots = BTreeMap::new();
        for rule in rules {
            slots.insert(rule.priority, rule);
        }
        Self::from_slots(&slots)
    }

    /// Resolve the rules, failing when two of them share a priority.
    pub fn resolve_strict(rules: &[AssignmentRule]) -> Result<Self, ResolveError> {
        let mut slots = BTreeMap::new();
        for rule in rules {
            if slots.insert(rule.priority, rule).is_some() {
                return Err(ResolveError::DuplicatePriority(rule.priority));
            }
        }
        Ok(Self::from_slots(&slots))
    }

    /// Resolve the rules with the given policy for duplicate priorities.
    pub fn resolve_with(
        rules: &[AssignmentRule],
        duplicates: DuplicatePriorities,
    ) -> Result<Self, ResolveError> {
        match duplicates {
            DuplicatePriorities::Reject => Self::resolve_strict(rules),
            DuplicatePriorities::LastWriteWins => Ok(Self::resolve(rules)),
        }
    }

    fn from_slots(slots: &BTreeMap<i64, &AssignmentRule>) -> Self {
        let mut order = Self::default();

        // `BTreeMap` iterates in ascending priority, higher priorities overwrite.
        for rule in slots.values() {
            for user in &rule.users {
                order.users.assign(user, &rule.permissions);
            }

            for group in &rule.groups {
                order.groups.assign(group, &rule.permissions);
            }
        }

        order
    }

    pub fn users(&self) -> &PrincipalMap {
        &self.users
    }

    pub fn groups(&self) -> &PrincipalMap {
        &self.groups
    }

    /// Mapping for the given principal kind.
    pub fn principals(&self, kind: PrincipalKind) -> &PrincipalMap {
        match kind {
            PrincipalKind::User => &self.users,
            PrincipalKind::Group => &self.groups,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty() && self.groups.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::seq::SliceRandom;
    use rand_chacha::ChaCha20Rng;

    use crate::entity::permission::{ADMINISTRATION, BUILD, READ, WRITE};
    use crate::rule::AssignmentRule;
    use crate::test_utils::{group_rule, strings, user_rule};

    use super::{AssignmentOrder, DuplicatePriorities, ResolveError};

    #[test]
    fn empty_input() {
        let order = AssignmentOrder::resolve(&[]);
        assert!(order.is_empty());
        assert!(AssignmentOrder::resolve_strict(&[]).unwrap().is_empty());
    }

    #[test]
    fn highest_priority_wins_in_any_input_order() {
        let mut rules = vec![
            user_rule(1, &["a"], &[READ]),
            user_rule(5, &["a"], &[WRITE]),
            user_rule(3, &["a", "b"], &[BUILD]),
        ];

        let mut rng = ChaCha20Rng::seed_from_u64(7);
        for _ in 0..16 {
            rules.shuffle(&mut rng);
            let order = AssignmentOrder::resolve(&rules);
            assert_eq!(order.users().get("a"), Some(strings(&[WRITE]).as_slice()));
            assert_eq!(order.users().get("b"), Some(strings(&[BUILD]).as_slice()));
        }
    }

    #[test]
    fn duplicate_priority_keeps_last_rule() {
        let rules = vec![user_rule(1, &["a"], &[READ]), user_rule(1, &["b"], &[WRITE])];

        let order = AssignmentOrder::resolve(&rules);
        assert!(!order.users().contains("a"));
        assert_eq!(order.users().get("b"), Some(strings(&[WRITE]).as_slice()));
        assert_eq!(order.users().names(), &strings(&["b"]));
    }

    #[test]
    fn duplicate_priority_rejected_by_strict_resolution() {
        let rules = vec![user_rule(1, &["a"], &[READ]), user_rule(1, &["b"], &[WRITE])];

        assert_eq!(
            AssignmentOrder::resolve_strict(&rules),
            Err(ResolveError::DuplicatePriority(1))
        );
        assert_eq!(
            AssignmentOrder::resolve_with(&rules, DuplicatePriorities::Reject),
            Err(ResolveError::DuplicatePriority(1))
        );
        assert_eq!(
            AssignmentOrder::resolve_with(&rules, DuplicatePriorities::LastWriteWins),
            Ok(AssignmentOrder::resolve(&rules))
        );
    }

    #[test]
    fn users_and_groups_resolve_independently() {
        let rules = vec![
            AssignmentRule::new(10)
                .with_users(["admins"])
                .with_permissions([ADMINISTRATION]),
            group_rule(2, &["admins"], &[READ]),
        ];

        let order = AssignmentOrder::resolve(&rules);
        assert_eq!(
            order.users().get("admins"),
            Some(strings(&[ADMINISTRATION]).as_slice())
        );
        assert_eq!(order.groups().get("admins"), Some(strings(&[READ]).as_slice()));
    }

    #[test]
    fn names_in_order_of_first_encounter() {
        let rules = vec![
            user_rule(9, &["carol", "alice"], &[WRITE]),
            user_rule(2, &["bob", "alice"], &[READ]),
        ];

        let order = AssignmentOrder::resolve(&rules);

        // Ascending priority decides encounter order, each name appears once.
        assert_eq!(order.users().names(), &strings(&["bob", "alice", "carol"]));
        let resolved: Vec<(&str, &[String])> = order.users().iter().collect();
        assert_eq!(resolved.len(), 3);
        assert_eq!(resolved[1].0, "alice");
        assert_eq!(resolved[1].1, strings(&[WRITE]).as_slice());
    }

    #[test]
    fn resolution_is_pure() {
        let rules = vec![
            user_rule(1, &["a"], &[READ]),
            group_rule(2, &["g"], &[READ, WRITE]),
        ];
        assert_eq!(AssignmentOrder::resolve(&rules), AssignmentOrder::resolve(&rules));
    }
}
