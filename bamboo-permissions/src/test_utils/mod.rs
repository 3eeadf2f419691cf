// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities.
mod store;

use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha20Rng;

use crate::rule::AssignmentRule;

pub use store::{FailOn, FailingStore, FailingStoreError};

pub fn setup_logging() {
    if std::env::var("RUST_LOG").is_ok() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    }
}

/// Rule assigning the permissions to the given users.
pub fn user_rule(priority: i64, users: &[&str], permissions: &[&str]) -> AssignmentRule {
    AssignmentRule::new(priority)
        .with_users(users.iter().copied())
        .with_permissions(permissions.iter().copied())
}

/// Rule assigning the permissions to the given groups.
pub fn group_rule(priority: i64, groups: &[&str], permissions: &[&str]) -> AssignmentRule {
    AssignmentRule::new(priority)
        .with_groups(groups.iter().copied())
        .with_permissions(permissions.iter().copied())
}

pub fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

/// Deterministically shuffled copy of the rules.
pub fn shuffled(rules: &[AssignmentRule], seed: u64) -> Vec<AssignmentRule> {
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    let mut rules = rules.to_vec();
    rules.shuffle(&mut rng);
    rules
}
