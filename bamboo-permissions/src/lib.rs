// SPDX-License-Identifier: MIT OR Apache-2.0

//! Priority-based assignment resolution and permission reconciliation for Bamboo projects,
//! plans, deployments and linked repositories.
//!
//! Permissions of an entity are described by a list of [`AssignmentRule`]s. Every rule names
//! users and groups, the permission tokens they should hold and a priority. Resolving the rules
//! yields an [`AssignmentOrder`] where each principal is mapped to exactly one permission set,
//! the one of the highest-priority rule naming it.
//!
//! The [`ReconciliationEngine`] brings a remote [`PermissionStore`] in line with such an order:
//!
//! - `apply` pushes every permission set when an entity is first put under management,
//! - `update` compares the recorded order with the desired one and only pushes what changed,
//!   revoking principals which are no longer mentioned,
//! - `compute` reports what the remote store actually holds for the managed principals,
//! - `delete` revokes the permissions of all managed principals.
//!
//! Principals are checked for existence with an injectable [`PrincipalValidator`] strategy.
//! Unknown principals are skipped, they never make a reconciliation fail. Failing writes to the
//! remote store abort the call without rolling back earlier writes; re-running the same call
//! converges since every write replaces a full permission set.
//!
//! ## Example
//!
//! ```rust
//! use bamboo_permissions::entity::permission::{ADMINISTRATION, READ};
//! use bamboo_permissions::memory::MemoryStore;
//! use bamboo_permissions::resource::{self, PermissionsDefinition};
//! use bamboo_permissions::validator::TwoTier;
//! use bamboo_permissions::{AssignmentRule, EntityId, Principal, ReconcileConfig};
//!
//! let mut store = MemoryStore::new()
//!     .with_principal(Principal::user("alice"))
//!     .with_principal(Principal::group("developers"));
//!
//! let desired = PermissionsDefinition::new(
//!     EntityId::project("PRJ"),
//!     vec![
//!         AssignmentRule::new(1)
//!             .with_groups(["developers"])
//!             .with_users(["alice"])
//!             .with_permissions([READ]),
//!         AssignmentRule::new(10)
//!             .with_users(["alice"])
//!             .with_permissions([READ, ADMINISTRATION]),
//!     ],
//! );
//!
//! let config = ReconcileConfig::new();
//! let result = resource::create(&mut store, TwoTier::new(), &config, &desired).unwrap();
//!
//! assert_eq!(
//!     result.user("alice"),
//!     Some(&[ADMINISTRATION.to_string(), READ.to_string()][..])
//! );
//! assert_eq!(result.group("developers"), Some(&[READ.to_string()][..]));
//! ```
pub mod attestation;
pub mod computed;
pub mod config;
pub mod delta;
pub mod engine;
pub mod entity;
#[cfg(feature = "memory")]
pub mod memory;
pub mod order;
pub mod principal;
pub mod resource;
pub mod rule;
#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;
pub mod traits;
pub mod validator;

pub use attestation::Attestation;
pub use computed::{AssignmentResult, ComputedAssignment, normalize};
pub use config::ReconcileConfig;
pub use delta::{Delta, delta};
pub use engine::{Operation, ReconcileError, ReconciliationEngine, compute};
pub use entity::{EntityId, EntityKind, Role};
#[cfg(feature = "memory")]
pub use memory::MemoryStore;
pub use order::{AssignmentOrder, DuplicatePriorities, PrincipalMap, ResolveError};
pub use principal::{ObjectPermissions, Principal, PrincipalHandle, PrincipalPermissions};
pub use rule::{AssignmentRule, Assignments, RuleError};
pub use traits::{PermissionStore, PrincipalValidator};
