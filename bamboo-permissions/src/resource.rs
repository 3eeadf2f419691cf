// SPDX-License-Identifier: MIT OR Apache-2.0

//! Lifecycle of the managed permissions of one entity.
//!
//! Each flow turns [`PermissionsDefinition`]s into [`AssignmentOrder`]s and hands them to the
//! [`ReconciliationEngine`]. Desired definitions are validated and resolved according to the
//! [`ReconcileConfig`], recorded definitions are resolved leniently since they were accepted
//! before.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::attestation::Attestation;
use crate::computed::AssignmentResult;
use crate::config::ReconcileConfig;
use crate::engine::{ReconcileError, ReconciliationEngine, compute, read_permissions};
use crate::entity::EntityId;
use crate::order::{AssignmentOrder, ResolveError};
use crate::rule::Assignments;
use crate::traits::{PermissionStore, PrincipalValidator};
use crate::validator::Unchecked;

/// Desired or recorded permission configuration of an entity.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PermissionsDefinition {
    pub entity: EntityId,

    pub assignments: Assignments,

    /// Opaque version string. Changing it forces every permission set to be pushed again on
    /// the next update.
    #[cfg_attr(feature = "serde", serde(default))]
    pub assignment_version: Option<String>,
}

impl PermissionsDefinition {
    pub fn new(entity: EntityId, assignments: impl Into<Assignments>) -> Self {
        Self {
            entity,
            assignments: assignments.into(),
            assignment_version: None,
        }
    }

    pub fn with_assignment_version(mut self, version: impl Into<String>) -> Self {
        self.assignment_version = Some(version.into());
        self
    }

    /// Validate and resolve the rules as desired state.
    pub fn desired_order(&self, config: &ReconcileConfig) -> Result<AssignmentOrder, ResolveError> {
        if config.validate_permissions {
            self.assignments.validate(self.entity.kind())?;
        }
        AssignmentOrder::resolve_with(self.assignments.as_slice(), config.duplicate_priorities)
    }

    /// Resolve the rules as previously recorded state.
    pub fn recorded_order(&self) -> AssignmentOrder {
        AssignmentOrder::resolve(self.assignments.as_slice())
    }

    /// Returns `true` if the assignment version differs from the recorded one.
    pub fn forces_update(&self, recorded: &PermissionsDefinition) -> bool {
        self.assignment_version != recorded.assignment_version
    }
}

/// Put the permissions of an entity under management.
///
/// Implicit roles are zeroed first (if configured), then every valid principal gets its full
/// desired permission set pushed.
pub fn create<S, V>(
    store: &mut S,
    validator: V,
    config: &ReconcileConfig,
    desired: &PermissionsDefinition,
) -> Result<AssignmentResult, ReconcileError<S::Error>>
where
    S: PermissionStore,
    V: PrincipalValidator<S>,
{
    let order = desired.desired_order(config)?;

    let mut engine = ReconciliationEngine::new(store, validator, desired.entity.clone());
    if config.reset_default_roles {
        engine.reset_roles(desired.entity.kind().default_roles(), config.strict_roles)?;
    }
    engine.apply(&order)
}

/// Refresh the computed result of managed permissions from what the remote store reports.
pub fn read<S>(
    store: &S,
    recorded: &PermissionsDefinition,
) -> Result<AssignmentResult, ReconcileError<S::Error>>
where
    S: PermissionStore,
{
    let order = recorded.recorded_order();
    let assigned = read_permissions(store, &recorded.entity)?;
    Ok(compute(&assigned, &order))
}

/// Move managed permissions from the recorded definition to the desired one.
///
/// The entity is taken from the recorded definition.
pub fn update<S, V>(
    store: &mut S,
    validator: V,
    config: &ReconcileConfig,
    desired: &PermissionsDefinition,
    recorded: &PermissionsDefinition,
) -> Result<AssignmentResult, ReconcileError<S::Error>>
where
    S: PermissionStore,
    V: PrincipalValidator<S>,
{
    let current = desired.desired_order(config)?;
    let previous = recorded.recorded_order();
    let force_update = desired.forces_update(recorded);

    let mut engine = ReconciliationEngine::new(store, validator, recorded.entity.clone());
    engine.update(&previous, &current, force_update)
}

/// Stop managing the permissions of an entity.
///
/// Unless the configuration retains them, every managed principal still holding permissions on
/// the entity gets them revoked.
pub fn delete<S>(
    store: &mut S,
    config: &ReconcileConfig,
    recorded: &PermissionsDefinition,
) -> Result<(), ReconcileError<S::Error>>
where
    S: PermissionStore,
{
    if config.retain_on_delete {
        return Ok(());
    }

    let order = recorded.recorded_order();
    let mut engine = ReconciliationEngine::new(store, Unchecked, recorded.entity.clone());
    let assigned = engine.read_permissions()?;
    engine.delete(&assigned, &order)
}

/// List who holds which permission on the entity.
pub fn attest<S>(store: &S, entity: &EntityId) -> Result<Attestation, ReconcileError<S::Error>>
where
    S: PermissionStore,
{
    let assigned = read_permissions(store, entity)?;
    Ok(Attestation::invert(&assigned))
}
