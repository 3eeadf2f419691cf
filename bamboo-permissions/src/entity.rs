// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bamboo entities carrying user and group permissions.
use std::fmt::Display;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Permission tokens understood by Bamboo.
pub mod permission {
    pub const READ: &str = "READ";
    pub const VIEW_CONFIGURATION: &str = "VIEWCONFIGURATION";
    pub const WRITE: &str = "WRITE";
    pub const BUILD: &str = "BUILD";
    pub const CLONE: &str = "CLONE";
    pub const CREATE: &str = "CREATE";
    pub const CREATE_REPOSITORY: &str = "CREATEREPOSITORY";
    pub const ADMINISTRATION: &str = "ADMINISTRATION";
}

const PROJECT_PERMISSIONS: &[&str] = &[
    permission::READ,
    permission::VIEW_CONFIGURATION,
    permission::WRITE,
    permission::BUILD,
    permission::CLONE,
    permission::CREATE,
    permission::CREATE_REPOSITORY,
    permission::ADMINISTRATION,
];

const PLAN_PERMISSIONS: &[&str] = &[
    permission::READ,
    permission::VIEW_CONFIGURATION,
    permission::WRITE,
    permission::BUILD,
    permission::CLONE,
    permission::ADMINISTRATION,
];

const REPOSITORY_PERMISSIONS: &[&str] = &[permission::READ, permission::ADMINISTRATION];

/// Implicit roles which Bamboo grants permissions to unless told otherwise.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Role {
    /// Every authenticated user.
    LoggedIn,

    /// Unauthenticated visitors.
    Anonymous,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::LoggedIn => "LOGGED_IN",
            Role::Anonymous => "ANONYMOUS",
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum EntityKind {
    Project,
    Plan,
    Deployment,
    Repository,
}

impl EntityKind {
    /// Permission tokens which may be assigned on entities of this kind.
    pub fn allowed_permissions(&self) -> &'static [&'static str] {
        match self {
            EntityKind::Project | EntityKind::Deployment => PROJECT_PERMISSIONS,
            EntityKind::Plan => PLAN_PERMISSIONS,
            EntityKind::Repository => REPOSITORY_PERMISSIONS,
        }
    }

    /// Returns `true` if the permission token is in this kind's allow-list.
    pub fn allows(&self, permission: &str) -> bool {
        self.allowed_permissions().contains(&permission)
    }

    /// Implicit roles which get their permissions zeroed when an entity is put under
    /// management.
    pub fn default_roles(&self) -> &'static [Role] {
        match self {
            EntityKind::Project | EntityKind::Plan | EntityKind::Deployment => {
                &[Role::LoggedIn, Role::Anonymous]
            }
            EntityKind::Repository => &[Role::LoggedIn],
        }
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            EntityKind::Project => "project",
            EntityKind::Plan => "plan",
            EntityKind::Deployment => "deployment",
            EntityKind::Repository => "repository",
        };

        write!(f, "{}", s)
    }
}

/// Identifier of an entity in the remote permission store.
///
/// Projects and plans are addressed by key, deployments and linked repositories by their
/// numeric id.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum EntityId {
    Project(String),
    Plan(String),
    Deployment(u64),
    Repository(u64),
}

impl EntityId {
    pub fn project(key: impl Into<String>) -> Self {
        Self::Project(key.into())
    }

    pub fn plan(key: impl Into<String>) -> Self {
        Self::Plan(key.into())
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            EntityId::Project(_) => EntityKind::Project,
            EntityId::Plan(_) => EntityKind::Plan,
            EntityId::Deployment(_) => EntityKind::Deployment,
            EntityId::Repository(_) => EntityKind::Repository,
        }
    }
}

impl Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityId::Project(key) | EntityId::Plan(key) => write!(f, "{} {}", self.kind(), key),
            EntityId::Deployment(id) | EntityId::Repository(id) => {
                write!(f, "{} {}", self.kind(), id)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{EntityId, EntityKind, Role, permission};

    #[test]
    fn allow_lists_per_kind() {
        assert!(EntityKind::Project.allows(permission::CREATE_REPOSITORY));
        assert!(EntityKind::Deployment.allows(permission::BUILD));
        assert!(!EntityKind::Plan.allows(permission::CREATE));
        assert!(EntityKind::Repository.allows(permission::ADMINISTRATION));
        assert!(!EntityKind::Repository.allows(permission::WRITE));
        assert!(!EntityKind::Project.allows("read"));
    }

    #[test]
    fn repositories_only_reset_logged_in() {
        assert_eq!(EntityKind::Repository.default_roles(), &[Role::LoggedIn]);
        assert_eq!(
            EntityKind::Deployment.default_roles(),
            &[Role::LoggedIn, Role::Anonymous]
        );
    }

    #[test]
    fn display() {
        assert_eq!(EntityId::project("PRJ").to_string(), "project PRJ");
        assert_eq!(EntityId::Deployment(42).to_string(), "deployment 42");
        assert_eq!(EntityId::plan("PRJ-PLAN").kind(), EntityKind::Plan);
        assert_eq!(Role::Anonymous.to_string(), "ANONYMOUS");
    }
}
