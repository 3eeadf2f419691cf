// SPDX-License-Identifier: MIT OR Apache-2.0

//! Users and groups which can hold permissions on an entity.
use std::fmt::Display;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Distinguishes the two kinds of principals Bamboo knows about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PrincipalKind {
    User,
    Group,
}

impl PrincipalKind {
    /// Attach a name to this kind.
    pub fn principal(&self, name: impl Into<String>) -> Principal {
        match self {
            PrincipalKind::User => Principal::User(name.into()),
            PrincipalKind::Group => Principal::Group(name.into()),
        }
    }
}

impl Display for PrincipalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PrincipalKind::User => "user",
            PrincipalKind::Group => "group",
        };

        write!(f, "{}", s)
    }
}

/// A user or group identity eligible to hold permissions on an entity.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Principal {
    User(String),
    Group(String),
}

impl Principal {
    pub fn user(name: impl Into<String>) -> Self {
        Self::User(name.into())
    }

    pub fn group(name: impl Into<String>) -> Self {
        Self::Group(name.into())
    }

    /// Name of the user or group.
    pub fn name(&self) -> &str {
        match self {
            Principal::User(name) | Principal::Group(name) => name,
        }
    }

    pub fn kind(&self) -> PrincipalKind {
        match self {
            Principal::User(_) => PrincipalKind::User,
            Principal::Group(_) => PrincipalKind::Group,
        }
    }

    pub fn is_user(&self) -> bool {
        matches!(self, Principal::User(_))
    }

    pub fn is_group(&self) -> bool {
        matches!(self, Principal::Group(_))
    }
}

impl Display for Principal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} \"{}\"", self.kind(), self.name())
    }
}

/// Principal confirmed to exist by the remote store's authoritative search.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PrincipalHandle {
    pub principal: Principal,
}

impl PrincipalHandle {
    pub fn new(principal: Principal) -> Self {
        Self { principal }
    }
}

/// Permissions a single principal holds on an entity, as reported by the remote store.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PrincipalPermissions {
    pub name: String,
    pub permissions: Vec<String>,
}

impl PrincipalPermissions {
    pub fn new<P>(name: impl Into<String>, permissions: P) -> Self
    where
        P: IntoIterator,
        P::Item: Into<String>,
    {
        Self {
            name: name.into(),
            permissions: permissions.into_iter().map(Into::into).collect(),
        }
    }
}

/// Everything the remote store reports as actually assigned on one entity.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ObjectPermissions {
    pub users: Vec<PrincipalPermissions>,
    pub groups: Vec<PrincipalPermissions>,
}

impl ObjectPermissions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries of the given principal kind.
    pub fn of_kind(&self, kind: PrincipalKind) -> &[PrincipalPermissions] {
        match kind {
            PrincipalKind::User => &self.users,
            PrincipalKind::Group => &self.groups,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty() && self.groups.is_empty()
    }
}
