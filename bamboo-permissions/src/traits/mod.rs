// SPDX-License-Identifier: MIT OR Apache-2.0

//! Interfaces to the remote permission store and to principal existence checks.
mod store;
mod validator;

pub use store::PermissionStore;
pub use validator::PrincipalValidator;
