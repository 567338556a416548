//! User entity and related types

use serde::{Deserialize, Serialize};

use crate::domain::path_scope::{clean_path, is_under_root, to_absolute, to_relative};

/// Role of a user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Regular tenant confined to its base path
    #[default]
    General,
    /// Anonymous visitor, never allowed to manage storages
    Guest,
    /// Unrestricted operator
    Admin,
}

/// Authenticated caller of the management API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    username: String,
    role: UserRole,
    /// Root of the subtree this user may manage. Ignored for admins.
    base_path: String,
}

impl User {
    /// Create a new user; the base path is normalized
    pub fn new(username: impl Into<String>, role: UserRole, base_path: impl AsRef<str>) -> Self {
        Self {
            username: username.into(),
            role,
            base_path: clean_path(base_path.as_ref()),
        }
    }

    /// Convenience constructor for an admin
    pub fn admin(username: impl Into<String>) -> Self {
        Self::new(username, UserRole::Admin, "/")
    }

    /// Convenience constructor for a tenant scoped to `base_path`
    pub fn tenant(username: impl Into<String>, base_path: impl AsRef<str>) -> Self {
        Self::new(username, UserRole::General, base_path)
    }

    // Getters

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn role(&self) -> UserRole {
        self.role
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    pub fn is_guest(&self) -> bool {
        self.role == UserRole::Guest
    }

    // Scope checks

    /// Whether this user may see or act on a mount at `mount_path`
    pub fn can_access(&self, mount_path: &str) -> bool {
        self.is_admin() || is_under_root(mount_path, &self.base_path)
    }

    /// Mount path as this user should see it
    pub fn view_path(&self, mount_path: &str) -> String {
        if self.is_admin() {
            mount_path.to_string()
        } else {
            to_relative(mount_path, &self.base_path)
        }
    }

    /// Resolve a mount path submitted by this user to the absolute path it will
    /// be stored under, or `None` if it falls outside the user's subtree.
    pub fn resolve_mount_path(&self, mount_path: &str) -> Option<String> {
        if self.is_admin() {
            return Some(mount_path.to_string());
        }

        let resolved = if is_under_root(mount_path, &self.base_path) {
            clean_path(mount_path)
        } else {
            to_absolute(mount_path, &self.base_path)
        };

        if is_under_root(&resolved, &self.base_path) {
            Some(resolved)
        } else {
            None
        }
    }
}
