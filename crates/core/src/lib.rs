//! Shared primitives for all Rust crates in azmirror.

#![forbid(unsafe_code)]

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Result type used across azmirror crates.
pub type AppResult<T> = Result<T, AppError>;

/// Identifier of a directory object (a service-principal-like entity).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DirectoryObjectId(Uuid);

impl DirectoryObjectId {
    /// Creates a directory object identifier from an existing UUID value.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Display for DirectoryObjectId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Identifier of a principal being granted access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PrincipalId(Uuid);

impl PrincipalId {
    /// Creates a principal identifier from an existing UUID value.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Display for PrincipalId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Identifier of an assignment, issued by the directory on creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssignmentId(Uuid);

impl AssignmentId {
    /// Creates an assignment identifier from an existing UUID value.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Display for AssignmentId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Identifier of a role definition.
///
/// The zero-value UUID is a reserved sentinel meaning "no specific role";
/// it is a translation-table key, never a real role in any catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoleId(Uuid);

impl RoleId {
    /// The "no specific role" sentinel.
    pub const NIL: Self = Self(Uuid::nil());

    /// Creates a role identifier from an existing UUID value.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Creates a role identifier from a 128-bit literal.
    #[must_use]
    pub const fn from_u128(value: u128) -> Self {
        Self(Uuid::from_u128(value))
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }

    /// Returns true for the "no specific role" sentinel.
    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl Default for RoleId {
    fn default() -> Self {
        Self::NIL
    }
}

impl Display for RoleId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Common application error categories.
#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid input, missing configuration, or violated invariant.
    #[error("validation error: {0}")]
    Validation(String),

    /// Requested resource does not exist in the directory.
    #[error("not found: {0}")]
    NotFound(String),

    /// Credentials were rejected by the directory.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The authenticated principal lacks the required directory permissions.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Internal unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::{DirectoryObjectId, RoleId};

    #[test]
    fn role_id_nil_sentinel_is_zero_uuid() {
        assert!(RoleId::NIL.is_nil());
        assert_eq!(RoleId::NIL.as_uuid(), Uuid::nil());
        assert_eq!(RoleId::default(), RoleId::NIL);
    }

    #[test]
    fn non_nil_role_id_is_not_sentinel() {
        let role_id = RoleId::from_uuid(Uuid::new_v4());
        assert!(!role_id.is_nil());
    }

    #[test]
    fn directory_object_id_formats_as_uuid() {
        let object_id = DirectoryObjectId::from_uuid(Uuid::new_v4());
        assert_eq!(object_id.to_string().len(), 36);
    }
}
