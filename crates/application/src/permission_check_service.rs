use std::sync::Arc;

use azmirror_core::{AppResult, DirectoryObjectId, RoleId};
use tracing::warn;

use crate::AssignmentRepository;

#[cfg(test)]
mod tests;

/// Directory-permission role identifiers accepted as sufficient for running
/// reconciliation: Application.ReadWrite.All, Directory.ReadWrite.All and
/// AppRoleAssignment.ReadWrite.All.
const ACCEPTED_PERMISSION_ROLE_IDS: [RoleId; 3] = [
    RoleId::from_u128(0x1bfefb4e_e0b5_418b_a88f_73c46d2cc8e9),
    RoleId::from_u128(0x18a4783c_866b_4cc7_a460_3d5e5662c884),
    RoleId::from_u128(0x06b708a9_e830_4db3_a914_8e69da51d44f),
];

/// Checks whether a principal holds any of the directory permissions this
/// tool needs before it can mutate assignments.
#[derive(Clone)]
pub struct PermissionCheckService {
    repository: Arc<dyn AssignmentRepository>,
}

impl PermissionCheckService {
    /// Creates a new permission check service.
    #[must_use]
    pub fn new(repository: Arc<dyn AssignmentRepository>) -> Self {
        Self { repository }
    }

    /// Returns true when the principal, resolved by its application
    /// identifier, holds at least one accepted permission role.
    pub async fn principal_has_permissions(
        &self,
        principal_app_id: DirectoryObjectId,
    ) -> AppResult<bool> {
        let held_assignments = self.repository.assignments_held_by(principal_app_id).await?;

        let has_permissions = held_assignments.iter().any(|assignment| {
            ACCEPTED_PERMISSION_ROLE_IDS
                .iter()
                .any(|accepted| *accepted == assignment.role_id)
        });

        if !has_permissions {
            warn!(principal_app_id = %principal_app_id, "principal has no accepted directory permissions");
        }

        Ok(has_permissions)
    }
}
