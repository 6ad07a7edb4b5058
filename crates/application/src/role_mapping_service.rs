use std::sync::Arc;

use azmirror_core::{AppResult, DirectoryObjectId};
use azmirror_domain::{RoleDefinition, RoleTranslationTable};
use tracing::info;

use crate::AssignmentRepository;


/// Computes role-identifier translation tables between two directory
/// objects' role catalogs.
#[derive(Clone)]
pub struct RoleMappingService {
    repository: Arc<dyn AssignmentRepository>,
}

impl RoleMappingService {
    /// Creates a new role mapping service from a repository implementation.
    #[must_use]
    pub fn new(repository: Arc<dyn AssignmentRepository>) -> Self {
        Self { repository }
    }

    /// Builds the translation table from the original object's role
    /// vocabulary onto the target's.
    ///
    /// An empty table means no mapping is possible and callers must fall
    /// back to the nil sentinel.
    pub async fn translation_table(
        &self,
        original_id: DirectoryObjectId,
        target_id: DirectoryObjectId,
    ) -> AppResult<RoleTranslationTable> {
        let (original_roles, target_roles) = tokio::try_join!(
            self.repository.role_definitions(original_id),
            self.repository.role_definitions(target_id),
        )?;

        Ok(build_table(&original_roles, &target_roles))
    }
}

fn build_table(
    original_roles: &[RoleDefinition],
    target_roles: &[RoleDefinition],
) -> RoleTranslationTable {
    let mut table = RoleTranslationTable::new();

    if target_roles.is_empty() {
        info!("target object has no roles, resorting to default sentinel behavior");
        return table;
    }

    // Default is the first role in directory order, never re-sorted.
    let Some(default_target_role) = target_roles.first().and_then(|role| role.id) else {
        info!("no valid default role found on the target object");
        return table;
    };

    table.seed_default(default_target_role);

    if original_roles.is_empty() {
        info!("original object has no roles, mapping all to the default target role");
        for target_role in target_roles {
            // Self-mapping so role ids already in target vocabulary pass through.
            if let Some(target_role_id) = target_role.id {
                table.insert(target_role_id, target_role_id);
            }
        }
        return table;
    }

    for original_role in original_roles {
        let Some(original_role_id) = original_role.id else {
            continue;
        };

        let matched_target_role_id = target_roles
            .iter()
            .find(|candidate| candidate.display_name_matches(original_role))
            .and_then(|candidate| candidate.id);

        if let Some(target_role_id) = matched_target_role_id {
            info!(
                original_role = display_name_of(original_role),
                target_role = %target_role_id,
                "mapped original role to target role"
            );
            table.insert(original_role_id, target_role_id);
        } else {
            info!(
                original_role = display_name_of(original_role),
                "no matching target role, mapping to the default target role"
            );
            table.insert(original_role_id, default_target_role);
        }
    }

    table
}

fn display_name_of(role: &RoleDefinition) -> &str {
    role.display_name.as_deref().unwrap_or("<unnamed>")
}
