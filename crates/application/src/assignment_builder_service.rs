use azmirror_core::{AppResult, DirectoryObjectId, RoleId};
use azmirror_domain::{Assignment, AssignmentRequest};

use crate::RoleMappingService;


/// Turns missing assignments plus a role translation table into concrete
/// creation requests for the target object.
#[derive(Clone)]
pub struct AssignmentBuilderService {
    role_mapping_service: RoleMappingService,
}

impl AssignmentBuilderService {
    /// Creates a new builder from a role mapping service.
    #[must_use]
    pub fn new(role_mapping_service: RoleMappingService) -> Self {
        Self {
            role_mapping_service,
        }
    }

    /// Builds one creation request per missing assignment, in input order.
    ///
    /// Each request's role is resolved through the translation table; a role
    /// absent from the table falls back to the nil sentinel, which the
    /// directory treats as "default role".
    pub async fn build_requests(
        &self,
        missing_assignments: &[Assignment],
        original_id: DirectoryObjectId,
        target_id: DirectoryObjectId,
    ) -> AppResult<Vec<AssignmentRequest>> {
        let table = self
            .role_mapping_service
            .translation_table(original_id, target_id)
            .await?;

        let requests = missing_assignments
            .iter()
            .map(|assignment| AssignmentRequest {
                principal_id: assignment.principal_id,
                resource_id: target_id,
                role_id: table.resolve(assignment.role_id).unwrap_or(RoleId::NIL),
            })
            .collect();

        Ok(requests)
    }
}
