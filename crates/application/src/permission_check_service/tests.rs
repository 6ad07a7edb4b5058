use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use azmirror_core::{AppResult, DirectoryObjectId, PrincipalId, RoleId};
use azmirror_domain::{Assignment, AssignmentRequest, RoleDefinition};

use crate::{AssignmentRepository, MutationReport};

use super::{ACCEPTED_PERMISSION_ROLE_IDS, PermissionCheckService};

struct FakePermissionRepository {
    held: Vec<Assignment>,
}

#[async_trait]
impl AssignmentRepository for FakePermissionRepository {
    async fn all_assignments(&self, _object_id: DirectoryObjectId) -> AppResult<Vec<Assignment>> {
        Ok(Vec::new())
    }

    async fn role_definitions(
        &self,
        _object_id: DirectoryObjectId,
    ) -> AppResult<Vec<RoleDefinition>> {
        Ok(Vec::new())
    }

    async fn assignments_held_by(&self, _app_id: DirectoryObjectId) -> AppResult<Vec<Assignment>> {
        Ok(self.held.clone())
    }

    async fn create_assignments(
        &self,
        _requests: Vec<AssignmentRequest>,
        _target_id: DirectoryObjectId,
    ) -> AppResult<MutationReport> {
        Ok(MutationReport::default())
    }

    async fn delete_assignments(
        &self,
        _assignments: Vec<Assignment>,
        _target_id: DirectoryObjectId,
    ) -> AppResult<MutationReport> {
        Ok(MutationReport::default())
    }
}

fn held_assignment(role_id: RoleId) -> Assignment {
    Assignment {
        id: None,
        principal_id: PrincipalId::from_uuid(Uuid::from_u128(1)),
        role_id,
        resource_id: DirectoryObjectId::from_uuid(Uuid::from_u128(2)),
    }
}

fn service_with_held(held: Vec<Assignment>) -> PermissionCheckService {
    PermissionCheckService::new(Arc::new(FakePermissionRepository { held }))
}

fn app_id() -> DirectoryObjectId {
    DirectoryObjectId::from_uuid(Uuid::from_u128(9))
}

#[tokio::test]
async fn any_accepted_role_grants_permission() {
    for accepted in ACCEPTED_PERMISSION_ROLE_IDS {
        let service = service_with_held(vec![
            held_assignment(RoleId::from_u128(0xdead_beef)),
            held_assignment(accepted),
        ]);

        let granted = service.principal_has_permissions(app_id()).await;

        assert!(matches!(granted, Ok(true)));
    }
}

#[tokio::test]
async fn unrelated_roles_do_not_grant_permission() {
    let service = service_with_held(vec![held_assignment(RoleId::from_u128(0xdead_beef))]);

    let granted = service.principal_has_permissions(app_id()).await;

    assert!(matches!(granted, Ok(false)));
}

#[tokio::test]
async fn a_principal_without_assignments_has_no_permission() {
    let service = service_with_held(Vec::new());

    let granted = service.principal_has_permissions(app_id()).await;

    assert!(matches!(granted, Ok(false)));
}
