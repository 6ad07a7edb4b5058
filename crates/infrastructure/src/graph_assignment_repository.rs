use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{error, info};

use azmirror_application::{AssignmentRepository, MutationFailure, MutationReport};
use azmirror_core::{AppError, AppResult, AssignmentId, DirectoryObjectId, PrincipalId, RoleId};
use azmirror_domain::{Assignment, AssignmentRequest, RoleDefinition};

use crate::GraphApiClient;


/// Upper bound on concurrent assignment mutations against the directory.
const MUTATION_CONCURRENCY_LIMIT: usize = 10;

#[derive(Debug, Deserialize)]
struct AssignmentResource {
    id: Option<AssignmentId>,
    #[serde(rename = "principalId")]
    principal_id: PrincipalId,
    #[serde(rename = "appRoleId", default)]
    app_role_id: Option<RoleId>,
    #[serde(rename = "resourceId")]
    resource_id: DirectoryObjectId,
}

impl From<AssignmentResource> for Assignment {
    fn from(resource: AssignmentResource) -> Self {
        Self {
            id: resource.id,
            principal_id: resource.principal_id,
            role_id: resource.app_role_id.unwrap_or(RoleId::NIL),
            resource_id: resource.resource_id,
        }
    }
}

#[derive(Debug, Serialize)]
struct AssignmentCreateBody {
    #[serde(rename = "principalId")]
    principal_id: PrincipalId,
    #[serde(rename = "appRoleId")]
    app_role_id: RoleId,
    #[serde(rename = "resourceId")]
    resource_id: DirectoryObjectId,
}

#[derive(Debug, Deserialize)]
struct ServicePrincipalResource {
    id: DirectoryObjectId,
    #[serde(rename = "appRoles", default)]
    app_roles: Vec<AppRoleResource>,
}

#[derive(Debug, Deserialize)]
struct AppRoleResource {
    id: Option<RoleId>,
    #[serde(rename = "displayName")]
    display_name: Option<String>,
}

/// Assignment repository over the directory API.
///
/// Listing calls drain pagination; mutation calls fan out with a bounded
/// degree of parallelism and contain per-item failures in the report.
pub struct GraphAssignmentRepository {
    client: GraphApiClient,
}

impl GraphAssignmentRepository {
    /// Creates a new directory-backed assignment repository.
    #[must_use]
    pub fn new(client: GraphApiClient) -> Self {
        Self { client }
    }

    fn assigned_to_endpoint(&self, object_id: DirectoryObjectId) -> String {
        self.client
            .endpoint(&format!("servicePrincipals/{object_id}/appRoleAssignedTo"))
    }
}

#[async_trait]
impl AssignmentRepository for GraphAssignmentRepository {
    async fn all_assignments(&self, object_id: DirectoryObjectId) -> AppResult<Vec<Assignment>> {
        let resources: Vec<AssignmentResource> = self
            .client
            .get_paged(&self.assigned_to_endpoint(object_id))
            .await?;
        Ok(resources.into_iter().map(Assignment::from).collect())
    }

    async fn role_definitions(
        &self,
        object_id: DirectoryObjectId,
    ) -> AppResult<Vec<RoleDefinition>> {
        let url = self.client.endpoint(&format!("servicePrincipals/{object_id}"));
        let principal: ServicePrincipalResource = self.client.get_json(&url).await?;
        Ok(principal
            .app_roles
            .into_iter()
            .map(|role| RoleDefinition {
                id: role.id,
                display_name: role.display_name,
            })
            .collect())
    }

    async fn assignments_held_by(&self, app_id: DirectoryObjectId) -> AppResult<Vec<Assignment>> {
        let lookup = self
            .client
            .endpoint(&format!("servicePrincipals(appId='{app_id}')"));
        let principal: ServicePrincipalResource = self.client.get_json(&lookup).await?;

        let url = self.client.endpoint(&format!(
            "servicePrincipals/{}/appRoleAssignments",
            principal.id
        ));
        let resources: Vec<AssignmentResource> = self.client.get_paged(&url).await?;
        Ok(resources.into_iter().map(Assignment::from).collect())
    }

    async fn create_assignments(
        &self,
        requests: Vec<AssignmentRequest>,
        target_id: DirectoryObjectId,
    ) -> AppResult<MutationReport> {
        let attempted = requests.len();
        let endpoint = self.assigned_to_endpoint(target_id);
        let semaphore = Arc::new(Semaphore::new(MUTATION_CONCURRENCY_LIMIT));
        let mut tasks = JoinSet::new();

        for request in requests {
            let client = self.client.clone();
            let endpoint = endpoint.clone();
            let semaphore = Arc::clone(&semaphore);
            tasks.spawn(async move {
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return Some(MutationFailure {
                        principal_id: request.principal_id,
                        reason: "concurrency limiter closed".to_owned(),
                    });
                };

                let body = AssignmentCreateBody {
                    principal_id: request.principal_id,
                    app_role_id: request.role_id,
                    resource_id: request.resource_id,
                };
                match client.post_json::<AssignmentResource, _>(&endpoint, &body).await {
                    Ok(_) => {
                        info!(principal = %request.principal_id, "assignment created");
                        None
                    }
                    Err(creation_error) => {
                        error!(
                            principal = %request.principal_id,
                            "failed to create assignment: {creation_error}"
                        );
                        Some(MutationFailure {
                            principal_id: request.principal_id,
                            reason: creation_error.to_string(),
                        })
                    }
                }
            });
        }

        let failures = drain_mutation_tasks(tasks).await?;
        Ok(MutationReport {
            attempted,
            failures,
        })
    }

    async fn delete_assignments(
        &self,
        assignments: Vec<Assignment>,
        target_id: DirectoryObjectId,
    ) -> AppResult<MutationReport> {
        let attempted = assignments.len();
        let endpoint = self.assigned_to_endpoint(target_id);
        let semaphore = Arc::new(Semaphore::new(MUTATION_CONCURRENCY_LIMIT));
        let mut tasks = JoinSet::new();
        let mut failures = Vec::new();

        for assignment in assignments {
            let Some(assignment_id) = assignment.id else {
                failures.push(MutationFailure {
                    principal_id: assignment.principal_id,
                    reason: "assignment has no identifier".to_owned(),
                });
                continue;
            };

            let client = self.client.clone();
            let url = format!("{endpoint}/{assignment_id}");
            let semaphore = Arc::clone(&semaphore);
            tasks.spawn(async move {
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return Some(MutationFailure {
                        principal_id: assignment.principal_id,
                        reason: "concurrency limiter closed".to_owned(),
                    });
                };

                match client.delete(&url).await {
                    Ok(()) => {
                        info!(principal = %assignment.principal_id, "assignment removed");
                        None
                    }
                    Err(deletion_error) => {
                        error!(
                            principal = %assignment.principal_id,
                            "failed to remove assignment: {deletion_error}"
                        );
                        Some(MutationFailure {
                            principal_id: assignment.principal_id,
                            reason: deletion_error.to_string(),
                        })
                    }
                }
            });
        }

        failures.extend(drain_mutation_tasks(tasks).await?);
        Ok(MutationReport {
            attempted,
            failures,
        })
    }
}

async fn drain_mutation_tasks(
    mut tasks: JoinSet<Option<MutationFailure>>,
) -> AppResult<Vec<MutationFailure>> {
    let mut failures = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(Some(failure)) => failures.push(failure),
            Ok(None) => {}
            Err(join_error) => {
                return Err(AppError::Internal(format!(
                    "assignment mutation task failed: {join_error}"
                )));
            }
        }
    }
    Ok(failures)
}
