use async_trait::async_trait;

use azmirror_core::{AppResult, DirectoryObjectId, PrincipalId};
use azmirror_domain::{Assignment, AssignmentRequest, RoleDefinition};

/// One mutation that failed inside a batch; siblings are unaffected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationFailure {
    /// Principal the failed mutation was about.
    pub principal_id: PrincipalId,
    /// Human-readable failure cause.
    pub reason: String,
}

/// Outcome of a best-effort batch mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MutationReport {
    /// Number of mutations issued, successful or not.
    pub attempted: usize,
    /// Contained per-item failures, in completion order.
    pub failures: Vec<MutationFailure>,
}

impl MutationReport {
    /// Returns the number of mutations that completed successfully.
    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.attempted.saturating_sub(self.failures.len())
    }

    /// Returns true when every mutation in the batch succeeded.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// An application registration in the directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationRegistration {
    /// Directory object identifier of the registration.
    pub id: DirectoryObjectId,
    /// Display name the registration was created with.
    pub display_name: String,
}

/// Repository port over the remote directory's assignment surface.
///
/// Implemented by one concrete adapter over the directory API plus fakes in
/// service tests. Listing calls hide pagination from callers; mutation calls
/// fail per item, never atomically.
#[async_trait]
pub trait AssignmentRepository: Send + Sync {
    /// Lists every assignment scoped to a directory object.
    async fn all_assignments(&self, object_id: DirectoryObjectId) -> AppResult<Vec<Assignment>>;

    /// Lists the role catalog of a directory object, preserving the order
    /// the directory returns.
    async fn role_definitions(&self, object_id: DirectoryObjectId)
    -> AppResult<Vec<RoleDefinition>>;

    /// Lists the assignments a principal holds, resolved by its application
    /// identifier.
    async fn assignments_held_by(&self, app_id: DirectoryObjectId) -> AppResult<Vec<Assignment>>;

    /// Creates the given assignments on the target object, isolating each
    /// item's failure.
    async fn create_assignments(
        &self,
        requests: Vec<AssignmentRequest>,
        target_id: DirectoryObjectId,
    ) -> AppResult<MutationReport>;

    /// Deletes the given assignments from the target object by their own
    /// identifiers, isolating each item's failure.
    async fn delete_assignments(
        &self,
        assignments: Vec<Assignment>,
        target_id: DirectoryObjectId,
    ) -> AppResult<MutationReport>;
}

/// Port over the directory's application-registration surface.
#[async_trait]
pub trait ApplicationRegistry: Send + Sync {
    /// Returns true when a registration with this exact display name exists.
    async fn registration_exists(&self, display_name: &str) -> AppResult<bool>;

    /// Creates a registration with the given display name.
    async fn create_registration(&self, display_name: &str)
    -> AppResult<ApplicationRegistration>;
}
