use std::sync::Arc;

use azmirror_core::{AppError, AppResult, DirectoryObjectId};
use azmirror_domain::compare_assignments;
use tracing::{error, info, warn};

use crate::{AssignmentBuilderService, AssignmentRepository, MutationReport};


/// Orchestrates the reconciliation operations: add, remove-extra, reset and
/// two-way sync, each honoring dry-run mode.
#[derive(Clone)]
pub struct ReconciliationService {
    repository: Arc<dyn AssignmentRepository>,
    builder: AssignmentBuilderService,
}

impl ReconciliationService {
    /// Creates a new reconciliation service.
    #[must_use]
    pub fn new(repository: Arc<dyn AssignmentRepository>, builder: AssignmentBuilderService) -> Self {
        Self {
            repository,
            builder,
        }
    }

    /// Adds the principals present on the original object but missing from
    /// the target.
    pub async fn add_missing_principals(
        &self,
        original_id: DirectoryObjectId,
        target_id: DirectoryObjectId,
        dry_run: bool,
    ) -> AppResult<()> {
        let (original_assignments, target_assignments) = tokio::try_join!(
            self.repository.all_assignments(original_id),
            self.repository.all_assignments(target_id),
        )?;

        let comparison = compare_assignments(&original_assignments, &target_assignments);
        if comparison.is_converged() {
            info!("there is no difference in assignments between the directory objects");
        }
        let missing = comparison.missing_in_target;

        info!(
            "{}azmirror will add {} principals",
            dry_run_prefix(dry_run),
            missing.len()
        );

        if dry_run {
            return Ok(());
        }
        if missing.is_empty() {
            return Ok(());
        }

        let requests = self
            .builder
            .build_requests(&missing, original_id, target_id)
            .await?;
        let report = self
            .repository
            .create_assignments(requests, target_id)
            .await?;
        log_contained_failures("add", &report);

        Ok(())
    }

    /// Removes the principals present on the target object but absent from
    /// the original.
    pub async fn remove_extra_principals(
        &self,
        original_id: DirectoryObjectId,
        target_id: DirectoryObjectId,
        dry_run: bool,
    ) -> AppResult<()> {
        let (original_assignments, target_assignments) = tokio::try_join!(
            self.repository.all_assignments(original_id),
            self.repository.all_assignments(target_id),
        )?;

        let comparison = compare_assignments(&original_assignments, &target_assignments);
        if comparison.is_converged() {
            info!("there is no difference in assignments between the directory objects");
        }
        let extra = comparison.extra_in_target;

        info!(
            "{}azmirror will remove {} principals",
            dry_run_prefix(dry_run),
            extra.len()
        );

        if dry_run {
            return Ok(());
        }
        if extra.is_empty() {
            return Ok(());
        }

        let report = self.repository.delete_assignments(extra, target_id).await?;
        log_contained_failures("remove", &report);

        Ok(())
    }

    /// Removes every principal from the target object.
    pub async fn reset_principals(
        &self,
        target_id: DirectoryObjectId,
        dry_run: bool,
    ) -> AppResult<()> {
        let target_assignments = self.repository.all_assignments(target_id).await?;

        if target_assignments.is_empty() {
            info!(target = %target_id, "there are no principals to remove from the target");
            return Ok(());
        }

        info!(
            "{}azmirror will remove {} principals from target {}",
            dry_run_prefix(dry_run),
            target_assignments.len(),
            target_id
        );

        if dry_run {
            return Ok(());
        }

        let report = self
            .repository
            .delete_assignments(target_assignments, target_id)
            .await?;
        log_contained_failures("reset", &report);

        Ok(())
    }

    /// Converges the target onto the original: add missing principals, then
    /// remove extra ones.
    ///
    /// A permission refusal from the directory soft-stops the composite
    /// operation; the removal pass never runs after a forbidden addition.
    pub async fn sync_principals(
        &self,
        original_id: DirectoryObjectId,
        target_id: DirectoryObjectId,
        dry_run: bool,
    ) -> AppResult<()> {
        if let Err(error) = self
            .add_missing_principals(original_id, target_id, dry_run)
            .await
        {
            return soften_permission_refusal(error);
        }

        match self
            .remove_extra_principals(original_id, target_id, dry_run)
            .await
        {
            Err(error) => soften_permission_refusal(error),
            Ok(()) => Ok(()),
        }
    }
}

fn dry_run_prefix(dry_run: bool) -> &'static str {
    if dry_run { "[dry-run] " } else { "" }
}

fn soften_permission_refusal(error: AppError) -> AppResult<()> {
    match error {
        AppError::Forbidden(message) => {
            error!("the caller does not have the required directory permissions: {message}");
            Ok(())
        }
        other => Err(other),
    }
}

fn log_contained_failures(operation: &str, report: &MutationReport) {
    if !report.is_clean() {
        warn!(
            operation,
            attempted = report.attempted,
            failed = report.failures.len(),
            "some assignment mutations failed"
        );
    }
}
