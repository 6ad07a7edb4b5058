use std::sync::Arc;

use azmirror_core::AppResult;
use tracing::{error, info};

use crate::ApplicationRegistry;

#[cfg(test)]
mod tests;

/// Provisions application registrations in the directory.
#[derive(Clone)]
pub struct AppRegistrationService {
    registry: Arc<dyn ApplicationRegistry>,
}

impl AppRegistrationService {
    /// Creates a new app registration service.
    #[must_use]
    pub fn new(registry: Arc<dyn ApplicationRegistry>) -> Self {
        Self { registry }
    }

    /// Creates a registration with the given display name unless one with
    /// that exact name already exists.
    ///
    /// Creation failures are logged and do not fail the operation; the
    /// existence check is the only hard precondition.
    pub async fn create_registration(&self, display_name: &str, dry_run: bool) -> AppResult<()> {
        if self.registry.registration_exists(display_name).await? {
            info!(display_name, "an application with this display name already exists");
            return Ok(());
        }

        if dry_run {
            info!(display_name, "[dry-run] would create an application registration");
            return Ok(());
        }

        match self.registry.create_registration(display_name).await {
            Ok(registration) => {
                info!(
                    id = %registration.id,
                    display_name = registration.display_name,
                    "application registration created"
                );
            }
            Err(creation_error) => {
                error!(display_name, "failed to create application registration: {creation_error}");
            }
        }

        Ok(())
    }
}
