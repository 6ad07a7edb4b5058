use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use uuid::Uuid;

use azmirror_core::{AppError, AppResult, DirectoryObjectId};

use crate::{ApplicationRegistration, ApplicationRegistry};

use super::AppRegistrationService;

#[derive(Default)]
struct FakeApplicationRegistry {
    existing_names: Vec<String>,
    created: Mutex<Vec<String>>,
    fail_creation: bool,
}

#[async_trait]
impl ApplicationRegistry for FakeApplicationRegistry {
    async fn registration_exists(&self, display_name: &str) -> AppResult<bool> {
        Ok(self
            .existing_names
            .iter()
            .any(|existing| existing == display_name))
    }

    async fn create_registration(
        &self,
        display_name: &str,
    ) -> AppResult<ApplicationRegistration> {
        if self.fail_creation {
            return Err(AppError::Internal("registration creation failed".to_owned()));
        }
        self.created.lock().await.push(display_name.to_owned());
        Ok(ApplicationRegistration {
            id: DirectoryObjectId::from_uuid(Uuid::from_u128(1)),
            display_name: display_name.to_owned(),
        })
    }
}

#[tokio::test]
async fn creates_a_registration_when_the_name_is_free() {
    let registry = Arc::new(FakeApplicationRegistry::default());
    let service = AppRegistrationService::new(registry.clone());

    let result = service.create_registration("sync-tool", false).await;

    assert!(result.is_ok());
    assert_eq!(*registry.created.lock().await, vec!["sync-tool".to_owned()]);
}

#[tokio::test]
async fn skips_creation_when_the_name_is_taken() {
    let registry = Arc::new(FakeApplicationRegistry {
        existing_names: vec!["sync-tool".to_owned()],
        ..FakeApplicationRegistry::default()
    });
    let service = AppRegistrationService::new(registry.clone());

    let result = service.create_registration("sync-tool", false).await;

    assert!(result.is_ok());
    assert!(registry.created.lock().await.is_empty());
}

#[tokio::test]
async fn dry_run_never_creates() {
    let registry = Arc::new(FakeApplicationRegistry::default());
    let service = AppRegistrationService::new(registry.clone());

    let result = service.create_registration("sync-tool", true).await;

    assert!(result.is_ok());
    assert!(registry.created.lock().await.is_empty());
}

#[tokio::test]
async fn creation_failures_are_contained() {
    let registry = Arc::new(FakeApplicationRegistry {
        fail_creation: true,
        ..FakeApplicationRegistry::default()
    });
    let service = AppRegistrationService::new(registry);

    let result = service.create_registration("sync-tool", false).await;

    assert!(result.is_ok());
}
