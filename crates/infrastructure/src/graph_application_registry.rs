use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use azmirror_application::{ApplicationRegistration, ApplicationRegistry};
use azmirror_core::{AppError, AppResult, DirectoryObjectId};

use crate::GraphApiClient;


#[derive(Debug, Deserialize)]
struct ApplicationResource {
    id: DirectoryObjectId,
    #[serde(rename = "displayName")]
    display_name: String,
}

#[derive(Debug, Serialize)]
struct ApplicationCreateBody<'a> {
    #[serde(rename = "displayName")]
    display_name: &'a str,
}

/// Application-registration surface over the directory API.
pub struct GraphApplicationRegistry {
    client: GraphApiClient,
}

impl GraphApplicationRegistry {
    /// Creates a new directory-backed application registry.
    #[must_use]
    pub fn new(client: GraphApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ApplicationRegistry for GraphApplicationRegistry {
    async fn registration_exists(&self, display_name: &str) -> AppResult<bool> {
        // The directory filter narrows by prefix; exact-name matching
        // happens here because filters cannot express case-exact equality.
        let escaped = display_name.replace('\'', "''");
        let filter = format!("startswith(displayName,'{escaped}')");
        let url = reqwest::Url::parse_with_params(
            &self.client.endpoint("applications"),
            [("$filter", filter.as_str())],
        )
        .map_err(|error| {
            AppError::Internal(format!("invalid applications listing URL: {error}"))
        })?;

        let candidates: Vec<ApplicationResource> = self.client.get_paged(url.as_str()).await?;
        Ok(candidates
            .iter()
            .any(|candidate| candidate.display_name == display_name))
    }

    async fn create_registration(
        &self,
        display_name: &str,
    ) -> AppResult<ApplicationRegistration> {
        let url = self.client.endpoint("applications");
        let body = ApplicationCreateBody { display_name };

        let created: ApplicationResource = self.client.post_json(&url, &body).await?;
        Ok(ApplicationRegistration {
            id: created.id,
            display_name: created.display_name,
        })
    }
}
