use std::sync::Arc;

use reqwest::StatusCode;
use serde::Deserialize;
use serde::Serialize;
use serde::de::DeserializeOwned;

use azmirror_core::{AppError, AppResult};

use crate::GraphTokenProvider;

#[cfg(test)]
mod tests;

const GRAPH_API_VERSION: &str = "v1.0";

/// One page of a directory listing; the link points at the next page.
#[derive(Debug, Deserialize)]
struct ODataPage<T> {
    value: Vec<T>,
    #[serde(rename = "@odata.nextLink")]
    next_link: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ODataErrorEnvelope {
    error: ODataErrorBody,
}

#[derive(Debug, Deserialize)]
struct ODataErrorBody {
    message: String,
}

/// Authenticated JSON client for the directory API.
///
/// Injects a bearer token on every request and translates directory error
/// statuses into application error categories.
#[derive(Clone)]
pub struct GraphApiClient {
    http_client: reqwest::Client,
    token_provider: Arc<GraphTokenProvider>,
    graph_base_url: String,
}

impl GraphApiClient {
    /// Creates a new directory API client.
    #[must_use]
    pub fn new(
        http_client: reqwest::Client,
        token_provider: Arc<GraphTokenProvider>,
        graph_base_url: String,
    ) -> Self {
        Self {
            http_client,
            token_provider,
            graph_base_url: graph_base_url.trim_end_matches('/').to_owned(),
        }
    }

    /// Builds a versioned URL for a relative directory API path.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{GRAPH_API_VERSION}/{path}", self.graph_base_url)
    }

    /// Performs a GET request and decodes the JSON response.
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> AppResult<T> {
        let token = self.token_provider.access_token().await?;
        let response = self
            .http_client
            .get(url)
            .bearer_auth(&token)
            .send()
            .await
            .map_err(transport_error)?;
        read_json_response(response).await
    }

    /// Performs a GET request and drains every page the directory links to,
    /// preserving the order the directory returns.
    pub async fn get_paged<T: DeserializeOwned>(&self, url: &str) -> AppResult<Vec<T>> {
        let mut items = Vec::new();
        let mut next_url = Some(url.to_owned());

        while let Some(page_url) = next_url {
            let page: ODataPage<T> = self.get_json(&page_url).await?;
            items.extend(page.value);
            next_url = page.next_link;
        }

        Ok(items)
    }

    /// Performs a POST request with a JSON body and decodes the response.
    pub async fn post_json<T: DeserializeOwned, B: Serialize>(
        &self,
        url: &str,
        body: &B,
    ) -> AppResult<T> {
        let token = self.token_provider.access_token().await?;
        let response = self
            .http_client
            .post(url)
            .bearer_auth(&token)
            .json(body)
            .send()
            .await
            .map_err(transport_error)?;
        read_json_response(response).await
    }

    /// Performs a DELETE request, expecting an empty success response.
    pub async fn delete(&self, url: &str) -> AppResult<()> {
        let token = self.token_provider.access_token().await?;
        let response = self
            .http_client
            .delete(url)
            .bearer_auth(&token)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(error_from_response(status, response).await);
        }
        Ok(())
    }
}

fn transport_error(error: reqwest::Error) -> AppError {
    AppError::Internal(format!("directory request failed: {error}"))
}

async fn read_json_response<T: DeserializeOwned>(response: reqwest::Response) -> AppResult<T> {
    let status = response.status();
    if !status.is_success() {
        return Err(error_from_response(status, response).await);
    }
    response.json().await.map_err(|error| {
        AppError::Internal(format!("failed to decode directory response: {error}"))
    })
}

async fn error_from_response(status: StatusCode, response: reqwest::Response) -> AppError {
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ODataErrorEnvelope>(&body)
        .map(|envelope| envelope.error.message)
        .unwrap_or(body);

    match status {
        StatusCode::UNAUTHORIZED => AppError::Unauthorized(message),
        StatusCode::FORBIDDEN => AppError::Forbidden(message),
        StatusCode::NOT_FOUND => AppError::NotFound(message),
        _ => AppError::Internal(format!(
            "directory request failed with status {status}: {message}"
        )),
    }
}
