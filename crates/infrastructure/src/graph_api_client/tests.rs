use std::sync::Arc;

use serde::Deserialize;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use azmirror_core::AppError;

use crate::{GraphApiConfig, GraphTokenProvider};

use super::GraphApiClient;

#[derive(Debug, Deserialize, PartialEq, Eq)]
struct Item {
    name: String,
}

async fn mock_token_endpoint(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/tenant/oauth2/v2.0/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "token-123",
            "expires_in": 3600
        })))
        .mount(server)
        .await;
}

fn client_for(server: &MockServer) -> GraphApiClient {
    let config = GraphApiConfig {
        tenant_id: "tenant".to_owned(),
        client_id: "client".to_owned(),
        client_secret: "secret".to_owned(),
        graph_base_url: server.uri(),
        login_base_url: server.uri(),
    };
    let http_client = reqwest::Client::new();
    let token_provider = Arc::new(GraphTokenProvider::new(config, http_client.clone()));
    GraphApiClient::new(http_client, token_provider, server.uri())
}

#[tokio::test]
async fn paged_get_follows_next_links_in_order() {
    let server = MockServer::start().await;
    mock_token_endpoint(&server).await;
    Mock::given(method("GET"))
        .and(path("/v1.0/items"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "value": [{"name": "third"}]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1.0/items"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "value": [{"name": "first"}, {"name": "second"}],
            "@odata.nextLink": format!("{}/v1.0/items?page=2", server.uri())
        })))
        .mount(&server)
        .await;
    let client = client_for(&server);

    let items: Vec<Item> = client
        .get_paged(&client.endpoint("items"))
        .await
        .unwrap_or_default();

    let names: Vec<&str> = items.iter().map(|item| item.name.as_str()).collect();
    assert_eq!(names, vec!["first", "second", "third"]);
}

#[tokio::test]
async fn requests_carry_the_bearer_token() {
    let server = MockServer::start().await;
    mock_token_endpoint(&server).await;
    Mock::given(method("GET"))
        .and(path("/v1.0/items"))
        .and(header("authorization", "Bearer token-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": "only"
        })))
        .expect(1)
        .mount(&server)
        .await;
    let client = client_for(&server);

    let item: Result<Item, _> = client.get_json(&client.endpoint("items")).await;

    assert!(matches!(item, Ok(Item { .. })));
}

#[tokio::test]
async fn forbidden_status_extracts_the_directory_error_message() {
    let server = MockServer::start().await;
    mock_token_endpoint(&server).await;
    Mock::given(method("GET"))
        .and(path("/v1.0/items"))
        .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
            "error": {
                "code": "Authorization_RequestDenied",
                "message": "Insufficient privileges to complete the operation."
            }
        })))
        .mount(&server)
        .await;
    let client = client_for(&server);

    let result: Result<Item, _> = client.get_json(&client.endpoint("items")).await;

    match result {
        Err(AppError::Forbidden(message)) => {
            assert_eq!(message, "Insufficient privileges to complete the operation.");
        }
        other => panic!("expected a forbidden error, got {other:?}"),
    }
}

#[tokio::test]
async fn missing_resources_map_to_not_found() {
    let server = MockServer::start().await;
    mock_token_endpoint(&server).await;
    Mock::given(method("GET"))
        .and(path("/v1.0/items"))
        .respond_with(ResponseTemplate::new(404).set_body_string("gone"))
        .mount(&server)
        .await;
    let client = client_for(&server);

    let result: Result<Item, _> = client.get_json(&client.endpoint("items")).await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn delete_treats_no_content_as_success() {
    let server = MockServer::start().await;
    mock_token_endpoint(&server).await;
    Mock::given(method("DELETE"))
        .and(path("/v1.0/items/1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    let client = client_for(&server);

    let result = client.delete(&client.endpoint("items/1")).await;

    assert!(result.is_ok());
}
