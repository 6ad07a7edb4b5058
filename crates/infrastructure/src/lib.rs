//! Directory API adapters backing the azmirror application ports.

#![forbid(unsafe_code)]

mod graph_api_client;
mod graph_application_registry;
mod graph_assignment_repository;
mod graph_token_provider;

pub use graph_api_client::GraphApiClient;
pub use graph_application_registry::GraphApplicationRegistry;
pub use graph_assignment_repository::GraphAssignmentRepository;
pub use graph_token_provider::{GraphApiConfig, GraphTokenProvider};
