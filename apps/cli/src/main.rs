//! azmirror command-line entrypoint.

#![forbid(unsafe_code)]

mod cli_config;

use std::sync::Arc;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use tracing::info;
use uuid::Uuid;

use azmirror_application::{
    AppRegistrationService, AssignmentBuilderService, PermissionCheckService,
    ReconciliationService, RoleMappingService,
};
use azmirror_core::{AppError, AppResult, DirectoryObjectId};
use azmirror_infrastructure::{
    GraphApiClient, GraphApplicationRegistry, GraphAssignmentRepository, GraphTokenProvider,
};

use crate::cli_config::CliConfig;

#[cfg(test)]
mod tests;

/// Reconciles principal assignments between two directory objects.
#[derive(Debug, Parser)]
#[command(name = "azmirror", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Reconcile principal assignments between directory objects.
    #[command(subcommand)]
    Principals(PrincipalsCommand),
    /// Manage application registrations.
    #[command(name = "appRegistration", subcommand)]
    AppRegistration(AppRegistrationCommand),
}

#[derive(Debug, Subcommand)]
enum PrincipalsCommand {
    /// Add principals assigned to the original object but missing from the target.
    Add(ReconcileArgs),
    /// Remove principals assigned to the target object but absent from the original.
    Remove(ReconcileArgs),
    /// Add missing principals, then remove extra ones.
    Sync(ReconcileArgs),
    /// Remove every principal from the target object.
    Reset(ResetArgs),
    /// Check whether a principal holds the directory permissions this tool needs.
    Check(CheckArgs),
}

#[derive(Debug, Args)]
struct ReconcileArgs {
    /// Directory object whose assignments are the source of truth.
    #[arg(long)]
    original_id: Uuid,
    /// Directory object being converged onto the original.
    #[arg(long)]
    target_id: Uuid,
    /// Log what would change without mutating the directory.
    #[arg(long)]
    dry_run: bool,
}

#[derive(Debug, Args)]
struct ResetArgs {
    /// Directory object whose assignments are cleared.
    #[arg(long)]
    target_id: Uuid,
    /// Log what would change without mutating the directory.
    #[arg(long)]
    dry_run: bool,
}

#[derive(Debug, Args)]
struct CheckArgs {
    /// Application (client) identifier of the principal to inspect.
    #[arg(long)]
    app_id: Uuid,
}

#[derive(Debug, Subcommand)]
enum AppRegistrationCommand {
    /// Create an application registration unless the name is already taken.
    Create(CreateRegistrationArgs),
}

#[derive(Debug, Args)]
struct CreateRegistrationArgs {
    /// Display name of the registration to create.
    #[arg(long)]
    display_name: String,
    /// Log what would change without mutating the directory.
    #[arg(long)]
    dry_run: bool,
}

struct Services {
    reconciliation: ReconciliationService,
    permission_check: PermissionCheckService,
    app_registration: AppRegistrationService,
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    cli_config::init_tracing();

    let cli = Cli::parse();
    let config = CliConfig::load()?;
    let services = build_services(&config)?;

    match cli.command {
        Command::Principals(command) => run_principals(command, &services).await,
        Command::AppRegistration(AppRegistrationCommand::Create(args)) => {
            services
                .app_registration
                .create_registration(args.display_name.as_str(), args.dry_run)
                .await
        }
    }
}

async fn run_principals(command: PrincipalsCommand, services: &Services) -> AppResult<()> {
    match command {
        PrincipalsCommand::Add(args) => {
            services
                .reconciliation
                .add_missing_principals(
                    DirectoryObjectId::from_uuid(args.original_id),
                    DirectoryObjectId::from_uuid(args.target_id),
                    args.dry_run,
                )
                .await
        }
        PrincipalsCommand::Remove(args) => {
            services
                .reconciliation
                .remove_extra_principals(
                    DirectoryObjectId::from_uuid(args.original_id),
                    DirectoryObjectId::from_uuid(args.target_id),
                    args.dry_run,
                )
                .await
        }
        PrincipalsCommand::Sync(args) => {
            services
                .reconciliation
                .sync_principals(
                    DirectoryObjectId::from_uuid(args.original_id),
                    DirectoryObjectId::from_uuid(args.target_id),
                    args.dry_run,
                )
                .await
        }
        PrincipalsCommand::Reset(args) => {
            services
                .reconciliation
                .reset_principals(DirectoryObjectId::from_uuid(args.target_id), args.dry_run)
                .await
        }
        PrincipalsCommand::Check(args) => {
            let granted = services
                .permission_check
                .principal_has_permissions(DirectoryObjectId::from_uuid(args.app_id))
                .await?;
            if granted {
                info!("the principal holds the required directory permissions");
            }
            Ok(())
        }
    }
}

fn build_services(config: &CliConfig) -> AppResult<Services> {
    let http_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .map_err(|error| AppError::Internal(format!("failed to build HTTP client: {error}")))?;

    let token_provider = Arc::new(GraphTokenProvider::new(
        config.graph_api_config(),
        http_client.clone(),
    ));
    let client = GraphApiClient::new(
        http_client,
        token_provider,
        config.graph_base_url.clone(),
    );
    let repository = Arc::new(GraphAssignmentRepository::new(client.clone()));
    let registry = Arc::new(GraphApplicationRegistry::new(client));

    let role_mapping_service = RoleMappingService::new(repository.clone());
    let builder = AssignmentBuilderService::new(role_mapping_service);

    Ok(Services {
        reconciliation: ReconciliationService::new(repository.clone(), builder),
        permission_check: PermissionCheckService::new(repository),
        app_registration: AppRegistrationService::new(registry),
    })
}
