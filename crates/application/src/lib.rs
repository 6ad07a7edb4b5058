//! Application services and ports for assignment reconciliation.

#![forbid(unsafe_code)]

mod app_registration_service;
mod assignment_builder_service;
mod assignment_ports;
mod permission_check_service;
mod reconciliation_service;
mod role_mapping_service;

pub use app_registration_service::AppRegistrationService;
pub use assignment_builder_service::AssignmentBuilderService;
pub use assignment_ports::{
    ApplicationRegistration, ApplicationRegistry, AssignmentRepository, MutationFailure,
    MutationReport,
};
pub use permission_check_service::PermissionCheckService;
pub use reconciliation_service::ReconciliationService;
pub use role_mapping_service::RoleMappingService;
