//! Domain entities and invariants for assignment reconciliation.

#![forbid(unsafe_code)]

mod assignment;
mod comparison;

pub use assignment::{Assignment, AssignmentRequest, RoleDefinition, RoleTranslationTable};
pub use comparison::{AssignmentComparison, compare_assignments};
