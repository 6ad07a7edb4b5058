use std::collections::HashMap;

use azmirror_core::{AssignmentId, DirectoryObjectId, PrincipalId, RoleId};

/// A role definition owned by a directory object.
///
/// Both fields are optional at the wire boundary; catalog entries without a
/// usable identifier are skipped during translation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleDefinition {
    /// Stable role identifier, when the directory provides one.
    pub id: Option<RoleId>,
    /// Display name, not guaranteed unique, matched case-insensitively.
    pub display_name: Option<String>,
}

impl RoleDefinition {
    /// Returns true when the display name matches `other` case-insensitively.
    #[must_use]
    pub fn display_name_matches(&self, other: &Self) -> bool {
        match (&self.display_name, &other.display_name) {
            (Some(left), Some(right)) => left.eq_ignore_ascii_case(right),
            _ => false,
        }
    }
}

/// A principal-to-role grant scoped to a resource object.
///
/// Comparison identity is `principal_id` alone; role and resource do not
/// participate in the diff key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    /// Assignment identifier, absent before the directory creates the grant.
    pub id: Option<AssignmentId>,
    /// The identity being granted access.
    pub principal_id: PrincipalId,
    /// Granted role; `RoleId::NIL` means "no specific role".
    pub role_id: RoleId,
    /// The object the assignment is scoped to.
    pub resource_id: DirectoryObjectId,
}

/// Mutation payload for creating one assignment on a target object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentRequest {
    /// The identity being granted access.
    pub principal_id: PrincipalId,
    /// The target object the grant is scoped to.
    pub resource_id: DirectoryObjectId,
    /// Role in the target object's vocabulary.
    pub role_id: RoleId,
}

/// Translation table from original-role identifiers to target-role identifiers.
///
/// Invariant: when non-empty, the table carries a `RoleId::NIL` entry pointing
/// at the chosen default target role. Built fresh per reconciliation
/// operation, never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleTranslationTable {
    entries: HashMap<RoleId, RoleId>,
}

impl RoleTranslationTable {
    /// Creates an empty table, signalling "no mapping possible".
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the nil sentinel with the default target role.
    pub fn seed_default(&mut self, default_target_role: RoleId) {
        self.entries.insert(RoleId::NIL, default_target_role);
    }

    /// Maps an original role identifier onto a target role identifier.
    pub fn insert(&mut self, original_role: RoleId, target_role: RoleId) {
        self.entries.insert(original_role, target_role);
    }

    /// Looks up the target role for an original role identifier.
    #[must_use]
    pub fn resolve(&self, original_role: RoleId) -> Option<RoleId> {
        self.entries.get(&original_role).copied()
    }

    /// Returns the default target role seeded under the nil sentinel.
    #[must_use]
    pub fn default_target_role(&self) -> Option<RoleId> {
        self.resolve(RoleId::NIL)
    }

    /// Returns true when no mapping could be built.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the number of entries, nil sentinel included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use azmirror_core::RoleId;
    use uuid::Uuid;

    use super::{RoleDefinition, RoleTranslationTable};

    #[test]
    fn seeded_table_resolves_nil_to_default() {
        let default_role = RoleId::from_uuid(Uuid::new_v4());
        let mut table = RoleTranslationTable::new();
        table.seed_default(default_role);

        assert_eq!(table.resolve(RoleId::NIL), Some(default_role));
        assert_eq!(table.default_target_role(), Some(default_role));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn empty_table_resolves_nothing() {
        let table = RoleTranslationTable::new();
        assert!(table.is_empty());
        assert_eq!(table.resolve(RoleId::NIL), None);
    }

    #[test]
    fn display_name_matching_is_case_insensitive() {
        let admin = RoleDefinition {
            id: Some(RoleId::from_uuid(Uuid::new_v4())),
            display_name: Some("Admin".to_owned()),
        };
        let shouting_admin = RoleDefinition {
            id: Some(RoleId::from_uuid(Uuid::new_v4())),
            display_name: Some("ADMIN".to_owned()),
        };
        let unnamed = RoleDefinition {
            id: Some(RoleId::from_uuid(Uuid::new_v4())),
            display_name: None,
        };

        assert!(admin.display_name_matches(&shouting_admin));
        assert!(!admin.display_name_matches(&unnamed));
        assert!(!unnamed.display_name_matches(&unnamed));
    }
}
