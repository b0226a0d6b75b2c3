use crate::directory::{Principal, PrincipalId};
use std::collections::HashMap;

/// A user discovered during expansion, together with the groups through
/// which it was reached.
#[derive(Debug, Clone)]
pub struct DiscoveredUser {
    pub principal: Principal,
    pub source_groups: Vec<String>,
}

/// Accumulates discovered users keyed by their stable identifier.
///
/// Repeat sightings merge provenance instead of duplicating the entry.
/// Request-scoped: one accumulator per `resolve` call, never shared.
#[derive(Debug, Default)]
pub(crate) struct DiscoveredUsers {
    by_id: HashMap<PrincipalId, DiscoveredUser>,
}

impl DiscoveredUsers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `principal` as discovered via `source_group`.
    ///
    /// Idempotent for a repeated (user, source-group) pair; a sighting from
    /// a new group appends to the existing entry's provenance.
    pub fn upsert(&mut self, principal: Principal, source_group: &str) {
        match self.by_id.get_mut(&principal.id) {
            Some(existing) => {
                if !existing.source_groups.iter().any(|g| g == source_group) {
                    existing.source_groups.push(source_group.to_string());
                }
            }
            None => {
                self.by_id.insert(
                    principal.id.clone(),
                    DiscoveredUser {
                        principal,
                        source_groups: vec![source_group.to_string()],
                    },
                );
            }
        }
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn into_vec(self) -> Vec<DiscoveredUser> {
        self.by_id.into_values().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::PrincipalKind;

    fn user(id: &str, name: &str) -> Principal {
        Principal {
            id: PrincipalId::new(id),
            display_name: Some(name.to_string()),
            email: None,
            login_name: None,
            kind: PrincipalKind::User,
        }
    }

    #[test]
    fn test_first_sighting_inserts() {
        let mut users = DiscoveredUsers::new();
        users.upsert(user("u-1", "Alice"), "Approvers");

        assert_eq!(users.len(), 1);
        let all = users.into_vec();
        assert_eq!(all[0].source_groups, vec!["Approvers"]);
    }

    #[test]
    fn test_repeat_sighting_merges_provenance() {
        let mut users = DiscoveredUsers::new();
        users.upsert(user("u-1", "Bob"), "Approvers");
        users.upsert(user("u-1", "Bob"), "SubApprovers");

        assert_eq!(users.len(), 1);
        let all = users.into_vec();
        assert_eq!(all[0].source_groups, vec!["Approvers", "SubApprovers"]);
    }

    #[test]
    fn test_repeat_sighting_from_same_source_is_idempotent() {
        let mut users = DiscoveredUsers::new();
        users.upsert(user("u-1", "Bob"), "Approvers");
        users.upsert(user("u-1", "Bob"), "Approvers");

        let all = users.into_vec();
        assert_eq!(all[0].source_groups, vec!["Approvers"]);
    }
}
