// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Authority strings and the set type that carries them.
//!
//! An authority is either `ROLE_<role name>` or a bare permission name.
//! The prefix rule lives here and nowhere else.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Prefix marking an authority derived from a role name.
pub const ROLE_PREFIX: &str = "ROLE_";

/// Returns the authority string for a role name, e.g. `Admin` -> `ROLE_Admin`.
pub fn role_authority(role_name: &str) -> String {
    format!("{ROLE_PREFIX}{role_name}")
}

/// Returns `true` if the authority was derived from a role name.
pub fn is_role_authority(authority: &str) -> bool {
    authority.starts_with(ROLE_PREFIX)
}

// =============================================================================
// AuthoritySet
// =============================================================================

/// An ordered set of authority strings.
///
/// Duplicates collapse; an authority reachable through two roles appears once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthoritySet {
    authorities: BTreeSet<String>,
}

impl AuthoritySet {
    /// Creates an empty authority set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an authority to the set.
    pub fn insert(&mut self, authority: impl Into<String>) {
        self.authorities.insert(authority.into());
    }

    /// Returns `true` if the set contains the given authority.
    pub fn contains(&self, authority: &str) -> bool {
        self.authorities.contains(authority)
    }

    /// Returns `true` if the set contains every one of the given authorities.
    pub fn contains_all<'a>(&self, authorities: impl IntoIterator<Item = &'a str>) -> bool {
        authorities.into_iter().all(|a| self.contains(a))
    }

    /// Merges another set into this one.
    pub fn merge(&mut self, other: &AuthoritySet) {
        self.authorities.extend(other.authorities.iter().cloned());
    }

    /// Returns the number of distinct authorities.
    pub fn len(&self) -> usize {
        self.authorities.len()
    }

    /// Returns `true` if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.authorities.is_empty()
    }

    /// Iterates the authorities in lexicographic order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.authorities.iter().map(|s| s.as_str())
    }

    /// Returns the role-derived authorities (`ROLE_*`) in order.
    pub fn roles(&self) -> Vec<String> {
        self.authorities
            .iter()
            .filter(|a| is_role_authority(a))
            .cloned()
            .collect()
    }
}

impl FromIterator<String> for AuthoritySet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            authorities: iter.into_iter().collect(),
        }
    }
}

impl<'a> FromIterator<&'a str> for AuthoritySet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        iter.into_iter().map(str::to_string).collect()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_authority_prefix() {
        assert_eq!(role_authority("Admin"), "ROLE_Admin");
        assert!(is_role_authority("ROLE_Admin"));
        assert!(!is_role_authority("VIEW_USERS"));
    }

    #[test]
    fn test_set_collapses_duplicates() {
        let mut set = AuthoritySet::new();
        set.insert("VIEW_USERS");
        set.insert("VIEW_USERS");
        set.insert(role_authority("Admin"));

        assert_eq!(set.len(), 2);
        assert!(set.contains("VIEW_USERS"));
        assert!(set.contains("ROLE_Admin"));
    }

    #[test]
    fn test_merge_and_roles() {
        let left: AuthoritySet = ["ROLE_Admin", "VIEW_USERS"].into_iter().collect();
        let mut right: AuthoritySet = ["ROLE_Doctor", "VIEW_USERS"].into_iter().collect();

        right.merge(&left);
        assert_eq!(right.len(), 3);
        assert_eq!(right.roles(), vec!["ROLE_Admin", "ROLE_Doctor"]);
    }

    #[test]
    fn test_contains_all() {
        let set: AuthoritySet = ["ROLE_Admin", "VIEW_USERS"].into_iter().collect();
        assert!(set.contains_all(["VIEW_USERS"]));
        assert!(set.contains_all(["ROLE_Admin", "VIEW_USERS"]));
        assert!(!set.contains_all(["ROLE_Admin", "VIEW_ROLES"]));
    }
}
