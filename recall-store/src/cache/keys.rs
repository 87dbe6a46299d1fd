//! Deterministic cache-key derivation and invalidation prefixes.
//!
//! Keys follow the format `{kind}_{owner}[_{qualifier}]`. The owner id
//! renders as a fixed-width 36-character hyphenated UUID, so no owner id is
//! a proper prefix of another and invalidating one owner's family can never
//! bleed into a different owner's keys. Kind names are fixed in
//! [`EntityKind::as_str`] and none is a `_`-extension of another, which
//! keeps families of different kinds disjoint as well.

use chrono::NaiveDate;
use recall_core::{EntityKind, OwnerId};
use std::fmt;

/// An opaque, deterministic cache key.
///
/// Keys can only be built through the constructors here, so every producer
/// and every invalidator derives the same string for the same query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Key for an owner-wide query: `"{kind}_{owner}"`.
    pub fn owner(kind: EntityKind, owner: OwnerId) -> Self {
        Self(format!("{}_{}", kind.as_str(), owner))
    }

    /// Key for a date-restricted query: `"{kind}_{owner}_{YYYY-MM-DD}"`.
    pub fn owner_date(kind: EntityKind, owner: OwnerId, date: NaiveDate) -> Self {
        Self(format!("{}_{}_{}", kind.as_str(), owner, date.format("%Y-%m-%d")))
    }

    /// Key with a caller-supplied qualifier: `"{kind}_{owner}_{qualifier}"`.
    pub fn owner_qualified(kind: EntityKind, owner: OwnerId, qualifier: &str) -> Self {
        Self(format!("{}_{}_{}", kind.as_str(), owner, qualifier))
    }

    /// The underlying key string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Shortest common prefix of every key in the (kind, owner) family.
///
/// Mutation paths pass this to the cache - never a full key - so that all
/// date-qualified variants of a query die together.
pub fn invalidation_prefix(kind: EntityKind, owner: OwnerId) -> String {
    format!("{}_{}", kind.as_str(), owner)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use recall_core::new_entity_id;

    #[test]
    fn test_owner_key_format() {
        let owner = new_entity_id();
        let key = CacheKey::owner(EntityKind::MemoryShort, owner);
        assert_eq!(key.as_str(), format!("memory_short_{}", owner));
    }

    #[test]
    fn test_date_key_format() {
        let owner = new_entity_id();
        let date = NaiveDate::from_ymd_opt(2025, 6, 24).unwrap();
        let key = CacheKey::owner_date(EntityKind::Notes, owner, date);
        assert_eq!(key.as_str(), format!("notes_{}_2025-06-24", owner));
    }

    #[test]
    fn test_date_key_zero_pads() {
        let owner = new_entity_id();
        let date = NaiveDate::from_ymd_opt(2025, 1, 5).unwrap();
        let key = CacheKey::owner_date(EntityKind::Notes, owner, date);
        assert!(key.as_str().ends_with("_2025-01-05"));
    }

    #[test]
    fn test_prefix_covers_all_family_variants() {
        let owner = new_entity_id();
        let prefix = invalidation_prefix(EntityKind::Notes, owner);

        let bare = CacheKey::owner(EntityKind::Notes, owner);
        let dated = CacheKey::owner_date(
            EntityKind::Notes,
            owner,
            NaiveDate::from_ymd_opt(2025, 6, 24).unwrap(),
        );
        let qualified = CacheKey::owner_qualified(EntityKind::Notes, owner, "pinned");

        assert!(bare.as_str().starts_with(&prefix));
        assert!(dated.as_str().starts_with(&prefix));
        assert!(qualified.as_str().starts_with(&prefix));
    }

    #[test]
    fn test_prefix_does_not_alias_other_owners() {
        let u1 = new_entity_id();
        let u2 = new_entity_id();
        let prefix = invalidation_prefix(EntityKind::Notes, u1);
        let other = CacheKey::owner_date(
            EntityKind::Notes,
            u2,
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        );
        assert!(!other.as_str().starts_with(&prefix));
    }

    #[test]
    fn test_prefix_does_not_alias_other_kinds() {
        let owner = new_entity_id();
        let short_prefix = invalidation_prefix(EntityKind::MemoryShort, owner);
        let long_key = CacheKey::owner(EntityKind::MemoryLong, owner);
        assert!(!long_key.as_str().starts_with(&short_prefix));

        let notes_prefix = invalidation_prefix(EntityKind::Notes, owner);
        let projects_key = CacheKey::owner(EntityKind::Projects, owner);
        assert!(!projects_key.as_str().starts_with(&notes_prefix));
    }
}

#[cfg(test)]
mod prop_tests {
    use super::*;
    use proptest::prelude::*;
    use uuid::Uuid;

    fn uuid_strategy() -> impl Strategy<Value = Uuid> {
        any::<[u8; 16]>().prop_map(Uuid::from_bytes)
    }

    fn kind_strategy() -> impl Strategy<Value = EntityKind> {
        prop_oneof![
            Just(EntityKind::Notes),
            Just(EntityKind::MemoryShort),
            Just(EntityKind::MemoryLong),
            Just(EntityKind::Projects),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(1000))]

        /// Property: a family prefix matches a key exactly when kind and
        /// owner both match - never across owners, never across kinds.
        #[test]
        fn prop_prefix_membership_is_exact(
            kind_a in kind_strategy(),
            kind_b in kind_strategy(),
            owner_a in uuid_strategy(),
            owner_b in uuid_strategy(),
            day in 0u32..28,
        ) {
            let prefix = invalidation_prefix(kind_a, owner_a);
            let date = NaiveDate::from_ymd_opt(2025, 6, day + 1).expect("valid date");
            let key = CacheKey::owner_date(kind_b, owner_b, date);

            let same_family = kind_a == kind_b && owner_a == owner_b;
            prop_assert_eq!(
                key.as_str().starts_with(&prefix),
                same_family,
                "prefix {} vs key {}",
                prefix,
                key
            );
        }

        /// Property: key derivation is deterministic.
        #[test]
        fn prop_key_derivation_is_deterministic(
            kind in kind_strategy(),
            owner in uuid_strategy(),
        ) {
            let a = CacheKey::owner(kind, owner);
            let b = CacheKey::owner(kind, owner);
            prop_assert_eq!(a, b);
        }

        /// Property: the bare owner key is itself a member of the family.
        #[test]
        fn prop_owner_key_starts_with_own_prefix(
            kind in kind_strategy(),
            owner in uuid_strategy(),
        ) {
            let key = CacheKey::owner(kind, owner);
            let prefix = invalidation_prefix(kind, owner);
            prop_assert!(key.as_str().starts_with(&prefix));
        }
    }
}
