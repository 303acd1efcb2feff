// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Best-version selection.
//
// Given the consumer's current version and a set of available versions, the
// winner is the greatest release that does not exceed the current version.
// When no release qualifies the `"default"` sentinel is returned, whether or
// not a default entry actually exists; callers treat a missing default entry
// as "no handler".
//
// Two entry points produce the same answer:
//   - `VersionTable::best_version` scans a handler table (inbound dispatch,
//     single-process requests).
//   - `select_candidate` reduces a caller-supplied candidate list (outbound
//     requests whose params differ per version).

use std::collections::BTreeMap;
use std::collections::btree_map;

use crate::version::SemverVersion;

/// Pick the greatest available release `<= current`, else the sentinel.
pub fn select_version<'a, I>(available: I, current: &SemverVersion) -> SemverVersion
where
    I: IntoIterator<Item = &'a SemverVersion>,
{
    available
        .into_iter()
        .filter(|v| !v.is_default() && *v <= current)
        .max()
        .copied()
        .unwrap_or(SemverVersion::Default)
}

/// Version-keyed handler table with a reserved `"default"` key.
///
/// Backed by an ordered map so "closest version at or below current" is a
/// single range lookup.
#[derive(Debug, Clone)]
pub struct VersionTable<H> {
    entries: BTreeMap<SemverVersion, H>,
}

impl<H> Default for VersionTable<H> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<H> VersionTable<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, version: SemverVersion, handler: H) -> Self {
        self.entries.insert(version, handler);
        self
    }

    /// Insert a handler, returning the one it replaced.
    pub fn insert(&mut self, version: SemverVersion, handler: H) -> Option<H> {
        self.entries.insert(version, handler)
    }

    pub fn get(&self, version: &SemverVersion) -> Option<&H> {
        self.entries.get(version)
    }

    /// Whether a fallback entry is registered.
    pub fn has_default(&self) -> bool {
        self.entries.contains_key(&SemverVersion::Default)
    }

    pub fn versions(&self) -> impl Iterator<Item = &SemverVersion> {
        self.entries.keys()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Version to dispatch to for `current` (may be an absent sentinel).
    pub fn best_version(&self, current: &SemverVersion) -> SemverVersion {
        // `Default` sorts first, so the last key in range is the closest
        // release, or the default entry when only that qualifies.
        self.entries
            .range(..=*current)
            .next_back()
            .map(|(version, _)| *version)
            .unwrap_or(SemverVersion::Default)
    }

    /// Resolve `current` to an actual entry. `None` means no handler.
    pub fn resolve(&self, current: &SemverVersion) -> Option<(SemverVersion, &H)> {
        let version = self.best_version(current);
        self.entries.get(&version).map(|handler| (version, handler))
    }
}

impl<H> FromIterator<(SemverVersion, H)> for VersionTable<H> {
    fn from_iter<T: IntoIterator<Item = (SemverVersion, H)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<H> IntoIterator for VersionTable<H> {
    type Item = (SemverVersion, H);
    type IntoIter = btree_map::IntoIter<SemverVersion, H>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// One `{version, params}` pair offered by the caller of an outbound request.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate<P> {
    pub version: SemverVersion,
    pub params: P,
}

impl<P> Candidate<P> {
    pub fn new(version: SemverVersion, params: P) -> Self {
        Self { version, params }
    }

    /// Candidate for the `"default"` slot.
    pub fn fallback(params: P) -> Self {
        Self::new(SemverVersion::Default, params)
    }
}

/// Reduce caller-offered candidates to the closest version `<= current`.
///
/// A default candidate is chosen only when no release qualifies. Returns
/// `None` when nothing qualifies, not even a default. On duplicate versions
/// the earlier candidate wins.
pub fn select_candidate<'a, P>(
    candidates: &'a [Candidate<P>],
    current: &SemverVersion,
) -> Option<&'a Candidate<P>> {
    candidates.iter().fold(None, |best, candidate| {
        if candidate.version > *current {
            return best;
        }
        match best {
            Some(kept) if kept.version >= candidate.version => Some(kept),
            _ => Some(candidate),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn v(s: &str) -> SemverVersion {
        s.parse().expect("valid version")
    }

    fn table(versions: &[&str]) -> VersionTable<&'static str> {
        versions.iter().map(|s| (v(s), "handler")).collect()
    }

    #[test]
    fn picks_closest_lower_release() {
        let t = table(&["1.0.0", "1.6.1", "2.0.1", "default"]);
        assert_eq!(t.best_version(&v("2.0.3")), v("2.0.1"));
        assert_eq!(t.best_version(&v("1.2.1")), v("1.0.0"));
        assert_eq!(t.best_version(&v("0.6.1")), SemverVersion::Default);
    }

    #[test]
    fn exact_match_wins() {
        let t = table(&["1.0.0", "1.6.1"]);
        assert_eq!(t.best_version(&v("1.6.1")), v("1.6.1"));
    }

    #[test]
    fn missing_default_resolves_to_nothing() {
        let t = table(&["1.0.0", "2.0.0"]);
        assert_eq!(t.best_version(&v("0.1.0")), SemverVersion::Default);
        assert!(t.resolve(&v("0.1.0")).is_none());
        assert!(!t.has_default());
    }

    #[test]
    fn default_consumer_only_gets_default() {
        let t = table(&["1.0.0", "default"]);
        assert_eq!(t.best_version(&SemverVersion::Default), SemverVersion::Default);
        assert!(t.resolve(&SemverVersion::Default).is_some());
    }

    #[test]
    fn candidate_reduction_matches_table_scan() {
        let candidates = vec![
            Candidate::fallback("d"),
            Candidate::new(v("1.0.0"), "a"),
            Candidate::new(v("1.6.3"), "b"),
            Candidate::new(v("2.1.1"), "c"),
        ];
        let chosen = select_candidate(&candidates, &v("1.8.0")).expect("candidate");
        assert_eq!(chosen.version, v("1.6.3"));
        assert_eq!(chosen.params, "b");

        let chosen = select_candidate(&candidates, &v("0.9.0")).expect("fallback");
        assert!(chosen.version.is_default());
    }

    #[test]
    fn candidate_reduction_without_default_can_fail() {
        let candidates = vec![Candidate::new(v("2.0.0"), ())];
        assert!(select_candidate(&candidates, &v("1.0.0")).is_none());
        assert!(select_candidate::<()>(&[], &v("1.0.0")).is_none());
    }

    #[test]
    fn duplicate_candidate_keeps_first() {
        let candidates = vec![Candidate::new(v("1.0.0"), 1), Candidate::new(v("1.0.0"), 2)];
        assert_eq!(select_candidate(&candidates, &v("1.0.0")).map(|c| c.params), Some(1));
    }

    fn any_version() -> impl Strategy<Value = SemverVersion> {
        prop_oneof![
            1 => Just(SemverVersion::Default),
            6 => (0u64..4, 0u64..4, 0u64..4)
                .prop_map(|(major, minor, patch)| SemverVersion::new(major, minor, patch)),
        ]
    }

    proptest! {
        #[test]
        fn selection_is_closest_not_exceeding(
            available in proptest::collection::vec(any_version(), 0..12),
            current in any_version(),
        ) {
            let chosen = select_version(&available, &current);
            prop_assert!(chosen <= current);
            if !chosen.is_default() {
                prop_assert!(available.contains(&chosen));
            }
            for other in available.iter().filter(|o| !o.is_default() && **o <= current) {
                prop_assert!(*other <= chosen);
            }
        }

        #[test]
        fn both_policies_agree(
            available in proptest::collection::btree_set(any_version(), 0..12),
            current in any_version(),
        ) {
            let t: VersionTable<()> = available.iter().map(|v| (*v, ())).collect();
            let candidates: Vec<Candidate<()>> =
                available.iter().map(|v| Candidate::new(*v, ())).collect();

            let from_table = t.best_version(&current);
            prop_assert_eq!(from_table, select_version(&available, &current));
            match select_candidate(&candidates, &current) {
                Some(c) => {
                    prop_assert_eq!(c.version, from_table);
                }
                None => {
                    prop_assert!(from_table.is_default());
                    prop_assert!(!t.has_default());
                }
            }
        }

        #[test]
        fn exact_match_is_preferred(
            available in proptest::collection::vec(any_version(), 0..12),
            current in any_version(),
        ) {
            let mut available = available;
            available.push(current);
            prop_assert_eq!(select_version(&available, &current), current);
        }
    }
}
