//! Typo-tolerant command suggestions.
//!
//! When a command lookup misses, the router can ask a [`FuzzyIndex`] which
//! registered names the user probably meant. Two passes are combined:
//!
//! 1. **Subsequence** matching (skim scoring): every character of the token
//!    appears in order in the name, e.g. `exmple` → `example`.
//! 2. **Edit distance**: names within a small Levenshtein distance that the
//!    first pass missed, e.g. the transposition `exmaple` → `example`.
//!
//! The index is a snapshot of the names registered when it was built.

use std::fmt;

use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

/// Default maximum edit distance for the second pass.
pub const DEFAULT_MAX_DISTANCE: usize = 2;

/// A static set of command names to suggest from.
pub struct FuzzyIndex {
    names: Vec<String>,
    matcher: SkimMatcherV2,
    max_distance: usize,
}

impl FuzzyIndex {
    /// Builds an index over `names`.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut names: Vec<String> = names.into_iter().map(Into::into).collect();
        names.sort();
        names.dedup();

        Self {
            names,
            matcher: SkimMatcherV2::default(),
            max_distance: DEFAULT_MAX_DISTANCE,
        }
    }

    /// Sets the maximum edit distance; `0` turns the second pass off.
    pub fn max_distance(mut self, distance: usize) -> Self {
        self.max_distance = distance;
        self
    }

    /// Returns the indexed names in sorted order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Returns the candidates for `token`, best first.
    ///
    /// Subsequence matches come first, highest score first; edit-distance
    /// matches follow, closest first. Ties break alphabetically.
    pub fn find(&self, token: &str) -> Vec<String> {
        if token.is_empty() {
            return Vec::new();
        }

        let mut scored: Vec<(i64, &String)> = self
            .names
            .iter()
            .filter_map(|name| {
                self.matcher
                    .fuzzy_match(name, token)
                    .map(|score| (score, name))
            })
            .collect();
        scored.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(b.1)));

        let mut found: Vec<String> = scored.into_iter().map(|(_, name)| name.clone()).collect();

        if self.max_distance > 0 {
            let mut near: Vec<(usize, &String)> = self
                .names
                .iter()
                .filter(|name| !found.contains(name))
                .filter_map(|name| {
                    let distance = edit_distance(token, name);
                    (distance <= self.max_distance).then_some((distance, name))
                })
                .collect();
            near.sort();
            found.extend(near.into_iter().map(|(_, name)| name.clone()));
        }

        found
    }
}

impl fmt::Debug for FuzzyIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FuzzyIndex")
            .field("names", &self.names)
            .field("max_distance", &self.max_distance)
            .finish_non_exhaustive()
    }
}

/// Levenshtein distance over chars.
fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> FuzzyIndex {
        FuzzyIndex::new(["example", "ping", "help", "ban"])
    }

    #[test]
    fn test_subsequence_match() {
        assert_eq!(index().find("exmple"), vec!["example"]);
    }

    #[test]
    fn test_transposition_found_by_distance() {
        assert_eq!(index().find("exmaple"), vec!["example"]);
        assert_eq!(index().find("pnig"), vec!["ping"]);
    }

    #[test]
    fn test_no_candidates() {
        assert!(index().find("zzzzzzzz").is_empty());
        assert!(index().find("").is_empty());
    }

    #[test]
    fn test_distance_pass_can_be_disabled() {
        assert!(index().max_distance(0).find("exmaple").is_empty());
    }

    #[test]
    fn test_names_deduplicated_and_sorted() {
        let idx = FuzzyIndex::new(["b", "a", "b"]);
        assert_eq!(idx.names(), ["a", "b"]);
    }

    #[test]
    fn test_edit_distance() {
        assert_eq!(edit_distance("", "abc"), 3);
        assert_eq!(edit_distance("kitten", "sitting"), 3);
        assert_eq!(edit_distance("ping", "ping"), 0);
        assert_eq!(edit_distance("exmaple", "example"), 2);
    }
}
