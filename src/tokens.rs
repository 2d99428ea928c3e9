//! Token multisets: per-document term frequencies produced by an external tokenizer.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Occurrence counts of tokens within one document or query.
///
/// Keys are unique and iteration order carries no meaning. The multiset serialises as a plain
/// JSON object mapping each token to its count.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenMultiset {
    counts: FxHashMap<String, u64>,
}

impl TokenMultiset {
    /// Creates an empty multiset.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty multiset with room for `capacity` distinct tokens.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            counts: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    /// Counts every token yielded by `tokens`, one occurrence each.
    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut multiset = Self::new();
        for token in tokens {
            multiset.add(token);
        }
        multiset
    }

    /// Sets the count for `token`, replacing any previous value. Zero is stored as-is.
    pub fn insert<S: Into<String>>(&mut self, token: S, count: u64) -> Option<u64> {
        self.counts.insert(token.into(), count)
    }

    /// Records one more occurrence of `token`.
    pub fn add<S: Into<String>>(&mut self, token: S) {
        self.add_count(token, 1);
    }

    /// Records `count` more occurrences of `token`.
    pub fn add_count<S: Into<String>>(&mut self, token: S, count: u64) {
        let slot = self.counts.entry(token.into()).or_insert(0);
        *slot = slot.saturating_add(count);
    }

    /// Returns the count recorded for `token`, if the token is present.
    #[must_use]
    pub fn get(&self, token: &str) -> Option<u64> {
        self.counts.get(token).copied()
    }

    /// Returns `true` when `token` is a key of the multiset, whatever its count.
    #[must_use]
    pub fn contains(&self, token: &str) -> bool {
        self.counts.contains_key(token)
    }

    /// Number of distinct tokens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Returns `true` when no token is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.counts
            .values()
            .fold(0u64, |acc, &count| acc.saturating_add(count))
    }

    /// Iterates over `(token, count)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> + '_ {
        self.counts
            .iter()
            .map(|(token, &count)| (token.as_str(), count))
    }
}

impl<S: Into<String>> FromIterator<(S, u64)> for TokenMultiset {
    fn from_iter<I: IntoIterator<Item = (S, u64)>>(iter: I) -> Self {
        let mut multiset = Self::new();
        multiset.extend(iter);
        multiset
    }
}

impl<S: Into<String>> Extend<(S, u64)> for TokenMultiset {
    fn extend<I: IntoIterator<Item = (S, u64)>>(&mut self, iter: I) {
        for (token, count) in iter {
            self.add_count(token, count);
        }
    }
}
