//! The frequency-weighted token dictionary and its match probability.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::path::Path;

use log::{debug, trace, warn};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::config::DictionaryConfig;
use crate::error::{DictError, Result};
use crate::metrics::{DictionaryStats, RecountMetrics};
use crate::recount::{recount, RecountOutcome};
use crate::serialization::{decode_state, encode_state, load_dictionary, save_dictionary};
use crate::tokens::TokenMultiset;

/// Per-token record: cumulative count across training documents and its derived weight.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct TokenEntry {
    /// Occurrences summed over every ingested document.
    pub count: u64,
    /// Share of the usable token total, or zero when the token is filtered out.
    #[serde(default)]
    pub weight: f64,
}

/// Token statistics accumulated over a set of training documents.
///
/// Each call to [`Dictionary::add_tokens`] ingests one document. Weights are recomputed from
/// scratch after every mutation, including configuration changes, so readers always observe a
/// consistent table. The dictionary is a plain value: wrap it in a lock when sharing it
/// between threads.
#[derive(Debug, Clone)]
pub struct Dictionary {
    entries: FxHashMap<String, TokenEntry>,
    document_count: u64,
    token_count: u64,
    usable_token_count: u64,
    config: DictionaryConfig,
    last_recount: RecountMetrics,
}

impl Default for Dictionary {
    fn default() -> Self {
        Self::new()
    }
}

impl Dictionary {
    /// Creates an empty dictionary with [`DictionaryConfig::default`] filtering.
    #[must_use]
    pub fn new() -> Self {
        Self::empty(DictionaryConfig::default())
    }

    /// Creates an empty dictionary with the supplied filtering rules.
    ///
    /// The configuration is validated first, so every dictionary holds a configuration that
    /// survives a persistence round trip.
    pub fn with_config(config: DictionaryConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::empty(config))
    }

    fn empty(config: DictionaryConfig) -> Self {
        Self {
            entries: FxHashMap::default(),
            document_count: 0,
            token_count: 0,
            usable_token_count: 0,
            config,
            last_recount: RecountMetrics::default(),
        }
    }

    /// Rebuilds a dictionary from raw counts and an already validated configuration.
    pub(crate) fn from_parts(
        entries: FxHashMap<String, TokenEntry>,
        document_count: u64,
        config: DictionaryConfig,
    ) -> Self {
        let mut dictionary = Self::empty(config);
        dictionary.entries = entries;
        dictionary.document_count = document_count;
        dictionary.recount();
        dictionary
    }

    /// Ingests one training document.
    ///
    /// Counts are added to existing entries or create new ones. Tokens with a zero count are
    /// skipped, so they never create empty entries.
    pub fn add_tokens(&mut self, tokens: &TokenMultiset) {
        for (token, count) in tokens.iter().filter(|&(_, count)| count > 0) {
            match self.entries.get_mut(token) {
                Some(entry) => entry.count = entry.count.saturating_add(count),
                None => {
                    self.entries
                        .insert(token.to_owned(), TokenEntry { count, weight: 0.0 });
                }
            }
        }
        self.document_count = self.document_count.saturating_add(1);
        trace!(
            "added document with {} distinct tokens; documents={}",
            tokens.len(),
            self.document_count
        );
        self.recount();
    }

    /// Removes one previously ingested training document.
    ///
    /// Tokens unknown to the dictionary are ignored. Entries whose count drops to zero are
    /// deleted. The document count never goes below zero.
    pub fn remove_tokens(&mut self, tokens: &TokenMultiset) {
        for (token, count) in tokens.iter() {
            if let Some(entry) = self.entries.get_mut(token) {
                entry.count = entry.count.saturating_sub(count);
                if entry.count == 0 {
                    self.entries.remove(token);
                }
            }
        }
        match self.document_count.checked_sub(1) {
            Some(remaining) => self.document_count = remaining,
            None => warn!("removed a document from a dictionary with no documents; count stays 0"),
        }
        trace!(
            "removed document with {} distinct tokens; documents={}",
            tokens.len(),
            self.document_count
        );
        self.recount();
    }

    /// Recomputes every weight together with the token totals.
    ///
    /// Mutations and setters call this already; calling it again without an intervening change
    /// leaves the dictionary untouched.
    pub fn recount(&mut self) {
        let entries = std::mem::take(&mut self.entries);
        let RecountOutcome {
            entries,
            usable_token_count,
            token_count,
            metrics,
        } = recount(entries, &self.config, self.document_count);
        self.entries = entries;
        self.usable_token_count = usable_token_count;
        self.token_count = token_count;
        debug!(
            "recount: entries={} usable={} filtered_length={} filtered_doc_freq={} tokens={} usable_tokens={} elapsed={:.2?}",
            metrics.entries,
            metrics.usable_entries,
            metrics.filtered_by_length,
            metrics.filtered_by_document_frequency,
            token_count,
            usable_token_count,
            metrics.elapsed
        );
        self.last_recount = metrics;
    }

    /// Scores `tokens` against the trained corpus.
    ///
    /// Every query token that is present in the dictionary with a non-zero weight contributes
    /// `ln(1 - weight)` to a running sum `S`; query counts are not used. The result is
    /// `1 / (1 + e^S)`. Without any contributing token the result is exactly `0.5`. A
    /// contributing token with weight `1.0` (a single usable token type) drives the result to
    /// exactly `1.0`.
    #[must_use]
    pub fn match_probability(&self, tokens: &TokenMultiset) -> f64 {
        let log_sum: f64 = tokens
            .iter()
            .filter_map(|(token, _)| self.entries.get(token))
            .filter(|entry| entry.weight != 0.0)
            .map(|entry| (-entry.weight).ln_1p())
            .sum();
        1.0 / (1.0 + log_sum.exp())
    }

    /// Returns a sorted snapshot of every entry.
    #[must_use]
    pub fn dump(&self) -> BTreeMap<String, TokenEntry> {
        self.entries
            .iter()
            .map(|(token, entry)| (token.clone(), *entry))
            .collect()
    }

    /// Iterates over entries in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TokenEntry)> + '_ {
        self.entries
            .iter()
            .map(|(token, entry)| (token.as_str(), entry))
    }

    /// Returns the `limit` heaviest usable entries, ties broken alphabetically.
    #[must_use]
    pub fn top_tokens(&self, limit: usize) -> Vec<(String, TokenEntry)> {
        let mut usable: Vec<(&String, &TokenEntry)> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.weight != 0.0)
            .collect();
        usable.sort_by(|(left_token, left), (right_token, right)| {
            right
                .weight
                .partial_cmp(&left.weight)
                .unwrap_or(Ordering::Equal)
                .then_with(|| left_token.cmp(right_token))
        });
        usable
            .into_iter()
            .take(limit)
            .map(|(token, entry)| (token.clone(), *entry))
            .collect()
    }

    /// Returns the entry stored for `token`.
    #[must_use]
    pub fn entry(&self, token: &str) -> Option<&TokenEntry> {
        self.entries.get(token)
    }

    /// Returns the weight of `token`, zero when unknown.
    #[must_use]
    pub fn weight(&self, token: &str) -> f64 {
        self.entries.get(token).map_or(0.0, |entry| entry.weight)
    }

    /// Returns `true` when `token` has an entry.
    #[must_use]
    pub fn contains(&self, token: &str) -> bool {
        self.entries.contains_key(token)
    }

    /// Number of distinct tokens stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when no token is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Training documents currently represented.
    #[must_use]
    pub fn document_count(&self) -> u64 {
        self.document_count
    }

    /// Overrides the document count and recounts.
    pub fn set_document_count(&mut self, document_count: u64) {
        self.document_count = document_count;
        self.recount();
    }

    /// Sum of all entry counts.
    #[must_use]
    pub fn token_count(&self) -> u64 {
        self.token_count
    }

    /// Sum of counts over usable entries; the weight denominator.
    #[must_use]
    pub fn usable_token_count(&self) -> u64 {
        self.usable_token_count
    }

    /// Filter statistics from the most recent recount.
    #[must_use]
    pub fn last_recount(&self) -> &RecountMetrics {
        &self.last_recount
    }

    /// Filtering rules currently in effect.
    #[must_use]
    pub fn config(&self) -> &DictionaryConfig {
        &self.config
    }

    /// Replaces every filtering rule at once and recounts.
    ///
    /// An invalid configuration is rejected and the dictionary is left unchanged.
    pub fn set_config(&mut self, config: DictionaryConfig) -> Result<()> {
        config.validate()?;
        self.config = config;
        self.recount();
        Ok(())
    }

    fn update_config(&mut self, update: impl FnOnce(&mut DictionaryConfig)) -> Result<()> {
        let mut config = self.config.clone();
        update(&mut config);
        self.set_config(config)
    }

    /// Minimal per-document frequency ratio.
    #[must_use]
    pub fn minimal_frequency_in_documents(&self) -> f64 {
        self.config.minimal_frequency_in_documents
    }

    /// Sets the minimal per-document frequency ratio and recounts.
    ///
    /// Values outside `[0, 1]`, NaN included, are rejected.
    pub fn set_minimal_frequency_in_documents(&mut self, value: f64) -> Result<()> {
        self.update_config(|cfg| cfg.minimal_frequency_in_documents = value)
    }

    /// Whether the document-frequency filter is enabled.
    #[must_use]
    pub fn use_document_frequency_filter(&self) -> bool {
        self.config.use_document_frequency_filter
    }

    /// Enables or disables the document-frequency filter and recounts.
    pub fn set_use_document_frequency_filter(&mut self, enabled: bool) {
        self.config.use_document_frequency_filter = enabled;
        self.recount();
    }

    /// Inclusive lower bound on usable token length.
    #[must_use]
    pub fn minimal_token_length(&self) -> usize {
        self.config.minimal_token_length
    }

    /// Sets the lower length bound and recounts.
    ///
    /// Rejected when it would exceed the upper bound.
    pub fn set_minimal_token_length(&mut self, value: usize) -> Result<()> {
        self.update_config(|cfg| cfg.minimal_token_length = value)
    }

    /// Inclusive upper bound on usable token length.
    #[must_use]
    pub fn maximal_token_length(&self) -> usize {
        self.config.maximal_token_length
    }

    /// Sets the upper length bound and recounts.
    ///
    /// Rejected when it would fall below the lower bound.
    pub fn set_maximal_token_length(&mut self, value: usize) -> Result<()> {
        self.update_config(|cfg| cfg.maximal_token_length = value)
    }

    /// Encodes the dictionary as a compact persisted blob.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        encode_state(self, false)
    }

    /// Encodes the dictionary as a JSON string.
    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let bytes = encode_state(self, pretty)?;
        String::from_utf8(bytes).map_err(|err| DictError::Internal(err.to_string()))
    }

    /// Decodes a blob produced by [`Dictionary::to_bytes`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        decode_state(bytes)
    }

    /// Replaces this dictionary with the decoded blob.
    ///
    /// On error `self` is left exactly as it was.
    pub fn restore(&mut self, bytes: &[u8]) -> Result<()> {
        *self = decode_state(bytes)?;
        Ok(())
    }

    /// Writes the persisted blob to `path`.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        save_dictionary(self, path, false)
    }

    /// Loads a dictionary previously written by [`Dictionary::save`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        load_dictionary(path)
    }

    /// Summarises the dictionary.
    #[must_use]
    pub fn stats(&self) -> DictionaryStats {
        DictionaryStats {
            entries: self.entries.len(),
            usable_entries: self.last_recount.usable_entries,
            document_count: self.document_count,
            token_count: self.token_count,
            usable_token_count: self.usable_token_count,
            config: self.config.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn multiset(pairs: &[(&str, u64)]) -> TokenMultiset {
        pairs.iter().map(|&(token, count)| (token, count)).collect()
    }

    fn usable_weight_sum(dictionary: &Dictionary) -> f64 {
        dictionary
            .iter()
            .map(|(_, entry)| entry.weight)
            .filter(|&weight| weight != 0.0)
            .sum()
    }

    #[test]
    fn empty_dictionary_matches_at_one_half() {
        let dictionary = Dictionary::new();
        assert_eq!(dictionary.match_probability(&multiset(&[("foo", 1)])), 0.5);
        assert_eq!(dictionary.usable_token_count(), 0);
        assert!(dictionary.is_empty());
    }

    #[test]
    fn weights_follow_usable_share() {
        let mut dictionary = Dictionary::new();
        dictionary.add_tokens(&multiset(&[("alpha", 10), ("bet", 1)]));

        assert_eq!(dictionary.usable_token_count(), 11);
        assert_eq!(dictionary.token_count(), 11);
        assert!((dictionary.weight("alpha") - 10.0 / 11.0).abs() < 1e-12);
        assert!((dictionary.weight("bet") - 1.0 / 11.0).abs() < 1e-12);

        let probability = dictionary.match_probability(&multiset(&[("alpha", 1)]));
        assert!((probability - 11.0 / 12.0).abs() < 1e-9);
        assert!((probability - 0.917).abs() < 1e-3);
    }

    #[test]
    fn short_tokens_never_contribute() {
        let mut dictionary = Dictionary::new();
        dictionary.add_tokens(&multiset(&[("ab", 1_000), ("alpha", 1), ("gamma", 1)]));

        assert_eq!(dictionary.weight("ab"), 0.0);
        assert_eq!(dictionary.entry("ab").map(|entry| entry.count), Some(1_000));
        assert_eq!(dictionary.token_count(), 1_002);
        assert_eq!(dictionary.usable_token_count(), 2);
        assert_eq!(dictionary.match_probability(&multiset(&[("ab", 5)])), 0.5);
    }

    #[test]
    fn single_usable_token_saturates_to_one() {
        let mut dictionary = Dictionary::new();
        dictionary.add_tokens(&multiset(&[("only", 4), ("xy", 2)]));
        assert_eq!(dictionary.weight("only"), 1.0);

        let probability = dictionary.match_probability(&multiset(&[("only", 1)]));
        assert!(!probability.is_nan());
        assert_eq!(probability, 1.0);
    }

    #[test]
    fn match_uses_presence_not_query_counts() {
        let mut dictionary = Dictionary::new();
        dictionary.add_tokens(&multiset(&[("alpha", 3), ("beta", 1), ("gamma", 1)]));
        let once = dictionary.match_probability(&multiset(&[("alpha", 1)]));
        let many = dictionary.match_probability(&multiset(&[("alpha", 40)]));
        let zero = dictionary.match_probability(&multiset(&[("alpha", 0)]));
        assert_eq!(once, many);
        assert_eq!(once, zero);
    }

    #[test]
    fn match_stays_within_open_interval() {
        let mut dictionary = Dictionary::new();
        dictionary.add_tokens(&multiset(&[("alpha", 3), ("beta", 2), ("gamma", 5)]));
        dictionary.add_tokens(&multiset(&[("delta", 7), ("alpha", 1)]));

        let queries = [
            multiset(&[("alpha", 1)]),
            multiset(&[("alpha", 1), ("beta", 1)]),
            multiset(&[("gamma", 2), ("delta", 1), ("unknown", 9)]),
            multiset(&[("unknown", 1)]),
            TokenMultiset::new(),
        ];
        for query in &queries {
            let probability = dictionary.match_probability(query);
            assert!(probability > 0.0 && probability < 1.0, "{probability}");
        }
        assert_eq!(dictionary.match_probability(&queries[3]), 0.5);
        assert_eq!(dictionary.match_probability(&queries[4]), 0.5);
    }

    #[test]
    fn more_shared_tokens_raise_the_score() {
        let mut dictionary = Dictionary::new();
        dictionary.add_tokens(&multiset(&[("alpha", 3), ("beta", 2), ("gamma", 5)]));
        let one = dictionary.match_probability(&multiset(&[("alpha", 1)]));
        let two = dictionary.match_probability(&multiset(&[("alpha", 1), ("beta", 1)]));
        assert!(one > 0.5);
        assert!(two > one);
    }

    #[test]
    fn weights_stay_normalised_across_mutations() {
        let mut dictionary = Dictionary::new();
        let documents = [
            multiset(&[("alpha", 3), ("beta", 2), ("xy", 9)]),
            multiset(&[("gamma", 5), ("alpha", 1)]),
            multiset(&[("delta", 7), ("epsilon", 2), ("beta", 4)]),
        ];
        for document in &documents {
            dictionary.add_tokens(document);
            assert!((usable_weight_sum(&dictionary) - 1.0).abs() < 1e-9);
        }
        dictionary.remove_tokens(&documents[1]);
        assert!((usable_weight_sum(&dictionary) - 1.0).abs() < 1e-9);
        dictionary.remove_tokens(&documents[0]);
        dictionary.remove_tokens(&documents[2]);
        assert!(dictionary.is_empty());
        assert_eq!(dictionary.usable_token_count(), 0);
        assert_eq!(usable_weight_sum(&dictionary), 0.0);
    }

    #[test]
    fn remove_reverses_add() {
        let mut dictionary = Dictionary::new();
        dictionary.add_tokens(&multiset(&[("alpha", 3), ("beta", 2)]));
        let before = dictionary.dump();
        let documents_before = dictionary.document_count();

        let extra = multiset(&[("alpha", 4), ("omega", 6)]);
        dictionary.add_tokens(&extra);
        assert!(dictionary.contains("omega"));
        dictionary.remove_tokens(&extra);

        assert_eq!(dictionary.document_count(), documents_before);
        assert!(!dictionary.contains("omega"));
        assert_eq!(dictionary.dump(), before);
    }

    #[test]
    fn remove_ignores_unknown_tokens_and_drops_exhausted_entries() {
        let mut dictionary = Dictionary::new();
        dictionary.add_tokens(&multiset(&[("alpha", 3), ("beta", 2)]));
        dictionary.remove_tokens(&multiset(&[("alpha", 10), ("missing", 1)]));

        assert!(!dictionary.contains("alpha"));
        assert!(!dictionary.contains("missing"));
        assert_eq!(dictionary.entry("beta").map(|entry| entry.count), Some(2));
        assert_eq!(dictionary.weight("beta"), 1.0);
        assert_eq!(dictionary.document_count(), 0);
    }

    #[test]
    fn document_count_is_clamped_at_zero() {
        let mut dictionary = Dictionary::new();
        dictionary.remove_tokens(&multiset(&[("alpha", 1)]));
        assert_eq!(dictionary.document_count(), 0);
        dictionary.add_tokens(&multiset(&[("alpha", 1)]));
        assert_eq!(dictionary.document_count(), 1);
    }

    #[test]
    fn zero_counts_do_not_create_entries() {
        let mut dictionary = Dictionary::new();
        dictionary.add_tokens(&multiset(&[("alpha", 0), ("beta", 2)]));
        assert!(!dictionary.contains("alpha"));
        assert_eq!(dictionary.len(), 1);
        assert_eq!(dictionary.document_count(), 1);
    }

    #[test]
    fn counts_accumulate_over_documents() {
        let mut dictionary = Dictionary::new();
        dictionary.add_tokens(&multiset(&[("alpha", 2)]));
        dictionary.add_tokens(&multiset(&[("alpha", 3), ("beta", 5)]));
        assert_eq!(dictionary.entry("alpha").map(|entry| entry.count), Some(5));
        assert_eq!(dictionary.document_count(), 2);
        assert_eq!(dictionary.token_count(), 10);
        assert!((dictionary.weight("alpha") - 0.5).abs() < 1e-12);
    }

    #[test]
    fn length_is_measured_in_characters() {
        let mut dictionary = Dictionary::new();
        // 16 scalar values but 32 bytes.
        let long_cyrillic = "ж".repeat(16);
        let too_long = "ж".repeat(17);
        let mut document = TokenMultiset::new();
        document.insert(long_cyrillic.as_str(), 1);
        document.insert(too_long.as_str(), 1);
        dictionary.add_tokens(&document);
        assert_eq!(dictionary.weight(&long_cyrillic), 1.0);
        assert_eq!(dictionary.weight(&too_long), 0.0);
    }

    #[test]
    fn setters_trigger_recount() {
        let mut dictionary = Dictionary::new();
        dictionary.add_tokens(&multiset(&[("ab", 1), ("alpha", 3)]));
        assert_eq!(dictionary.weight("ab"), 0.0);

        dictionary
            .set_minimal_token_length(2)
            .expect("valid lower bound");
        assert!((dictionary.weight("ab") - 0.25).abs() < 1e-12);
        assert_eq!(dictionary.usable_token_count(), 4);

        dictionary
            .set_maximal_token_length(4)
            .expect("valid upper bound");
        assert_eq!(dictionary.weight("alpha"), 0.0);
        assert_eq!(dictionary.weight("ab"), 1.0);
    }

    #[test]
    fn document_frequency_filter_drops_rare_tokens() {
        let mut dictionary = Dictionary::new();
        dictionary
            .set_minimal_frequency_in_documents(0.5)
            .expect("valid frequency");
        dictionary.add_tokens(&multiset(&[("common", 1), ("rare", 1)]));
        dictionary.add_tokens(&multiset(&[("common", 1)]));
        dictionary.add_tokens(&multiset(&[("common", 1)]));
        dictionary.add_tokens(&multiset(&[("common", 1)]));
        assert!(dictionary.weight("rare") > 0.0);

        dictionary.set_use_document_frequency_filter(true);
        assert_eq!(dictionary.weight("rare"), 0.0);
        assert_eq!(dictionary.weight("common"), 1.0);
        assert_eq!(dictionary.last_recount().filtered_by_document_frequency, 1);

        dictionary.set_document_count(2);
        assert!((dictionary.weight("rare") - 0.2).abs() < 1e-12);
    }

    #[test]
    fn explicit_recount_is_idempotent() {
        let mut dictionary = Dictionary::new();
        dictionary.add_tokens(&multiset(&[("alpha", 3), ("beta", 2), ("zz", 1)]));
        let before = dictionary.dump();
        let usable = dictionary.usable_token_count();
        dictionary.recount();
        assert_eq!(dictionary.dump(), before);
        assert_eq!(dictionary.usable_token_count(), usable);
    }

    #[test]
    fn top_tokens_orders_by_weight_then_token() {
        let mut dictionary = Dictionary::new();
        dictionary.add_tokens(&multiset(&[("gamma", 2), ("alpha", 2), ("beta", 5), ("xy", 9)]));
        let top = dictionary.top_tokens(10);
        let names: Vec<&str> = top.iter().map(|(token, _)| token.as_str()).collect();
        assert_eq!(names, vec!["beta", "alpha", "gamma"]);
        assert_eq!(dictionary.top_tokens(1).len(), 1);
    }

    #[test]
    fn restore_replaces_state_and_keeps_it_on_failure() {
        let mut source = Dictionary::new();
        source.add_tokens(&multiset(&[("alpha", 3), ("beta", 1)]));
        let blob = source.to_bytes().expect("encode");

        let mut target = Dictionary::new();
        target.add_tokens(&multiset(&[("omega", 2)]));
        let before = target.dump();
        assert!(target.restore(b"{\"format_version\": 1}").is_err());
        assert_eq!(target.dump(), before);
        assert_eq!(target.document_count(), 1);

        target.restore(&blob).expect("restore");
        assert_eq!(target.dump(), source.dump());
        assert!(!target.contains("omega"));
    }

    #[test]
    fn json_round_trip_keeps_match_results() {
        let mut dictionary = Dictionary::new();
        dictionary.add_tokens(&multiset(&[("alpha", 3), ("beta", 1), ("gamma", 2)]));
        let json = dictionary.to_json(true).expect("encode");
        let restored = Dictionary::from_bytes(json.as_bytes()).expect("decode");
        let query = multiset(&[("alpha", 1), ("gamma", 1)]);
        assert_eq!(
            restored.match_probability(&query),
            dictionary.match_probability(&query)
        );
    }

    #[test]
    fn invalid_settings_are_rejected_and_leave_state_untouched() {
        let mut dictionary = Dictionary::new();
        dictionary.add_tokens(&multiset(&[("alpha", 3), ("beta", 1)]));
        let before = dictionary.dump();

        assert!(matches!(
            dictionary.set_minimal_token_length(20),
            Err(DictError::InvalidConfig(_))
        ));
        assert!(dictionary.set_maximal_token_length(2).is_err());
        assert!(dictionary.set_minimal_frequency_in_documents(f64::NAN).is_err());
        assert!(dictionary.set_minimal_frequency_in_documents(1.5).is_err());
        let inverted = DictionaryConfig {
            minimal_token_length: 9,
            maximal_token_length: 4,
            ..DictionaryConfig::default()
        };
        assert!(dictionary.set_config(inverted.clone()).is_err());
        assert!(Dictionary::with_config(inverted).is_err());

        assert_eq!(dictionary.config(), &DictionaryConfig::default());
        assert_eq!(dictionary.dump(), before);
    }

    #[test]
    fn settings_changed_through_setters_survive_round_trip() {
        let mut dictionary = Dictionary::new();
        dictionary.add_tokens(&multiset(&[("ab", 2), ("alpha", 3), ("omega", 1)]));
        dictionary
            .set_maximal_token_length(20)
            .expect("valid upper bound");
        dictionary
            .set_minimal_token_length(2)
            .expect("valid lower bound");
        dictionary
            .set_minimal_frequency_in_documents(0.75)
            .expect("valid frequency");
        dictionary.set_use_document_frequency_filter(true);
        // Rejected values must not leak into the persisted blob.
        assert!(dictionary.set_minimal_frequency_in_documents(f64::NAN).is_err());

        let restored = Dictionary::from_bytes(&dictionary.to_bytes().expect("encode"))
            .expect("decode");
        assert_eq!(restored.config(), dictionary.config());
        assert_eq!(restored.dump(), dictionary.dump());
        assert_eq!(restored.document_count(), dictionary.document_count());
    }

    #[test]
    fn stats_reflect_current_state() {
        let mut dictionary = Dictionary::new();
        dictionary.add_tokens(&multiset(&[("alpha", 2), ("xy", 1)]));
        let stats = dictionary.stats();
        assert_eq!(stats.entries, 2);
        assert_eq!(stats.usable_entries, 1);
        assert_eq!(stats.document_count, 1);
        assert_eq!(stats.token_count, 3);
        assert_eq!(stats.usable_token_count, 2);
        assert_eq!(stats.config, DictionaryConfig::default());
    }
}
