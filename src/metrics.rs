//! Metrics describing recount outcomes and dictionary-wide statistics.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::DictionaryConfig;

/// Why an entry was excluded from weight normalisation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum FilterReason {
    /// The token length lies outside the configured bounds.
    Length,
    /// The token appears in too small a share of the training documents.
    DocumentFrequency,
}

/// Metrics captured by a single recount.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RecountMetrics {
    /// Number of entries examined.
    pub entries: usize,
    /// Entries that passed every filter and received a normalised weight.
    pub usable_entries: usize,
    /// Entries rejected by the length filter.
    pub filtered_by_length: usize,
    /// Entries rejected by the document-frequency filter.
    pub filtered_by_document_frequency: usize,
    /// Wall-clock time spent recomputing weights.
    pub elapsed: Duration,
}

impl RecountMetrics {
    /// Tallies one filtered entry under `reason`.
    pub fn record_filtered(&mut self, reason: FilterReason) {
        match reason {
            FilterReason::Length => self.filtered_by_length += 1,
            FilterReason::DocumentFrequency => self.filtered_by_document_frequency += 1,
        }
    }

    /// Total number of entries rejected by any filter.
    #[must_use]
    pub fn filtered_entries(&self) -> usize {
        self.filtered_by_length + self.filtered_by_document_frequency
    }
}

/// Point-in-time summary of a dictionary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DictionaryStats {
    /// Distinct tokens stored.
    pub entries: usize,
    /// Distinct tokens carrying a non-zero weight.
    pub usable_entries: usize,
    /// Training documents currently represented.
    pub document_count: u64,
    /// Sum of all token counts.
    pub token_count: u64,
    /// Sum of counts over usable tokens.
    pub usable_token_count: u64,
    /// Filtering rules in effect.
    pub config: DictionaryConfig,
}
