//! Weight recomputation shared by every dictionary mutation.
//!
//! Recounting is a pure transformation: it takes ownership of the entry table, decides which
//! tokens are usable, normalises their counts into weights, and hands everything back in a
//! [`RecountOutcome`]. The normalisation denominator is only known once every entry has been
//! classified, so the work happens in two passes over an explicitly tagged table.

use std::time::Instant;

use rustc_hash::FxHashMap;

use crate::config::DictionaryConfig;
use crate::dictionary::TokenEntry;
use crate::metrics::{FilterReason, RecountMetrics};

/// Per-entry state while a recount is in progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Usability {
    /// Excluded from normalisation; the final weight is zero.
    Filtered(FilterReason),
    /// Passed every filter; waiting for the usable token total.
    Pending,
    /// Normalised weight.
    Final(f64),
}

impl Usability {
    /// Collapses the tag into the weight stored on the entry.
    #[must_use]
    pub fn weight(self) -> f64 {
        match self {
            Self::Final(weight) => weight,
            Self::Filtered(_) | Self::Pending => 0.0,
        }
    }
}

/// Result of a full recount.
#[derive(Debug, Clone)]
pub struct RecountOutcome {
    /// Entry table with freshly computed weights.
    pub entries: FxHashMap<String, TokenEntry>,
    /// Sum of counts over usable entries.
    pub usable_token_count: u64,
    /// Sum of counts over all entries.
    pub token_count: u64,
    /// Filter statistics gathered along the way.
    pub metrics: RecountMetrics,
}

/// Decides whether a token takes part in normalisation.
///
/// The document-frequency rule is only consulted when enabled and at least one document has
/// been ingested. Length is measured in Unicode scalar values.
#[must_use]
pub fn classify(
    token: &str,
    count: u64,
    config: &DictionaryConfig,
    document_count: u64,
) -> Usability {
    if config.use_document_frequency_filter && document_count > 0 {
        let frequency = count as f64 / document_count as f64;
        if frequency < config.minimal_frequency_in_documents {
            return Usability::Filtered(FilterReason::DocumentFrequency);
        }
    }
    if !config.accepts_length(token.chars().count()) {
        return Usability::Filtered(FilterReason::Length);
    }
    Usability::Pending
}

/// Recomputes every weight from scratch.
///
/// Incoming weights are ignored. When no entry is usable every weight is zero.
#[must_use]
pub fn recount(
    entries: FxHashMap<String, TokenEntry>,
    config: &DictionaryConfig,
    document_count: u64,
) -> RecountOutcome {
    let start = Instant::now();
    let mut metrics = RecountMetrics {
        entries: entries.len(),
        ..RecountMetrics::default()
    };

    let mut tagged: Vec<(String, u64, Usability)> = entries
        .into_iter()
        .map(|(token, entry)| {
            let tag = classify(&token, entry.count, config, document_count);
            (token, entry.count, tag)
        })
        .collect();

    let mut token_count = 0u64;
    let mut usable_token_count = 0u64;
    for (_, count, tag) in &tagged {
        token_count = token_count.saturating_add(*count);
        match tag {
            Usability::Pending => {
                usable_token_count = usable_token_count.saturating_add(*count);
                metrics.usable_entries += 1;
            }
            Usability::Filtered(reason) => metrics.record_filtered(*reason),
            Usability::Final(_) => {}
        }
    }

    for (_, count, tag) in &mut tagged {
        if *tag == Usability::Pending {
            *tag = if usable_token_count == 0 {
                Usability::Final(0.0)
            } else {
                Usability::Final(*count as f64 / usable_token_count as f64)
            };
        }
    }

    let entries = tagged
        .into_iter()
        .map(|(token, count, tag)| {
            let entry = TokenEntry {
                count,
                weight: tag.weight(),
            };
            (token, entry)
        })
        .collect();

    metrics.elapsed = start.elapsed();
    RecountOutcome {
        entries,
        usable_token_count,
        token_count,
        metrics,
    }
}
