//! Versioned JSON representation of a [`Dictionary`].
//!
//! The blob stores raw counts, the document count, and every filtering rule. Weights are
//! written for inspection only; decoding always recomputes them.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use log::warn;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::config::{DictionaryConfig, DEFAULT_MINIMAL_FREQUENCY_IN_DOCUMENTS};
use crate::dictionary::{Dictionary, TokenEntry};
use crate::error::{DictError, Result};

/// Version tag written into every blob.
pub const FORMAT_VERSION: u32 = 1;

fn default_minimal_frequency() -> f64 {
    DEFAULT_MINIMAL_FREQUENCY_IN_DOCUMENTS
}

#[derive(Debug, Serialize, Deserialize)]
struct PersistedState {
    format_version: u32,
    entries: BTreeMap<String, TokenEntry>,
    document_count: u64,
    use_document_frequency_filter: bool,
    minimal_token_length: usize,
    maximal_token_length: usize,
    // Older blobs did not carry the threshold.
    #[serde(default = "default_minimal_frequency")]
    minimal_frequency_in_documents: f64,
}

impl PersistedState {
    fn capture(dictionary: &Dictionary) -> Self {
        let config = dictionary.config();
        Self {
            format_version: FORMAT_VERSION,
            entries: dictionary.dump(),
            document_count: dictionary.document_count(),
            use_document_frequency_filter: config.use_document_frequency_filter,
            minimal_token_length: config.minimal_token_length,
            maximal_token_length: config.maximal_token_length,
            minimal_frequency_in_documents: config.minimal_frequency_in_documents,
        }
    }

    fn into_dictionary(self) -> Result<Dictionary> {
        if self.format_version != FORMAT_VERSION {
            return Err(DictError::corrupt(format!(
                "unsupported format_version {} (expected {FORMAT_VERSION})",
                self.format_version
            )));
        }
        let config = DictionaryConfig {
            minimal_frequency_in_documents: self.minimal_frequency_in_documents,
            use_document_frequency_filter: self.use_document_frequency_filter,
            minimal_token_length: self.minimal_token_length,
            maximal_token_length: self.maximal_token_length,
        };
        config
            .validate()
            .map_err(|err| DictError::corrupt(err.to_string()))?;

        let mut entries =
            FxHashMap::with_capacity_and_hasher(self.entries.len(), Default::default());
        for (token, entry) in self.entries {
            if entry.count == 0 {
                return Err(DictError::corrupt(format!(
                    "entry {token:?} has a zero count"
                )));
            }
            entries.insert(token, TokenEntry {
                count: entry.count,
                weight: 0.0,
            });
        }
        Ok(Dictionary::from_parts(entries, self.document_count, config))
    }
}

/// Encodes `dictionary` as a JSON blob.
pub fn encode_state(dictionary: &Dictionary, pretty: bool) -> Result<Vec<u8>> {
    let state = PersistedState::capture(dictionary);
    let bytes = if pretty {
        serde_json::to_vec_pretty(&state)?
    } else {
        serde_json::to_vec(&state)?
    };
    Ok(bytes)
}

/// Decodes a blob produced by [`encode_state`], recounting every weight.
///
/// Any shape mismatch, unknown version, zero count, or invalid configuration yields
/// [`DictError::CorruptState`].
pub fn decode_state(bytes: &[u8]) -> Result<Dictionary> {
    let state: PersistedState = serde_json::from_slice(bytes).map_err(|err| {
        warn!("rejecting dictionary state: {err}");
        DictError::corrupt(err.to_string())
    })?;
    state.into_dictionary()
}

/// Writes the encoded dictionary to `path`.
pub fn save_dictionary<P: AsRef<Path>>(
    dictionary: &Dictionary,
    path: P,
    pretty: bool,
) -> Result<()> {
    let bytes = encode_state(dictionary, pretty)?;
    fs::write(path.as_ref(), bytes)
        .map_err(|err| DictError::io(err, Some(path.as_ref().to_path_buf())))
}

/// Reads and decodes a dictionary previously written by [`save_dictionary`].
pub fn load_dictionary<P: AsRef<Path>>(path: P) -> Result<Dictionary> {
    let bytes = fs::read(path.as_ref())
        .map_err(|err| DictError::io(err, Some(path.as_ref().to_path_buf())))?;
    decode_state(&bytes)
}
