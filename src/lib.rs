//! Frequency-weighted token dictionary library and CLI.
//!
//! A [`Dictionary`] accumulates token counts over training documents, derives a normalised
//! weight for every token that passes the configured filters, and scores new documents with a
//! probability expressing how close their vocabulary is to the trained corpus. Documents are
//! supplied as [`TokenMultiset`]s produced by an external tokenizer.
//!
//! ```
//! use bayes_dictionary::{Dictionary, TokenMultiset};
//!
//! let mut dictionary = Dictionary::new();
//! let document: TokenMultiset = [("alpha", 10u64), ("bet", 1)].into_iter().collect();
//! dictionary.add_tokens(&document);
//!
//! let query = TokenMultiset::from_tokens(["alpha"]);
//! let probability = dictionary.match_probability(&query);
//! assert!((probability - 11.0 / 12.0).abs() < 1e-9);
//! ```
//!
//! The `bdict` CLI is enabled by default through the `cli` feature. Users targeting the
//! library portion only can disable default features to avoid the CLI dependencies:
//! `bayes-dictionary = { version = "...", default-features = false }`.

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    clippy::all,
    rust_2018_idioms,
    future_incompatible,
    unused_lifetimes,
    unreachable_pub
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc,
    clippy::doc_markdown,
    clippy::multiple_crate_versions,
    clippy::cast_precision_loss
)]

pub mod config;
pub mod corpus;
pub mod dictionary;
pub mod error;
pub mod metrics;
pub mod recount;
pub mod serialization;
pub mod tokens;

pub use config::{DictionaryBuilder, DictionaryConfig, IngestConfig};
pub use dictionary::{Dictionary, TokenEntry};
pub use error::{DictError, Result};
pub use metrics::{DictionaryStats, FilterReason, RecountMetrics};
pub use tokens::TokenMultiset;
