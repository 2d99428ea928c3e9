//! Configuration builders controlling token filtering and corpus ingestion.

use crate::error::{DictError, Result};
use serde::{Deserialize, Serialize};

/// Default share of training documents a token must reach when the document-frequency filter is on.
pub const DEFAULT_MINIMAL_FREQUENCY_IN_DOCUMENTS: f64 = 0.05;
/// Default shortest usable token, in Unicode scalar values.
pub const DEFAULT_MINIMAL_TOKEN_LENGTH: usize = 3;
/// Default longest usable token, in Unicode scalar values.
pub const DEFAULT_MAXIMAL_TOKEN_LENGTH: usize = 16;

/// Filtering rules applied whenever dictionary weights are recomputed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DictionaryConfig {
    /// Minimal `count / document_count` ratio for a token to stay usable.
    ///
    /// For example, with `0.1` every token seen less than once per ten documents is ignored.
    /// Only consulted when [`DictionaryConfig::use_document_frequency_filter`] is set.
    pub minimal_frequency_in_documents: f64,
    /// Enables the document-frequency filter.
    pub use_document_frequency_filter: bool,
    /// Inclusive lower bound on token length.
    pub minimal_token_length: usize,
    /// Inclusive upper bound on token length.
    pub maximal_token_length: usize,
}

impl DictionaryConfig {
    /// Returns a builder initialised with [`DictionaryConfig::default`].
    #[must_use]
    pub fn builder() -> DictionaryBuilder {
        DictionaryBuilder::default()
    }

    /// Validates the invariants required for a meaningful recount.
    pub fn validate(&self) -> Result<()> {
        let frequency = self.minimal_frequency_in_documents;
        if !(0.0..=1.0).contains(&frequency) {
            return Err(DictError::InvalidConfig(format!(
                "minimal_frequency_in_documents ({frequency}) must lie within [0, 1]"
            )));
        }
        if self.minimal_token_length > self.maximal_token_length {
            return Err(DictError::InvalidConfig(format!(
                "minimal_token_length ({}) exceeds maximal_token_length ({})",
                self.minimal_token_length, self.maximal_token_length
            )));
        }
        Ok(())
    }

    /// Returns `true` when a token of `length` characters passes the length filter.
    #[must_use]
    pub fn accepts_length(&self, length: usize) -> bool {
        (self.minimal_token_length..=self.maximal_token_length).contains(&length)
    }
}

impl Default for DictionaryConfig {
    fn default() -> Self {
        Self {
            minimal_frequency_in_documents: DEFAULT_MINIMAL_FREQUENCY_IN_DOCUMENTS,
            use_document_frequency_filter: false,
            minimal_token_length: DEFAULT_MINIMAL_TOKEN_LENGTH,
            maximal_token_length: DEFAULT_MAXIMAL_TOKEN_LENGTH,
        }
    }
}

/// Builder for [`DictionaryConfig`].
#[derive(Debug, Default, Clone)]
pub struct DictionaryBuilder {
    cfg: DictionaryConfig,
}

impl DictionaryBuilder {
    /// Creates a builder with [`DictionaryConfig::default`] settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the minimal per-document frequency ratio.
    #[must_use]
    pub fn minimal_frequency_in_documents(mut self, value: f64) -> Self {
        self.cfg.minimal_frequency_in_documents = value;
        self
    }

    /// Enables or disables the document-frequency filter.
    #[must_use]
    pub fn use_document_frequency_filter(mut self, enabled: bool) -> Self {
        self.cfg.use_document_frequency_filter = enabled;
        self
    }

    /// Sets the inclusive lower bound on token length.
    #[must_use]
    pub fn minimal_token_length(mut self, value: usize) -> Self {
        self.cfg.minimal_token_length = value;
        self
    }

    /// Sets the inclusive upper bound on token length.
    #[must_use]
    pub fn maximal_token_length(mut self, value: usize) -> Self {
        self.cfg.maximal_token_length = value;
        self
    }

    /// Sets both length bounds at once.
    #[must_use]
    pub fn token_length_range(self, min: usize, max: usize) -> Self {
        self.minimal_token_length(min).maximal_token_length(max)
    }

    /// Finalises the builder, returning a validated [`DictionaryConfig`].
    pub fn build(self) -> Result<DictionaryConfig> {
        self.cfg.validate()?;
        Ok(self.cfg)
    }
}

/// Configuration controlling how pre-tokenized documents are discovered on disk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IngestConfig {
    /// Enables recursive directory traversal.
    pub recursive: bool,
    /// Follows symlinks encountered during traversal.
    pub follow_symlinks: bool,
    /// Only files with this extension are picked up from directories; `None` accepts all files.
    pub extension: Option<String>,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            recursive: true,
            follow_symlinks: false,
            extension: Some("json".into()),
        }
    }
}

impl IngestConfig {
    /// Returns a builder initialised with [`IngestConfig::default`].
    #[must_use]
    pub fn builder() -> IngestBuilder {
        IngestBuilder::default()
    }
}

/// Builder for [`IngestConfig`].
#[derive(Debug, Default, Clone)]
pub struct IngestBuilder {
    cfg: IngestConfig,
}

impl IngestBuilder {
    /// Creates a new builder with [`IngestConfig::default`] settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables recursive directory traversal.
    #[must_use]
    pub fn recursive(mut self, enabled: bool) -> Self {
        self.cfg.recursive = enabled;
        self
    }

    /// Enables or disables following of symlinks when traversing directories.
    #[must_use]
    pub fn follow_symlinks(mut self, enabled: bool) -> Self {
        self.cfg.follow_symlinks = enabled;
        self
    }

    /// Restricts directory discovery to one extension, or lifts the restriction with `None`.
    #[must_use]
    pub fn extension<S: Into<String>>(mut self, extension: Option<S>) -> Self {
        self.cfg.extension = extension.map(Into::into);
        self
    }

    /// Finalises the builder, returning the [`IngestConfig`].
    pub fn build(self) -> IngestConfig {
        self.cfg
    }
}
