//! Facilities for discovering and loading pre-tokenized documents.
//!
//! Each document is a JSON object mapping tokens to counts, as produced by an external
//! tokenizer. Nothing here splits raw text.

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use rayon::prelude::*;
use walkdir::WalkDir;

use crate::config::IngestConfig;
use crate::error::{DictError, Result};
use crate::tokens::TokenMultiset;

/// A token multiset together with the file it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenDocument {
    /// Source file.
    pub path: PathBuf,
    /// Parsed token counts.
    pub tokens: TokenMultiset,
}

fn has_extension(path: &Path, cfg: &IngestConfig) -> bool {
    match &cfg.extension {
        Some(wanted) => path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(wanted)),
        None => true,
    }
}

/// Discovers files rooted at the provided input paths according to the ingest configuration.
///
/// Files named explicitly are always kept; files found inside directories must carry
/// [`IngestConfig::extension`] when one is set. Directories are traversed recursively by
/// default; set [`IngestConfig::recursive`] to `false` to limit discovery to the first level.
/// Results from each directory are sorted so loading order is reproducible.
pub fn collect_paths<P: AsRef<Path>>(inputs: &[P], cfg: &IngestConfig) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        let path = input.as_ref();
        if !path.exists() {
            return Err(DictError::InvalidConfig(format!(
                "input path {path:?} does not exist"
            )));
        }
        let metadata = path
            .symlink_metadata()
            .map_err(|err| DictError::io(err, Some(path.to_path_buf())))?;
        if metadata.is_dir() {
            let mut found = Vec::new();
            if cfg.recursive {
                let walker = WalkDir::new(path).follow_links(cfg.follow_symlinks);
                for entry in walker {
                    let entry = entry.map_err(|err| DictError::Internal(err.to_string()))?;
                    if entry.file_type().is_file() && has_extension(entry.path(), cfg) {
                        found.push(entry.path().to_path_buf());
                    }
                }
            } else {
                for entry in
                    fs::read_dir(path).map_err(|err| DictError::io(err, Some(path.to_path_buf())))?
                {
                    let entry = entry.map_err(|err| DictError::io(err, Some(path.to_path_buf())))?;
                    let entry_path = entry.path();
                    if entry_path.is_file() && has_extension(&entry_path, cfg) {
                        found.push(entry_path);
                    }
                }
            }
            found.sort();
            files.extend(found);
        } else {
            files.push(path.to_path_buf());
        }
    }
    if files.is_empty() {
        return Err(DictError::InvalidConfig(
            "no files discovered in provided inputs".into(),
        ));
    }
    Ok(files)
}

/// Parses one token multiset file.
pub fn read_multiset<P: AsRef<Path>>(path: P) -> Result<TokenMultiset> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|err| DictError::io(err, Some(path.to_path_buf())))?;
    serde_json::from_slice(&bytes).map_err(|err| {
        DictError::Serialization(format!("{} is not a token multiset: {err}", path.display()))
    })
}

/// Loads every discovered document, parsing files in parallel while keeping discovery order.
pub fn load_documents<P: AsRef<Path>>(
    inputs: &[P],
    cfg: &IngestConfig,
) -> Result<Vec<TokenDocument>> {
    let paths = collect_paths(inputs, cfg)?;
    debug!("loading {} token documents", paths.len());
    paths
        .into_par_iter()
        .map(|path| -> Result<TokenDocument> {
            let tokens = read_multiset(&path)?;
            Ok(TokenDocument { path, tokens })
        })
        .collect()
}
