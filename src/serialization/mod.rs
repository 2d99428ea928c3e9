//! Helpers for (de)serialising dictionaries into a persisted state blob.

pub mod state;

pub use state::{decode_state, encode_state, load_dictionary, save_dictionary, FORMAT_VERSION};
