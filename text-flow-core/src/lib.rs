//! N-gram-based autocomplete and autocorrect library.
//!
//! This crate provides:
//! - A tokenizer normalizing free-form text into word tokens
//! - Bounded edit-distance candidate generation
//! - Word-level n-gram next-word prediction with Laplace smoothing
//! - Context-aware correction of unknown words
//! - Model directory loading with binary caching
//!
//! Every operation is synchronous and pure over read-only tables: no global
//! state, no network access, and file access only in the loaders.

/// Errors and the crate-wide `Result` alias.
pub mod error;

/// Text normalization and tokenization.
pub mod tokenizer;

/// Candidate strings within a bounded edit distance.
pub mod edits;

/// Models, predictors, correction and the high-level engine.
pub mod model;

/// Caller-owned memo of rendered predictions.
pub mod cache;

/// I/O utilities (file loading, path helpers).
///
/// Not exposed
pub(crate) mod io;

pub use error::{Error, Result};
pub use model::text_flow::TextFlow;
