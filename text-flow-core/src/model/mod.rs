//! Language models and the engine built on top of them.
//!
//! This module provides:
//! - Vocabulary and n-gram count tables (`Vocabulary`, `CountTable`)
//! - Next-word prediction (`NGramModel`, `Predictor`)
//! - Context-aware correction (`CorrectionScorer`, `Corrector`)
//! - Request configuration (`PredictionInput`)
//! - A high-level engine (`TextFlow`)

/// High-level autocomplete / autocorrect engine.
///
/// Loads a model directory and runs prediction and correction requests.
pub mod text_flow;

/// Word-level n-gram model with add-one smoothing.
///
/// Scores candidates and greedily predicts the next word(s).
pub mod ngram_model;

/// Unigram/bigram/trigram scorer used to rank corrections.
pub mod correction_scorer;

/// Edit-distance candidate generation and whole-text correction.
pub mod corrector;

/// Polymorphic next-word predictors (n-gram or external sequence model).
pub mod predictor;

/// Request configuration: mode, predictor, number of words, limits.
pub mod prediction_input;

/// N-gram frequency tables and their file loader.
pub mod count_table;

/// Ordered set of known words.
pub mod vocabulary;
