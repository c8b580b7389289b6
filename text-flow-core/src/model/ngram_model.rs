use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::model::count_table::CountTable;
use crate::model::vocabulary::Vocabulary;

/// Word-level n-gram model for next-word prediction.
///
/// The model scores every vocabulary word `w` after a context with
/// add-one (Laplace) smoothing:
///
/// `log((count(last_ngram + w) + 1) / (count(last_ngram) + |candidates|))`
///
/// where `last_ngram` is the last `n` context tokens and `|candidates|` is
/// the size of the (possibly prefix-filtered) vocabulary.
///
/// # Responsibilities
/// - Hold the n-gram (context) and (n+1)-gram (continuation) tables
/// - Score candidates and select the most probable next word
/// - Greedily extend a context by several words
///
/// # Invariants
/// - Both tables are non-empty
/// - The continuation table arity is exactly `n + 1`
#[derive(Clone, Debug)]
pub struct NGramModel {
	/// Context length, inferred from the n-gram table keys
	n: usize,

	/// Counts of `n`-token contexts
	ngrams: CountTable,

	/// Counts of `n`-token contexts followed by a word
	nplus1grams: CountTable,
}

/// Outcome of a single next-word prediction.
#[derive(Clone, Debug, PartialEq)]
pub struct Prediction {
	/// Highest-scoring candidate
	pub word: String,
	/// Its smoothed log-probability
	pub log_probability: f64,
	/// Score of every candidate considered
	pub probabilities: HashMap<String, f64>,
}

/// Add-one smoothed log-probability of a continuation.
///
/// Non-decreasing in `nplus1gram_count` for fixed `ngram_count` and `vocab_size`.
pub fn log_probability(nplus1gram_count: u64, ngram_count: u64, vocab_size: usize) -> f64 {
	((nplus1gram_count + 1) as f64 / (ngram_count + vocab_size as u64) as f64).ln()
}

impl NGramModel {
	/// Creates a model from its context and continuation tables.
	///
	/// # Errors
	/// - `EmptyModel` if the context table is empty (arity cannot be inferred)
	/// - `ArityMismatch` if the continuation table is not of arity `n + 1`
	///
	/// An empty continuation table is accepted: every candidate then gets
	/// the same smoothed score.
	pub fn new(ngrams: CountTable, nplus1grams: CountTable) -> Result<Self> {
		let n = ngrams.arity()?;
		if !nplus1grams.is_empty() {
			let found = nplus1grams.arity()?;
			if found != n + 1 {
				return Err(Error::ArityMismatch { expected: n + 1, found });
			}
		}
		log::debug!("N-gram model ready: n = {n}, {} contexts, {} continuations", ngrams.len(), nplus1grams.len());
		Ok(Self { n, ngrams, nplus1grams })
	}

	/// Number of context tokens the model looks at.
	pub fn n(&self) -> usize {
		self.n
	}

	/// Returns the last `n` tokens of `tokens` (all of them if shorter).
	pub fn last_ngram<'a>(&self, tokens: &'a [String]) -> &'a [String] {
		&tokens[tokens.len().saturating_sub(self.n)..]
	}

	/// Smoothed log-probability of `word` following `last_ngram`.
	pub fn probability(&self, word: &str, last_ngram: &[String], vocab_size: usize) -> f64 {
		let mut key = last_ngram.to_vec();
		key.push(word.to_owned());
		log_probability(self.nplus1grams.get(&key), self.ngrams.get(last_ngram), vocab_size)
	}

	/// Predicts the most probable word following `tokens`.
	///
	/// - `prefix` restricts candidates to vocabulary words starting with it.
	/// - Ties go to the candidate stored first in the vocabulary.
	///
	/// # Errors
	/// - `NoCandidates` if the (filtered) vocabulary is empty
	/// - `InvalidArgument` if a context token is empty
	pub fn predict_next(&self, tokens: &[String], vocab: &Vocabulary, prefix: Option<&str>) -> Result<Prediction> {
		if tokens.iter().any(String::is_empty) {
			return Err(Error::InvalidArgument("context tokens must not be empty".to_owned()));
		}

		let candidates = vocab.with_prefix(prefix);
		if candidates.is_empty() {
			return Err(Error::NoCandidates { prefix: prefix.unwrap_or_default().to_owned() });
		}

		let last_ngram = self.last_ngram(tokens);
		let ngram_count = self.ngrams.get(last_ngram);
		let vocab_size = candidates.len();

		// Reused key buffer: the context followed by the candidate
		let mut key = last_ngram.to_vec();
		key.push(String::new());

		let mut probabilities = HashMap::with_capacity(vocab_size);
		let mut best: Option<(&str, f64)> = None;
		for word in candidates {
			if let Some(last) = key.last_mut() {
				last.clear();
				last.push_str(word);
			}
			let probability = log_probability(self.nplus1grams.get(&key), ngram_count, vocab_size);
			probabilities.insert(word.to_owned(), probability);

			match best {
				Some((_, best_probability)) if best_probability >= probability => (),
				_ => best = Some((word, probability)),
			}
		}

		// Should not fail, there is at least one candidate
		let (word, log_probability) = best.ok_or(Error::NoCandidates { prefix: prefix.unwrap_or_default().to_owned() })?;
		log::debug!("Predicted '{word}' after {last_ngram:?} (log p = {log_probability:.4})");

		Ok(Prediction { word: word.to_owned(), log_probability, probabilities })
	}

	/// Greedily predicts `k` words following `tokens`.
	///
	/// Each predicted word is appended to a private copy of the context
	/// before the next step; earlier choices are never revisited. `prefix`
	/// only filters the first word. `k == 0` yields an empty sequence.
	pub fn predict_next_k(&self, tokens: &[String], vocab: &Vocabulary, k: usize, prefix: Option<&str>) -> Result<Vec<String>> {
		let mut context = tokens.to_vec();
		let mut words = Vec::with_capacity(k);

		for step in 0..k {
			let prefix = if step == 0 { prefix } else { None };
			let prediction = self.predict_next(&context, vocab, prefix)?;
			context.push(prediction.word.clone());
			words.push(prediction.word);
		}

		Ok(words)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn tokens(words: &[&str]) -> Vec<String> {
		words.iter().map(|w| w.to_string()).collect()
	}

	fn model() -> NGramModel {
		let ngrams = CountTable::from_entries([(vec!["i", "am"], 10), (vec!["am", "happy"], 5)]).unwrap();
		let nplus1grams = CountTable::from_entries([(vec!["i", "am", "happy"], 8), (vec!["am", "happy", "sad"], 3)]).unwrap();
		NGramModel::new(ngrams, nplus1grams).unwrap()
	}

	fn vocab() -> Vocabulary {
		["happy", "sad"].into_iter().collect()
	}

	#[test]
	fn infers_arity() {
		assert_eq!(model().n(), 2);
	}

	#[test]
	fn empty_context_table_is_rejected() {
		let nplus1grams = CountTable::from_entries([(vec!["i", "am", "happy"], 8)]).unwrap();
		assert!(matches!(NGramModel::new(CountTable::new(), nplus1grams), Err(Error::EmptyModel)));
	}

	#[test]
	fn empty_continuation_table_scores_uniformly() {
		let ngrams = CountTable::from_entries([(vec!["i", "am"], 8)]).unwrap();
		let model = NGramModel::new(ngrams, CountTable::new()).unwrap();
		assert_eq!(model.n(), 2);

		let prediction = model.predict_next(&tokens(&["i", "am"]), &vocab(), None).unwrap();
		let expected = (1.0f64 / 10.0).ln();
		assert!(prediction.probabilities.values().all(|p| (p - expected).abs() < 1e-12));
		// Ties follow vocabulary order
		assert_eq!(prediction.word, "happy");
	}

	#[test]
	fn continuation_arity_must_follow() {
		let ngrams = CountTable::from_entries([(vec!["i", "am"], 8)]).unwrap();
		let wrong = CountTable::from_entries([(vec!["i", "am"], 8)]).unwrap();
		assert!(matches!(NGramModel::new(ngrams, wrong), Err(Error::ArityMismatch { expected: 3, found: 2 })));
	}

	#[test]
	fn probability_is_smoothed() {
		let model = model();
		let context = tokens(&["i", "am"]);
		assert!((model.probability("happy", &context, 2) - (9.0f64 / 12.0).ln()).abs() < 1e-12);
		assert!((model.probability("sad", &context, 2) - (1.0f64 / 12.0).ln()).abs() < 1e-12);
	}

	#[test]
	fn probability_is_monotonic_in_continuation_count() {
		let mut previous = f64::NEG_INFINITY;
		for count in 0..50 {
			let p = log_probability(count, 10, 100);
			assert!(p >= previous);
			previous = p;
		}
	}

	#[test]
	fn predicts_most_frequent_continuation() {
		let prediction = model().predict_next(&tokens(&["i", "am"]), &vocab(), None).unwrap();
		assert_eq!(prediction.word, "happy");
		assert_eq!(prediction.probabilities.len(), 2);
		assert!(prediction.probabilities["happy"] > prediction.probabilities["sad"]);
		assert_eq!(prediction.log_probability, prediction.probabilities["happy"]);
	}

	#[test]
	fn uses_only_the_last_n_tokens() {
		let prediction = model().predict_next(&tokens(&["well", "i", "am"]), &vocab(), None).unwrap();
		assert_eq!(prediction.word, "happy");
	}

	#[test]
	fn ties_follow_vocabulary_order() {
		let vocabulary: Vocabulary = ["sad", "glad", "happy"].into_iter().collect();
		let prediction = model().predict_next(&tokens(&["you", "are"]), &vocabulary, None).unwrap();
		assert_eq!(prediction.word, "sad");
	}

	#[test]
	fn prefix_filters_candidates() {
		let prediction = model().predict_next(&tokens(&["i", "am"]), &vocab(), Some("s")).unwrap();
		assert_eq!(prediction.word, "sad");
		assert_eq!(prediction.probabilities.len(), 1);
		// Normalized by the filtered vocabulary size
		assert!((prediction.log_probability - (1.0f64 / 11.0).ln()).abs() < 1e-12);

		let result = model().predict_next(&tokens(&["i", "am"]), &vocab(), Some("x"));
		assert!(matches!(result, Err(Error::NoCandidates { .. })));
	}

	#[test]
	fn rejects_empty_tokens() {
		let result = model().predict_next(&tokens(&["i", ""]), &vocab(), None);
		assert!(matches!(result, Err(Error::InvalidArgument(_))));
	}

	#[test]
	fn predicts_greedily() {
		let context = tokens(&["i", "am"]);
		let words = model().predict_next_k(&context, &vocab(), 2, None).unwrap();
		assert_eq!(words, vec!["happy", "sad"]);
		// The caller's context is untouched
		assert_eq!(context, tokens(&["i", "am"]));
	}

	#[test]
	fn zero_words_is_empty() {
		assert!(model().predict_next_k(&tokens(&["i", "am"]), &vocab(), 0, None).unwrap().is_empty());
	}
}
