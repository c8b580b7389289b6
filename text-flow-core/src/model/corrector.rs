use std::collections::BTreeSet;

use crate::edits;
use crate::error::{Error, Result};
use crate::model::correction_scorer::CorrectionScorer;
use crate::model::vocabulary::Vocabulary;
use crate::tokenizer::{is_word, tokenize};

/// Largest supported edit distance.
pub const MAX_EDIT_DISTANCE: usize = 3;

/// Candidate generation limits.
///
/// Candidate count grows as `O((26L)^d)` for a word of `L` characters at
/// distance `d`, so long words are searched less deeply.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CorrectionConfig {
	/// Edit rounds to explore (1..=3)
	max_edit_distance: usize,

	/// Words longer than this only get distance-1 candidates
	pub max_word_len: usize,

	/// Words longer than this are searched at most at distance 2
	pub max_deep_word_len: usize,
}

impl Default for CorrectionConfig {
	fn default() -> Self {
		Self { max_edit_distance: 2, max_word_len: 24, max_deep_word_len: 6 }
	}
}

impl CorrectionConfig {
	/// Creates a configuration with the given maximum edit distance.
	///
	/// # Errors
	/// Returns `InvalidArgument` if the distance is outside `1..=3`.
	pub fn new(max_edit_distance: usize) -> Result<Self> {
		let mut config = Self::default();
		config.set_max_edit_distance(max_edit_distance)?;
		Ok(config)
	}

	pub fn max_edit_distance(&self) -> usize {
		self.max_edit_distance
	}

	/// Sets the maximum edit distance (1..=3).
	///
	/// # Errors
	/// Returns `InvalidArgument` if the value is outside the valid range.
	pub fn set_max_edit_distance(&mut self, max_edit_distance: usize) -> Result<()> {
		if !(1..=MAX_EDIT_DISTANCE).contains(&max_edit_distance) {
			return Err(Error::InvalidArgument(format!(
				"Edit distance must be between 1 and {MAX_EDIT_DISTANCE}, got {max_edit_distance}"
			)));
		}
		self.max_edit_distance = max_edit_distance;
		Ok(())
	}

	/// Edit distance actually explored for a word of `len` characters.
	pub fn distance_for(&self, len: usize) -> usize {
		if len > self.max_word_len {
			1
		} else if len > self.max_deep_word_len {
			self.max_edit_distance.min(2)
		} else {
			self.max_edit_distance
		}
	}
}

/// Outcome of a single-word correction.
#[derive(Clone, Debug, PartialEq)]
pub struct Correction {
	/// Best in-vocabulary candidate, or the original word if there was none
	pub word: String,
	/// Candidate score, `0.0` when the word was left untouched
	pub score: f64,
}

/// Context-aware single-word corrector.
///
/// # Responsibilities
/// - Generate in-vocabulary candidates within the configured edit distance
/// - Pick the candidate the [`CorrectionScorer`] rates highest
/// - Correct whole texts token by token
#[derive(Clone, Copy, Debug, Default)]
pub struct Corrector {
	config: CorrectionConfig,
}

impl Corrector {
	pub fn new(config: CorrectionConfig) -> Self {
		Self { config }
	}

	pub fn config(&self) -> &CorrectionConfig {
		&self.config
	}

	/// Returns the known words within reach of `word`, in lexicographic order.
	///
	/// The word itself is a candidate when it is known.
	pub fn candidates(&self, word: &str, vocab: &Vocabulary) -> BTreeSet<String> {
		let distance = self.config.distance_for(word.chars().count());
		edits::within(word, distance)
			.into_iter()
			.filter(|candidate| vocab.contains(candidate))
			.collect()
	}

	/// Picks the best replacement for `word` given its neighbours.
	///
	/// Returns the original word with a `0.0` score when no known candidate
	/// exists. Ties go to the lexicographically smallest candidate.
	pub fn correct_word(
		&self,
		word: &str,
		prev_word: Option<&str>,
		next_word: Option<&str>,
		vocab: &Vocabulary,
		scorer: &CorrectionScorer,
	) -> Correction {
		let mut best: Option<Correction> = None;
		for candidate in self.candidates(word, vocab) {
			let score = scorer.probability(&candidate, prev_word, next_word);
			if best.as_ref().is_none_or(|current| score > current.score) {
				best = Some(Correction { word: candidate, score });
			}
		}

		match best {
			Some(correction) => {
				log::debug!("Corrected '{word}' to '{}' (log p = {:.4})", correction.word, correction.score);
				correction
			}
			None => {
				log::debug!("No known candidate for '{word}', left unchanged");
				Correction { word: word.to_owned(), score: 0.0 }
			}
		}
	}

	/// Corrects every unknown word of `tokens`.
	///
	/// Known tokens are kept verbatim. Tokens without a letter (punctuation,
	/// numbers) are kept verbatim too, as no edit of them is meant to become a
	/// word. Neighbours are always read from `tokens`, so corrections do not
	/// cascade.
	pub fn correct_tokens(&self, tokens: &[String], vocab: &Vocabulary, scorer: &CorrectionScorer) -> Vec<String> {
		tokens
			.iter()
			.enumerate()
			.map(|(i, token)| {
				if vocab.contains(token) || !is_word(token) {
					return token.clone();
				}
				let prev_word = i.checked_sub(1).map(|j| tokens[j].as_str());
				let next_word = tokens.get(i + 1).map(String::as_str);
				self.correct_word(token, prev_word, next_word, vocab, scorer).word
			})
			.collect()
	}

	/// Tokenizes `text`, corrects it and joins the tokens with single spaces.
	pub fn correct_text(&self, text: &str, vocab: &Vocabulary, scorer: &CorrectionScorer) -> String {
		self.correct_tokens(&tokenize(text), vocab, scorer).join(" ")
	}
}
