use crate::error::{Error, Result};
use crate::model::count_table::CountTable;
use crate::model::ngram_model::log_probability;

/// Scores how well a word fits between a left and a right neighbour.
///
/// Scoring is a priority cascade, not an ensemble: each step below replaces
/// the previous score when its inputs are available, and the final score is
/// the one of the highest-order context fully available.
///
/// 1. Unigram: `log((c(w) + 1) / (Σ c + |unigrams|))`
/// 2. Previous word and bigrams: `log((c(p, w) + 1) / (c(p) + |unigrams|))`
/// 3. Next word and bigrams: `log((c(w, n) + 1) / (c(n) + |unigrams|))`,
///    which discards the previous-word score of step 2
/// 4. Both neighbours and trigrams: `log((c(p, w, n) + 1) / (c(p, n) + |bigrams|))`
///
/// Step 3 overriding step 2 is kept as is for compatibility with existing
/// tables and scores, even though it drops left-context evidence.
///
/// `|unigrams|` and `|bigrams|` are the number of distinct entries of each
/// table. Empty optional tables and empty neighbours count as absent.
#[derive(Clone, Debug)]
pub struct CorrectionScorer {
	unigrams: CountTable,
	bigrams: Option<CountTable>,
	trigrams: Option<CountTable>,
}

impl CorrectionScorer {
	/// Creates a unigram-only scorer.
	///
	/// # Errors
	/// `EmptyModel` for an empty table, `ArityMismatch` if keys are not single words.
	pub fn new(unigrams: CountTable) -> Result<Self> {
		expect_arity(&unigrams, 1)?;
		Ok(Self { unigrams, bigrams: None, trigrams: None })
	}

	/// Adds bigram evidence. An empty table leaves the scorer unchanged.
	pub fn with_bigrams(mut self, bigrams: CountTable) -> Result<Self> {
		if !bigrams.is_empty() {
			expect_arity(&bigrams, 2)?;
			self.bigrams = Some(bigrams);
		}
		Ok(self)
	}

	/// Adds trigram evidence. An empty table leaves the scorer unchanged.
	///
	/// # Errors
	/// `InvalidArgument` if no bigram table was given first (the trigram
	/// score is normalized by bigram counts).
	pub fn with_trigrams(mut self, trigrams: CountTable) -> Result<Self> {
		if !trigrams.is_empty() {
			if self.bigrams.is_none() {
				return Err(Error::InvalidArgument("trigram scoring requires a bigram table".to_owned()));
			}
			expect_arity(&trigrams, 3)?;
			self.trigrams = Some(trigrams);
		}
		Ok(self)
	}

	pub fn has_bigrams(&self) -> bool {
		self.bigrams.is_some()
	}

	pub fn has_trigrams(&self) -> bool {
		self.trigrams.is_some()
	}

	/// Smoothed log-probability of `word` between `prev_word` and `next_word`.
	pub fn probability(&self, word: &str, prev_word: Option<&str>, next_word: Option<&str>) -> f64 {
		let prev_word = prev_word.filter(|w| !w.is_empty());
		let next_word = next_word.filter(|w| !w.is_empty());
		let unigram_size = self.unigrams.len();

		let mut probability = log_probability(self.unigrams.get(&[word.to_owned()]), self.unigrams.total(), unigram_size);

		if let Some(bigrams) = &self.bigrams {
			if let Some(prev) = prev_word {
				let count = bigrams.get(&[prev.to_owned(), word.to_owned()]);
				probability = log_probability(count, self.unigrams.get(&[prev.to_owned()]), unigram_size);
			}

			if let Some(next) = next_word {
				let count = bigrams.get(&[word.to_owned(), next.to_owned()]);
				probability = log_probability(count, self.unigrams.get(&[next.to_owned()]), unigram_size);
			}

			if let (Some(prev), Some(next), Some(trigrams)) = (prev_word, next_word, &self.trigrams) {
				let count = trigrams.get(&[prev.to_owned(), word.to_owned(), next.to_owned()]);
				let context = bigrams.get(&[prev.to_owned(), next.to_owned()]);
				probability = log_probability(count, context, bigrams.len());
			}
		}

		probability
	}
}

fn expect_arity(table: &CountTable, expected: usize) -> Result<()> {
	let found = table.arity()?;
	if found != expected {
		return Err(Error::ArityMismatch { expected, found });
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	fn close(a: f64, b: f64) -> bool {
		(a - b).abs() < 1e-12
	}

	fn scorer() -> CorrectionScorer {
		let unigrams = CountTable::from_entries([(vec!["the"], 100), (vec!["cat"], 20), (vec!["sat"], 10)]).unwrap();
		let bigrams = CountTable::from_entries([(vec!["the", "cat"], 15), (vec!["cat", "sat"], 8)]).unwrap();
		let trigrams = CountTable::from_entries([(vec!["the", "cat", "sat"], 6)]).unwrap();
		CorrectionScorer::new(unigrams)
			.and_then(|s| s.with_bigrams(bigrams))
			.and_then(|s| s.with_trigrams(trigrams))
			.unwrap()
	}

	#[test]
	fn unigram_base_score() {
		// (20 + 1) / (130 + 3)
		assert!(close(scorer().probability("cat", None, None), (21.0f64 / 133.0).ln()));
	}

	#[test]
	fn previous_word_bigram() {
		// (15 + 1) / (100 + 3)
		assert!(close(scorer().probability("cat", Some("the"), None), (16.0f64 / 103.0).ln()));
	}

	#[test]
	fn next_word_bigram() {
		// (8 + 1) / (10 + 3)
		assert!(close(scorer().probability("cat", None, Some("sat")), (9.0f64 / 13.0).ln()));
	}

	#[test]
	fn trigram_wins_with_both_neighbours() {
		// (6 + 1) / (0 + 2)
		assert!(close(scorer().probability("cat", Some("the"), Some("sat")), (7.0f64 / 2.0).ln()));
	}

	#[test]
	fn next_word_overrides_previous_word_without_trigrams() {
		let unigrams = CountTable::from_entries([(vec!["the"], 100), (vec!["cat"], 20), (vec!["sat"], 10)]).unwrap();
		let bigrams = CountTable::from_entries([(vec!["the", "cat"], 15), (vec!["cat", "sat"], 8)]).unwrap();
		let scorer = CorrectionScorer::new(unigrams).and_then(|s| s.with_bigrams(bigrams)).unwrap();
		assert!(!scorer.has_trigrams());
		assert!(close(scorer.probability("cat", Some("the"), Some("sat")), scorer.probability("cat", None, Some("sat"))));
	}

	#[test]
	fn context_is_ignored_without_bigrams() {
		let unigrams = CountTable::from_entries([(vec!["teh"], 0), (vec!["the"], 100)]).unwrap();
		let scorer = CorrectionScorer::new(unigrams).unwrap();
		let base = scorer.probability("the", None, None);
		assert!(close(base, (101.0f64 / 102.0).ln()));
		assert!(close(scorer.probability("the", Some("a"), Some("b")), base));
	}

	#[test]
	fn empty_neighbours_are_absent() {
		let scorer = scorer();
		assert!(close(scorer.probability("cat", Some(""), Some("")), scorer.probability("cat", None, None)));
	}

	#[test]
	fn table_shapes_are_checked() {
		assert!(matches!(CorrectionScorer::new(CountTable::new()), Err(Error::EmptyModel)));

		let bigrams = CountTable::from_entries([(vec!["a", "b"], 1)]).unwrap();
		assert!(matches!(CorrectionScorer::new(bigrams.clone()), Err(Error::ArityMismatch { expected: 1, found: 2 })));

		let unigrams = CountTable::from_entries([(vec!["a"], 1)]).unwrap();
		let trigrams = CountTable::from_entries([(vec!["a", "b", "c"], 1)]).unwrap();
		let scorer = CorrectionScorer::new(unigrams).unwrap();
		assert!(matches!(scorer.clone().with_trigrams(trigrams), Err(Error::InvalidArgument(_))));
		assert!(!scorer.with_bigrams(CountTable::new()).unwrap().has_bigrams());
	}
}
