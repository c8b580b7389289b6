use crate::error::Result;
use crate::model::ngram_model::NGramModel;
use crate::model::vocabulary::Vocabulary;

/// Something able to extend a token sequence by one or more words.
pub trait Predictor {
	/// Predicts `num_words` words following `tokens`.
	///
	/// `prefix`, when given, constrains the first predicted word.
	fn predict_words(&self, tokens: &[String], num_words: usize, prefix: Option<&str>) -> Result<Vec<String>>;
}

/// Externally provided sequence model (e.g. a neural network).
///
/// Its own tokenization and padding conventions are opaque: it receives the
/// context as plain text.
pub trait SequenceModel: Send + Sync {
	/// Predicts `num_words` words following `seed`.
	fn predict(&self, seed: &str, num_words: usize) -> Result<Vec<String>>;
}

/// [`Predictor`] backed by an [`NGramModel`] and a vocabulary.
pub struct NGramPredictor<'a> {
	model: &'a NGramModel,
	vocab: &'a Vocabulary,
}

impl<'a> NGramPredictor<'a> {
	pub fn new(model: &'a NGramModel, vocab: &'a Vocabulary) -> Self {
		Self { model, vocab }
	}
}

impl Predictor for NGramPredictor<'_> {
	fn predict_words(&self, tokens: &[String], num_words: usize, prefix: Option<&str>) -> Result<Vec<String>> {
		if num_words == 1 {
			let prediction = self.model.predict_next(tokens, self.vocab, prefix)?;
			return Ok(vec![prediction.word]);
		}
		self.model.predict_next_k(tokens, self.vocab, num_words, prefix)
	}
}

/// [`Predictor`] delegating to a [`SequenceModel`].
///
/// The prefix filter is not forwarded: the model's vocabulary is opaque.
pub struct SequenceModelPredictor<'a> {
	model: &'a dyn SequenceModel,
}

impl<'a> SequenceModelPredictor<'a> {
	pub fn new(model: &'a dyn SequenceModel) -> Self {
		Self { model }
	}
}

impl Predictor for SequenceModelPredictor<'_> {
	fn predict_words(&self, tokens: &[String], num_words: usize, _prefix: Option<&str>) -> Result<Vec<String>> {
		if num_words == 0 {
			return Ok(Vec::new());
		}
		self.model.predict(&tokens.join(" "), num_words)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::count_table::CountTable;

	/// Repeats the last seed word.
	struct Echo;

	impl SequenceModel for Echo {
		fn predict(&self, seed: &str, num_words: usize) -> Result<Vec<String>> {
			let last = seed.split(' ').next_back().unwrap_or_default();
			Ok(vec![last.to_owned(); num_words])
		}
	}

	fn tokens(words: &[&str]) -> Vec<String> {
		words.iter().map(|w| w.to_string()).collect()
	}

	#[test]
	fn ngram_predictor_handles_one_and_many_words() {
		let ngrams = CountTable::from_entries([(vec!["i", "am"], 10)]).unwrap();
		let nplus1grams = CountTable::from_entries([(vec!["i", "am", "happy"], 8)]).unwrap();
		let model = NGramModel::new(ngrams, nplus1grams).unwrap();
		let vocab: Vocabulary = ["happy", "sad"].into_iter().collect();
		let predictor = NGramPredictor::new(&model, &vocab);

		assert_eq!(predictor.predict_words(&tokens(&["i", "am"]), 1, None).unwrap(), vec!["happy"]);
		assert_eq!(predictor.predict_words(&tokens(&["i", "am"]), 3, None).unwrap().len(), 3);
		assert!(predictor.predict_words(&tokens(&["i", "am"]), 0, None).unwrap().is_empty());
	}

	#[test]
	fn sequence_predictor_forwards_plain_text() {
		let predictor = SequenceModelPredictor::new(&Echo);
		assert_eq!(predictor.predict_words(&tokens(&["hello", "there"]), 2, Some("x")).unwrap(), vec!["there", "there"]);
		assert!(predictor.predict_words(&tokens(&["hello"]), 0, None).unwrap().is_empty());
	}
}
