use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::io;
use crate::model::correction_scorer::CorrectionScorer;
use crate::model::corrector::{Correction, CorrectionConfig, Corrector};
use crate::model::count_table::CountTable;
use crate::model::ngram_model::NGramModel;
use crate::model::prediction_input::{ModelType, PredictionInput};
use crate::model::predictor::{NGramPredictor, Predictor, SequenceModel, SequenceModelPredictor};
use crate::model::vocabulary::Vocabulary;
use crate::tokenizer::tokenize;

/// Vocabulary file of a model directory.
pub const VOCABULARY_FILE: &str = "vocabulary.txt";
/// Prediction context table.
pub const NGRAM_FILE: &str = "ngram.dat";
/// Prediction continuation table.
pub const NPLUS1GRAM_FILE: &str = "nplus1gram.dat";
/// Optional correction tables.
pub const UNIGRAM_FILE: &str = "unigram.dat";
pub const BIGRAM_FILE: &str = "bigram.dat";
pub const TRIGRAM_FILE: &str = "trigram.dat";

/// High-level autocomplete and autocorrect engine.
///
/// # Responsibilities
/// - Load a vocabulary and the count tables from a model directory
/// - Correct single words or whole texts
/// - Extend a text with predicted words, optionally correcting it first
///
/// Every table is read-only once loaded, so a `TextFlow` can be shared
/// between threads and called concurrently.
pub struct TextFlow {
	vocab: Vocabulary,
	ngram_model: NGramModel,
	scorer: Option<CorrectionScorer>,
	sequence_model: Option<Box<dyn SequenceModel>>,
}

impl fmt::Debug for TextFlow {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("TextFlow")
			.field("vocabulary", &self.vocab.len())
			.field("n", &self.ngram_model.n())
			.field("correction", &self.scorer.is_some())
			.field("sequence_model", &self.sequence_model.is_some())
			.finish()
	}
}

impl TextFlow {
	/// Loads an engine from a model directory.
	///
	/// # Parameters
	/// - `filepath`: Directory containing the model files.
	///   Both `"folder"` and `"folder/"` are accepted.
	///
	/// # Behavior
	/// - `vocabulary.txt`, `ngram.dat` and `nplus1gram.dat` are required.
	/// - `unigram.dat` enables correction, `bigram.dat` and `trigram.dat`
	///   add context to it.
	/// - A table is considered present if its `.dat` or `.bin` file exists.
	///
	/// # Errors
	/// - Returns an error if the path is not a directory.
	/// - Returns an error if a required file is missing or a table fails to load.
	pub fn new<P: AsRef<Path>>(filepath: P) -> Result<Self> {
		let string_path = match filepath.as_ref().to_str() {
			Some(s) => s,
			None => return Err(Error::InvalidArgument("Invalid filepath".to_owned())),
		};
		// Normalize "folder" / "folder/"
		let folder = io::normalize_folder(string_path);

		if !folder.is_dir() {
			return Err(Error::InvalidArgument(format!("Expected a directory, got: {}", folder.display())));
		}

		let vocab = Vocabulary::load(folder.join(VOCABULARY_FILE))?;
		let ngram_model = NGramModel::new(
			Self::load_table(&folder, NGRAM_FILE)?.ok_or_else(|| missing(&folder, NGRAM_FILE))?,
			Self::load_table(&folder, NPLUS1GRAM_FILE)?.ok_or_else(|| missing(&folder, NPLUS1GRAM_FILE))?,
		)?;

		let mut text_flow = Self::from_parts(vocab, ngram_model);
		if let Some(unigrams) = Self::load_table(&folder, UNIGRAM_FILE)? {
			let mut scorer = CorrectionScorer::new(unigrams)?;
			if let Some(bigrams) = Self::load_table(&folder, BIGRAM_FILE)? {
				scorer = scorer.with_bigrams(bigrams)?;
				if let Some(trigrams) = Self::load_table(&folder, TRIGRAM_FILE)? {
					scorer = scorer.with_trigrams(trigrams)?;
				}
			}
			text_flow = text_flow.with_scorer(scorer);
		} else {
			log::warn!("No {} in {}, correction disabled", UNIGRAM_FILE, folder.display());
		}

		log::info!("Loaded {text_flow:?} from {}", folder.display());
		Ok(text_flow)
	}

	/// Loads `name` from `folder` if its text table or binary cache exists.
	fn load_table(folder: &Path, name: &str) -> Result<Option<CountTable>> {
		let path = folder.join(name);
		if !path.exists() && !io::build_output_path(&path, "bin")?.exists() {
			return Ok(None);
		}
		CountTable::load(path).map(Some)
	}

	/// Creates a prediction-only engine from already loaded parts.
	pub fn from_parts(vocab: Vocabulary, ngram_model: NGramModel) -> Self {
		Self { vocab, ngram_model, scorer: None, sequence_model: None }
	}

	/// Enables correction.
	pub fn with_scorer(mut self, scorer: CorrectionScorer) -> Self {
		self.scorer = Some(scorer);
		self
	}

	/// Registers the alternate predictor used by `ModelType::SequenceModel`.
	pub fn with_sequence_model(mut self, sequence_model: Box<dyn SequenceModel>) -> Self {
		self.sequence_model = Some(sequence_model);
		self
	}

	pub fn vocabulary(&self) -> &Vocabulary {
		&self.vocab
	}

	pub fn ngram_model(&self) -> &NGramModel {
		&self.ngram_model
	}

	/// Returns `true` if correction tables are loaded.
	pub fn can_correct(&self) -> bool {
		self.scorer.is_some()
	}

	/// Returns the predictor selected by `model`.
	///
	/// # Errors
	/// Returns `ModelUnavailable` if no sequence model was registered.
	pub fn predictor(&self, model: ModelType) -> Result<Box<dyn Predictor + '_>> {
		match model {
			ModelType::NGram => Ok(Box::new(NGramPredictor::new(&self.ngram_model, &self.vocab))),
			ModelType::SequenceModel => match &self.sequence_model {
				Some(sequence_model) => Ok(Box::new(SequenceModelPredictor::new(sequence_model.as_ref()))),
				None => Err(Error::ModelUnavailable("no sequence model registered".to_owned())),
			},
		}
	}

	fn scorer(&self) -> Result<&CorrectionScorer> {
		self.scorer
			.as_ref()
			.ok_or_else(|| Error::ModelUnavailable("no correction tables loaded".to_owned()))
	}

	/// Corrects a single word given its optional neighbours.
	///
	/// The word and its neighbours are trimmed and lower-cased first. Blank
	/// neighbours count as absent.
	///
	/// # Errors
	/// Returns `ModelUnavailable` if correction tables are not loaded.
	pub fn correct_word(
		&self,
		word: &str,
		prev_word: Option<&str>,
		next_word: Option<&str>,
		config: &CorrectionConfig,
	) -> Result<Correction> {
		let word = word.trim().to_lowercase();
		let prev_word = normalize_neighbour(prev_word);
		let next_word = normalize_neighbour(next_word);
		Ok(Corrector::new(*config).correct_word(
			&word,
			prev_word.as_deref(),
			next_word.as_deref(),
			&self.vocab,
			self.scorer()?,
		))
	}

	/// Corrects every unknown word of `text`.
	///
	/// # Errors
	/// Returns `ModelUnavailable` if correction tables are not loaded.
	pub fn correct_text(&self, text: &str, config: &CorrectionConfig) -> Result<String> {
		Ok(Corrector::new(*config).correct_text(text, &self.vocab, self.scorer()?))
	}

	/// Runs a request on `text` and returns the rendered result.
	///
	/// # Behavior
	/// - `Complete`: `text` followed by a space and the predicted words.
	/// - `Correct`: the corrected tokens joined by spaces.
	/// - `CompleteAndCorrect`: the corrected text followed by words predicted
	///   from the corrected tokens.
	///
	/// # Errors
	/// - `ModelUnavailable` if a needed model is missing
	/// - `NoCandidates` if the prefix excludes every vocabulary word
	pub fn predict(&self, text: &str, input: &PredictionInput) -> Result<String> {
		let tokens = tokenize(text);

		let (base, tokens) = if input.mode.corrects() {
			let corrected = Corrector::new(*input.correction()).correct_tokens(&tokens, &self.vocab, self.scorer()?);
			(corrected.join(" "), corrected)
		} else {
			(text.trim_end().to_owned(), tokens)
		};

		if !input.mode.completes() {
			return Ok(base);
		}

		let words = self
			.predictor(input.model)?
			.predict_words(&tokens, input.num_words(), input.prefix.as_deref())?;
		log::debug!("{} predicted {:?} for {:?}", input.model, words, text);

		Ok(render(&base, &words))
	}
}

fn missing(folder: &Path, name: &str) -> Error {
	let path: PathBuf = folder.join(name);
	Error::Io(std::io::Error::new(
		std::io::ErrorKind::NotFound,
		format!("Missing model file {}", path.display()),
	))
}

/// Appends `words` to `base`, separated by single spaces.
fn render(base: &str, words: &[String]) -> String {
	let words = words.join(" ");
	if base.is_empty() {
		words
	} else if words.is_empty() {
		base.to_owned()
	} else {
		format!("{base} {words}")
	}
}

fn normalize_neighbour(word: Option<&str>) -> Option<String> {
	word.map(|w| w.trim().to_lowercase()).filter(|w| !w.is_empty())
}
