use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::model::corrector::CorrectionConfig;

/// Largest number of words a single request may predict.
pub const MAX_NUM_WORDS: usize = 10;

/// What a request does with the input text.
///
/// # Variants
/// - `Complete`: append predicted words to the text.
/// - `Correct`: only correct unknown words.
/// - `CompleteAndCorrect`: correct first, then predict from the corrected text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Mode {
	#[default]
	Complete,
	Correct,
	CompleteAndCorrect,
}

impl Mode {
	/// Returns `true` if the mode runs the corrector.
	pub fn corrects(self) -> bool {
		matches!(self, Mode::Correct | Mode::CompleteAndCorrect)
	}

	/// Returns `true` if the mode predicts new words.
	pub fn completes(self) -> bool {
		matches!(self, Mode::Complete | Mode::CompleteAndCorrect)
	}
}

impl FromStr for Mode {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self> {
		match s.to_lowercase().as_str() {
			"complete" => Ok(Mode::Complete),
			"correct" => Ok(Mode::Correct),
			"complete_and_correct" | "both" => Ok(Mode::CompleteAndCorrect),
			_ => Err(Error::InvalidArgument(format!(
				"Mode must be 'complete', 'correct' or 'complete_and_correct', got '{s}'"
			))),
		}
	}
}

impl fmt::Display for Mode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Mode::Complete => write!(f, "complete"),
			Mode::Correct => write!(f, "correct"),
			Mode::CompleteAndCorrect => write!(f, "complete_and_correct"),
		}
	}
}

/// Which predictor extends the text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum ModelType {
	#[default]
	NGram,
	SequenceModel,
}

impl FromStr for ModelType {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self> {
		match s.to_lowercase().as_str() {
			"ngram" | "n-gram" => Ok(ModelType::NGram),
			"sequence" | "lstm" => Ok(ModelType::SequenceModel),
			_ => Err(Error::InvalidArgument(format!("Model must be 'ngram' or 'sequence', got '{s}'"))),
		}
	}
}

impl fmt::Display for ModelType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ModelType::NGram => write!(f, "ngram"),
			ModelType::SequenceModel => write!(f, "sequence"),
		}
	}
}

/// Input parameters of a prediction or correction request.
///
/// # Responsibilities
/// - Select the mode and the predictor
/// - Track the number of words to predict and the interactive prefix
/// - Carry the corrector limits
///
/// # Invariants
/// - `num_words` is within `1..=MAX_NUM_WORDS`
#[derive(Clone, Debug, PartialEq)]
pub struct PredictionInput {
	/// What to do with the text.
	pub mode: Mode,

	/// Predictor used when completing.
	pub model: ModelType,

	/// Start of the word being typed, filters the first predicted word.
	pub prefix: Option<String>,

	/// Number of words to predict.
	num_words: usize,

	/// Candidate generation limits for correction.
	correction: CorrectionConfig,
}

impl Default for PredictionInput {
	fn default() -> Self {
		Self {
			mode: Mode::default(),
			model: ModelType::default(),
			prefix: None,
			num_words: 1,
			correction: CorrectionConfig::default(),
		}
	}
}

impl PredictionInput {
	/// Creates an input for `mode` with default settings.
	pub fn new(mode: Mode) -> Self {
		Self { mode, ..Self::default() }
	}

	/// Returns the number of words to predict.
	pub fn num_words(&self) -> usize {
		self.num_words
	}

	/// Returns the corrector limits.
	pub fn correction(&self) -> &CorrectionConfig {
		&self.correction
	}

	/// Sets the number of words to predict (1..=10).
	///
	/// # Errors
	/// Returns an error if the value is outside the valid range.
	pub fn set_num_words(&mut self, num_words: usize) -> Result<()> {
		if !(1..=MAX_NUM_WORDS).contains(&num_words) {
			return Err(Error::InvalidArgument(format!(
				"Number of words must be between 1 and {MAX_NUM_WORDS}, got {num_words}"
			)));
		}
		self.num_words = num_words;
		Ok(())
	}

	/// Sets the maximum edit distance of the corrector (1..=3).
	///
	/// # Errors
	/// Returns an error if the value is outside the valid range.
	pub fn set_max_edit_distance(&mut self, max_edit_distance: usize) -> Result<()> {
		self.correction.set_max_edit_distance(max_edit_distance)
	}

	/// Replaces the corrector limits as a whole.
	pub fn set_correction(&mut self, correction: CorrectionConfig) {
		self.correction = correction;
	}

	/// Sets the interactive prefix. Empty or blank prefixes clear it.
	pub fn set_prefix(&mut self, prefix: Option<&str>) {
		self.prefix = prefix
			.map(|p| p.trim().to_lowercase())
			.filter(|p| !p.is_empty());
	}
}
