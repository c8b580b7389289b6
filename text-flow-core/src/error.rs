/// Errors produced by the prediction and correction engine.
///
/// Correction never fails for lack of candidates: the original token is
/// returned unchanged instead, so there is no variant for it.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	/// A count table has no entries, so its arity cannot be inferred.
	#[error("Count table is empty, n-gram arity cannot be inferred")]
	EmptyModel,

	/// The prefix filter excluded every vocabulary word.
	#[error("No vocabulary word starts with '{prefix}'")]
	NoCandidates { prefix: String },

	/// A caller passed an argument outside its valid range.
	#[error("Invalid argument: {0}")]
	InvalidArgument(String),

	/// A count table key does not have the expected number of tokens.
	#[error("N-gram arity mismatch: expected {expected}, found {found}")]
	ArityMismatch { expected: usize, found: usize },

	/// A line of a text count table could not be parsed.
	#[error("Parse error at line {line}: {message}")]
	Parse { line: usize, message: String },

	/// The requested predictor was not registered.
	#[error("Model unavailable: {0}")]
	ModelUnavailable(String),

	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	#[error("Serialization error: {0}")]
	Serialization(#[from] postcard::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
