use std::collections::HashSet;
use std::path::Path;

use crate::error::Result;
use crate::io::read_file;

/// Ordered set of known words.
///
/// Stored order is significant: prediction ties are broken in favour of
/// the word that appears first.
///
/// # Invariants
/// - Words are non-empty, trimmed and lower-cased
/// - Each word appears once (first occurrence wins)
#[derive(Clone, Debug, Default)]
pub struct Vocabulary {
	words: Vec<String>,
	index: HashSet<String>,
}

impl Vocabulary {
	/// Loads a vocabulary file, one word per line.
	///
	/// Lines are trimmed and lower-cased; blank lines are skipped.
	pub fn load<P: AsRef<Path>>(filepath: P) -> Result<Self> {
		let vocabulary: Self = read_file(&filepath)?.into_iter().collect();
		log::info!("Loaded {} vocabulary words from {}", vocabulary.len(), filepath.as_ref().display());
		Ok(vocabulary)
	}

	/// Returns `true` if `word` is a known word.
	pub fn contains(&self, word: &str) -> bool {
		self.index.contains(word)
	}

	/// Number of distinct words.
	pub fn len(&self) -> usize {
		self.words.len()
	}

	pub fn is_empty(&self) -> bool {
		self.words.is_empty()
	}

	/// Iterates over the words in stored order.
	pub fn iter(&self) -> impl Iterator<Item = &str> {
		self.words.iter().map(String::as_str)
	}

	/// Returns the words starting with `prefix`, in stored order.
	///
	/// `None` keeps every word.
	pub fn with_prefix<'a>(&'a self, prefix: Option<&str>) -> Vec<&'a str> {
		match prefix {
			Some(prefix) => self.iter().filter(|word| word.starts_with(prefix)).collect(),
			None => self.iter().collect(),
		}
	}
}

impl<S: AsRef<str>> FromIterator<S> for Vocabulary {
	fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
		let mut vocabulary = Self::default();
		for word in iter {
			let word = word.as_ref().trim().to_lowercase();
			if word.is_empty() || vocabulary.index.contains(&word) {
				continue;
			}
			vocabulary.index.insert(word.clone());
			vocabulary.words.push(word);
		}
		vocabulary
	}
}
