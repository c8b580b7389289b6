use std::collections::HashMap;

use crate::model::corrector::CorrectionConfig;
use crate::model::prediction_input::{Mode, ModelType, PredictionInput};

/// Everything a rendered prediction depends on, besides the loaded tables.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey {
	text: String,
	mode: Mode,
	model: ModelType,
	num_words: usize,
	prefix: Option<String>,
	correction: CorrectionConfig,
}

impl CacheKey {
	pub fn new(text: &str, input: &PredictionInput) -> Self {
		Self {
			text: text.to_owned(),
			mode: input.mode,
			model: input.model,
			num_words: input.num_words(),
			prefix: input.prefix.clone(),
			correction: *input.correction(),
		}
	}
}

/// Caller-owned memo of rendered predictions.
///
/// Tables never change once loaded, so entries never go stale. When the
/// cache is full it is cleared before inserting.
#[derive(Debug)]
pub struct PredictionCache {
	capacity: usize,
	entries: HashMap<CacheKey, String>,
	hits: u64,
	misses: u64,
}

impl PredictionCache {
	/// Creates a cache holding at most `capacity` entries (0 disables it).
	pub fn new(capacity: usize) -> Self {
		Self { capacity, entries: HashMap::new(), hits: 0, misses: 0 }
	}

	/// Looks up a previous result.
	pub fn get(&mut self, key: &CacheKey) -> Option<&String> {
		match self.entries.get(key) {
			Some(value) => {
				self.hits += 1;
				Some(value)
			}
			None => {
				self.misses += 1;
				None
			}
		}
	}

	/// Stores a result.
	pub fn insert(&mut self, key: CacheKey, value: String) {
		if self.capacity == 0 {
			return;
		}
		if self.entries.len() >= self.capacity && !self.entries.contains_key(&key) {
			log::debug!("Prediction cache full ({} entries), clearing", self.entries.len());
			self.entries.clear();
		}
		self.entries.insert(key, value);
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Returns `(hits, misses)` since creation.
	pub fn stats(&self) -> (u64, u64) {
		(self.hits, self.misses)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn remembers_results_per_input() {
		let mut cache = PredictionCache::new(8);
		let input = PredictionInput::new(Mode::Complete);
		let key = CacheKey::new("i am", &input);
		assert!(cache.get(&key).is_none());
		cache.insert(key.clone(), "i am happy".to_owned());
		assert_eq!(cache.get(&key).map(String::as_str), Some("i am happy"));

		let mut other = input.clone();
		other.set_num_words(2).unwrap();
		assert!(cache.get(&CacheKey::new("i am", &other)).is_none());
		assert_eq!(cache.stats(), (1, 2));
	}

	#[test]
	fn word_length_limits_are_part_of_the_key() {
		let input = PredictionInput::new(Mode::Correct);
		let mut shallow = input.clone();
		let mut config = *input.correction();
		config.max_deep_word_len = 3;
		shallow.set_correction(config);

		let mut cache = PredictionCache::new(8);
		cache.insert(CacheKey::new("teh", &input), "the".to_owned());
		assert!(cache.get(&CacheKey::new("teh", &shallow)).is_none());

		config.max_deep_word_len = input.correction().max_deep_word_len;
		config.max_word_len = 10;
		shallow.set_correction(config);
		assert!(cache.get(&CacheKey::new("teh", &shallow)).is_none());
		assert!(cache.get(&CacheKey::new("teh", &input)).is_some());
	}

	#[test]
	fn clears_when_full() {
		let mut cache = PredictionCache::new(2);
		let input = PredictionInput::default();
		cache.insert(CacheKey::new("a", &input), "a".to_owned());
		cache.insert(CacheKey::new("b", &input), "b".to_owned());
		cache.insert(CacheKey::new("b", &input), "b".to_owned());
		assert_eq!(cache.len(), 2);
		cache.insert(CacheKey::new("c", &input), "c".to_owned());
		assert_eq!(cache.len(), 1);
	}

	#[test]
	fn zero_capacity_disables() {
		let mut cache = PredictionCache::new(0);
		cache.insert(CacheKey::new("a", &PredictionInput::default()), "a".to_owned());
		assert!(cache.is_empty());
	}
}
