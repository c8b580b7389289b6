use std::sync::LazyLock;

use regex::Regex;

/// Links and the `@`, `#`, `!` markers, removed before anything else.
static NOISE: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"http\S+|www\.\S+|[@#!]").expect("valid noise pattern"));

/// A sentence ends on `.` or `?` followed by whitespace, or at end of text.
static SENTENCES: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"(?s).+?(?:[.?]+(?:\s+|$)|$)").expect("valid sentence pattern"));

static DISALLOWED: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"[^a-z0-9 .,]").expect("valid character class"));

/// Words keep inner `.`/`,` (`3.14`, `1,000`); trailing ones become their own token.
static TOKENS: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"[a-z0-9]+(?:[.,][a-z0-9]+)*|[.,]").expect("valid token pattern"));

/// Normalizes raw text and splits it into a flat sequence of word tokens.
///
/// - Lower-cases the whole input
/// - Strips links and the `@`, `#`, `!` markers
/// - Splits into sentences, then replaces anything outside `[a-z0-9 .,]` by a space
/// - Splits each sentence into tokens, dropping empty ones
///
/// Pure: the same input always yields the same tokens. Empty or
/// whitespace-only input yields an empty sequence.
pub fn tokenize(text: &str) -> Vec<String> {
	let lowered = text.to_lowercase();
	let cleaned = NOISE.replace_all(&lowered, "");

	let mut tokens = Vec::new();
	for sentence in SENTENCES.find_iter(&cleaned) {
		let sentence = DISALLOWED.replace_all(sentence.as_str(), " ");
		tokens.extend(TOKENS.find_iter(&sentence).map(|token| token.as_str().to_owned()));
	}
	tokens
}

/// Returns `true` if the token carries at least one ASCII letter.
///
/// Tokens made only of digits and punctuation are never corrected.
pub fn is_word(token: &str) -> bool {
	token.bytes().any(|b| b.is_ascii_lowercase())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn lowercases_and_splits_on_whitespace() {
		assert_eq!(tokenize("I am  Happy"), vec!["i", "am", "happy"]);
	}

	#[test]
	fn empty_and_blank_input_yield_nothing() {
		assert!(tokenize("").is_empty());
		assert!(tokenize("   \n\t ").is_empty());
	}

	#[test]
	fn strips_links_and_markers() {
		assert_eq!(
			tokenize("see https://example.com/x?y=1 now! @bob #rust"),
			vec!["see", "now", "bob", "rust"]
		);
		assert_eq!(tokenize("visit www.example.org today"), vec!["visit", "today"]);
	}

	#[test]
	fn replaces_disallowed_characters() {
		assert_eq!(tokenize("don't stop-me"), vec!["don", "t", "stop", "me"]);
	}

	#[test]
	fn keeps_punctuation_as_tokens_across_sentences() {
		assert_eq!(
			tokenize("Hello, world. How are you? Fine."),
			vec!["hello", ",", "world", ".", "how", "are", "you", "fine", "."]
		);
	}

	#[test]
	fn keeps_numbers_with_inner_separators() {
		assert_eq!(tokenize("pi is 3.14 and 1,000 more"), vec!["pi", "is", "3.14", "and", "1,000", "more"]);
	}

	#[test]
	fn is_pure() {
		let text = "The quick brown fox. Jumps over, the lazy dog!";
		assert_eq!(tokenize(text), tokenize(text));
	}

	#[test]
	fn detects_words() {
		assert!(is_word("teh"));
		assert!(is_word("a1"));
		assert!(!is_word("3.14"));
		assert!(!is_word(","));
	}
}
