use std::collections::HashSet;

/// Letters used for replacements and insertions.
pub const ALPHABET: &str = "abcdefghijklmnopqrstuvwxyz";

/// Returns every string exactly one edit away from `word`.
///
/// Edits are deletions, adjacent transpositions, replacements and
/// insertions, applied at every position with every letter of [`ALPHABET`].
/// For a word of `L` characters the result holds at most
/// `L + (L - 1) + 26L + 26(L + 1)` strings before duplicates collapse.
///
/// # Notes
/// - Works on characters, not bytes (UTF-8 safe).
/// - The original word may appear in the result (e.g. replacing a letter by itself).
pub fn edits1(word: &str) -> HashSet<String> {
	let chars: Vec<char> = word.chars().collect();
	let len = chars.len();
	let mut edits: HashSet<String> = HashSet::with_capacity(54 * len + 25);

	for i in 0..=len {
		let (left, right) = chars.split_at(i);

		if !right.is_empty() {
			// Delete
			edits.insert(left.iter().chain(&right[1..]).collect());

			// Replace
			for c in ALPHABET.chars() {
				edits.insert(left.iter().chain(std::iter::once(&c)).chain(&right[1..]).collect());
			}
		}

		// Transpose
		if right.len() > 1 {
			edits.insert(
				left.iter()
					.chain(std::iter::once(&right[1]))
					.chain(std::iter::once(&right[0]))
					.chain(&right[2..])
					.collect(),
			);
		}

		// Insert
		for c in ALPHABET.chars() {
			edits.insert(left.iter().chain(std::iter::once(&c)).chain(right).collect());
		}
	}

	edits
}

/// Returns the image of [`edits1`] under [`edits1`].
///
/// This is not a superset of `edits1(word)` in general, and the original
/// word and the empty string are not excluded.
pub fn edits2(word: &str) -> HashSet<String> {
	expand(&edits1(word))
}

/// Returns the image of [`edits2`] under [`edits1`].
///
/// Cost grows as `O((26L)^3)`; callers should bound `L` before using it
/// on untrusted input.
pub fn edits3(word: &str) -> HashSet<String> {
	expand(&edits2(word))
}

/// Returns `word` together with every edit up to `max_distance` rounds away.
///
/// Each round expands only the previous round's strings, so distance 2 does
/// not recompute distance 1.
pub fn within(word: &str, max_distance: usize) -> HashSet<String> {
	let mut all = HashSet::from([word.to_owned()]);
	let mut frontier = all.clone();
	for _ in 0..max_distance {
		frontier = expand(&frontier);
		all.extend(frontier.iter().cloned());
	}
	all
}

fn expand(words: &HashSet<String>) -> HashSet<String> {
	words.iter().flat_map(|word| edits1(word)).collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn empty_word_only_has_inserts() {
		let edits = edits1("");
		assert_eq!(edits.len(), 26);
		assert!(edits.iter().all(|e| e.chars().count() == 1));
	}

	#[test]
	fn one_letter_word() {
		let edits = edits1("a");
		// "" + 26 replaces (incl. "a") + 52 inserts, minus "aa" counted twice
		assert!(edits.contains(""));
		assert!(edits.contains("a"));
		assert!(edits.contains("b"));
		assert!(edits.contains("ab"));
		assert!(edits.contains("ba"));
		assert_eq!(edits.len(), 1 + 26 + 51);
	}

	#[test]
	fn covers_every_edit_kind() {
		let edits = edits1("teh");
		assert!(edits.contains("th")); // delete
		assert!(edits.contains("the")); // transpose
		assert!(edits.contains("ten")); // replace
		assert!(edits.contains("tech")); // insert
		assert!(!edits.contains("hte"));
	}

	#[test]
	fn size_is_bounded() {
		for word in ["a", "word", "spelling", "abcdefghij"] {
			let l = word.len();
			assert!(edits1(word).len() <= l + (l - 1) + 26 * l + 26 * (l + 1));
		}
	}

	#[test]
	fn edits2_is_image_of_edits1() {
		let word = "ab";
		let expected: HashSet<String> = edits1(word).iter().flat_map(|e| edits1(e)).collect();
		assert_eq!(edits2(word), expected);
		assert!(edits2(word).contains("ba"));
		assert!(edits2(word).contains("xyab"));
	}

	#[test]
	fn edits3_reaches_three_away() {
		assert!(edits3("ab").contains("abcde"));
		assert!(!edits2("ab").contains("abcde"));
	}

	#[test]
	fn within_is_the_union_of_rounds() {
		let word = "cat";
		let mut expected = HashSet::from([word.to_owned()]);
		expected.extend(edits1(word));
		expected.extend(edits2(word));
		assert_eq!(within(word, 2), expected);
		assert_eq!(within(word, 0), HashSet::from([word.to_owned()]));
	}

	#[test]
	fn utf8_safe() {
		let edits = edits1("né");
		assert!(edits.contains("n"));
		assert!(edits.contains("én"));
	}
}
