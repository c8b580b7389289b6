use std::collections::HashMap;
use std::path::Path;
use std::sync::mpsc;
use std::thread;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::io::{build_output_path, read_file};

/// Frequency table mapping fixed-length token tuples (n-grams) to counts.
///
/// Tables are built once (from a file or from entries) and then only read.
///
/// # Invariants
/// - Every key has exactly `n` tokens
/// - `n == 0` if and only if the table is empty
/// - `total` is the sum of all counts
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct CountTable {
	/// Arity of every key (0 while empty)
	n: usize,

	/// N-gram to occurrence count
	counts: HashMap<Vec<String>, u64>,

	/// Sum of all counts
	total: u64,
}

impl CountTable {
	/// Creates an empty table. Its arity is fixed by the first insertion.
	pub fn new() -> Self {
		Self::default()
	}

	/// Builds a table from `(n-gram, count)` pairs.
	///
	/// Counts of repeated n-grams are summed.
	///
	/// # Errors
	/// Returns `ArityMismatch` if the keys do not all have the same length.
	pub fn from_entries<I, K, S>(entries: I) -> Result<Self>
	where
		I: IntoIterator<Item = (K, u64)>,
		K: IntoIterator<Item = S>,
		S: Into<String>,
	{
		let mut table = Self::new();
		for (ngram, count) in entries {
			table.insert(ngram.into_iter().map(Into::into).collect(), count)?;
		}
		Ok(table)
	}

	/// Loads a table from a text file, or from its binary cache if one exists.
	///
	/// - `filepath` is the text table (`<tokens...> <count>` per line).
	/// - The binary cache is `filepath` with a `.bin` extension, written with
	///   `postcard` after the first successful parse.
	pub fn load<P: AsRef<Path>>(filepath: P) -> Result<Self> {
		let binary_data_path = build_output_path(&filepath, "bin")?;
		if binary_data_path.exists() {
			let bytes = std::fs::read(&binary_data_path)?;
			match postcard::from_bytes::<Self>(&bytes) {
				Ok(table) => {
					log::info!("Loaded {} {}-grams from {}", table.len(), table.n, binary_data_path.display());
					return Ok(table);
				}
				Err(e) => log::warn!("Ignoring unreadable cache {}: {e}", binary_data_path.display()),
			}
		}
		Self::read_table_file(filepath, binary_data_path)
	}

	/// Parses a text table in parallel chunks, merges the partial tables and
	/// writes the binary cache.
	///
	/// # Notes
	/// - Chunk count is CPU cores * 8.
	/// - Partial tables are collected through an MPSC channel. Every chunk is
	///   received before the first error is reported, so no worker outlives
	///   the receiver.
	/// - A failure to write the cache is logged, not returned.
	fn read_table_file<PF, PB>(filename: PF, binary_data_path: PB) -> Result<Self>
	where
		PF: AsRef<Path>,
		PB: AsRef<Path>,
	{
		let lines = read_file(&filename)?;
		let chunks = num_cpus::get() * 8;
		let chunk_size = lines.len().div_ceil(chunks).max(1);

		let (tx, rx) = mpsc::channel();
		for (index, chunk) in lines.chunks(chunk_size).enumerate() {
			let tx = tx.clone();
			let chunk: Vec<String> = chunk.to_vec();
			let first_line = index * chunk_size + 1;

			thread::spawn(move || {
				// A closed receiver only means the load already failed
				let _ = tx.send(Self::parse_lines(&chunk, first_line));
			});
		}
		drop(tx);

		let partial_tables: Vec<Result<Self>> = rx.iter().collect();
		let mut table = Self::new();
		for partial_table in partial_tables {
			table.merge(&partial_table?)?;
		}

		log::info!("Parsed {} {}-grams from {}", table.len(), table.n, filename.as_ref().display());

		let bytes = postcard::to_stdvec(&table)?;
		if let Err(e) = std::fs::write(&binary_data_path, bytes) {
			log::warn!("Could not write cache {}: {e}", binary_data_path.as_ref().display());
		}

		Ok(table)
	}

	/// Parses `<token> ... <token> <count>` lines.
	///
	/// Blank lines and lines starting with `#` are skipped. `first_line` is
	/// the 1-based number of `lines[0]` in the source file, for error reports.
	fn parse_lines(lines: &[String], first_line: usize) -> Result<Self> {
		let mut table = Self::new();
		for (offset, line) in lines.iter().enumerate() {
			let line_number = first_line + offset;
			let line = line.trim();
			if line.is_empty() || line.starts_with('#') {
				continue;
			}

			let mut fields: Vec<&str> = line.split_whitespace().collect();
			let raw_count = fields.pop().unwrap_or_default();
			let count = raw_count.parse::<u64>().map_err(|e| Error::Parse {
				line: line_number,
				message: format!("invalid count '{raw_count}': {e}"),
			})?;
			if fields.is_empty() {
				return Err(Error::Parse { line: line_number, message: "missing n-gram tokens".to_owned() });
			}

			table.insert(fields.into_iter().map(str::to_owned).collect(), count)?;
		}
		Ok(table)
	}

	/// Adds `count` occurrences of `ngram`.
	///
	/// # Errors
	/// Returns `ArityMismatch` if the table already holds keys of another
	/// length, or `InvalidArgument` for an empty key.
	pub fn insert(&mut self, ngram: Vec<String>, count: u64) -> Result<()> {
		if ngram.is_empty() {
			return Err(Error::InvalidArgument("n-gram must have at least one token".to_owned()));
		}
		if self.n == 0 {
			self.n = ngram.len();
		} else if self.n != ngram.len() {
			return Err(Error::ArityMismatch { expected: self.n, found: ngram.len() });
		}

		*self.counts.entry(ngram).or_insert(0) += count;
		self.total += count;
		Ok(())
	}

	/// Returns the arity of the keys.
	///
	/// # Errors
	/// Returns `EmptyModel` if the table has no entries.
	pub fn arity(&self) -> Result<usize> {
		if self.counts.is_empty() {
			return Err(Error::EmptyModel);
		}
		Ok(self.n)
	}

	/// Returns the count of `ngram`, 0 if unseen (or of another arity).
	pub fn get(&self, ngram: &[String]) -> u64 {
		self.counts.get(ngram).copied().unwrap_or(0)
	}

	/// Number of distinct n-grams.
	pub fn len(&self) -> usize {
		self.counts.len()
	}

	pub fn is_empty(&self) -> bool {
		self.counts.is_empty()
	}

	/// Sum of all counts.
	pub fn total(&self) -> u64 {
		self.total
	}

	/// Merges another table into this one, summing counts.
	///
	/// # Errors
	/// Returns `ArityMismatch` if both tables are non-empty with different arities.
	pub fn merge(&mut self, other: &Self) -> Result<()> {
		if other.is_empty() {
			return Ok(());
		}
		if !self.is_empty() && self.n != other.n {
			return Err(Error::ArityMismatch { expected: self.n, found: other.n });
		}

		self.n = other.n;
		for (ngram, count) in &other.counts {
			*self.counts.entry(ngram.clone()).or_insert(0) += count;
		}
		self.total += other.total;
		Ok(())
	}
}
