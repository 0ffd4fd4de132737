//! The local index: which notes are mirrored, and at which revision.
//!
//! Stored as a pretty-printed JSON array at `<base>/repository.json`. Holds at most one entry
//! per identifier; order is insertion order and carries no meaning.

use std::{
	collections::HashMap,
	fs,
	path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{Error, Result, error::IoContext};

pub const INDEX_FILE: &str = "repository.json";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
	#[serde(alias = "guid")]
	pub identifier: String,
	#[serde(alias = "updated")]
	pub revision: i64,
	pub title: String,
}

#[derive(Clone, Debug)]
pub struct Repository {
	path: PathBuf,
	entries: Vec<Entry>,
	positions: HashMap<String, usize>,
}
impl Repository {
	/// An empty index that will be saved under `base_dir`.
	pub fn new(base_dir: &Path) -> Self {
		Self { path: base_dir.join(INDEX_FILE), entries: Vec::new(), positions: HashMap::new() }
	}

	/// Reads the index under `base_dir`. A missing file yields an empty index.
	pub fn load(base_dir: &Path) -> Result<Self> {
		let mut repo = Self::new(base_dir);

		tracing::info!(path = %repo.path.display(), "Loading repository.");

		let raw = match fs::read(&repo.path) {
			Ok(raw) => raw,
			Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
				tracing::info!(path = %repo.path.display(), "Repository not found. Starting empty.");

				return Ok(repo);
			},
			Err(err) => return Err(Error::Io { path: repo.path, source: err }),
		};
		let entries: Vec<Entry> = serde_json::from_slice(&raw)
			.map_err(|source| Error::ParseIndex { path: repo.path.clone(), source })?;

		for entry in entries {
			repo.upsert(entry);
		}

		Ok(repo)
	}

	/// Writes the index through a sibling temporary file so readers never see a partial write.
	pub fn save(&self) -> Result<()> {
		tracing::info!(path = %self.path.display(), entries = self.entries.len(), "Writing repository.");

		if let Some(dir) = self.path.parent() {
			fs::create_dir_all(dir).at(dir)?;
		}

		let payload = serde_json::to_vec_pretty(&self.entries).map_err(Error::EncodeIndex)?;
		let tmp = self.path.with_extension("json.tmp");

		fs::write(&tmp, payload).at(&tmp)?;
		fs::rename(&tmp, &self.path).at(&self.path)?;

		Ok(())
	}

	pub fn get(&self, identifier: &str) -> Option<&Entry> {
		self.positions.get(identifier).map(|&idx| &self.entries[idx])
	}

	pub fn contains(&self, identifier: &str) -> bool {
		self.positions.contains_key(identifier)
	}

	/// Inserts `entry`, replacing any entry with the same identifier in place.
	pub fn upsert(&mut self, entry: Entry) {
		match self.positions.get(&entry.identifier) {
			Some(&idx) => self.entries[idx] = entry,
			None => {
				self.positions.insert(entry.identifier.clone(), self.entries.len());
				self.entries.push(entry);
			},
		}
	}

	pub fn identifiers(&self) -> impl Iterator<Item = &str> {
		self.entries.iter().map(|entry| entry.identifier.as_str())
	}

	pub fn entries(&self) -> &[Entry] {
		&self.entries
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn entry(identifier: &str, revision: i64) -> Entry {
		Entry { identifier: identifier.to_string(), revision, title: format!("Title {identifier}") }
	}

	#[test]
	fn upsert_keeps_one_entry_per_identifier() {
		let mut repo = Repository::new(Path::new("/unused"));

		repo.upsert(entry("a", 1));
		repo.upsert(entry("b", 2));
		repo.upsert(entry("a", 5));

		assert_eq!(repo.len(), 2);
		assert_eq!(repo.get("a").map(|e| e.revision), Some(5));
		assert_eq!(repo.identifiers().collect::<Vec<_>>(), vec!["a", "b"]);
	}

	#[test]
	fn reads_legacy_field_names() {
		let raw = r#"[{"guid": "g1", "updated": 12, "title": "Old"}]"#;
		let entries: Vec<Entry> = serde_json::from_str(raw).expect("Failed to parse legacy index.");

		assert_eq!(
			entries,
			vec![Entry { identifier: "g1".to_string(), revision: 12, title: "Old".to_string() }]
		);
	}
}
