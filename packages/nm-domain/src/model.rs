use std::collections::{BTreeMap, btree_map};

/// One entry of the remote metadata listing. Only lives for a single reconciliation pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NoteMetadata {
	pub guid: String,
	pub title: String,
	pub revision: i64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Note {
	pub guid: String,
	pub title: String,
	pub revision: i64,
	/// Markup body. `None` when the note was fetched without content.
	pub content: Option<String>,
	pub resources: Vec<ResourceRef>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceRef {
	pub guid: String,
	pub body_hash: Vec<u8>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resource {
	pub guid: String,
	pub mime: String,
	pub file_name: Option<String>,
	pub body: Vec<u8>,
	pub body_hash: Vec<u8>,
	pub size: Option<u32>,
}
impl Resource {
	/// Lowercase hex of the body hash, as referenced by `hash` attributes in the markup.
	pub fn hash_key(&self) -> String {
		hex::encode(&self.body_hash)
	}

	pub fn is_image(&self) -> bool {
		self.mime.to_ascii_lowercase().starts_with("image/")
	}
}

/// The resources of one note, keyed by [`Resource::hash_key`].
#[derive(Clone, Debug, Default)]
pub struct ResourceSet {
	by_hash: BTreeMap<String, Resource>,
}
impl ResourceSet {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn insert(&mut self, resource: Resource) -> Option<Resource> {
		self.by_hash.insert(resource.hash_key(), resource)
	}

	pub fn get(&self, hash: &str) -> Option<&Resource> {
		self.by_hash.get(&hash.trim().to_ascii_lowercase())
	}

	pub fn iter(&self) -> btree_map::Values<'_, String, Resource> {
		self.by_hash.values()
	}

	pub fn len(&self) -> usize {
		self.by_hash.len()
	}

	pub fn is_empty(&self) -> bool {
		self.by_hash.is_empty()
	}
}
impl FromIterator<Resource> for ResourceSet {
	fn from_iter<I: IntoIterator<Item = Resource>>(iter: I) -> Self {
		let mut set = Self::new();

		for resource in iter {
			set.insert(resource);
		}

		set
	}
}

/// A note together with the resources its markup references.
#[derive(Clone, Debug)]
pub struct FetchedNote {
	pub note: Note,
	pub resources: ResourceSet,
}
impl FetchedNote {
	pub fn content(&self) -> &str {
		self.note.content.as_deref().unwrap_or_default()
	}
}
