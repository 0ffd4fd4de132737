//! Brings a local directory tree in line with the remote note set.
//!
//! [`Mirror`] owns the note store and the base directory. `sync` diffs the remote listing
//! against `repository.json`; `duplicate` and `list` work on explicit ids and never read the
//! index.

pub mod duplicate;
pub mod fetch;
pub mod list;
pub mod sync;

mod error;

pub use duplicate::DuplicateReport;
pub use error::{Error, Result};
pub use list::ListItem;
pub use sync::{SyncReport, is_current};

use std::path::{Path, PathBuf};

use nm_domain::NoteMetadata;
use nm_remote::NoteStore;

pub const DEFAULT_PAGE_SIZE: u32 = 100;

pub struct Mirror<S> {
	store: S,
	base_dir: PathBuf,
	page_size: u32,
}
impl<S> Mirror<S>
where
	S: NoteStore,
{
	pub fn new(store: S, base_dir: impl Into<PathBuf>) -> Self {
		Self { store, base_dir: base_dir.into(), page_size: DEFAULT_PAGE_SIZE }
	}

	/// Listing page size. Zero would never make progress and is raised to one.
	pub fn with_page_size(mut self, page_size: u32) -> Self {
		self.page_size = page_size.max(1);

		self
	}

	pub fn store(&self) -> &S {
		&self.store
	}

	pub fn base_dir(&self) -> &Path {
		&self.base_dir
	}

	/// Pages through the remote listing until a page comes back empty.
	pub async fn all_note_metadata(&self) -> Result<Vec<NoteMetadata>> {
		let mut all = Vec::new();
		let mut offset = 0_u32;

		loop {
			let page = self
				.store
				.list_note_metadata(offset, self.page_size)
				.await
				.map_err(|source| Error::Listing { offset, source })?;

			if page.is_empty() {
				break;
			}

			tracing::debug!(offset, count = page.len(), "Fetched metadata page.");

			offset = offset.saturating_add(u32::try_from(page.len()).unwrap_or(u32::MAX));

			all.extend(page);
		}

		tracing::info!(count = all.len(), "Listed remote notes.");

		Ok(all)
	}

	pub async fn all_guids(&self) -> Result<Vec<String>> {
		Ok(self.all_note_metadata().await?.into_iter().map(|meta| meta.guid).collect())
	}
}
