use std::path::PathBuf;

use nm_domain::{FetchedNote, ResourceSet};
use nm_remote::{NoteResultSpec, NoteStore, ResourceSpec};

use crate::{Error, Mirror, Result};

impl<S> Mirror<S>
where
	S: NoteStore,
{
	/// Fetches the note with its markup, then every resource it references.
	pub async fn fetch_note(&self, guid: &str) -> Result<FetchedNote> {
		let fetch_err = |source: nm_remote::Error| Error::Fetch { guid: guid.to_string(), source };
		let note = self.store.fetch_note(guid, NoteResultSpec::FULL).await.map_err(fetch_err)?;
		let mut resources = ResourceSet::new();

		for reference in &note.resources {
			let resource = self
				.store
				.fetch_resource(&reference.guid, ResourceSpec::FULL)
				.await
				.map_err(fetch_err)?;

			resources.insert(resource);
		}

		Ok(FetchedNote { note, resources })
	}

	/// Renders the note and replaces its directory on disk.
	pub fn persist(&self, note: &FetchedNote) -> Result<PathBuf> {
		let html = nm_render::render_note(note).map_err(|source| Error::Render {
			guid: note.note.guid.clone(),
			title: note.note.title.clone(),
			source,
		})?;

		Ok(nm_storage::write_note(&self.base_dir, note, &html)?)
	}

	pub(crate) async fn download(&self, guid: &str) -> Result<(FetchedNote, PathBuf)> {
		let note = self.fetch_note(guid).await?;
		let dir = self.persist(&note)?;

		tracing::info!(
			guid,
			title = %note.note.title,
			revision = note.note.revision,
			dir = %dir.display(),
			"Downloaded note."
		);

		Ok((note, dir))
	}
}
