use nm_remote::{NoteResultSpec, NoteStore};

use crate::{Mirror, Result};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListItem {
	pub guid: String,
	pub title: String,
}

impl<S> Mirror<S>
where
	S: NoteStore,
{
	/// Titles of the given notes, fetched without bodies. Ids that fail are logged and left out.
	pub async fn list(&self, guids: &[String]) -> Vec<ListItem> {
		let mut items = Vec::with_capacity(guids.len());

		for guid in guids {
			match self.store.fetch_note(guid, NoteResultSpec::HEADER).await {
				Ok(note) => items.push(ListItem { guid: guid.clone(), title: note.title }),
				Err(err) => tracing::error!(guid = %guid, error = %err, "Failed to fetch note."),
			}
		}

		items
	}

	/// Every remote note, straight from the metadata listing.
	pub async fn list_all(&self) -> Result<Vec<ListItem>> {
		let items = self
			.all_note_metadata()
			.await?
			.into_iter()
			.map(|meta| ListItem { guid: meta.guid, title: meta.title })
			.collect();

		Ok(items)
	}
}
