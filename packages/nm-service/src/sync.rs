use nm_domain::NoteMetadata;
use nm_remote::NoteStore;
use nm_storage::{Entry, Repository};

use crate::{Mirror, Result};

/// What one reconciliation pass did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SyncReport {
	pub downloaded: Vec<String>,
	pub up_to_date: usize,
	pub deleted: Vec<String>,
}

impl<S> Mirror<S>
where
	S: NoteStore,
{
	/// One reconciliation pass.
	///
	/// Notes whose indexed revision is at least the remote one are kept as they are; every
	/// other note is downloaded again. Directories of notes that vanished remotely are removed.
	/// The index is written only once every step has succeeded, so any error leaves the previous
	/// index in place.
	pub async fn sync(&self) -> Result<SyncReport> {
		let old = Repository::load(&self.base_dir)?;
		let remote = self.all_note_metadata().await?;
		let mut next = Repository::new(&self.base_dir);
		let mut report = SyncReport::default();

		for meta in &remote {
			if let Some(entry) = old.get(&meta.guid)
				&& is_current(entry, meta)
			{
				tracing::debug!(guid = %meta.guid, title = %meta.title, "Note is up to date.");

				next.upsert(entry.clone());

				report.up_to_date += 1;

				continue;
			}

			let (note, _) = self.download(&meta.guid).await?;

			next.upsert(Entry {
				identifier: meta.guid.clone(),
				revision: note.note.revision,
				title: note.note.title,
			});
			report.downloaded.push(meta.guid.clone());
		}

		for entry in old.entries() {
			if next.contains(&entry.identifier) {
				continue;
			}

			tracing::info!(guid = %entry.identifier, title = %entry.title, "Note removed remotely.");

			nm_storage::remove_note_dir(&self.base_dir, &entry.title, &entry.identifier)?;

			report.deleted.push(entry.identifier.clone());
		}

		next.save()?;

		tracing::info!(
			downloaded = report.downloaded.len(),
			up_to_date = report.up_to_date,
			deleted = report.deleted.len(),
			"Sync finished."
		);

		Ok(report)
	}
}

/// Whether the local copy described by `entry` is as new as the remote note. Equal revisions
/// count as current.
pub fn is_current(entry: &Entry, meta: &NoteMetadata) -> bool {
	entry.revision >= meta.revision
}

#[cfg(test)]
mod tests {
	use super::*;

	fn entry(revision: i64) -> Entry {
		Entry { identifier: "g".to_string(), revision, title: "t".to_string() }
	}

	fn meta(revision: i64) -> NoteMetadata {
		NoteMetadata { guid: "g".to_string(), title: "t".to_string(), revision }
	}

	#[test]
	fn equal_or_newer_local_revision_is_current() {
		assert!(is_current(&entry(5), &meta(5)));
		assert!(is_current(&entry(6), &meta(5)));
		assert!(!is_current(&entry(4), &meta(5)));
	}
}
