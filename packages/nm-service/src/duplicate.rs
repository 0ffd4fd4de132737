use std::path::PathBuf;

use nm_remote::NoteStore;

use crate::{Mirror, Result};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DuplicateReport {
	pub written: Vec<PathBuf>,
	pub failed: Vec<String>,
}

impl<S> Mirror<S>
where
	S: NoteStore,
{
	/// Downloads every given note regardless of the index, which is neither read nor written.
	///
	/// Fetch and filesystem failures are logged and the id is skipped. A markup failure stops
	/// the run.
	pub async fn duplicate(&self, guids: &[String]) -> Result<DuplicateReport> {
		let mut report = DuplicateReport::default();

		for guid in guids {
			match self.download(guid).await {
				Ok((_, dir)) => report.written.push(dir),
				Err(err) if err.is_fatal() => return Err(err),
				Err(err) => {
					tracing::error!(guid = %guid, error = %err, "Failed to duplicate note. Skipping.");

					report.failed.push(guid.clone());
				},
			}
		}

		Ok(report)
	}

	pub async fn duplicate_all(&self) -> Result<DuplicateReport> {
		let guids = self.all_guids().await?;

		self.duplicate(&guids).await
	}
}
