use std::{
	fs,
	io::ErrorKind,
	path::{Path, PathBuf},
};

use nm_domain::{FetchedNote, layout};

use crate::{Result, error::IoContext};

/// Replaces the note's directory under `base` with a fresh copy of `html` and every resource
/// body. Returns the directory written.
pub fn write_note(base: &Path, note: &FetchedNote, html: &str) -> Result<PathBuf> {
	let dir = layout::note_dir(base, &note.note.title, &note.note.guid);

	remove_dir(&dir)?;

	let files = dir.join(layout::ATTACHMENT_DIR);

	fs::create_dir_all(&files).at(&files)?;

	let html_path = dir.join(layout::html_file_name(&note.note.title));

	fs::write(&html_path, html).at(&html_path)?;

	for resource in note.resources.iter() {
		let path = layout::attachment_path(&dir, &layout::attachment_name(resource));

		tracing::debug!(path = %path.display(), bytes = resource.body.len(), "Writing resource.");

		fs::write(&path, &resource.body).at(&path)?;
	}

	tracing::debug!(dir = %dir.display(), resources = note.resources.len(), "Wrote note.");

	Ok(dir)
}

/// Deletes the note's directory tree. A directory that is already gone is not an error.
pub fn remove_note_dir(base: &Path, title: &str, guid: &str) -> Result<()> {
	let dir = layout::note_dir(base, title, guid);

	tracing::info!(dir = %dir.display(), "Removing note directory.");

	remove_dir(&dir)
}

fn remove_dir(dir: &Path) -> Result<()> {
	match fs::remove_dir_all(dir) {
		Ok(()) => Ok(()),
		Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
		Err(err) => Err::<(), _>(err).at(dir),
	}
}
