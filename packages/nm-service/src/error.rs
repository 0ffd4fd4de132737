pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Failed to list note metadata at offset {offset}: {source}")]
	Listing { offset: u32, source: nm_remote::Error },
	#[error("Failed to fetch note {guid}: {source}")]
	Fetch { guid: String, source: nm_remote::Error },
	#[error("Failed to render note {guid} ({title:?}): {source}")]
	Render { guid: String, title: String, source: nm_render::Error },
	#[error(transparent)]
	Storage(#[from] nm_storage::Error),
}
impl Error {
	/// Markup failures end the whole run, even in the per-id commands.
	pub fn is_fatal(&self) -> bool {
		matches!(self, Self::Render { .. })
	}
}
