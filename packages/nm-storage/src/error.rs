use std::path::PathBuf;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("I/O error at {path:?}: {source}")]
	Io { path: PathBuf, source: std::io::Error },
	#[error("Failed to parse index at {path:?}: {source}")]
	ParseIndex { path: PathBuf, source: serde_json::Error },
	#[error("Failed to encode index: {0}")]
	EncodeIndex(#[source] serde_json::Error),
}

pub(crate) trait IoContext<T> {
	fn at(self, path: impl Into<PathBuf>) -> Result<T>;
}
impl<T> IoContext<T> for std::io::Result<T> {
	fn at(self, path: impl Into<PathBuf>) -> Result<T> {
		self.map_err(|source| Error::Io { path: path.into(), source })
	}
}
