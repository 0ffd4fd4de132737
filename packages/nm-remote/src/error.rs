pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Rate limit reached; retry after {duration} seconds.")]
	RateLimitReached { duration: u32 },
	#[error("Remote call failed with {code} (HTTP {status}): {message}")]
	Remote { status: u16, code: String, message: String },
	#[error(transparent)]
	Reqwest(#[from] reqwest::Error),
	#[error(transparent)]
	SerdeJson(#[from] serde_json::Error),
	#[error(transparent)]
	InvalidHeaderName(#[from] reqwest::header::InvalidHeaderName),
	#[error(transparent)]
	InvalidHeaderValue(#[from] reqwest::header::InvalidHeaderValue),
	#[error("{message}")]
	InvalidConfig { message: String },
	#[error("{message}")]
	InvalidResponse { message: String },
}
impl Error {
	/// The server-advised cooldown in seconds, if this is a rate-limit error.
	pub fn rate_limit_duration(&self) -> Option<u32> {
		match self {
			Self::RateLimitReached { duration } => Some(*duration),
			_ => None,
		}
	}
}
