pub mod http;
pub mod session;
pub mod throttle;

mod error;

pub use error::{Error, Result};
pub use session::{Session, connect};
pub use throttle::{Pause, Throttled, TokioPause};

use std::{future::Future, pin::Pin};

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName};
use serde_json::{Map, Value};

use nm_domain::{Note, NoteMetadata, Resource};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Which parts of a note to fetch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NoteResultSpec {
	pub include_content: bool,
	pub include_resources_data: bool,
}
impl NoteResultSpec {
	/// Markup body and resource payloads: everything needed to write the note to disk.
	pub const FULL: Self = Self { include_content: true, include_resources_data: true };
	/// Title and revision only.
	pub const HEADER: Self = Self { include_content: false, include_resources_data: false };
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResourceSpec {
	pub include_data: bool,
	pub include_attributes: bool,
}
impl ResourceSpec {
	pub const FULL: Self = Self { include_data: true, include_attributes: true };
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct User {
	pub id: i64,
	pub username: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserUrls {
	pub note_store_url: String,
}

/// Account-level calls. Used once per run to locate the note store.
pub trait UserStore
where
	Self: Send + Sync,
{
	fn get_user(&self) -> BoxFuture<'_, Result<User>>;

	fn get_user_urls(&self) -> BoxFuture<'_, Result<UserUrls>>;
}

/// Note-level calls the mirror depends on.
pub trait NoteStore
where
	Self: Send + Sync,
{
	/// One page of metadata in creation order. An empty page means the listing is exhausted.
	fn list_note_metadata(
		&self,
		offset: u32,
		page_size: u32,
	) -> BoxFuture<'_, Result<Vec<NoteMetadata>>>;

	fn fetch_note<'a>(
		&'a self,
		guid: &'a str,
		spec: NoteResultSpec,
	) -> BoxFuture<'a, Result<Note>>;

	fn fetch_resource<'a>(
		&'a self,
		guid: &'a str,
		spec: ResourceSpec,
	) -> BoxFuture<'a, Result<Resource>>;
}

pub fn auth_headers(auth_token: &str, default_headers: &Map<String, Value>) -> Result<HeaderMap> {
	let mut headers = HeaderMap::new();

	headers.insert(AUTHORIZATION, format!("Bearer {auth_token}").parse()?);

	for (key, value) in default_headers {
		let Some(raw) = value.as_str() else {
			return Err(Error::InvalidConfig {
				message: format!("Default header {key} must be a string."),
			});
		};

		headers.insert(HeaderName::from_bytes(key.as_bytes())?, raw.parse()?);
	}

	Ok(headers)
}
