//! JSON-over-HTTP adapter for the user store and note store.
//!
//! Every call is a `POST <store url>/<method>` carrying a JSON body and the bearer token.
//! Failures come back as a non-2xx status with `{"errorCode", "message", "rateLimitDuration"}`.

use std::time::Duration;

use base64::{Engine, engine::general_purpose::STANDARD};
use reqwest::{Client, header::HeaderMap};
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::{Value, json};

use crate::{
	BoxFuture, Error, NoteResultSpec, NoteStore, ResourceSpec, Result, User, UserStore, UserUrls,
};
use nm_domain::{Note, NoteMetadata, Resource, ResourceRef};

pub const RATE_LIMIT_REACHED: &str = "RATE_LIMIT_REACHED";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
	error_code: String,
	#[serde(default)]
	message: Option<String>,
	#[serde(default)]
	rate_limit_duration: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserWire {
	id: i64,
	username: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserUrlsWire {
	note_store_url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NotesMetadataListWire {
	#[serde(default)]
	notes: Vec<NoteMetadataWire>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NoteMetadataWire {
	guid: String,
	#[serde(default)]
	title: Option<String>,
	#[serde(default)]
	update_sequence_num: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NoteWire {
	guid: String,
	#[serde(default)]
	title: Option<String>,
	update_sequence_num: i64,
	#[serde(default)]
	content: Option<String>,
	#[serde(default)]
	resources: Vec<ResourceWire>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResourceWire {
	guid: String,
	#[serde(default)]
	mime: Option<String>,
	#[serde(default)]
	attributes: Option<ResourceAttributesWire>,
	#[serde(default)]
	data: Option<DataWire>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResourceAttributesWire {
	#[serde(default)]
	file_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DataWire {
	/// Hex.
	body_hash: String,
	#[serde(default)]
	size: Option<u32>,
	/// Base64. Absent unless the payload was requested.
	#[serde(default)]
	body: Option<String>,
}

#[derive(Clone, Debug)]
struct Endpoint {
	client: Client,
	url: String,
	headers: HeaderMap,
	auth_token: String,
}
impl Endpoint {
	fn new(url: &str, auth_token: &str, headers: HeaderMap, timeout_ms: u64) -> Result<Self> {
		let client = Client::builder().timeout(Duration::from_millis(timeout_ms)).build()?;

		Ok(Self {
			client,
			url: url.trim_end_matches('/').to_string(),
			headers,
			auth_token: auth_token.to_string(),
		})
	}

	async fn call<T>(&self, method: &str, mut body: Value) -> Result<T>
	where
		T: DeserializeOwned,
	{
		if let Some(object) = body.as_object_mut() {
			object.insert("authenticationToken".to_string(), Value::String(self.auth_token.clone()));
		}

		let res = self
			.client
			.post(format!("{}/{method}", self.url))
			.headers(self.headers.clone())
			.json(&body)
			.send()
			.await?;
		let status = res.status();

		if status.is_success() {
			return Ok(res.json().await?);
		}

		let bytes = res.bytes().await?;

		Err(classify_error(status.as_u16(), &bytes))
	}
}

/// Maps a failed response onto [`Error`]; `RATE_LIMIT_REACHED` becomes `RateLimitReached`.
pub fn classify_error(status: u16, body: &[u8]) -> Error {
	match serde_json::from_slice::<ErrorBody>(body) {
		Ok(err) if err.error_code == RATE_LIMIT_REACHED =>
			Error::RateLimitReached { duration: err.rate_limit_duration.unwrap_or(0) },
		Ok(err) => Error::Remote {
			status,
			code: err.error_code,
			message: err.message.unwrap_or_default(),
		},
		Err(_) => Error::Remote {
			status,
			code: "UNKNOWN".to_string(),
			message: String::from_utf8_lossy(body).trim().to_string(),
		},
	}
}

#[derive(Clone, Debug)]
pub struct HttpUserStore {
	endpoint: Endpoint,
}
impl HttpUserStore {
	pub fn new(url: &str, auth_token: &str, headers: HeaderMap, timeout_ms: u64) -> Result<Self> {
		Ok(Self { endpoint: Endpoint::new(url, auth_token, headers, timeout_ms)? })
	}
}
impl UserStore for HttpUserStore {
	fn get_user(&self) -> BoxFuture<'_, Result<User>> {
		Box::pin(async move {
			let wire: UserWire = self.endpoint.call("getUser", json!({})).await?;

			Ok(User { id: wire.id, username: wire.username })
		})
	}

	fn get_user_urls(&self) -> BoxFuture<'_, Result<UserUrls>> {
		Box::pin(async move {
			let wire: UserUrlsWire = self.endpoint.call("getUserUrls", json!({})).await?;

			Ok(UserUrls { note_store_url: wire.note_store_url })
		})
	}
}

#[derive(Clone, Debug)]
pub struct HttpNoteStore {
	endpoint: Endpoint,
}
impl HttpNoteStore {
	pub fn new(url: &str, auth_token: &str, headers: HeaderMap, timeout_ms: u64) -> Result<Self> {
		Ok(Self { endpoint: Endpoint::new(url, auth_token, headers, timeout_ms)? })
	}

	pub fn url(&self) -> &str {
		&self.endpoint.url
	}
}
impl NoteStore for HttpNoteStore {
	fn list_note_metadata(
		&self,
		offset: u32,
		page_size: u32,
	) -> BoxFuture<'_, Result<Vec<NoteMetadata>>> {
		Box::pin(async move {
			let body = json!({
				"filter": { "order": "CREATED" },
				"offset": offset,
				"maxNotes": page_size,
				"resultSpec": { "includeTitle": true, "includeUpdateSequenceNum": true },
			});
			let wire: NotesMetadataListWire = self.endpoint.call("findNotesMetadata", body).await?;

			wire.notes.into_iter().map(note_metadata_from_wire).collect()
		})
	}

	fn fetch_note<'a>(
		&'a self,
		guid: &'a str,
		spec: NoteResultSpec,
	) -> BoxFuture<'a, Result<Note>> {
		Box::pin(async move {
			let body = json!({
				"guid": guid,
				"resultSpec": {
					"includeContent": spec.include_content,
					"includeResourcesData": spec.include_resources_data,
				},
			});
			let wire: NoteWire = self.endpoint.call("getNoteWithResultSpec", body).await?;

			note_from_wire(wire)
		})
	}

	fn fetch_resource<'a>(
		&'a self,
		guid: &'a str,
		spec: ResourceSpec,
	) -> BoxFuture<'a, Result<Resource>> {
		Box::pin(async move {
			let body = json!({
				"guid": guid,
				"withData": spec.include_data,
				"withRecognition": false,
				"withAttributes": spec.include_attributes,
				"withAlternateData": false,
			});
			let wire: ResourceWire = self.endpoint.call("getResource", body).await?;

			resource_from_wire(wire)
		})
	}
}

fn note_metadata_from_wire(wire: NoteMetadataWire) -> Result<NoteMetadata> {
	let revision = wire.update_sequence_num.ok_or_else(|| Error::InvalidResponse {
		message: format!("Note metadata {} is missing updateSequenceNum.", wire.guid),
	})?;

	Ok(NoteMetadata { guid: wire.guid, title: wire.title.unwrap_or_default(), revision })
}

fn note_from_wire(wire: NoteWire) -> Result<Note> {
	let resources = wire
		.resources
		.into_iter()
		.map(|resource| {
			let body_hash = match resource.data {
				Some(data) => decode_hash(&resource.guid, &data.body_hash)?,
				None => Vec::new(),
			};

			Ok(ResourceRef { guid: resource.guid, body_hash })
		})
		.collect::<Result<Vec<_>>>()?;

	Ok(Note {
		guid: wire.guid,
		title: wire.title.unwrap_or_default(),
		revision: wire.update_sequence_num,
		content: wire.content,
		resources,
	})
}

fn resource_from_wire(wire: ResourceWire) -> Result<Resource> {
	let data = wire.data.ok_or_else(|| Error::InvalidResponse {
		message: format!("Resource {} is missing data.", wire.guid),
	})?;
	let body_hash = decode_hash(&wire.guid, &data.body_hash)?;
	let body = match data.body.as_deref() {
		Some(encoded) => STANDARD.decode(encoded).map_err(|err| Error::InvalidResponse {
			message: format!("Resource {} has an invalid base64 body: {err}.", wire.guid),
		})?,
		None => Vec::new(),
	};

	Ok(Resource {
		guid: wire.guid,
		mime: wire.mime.unwrap_or_default(),
		file_name: wire.attributes.and_then(|attributes| attributes.file_name),
		body,
		body_hash,
		size: data.size,
	})
}

fn decode_hash(guid: &str, raw: &str) -> Result<Vec<u8>> {
	hex::decode(raw.trim()).map_err(|err| Error::InvalidResponse {
		message: format!("Resource {guid} has an invalid body hash: {err}."),
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_note_with_resources() {
		let wire: NoteWire = serde_json::from_value(json!({
			"guid": "g1",
			"title": "My Note",
			"updateSequenceNum": 3,
			"content": "<en-note/>",
			"resources": [
				{ "guid": "r1", "mime": "text/plain", "data": { "bodyHash": "0aff", "size": 2 } }
			]
		}))
		.expect("Failed to deserialize note.");
		let note = note_from_wire(wire).expect("Failed to convert note.");

		assert_eq!(note.revision, 3);
		assert_eq!(note.content.as_deref(), Some("<en-note/>"));
		assert_eq!(
			note.resources,
			vec![ResourceRef { guid: "r1".to_string(), body_hash: vec![0x0a, 0xff] }]
		);
	}

	#[test]
	fn parses_resource_payload() {
		let wire: ResourceWire = serde_json::from_value(json!({
			"guid": "r1",
			"mime": "text/plain",
			"attributes": { "fileName": "a.txt" },
			"data": { "bodyHash": "00", "size": 5, "body": "aGVsbG8=" }
		}))
		.expect("Failed to deserialize resource.");
		let resource = resource_from_wire(wire).expect("Failed to convert resource.");

		assert_eq!(resource.body, b"hello");
		assert_eq!(resource.file_name.as_deref(), Some("a.txt"));
		assert_eq!(resource.hash_key(), "00");
	}

	#[test]
	fn rejects_resource_with_bad_hash() {
		let wire: ResourceWire = serde_json::from_value(json!({
			"guid": "r1",
			"data": { "bodyHash": "zz" }
		}))
		.expect("Failed to deserialize resource.");
		let err = resource_from_wire(wire).expect_err("Expected invalid hash error.");

		assert!(err.to_string().contains("invalid body hash"), "Unexpected error: {err}");
	}
}
