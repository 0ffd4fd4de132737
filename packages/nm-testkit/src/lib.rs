//! Test doubles shared by the workspace: an in-memory note store, a pause that never sleeps, and
//! throwaway directories.

mod error;

pub use error::{Error, Result};

use std::{
	collections::{HashMap, HashSet, VecDeque},
	env, fs,
	path::{Path, PathBuf},
	process,
	sync::{
		Mutex, MutexGuard,
		atomic::{AtomicU64, Ordering},
	},
	time::{Duration, SystemTime, UNIX_EPOCH},
};

use nm_domain::{Note, NoteMetadata, Resource, ResourceRef};
use nm_remote::{BoxFuture, NoteResultSpec, NoteStore, Pause, ResourceSpec};

static DIR_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Remote calls that can be told to hit the rate limit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
	List,
	FetchNote,
	FetchResource,
}

/// A note store held in memory. Listing follows insertion order.
#[derive(Debug, Default)]
pub struct FakeNoteStore {
	state: Mutex<State>,
}
impl FakeNoteStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds or replaces a note together with its resources. A replaced note keeps its listing
	/// position. The note's resource references are derived from `resources`.
	pub fn put_note(&self, mut note: Note, resources: Vec<Resource>) {
		let mut state = self.lock();

		note.resources = resources
			.iter()
			.map(|res| ResourceRef { guid: res.guid.clone(), body_hash: res.body_hash.clone() })
			.collect();

		for resource in resources {
			state.resources.insert(resource.guid.clone(), resource);
		}

		match state.notes.iter_mut().find(|existing| existing.guid == note.guid) {
			Some(existing) => *existing = note,
			None => state.notes.push(note),
		}
	}

	pub fn remove_note(&self, guid: &str) {
		self.lock().notes.retain(|note| note.guid != guid);
	}

	/// The next `times` calls of `operation` fail with a rate limit advising `duration` seconds.
	pub fn rate_limit(&self, operation: Operation, times: usize, duration: u32) {
		let mut state = self.lock();
		let queue = state.rate_limits.entry(operation).or_default();

		queue.extend(std::iter::repeat_n(duration, times));
	}

	/// Every fetch of `guid` fails with a permission error.
	pub fn deny_note(&self, guid: &str) {
		self.lock().denied.insert(guid.to_string());
	}

	pub fn list_calls(&self) -> usize {
		self.lock().list_calls
	}

	/// Guids passed to `fetch_note`, in call order, including rate-limited attempts.
	pub fn fetched_notes(&self) -> Vec<String> {
		self.lock().fetched_notes.clone()
	}

	pub fn fetched_resources(&self) -> Vec<String> {
		self.lock().fetched_resources.clone()
	}

	fn lock(&self) -> MutexGuard<'_, State> {
		self.state.lock().unwrap_or_else(|err| err.into_inner())
	}
}
impl NoteStore for FakeNoteStore {
	fn list_note_metadata(
		&self,
		offset: u32,
		page_size: u32,
	) -> BoxFuture<'_, nm_remote::Result<Vec<NoteMetadata>>> {
		let result = {
			let mut state = self.lock();

			state.list_calls += 1;

			match state.take_rate_limit(Operation::List) {
				Some(err) => Err(err),
				None => Ok(state
					.notes
					.iter()
					.skip(offset as usize)
					.take(page_size as usize)
					.map(|note| NoteMetadata {
						guid: note.guid.clone(),
						title: note.title.clone(),
						revision: note.revision,
					})
					.collect()),
			}
		};

		Box::pin(async move { result })
	}

	fn fetch_note<'a>(
		&'a self,
		guid: &'a str,
		spec: NoteResultSpec,
	) -> BoxFuture<'a, nm_remote::Result<Note>> {
		let result = {
			let mut state = self.lock();

			state.fetched_notes.push(guid.to_string());

			if let Some(err) = state.take_rate_limit(Operation::FetchNote) {
				Err(err)
			} else if state.denied.contains(guid) {
				Err(permission_denied(guid))
			} else {
				state
					.notes
					.iter()
					.find(|note| note.guid == guid)
					.cloned()
					.map(|mut note| {
						if !spec.include_content {
							note.content = None;
						}

						note
					})
					.ok_or_else(|| not_found("Note", guid))
			}
		};

		Box::pin(async move { result })
	}

	fn fetch_resource<'a>(
		&'a self,
		guid: &'a str,
		spec: ResourceSpec,
	) -> BoxFuture<'a, nm_remote::Result<Resource>> {
		let result = {
			let mut state = self.lock();

			state.fetched_resources.push(guid.to_string());

			match state.take_rate_limit(Operation::FetchResource) {
				Some(err) => Err(err),
				None => state
					.resources
					.get(guid)
					.cloned()
					.map(|mut resource| {
						if !spec.include_data {
							resource.body.clear();
						}
						if !spec.include_attributes {
							resource.file_name = None;
						}

						resource
					})
					.ok_or_else(|| not_found("Resource", guid)),
			}
		};

		Box::pin(async move { result })
	}
}

#[derive(Debug, Default)]
struct State {
	notes: Vec<Note>,
	resources: HashMap<String, Resource>,
	rate_limits: HashMap<Operation, VecDeque<u32>>,
	denied: HashSet<String>,
	list_calls: usize,
	fetched_notes: Vec<String>,
	fetched_resources: Vec<String>,
}
impl State {
	fn take_rate_limit(&mut self, operation: Operation) -> Option<nm_remote::Error> {
		let duration = self.rate_limits.get_mut(&operation)?.pop_front()?;

		Some(nm_remote::Error::RateLimitReached { duration })
	}
}

/// Records requested cooldowns and returns immediately.
#[derive(Debug, Default)]
pub struct RecordingPause {
	pauses: Mutex<Vec<Duration>>,
}
impl RecordingPause {
	pub fn pauses(&self) -> Vec<Duration> {
		self.pauses.lock().unwrap_or_else(|err| err.into_inner()).clone()
	}
}
impl Pause for RecordingPause {
	fn pause(&self, duration: Duration) -> BoxFuture<'_, ()> {
		self.pauses.lock().unwrap_or_else(|err| err.into_inner()).push(duration);

		Box::pin(async {})
	}
}

/// A fresh directory under the system temp dir, removed on drop.
#[derive(Debug)]
pub struct TestDir {
	path: PathBuf,
}
impl TestDir {
	pub fn new(prefix: &str) -> Result<Self> {
		let nanos = SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_nanos()).unwrap_or(0);
		let seq = DIR_COUNTER.fetch_add(1, Ordering::Relaxed);
		let path = env::temp_dir().join(format!("{prefix}-{}-{nanos}-{seq}", process::id()));

		fs::create_dir_all(&path).map_err(|source| Error::Io { path: path.clone(), source })?;

		Ok(Self { path })
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	pub fn join(&self, rel: impl AsRef<Path>) -> PathBuf {
		self.path.join(rel)
	}
}
impl Drop for TestDir {
	fn drop(&mut self) {
		let _ = fs::remove_dir_all(&self.path);
	}
}

pub fn note(guid: &str, title: &str, revision: i64, content: &str) -> Note {
	Note {
		guid: guid.to_string(),
		title: title.to_string(),
		revision,
		content: Some(content.to_string()),
		resources: Vec::new(),
	}
}

pub fn resource(
	guid: &str,
	body_hash: &[u8],
	mime: &str,
	file_name: Option<&str>,
	body: &[u8],
) -> Resource {
	Resource {
		guid: guid.to_string(),
		mime: mime.to_string(),
		file_name: file_name.map(str::to_string),
		body: body.to_vec(),
		body_hash: body_hash.to_vec(),
		size: u32::try_from(body.len()).ok(),
	}
}

fn not_found(kind: &str, guid: &str) -> nm_remote::Error {
	nm_remote::Error::Remote {
		status: 404,
		code: "NOT_FOUND".to_string(),
		message: format!("{kind} {guid} does not exist."),
	}
}

fn permission_denied(guid: &str) -> nm_remote::Error {
	nm_remote::Error::Remote {
		status: 403,
		code: "PERMISSION_DENIED".to_string(),
		message: format!("Note {guid} is not readable."),
	}
}
