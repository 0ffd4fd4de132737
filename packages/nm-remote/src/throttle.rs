//! Transparent rate-limit handling for every remote call.
//!
//! [`Throttled`] wraps a store and implements the same trait, routing each method through
//! [`retry`]. A `RateLimitReached` error puts the caller to sleep for the advised duration plus
//! one second and then repeats the identical call, without a retry budget. Any other error is
//! returned unchanged.

use std::time::Duration;

use crate::{
	BoxFuture, Error, NoteResultSpec, NoteStore, ResourceSpec, Result, User, UserStore, UserUrls,
};
use nm_domain::{Note, NoteMetadata, Resource};

/// How the retry loop waits out a cooldown.
pub trait Pause
where
	Self: Send + Sync,
{
	fn pause(&self, duration: Duration) -> BoxFuture<'_, ()>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct TokioPause;
impl Pause for TokioPause {
	fn pause(&self, duration: Duration) -> BoxFuture<'_, ()> {
		Box::pin(tokio::time::sleep(duration))
	}
}

#[derive(Clone, Debug)]
pub struct Throttled<S, P = TokioPause> {
	inner: S,
	pause: P,
}
impl<S> Throttled<S> {
	pub fn new(inner: S) -> Self {
		Self { inner, pause: TokioPause }
	}
}
impl<S, P> Throttled<S, P>
where
	P: Pause,
{
	pub fn with_pause(inner: S, pause: P) -> Self {
		Self { inner, pause }
	}

	pub fn inner(&self) -> &S {
		&self.inner
	}

	pub fn pause(&self) -> &P {
		&self.pause
	}
}
impl<S, P> UserStore for Throttled<S, P>
where
	S: UserStore,
	P: Pause,
{
	fn get_user(&self) -> BoxFuture<'_, Result<User>> {
		Box::pin(retry(&self.pause, "get_user", || self.inner.get_user()))
	}

	fn get_user_urls(&self) -> BoxFuture<'_, Result<UserUrls>> {
		Box::pin(retry(&self.pause, "get_user_urls", || self.inner.get_user_urls()))
	}
}
impl<S, P> NoteStore for Throttled<S, P>
where
	S: NoteStore,
	P: Pause,
{
	fn list_note_metadata(
		&self,
		offset: u32,
		page_size: u32,
	) -> BoxFuture<'_, Result<Vec<NoteMetadata>>> {
		Box::pin(retry(&self.pause, "list_note_metadata", move || {
			self.inner.list_note_metadata(offset, page_size)
		}))
	}

	fn fetch_note<'a>(
		&'a self,
		guid: &'a str,
		spec: NoteResultSpec,
	) -> BoxFuture<'a, Result<Note>> {
		Box::pin(retry(&self.pause, "fetch_note", move || self.inner.fetch_note(guid, spec)))
	}

	fn fetch_resource<'a>(
		&'a self,
		guid: &'a str,
		spec: ResourceSpec,
	) -> BoxFuture<'a, Result<Resource>> {
		Box::pin(retry(&self.pause, "fetch_resource", move || {
			self.inner.fetch_resource(guid, spec)
		}))
	}
}

/// Runs `call` until it yields anything other than `RateLimitReached`.
pub async fn retry<'a, T, P, F>(pause: &'a P, operation: &'static str, mut call: F) -> Result<T>
where
	P: Pause,
	F: FnMut() -> BoxFuture<'a, Result<T>> + Send,
	T: Send,
{
	loop {
		match call().await {
			Err(Error::RateLimitReached { duration }) => {
				tracing::warn!(operation, duration, "Rate limit reached. Sleeping before retry.");

				pause.pause(cooldown(duration)).await;
			},
			result => return result,
		}
	}
}

/// The advised duration plus one second of slack.
pub fn cooldown(duration: u32) -> Duration {
	Duration::from_secs(u64::from(duration) + 1)
}
