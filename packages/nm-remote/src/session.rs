use crate::{
	Error, Result, Throttled, UserStore, auth_headers,
	http::{HttpNoteStore, HttpUserStore},
};

/// An authenticated connection. The note store is already wrapped in the rate-limit retry.
pub struct Session {
	pub username: String,
	pub note_store: Throttled<HttpNoteStore>,
}

/// Resolves the account's note store through the user store.
pub async fn connect(cfg: &nm_config::Remote) -> Result<Session> {
	let auth_token = cfg.auth_token.as_deref().ok_or_else(|| Error::InvalidConfig {
		message: "remote.auth_token must be set before connecting.".to_string(),
	})?;
	let headers = auth_headers(auth_token, &cfg.default_headers)?;
	let user_store_url = cfg.user_store_url();
	let user_store = Throttled::new(HttpUserStore::new(
		&user_store_url,
		auth_token,
		headers.clone(),
		cfg.timeout_ms,
	)?);
	let user = user_store.get_user().await?;

	tracing::info!(username = %user.username, host = %cfg.api_base(), "Authenticated.");

	let urls = user_store.get_user_urls().await?;
	let note_store = Throttled::new(HttpNoteStore::new(
		&urls.note_store_url,
		auth_token,
		headers,
		cfg.timeout_ms,
	)?);

	tracing::debug!(url = %note_store.inner().url(), "Resolved note store.");

	Ok(Session { username: user.username, note_store })
}
