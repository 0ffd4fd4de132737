mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Config, Environment, Mirror, Remote, Service};

use std::{env, fs, path::Path};

pub const AUTH_TOKEN_ENV: &str = "NOTEMIRROR_AUTH_TOKEN";
pub const MAX_PAGE_SIZE: u32 = 250;

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	if cfg.remote.auth_token.is_none() {
		cfg.remote.auth_token =
			env::var(AUTH_TOKEN_ENV).ok().filter(|token| !token.trim().is_empty());
	}

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.log_level.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.log_level must be non-empty.".to_string(),
		});
	}
	if cfg.remote.auth_token.as_deref().map(|token| token.trim().is_empty()).unwrap_or(true) {
		return Err(Error::Validation {
			message: format!("remote.auth_token must be non-empty (or set {AUTH_TOKEN_ENV})."),
		});
	}
	if cfg.remote.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "remote.timeout_ms must be greater than zero.".to_string(),
		});
	}
	if !cfg.remote.user_store_path.starts_with('/') {
		return Err(Error::Validation {
			message: "remote.user_store_path must start with '/'.".to_string(),
		});
	}

	for (key, value) in &cfg.remote.default_headers {
		if !value.is_string() {
			return Err(Error::Validation {
				message: format!("remote.default_headers.{key} must be a string."),
			});
		}
	}

	if cfg.mirror.dest_dir.as_os_str().is_empty() {
		return Err(Error::Validation {
			message: "mirror.dest_dir must be non-empty.".to_string(),
		});
	}
	if cfg.mirror.page_size == 0 || cfg.mirror.page_size > MAX_PAGE_SIZE {
		return Err(Error::Validation {
			message: format!("mirror.page_size must be in the range 1-{MAX_PAGE_SIZE}."),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	if cfg.remote.api_base.as_deref().map(|base| base.trim().is_empty()).unwrap_or(false) {
		cfg.remote.api_base = None;
	}
	if cfg.remote.auth_token.as_deref().map(|token| token.trim().is_empty()).unwrap_or(false) {
		cfg.remote.auth_token = None;
	}
}
