use std::path::PathBuf;

use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub remote: Remote,
	#[serde(default)]
	pub mirror: Mirror,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Remote {
	#[serde(default)]
	pub environment: Environment,
	/// Optional. Replaces `https://<environment host>` when set, e.g. for a local gateway.
	pub api_base: Option<String>,
	#[serde(default = "default_user_store_path")]
	pub user_store_path: String,
	/// Optional. Falls back to the `NOTEMIRROR_AUTH_TOKEN` environment variable.
	pub auth_token: Option<String>,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}
impl Remote {
	pub fn api_base(&self) -> String {
		match self.api_base.as_deref() {
			Some(base) => base.trim_end_matches('/').to_string(),
			None => format!("https://{}", self.environment.host()),
		}
	}

	pub fn user_store_url(&self) -> String {
		format!("{}{}", self.api_base(), self.user_store_path)
	}
}

#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
	#[default]
	Production,
	Sandbox,
	Yinxiang,
}
impl Environment {
	pub fn host(self) -> &'static str {
		match self {
			Self::Production => "www.evernote.com",
			Self::Sandbox => "sandbox.evernote.com",
			Self::Yinxiang => "app.yinxiang.com",
		}
	}
}

#[derive(Debug, Deserialize)]
pub struct Mirror {
	#[serde(default = "default_dest_dir")]
	pub dest_dir: PathBuf,
	#[serde(default = "default_page_size")]
	pub page_size: u32,
}
impl Default for Mirror {
	fn default() -> Self {
		Self { dest_dir: default_dest_dir(), page_size: default_page_size() }
	}
}

fn default_user_store_path() -> String {
	"/edam/user".to_string()
}

fn default_dest_dir() -> PathBuf {
	PathBuf::from("/tmp/evernote-backup")
}

fn default_page_size() -> u32 {
	100
}
