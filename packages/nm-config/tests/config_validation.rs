use std::{
	env, fs,
	path::PathBuf,
	sync::atomic::{AtomicU64, Ordering},
	time::{SystemTime, UNIX_EPOCH},
};

use toml::Value;

use nm_config::{Config, Environment};

const SAMPLE_CONFIG_TEMPLATE_TOML: &str = include_str!("fixtures/sample_config.template.toml");

fn sample_toml_with(section: &str, key: &str, value: Value) -> String {
	let mut root: Value =
		toml::from_str(SAMPLE_CONFIG_TEMPLATE_TOML).expect("Failed to parse template config.");
	let table = root
		.as_table_mut()
		.expect("Template config must be a table.")
		.get_mut(section)
		.and_then(Value::as_table_mut)
		.expect("Template config must include the requested section.");

	table.insert(key.to_string(), value);

	toml::to_string(&root).expect("Failed to render template config.")
}

fn write_temp_config(payload: String) -> PathBuf {
	static COUNTER: AtomicU64 = AtomicU64::new(0);

	let nanos = SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.expect("System time must be valid.")
		.as_nanos();
	let ordinal = COUNTER.fetch_add(1, Ordering::SeqCst);
	let pid = std::process::id();
	let mut path = env::temp_dir();

	path.push(format!("nm_config_test_{nanos}_{pid}_{ordinal}.toml"));

	fs::write(&path, payload).expect("Failed to write test config.");

	path
}

fn base_config() -> Config {
	toml::from_str(SAMPLE_CONFIG_TEMPLATE_TOML).expect("Failed to parse test config.")
}

#[test]
fn sample_config_loads() {
	let path = write_temp_config(SAMPLE_CONFIG_TEMPLATE_TOML.to_string());
	let result = nm_config::load(&path);

	fs::remove_file(&path).expect("Failed to remove test config.");

	let cfg = result.expect("Expected sample config to load.");

	assert_eq!(cfg.remote.environment, Environment::Production);
	assert_eq!(cfg.remote.api_base(), "https://www.evernote.com");
	assert_eq!(cfg.remote.user_store_url(), "https://www.evernote.com/edam/user");
	assert_eq!(cfg.mirror.page_size, 100);
	assert_eq!(cfg.mirror.dest_dir, PathBuf::from("/tmp/evernote-backup"));
}

#[test]
fn mirror_section_defaults_when_missing() {
	let mut root: Value =
		toml::from_str(SAMPLE_CONFIG_TEMPLATE_TOML).expect("Failed to parse template config.");

	root.as_table_mut().expect("Template config must be a table.").remove("mirror");

	let payload = toml::to_string(&root).expect("Failed to render template config.");
	let cfg: Config = toml::from_str(&payload).expect("Failed to parse config without mirror.");

	assert_eq!(cfg.mirror.page_size, 100);
	assert_eq!(cfg.mirror.dest_dir, PathBuf::from("/tmp/evernote-backup"));
}

#[test]
fn environment_selects_host() {
	let payload = sample_toml_with("remote", "environment", Value::String("sandbox".to_string()));
	let cfg: Config = toml::from_str(&payload).expect("Failed to parse sandbox config.");

	assert_eq!(cfg.remote.environment, Environment::Sandbox);
	assert_eq!(cfg.remote.api_base(), "https://sandbox.evernote.com");
	assert_eq!(Environment::Yinxiang.host(), "app.yinxiang.com");
}

#[test]
fn api_base_override_wins_over_environment() {
	let payload =
		sample_toml_with("remote", "api_base", Value::String("http://127.0.0.1:9000/".to_string()));
	let cfg: Config = toml::from_str(&payload).expect("Failed to parse override config.");

	assert_eq!(cfg.remote.api_base(), "http://127.0.0.1:9000");
	assert_eq!(cfg.remote.user_store_url(), "http://127.0.0.1:9000/edam/user");
}

#[test]
fn page_size_must_be_in_range() {
	let payload = sample_toml_with("mirror", "page_size", Value::Integer(0));
	let path = write_temp_config(payload);
	let result = nm_config::load(&path);

	fs::remove_file(&path).expect("Failed to remove test config.");

	let err = result.expect_err("Expected page_size validation error.");

	assert!(
		err.to_string().contains("mirror.page_size must be in the range 1-250."),
		"Unexpected error: {err}"
	);

	let mut cfg = base_config();

	cfg.mirror.page_size = 251;

	assert!(nm_config::validate(&cfg).is_err());

	cfg.mirror.page_size = 250;

	assert!(nm_config::validate(&cfg).is_ok());
}

#[test]
fn auth_token_is_required() {
	let mut cfg = base_config();

	cfg.remote.auth_token = None;

	let err = nm_config::validate(&cfg).expect_err("Expected auth_token validation error.");

	assert!(
		err.to_string().contains("remote.auth_token must be non-empty"),
		"Unexpected error: {err}"
	);
}

#[test]
fn timeout_must_be_positive() {
	let mut cfg = base_config();

	cfg.remote.timeout_ms = 0;

	let err = nm_config::validate(&cfg).expect_err("Expected timeout validation error.");

	assert!(
		err.to_string().contains("remote.timeout_ms must be greater than zero."),
		"Unexpected error: {err}"
	);
}

#[test]
fn default_header_values_must_be_strings() {
	let mut cfg = base_config();

	cfg.remote.default_headers.insert("X-Retry".to_string(), serde_json::json!(3));

	let err = nm_config::validate(&cfg).expect_err("Expected default header validation error.");

	assert!(
		err.to_string().contains("remote.default_headers.X-Retry must be a string."),
		"Unexpected error: {err}"
	);
}

#[test]
fn unreadable_config_reports_path() {
	let path = env::temp_dir().join("nm_config_test_missing_file.toml");
	let err = nm_config::load(&path).expect_err("Expected read error.");

	assert!(matches!(err, nm_config::Error::ReadConfig { .. }), "Unexpected error: {err}");
}
