use reqwest::header::{AUTHORIZATION, USER_AGENT};
use serde_json::{Map, Value};

use nm_remote::{Error, http};

#[test]
fn builds_bearer_auth_header() {
	let headers = nm_remote::auth_headers("secret", &Map::new()).expect("Failed to build headers.");
	let value = headers.get(AUTHORIZATION).expect("Missing authorization header.");

	assert_eq!(value, "Bearer secret");
}

#[test]
fn includes_default_headers() {
	let mut defaults = Map::new();

	defaults.insert("User-Agent".to_string(), Value::String("notemirror".to_string()));

	let headers = nm_remote::auth_headers("secret", &defaults).expect("Failed to build headers.");

	assert_eq!(headers.get(USER_AGENT).expect("Missing user agent header."), "notemirror");
}

#[test]
fn rejects_non_string_default_headers() {
	let mut defaults = Map::new();

	defaults.insert("X-Retry".to_string(), Value::from(3));

	let err = nm_remote::auth_headers("secret", &defaults).expect_err("Expected config error.");

	assert!(matches!(err, Error::InvalidConfig { .. }), "Unexpected error: {err}");
}

#[test]
fn rate_limit_body_is_distinguished() {
	let body = br#"{"errorCode":"RATE_LIMIT_REACHED","rateLimitDuration":42}"#;
	let err = http::classify_error(403, body);

	assert!(matches!(err, Error::RateLimitReached { duration: 42 }), "Unexpected error: {err}");
	assert_eq!(err.rate_limit_duration(), Some(42));
}

#[test]
fn other_error_codes_are_not_rate_limits() {
	let body = br#"{"errorCode":"PERMISSION_DENIED","message":"Note.guid"}"#;
	let err = http::classify_error(403, body);

	assert_eq!(err.rate_limit_duration(), None);

	match err {
		Error::Remote { status, code, message } => {
			assert_eq!(status, 403);
			assert_eq!(code, "PERMISSION_DENIED");
			assert_eq!(message, "Note.guid");
		},
		other => panic!("Unexpected error: {other}"),
	}
}

#[test]
fn unparseable_error_body_is_kept_as_message() {
	let err = http::classify_error(502, b"Bad Gateway\n");

	match err {
		Error::Remote { status, code, message } => {
			assert_eq!(status, 502);
			assert_eq!(code, "UNKNOWN");
			assert_eq!(message, "Bad Gateway");
		},
		other => panic!("Unexpected error: {other}"),
	}
}
