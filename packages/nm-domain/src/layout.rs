//! Filesystem naming for mirrored notes.
//!
//! A note lives in `<base>/<sanitized title>-<guid>/`, holding `<sanitized title>.html` and a
//! `files/` directory with one file per resource. The guid suffix keeps directory names unique
//! when titles collide and stable across re-downloads.

use std::path::{Path, PathBuf};

use crate::Resource;

/// Reserved filename characters (Wikipedia's list, plus `.`).
pub const RESERVED_CHARS: [char; 11] = ['/', '\\', '?', '%', '*', ':', '|', '"', '<', '>', '.'];
pub const ATTACHMENT_DIR: &str = "files";

pub fn sanitize(raw: &str) -> String {
	raw.chars().map(|ch| if RESERVED_CHARS.contains(&ch) { '_' } else { ch }).collect()
}

/// `<sanitized title>-<sanitized guid>`. The guid goes through the same rule so the name stays a
/// single path component whatever the index or the server hands us.
pub fn note_dir_name(title: &str, guid: &str) -> String {
	format!("{}-{}", sanitize(title), sanitize(guid))
}

pub fn note_dir(base: &Path, title: &str, guid: &str) -> PathBuf {
	base.join(note_dir_name(title, guid))
}

pub fn html_file_name(title: &str) -> String {
	format!("{}.html", sanitize(title))
}

/// The on-disk name of a resource: its declared file name, or `<guid><suffix>` with the suffix
/// guessed from the MIME type.
pub fn attachment_name(resource: &Resource) -> String {
	if let Some(name) = resource.file_name.as_deref()
		&& !name.trim().is_empty()
	{
		if is_single_component(name) {
			return name.to_string();
		}

		return sanitize(name);
	}

	let stem = sanitize(&resource.guid);

	match extension_for_mime(&resource.mime) {
		Some(ext) => format!("{stem}.{ext}"),
		None => {
			tracing::warn!(
				mime = %resource.mime,
				guid = %resource.guid,
				"Can't find file suffix for MIME type."
			);

			stem
		},
	}
}

/// Where a resource is written on disk: `<note_dir>/files/<name>`.
pub fn attachment_path(note_dir: &Path, name: &str) -> PathBuf {
	note_dir.join(ATTACHMENT_DIR).join(name)
}

/// How the HTML document refers to a resource: `files/<name>`, with the name percent-encoded so
/// `#`, `?` and `%` stay part of the path.
pub fn attachment_href(name: &str) -> String {
	format!("{ATTACHMENT_DIR}/{}", urlencoding::encode(name))
}

pub fn extension_for_mime(mime: &str) -> Option<&'static str> {
	let essence = mime.split(';').next().unwrap_or_default().trim().to_ascii_lowercase();
	let ext = match essence.as_str() {
		"image/png" => "png",
		"image/jpeg" | "image/jpg" | "image/pjpeg" => "jpg",
		"image/gif" => "gif",
		"image/webp" => "webp",
		"image/svg+xml" => "svg",
		"image/bmp" => "bmp",
		"image/tiff" => "tiff",
		"image/heic" => "heic",
		"audio/mpeg" => "mp3",
		"audio/wav" | "audio/x-wav" => "wav",
		"audio/amr" => "amr",
		"audio/mp4" | "audio/x-m4a" => "m4a",
		"video/mp4" => "mp4",
		"video/quicktime" => "mov",
		"application/pdf" => "pdf",
		"application/zip" => "zip",
		"application/json" => "json",
		"application/xml" | "text/xml" => "xml",
		"application/rtf" => "rtf",
		"application/msword" => "doc",
		"application/vnd.openxmlformats-officedocument.wordprocessingml.document" => "docx",
		"application/vnd.ms-excel" => "xls",
		"application/vnd.openxmlformats-officedocument.spreadsheetml.sheet" => "xlsx",
		"application/vnd.ms-powerpoint" => "ppt",
		"application/vnd.openxmlformats-officedocument.presentationml.presentation" => "pptx",
		"text/plain" => "txt",
		"text/html" => "html",
		"text/css" => "css",
		"text/csv" => "csv",
		"text/calendar" => "ics",
		"text/vcard" | "text/x-vcard" => "vcf",
		_ => return None,
	};

	Some(ext)
}

fn is_single_component(name: &str) -> bool {
	!name.contains(['/', '\\']) && name != "." && name != ".."
}

#[cfg(test)]
mod tests {
	use super::*;

	fn resource(file_name: Option<&str>, mime: &str) -> Resource {
		Resource {
			guid: "r1".to_string(),
			mime: mime.to_string(),
			file_name: file_name.map(str::to_string),
			body: Vec::new(),
			body_hash: vec![0xab],
			size: None,
		}
	}

	#[test]
	fn declared_file_name_is_used_verbatim() {
		assert_eq!(attachment_name(&resource(Some("a.txt"), "text/plain")), "a.txt");
		assert_eq!(attachment_name(&resource(Some("scan 1.PDF"), "image/png")), "scan 1.PDF");
	}

	#[test]
	fn declared_file_name_with_separators_is_sanitized() {
		assert_eq!(attachment_name(&resource(Some("../etc/passwd"), "text/plain")), "___etc_passwd");
		assert_eq!(attachment_name(&resource(Some(".."), "text/plain")), "__");
	}

	#[test]
	fn missing_file_name_uses_guid_and_suffix() {
		assert_eq!(attachment_name(&resource(None, "image/png")), "r1.png");
		assert_eq!(attachment_name(&resource(None, "text/plain; charset=utf-8")), "r1.txt");
		assert_eq!(attachment_name(&resource(Some("  "), "application/pdf")), "r1.pdf");
	}

	#[test]
	fn unknown_mime_falls_back_to_bare_guid() {
		assert_eq!(attachment_name(&resource(None, "application/x-unheard-of")), "r1");
	}

	#[test]
	fn synthesized_name_never_leaves_files_dir() {
		let mut hostile = resource(None, "text/plain");

		hostile.guid = "../../etc/r1".to_string();

		assert_eq!(attachment_name(&hostile), "______etc_r1.txt");
	}

	#[test]
	fn href_percent_encodes_reserved_url_characters() {
		assert_eq!(attachment_href("a.txt"), "files/a.txt");
		assert_eq!(attachment_href("50% #1?.pdf"), "files/50%25%20%231%3F.pdf");
	}
}
