use quick_xml::{escape::escape, events::BytesStart};

use crate::{Error, MEDIA_TAG, Result};
use nm_domain::{ResourceSet, layout};

/// The attributes of an `<en-media>` tag that affect its expansion.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MediaAttrs {
	pub hash: Option<String>,
	pub mime: Option<String>,
	pub width: Option<String>,
	pub height: Option<String>,
}
impl MediaAttrs {
	pub fn from_tag(tag: &BytesStart<'_>) -> Result<Self> {
		let mut attrs = Self::default();

		for attr in tag.attributes() {
			let attr = attr
				.map_err(|err| Error::Attribute { tag: MEDIA_TAG, message: err.to_string() })?;
			let value = attr
				.unescape_value()
				.map_err(|err| Error::Attribute { tag: MEDIA_TAG, message: err.to_string() })?
				.into_owned();

			match attr.key.as_ref() {
				b"hash" => attrs.hash = Some(value),
				b"type" => attrs.mime = Some(value),
				b"width" => attrs.width = Some(value),
				b"height" => attrs.height = Some(value),
				_ => {},
			}
		}

		Ok(attrs)
	}
}

/// What an `<en-media>` tag expands to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Fragment {
	Image { src: String, width: Option<String>, height: Option<String> },
	Link { href: String, text: String },
}
impl Fragment {
	pub fn to_html(&self) -> String {
		match self {
			Self::Image { src, width, height } => {
				let mut html = format!("<img src=\"{}\"", escape(src.as_str()));

				if let Some(width) = width {
					html.push_str(&format!(" width=\"{}\"", escape(width.as_str())));
				}
				if let Some(height) = height {
					html.push_str(&format!(" height=\"{}\"", escape(height.as_str())));
				}

				html.push('>');

				html
			},
			Self::Link { href, text } =>
				format!("<a href=\"{}\">{}</a>", escape(href.as_str()), escape(text.as_str())),
		}
	}
}

/// Resolves a media tag against the note's resources.
///
/// Images (by the resource's MIME type, or the tag's `type` when the resource has none) become
/// an embed carrying `width`/`height` through. Everything else becomes a link whose text is the
/// declared file name, or the synthesized one when none was declared.
pub fn resolve_media_tag(attrs: &MediaAttrs, resources: &ResourceSet) -> Result<Fragment> {
	let hash = attrs
		.hash
		.as_deref()
		.ok_or(Error::MissingAttribute { tag: MEDIA_TAG, name: "hash" })?;
	let resource =
		resources.get(hash).ok_or_else(|| Error::UnknownResource { hash: hash.to_string() })?;
	let name = layout::attachment_name(resource);
	let href = layout::attachment_href(&name);
	let is_image = if resource.mime.trim().is_empty() {
		attrs.mime.as_deref().map(|mime| mime.starts_with("image/")).unwrap_or(false)
	} else {
		resource.is_image()
	};

	if is_image {
		return Ok(Fragment::Image {
			src: href,
			width: attrs.width.clone(),
			height: attrs.height.clone(),
		});
	}

	let text = resource
		.file_name
		.clone()
		.filter(|declared| !declared.trim().is_empty())
		.unwrap_or(name);

	Ok(Fragment::Link { href, text })
}

#[cfg(test)]
mod tests {
	use super::*;
	use nm_domain::Resource;

	fn resources() -> ResourceSet {
		[
			Resource {
				guid: "img".to_string(),
				mime: "image/png".to_string(),
				file_name: None,
				body: vec![1, 2, 3],
				body_hash: vec![0xaa],
				size: Some(3),
			},
			Resource {
				guid: "doc".to_string(),
				mime: "application/pdf".to_string(),
				file_name: Some("Report Q3.pdf".to_string()),
				body: vec![4],
				body_hash: vec![0xbb],
				size: Some(1),
			},
			Resource {
				guid: "blob".to_string(),
				mime: "application/pdf".to_string(),
				file_name: None,
				body: vec![5],
				body_hash: vec![0xcc],
				size: None,
			},
		]
		.into_iter()
		.collect()
	}

	fn attrs(hash: &str) -> MediaAttrs {
		MediaAttrs { hash: Some(hash.to_string()), ..MediaAttrs::default() }
	}

	#[test]
	fn image_keeps_dimensions() {
		let mut media = attrs("aa");

		media.width = Some("640".to_string());

		let fragment = resolve_media_tag(&media, &resources()).expect("Failed to resolve image.");

		assert_eq!(
			fragment,
			Fragment::Image {
				src: "files/img.png".to_string(),
				width: Some("640".to_string()),
				height: None,
			}
		);
		assert_eq!(fragment.to_html(), r#"<img src="files/img.png" width="640">"#);
	}

	#[test]
	fn attachment_link_uses_declared_name() {
		let fragment =
			resolve_media_tag(&attrs("bb"), &resources()).expect("Failed to resolve link.");

		assert_eq!(fragment.to_html(), r#"<a href="files/Report%20Q3.pdf">Report Q3.pdf</a>"#);
	}

	#[test]
	fn attachment_link_falls_back_to_synthesized_name() {
		let fragment =
			resolve_media_tag(&attrs("cc"), &resources()).expect("Failed to resolve link.");

		assert_eq!(
			fragment,
			Fragment::Link { href: "files/blob.pdf".to_string(), text: "blob.pdf".to_string() }
		);
	}

	#[test]
	fn unknown_hash_is_an_error() {
		let err =
			resolve_media_tag(&attrs("dd"), &resources()).expect_err("Expected lookup error.");

		assert!(matches!(err, Error::UnknownResource { ref hash } if hash == "dd"));
	}

	#[test]
	fn missing_hash_is_an_error() {
		let err = resolve_media_tag(&MediaAttrs::default(), &resources())
			.expect_err("Expected missing attribute error.");

		assert!(matches!(err, Error::MissingAttribute { name: "hash", .. }));
	}
}
