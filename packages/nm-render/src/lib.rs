//! Note markup to standalone HTML.
//!
//! The markup is walked token by token. Prolog tokens (declaration, doctype, processing
//! instructions) and comments are dropped, `<en-note>` becomes `<body>`, `<en-media>` is
//! expanded through [`resolve_media_tag`], and every other token is written back as it was.
//! Reaching the end of input is the only successful way out; any tokenizer error aborts.

pub mod media;

mod error;

pub use error::{Error, Result};
pub use media::{Fragment, MediaAttrs, resolve_media_tag};

use quick_xml::{
	Reader,
	escape::escape,
	events::{BytesStart, Event},
};

use nm_domain::{FetchedNote, ResourceSet};

pub const NOTE_TAG: &str = "en-note";
pub const MEDIA_TAG: &str = "en-media";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
	/// Copying tokens through.
	Markup,
	/// Between `<en-media>` and `</en-media>`; the tag was already expanded, its content is
	/// dropped.
	Media,
}

pub fn render_note(note: &FetchedNote) -> Result<String> {
	render_html(&note.note.title, note.content(), &note.resources)
}

pub fn render_html(title: &str, content: &str, resources: &ResourceSet) -> Result<String> {
	let mut reader = Reader::from_str(content);
	let mut out = String::with_capacity(content.len() + 128);
	let mut state = State::Markup;

	out.push_str("<!doctype html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
	out.push_str(&format!("<title>{}</title>\n", escape(title)));
	out.push_str("</head>\n");

	loop {
		let event = match reader.read_event() {
			Ok(event) => event,
			Err(source) =>
				return Err(Error::Markup { position: reader.error_position(), source }),
		};

		match (state, event) {
			(_, Event::Eof) => break,
			(_, Event::Decl(_) | Event::PI(_) | Event::DocType(_) | Event::Comment(_)) => {},
			(State::Media, Event::End(tag)) if tag.name().as_ref() == MEDIA_TAG.as_bytes() =>
				state = State::Markup,
			(State::Media, _) => {},
			(State::Markup, Event::Start(tag)) => match tag.name().as_ref() {
				name if name == NOTE_TAG.as_bytes() => out.push_str("<body>"),
				name if name == MEDIA_TAG.as_bytes() => {
					out.push_str(&expand_media(&tag, resources)?);

					state = State::Media;
				},
				_ => {
					out.push('<');
					out.push_str(std::str::from_utf8(&tag)?);
					out.push('>');
				},
			},
			(State::Markup, Event::Empty(tag)) => match tag.name().as_ref() {
				name if name == NOTE_TAG.as_bytes() => out.push_str("<body></body>"),
				name if name == MEDIA_TAG.as_bytes() =>
					out.push_str(&expand_media(&tag, resources)?),
				_ => {
					out.push('<');
					out.push_str(std::str::from_utf8(&tag)?);
					out.push_str("/>");
				},
			},
			(State::Markup, Event::End(tag)) => match tag.name().as_ref() {
				name if name == NOTE_TAG.as_bytes() => out.push_str("</body>"),
				_ => {
					out.push_str("</");
					out.push_str(std::str::from_utf8(&tag)?);
					out.push('>');
				},
			},
			(State::Markup, Event::Text(text)) => out.push_str(std::str::from_utf8(&text)?),
			(State::Markup, Event::CData(data)) => {
				out.push_str("<![CDATA[");
				out.push_str(std::str::from_utf8(&data)?);
				out.push_str("]]>");
			},
		}
	}

	out.push_str("\n</html>\n");

	Ok(out)
}

fn expand_media(tag: &BytesStart<'_>, resources: &ResourceSet) -> Result<String> {
	let attrs = MediaAttrs::from_tag(tag)?;
	let fragment = resolve_media_tag(&attrs, resources)?;

	tracing::trace!(?fragment, "Expanded media tag.");

	Ok(fragment.to_html())
}
