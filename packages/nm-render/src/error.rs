pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Malformed note markup at byte {position}.")]
	Markup { position: u64, source: quick_xml::Error },
	#[error("Malformed attribute on <{tag}>: {message}")]
	Attribute { tag: &'static str, message: String },
	#[error("<{tag}> is missing the {name} attribute.")]
	MissingAttribute { tag: &'static str, name: &'static str },
	#[error("No resource matches media hash {hash}.")]
	UnknownResource { hash: String },
	#[error(transparent)]
	Utf8(#[from] std::str::Utf8Error),
}
