pub mod layout;
pub mod model;

pub use model::{FetchedNote, Note, NoteMetadata, Resource, ResourceRef, ResourceSet};
