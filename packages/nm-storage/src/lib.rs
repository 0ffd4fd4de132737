//! On-disk side of the mirror: the JSON index and the per-note directories.

pub mod index;
pub mod notes;

mod error;

pub use error::{Error, Result};
pub use index::{Entry, INDEX_FILE, Repository};
pub use notes::{remove_note_dir, write_note};
