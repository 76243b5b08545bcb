pub mod draft;
pub mod filter;
pub mod note;
pub mod timestamp;

pub use draft::{CONTENT_MAX_CHARS, RejectCode, TITLE_MAX_CHARS, validate};
pub use filter::filter_notes;
pub use note::{Note, NoteId, NotePayload};
