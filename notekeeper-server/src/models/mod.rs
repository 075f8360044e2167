//! Domain models with validation at construction
//!
//! All user input is validated when creating these types.
//! Invalid input returns ValidationError, not panic.

pub mod validation;
pub mod category;
pub mod note;

pub use validation::ValidationError;
pub use category::Category;
pub use note::{NewNote, NewTag, Note, NoteDraft, NoteId, Tag, DEFAULT_TAG_COLOR};
