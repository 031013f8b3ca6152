pub mod note;

pub use note::{Note, NoteDraft, TITLE_MAX_CHARS};
