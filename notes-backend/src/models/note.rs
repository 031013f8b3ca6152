/// Maximum length of a note title, in characters.
pub const TITLE_MAX_CHARS: usize = 200;

/// A persisted note row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub id: i64,
    pub title: String,
    pub content: String,
}

/// Validated note fields without an id, ready to be inserted or written over an existing row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
}

impl NoteDraft {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }

    /// Attach a store-assigned id.
    pub fn into_note(self, id: i64) -> Note {
        Note {
            id,
            title: self.title,
            content: self.content,
        }
    }
}
