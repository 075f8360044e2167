//! Note records and the validated draft used to create them
//!
//! `NewNote` is the raw client payload. `NoteDraft` can only be built by
//! validating a `NewNote`, so every store write starts from checked input
//! with defaults already applied.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::{Category, ValidationError};

/// Store-assigned note identifier
pub type NoteId = Uuid;

/// Default `tags.color` when the client omits it
pub const DEFAULT_TAG_COLOR: &str = "gray";

/// Label attached to a note
///
/// Stored as a single object even though the field is named `tags`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub label: String,
    pub color: String,
}

/// A persisted note
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    pub content: String,
    pub category: Category,
    pub pinned: bool,
    pub tags: Tag,
}

/// Raw create-note payload, every field optional so that absence can be
/// reported per field instead of as a generic parse failure
#[derive(Debug, Clone, Default)]
pub struct NewNote {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<String>,
    pub pinned: Option<bool>,
    pub tags: Option<NewTag>,
}

#[derive(Debug, Clone, Default)]
pub struct NewTag {
    pub label: Option<String>,
    pub color: Option<String>,
}

impl NewNote {
    /// Read a payload out of a parsed JSON body.
    ///
    /// Absent and `null` fields are treated alike. A field of the wrong
    /// JSON type is reported by its dotted path. Unknown keys are ignored.
    pub fn from_json(body: Value) -> Result<Self, ValidationError> {
        let Value::Object(mut obj) = body else {
            return Err(ValidationError::InvalidType {
                field: "body",
                expected: "an object",
            });
        };

        let tags = match obj.remove("tags") {
            None | Some(Value::Null) => None,
            Some(Value::Object(mut tag)) => Some(NewTag {
                label: string_field(&mut tag, "label", "tags.label")?,
                color: string_field(&mut tag, "color", "tags.color")?,
            }),
            Some(_) => {
                return Err(ValidationError::InvalidType {
                    field: "tags",
                    expected: "an object",
                })
            }
        };

        Ok(Self {
            title: string_field(&mut obj, "title", "title")?,
            content: string_field(&mut obj, "content", "content")?,
            category: string_field(&mut obj, "category", "category")?,
            pinned: match obj.remove("pinned") {
                None | Some(Value::Null) => None,
                Some(Value::Bool(b)) => Some(b),
                Some(_) => {
                    return Err(ValidationError::InvalidType {
                        field: "pinned",
                        expected: "a boolean",
                    })
                }
            },
            tags,
        })
    }
}

fn string_field(
    obj: &mut Map<String, Value>,
    key: &str,
    field: &'static str,
) -> Result<Option<String>, ValidationError> {
    match obj.remove(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(_) => Err(ValidationError::InvalidType {
            field,
            expected: "a string",
        }),
    }
}

/// Validated note content awaiting an id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteDraft {
    title: String,
    content: String,
    category: Category,
    pinned: bool,
    tags: Tag,
}

impl NoteDraft {
    /// Validate a raw payload and apply defaults.
    ///
    /// # Rules
    /// - `title` required, trimmed, must not be empty afterwards
    /// - `tags.label` required, must not be blank
    /// - `category` must be one of the known values
    ///
    /// # Example
    /// ```
    /// use notekeeper_server::models::{NewNote, NewTag, NoteDraft};
    ///
    /// let draft = NoteDraft::new(NewNote {
    ///     title: Some("  Groceries ".into()),
    ///     tags: Some(NewTag { label: Some("errand".into()), color: None }),
    ///     ..Default::default()
    /// })
    /// .unwrap();
    /// assert_eq!(draft.title(), "Groceries");
    /// ```
    pub fn new(input: NewNote) -> Result<Self, ValidationError> {
        let title = input
            .title
            .ok_or(ValidationError::Missing { field: "title" })?
            .trim()
            .to_owned();
        if title.is_empty() {
            return Err(ValidationError::Empty { field: "title" });
        }

        let tag = input
            .tags
            .ok_or(ValidationError::Missing { field: "tags" })?;
        let label = tag
            .label
            .ok_or(ValidationError::Missing { field: "tags.label" })?;
        if label.trim().is_empty() {
            return Err(ValidationError::Empty { field: "tags.label" });
        }

        let category = match input.category {
            Some(raw) => raw.parse()?,
            None => Category::default(),
        };

        Ok(Self {
            title,
            content: input.content.unwrap_or_default(),
            category,
            pinned: input.pinned.unwrap_or(false),
            tags: Tag {
                label,
                color: tag
                    .color
                    .unwrap_or_else(|| DEFAULT_TAG_COLOR.to_owned()),
            },
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn pinned(&self) -> bool {
        self.pinned
    }

    pub fn tags(&self) -> &Tag {
        &self.tags
    }

    /// Attach a store-assigned id.
    pub fn into_note(self, id: NoteId) -> Note {
        Note {
            id,
            title: self.title,
            content: self.content,
            category: self.category,
            pinned: self.pinned,
            tags: self.tags,
        }
    }
}
