use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A single book on the shelf
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Book {
    /// Server-assigned identifier, opaque decimal token
    pub id: String,
    pub title: String,
    pub author: Author,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Author {
    pub firstname: String,
    pub lastname: String,
}

/// Client-supplied fields for creating or replacing a book
///
/// Carries no `id`: identifiers are owned by the server, so an `id` in a
/// request body is ignored by construction.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct BookDraft {
    pub title: String,
    #[serde(default)]
    pub author: Author,
}

impl Author {
    pub fn new(firstname: impl Into<String>, lastname: impl Into<String>) -> Self {
        Self {
            firstname: firstname.into(),
            lastname: lastname.into(),
        }
    }
}
