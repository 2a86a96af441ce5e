//! Off-chain metadata documents referenced by book and review tokens.

use serde::{Deserialize, Serialize};

use crate::cid::ContentId;
use crate::error::TypeError;

/// Description length shown in book listings before truncation.
pub const BOOK_EXCERPT_CHARS: usize = 120;

/// Description length shown in review cards before truncation.
pub const REVIEW_EXCERPT_CHARS: usize = 200;

/// JSON document describing a book.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookMetadata {
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Cover image, as an `ipfs://` URI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl BookMetadata {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            author: None,
            image: None,
        }
    }

    /// Sets the author; blank authors are dropped.
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        let author = author.into();
        self.author = if author.trim().is_empty() { None } else { Some(author) };
        self
    }

    pub fn with_image(mut self, image: &ContentId) -> Self {
        self.image = Some(image.to_uri());
        self
    }

    /// Content id of the cover image, if one is set.
    pub fn image_cid(&self) -> Option<ContentId> {
        self.image.as_deref().and_then(|uri| ContentId::from_uri(uri).ok())
    }

    pub fn validate(&self) -> Result<(), TypeError> {
        if self.name.is_empty() {
            return Err(TypeError::MissingField("name"));
        }
        if self.description.is_empty() {
            return Err(TypeError::MissingField("description"));
        }
        Ok(())
    }

    pub fn excerpt(&self) -> String {
        excerpt(&self.description, BOOK_EXCERPT_CHARS)
    }
}

/// JSON document describing a review.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewMetadata {
    pub name: String,
    pub description: String,
}

impl ReviewMetadata {
    /// Builds a review with surrounding whitespace removed from both fields.
    pub fn new(name: &str, description: &str) -> Self {
        Self {
            name: name.trim().to_string(),
            description: description.trim().to_string(),
        }
    }

    pub fn validate(&self) -> Result<(), TypeError> {
        if self.name.trim().is_empty() {
            return Err(TypeError::MissingField("name"));
        }
        if self.description.trim().is_empty() {
            return Err(TypeError::MissingField("description"));
        }
        Ok(())
    }

    pub fn excerpt(&self) -> String {
        excerpt(&self.description, REVIEW_EXCERPT_CHARS)
    }
}

/// Truncate `text` to `max_chars` characters, appending `...` when cut.
pub fn excerpt(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_fields_are_omitted() {
        let book = BookMetadata::new("Dune", "Spice.");
        let json = serde_json::to_value(&book).unwrap();
        assert_eq!(json, serde_json::json!({"name": "Dune", "description": "Spice."}));
    }

    #[test]
    fn blank_author_is_dropped() {
        let book = BookMetadata::new("Dune", "Spice.").with_author("   ");
        assert!(book.author.is_none());
        let book = book.with_author("Frank Herbert");
        assert_eq!(book.author.as_deref(), Some("Frank Herbert"));
    }

    #[test]
    fn image_is_stored_as_uri() {
        let cid = ContentId::new("bafyimg").unwrap();
        let book = BookMetadata::new("Dune", "Spice.").with_image(&cid);
        assert_eq!(book.image.as_deref(), Some("ipfs://bafyimg"));
        assert_eq!(book.image_cid(), Some(cid));
    }

    #[test]
    fn book_validation() {
        assert_eq!(
            BookMetadata::new("", "x").validate(),
            Err(TypeError::MissingField("name"))
        );
        assert_eq!(
            BookMetadata::new("x", "").validate(),
            Err(TypeError::MissingField("description"))
        );
        assert!(BookMetadata::new("x", "y").validate().is_ok());
    }

    #[test]
    fn review_fields_are_trimmed() {
        let review = ReviewMetadata::new("  Great  ", "\nLoved it\t");
        assert_eq!(review.name, "Great");
        assert_eq!(review.description, "Loved it");
        assert!(ReviewMetadata::new(" ", "text").validate().is_err());
    }

    #[test]
    fn excerpt_truncates_on_char_boundaries() {
        assert_eq!(excerpt("short", 10), "short");
        assert_eq!(excerpt("abcdef", 3), "abc...");
        assert_eq!(excerpt("ééééé", 2), "éé...");
    }

    #[test]
    fn parses_documents_missing_optional_fields() {
        let book: BookMetadata =
            serde_json::from_str(r#"{"name":"A","description":"B"}"#).unwrap();
        assert!(book.author.is_none());
        assert!(book.image.is_none());
    }
}
