use bytes::Bytes;
use folio_ledger::TxReceipt;
use folio_types::{BookId, BookMetadata, ReviewId};
use serde::Serialize;

/// A book as entered by its publisher, before anything is uploaded.
#[derive(Clone, Debug, Default)]
pub struct BookDraft {
    pub name: String,
    pub description: String,
    pub author: Option<String>,
    /// Cover image bytes, uploaded ahead of the metadata document.
    pub image: Option<Bytes>,
}

impl BookDraft {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            ..Self::default()
        }
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn with_image(mut self, image: impl Into<Bytes>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Metadata without the image reference, fields trimmed.
    pub(crate) fn metadata(&self) -> BookMetadata {
        let metadata = BookMetadata::new(self.name.trim(), self.description.trim());
        match &self.author {
            Some(author) => metadata.with_author(author.trim()),
            None => metadata,
        }
    }
}

/// Result of publishing a book or review.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Published {
    pub metadata_uri: String,
    pub receipt: TxReceipt,
}

impl Published {
    pub fn book_id(&self) -> Option<BookId> {
        self.receipt.minted_book()
    }

    pub fn review_id(&self) -> Option<ReviewId> {
        self.receipt.minted_review()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_is_trimmed_and_blank_author_dropped() {
        let draft = BookDraft::new("  Dune ", " Spice ").with_author("   ");
        let metadata = draft.metadata();
        assert_eq!(metadata.name, "Dune");
        assert_eq!(metadata.description, "Spice");
        assert!(metadata.author.is_none());
        assert!(metadata.image.is_none());
    }
}
