//! Mapping between catalog books and MongoDB documents.
//!
//! A stored book is a document whose `_id` is a MongoDB `ObjectId`; the catalog sees
//! that id as its hex string.

use bson::{Document, de::deserialize_from_document, oid::ObjectId};
use serde::Deserialize;

use catalog_core::{
    book::{Book, BookId},
    error::RepositoryResult,
};

/// The shape of a book document as stored in MongoDB.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct BookRecord {
    #[serde(rename = "_id")]
    pub(crate) id: ObjectId,
    pub(crate) isbn: String,
    pub(crate) author: String,
    pub(crate) title: String,
    #[serde(default)]
    pub(crate) description: String,
}

impl From<BookRecord> for Book {
    fn from(record: BookRecord) -> Self {
        Book {
            id: BookId::new(record.id.to_hex()),
            isbn: record.isbn,
            author: record.author,
            title: record.title,
            description: record.description,
        }
    }
}

/// Restores a book from a document read back from MongoDB.
///
/// # Errors
///
/// Returns a serialization error if the document is not shaped like a book.
pub(crate) fn restore_book(document: Document) -> RepositoryResult<Book> {
    Ok(deserialize_from_document::<BookRecord>(document)?.into())
}

/// Parses a catalog id into an `ObjectId`.
///
/// An id that is not a valid `ObjectId` cannot name any stored book, so it yields
/// `None` rather than an error.
pub(crate) fn parse_id(id: &BookId) -> Option<ObjectId> {
    ObjectId::parse_str(id.as_str()).ok()
}
