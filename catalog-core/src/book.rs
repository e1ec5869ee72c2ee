//! The book entity and its identifiers.
//!
//! A book exists in two shapes:
//!
//! - [`BookData`] - the caller-supplied fields, before the store has seen them
//! - [`Book`] - a persisted record, carrying the [`BookId`] assigned by the store
//!
//! Keeping the shapes apart means a book without an identifier can never be handed
//! to an operation that addresses records by id.

use std::fmt;

use bson::{Document, ser::serialize_to_document};
use serde::{Deserialize, Serialize};

use crate::error::RepositoryResult;

/// Length of an ISBN in its external, dash-separated representation (`978-1-4920-5809-4`).
pub const ISBN_LENGTH: usize = 17;

/// Number of digits in an ISBN-13, separators excluded.
pub const ISBN_DIGITS: usize = 13;

/// Opaque identifier assigned to a book by the storage layer.
///
/// The representation is adapter-specific (a UUID for the in-memory store, an
/// `ObjectId` hex string for MongoDB); callers should treat it as an opaque string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookId(String);

impl BookId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for BookId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for BookId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl AsRef<str> for BookId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// The mutable, caller-supplied fields of a book.
///
/// This is the input to create and update operations. The `isbn` is the natural key
/// and must be unique across the catalog; `description` defaults to an empty string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookData {
    pub isbn: String,
    pub author: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
}

impl BookData {
    /// Creates book data with an empty description.
    pub fn new(isbn: impl Into<String>, author: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            isbn: isbn.into(),
            author: author.into(),
            title: title.into(),
            description: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Converts the fields to a BSON document, suitable for an insert or a `$set` update.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_document(&self) -> RepositoryResult<Document> {
        Ok(serialize_to_document(self)?)
    }
}

/// A book as stored in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub isbn: String,
    pub author: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
}

impl Book {
    /// Binds caller-supplied data to a store-assigned identifier.
    pub fn from_data(id: BookId, data: BookData) -> Self {
        Self {
            id,
            isbn: data.isbn,
            author: data.author,
            title: data.title,
            description: data.description,
        }
    }

    /// Returns a copy of the mutable fields.
    pub fn data(&self) -> BookData {
        BookData {
            isbn: self.isbn.clone(),
            author: self.author.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
        }
    }

    /// Splits the record into its identifier and fields.
    pub fn into_parts(self) -> (BookId, BookData) {
        (
            self.id,
            BookData {
                isbn: self.isbn,
                author: self.author,
                title: self.title,
                description: self.description,
            },
        )
    }
}
