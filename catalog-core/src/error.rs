//! Error types for the catalog.
//!
//! Two layers report failures differently:
//!
//! - [`RepositoryError`] - infrastructure failures raised by storage adapters. A missing
//!   record is never one of these; adapters report absence as `None`.
//! - [`CatalogError`] - business-rule violations raised by the
//!   [`BookService`](crate::service::BookService), plus repository failures passed through
//!   untouched.
//!
//! Use [`CatalogError::kind`] to classify a failure without matching on every variant.

use bson::error::Error as BsonError;
use thiserror::Error;

use crate::book::BookId;

/// Represents all possible errors that can occur when a storage adapter talks to its datastore.
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// Serialization/deserialization error when converting between a book and a stored document.
    #[error("Serialization error: {0}")]
    Serialization(String),
    /// Error during adapter initialization or connection setup.
    #[error("Initialization error: {0}")]
    Initialization(String),
    /// A stored document does not have the shape of a book.
    #[error("Invalid document: {0}")]
    InvalidDocument(String),
    /// The write would give two books the same value for a unique field.
    /// The first argument is the field name, the second is the offending value.
    #[error("Duplicate value for unique field {0}: {1}")]
    DuplicateKey(String, String),
    /// An error occurred in the underlying datastore.
    #[error("Backend error: {0}")]
    Backend(String),
}

/// A specialized `Result` type for repository operations.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

impl From<BsonError> for RepositoryError {
    fn from(err: BsonError) -> Self {
        RepositoryError::Serialization(err.to_string())
    }
}

/// Broad classification of a [`CatalogError`], used by outer layers to pick a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The target record does not exist.
    NotFound,
    /// The requested mutation would violate a uniqueness invariant.
    Conflict,
    /// Any other failure; opaque to the caller.
    Internal,
}

/// Errors returned by the catalog's application service.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// No book is stored under the given ISBN.
    #[error("Book with ISBN {0} not found.")]
    BookNotFoundByIsbn(String),
    /// No book is stored under the given id.
    #[error("Book with ID {0} not found.")]
    BookNotFoundById(BookId),
    /// Another book is already stored under the given ISBN.
    #[error("Book with ISBN {0} already exists.")]
    BookAlreadyExists(String),
    /// The storage adapter failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl CatalogError {
    /// Returns the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CatalogError::BookNotFoundByIsbn(_) | CatalogError::BookNotFoundById(_) => {
                ErrorKind::NotFound
            }
            CatalogError::BookAlreadyExists(_) => ErrorKind::Conflict,
            CatalogError::Repository(_) => ErrorKind::Internal,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    pub fn is_conflict(&self) -> bool {
        self.kind() == ErrorKind::Conflict
    }
}

/// A specialized `Result` type for catalog service operations.
pub type CatalogResult<T> = Result<T, CatalogError>;
