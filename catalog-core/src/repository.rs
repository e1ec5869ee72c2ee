//! Storage abstraction for the catalog.
//!
//! This module defines the port that storage adapters plug into, allowing the
//! [`BookService`](crate::service::BookService) to work with any datastore offering
//! point lookup by a unique key, point lookup/update/delete by a generated identifier,
//! and a full scan.
//!
//! # Traits
//!
//! - [`BookRepository`]: The contract every storage adapter implements
//! - [`RepositoryBuilder`]: Factory trait for creating adapter instances
//!
//! # Absence is not an error
//!
//! Every lookup, update and delete reports a missing record as `Ok(None)`. Whether
//! absence is a failure is decided one layer up, where the business context lives.
//! Errors returned from this module are reserved for the datastore itself misbehaving.

use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

use crate::{
    book::{Book, BookData, BookId},
    error::RepositoryResult,
};

/// Abstract interface for book storage adapters.
///
/// # Thread Safety
///
/// All implementations must be thread-safe and support concurrent access from multiple
/// async tasks. The exact concurrency model is implementation-specific.
///
/// # Uniqueness
///
/// The caller checks `isbn` uniqueness before [`create`](BookRepository::create), but that
/// check and the insert are separate round trips. Adapters should enforce uniqueness
/// themselves and report a violation as
/// [`RepositoryError::DuplicateKey`](crate::error::RepositoryError::DuplicateKey), from both
/// `create` and `update_by_id`.
#[async_trait]
pub trait BookRepository: Send + Sync + Debug {
    /// Returns every stored book.
    ///
    /// Order is defined by the adapter. An empty store yields an empty vector.
    async fn list_all(&self) -> RepositoryResult<Vec<Book>>;

    /// Looks up a book by its ISBN.
    ///
    /// # Returns
    ///
    /// Returns `Ok(Some(book))` if a book is stored under `isbn`, `Ok(None)` otherwise.
    async fn find_by_isbn(&self, isbn: &str) -> RepositoryResult<Option<Book>>;

    /// Persists a new book and returns it with its assigned id.
    ///
    /// # Arguments
    ///
    /// * `book` - The fields of the new book. The adapter generates the id.
    async fn create(&self, book: BookData) -> RepositoryResult<Book>;

    /// Removes the book with the given id.
    ///
    /// # Returns
    ///
    /// Returns the removed book as it was before deletion, or `Ok(None)` if no book
    /// has this id.
    async fn delete_by_id(&self, id: &BookId) -> RepositoryResult<Option<Book>>;

    /// Replaces the fields of the book with the given id.
    ///
    /// # Arguments
    ///
    /// * `id` - The id of the book to update. It is never changed by this call.
    /// * `new_data` - The replacement field values
    ///
    /// # Returns
    ///
    /// Returns the book after the update, or `Ok(None)` if no book has this id.
    async fn update_by_id(&self, id: &BookId, new_data: BookData) -> RepositoryResult<Option<Book>>;

    /// Cleanly shuts down the adapter, releasing all resources.
    ///
    /// The default implementation is a no-op, but adapters holding external
    /// connections should override this.
    async fn shutdown(self) -> RepositoryResult<()>
    where
        Self: Sized,
    {
        Ok(())
    }
}

#[async_trait]
impl<R> BookRepository for &R
where
    R: BookRepository + ?Sized,
{
    async fn list_all(&self) -> RepositoryResult<Vec<Book>> {
        (**self).list_all().await
    }

    async fn find_by_isbn(&self, isbn: &str) -> RepositoryResult<Option<Book>> {
        (**self).find_by_isbn(isbn).await
    }

    async fn create(&self, book: BookData) -> RepositoryResult<Book> {
        (**self).create(book).await
    }

    async fn delete_by_id(&self, id: &BookId) -> RepositoryResult<Option<Book>> {
        (**self).delete_by_id(id).await
    }

    async fn update_by_id(&self, id: &BookId, new_data: BookData) -> RepositoryResult<Option<Book>> {
        (**self)
            .update_by_id(id, new_data)
            .await
    }
}

#[async_trait]
impl<R> BookRepository for Arc<R>
where
    R: BookRepository + ?Sized,
{
    async fn list_all(&self) -> RepositoryResult<Vec<Book>> {
        (**self).list_all().await
    }

    async fn find_by_isbn(&self, isbn: &str) -> RepositoryResult<Option<Book>> {
        (**self).find_by_isbn(isbn).await
    }

    async fn create(&self, book: BookData) -> RepositoryResult<Book> {
        (**self).create(book).await
    }

    async fn delete_by_id(&self, id: &BookId) -> RepositoryResult<Option<Book>> {
        (**self).delete_by_id(id).await
    }

    async fn update_by_id(&self, id: &BookId, new_data: BookData) -> RepositoryResult<Option<Book>> {
        (**self)
            .update_by_id(id, new_data)
            .await
    }
}

/// A shared, dynamically dispatched repository, for when the adapter is chosen at runtime.
pub type DynBookRepository = Arc<dyn BookRepository>;

#[async_trait]
pub trait RepositoryBuilder {
    type Repository: BookRepository;

    async fn build(self) -> RepositoryResult<Self::Repository>;
}
