//! Business rules for managing the catalog.
//!
//! [`BookService`] sits between the outer layers and a [`BookRepository`]. It turns
//! "no such record" answers from the repository into typed [`CatalogError`]s and guards
//! the uniqueness of ISBNs.

use tracing::{debug, info, warn};

use crate::{
    book::{Book, BookData, BookId},
    error::{CatalogError, CatalogResult, RepositoryError},
    repository::BookRepository,
};

/// Application service for the catalog.
///
/// The service holds nothing but its repository: every call is an independent round
/// trip to storage, and no records are cached between calls.
///
/// # Example
///
/// ```ignore
/// use catalog::{prelude::*, memory::InMemoryBookRepository};
///
/// let service = BookService::new(InMemoryBookRepository::new());
///
/// let book = service
///     .create_book(BookData::new("978-1-4920-5809-4", "Antoine de Saint-Exupéry", "The Little Prince"))
///     .await?;
///
/// assert_eq!(service.get_book_by_isbn("978-1-4920-5809-4").await?, book);
/// ```
#[derive(Debug)]
pub struct BookService<R: BookRepository> {
    repository: R,
}

impl<R: BookRepository> BookService<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    /// Returns a reference to the underlying repository.
    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Consumes the service, handing back the repository (e.g. to shut it down).
    pub fn into_repository(self) -> R {
        self.repository
    }

    /// Retrieves all books in the catalog.
    pub async fn get_all_books(&self) -> CatalogResult<Vec<Book>> {
        let books = self.repository.list_all().await?;
        debug!(count = books.len(), "listed books");

        Ok(books)
    }

    /// Retrieves a book by its ISBN.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::BookNotFoundByIsbn`] if no book has this ISBN.
    pub async fn get_book_by_isbn(&self, isbn: &str) -> CatalogResult<Book> {
        self.repository
            .find_by_isbn(isbn)
            .await?
            .ok_or_else(|| CatalogError::BookNotFoundByIsbn(isbn.to_string()))
    }

    /// Adds a new book to the catalog.
    ///
    /// The returned book is exactly what the repository produced, including its new id.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::BookAlreadyExists`] if a book with the same ISBN is already
    /// stored. Storage is left untouched in that case.
    pub async fn create_book(&self, book: BookData) -> CatalogResult<Book> {
        if self.repository.find_by_isbn(&book.isbn).await?.is_some() {
            warn!(isbn = %book.isbn, "rejected duplicate book");
            return Err(CatalogError::BookAlreadyExists(book.isbn));
        }

        let isbn = book.isbn.clone();
        let created = self
            .repository
            .create(book)
            .await
            .map_err(|err| duplicate_as_conflict(err, &isbn))?;

        info!(id = %created.id, isbn = %created.isbn, "created book");
        Ok(created)
    }

    /// Removes a book from the catalog.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::BookNotFoundById`] if no book has this id.
    pub async fn delete_book(&self, id: &BookId) -> CatalogResult<()> {
        let deleted = self
            .repository
            .delete_by_id(id)
            .await?
            .ok_or_else(|| CatalogError::BookNotFoundById(id.clone()))?;

        info!(id = %deleted.id, isbn = %deleted.isbn, "deleted book");
        Ok(())
    }

    /// Replaces the fields of a book.
    ///
    /// The ISBN may change, as long as it stays unique.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::BookNotFoundById`] if no book has this id
    /// - [`CatalogError::BookAlreadyExists`] if the new ISBN belongs to another book
    pub async fn update_book(&self, id: &BookId, book: BookData) -> CatalogResult<Book> {
        let isbn = book.isbn.clone();
        let updated = self
            .repository
            .update_by_id(id, book)
            .await
            .map_err(|err| duplicate_as_conflict(err, &isbn))?
            .ok_or_else(|| CatalogError::BookNotFoundById(id.clone()))?;

        info!(id = %updated.id, isbn = %updated.isbn, "updated book");
        Ok(updated)
    }
}

/// A storage-level uniqueness violation on a write is the same conflict the service
/// guards against, reached through a concurrent writer.
fn duplicate_as_conflict(err: RepositoryError, isbn: &str) -> CatalogError {
    match err {
        RepositoryError::DuplicateKey(..) => {
            warn!(isbn = %isbn, "storage rejected duplicate isbn");
            CatalogError::BookAlreadyExists(isbn.to_string())
        }
        other => CatalogError::Repository(other),
    }
}
