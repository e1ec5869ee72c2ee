//! In-memory storage implementation for the catalog.
//!
//! Books live in a HashMap keyed by id, next to a secondary index from ISBN to id,
//! both behind a single async-safe read-write lock.

use std::{collections::HashMap, sync::Arc};
use async_trait::async_trait;
use mea::rwlock::RwLock;
use bson::Uuid;
use tracing::trace;

use catalog_core::{
    book::{Book, BookData, BookId},
    error::{RepositoryError, RepositoryResult},
    repository::{BookRepository, RepositoryBuilder},
};


#[derive(Debug, Default)]
struct Shelf {
    /// Stored books: id -> book
    books: HashMap<BookId, Book>,
    /// Unique index: isbn -> id
    isbn_index: HashMap<String, BookId>,
}

impl Shelf {
    fn ensure_isbn_free(&self, isbn: &str, owner: Option<&BookId>) -> RepositoryResult<()> {
        match self.isbn_index.get(isbn) {
            Some(holder) if Some(holder) != owner => Err(
                RepositoryError::DuplicateKey("isbn".to_string(), isbn.to_string())
            ),
            _ => Ok(()),
        }
    }
}

/// Thread-safe in-memory book storage adapter.
///
/// This struct implements the [`BookRepository`] trait entirely in memory using
/// async-aware read-write locks. Ids are freshly generated UUIDs, so an id is never
/// reused, even after the book it named has been deleted.
///
/// # Thread Safety
///
/// `InMemoryBookRepository` is cloneable and uses an `Arc`-wrapped internal state, allowing
/// it to be safely shared across async tasks. Multiple clones of the same instance
/// share the same underlying data.
///
/// # Uniqueness
///
/// The ISBN check and the write happen under the same write lock, so two concurrent
/// creates for one ISBN can never both succeed; the loser gets
/// [`RepositoryError::DuplicateKey`].
///
/// # Example
///
/// ```ignore
/// use catalog_memory::InMemoryBookRepository;
/// use catalog_core::{book::BookData, repository::BookRepository};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let repository = InMemoryBookRepository::new();
///
///     let book = repository
///         .create(BookData::new("978-1-4920-5809-4", "Antoine de Saint-Exupéry", "The Little Prince"))
///         .await?;
///
///     assert_eq!(repository.find_by_isbn(&book.isbn).await?, Some(book));
///
///     Ok(())
/// }
/// ```
#[derive(Default, Clone, Debug)]
pub struct InMemoryBookRepository {
    shelf: Arc<RwLock<Shelf>>,
}

impl InMemoryBookRepository {
    /// Creates a new empty in-memory repository.
    pub fn new() -> Self {
        Self {
            shelf: Arc::new(RwLock::new(Shelf::default())),
        }
    }

    /// Creates a builder for constructing an `InMemoryBookRepository`.
    ///
    /// # Example
    ///
    /// ```ignore
    /// use catalog_memory::InMemoryBookRepository;
    ///
    /// let repository = InMemoryBookRepository::builder().build().await.unwrap();
    /// ```
    pub fn builder() -> InMemoryBookRepositoryBuilder {
        InMemoryBookRepositoryBuilder::default()
    }

    /// Creates a repository pre-populated with `books`, assigning each a fresh id.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::DuplicateKey`] if two of the books share an ISBN.
    pub async fn with_books(books: impl IntoIterator<Item = BookData>) -> RepositoryResult<Self> {
        let repository = Self::new();

        for book in books {
            repository.create(book).await?;
        }

        Ok(repository)
    }

    /// Returns the number of stored books.
    pub async fn len(&self) -> usize {
        self.shelf.read().await.books.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}


#[async_trait]
impl BookRepository for InMemoryBookRepository {
    async fn list_all(&self) -> RepositoryResult<Vec<Book>> {
        Ok(
            self.shelf
                .read()
                .await
                .books
                .values()
                .cloned()
                .collect()
        )
    }

    async fn find_by_isbn(&self, isbn: &str) -> RepositoryResult<Option<Book>> {
        let shelf = self.shelf.read().await;

        Ok(
            shelf.isbn_index
                .get(isbn)
                .and_then(|id| shelf.books.get(id))
                .cloned()
        )
    }

    async fn create(&self, book: BookData) -> RepositoryResult<Book> {
        let mut shelf = self.shelf.write().await;
        shelf.ensure_isbn_free(&book.isbn, None)?;

        let book = Book::from_data(BookId::new(Uuid::new().to_string()), book);

        shelf.isbn_index.insert(book.isbn.clone(), book.id.clone());
        shelf.books.insert(book.id.clone(), book.clone());

        trace!(id = %book.id, "inserted book");
        Ok(book)
    }

    async fn delete_by_id(&self, id: &BookId) -> RepositoryResult<Option<Book>> {
        let mut shelf = self.shelf.write().await;

        let removed = shelf.books.remove(id);
        if let Some(book) = &removed {
            shelf.isbn_index.remove(&book.isbn);
        }

        Ok(removed)
    }

    async fn update_by_id(&self, id: &BookId, new_data: BookData) -> RepositoryResult<Option<Book>> {
        let mut shelf = self.shelf.write().await;

        let previous_isbn = match shelf.books.get(id) {
            Some(book) => book.isbn.clone(),
            None => return Ok(None),
        };
        shelf.ensure_isbn_free(&new_data.isbn, Some(id))?;

        let book = Book::from_data(id.clone(), new_data);

        // Re-key the index when the isbn changes
        if previous_isbn != book.isbn {
            shelf.isbn_index.remove(&previous_isbn);
            shelf.isbn_index.insert(book.isbn.clone(), id.clone());
        }
        shelf.books.insert(id.clone(), book.clone());

        Ok(Some(book))
    }
}


/// Builder for constructing [`InMemoryBookRepository`] instances.
///
/// Optionally seeds the repository with an initial set of books.
///
/// # Example
///
/// ```ignore
/// use catalog_memory::InMemoryBookRepository;
/// use catalog_core::repository::RepositoryBuilder;
///
/// #[tokio::main]
/// async fn main() {
///     let repository = InMemoryBookRepository::builder().build().await.unwrap();
/// }
/// ```
#[derive(Default)]
pub struct InMemoryBookRepositoryBuilder {
    seed: Vec<BookData>,
}

impl InMemoryBookRepositoryBuilder {
    /// Adds books to store when the repository is built.
    pub fn seed(mut self, books: impl IntoIterator<Item = BookData>) -> Self {
        self.seed.extend(books);
        self
    }
}

#[async_trait]
impl RepositoryBuilder for InMemoryBookRepositoryBuilder {
    type Repository = InMemoryBookRepository;

    /// Builds a new [`InMemoryBookRepository`] holding the seeded books.
    async fn build(self) -> RepositoryResult<Self::Repository> {
        InMemoryBookRepository::with_books(self.seed).await
    }
}
