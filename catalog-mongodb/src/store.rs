use async_trait::async_trait;
use futures::TryStreamExt;
use bson::{Document, Bson, doc};
use mongodb::{
    Client, Collection as MongoCollection, IndexModel,
    error::{Error as MongoError, ErrorKind, WriteFailure},
    options::{ClientOptions, IndexOptions, ReturnDocument},
};
use tracing::{debug, info};
use catalog_core::{
    book::{Book, BookData, BookId},
    error::{RepositoryError, RepositoryResult},
    repository::{BookRepository, RepositoryBuilder},
};

use crate::record::{parse_id, restore_book};

/// Server error code for a unique index violation.
const DUPLICATE_KEY_CODE: i32 = 11000;

/// Default name of the collection holding books.
pub const DEFAULT_COLLECTION: &str = "books";


#[derive(Debug)]
pub struct MongoBookRepository {
    client: Client,
    database: String,
    collection: String,
}

impl MongoBookRepository {
    pub fn new(client: Client, database: String, collection: String) -> Self {
        Self { client, database, collection }
    }

    pub fn builder(dsn: &str, database: &str) -> MongoBookRepositoryBuilder {
        MongoBookRepositoryBuilder::new(dsn, database)
    }

    fn get_collection(&self) -> MongoCollection<Document> {
        self.client
            .database(&self.database)
            .collection(&self.collection)
    }

    /// Creates the unique index on `isbn`, so concurrent creates cannot both succeed.
    pub async fn ensure_indexes(&self) -> RepositoryResult<()> {
        self.get_collection()
            .create_index(
                IndexModel::builder()
                .keys(doc! { "isbn": 1 })
                .options(
                    IndexOptions::builder()
                    .unique(true)
                    .build()
                )
                .build()
            )
            .await
            .map_err(|e| RepositoryError::Initialization(e.to_string()))?;

        Ok(())
    }

    async fn shutdown(self) -> RepositoryResult<()> {
        self.client.shutdown().await;

        Ok(())
    }
}

/// Translates a driver error, recognising unique index violations on `isbn`.
fn map_write_error(err: MongoError, isbn: &str) -> RepositoryError {
    let duplicate = match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(e)) => e.code == DUPLICATE_KEY_CODE,
        ErrorKind::Command(e) => e.code == DUPLICATE_KEY_CODE,
        _ => false,
    };

    if duplicate {
        RepositoryError::DuplicateKey("isbn".to_string(), isbn.to_string())
    } else {
        RepositoryError::Backend(err.to_string())
    }
}

#[async_trait]
impl BookRepository for MongoBookRepository {
    async fn list_all(&self) -> RepositoryResult<Vec<Book>> {
        self.get_collection()
            .find(doc! {})
            .await
            .map_err(|e| RepositoryError::Backend(e.to_string()))?
            .try_collect::<Vec<Document>>()
            .await
            .map_err(|e| RepositoryError::Backend(e.to_string()))?
            .into_iter()
            .map(restore_book)
            .collect::<RepositoryResult<Vec<Book>>>()
    }

    async fn find_by_isbn(&self, isbn: &str) -> RepositoryResult<Option<Book>> {
        self.get_collection()
            .find_one(doc! { "isbn": isbn })
            .await
            .map_err(|e| RepositoryError::Backend(e.to_string()))?
            .map(restore_book)
            .transpose()
    }

    async fn create(&self, book: BookData) -> RepositoryResult<Book> {
        let inserted_id = self.get_collection()
            .insert_one(book.to_document()?)
            .await
            .map_err(|e| map_write_error(e, &book.isbn))?
            .inserted_id;

        let id = match inserted_id {
            Bson::ObjectId(oid) => BookId::new(oid.to_hex()),
            other => return Err(RepositoryError::InvalidDocument(
                format!("Expected an ObjectId for the inserted book, got {other}")
            )),
        };

        debug!(%id, collection = %self.collection, "inserted book document");
        Ok(Book::from_data(id, book))
    }

    async fn delete_by_id(&self, id: &BookId) -> RepositoryResult<Option<Book>> {
        let Some(oid) = parse_id(id) else {
            return Ok(None);
        };

        self.get_collection()
            .find_one_and_delete(doc! { "_id": oid })
            .await
            .map_err(|e| RepositoryError::Backend(e.to_string()))?
            .map(restore_book)
            .transpose()
    }

    async fn update_by_id(&self, id: &BookId, new_data: BookData) -> RepositoryResult<Option<Book>> {
        let Some(oid) = parse_id(id) else {
            return Ok(None);
        };

        self.get_collection()
            .find_one_and_update(
                doc! { "_id": oid },
                doc! { "$set": new_data.to_document()? },
            )
            .return_document(ReturnDocument::After)
            .await
            .map_err(|e| map_write_error(e, &new_data.isbn))?
            .map(restore_book)
            .transpose()
    }

    async fn shutdown(self) -> RepositoryResult<()> {
        self.shutdown().await
    }
}

pub struct MongoBookRepositoryBuilder {
    dsn: String,
    database: String,
    collection: String,
}

impl MongoBookRepositoryBuilder {
    pub fn new(dsn: &str, database: &str) -> Self {
        Self {
            dsn: dsn.to_string(),
            database: database.to_string(),
            collection: DEFAULT_COLLECTION.to_string(),
        }
    }

    /// Overrides the collection name (defaults to [`DEFAULT_COLLECTION`]).
    pub fn collection(mut self, collection: &str) -> Self {
        self.collection = collection.to_string();
        self
    }
}

#[async_trait]
impl RepositoryBuilder for MongoBookRepositoryBuilder {
    type Repository = MongoBookRepository;

    async fn build(self) -> RepositoryResult<Self::Repository> {
        let repository = MongoBookRepository::new(
            Client::with_options(
                ClientOptions::parse(&self.dsn)
                    .await
                    .map_err(|e| RepositoryError::Initialization(e.to_string()))?,
            )
            .map_err(|e| RepositoryError::Initialization(e.to_string()))?,
            self.database,
            self.collection,
        );

        repository.ensure_indexes().await?;

        info!(
            database = %repository.database,
            collection = %repository.collection,
            "connected to MongoDB"
        );
        Ok(repository)
    }
}
