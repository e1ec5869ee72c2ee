//! Main catalog crate providing a unified interface for the book catalog.
//!
//! This crate is the primary entry point for users of the catalog. It re-exports the
//! domain core and the storage adapters.
//!
//! # Features
//!
//! - **Typed books** - `BookData` before persistence, `Book` with its store-assigned id after
//! - **Multiple adapters** - In-memory and MongoDB storage behind one `BookRepository` trait
//! - **Business rules in one place** - `BookService` guards ISBN uniqueness and turns
//!   missing records into typed errors
//!
//! # Quick Start
//!
//! ```ignore
//! use catalog::{prelude::*, memory::InMemoryBookRepository};
//!
//! #[tokio::main]
//! async fn main() {
//!     let service = BookService::new(InMemoryBookRepository::builder().build().await.unwrap());
//!
//!     let book = service
//!         .create_book(BookData::new("978-1-4920-5809-4", "Antoine de Saint-Exupéry", "The Little Prince"))
//!         .await
//!         .unwrap();
//!
//!     // A second book under the same ISBN is a conflict
//!     let err = service
//!         .create_book(BookData::new("978-1-4920-5809-4", "Someone Else", "Another Title"))
//!         .await
//!         .unwrap_err();
//!     assert!(err.is_conflict());
//!
//!     service.delete_book(&book.id).await.unwrap();
//!
//!     // Shutdown the repository
//!     service.into_repository().shutdown().await.unwrap();
//! }
//! ```
//!
//! # Dynamic Dispatch
//!
//! When the adapter is picked at runtime, wrap it in an `Arc<dyn BookRepository>`
//! ([`DynBookRepository`](repository::DynBookRepository)); the service accepts it like any
//! other repository.
//!
//! ```ignore
//! use std::sync::Arc;
//! use catalog::{prelude::*, memory::InMemoryBookRepository};
//!
//! let repository: DynBookRepository = Arc::new(InMemoryBookRepository::new());
//! let service = BookService::new(repository);
//! ```
//!
//! # Adapters
//!
//! - [`memory`] - Fast in-memory storage for development and testing
//! - [`mongodb`] - Persistent MongoDB storage (requires `mongodb` feature)

pub mod prelude;

pub use catalog_core::{book, error, repository, service};

/// In-memory storage adapter.
pub mod memory {
    pub use catalog_memory::{InMemoryBookRepository, InMemoryBookRepositoryBuilder};
}

/// MongoDB storage adapter.
///
/// This module is only available when the `mongodb` feature is enabled.
#[cfg(feature = "mongodb")]
pub mod mongodb {
    pub use catalog_mongodb::{MongoBookRepository, MongoBookRepositoryBuilder, DEFAULT_COLLECTION};
}
