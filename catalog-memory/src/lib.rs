//! In-memory storage adapter for the catalog.
//!
//! This crate provides a thread-safe, in-memory implementation of the `BookRepository` trait.
//! It uses async-aware read-write locks for concurrent access and is ideal for development,
//! testing, and small-scale deployments.
//!
//! # Features
//!
//! - **Thread-safe access** - Concurrent reads and writes using async-aware RwLock
//! - **Unique ISBNs** - Enforced under the write lock, closing the create race
//! - **Never-reused ids** - Each book gets a fresh UUID
//!
//! # Quick Start
//!
//! ```ignore
//! use catalog::{prelude::*, memory::InMemoryBookRepository};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let repository = InMemoryBookRepository::builder().build().await?;
//!     let service = BookService::new(repository);
//!
//!     service
//!         .create_book(BookData::new("978-1-4920-5809-4", "Antoine de Saint-Exupéry", "The Little Prince"))
//!         .await?;
//!
//!     Ok(())
//! }
//! ```

pub mod store;

pub use store::{InMemoryBookRepository, InMemoryBookRepositoryBuilder};
