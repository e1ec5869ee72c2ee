//! MongoDB storage adapter for the catalog.
//!
//! This crate provides a MongoDB-based implementation of the `BookRepository` trait,
//! enabling persistent book storage.
//!
//! To use this adapter, include the `mongodb` feature in your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! catalog = { version = "x.y.z", features = ["mongodb"] }
//! ```
//!
//! # Features
//!
//! - **Persistent storage** - Books are stored in one collection (`books` by default)
//! - **Unique ISBNs** - A unique index on `isbn` is created when the adapter is built,
//!   and duplicate-key errors surface as `RepositoryError::DuplicateKey`
//! - **Async/await** - Fully asynchronous API built on MongoDB's async driver
//!
//! # Identifiers
//!
//! Book ids are the hex form of the document's `ObjectId`. A string that does not parse
//! as an `ObjectId` is treated like any other unknown id: lookups by it find nothing.
//!
//! # Example
//!
//! ```ignore
//! use catalog::{repository::RepositoryBuilder, mongodb::MongoBookRepository};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let repository = MongoBookRepository::builder("mongodb://localhost:27017", "local")
//!         .build()
//!         .await?;
//!
//!     Ok(())
//! }
//! ```

pub mod store;
mod record;

pub use store::{MongoBookRepository, MongoBookRepositoryBuilder, DEFAULT_COLLECTION};
