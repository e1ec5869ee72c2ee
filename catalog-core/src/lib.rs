//! Domain core of the book catalog.
//!
//! This crate holds everything that does not depend on a particular datastore or transport:
//!
//! - **Book entity** ([`book`]) - The record shape and its identifiers
//! - **Repository contract** ([`repository`]) - The port storage adapters implement
//! - **Application service** ([`service`]) - Business rules over the repository
//! - **Error handling** ([`error`]) - Repository failures and the domain error taxonomy
//!
//! # Example
//!
//! ```ignore
//! use catalog_core::{book::BookData, service::BookService};
//!
//! async fn add(service: &BookService<impl catalog_core::repository::BookRepository>) {
//!     let book = service
//!         .create_book(BookData::new("978-1-4920-5809-4", "Antoine de Saint-Exupéry", "The Little Prince"))
//!         .await
//!         .unwrap();
//!
//!     println!("stored under {}", book.id);
//! }
//! ```

pub mod book;
pub mod error;
pub mod repository;
pub mod service;
