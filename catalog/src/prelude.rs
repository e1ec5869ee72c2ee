//! Convenient re-exports of commonly used types from the catalog.
//!
//! Import this prelude module to quickly access the most frequently used types
//! and traits without needing to import from multiple sub-modules:
//!
//! ```ignore
//! use catalog::prelude::*;
//! ```

pub use catalog_core::{
    book::{Book, BookData, BookId},
    repository::{BookRepository, DynBookRepository, RepositoryBuilder},
    service::BookService,
    error::{CatalogError, CatalogResult, ErrorKind, RepositoryError, RepositoryResult},
};
