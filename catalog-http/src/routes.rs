//! Books API routes.
//!
//! | Method | Path            | Service call        |
//! |--------|-----------------|---------------------|
//! | GET    | `/books`        | `get_all_books`     |
//! | POST   | `/books`        | `create_book`       |
//! | GET    | `/books/{isbn}` | `get_book_by_isbn`  |
//! | PUT    | `/books/{id}`   | `update_book`       |
//! | DELETE | `/books/{id}`   | `delete_book`       |
//!
//! GET addresses a book by ISBN while PUT and DELETE address it by id, on the same
//! path segment.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use catalog::{book::BookId, repository::BookRepository, service::BookService};

use crate::{
    dto::{BookResponse, ValidBook},
    error::AppError,
};

/// Shared state handed to every handler.
#[derive(Debug)]
pub struct AppState<R: BookRepository> {
    pub service: Arc<BookService<R>>,
}

impl<R: BookRepository> AppState<R> {
    pub fn new(service: Arc<BookService<R>>) -> Self {
        Self { service }
    }
}

impl<R: BookRepository> Clone for AppState<R> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
        }
    }
}

/// Builds the books router. Attach state with [`Router::with_state`].
pub fn books_router<R>() -> Router<AppState<R>>
where
    R: BookRepository + 'static,
{
    Router::new()
        .route("/books", get(list_books::<R>).post(create_book::<R>))
        .route(
            "/books/{key}",
            get(get_book::<R>)
                .put(update_book::<R>)
                .delete(delete_book::<R>),
        )
}

async fn list_books<R: BookRepository>(
    State(state): State<AppState<R>>,
) -> Result<Json<Vec<BookResponse>>, AppError> {
    let books = state.service.get_all_books().await?;

    Ok(Json(books.into_iter().map(BookResponse::from).collect()))
}

async fn get_book<R: BookRepository>(
    State(state): State<AppState<R>>,
    Path(isbn): Path<String>,
) -> Result<Json<BookResponse>, AppError> {
    let book = state.service.get_book_by_isbn(&isbn).await?;

    Ok(Json(book.into()))
}

async fn create_book<R: BookRepository>(
    State(state): State<AppState<R>>,
    ValidBook(book): ValidBook,
) -> Result<Json<BookResponse>, AppError> {
    let book = state.service.create_book(book).await?;

    Ok(Json(book.into()))
}

async fn update_book<R: BookRepository>(
    State(state): State<AppState<R>>,
    Path(book_id): Path<String>,
    ValidBook(book): ValidBook,
) -> Result<Json<BookResponse>, AppError> {
    let book = state
        .service
        .update_book(&BookId::from(book_id), book)
        .await?;

    Ok(Json(book.into()))
}

async fn delete_book<R: BookRepository>(
    State(state): State<AppState<R>>,
    Path(book_id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.service.delete_book(&BookId::from(book_id)).await?;

    Ok(StatusCode::NO_CONTENT)
}
