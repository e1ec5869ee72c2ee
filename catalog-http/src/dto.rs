//! Request and response bodies for the books API.
//!
//! Validation happens here, at the transport boundary; the service trusts the
//! [`BookData`] it is handed.

use axum::{
    extract::{FromRequest, Request},
    Json,
};
use catalog::book::{Book, BookData, ISBN_DIGITS, ISBN_LENGTH};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Incoming book fields for create and update.
///
/// An `id` in the body is ignored: ids come from the store on create and from the
/// path on update.
#[derive(Debug, Clone, Deserialize)]
pub struct BookPayload {
    pub isbn: String,
    pub author: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// A single rule a payload broke.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: &'static str,
    pub error: String,
}

impl FieldViolation {
    fn new(field: &'static str, error: impl Into<String>) -> Self {
        Self { field, error: error.into() }
    }
}

impl BookPayload {
    /// Checks the payload against the boundary rules, collecting every violation.
    pub fn validate(&self) -> Result<(), Vec<FieldViolation>> {
        let mut violations = Vec::new();

        if let Some(error) = isbn_error(&self.isbn) {
            violations.push(FieldViolation::new("isbn", error));
        }
        if self.author.trim().is_empty() {
            violations.push(FieldViolation::new("author", "must not be empty"));
        }
        if self.title.trim().is_empty() {
            violations.push(FieldViolation::new("title", "must not be empty"));
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

fn isbn_error(isbn: &str) -> Option<String> {
    if isbn.chars().count() != ISBN_LENGTH {
        return Some(format!("must be exactly {ISBN_LENGTH} characters"));
    }
    if !isbn.chars().all(|c| c.is_ascii_digit() || c == '-') {
        return Some("may only contain digits and hyphens".to_string());
    }
    if isbn.chars().filter(char::is_ascii_digit).count() != ISBN_DIGITS {
        return Some(format!("must contain exactly {ISBN_DIGITS} digits"));
    }

    None
}

impl From<BookPayload> for BookData {
    fn from(payload: BookPayload) -> Self {
        BookData {
            isbn: payload.isbn,
            author: payload.author,
            title: payload.title,
            description: payload.description,
        }
    }
}

/// Extractor yielding book data that passed boundary validation.
#[derive(Debug)]
pub struct ValidBook(pub BookData);

impl<S> FromRequest<S> for ValidBook
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(payload) = Json::<BookPayload>::from_request(req, state).await?;

        payload.validate().map_err(|violations| {
            AppError::validation(
                violations
                    .iter()
                    .filter_map(|v| serde_json::to_value(v).ok())
                    .collect(),
                "Invalid book",
            )
        })?;

        Ok(Self(payload.into()))
    }
}

/// Outgoing book representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookResponse {
    pub id: String,
    pub isbn: String,
    pub author: String,
    pub title: String,
    pub description: String,
}

impl From<Book> for BookResponse {
    fn from(book: Book) -> Self {
        Self {
            id: book.id.into_inner(),
            isbn: book.isbn,
            author: book.author,
            title: book.title,
            description: book.description,
        }
    }
}
