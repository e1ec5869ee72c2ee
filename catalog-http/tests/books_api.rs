use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use catalog::{memory::InMemoryBookRepository, service::BookService};
use catalog_http::{build_router, settings::ServerSettings};
use serde_json::{json, Value};
use tower::ServiceExt;

fn app() -> Router {
    let service = Arc::new(BookService::new(InMemoryBookRepository::new()));
    build_router(service, &ServerSettings::default())
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };

    (status, value)
}

fn little_prince() -> Value {
    json!({
        "isbn": "978-1-4920-5809-4",
        "title": "The Little Prince",
        "author": "Antoine de Saint-Exupéry",
    })
}

#[tokio::test]
async fn health_check_responds_ok() {
    let (status, body) = send(&app(), Method::GET, "/healthz", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("ok".into()));
}

#[tokio::test]
async fn list_starts_empty() {
    let (status, body) = send(&app(), Method::GET, "/books", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn create_then_conflict_then_lookup_then_delete() {
    let app = app();

    let (status, created) = send(&app, Method::POST, "/books", Some(little_prince())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["isbn"], "978-1-4920-5809-4");
    assert_eq!(created["title"], "The Little Prince");
    assert_eq!(created["author"], "Antoine de Saint-Exupéry");
    assert_eq!(created["description"], "");
    let id = created["id"].as_str().unwrap().to_string();

    let (status, body) = send(&app, Method::POST, "/books", Some(little_prince())).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "conflict");
    assert_eq!(body["error"]["message"], "Book with ISBN 978-1-4920-5809-4 already exists.");

    let (status, found) = send(&app, Method::GET, "/books/978-1-4920-5809-4", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found, created);

    let (status, body) = send(&app, Method::DELETE, &format!("/books/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, body) = send(&app, Method::DELETE, &format!("/books/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "not_found");
}

#[tokio::test]
async fn unknown_isbn_is_404() {
    let (status, body) = send(&app(), Method::GET, "/books/978-0-0000-0000-2", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["message"], "Book with ISBN 978-0-0000-0000-2 not found.");
}

#[tokio::test]
async fn update_replaces_fields() {
    let app = app();
    let (_, created) = send(&app, Method::POST, "/books", Some(little_prince())).await;
    let id = created["id"].as_str().unwrap();

    let revised = json!({
        "isbn": "978-1-4920-5809-4",
        "title": "Le Petit Prince",
        "author": "Antoine de Saint-Exupéry",
        "description": "Original French edition",
    });
    let (status, updated) = send(&app, Method::PUT, &format!("/books/{id}"), Some(revised)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["id"], created["id"]);
    assert_eq!(updated["title"], "Le Petit Prince");

    let (_, found) = send(&app, Method::GET, "/books/978-1-4920-5809-4", None).await;
    assert_eq!(found["description"], "Original French edition");
}

#[tokio::test]
async fn update_unknown_id_is_404() {
    let (status, _) = send(&app(), Method::PUT, "/books/does-not-exist", Some(little_prince())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_onto_taken_isbn_is_409() {
    let app = app();
    send(&app, Method::POST, "/books", Some(little_prince())).await;
    let (_, other) = send(
        &app,
        Method::POST,
        "/books",
        Some(json!({
            "isbn": "978-0-4650-2656-2",
            "title": "Gödel, Escher, Bach",
            "author": "Douglas Hofstadter",
        })),
    )
    .await;
    let id = other["id"].as_str().unwrap();

    let (status, _) = send(&app, Method::PUT, &format!("/books/{id}"), Some(little_prince())).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn invalid_isbn_is_422_with_details() {
    let (status, body) = send(
        &app(),
        Method::POST,
        "/books",
        Some(json!({ "isbn": "9781492058094", "title": "", "author": "Someone" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "validation_error");
    assert_eq!(
        body["error"]["details"],
        json!([
            { "field": "isbn", "error": "must be exactly 17 characters" },
            { "field": "title", "error": "must not be empty" },
        ])
    );
}

#[tokio::test]
async fn missing_field_is_422() {
    let (status, body) = send(
        &app(),
        Method::POST,
        "/books",
        Some(json!({ "isbn": "978-1-4920-5809-4", "title": "The Little Prince" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "validation_error");
}

#[tokio::test]
async fn malformed_json_is_400() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/books")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn client_supplied_id_is_ignored_on_create() {
    let mut body = little_prince();
    body["id"] = json!("chosen-by-client");

    let (status, created) = send(&app(), Method::POST, "/books", Some(body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_ne!(created["id"], "chosen-by-client");
}

#[tokio::test]
async fn list_returns_created_books() {
    let app = app();
    let (_, created) = send(&app, Method::POST, "/books", Some(little_prince())).await;

    let (status, body) = send(&app, Method::GET, "/books", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([created]));
}
