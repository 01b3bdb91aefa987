//! Book endpoints
//!
//! Every route requires a principal holding ADMIN or DATA.

use axum::{
    extract::State,
    http::{header, StatusCode},
    Json,
};

use crate::{
    error::AppResult,
    models::{Book, BookInput},
    AppState,
};

use super::{AuthenticatedUser, ValidatedJson, ValidatedPath};

/// List all books
#[utoipa::path(
    get,
    path = "/books/books",
    tag = "books",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All books with section and authors", body = Vec<Book>),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "ADMIN or DATA role required")
    )
)]
pub async fn list_all_books(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<Book>>> {
    claims.require_book_access()?;
    let books = state.services.books.find_all().await?;
    Ok(Json(books))
}

/// Get book by ID
#[utoipa::path(
    get,
    path = "/books/book/{bookid}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(("bookid" = i64, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book details", body = Book),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book_by_id(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    ValidatedPath(bookid): ValidatedPath<i64>,
) -> AppResult<Json<Book>> {
    claims.require_book_access()?;
    let book = state.services.books.find_book_by_id(bookid).await?;
    Ok(Json(book))
}

/// Create a new book
#[utoipa::path(
    post,
    path = "/books/book",
    tag = "books",
    security(("bearer_auth" = [])),
    request_body = BookInput,
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 400, description = "Invalid payload or unknown section/author")
    )
)]
pub async fn add_new_book(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    ValidatedJson(mut input): ValidatedJson<BookInput>,
) -> AppResult<(StatusCode, [(header::HeaderName, String); 1], Json<Book>)> {
    claims.require_book_access()?;

    // always an insert, whatever id the client sent
    input.bookid = None;
    let book = state.services.books.save(&input).await?;

    let location = format!("/books/book/{}", book.bookid);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(book)))
}

/// Replace a book
#[utoipa::path(
    put,
    path = "/books/book/{bookid}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(("bookid" = i64, Path, description = "Book ID")),
    request_body = BookInput,
    responses(
        (status = 200, description = "Book replaced", body = Book),
        (status = 400, description = "Invalid payload or unknown section/author"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn update_full_book(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    ValidatedPath(bookid): ValidatedPath<i64>,
    ValidatedJson(input): ValidatedJson<BookInput>,
) -> AppResult<Json<Book>> {
    claims.require_book_access()?;
    let book = state.services.books.update(bookid, &input).await?;
    Ok(Json(book))
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/books/book/{bookid}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(("bookid" = i64, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book deleted"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn delete_book_by_id(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    ValidatedPath(bookid): ValidatedPath<i64>,
) -> AppResult<StatusCode> {
    claims.require_book_access()?;
    state.services.books.delete(bookid).await?;
    Ok(StatusCode::OK)
}
