//! Author endpoints

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{Author, NewAuthor},
    AppState,
};

use super::{AuthenticatedUser, ValidatedJson, ValidatedPath};

/// List all authors
#[utoipa::path(
    get,
    path = "/authors/authors",
    tag = "authors",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Author list", body = Vec<Author>)
    )
)]
pub async fn list_authors(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<Author>>> {
    claims.require_catalog_read()?;
    let authors = state.services.authors.list().await?;
    Ok(Json(authors))
}

/// Get author by ID
#[utoipa::path(
    get,
    path = "/authors/author/{authorid}",
    tag = "authors",
    security(("bearer_auth" = [])),
    params(("authorid" = i64, Path, description = "Author ID")),
    responses(
        (status = 200, description = "Author details", body = Author),
        (status = 404, description = "Author not found")
    )
)]
pub async fn get_author(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    ValidatedPath(authorid): ValidatedPath<i64>,
) -> AppResult<Json<Author>> {
    claims.require_catalog_read()?;
    let author = state.services.authors.get_by_id(authorid).await?;
    Ok(Json(author))
}

/// Create author
#[utoipa::path(
    post,
    path = "/authors/author",
    tag = "authors",
    security(("bearer_auth" = [])),
    request_body = NewAuthor,
    responses(
        (status = 201, description = "Author created", body = Author)
    )
)]
pub async fn create_author(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    ValidatedJson(data): ValidatedJson<NewAuthor>,
) -> AppResult<(StatusCode, Json<Author>)> {
    claims.require_admin()?;
    let author = state.services.authors.create(&data).await?;
    Ok((StatusCode::CREATED, Json(author)))
}

/// Delete author
#[utoipa::path(
    delete,
    path = "/authors/author/{authorid}",
    tag = "authors",
    security(("bearer_auth" = [])),
    params(("authorid" = i64, Path, description = "Author ID")),
    responses(
        (status = 200, description = "Author deleted"),
        (status = 404, description = "Author not found"),
        (status = 409, description = "Author is still credited on a book")
    )
)]
pub async fn delete_author(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    ValidatedPath(authorid): ValidatedPath<i64>,
) -> AppResult<StatusCode> {
    claims.require_admin()?;
    state.services.authors.delete(authorid).await?;
    Ok(StatusCode::OK)
}
