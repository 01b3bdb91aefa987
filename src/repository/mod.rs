//! Repository layer: the catalog store behind a single async trait
//!
//! Two backends implement it: [`memory::MemoryRepository`] keeps identity-indexed
//! tables in process, [`postgres::PgRepository`] talks to PostgreSQL through sqlx.
//! Both keep the same integrity rules:
//! - a book always points at an existing section and existing authors
//!   (violations surface as `AppError::Validation`)
//! - deleting a book drops its authorship rows
//! - deleting an author or section still used by a book fails with `AppError::Conflict`

pub mod memory;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    error::AppResult,
    models::{Author, Book, BookRecord, NewAuthor, NewSection, NewUser, Section, User},
};

/// Shared handle to whichever backend is configured
pub type Repository = Arc<dyn BookstoreRepository>;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookstoreRepository: Send + Sync {
    /// Cheap liveness probe used by the readiness endpoint
    async fn ping(&self) -> AppResult<()>;

    async fn authors_list(&self) -> AppResult<Vec<Author>>;
    async fn authors_get(&self, id: i64) -> AppResult<Option<Author>>;
    async fn authors_create(&self, data: &NewAuthor) -> AppResult<Author>;
    /// Returns false when no such author exists
    async fn authors_delete(&self, id: i64) -> AppResult<bool>;

    async fn sections_list(&self) -> AppResult<Vec<Section>>;
    async fn sections_get(&self, id: i64) -> AppResult<Option<Section>>;
    async fn sections_create(&self, data: &NewSection) -> AppResult<Section>;
    /// Returns false when no such section exists
    async fn sections_delete(&self, id: i64) -> AppResult<bool>;

    /// All books, fully materialized, ordered by id
    async fn books_list(&self) -> AppResult<Vec<Book>>;
    async fn books_get(&self, id: i64) -> AppResult<Option<Book>>;
    async fn books_create(&self, data: &BookRecord) -> AppResult<Book>;
    /// Replaces the book row and its whole authorship set. None when absent.
    async fn books_update(&self, id: i64, data: &BookRecord) -> AppResult<Option<Book>>;
    /// Returns false when no such book exists
    async fn books_delete(&self, id: i64) -> AppResult<bool>;

    async fn users_get_by_username(&self, username: &str) -> AppResult<Option<User>>;
    async fn users_create(&self, data: &NewUser) -> AppResult<User>;
}
