//! Author service

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{Author, NewAuthor},
    repository::Repository,
};

#[derive(Clone)]
pub struct AuthorService {
    repository: Repository,
}

impl AuthorService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<Author>> {
        self.repository.authors_list().await
    }

    pub async fn get_by_id(&self, id: i64) -> AppResult<Author> {
        self.repository
            .authors_get(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Author {} not found", id)))
    }

    pub async fn create(&self, data: &NewAuthor) -> AppResult<Author> {
        data.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        let author = self.repository.authors_create(data).await?;
        tracing::info!(authorid = author.authorid, "Author created");
        Ok(author)
    }

    /// Refused with a conflict while any book still credits the author
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        if !self.repository.authors_delete(id).await? {
            return Err(AppError::NotFound(format!("Author {} not found", id)));
        }
        tracing::info!(authorid = id, "Author deleted");
        Ok(())
    }
}
