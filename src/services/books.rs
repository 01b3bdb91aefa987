//! Book service: reference checks and save/replace/delete semantics

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{Book, BookInput, BookRecord},
    repository::Repository,
};

#[derive(Clone)]
pub struct BookService {
    repository: Repository,
}

impl BookService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// All books with section and authorships populated
    pub async fn find_all(&self) -> AppResult<Vec<Book>> {
        self.repository.books_list().await
    }

    pub async fn find_book_by_id(&self, id: i64) -> AppResult<Book> {
        self.repository
            .books_get(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))
    }

    /// Insert when the payload carries no id (or zero), otherwise replace that book
    pub async fn save(&self, input: &BookInput) -> AppResult<Book> {
        let record = self.checked_record(input).await?;

        match input.target_id() {
            None => {
                let book = self.repository.books_create(&record).await?;
                tracing::info!(bookid = book.bookid, title = %book.title, "Book created");
                Ok(book)
            }
            Some(id) => self.replace(id, &record).await,
        }
    }

    /// Full replace of an existing book; the path id wins over any body id
    pub async fn update(&self, id: i64, input: &BookInput) -> AppResult<Book> {
        let record = self.checked_record(input).await?;
        self.replace(id, &record).await
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        if !self.repository.books_delete(id).await? {
            return Err(AppError::NotFound(format!("Book {} not found", id)));
        }
        tracing::info!(bookid = id, "Book deleted");
        Ok(())
    }

    async fn replace(&self, id: i64, record: &BookRecord) -> AppResult<Book> {
        let book = self
            .repository
            .books_update(id, record)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))?;
        tracing::info!(bookid = id, "Book replaced");
        Ok(book)
    }

    /// Validate the payload and make sure every reference resolves
    async fn checked_record(&self, input: &BookInput) -> AppResult<BookRecord> {
        input
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        let record = BookRecord::try_from(input)?;

        if self.repository.sections_get(record.sectionid).await?.is_none() {
            tracing::warn!(sectionid = record.sectionid, "Book rejected: unknown section");
            return Err(AppError::Validation(format!(
                "Section {} does not exist",
                record.sectionid
            )));
        }

        for authorid in &record.author_ids {
            if self.repository.authors_get(*authorid).await?.is_none() {
                tracing::warn!(authorid, "Book rejected: unknown author");
                return Err(AppError::Validation(format!(
                    "Author {} does not exist",
                    authorid
                )));
            }
        }

        Ok(record)
    }
}
