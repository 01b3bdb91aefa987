//! Business logic services

pub mod auth;
pub mod authors;
pub mod books;
pub mod sections;

use crate::{config::AuthConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub auth: auth::AuthService,
    pub authors: authors::AuthorService,
    pub books: books::BookService,
    pub sections: sections::SectionService,
    repository: Repository,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, auth_config: AuthConfig) -> Self {
        Self {
            auth: auth::AuthService::new(repository.clone(), auth_config),
            authors: authors::AuthorService::new(repository.clone()),
            books: books::BookService::new(repository.clone()),
            sections: sections::SectionService::new(repository.clone()),
            repository,
        }
    }

    /// Check the backing store answers
    pub async fn ping(&self) -> crate::error::AppResult<()> {
        self.repository.ping().await
    }
}
