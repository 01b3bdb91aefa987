//! Section service

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{NewSection, Section},
    repository::Repository,
};

#[derive(Clone)]
pub struct SectionService {
    repository: Repository,
}

impl SectionService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<Section>> {
        self.repository.sections_list().await
    }

    pub async fn get_by_id(&self, id: i64) -> AppResult<Section> {
        self.repository
            .sections_get(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Section {} not found", id)))
    }

    pub async fn create(&self, data: &NewSection) -> AppResult<Section> {
        data.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        let section = self.repository.sections_create(data).await?;
        tracing::info!(sectionid = section.sectionid, name = %section.name, "Section created");
        Ok(section)
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        if !self.repository.sections_delete(id).await? {
            return Err(AppError::NotFound(format!("Section {} not found", id)));
        }
        tracing::info!(sectionid = id, "Section deleted");
        Ok(())
    }
}
