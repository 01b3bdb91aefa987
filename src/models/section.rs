//! Section (catalog category) model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Section {
    pub sectionid: i64,
    pub name: String,
}

impl PartialEq for Section {
    fn eq(&self, other: &Self) -> bool {
        self.sectionid == other.sectionid
    }
}

impl Eq for Section {}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct NewSection {
    #[validate(length(min = 1, message = "Section name must not be empty"))]
    pub name: String,
}

/// Reference to an existing section inside a book payload
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
pub struct SectionRef {
    pub sectionid: i64,
}
