//! Author model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Author record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Author {
    pub authorid: i64,
    /// First name
    pub fname: String,
    /// Last name
    pub lname: String,
}

impl PartialEq for Author {
    fn eq(&self, other: &Self) -> bool {
        self.authorid == other.authorid
    }
}

impl Eq for Author {}

impl std::hash::Hash for Author {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.authorid.hash(state);
    }
}

/// Create author request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct NewAuthor {
    #[validate(length(min = 1, message = "First name must not be empty"))]
    pub fname: String,
    #[validate(length(min = 1, message = "Last name must not be empty"))]
    pub lname: String,
}

/// Reference to an existing author inside a book payload.
/// Any other author fields sent along are ignored.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
pub struct AuthorRef {
    pub authorid: i64,
}
