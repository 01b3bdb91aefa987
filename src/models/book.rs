//! Book model and related types
//!
//! A [`Book`] is what clients see: the book row with its section and
//! authorship links materialized. The store never holds that shape; it keeps
//! book rows with a `sectionid` and [`Wrote`](super::Wrote) pairs, and builds
//! the view on read.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        author::{Author, AuthorRef},
        section::{Section, SectionRef},
    },
};

/// Full book as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Book {
    pub bookid: i64,
    pub title: String,
    /// Opaque identifier, not checksum-validated
    pub isbn: String,
    /// Publication year
    pub copyright: Option<i32>,
    pub section: Section,
    /// Authorship links, ordered by author id
    pub wrotes: Vec<Authorship>,
}

impl PartialEq for Book {
    fn eq(&self, other: &Self) -> bool {
        self.bookid == other.bookid
    }
}

impl Eq for Book {}

impl Book {
    /// Ids of every author linked to this book
    pub fn author_ids(&self) -> Vec<i64> {
        self.wrotes.iter().map(|w| w.author.authorid).collect()
    }
}

/// One authorship link as seen from a book
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Authorship {
    pub author: Author,
}

/// Authorship link inside a book payload
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WroteInput {
    pub author: AuthorRef,
}

/// Create / full-replace book request
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct BookInput {
    /// Ignored on create; on save, a non-zero id means "replace this book"
    #[serde(default)]
    pub bookid: Option<i64>,
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: String,
    #[validate(length(min = 1, message = "ISBN must not be empty"))]
    pub isbn: String,
    #[serde(default)]
    pub copyright: Option<i32>,
    #[serde(default)]
    pub section: Option<SectionRef>,
    #[serde(default)]
    pub wrotes: Vec<WroteInput>,
}

impl BookInput {
    /// Id of the book this payload targets, if any. Zero counts as absent.
    pub fn target_id(&self) -> Option<i64> {
        self.bookid.filter(|id| *id != 0)
    }
}

/// Normalized write form handed to the repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookRecord {
    pub title: String,
    pub isbn: String,
    pub copyright: Option<i32>,
    pub sectionid: i64,
    /// Distinct author ids in first-seen order
    pub author_ids: Vec<i64>,
}

impl TryFrom<&BookInput> for BookRecord {
    type Error = AppError;

    fn try_from(input: &BookInput) -> AppResult<Self> {
        let section = input
            .section
            .ok_or_else(|| AppError::Validation("A book must reference a section".to_string()))?;

        let mut author_ids: Vec<i64> = Vec::with_capacity(input.wrotes.len());
        for wrote in &input.wrotes {
            if !author_ids.contains(&wrote.author.authorid) {
                author_ids.push(wrote.author.authorid);
            }
        }

        Ok(Self {
            title: input.title.clone(),
            isbn: input.isbn.clone(),
            copyright: input.copyright,
            sectionid: section.sectionid,
            author_ids,
        })
    }
}
