//! Book-Author junction model (N:M relationship)

use serde::{Deserialize, Serialize};

/// Junction row recording that an author wrote a book.
/// The pair is the whole identity; the store never holds the same pair twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Wrote {
    pub bookid: i64,
    pub authorid: i64,
}

impl Wrote {
    pub fn new(bookid: i64, authorid: i64) -> Self {
        Self { bookid, authorid }
    }
}
