//! Data models for the bookstore

pub mod author;
pub mod book;
pub mod section;
pub mod user;
pub mod wrote;

// Re-export commonly used types
pub use author::{Author, AuthorRef, NewAuthor};
pub use book::{Authorship, Book, BookInput, BookRecord, WroteInput};
pub use section::{NewSection, Section, SectionRef};
pub use user::{NewUser, Role, User, UserClaims};
pub use wrote::Wrote;
