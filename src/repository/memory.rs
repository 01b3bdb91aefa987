//! In-memory repository
//!
//! Each entity lives in its own id-keyed table; a book row stores only its
//! `sectionid` and authorship is a set of `(bookid, authorid)` pairs. Books are
//! materialized into the API shape on read. Every operation takes the lock once,
//! so reference checks and the write they guard are atomic.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::BookstoreRepository;
use crate::{
    error::{AppError, AppResult},
    models::{
        Author, Authorship, Book, BookRecord, NewAuthor, NewSection, NewUser, Section, User, Wrote,
    },
};

#[derive(Debug, Clone)]
struct BookRow {
    bookid: i64,
    title: String,
    isbn: String,
    copyright: Option<i32>,
    sectionid: i64,
}

#[derive(Debug, Default)]
struct Tables {
    authors: BTreeMap<i64, Author>,
    sections: BTreeMap<i64, Section>,
    books: BTreeMap<i64, BookRow>,
    wrotes: BTreeSet<Wrote>,
    users: BTreeMap<i64, User>,
    seq: Sequences,
}

/// Per-table id sequences; ids are never reused after a delete
#[derive(Debug, Default)]
struct Sequences {
    authors: i64,
    sections: i64,
    books: i64,
    users: i64,
}

fn next(seq: &mut i64) -> i64 {
    *seq += 1;
    *seq
}

impl Tables {
    fn check_references(&self, data: &BookRecord) -> AppResult<()> {
        if !self.sections.contains_key(&data.sectionid) {
            return Err(AppError::Validation(format!(
                "Section {} does not exist",
                data.sectionid
            )));
        }
        if let Some(missing) = data.author_ids.iter().find(|id| !self.authors.contains_key(id)) {
            return Err(AppError::Validation(format!("Author {} does not exist", missing)));
        }
        Ok(())
    }

    fn link_authors(&mut self, bookid: i64, author_ids: &[i64]) {
        self.wrotes.retain(|w| w.bookid != bookid);
        self.wrotes
            .extend(author_ids.iter().map(|authorid| Wrote::new(bookid, *authorid)));
    }

    fn materialize(&self, row: &BookRow) -> AppResult<Book> {
        let section = self.sections.get(&row.sectionid).cloned().ok_or_else(|| {
            AppError::Internal(format!(
                "Book {} points at missing section {}",
                row.bookid, row.sectionid
            ))
        })?;

        let wrotes = self
            .wrotes
            .range(Wrote::new(row.bookid, i64::MIN)..=Wrote::new(row.bookid, i64::MAX))
            .map(|w| {
                self.authors
                    .get(&w.authorid)
                    .cloned()
                    .map(|author| Authorship { author })
                    .ok_or_else(|| {
                        AppError::Internal(format!(
                            "Book {} points at missing author {}",
                            row.bookid, w.authorid
                        ))
                    })
            })
            .collect::<AppResult<Vec<_>>>()?;

        Ok(Book {
            bookid: row.bookid,
            title: row.title.clone(),
            isbn: row.isbn.clone(),
            copyright: row.copyright,
            section,
            wrotes,
        })
    }
}

/// Repository keeping the whole catalog in process memory
#[derive(Clone, Default)]
pub struct MemoryRepository {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookstoreRepository for MemoryRepository {
    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }

    async fn authors_list(&self) -> AppResult<Vec<Author>> {
        Ok(self.tables.read().await.authors.values().cloned().collect())
    }

    async fn authors_get(&self, id: i64) -> AppResult<Option<Author>> {
        Ok(self.tables.read().await.authors.get(&id).cloned())
    }

    async fn authors_create(&self, data: &NewAuthor) -> AppResult<Author> {
        let mut tables = self.tables.write().await;
        let author = Author {
            authorid: next(&mut tables.seq.authors),
            fname: data.fname.clone(),
            lname: data.lname.clone(),
        };
        tables.authors.insert(author.authorid, author.clone());
        Ok(author)
    }

    async fn authors_delete(&self, id: i64) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        if !tables.authors.contains_key(&id) {
            return Ok(false);
        }
        if tables.wrotes.iter().any(|w| w.authorid == id) {
            return Err(AppError::Conflict(format!(
                "Author {} is still credited on at least one book",
                id
            )));
        }
        tables.authors.remove(&id);
        Ok(true)
    }

    async fn sections_list(&self) -> AppResult<Vec<Section>> {
        Ok(self.tables.read().await.sections.values().cloned().collect())
    }

    async fn sections_get(&self, id: i64) -> AppResult<Option<Section>> {
        Ok(self.tables.read().await.sections.get(&id).cloned())
    }

    async fn sections_create(&self, data: &NewSection) -> AppResult<Section> {
        let mut tables = self.tables.write().await;
        let section = Section {
            sectionid: next(&mut tables.seq.sections),
            name: data.name.clone(),
        };
        tables.sections.insert(section.sectionid, section.clone());
        Ok(section)
    }

    async fn sections_delete(&self, id: i64) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        if !tables.sections.contains_key(&id) {
            return Ok(false);
        }
        if tables.books.values().any(|b| b.sectionid == id) {
            return Err(AppError::Conflict(format!(
                "Section {} still holds at least one book",
                id
            )));
        }
        tables.sections.remove(&id);
        Ok(true)
    }

    async fn books_list(&self) -> AppResult<Vec<Book>> {
        let tables = self.tables.read().await;
        tables.books.values().map(|row| tables.materialize(row)).collect()
    }

    async fn books_get(&self, id: i64) -> AppResult<Option<Book>> {
        let tables = self.tables.read().await;
        tables.books.get(&id).map(|row| tables.materialize(row)).transpose()
    }

    async fn books_create(&self, data: &BookRecord) -> AppResult<Book> {
        let mut tables = self.tables.write().await;
        tables.check_references(data)?;

        let row = BookRow {
            bookid: next(&mut tables.seq.books),
            title: data.title.clone(),
            isbn: data.isbn.clone(),
            copyright: data.copyright,
            sectionid: data.sectionid,
        };
        tables.link_authors(row.bookid, &data.author_ids);
        tables.books.insert(row.bookid, row.clone());
        tables.materialize(&row)
    }

    async fn books_update(&self, id: i64, data: &BookRecord) -> AppResult<Option<Book>> {
        let mut tables = self.tables.write().await;
        if !tables.books.contains_key(&id) {
            return Ok(None);
        }
        tables.check_references(data)?;

        let row = BookRow {
            bookid: id,
            title: data.title.clone(),
            isbn: data.isbn.clone(),
            copyright: data.copyright,
            sectionid: data.sectionid,
        };
        tables.link_authors(id, &data.author_ids);
        tables.books.insert(id, row.clone());
        tables.materialize(&row).map(Some)
    }

    async fn books_delete(&self, id: i64) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        if tables.books.remove(&id).is_none() {
            return Ok(false);
        }
        tables.wrotes.retain(|w| w.bookid != id);
        Ok(true)
    }

    async fn users_get_by_username(&self, username: &str) -> AppResult<Option<User>> {
        Ok(self
            .tables
            .read()
            .await
            .users
            .values()
            .find(|u| u.username.eq_ignore_ascii_case(username))
            .cloned())
    }

    async fn users_create(&self, data: &NewUser) -> AppResult<User> {
        let mut tables = self.tables.write().await;
        if tables
            .users
            .values()
            .any(|u| u.username.eq_ignore_ascii_case(&data.username))
        {
            return Err(AppError::Conflict(format!(
                "User {} already exists",
                data.username
            )));
        }
        let user = User {
            userid: next(&mut tables.seq.users),
            username: data.username.clone(),
            password: data.password_hash.clone(),
            roles: data.roles.clone(),
        };
        tables.users.insert(user.userid, user.clone());
        Ok(user)
    }
}
