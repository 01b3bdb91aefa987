//! PostgreSQL repository
//!
//! Integrity rules are carried by the schema (see `migrations/`): foreign keys
//! reject dangling section/author references and referenced deletes, and
//! `wrotes.bookid` cascades. This module maps those violations onto
//! `AppError` variants.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::{postgres::PgRow, Pool, Postgres, Row, Transaction};

use super::BookstoreRepository;
use crate::{
    error::{AppError, AppResult},
    models::{
        Author, Authorship, Book, BookRecord, NewAuthor, NewSection, NewUser, Role, Section, User,
    },
};

const FOREIGN_KEY_VIOLATION: &str = "23503";
const UNIQUE_VIOLATION: &str = "23505";

const BOOK_SELECT: &str = r#"
    SELECT b.bookid, b.title, b.isbn, b.copyright,
           s.sectionid, s.name AS section_name
    FROM books b
    JOIN sections s ON s.sectionid = b.sectionid
"#;

fn has_code(err: &sqlx::Error, code: &str) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.code().as_deref() == Some(code))
}

/// A write pointed at a section or author that does not exist
fn missing_reference(err: sqlx::Error) -> AppError {
    if has_code(&err, FOREIGN_KEY_VIOLATION) {
        AppError::Validation("Referenced section or author does not exist".to_string())
    } else {
        AppError::Database(err)
    }
}

/// A delete hit a row that is still referenced
fn still_referenced(err: sqlx::Error, what: &str) -> AppError {
    if has_code(&err, FOREIGN_KEY_VIOLATION) {
        AppError::Conflict(format!("{} is still referenced by a book", what))
    } else {
        AppError::Database(err)
    }
}

fn book_from_row(row: &PgRow, wrotes: Vec<Authorship>) -> Book {
    Book {
        bookid: row.get("bookid"),
        title: row.get("title"),
        isbn: row.get("isbn"),
        copyright: row.get("copyright"),
        section: Section {
            sectionid: row.get("sectionid"),
            name: row.get("section_name"),
        },
        wrotes,
    }
}

fn user_from_row(row: &PgRow) -> User {
    let roles: Vec<String> = row.get("roles");
    User {
        userid: row.get("userid"),
        username: row.get("username"),
        password: row.get("password"),
        roles: roles
            .iter()
            .filter_map(|r| match r.parse::<Role>() {
                Ok(role) => Some(role),
                Err(e) => {
                    tracing::warn!("Ignoring stored role: {}", e);
                    None
                }
            })
            .collect(),
    }
}

#[derive(Clone)]
pub struct PgRepository {
    pool: Pool<Postgres>,
}

impl PgRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Load authorships grouped by book, optionally for a single book
    async fn load_authorships(&self, bookid: Option<i64>) -> AppResult<HashMap<i64, Vec<Authorship>>> {
        let rows = sqlx::query(
            r#"
            SELECT w.bookid, a.authorid, a.fname, a.lname
            FROM wrotes w
            JOIN authors a ON a.authorid = w.authorid
            WHERE ($1::BIGINT IS NULL OR w.bookid = $1)
            ORDER BY w.bookid, a.authorid
            "#,
        )
        .bind(bookid)
        .fetch_all(&self.pool)
        .await?;

        let mut grouped: HashMap<i64, Vec<Authorship>> = HashMap::new();
        for r in &rows {
            grouped.entry(r.get("bookid")).or_default().push(Authorship {
                author: Author {
                    authorid: r.get("authorid"),
                    fname: r.get("fname"),
                    lname: r.get("lname"),
                },
            });
        }
        Ok(grouped)
    }

    async fn link_authors(
        tx: &mut Transaction<'_, Postgres>,
        bookid: i64,
        author_ids: &[i64],
    ) -> AppResult<()> {
        sqlx::query("DELETE FROM wrotes WHERE bookid = $1")
            .bind(bookid)
            .execute(&mut **tx)
            .await?;

        if author_ids.is_empty() {
            return Ok(());
        }

        sqlx::query("INSERT INTO wrotes (bookid, authorid) SELECT $1, UNNEST($2::BIGINT[])")
            .bind(bookid)
            .bind(author_ids)
            .execute(&mut **tx)
            .await
            .map_err(missing_reference)?;
        Ok(())
    }
}

#[async_trait]
impl BookstoreRepository for PgRepository {
    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn authors_list(&self) -> AppResult<Vec<Author>> {
        let rows = sqlx::query_as::<_, Author>(
            "SELECT authorid, fname, lname FROM authors ORDER BY authorid",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn authors_get(&self, id: i64) -> AppResult<Option<Author>> {
        let row = sqlx::query_as::<_, Author>(
            "SELECT authorid, fname, lname FROM authors WHERE authorid = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn authors_create(&self, data: &NewAuthor) -> AppResult<Author> {
        let row = sqlx::query_as::<_, Author>(
            "INSERT INTO authors (fname, lname) VALUES ($1, $2) RETURNING authorid, fname, lname",
        )
        .bind(&data.fname)
        .bind(&data.lname)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn authors_delete(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM authors WHERE authorid = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| still_referenced(e, &format!("Author {}", id)))?;
        Ok(result.rows_affected() > 0)
    }

    async fn sections_list(&self) -> AppResult<Vec<Section>> {
        let rows = sqlx::query_as::<_, Section>(
            "SELECT sectionid, name FROM sections ORDER BY sectionid",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn sections_get(&self, id: i64) -> AppResult<Option<Section>> {
        let row = sqlx::query_as::<_, Section>(
            "SELECT sectionid, name FROM sections WHERE sectionid = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn sections_create(&self, data: &NewSection) -> AppResult<Section> {
        let row = sqlx::query_as::<_, Section>(
            "INSERT INTO sections (name) VALUES ($1) RETURNING sectionid, name",
        )
        .bind(&data.name)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn sections_delete(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM sections WHERE sectionid = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| still_referenced(e, &format!("Section {}", id)))?;
        Ok(result.rows_affected() > 0)
    }

    async fn books_list(&self) -> AppResult<Vec<Book>> {
        let rows = sqlx::query(&format!("{} ORDER BY b.bookid", BOOK_SELECT))
            .fetch_all(&self.pool)
            .await?;
        let mut authorships = self.load_authorships(None).await?;

        Ok(rows
            .iter()
            .map(|r| {
                let bookid: i64 = r.get("bookid");
                book_from_row(r, authorships.remove(&bookid).unwrap_or_default())
            })
            .collect())
    }

    async fn books_get(&self, id: i64) -> AppResult<Option<Book>> {
        let row = sqlx::query(&format!("{} WHERE b.bookid = $1", BOOK_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let mut authorships = self.load_authorships(Some(id)).await?;
        Ok(Some(book_from_row(&row, authorships.remove(&id).unwrap_or_default())))
    }

    async fn books_create(&self, data: &BookRecord) -> AppResult<Book> {
        let mut tx = self.pool.begin().await?;

        let bookid: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO books (title, isbn, copyright, sectionid)
            VALUES ($1, $2, $3, $4)
            RETURNING bookid
            "#,
        )
        .bind(&data.title)
        .bind(&data.isbn)
        .bind(data.copyright)
        .bind(data.sectionid)
        .fetch_one(&mut *tx)
        .await
        .map_err(missing_reference)?;

        Self::link_authors(&mut tx, bookid, &data.author_ids).await?;
        tx.commit().await?;

        self.books_get(bookid)
            .await?
            .ok_or_else(|| AppError::Internal(format!("Book {} vanished after insert", bookid)))
    }

    async fn books_update(&self, id: i64, data: &BookRecord) -> AppResult<Option<Book>> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE books SET title = $1, isbn = $2, copyright = $3, sectionid = $4
            WHERE bookid = $5
            "#,
        )
        .bind(&data.title)
        .bind(&data.isbn)
        .bind(data.copyright)
        .bind(data.sectionid)
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(missing_reference)?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        Self::link_authors(&mut tx, id, &data.author_ids).await?;
        tx.commit().await?;

        self.books_get(id).await
    }

    async fn books_delete(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM books WHERE bookid = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn users_get_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let row = sqlx::query(
            "SELECT userid, username, password, roles FROM users WHERE LOWER(username) = LOWER($1)",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(user_from_row))
    }

    async fn users_create(&self, data: &NewUser) -> AppResult<User> {
        let roles: Vec<String> = data.roles.iter().map(|r| r.as_str().to_string()).collect();
        let row = sqlx::query(
            r#"
            INSERT INTO users (username, password, roles)
            VALUES ($1, $2, $3)
            RETURNING userid, username, password, roles
            "#,
        )
        .bind(&data.username)
        .bind(&data.password_hash)
        .bind(&roles)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if has_code(&e, UNIQUE_VIOLATION) {
                AppError::Conflict(format!("User {} already exists", data.username))
            } else {
                AppError::Database(e)
            }
        })?;
        Ok(user_from_row(&row))
    }
}
