//! Demo catalog and accounts loaded into an empty store
//!
//! Both functions build fresh rows on every call, so tests use them as
//! per-case fixtures.

use crate::{
    error::AppResult,
    models::{BookRecord, NewAuthor, NewSection, Role},
    repository::BookstoreRepository,
    services::auth::AuthService,
};

const AUTHORS: &[(&str, &str)] = &[
    ("John", "Mitchell"),
    ("Dan", "Brown"),
    ("Jerry", "Poe"),
    ("Wells", "Teague"),
    ("George", "Gallinger"),
    ("Ian", "Stewart"),
];

const SECTIONS: &[&str] = &["Fiction", "Technology", "Travel", "Business", "Religion"];

/// (title, isbn, copyright, section index, author indexes)
const BOOKS: &[(&str, &str, Option<i32>, usize, &[usize])] = &[
    ("Flatterland", "9780738206752", Some(2001), 0, &[5]),
    ("Digital Fortess", "9788489367012", Some(2007), 0, &[1]),
    ("The Da Vinci Code", "9780307474278", Some(2009), 0, &[1]),
    ("Essentials of Finance", "1314241651234", None, 3, &[3, 4]),
    ("Calling Texas Home", "1885171382134", Some(2000), 2, &[0]),
];

/// Load authors, sections and books unless the store already has a catalog
pub async fn catalog(repository: &dyn BookstoreRepository) -> AppResult<bool> {
    if !repository.sections_list().await?.is_empty() || !repository.authors_list().await?.is_empty() {
        tracing::debug!("Catalog already populated, skipping seed");
        return Ok(false);
    }

    let mut author_ids = Vec::with_capacity(AUTHORS.len());
    for (fname, lname) in AUTHORS {
        let author = repository
            .authors_create(&NewAuthor {
                fname: fname.to_string(),
                lname: lname.to_string(),
            })
            .await?;
        author_ids.push(author.authorid);
    }

    let mut section_ids = Vec::with_capacity(SECTIONS.len());
    for name in SECTIONS {
        let section = repository
            .sections_create(&NewSection { name: name.to_string() })
            .await?;
        section_ids.push(section.sectionid);
    }

    for (title, isbn, copyright, section, authors) in BOOKS {
        repository
            .books_create(&BookRecord {
                title: title.to_string(),
                isbn: isbn.to_string(),
                copyright: *copyright,
                sectionid: section_ids[*section],
                author_ids: authors.iter().map(|i| author_ids[*i]).collect(),
            })
            .await?;
    }

    tracing::info!(
        authors = AUTHORS.len(),
        sections = SECTIONS.len(),
        books = BOOKS.len(),
        "Seeded catalog"
    );
    Ok(true)
}

/// Create the demo accounts that do not exist yet; all share `password`
pub async fn users(
    repository: &dyn BookstoreRepository,
    auth: &AuthService,
    password: &str,
) -> AppResult<()> {
    let accounts: [(&str, Vec<Role>); 3] = [
        ("admin", vec![Role::Admin, Role::Data, Role::User]),
        ("cinnamon", vec![Role::Data, Role::User]),
        ("barnbarn", vec![Role::User]),
    ];

    for (username, roles) in accounts {
        if repository.users_get_by_username(username).await?.is_some() {
            continue;
        }
        auth.register(username, password, roles).await?;
        tracing::info!(username, "Seeded user");
    }
    Ok(())
}
