//! PostgreSQL repository tests
//!
//! These need a live database at `DATABASE_URL`.

use bookstore_server::{
    error::AppError,
    models::{BookRecord, NewAuthor, NewSection, NewUser, Role},
    repository::{postgres::PgRepository, BookstoreRepository},
};
use sqlx::postgres::PgPoolOptions;

async fn repository() -> PgRepository {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&url)
        .await
        .expect("Failed to connect to database");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");
    PgRepository::new(pool)
}

fn unique(name: &str) -> String {
    format!("{}{}", name, chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default())
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_usernames_differing_only_in_case_conflict() {
    let repo = repository().await;
    let name = unique("casey");

    let user = NewUser {
        username: name.clone(),
        password_hash: "hash".to_string(),
        roles: vec![Role::User],
    };
    repo.users_create(&user).await.unwrap();

    let shouting = NewUser {
        username: name.to_uppercase(),
        ..user
    };
    let err = repo.users_create(&shouting).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    let found = repo.users_get_by_username(&name.to_uppercase()).await.unwrap();
    assert_eq!(found.unwrap().username, name);
}

#[tokio::test]
#[ignore]
async fn test_foreign_keys_reject_and_protect() {
    let repo = repository().await;

    let section = repo
        .sections_create(&NewSection { name: unique("Poetry") })
        .await
        .unwrap();
    let author = repo
        .authors_create(&NewAuthor {
            fname: "Ada".to_string(),
            lname: unique("Byron"),
        })
        .await
        .unwrap();

    let dangling = BookRecord {
        title: "Nowhere".to_string(),
        isbn: "0".to_string(),
        copyright: None,
        sectionid: -1,
        author_ids: vec![author.authorid],
    };
    let err = repo.books_create(&dangling).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let book = repo
        .books_create(&BookRecord {
            sectionid: section.sectionid,
            ..dangling
        })
        .await
        .unwrap();

    let err = repo.authors_delete(author.authorid).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
    let err = repo.sections_delete(section.sectionid).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    assert!(repo.books_delete(book.bookid).await.unwrap());
    assert!(repo.authors_delete(author.authorid).await.unwrap());
    assert!(repo.sections_delete(section.sectionid).await.unwrap());
}
