//! API integration tests
//!
//! Every test builds its own router over a freshly seeded in-memory store.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::util::ServiceExt;

use bookstore_server::{
    api,
    config::AppConfig,
    models::{Book, Role, UserClaims},
    repository::{memory::MemoryRepository, Repository},
    seed, AppState,
};

const SECRET: &str = "integration-test-secret";

struct Fixture {
    app: Router,
    repository: Repository,
    state: AppState,
}

async fn fixture() -> Fixture {
    let memory = MemoryRepository::new();
    seed::catalog(&memory).await.expect("seed catalog");
    let repository: Repository = Arc::new(memory);

    let mut config = AppConfig::default();
    config.auth.jwt_secret = SECRET.to_string();

    let state = AppState::new(config, repository.clone());
    Fixture {
        app: api::router(state.clone()),
        repository,
        state,
    }
}

fn token(roles: &[Role]) -> String {
    let now = chrono::Utc::now().timestamp();
    UserClaims {
        sub: "tester".to_string(),
        user_id: 1,
        roles: roles.to_vec(),
        exp: now + 600,
        iat: now,
    }
    .create_token(SECRET)
    .expect("token")
}

fn admin() -> String {
    token(&[Role::Admin, Role::Data])
}

struct Reply {
    status: StatusCode,
    location: Option<String>,
    body: Value,
}

async fn send(app: &Router, method: Method, uri: &str, bearer: Option<&str>, body: Option<Value>) -> Reply {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(bearer) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", bearer));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let location = response
        .headers()
        .get(header::LOCATION)
        .map(|v| v.to_str().unwrap().to_string());
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into()))
    };

    Reply { status, location, body }
}

#[tokio::test]
async fn test_list_all_books_roundtrips() {
    let fx = fixture().await;
    let reply = send(&fx.app, Method::GET, "/books/books", Some(&admin()), None).await;
    assert_eq!(reply.status, StatusCode::OK);

    let books: Vec<Book> = serde_json::from_value(reply.body.clone()).unwrap();
    assert_eq!(books.len(), 5);
    assert_eq!(serde_json::to_value(&books).unwrap(), reply.body);

    let stored = fx.repository.books_list().await.unwrap();
    assert_eq!(serde_json::to_value(&stored).unwrap(), reply.body);
}

#[tokio::test]
async fn test_get_book_by_id() {
    let fx = fixture().await;
    let reply = send(&fx.app, Method::GET, "/books/book/1", Some(&admin()), None).await;

    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["bookid"], 1);
    assert_eq!(reply.body["title"], "Flatterland");
    assert_eq!(reply.body["section"]["name"], "Fiction");
    assert_eq!(reply.body["wrotes"][0]["author"]["lname"], "Stewart");
}

#[tokio::test]
async fn test_get_no_book_by_id() {
    let fx = fixture().await;
    let reply = send(&fx.app, Method::GET, "/books/book/888", Some(&admin()), None).await;

    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert_eq!(reply.body["error"], "NoSuchData");
    assert!(reply.body["message"].as_str().unwrap().contains("888"));
}

#[tokio::test]
async fn test_non_numeric_ids_get_json_errors() {
    let fx = fixture().await;

    let request = Request::builder()
        .method(Method::GET)
        .uri("/books/book/abc")
        .header(header::AUTHORIZATION, format!("Bearer {}", admin()))
        .body(Body::empty())
        .unwrap();
    let response = fx.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/json"
    );
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"], "BadValue");
    assert!(body["code"].is_number());

    for uri in ["/authors/author/x1", "/sections/section/1.5"] {
        let reply = send(&fx.app, Method::DELETE, uri, Some(&admin()), None).await;
        assert_eq!(reply.status, StatusCode::BAD_REQUEST, "{}", uri);
        assert_eq!(reply.body["error"], "BadValue", "{}", uri);
    }
}

#[tokio::test]
async fn test_add_new_book() {
    let fx = fixture().await;
    let reply = send(
        &fx.app,
        Method::POST,
        "/books/book",
        Some(&admin()),
        Some(json!({
            "title": "Choke",
            "isbn": "longnumber",
            "copyright": 1000,
            "section": {"sectionid": 1},
            "wrotes": [{"author": {"authorid": 2}}]
        })),
    )
    .await;

    assert_eq!(reply.status, StatusCode::CREATED);
    assert_eq!(reply.body["title"], "Choke");
    assert_eq!(reply.body["isbn"], "longnumber");
    assert_eq!(reply.body["copyright"], 1000);
    assert_eq!(reply.body["section"]["sectionid"], 1);
    assert_eq!(reply.body["wrotes"][0]["author"]["authorid"], 2);

    let bookid = reply.body["bookid"].as_i64().unwrap();
    assert_eq!(reply.location.as_deref(), Some(format!("/books/book/{}", bookid).as_str()));
    assert!(fx.repository.books_get(bookid).await.unwrap().is_some());
}

#[tokio::test]
async fn test_add_new_book_ignores_client_id() {
    let fx = fixture().await;
    let reply = send(
        &fx.app,
        Method::POST,
        "/books/book",
        Some(&admin()),
        Some(json!({"bookid": 1, "title": "Fresh", "isbn": "x", "section": {"sectionid": 2}})),
    )
    .await;

    assert_eq!(reply.status, StatusCode::CREATED);
    assert_ne!(reply.body["bookid"], 1);
    // the original book 1 is untouched
    let original = fx.repository.books_get(1).await.unwrap().unwrap();
    assert_eq!(original.title, "Flatterland");
}

#[tokio::test]
async fn test_add_book_with_unknown_section_fails() {
    let fx = fixture().await;
    let reply = send(
        &fx.app,
        Method::POST,
        "/books/book",
        Some(&admin()),
        Some(json!({"title": "Lost", "isbn": "0", "section": {"sectionid": 999}})),
    )
    .await;

    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.body["error"], "BadValue");
    assert_eq!(fx.repository.books_list().await.unwrap().len(), 5);
}

#[tokio::test]
async fn test_add_book_with_unknown_author_fails() {
    let fx = fixture().await;
    let reply = send(
        &fx.app,
        Method::POST,
        "/books/book",
        Some(&admin()),
        Some(json!({
            "title": "Ghostwritten",
            "isbn": "0",
            "section": {"sectionid": 1},
            "wrotes": [{"author": {"authorid": 77}}]
        })),
    )
    .await;

    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(fx.repository.books_list().await.unwrap().len(), 5);
}

#[tokio::test]
async fn test_malformed_and_invalid_bodies_get_json_errors() {
    let fx = fixture().await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/books/book")
        .header(header::AUTHORIZATION, format!("Bearer {}", admin()))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"title\": "))
        .unwrap();
    let response = fx.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let missing_section = send(
        &fx.app,
        Method::POST,
        "/books/book",
        Some(&admin()),
        Some(json!({"title": "Adrift", "isbn": "1"})),
    )
    .await;
    assert_eq!(missing_section.status, StatusCode::BAD_REQUEST);
    assert!(missing_section.body["code"].is_number());

    let blank_title = send(
        &fx.app,
        Method::POST,
        "/books/book",
        Some(&admin()),
        Some(json!({"title": "", "isbn": "1", "section": {"sectionid": 1}})),
    )
    .await;
    assert_eq!(blank_title.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_full_book() {
    let fx = fixture().await;
    let reply = send(
        &fx.app,
        Method::PUT,
        "/books/book/2",
        Some(&admin()),
        Some(json!({
            "title": "Digital Fortress",
            "isbn": "9788489367012",
            "copyright": 1998,
            "section": {"sectionid": 2},
            "wrotes": [{"author": {"authorid": 2}}, {"author": {"authorid": 3}}]
        })),
    )
    .await;

    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["bookid"], 2);
    assert_eq!(reply.body["title"], "Digital Fortress");
    assert_eq!(reply.body["section"]["name"], "Technology");

    let stored = fx.repository.books_get(2).await.unwrap().unwrap();
    assert_eq!(stored.copyright, Some(1998));
    assert_eq!(stored.author_ids(), vec![2, 3]);

    let missing = send(
        &fx.app,
        Method::PUT,
        "/books/book/888",
        Some(&admin()),
        Some(json!({"title": "Nope", "isbn": "0", "section": {"sectionid": 1}})),
    )
    .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_book_by_id() {
    let fx = fixture().await;

    let reply = send(&fx.app, Method::DELETE, "/books/book/1", Some(&admin()), None).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body, Value::Null);
    assert!(fx.repository.books_get(1).await.unwrap().is_none());

    let again = send(&fx.app, Method::DELETE, "/books/book/1", Some(&admin()), None).await;
    assert_eq!(again.status, StatusCode::NOT_FOUND);

    // Ian Stewart was only credited on book 1, so he can go now
    let author = send(&fx.app, Method::DELETE, "/authors/author/6", Some(&admin()), None).await;
    assert_eq!(author.status, StatusCode::OK);
}

#[tokio::test]
async fn test_book_routes_require_admin_or_data() {
    let fx = fixture().await;

    let anonymous = send(&fx.app, Method::GET, "/books/books", None, None).await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);

    let garbage = send(&fx.app, Method::GET, "/books/books", Some("not-a-jwt"), None).await;
    assert_eq!(garbage.status, StatusCode::UNAUTHORIZED);

    let reader = send(&fx.app, Method::GET, "/books/books", Some(&token(&[Role::User])), None).await;
    assert_eq!(reader.status, StatusCode::FORBIDDEN);

    let data = send(&fx.app, Method::GET, "/books/books", Some(&token(&[Role::Data])), None).await;
    assert_eq!(data.status, StatusCode::OK);

    let delete = send(&fx.app, Method::DELETE, "/books/book/1", Some(&token(&[Role::User])), None).await;
    assert_eq!(delete.status, StatusCode::FORBIDDEN);
    assert!(fx.repository.books_get(1).await.unwrap().is_some());
}

#[tokio::test]
async fn test_referenced_authors_and_sections_are_protected() {
    let fx = fixture().await;

    let author = send(&fx.app, Method::DELETE, "/authors/author/2", Some(&admin()), None).await;
    assert_eq!(author.status, StatusCode::CONFLICT);

    let section = send(&fx.app, Method::DELETE, "/sections/section/1", Some(&admin()), None).await;
    assert_eq!(section.status, StatusCode::CONFLICT);

    // Religion holds no books
    let empty = send(&fx.app, Method::DELETE, "/sections/section/5", Some(&admin()), None).await;
    assert_eq!(empty.status, StatusCode::OK);

    let missing = send(&fx.app, Method::GET, "/sections/section/5", Some(&admin()), None).await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_author_and_section_writes_need_admin() {
    let fx = fixture().await;
    let payload = json!({"fname": "Chuck", "lname": "Palahniuk"});

    let as_data = send(
        &fx.app,
        Method::POST,
        "/authors/author",
        Some(&token(&[Role::Data])),
        Some(payload.clone()),
    )
    .await;
    assert_eq!(as_data.status, StatusCode::FORBIDDEN);

    let as_admin = send(&fx.app, Method::POST, "/authors/author", Some(&admin()), Some(payload)).await;
    assert_eq!(as_admin.status, StatusCode::CREATED);
    assert_eq!(as_admin.body["authorid"], 7);

    let listed = send(&fx.app, Method::GET, "/authors/authors", Some(&token(&[Role::User])), None).await;
    assert_eq!(listed.status, StatusCode::OK);
    assert_eq!(listed.body.as_array().unwrap().len(), 7);

    let section = send(
        &fx.app,
        Method::POST,
        "/sections/section",
        Some(&admin()),
        Some(json!({"name": "Horror"})),
    )
    .await;
    assert_eq!(section.status, StatusCode::CREATED);
    assert_eq!(section.body["name"], "Horror");
}

#[tokio::test]
async fn test_login_and_me() {
    let fx = fixture().await;
    seed::users(fx.repository.as_ref(), &fx.state.services.auth, "password")
        .await
        .unwrap();

    let login = send(
        &fx.app,
        Method::POST,
        "/login",
        None,
        Some(json!({"username": "cinnamon", "password": "password"})),
    )
    .await;
    assert_eq!(login.status, StatusCode::OK);
    assert_eq!(login.body["token_type"], "Bearer");
    let access = login.body["access_token"].as_str().unwrap().to_string();

    let me = send(&fx.app, Method::GET, "/auth/me", Some(&access), None).await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.body["username"], "cinnamon");
    assert_eq!(me.body["roles"], json!(["DATA", "USER"]));

    let books = send(&fx.app, Method::GET, "/books/books", Some(&access), None).await;
    assert_eq!(books.status, StatusCode::OK);

    let wrong = send(
        &fx.app,
        Method::POST,
        "/login",
        None,
        Some(json!({"username": "cinnamon", "password": "letmein"})),
    )
    .await;
    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_health_check() {
    let fx = fixture().await;

    let health = send(&fx.app, Method::GET, "/health", None, None).await;
    assert_eq!(health.status, StatusCode::OK);
    assert_eq!(health.body["status"], "healthy");

    let ready = send(&fx.app, Method::GET, "/ready", None, None).await;
    assert_eq!(ready.status, StatusCode::OK);
    assert_eq!(ready.body["status"], "ready");
}
