//! API integration tests
//!
//! Each test spawns the full router over the in-memory backend on an
//! ephemeral port and talks to it over HTTP.

use std::sync::Arc;

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

use shelf_server::{
    api,
    config::{AppConfig, DatabaseBackend},
    repository::MemoryRepository,
    services::Services,
    AppState,
};

struct TestApp {
    base_url: String,
    client: Client,
    token: String,
}

impl TestApp {
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(self.url(path))
            .bearer_auth(&self.token)
            .send()
            .await
            .expect("Failed to send request")
    }

    async fn post(&self, path: &str, body: Value) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await
            .expect("Failed to send request")
    }

    async fn put(&self, path: &str, body: Value) -> reqwest::Response {
        self.client
            .put(self.url(path))
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await
            .expect("Failed to send request")
    }

    async fn delete(&self, path: &str) -> reqwest::Response {
        self.client
            .delete(self.url(path))
            .bearer_auth(&self.token)
            .send()
            .await
            .expect("Failed to send request")
    }

    async fn create(&self, path: &str, body: Value) -> Value {
        let response = self.post(path, body).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        response.json().await.expect("Failed to parse response")
    }
}

async fn spawn_app() -> TestApp {
    let mut config = AppConfig::default();
    config.database.backend = DatabaseBackend::Memory;

    let services = Services::new(
        Arc::new(MemoryRepository::new()),
        config.auth.clone(),
        &config.email,
    )
    .expect("Failed to create services");

    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    };
    let app = api::create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("No local address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });

    let base_url = format!("http://{}", addr);
    let client = Client::new();
    let token = register_and_login(&client, &base_url).await;

    TestApp {
        base_url,
        client,
        token,
    }
}

async fn register_and_login(client: &Client, base_url: &str) -> String {
    let response = client
        .post(format!("{}/api/auth/register", base_url))
        .json(&json!({
            "username": "test_user",
            "password": "testing",
            "email": "test@mail.com"
        }))
        .send()
        .await
        .expect("Failed to send register request");
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = client
        .post(format!("{}/api/auth/login", base_url))
        .json(&json!({"username": "test_user", "password": "testing"}))
        .send()
        .await
        .expect("Failed to send login request");
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.expect("Failed to parse login response");
    assert_eq!(body["message"], "User logged in successfully");
    body["token"].as_str().expect("No token in response").to_string()
}

async fn message(response: reqwest::Response) -> String {
    let body: Value = response.json().await.expect("Failed to parse error body");
    body["message"].as_str().unwrap_or_default().to_string()
}

#[tokio::test]
async fn test_health_and_ready() {
    let app = spawn_app().await;

    let response = app.client.get(app.url("/health")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "healthy");

    let response = app.client.get(app.url("/ready")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let app = spawn_app().await;

    let response = app.client.get(app.url("/api/library")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .client
        .get(app.url("/api/library"))
        .bearer_auth("not-a-jwt")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(!message(response).await.is_empty());
}

#[tokio::test]
async fn test_library_crud() {
    let app = spawn_app().await;

    let created = app.create("/api/library", json!({"name": "Crecer"})).await;
    assert_eq!(created, json!({"id": 1, "name": "Crecer"}));

    let response = app.get("/api/library/1").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json!({"name": "Library 1 updated", "id": 99});
    let first: Value = app.put("/api/library/1", body.clone()).await.json().await.unwrap();
    let second: Value = app.put("/api/library/1", body).await.json().await.unwrap();
    assert_eq!(first, json!({"id": 1, "name": "Library 1 updated"}));
    assert_eq!(first, second);

    let response = app.delete("/api/library/1").await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app.get("/api/library/1").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(message(response).await, "Library with id: 1 does not exist");
}

#[tokio::test]
async fn test_library_validation() {
    let app = spawn_app().await;

    let response = app.post("/api/library", json!({})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(message(response).await, "The name is required to add a library");

    let response = app.post("/api/library", json!({"name": ""})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let libraries: Value = app.get("/api/library").await.json().await.unwrap();
    assert_eq!(libraries, json!([]));

    let response = app.put("/api/library/5", json!({"name": "X"})).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let response = app.delete("/api/library/5").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    app.create("/api/library", json!({"name": "Crecer"})).await;
    let response = app.put("/api/library/1", json!({"name": ""})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(message(response).await, "The name is required to add a library");
    let library: Value = app.get("/api/library/1").await.json().await.unwrap();
    assert_eq!(library["name"], "Crecer");

    let response = app.post("/api/author", json!({"first_name": ""})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let authors: Value = app.get("/api/author").await.json().await.unwrap();
    assert_eq!(authors, json!([]));

    let response = app.post("/api/lead", json!({"library": 1})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(message(response).await, "The email is required to add a Lead");
    let lead = app
        .create("/api/lead", json!({"email": "first@test.com", "library": 1}))
        .await;
    assert_eq!(lead["id"], 1);
}

#[tokio::test]
async fn test_non_numeric_id_is_json_bad_request() {
    let app = spawn_app().await;

    for path in ["/api/library/abc", "/api/book/abc", "/api/library/1/books/x"] {
        let response = app.get(path).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(!message(response).await.is_empty());
    }
}

#[tokio::test]
async fn test_author_crud_and_validation() {
    let app = spawn_app().await;

    let response = app
        .post("/api/author", json!({"first_name": "", "last_name": ""}))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        message(response).await,
        "The first name and last name is required to add a Author"
    );

    let author = app
        .create(
            "/api/author",
            json!({"first_name": "José", "last_name": "Brizuela"}),
        )
        .await;
    assert_eq!(author["id"], 1);

    let updated: Value = app
        .put(
            "/api/author/1",
            json!({"first_name": "Jose", "last_name": "Brizuela M."}),
        )
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(updated["first_name"], "Jose");
    assert_eq!(updated["last_name"], "Brizuela M.");

    let response = app.get("/api/author/11000").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(message(response).await, "Author with id: 11000 does not exist");
}

#[tokio::test]
async fn test_book_create_and_library_lookup() {
    let app = spawn_app().await;
    app.create("/api/library", json!({"name": "Crecer"})).await;
    app.create("/api/library", json!({"name": "Norte"})).await;
    app.create(
        "/api/author",
        json!({"first_name": "José", "last_name": "Brizuela"}),
    )
    .await;

    let book = app
        .create(
            "/api/book",
            json!({
                "title": "Test title",
                "author": {"id": 1},
                "libraries": [{"id": 1}]
            }),
        )
        .await;
    assert_eq!(
        book,
        json!({
            "id": 1,
            "title": "Test title",
            "author": {"id": 1, "first_name": "José", "last_name": "Brizuela"},
            "libraries": [{"id": 1, "name": "Crecer"}]
        })
    );

    let found: Value = app.get("/api/library/1/books/1").await.json().await.unwrap();
    assert_eq!(found.as_array().map(Vec::len), Some(1));
    assert_eq!(found[0]["id"], 1);

    let response = app.get("/api/library/2/books/1").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        message(response).await,
        "Book with id: 1 does not exist in the library"
    );
}

#[tokio::test]
async fn test_book_rejections_write_nothing() {
    let app = spawn_app().await;
    app.create("/api/library", json!({"name": "Crecer"})).await;
    app.create(
        "/api/author",
        json!({"first_name": "José", "last_name": "Brizuela"}),
    )
    .await;

    let cases = [
        (
            json!({"author": {"id": 1}}),
            "The title is required to add/update a Book",
        ),
        (json!({"title": "T"}), "Author id is required"),
        (
            json!({"title": "T", "author": {"id": 9999}}),
            "Author with id: 9999 does not exist",
        ),
        (
            json!({"title": "T", "author": {"id": 1}, "libraries": [{"name": "x"}]}),
            "Library id is required",
        ),
        (
            json!({"title": "T", "author": {"id": 1}, "libraries": [{"id": 0}]}),
            "Library id is required",
        ),
        (
            json!({"title": "T", "author": {"id": 1}, "libraries": [{"id": 42}]}),
            "Library with id: 42 does not exist",
        ),
    ];

    for (body, expected) in cases {
        let response = app.post("/api/book", body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(message(response).await, expected);
    }

    let books: Value = app.get("/api/book").await.json().await.unwrap();
    assert_eq!(books, json!([]));
}

#[tokio::test]
async fn test_book_update_replaces_library_set() {
    let app = spawn_app().await;
    app.create("/api/library", json!({"name": "Crecer"})).await;
    app.create("/api/library", json!({"name": "Norte"})).await;
    app.create("/api/author", json!({"first_name": "A", "last_name": "B"}))
        .await;
    app.create("/api/author", json!({"first_name": "C", "last_name": "D"}))
        .await;
    app.create(
        "/api/book",
        json!({"title": "Old", "author": {"id": 1}, "libraries": [{"id": 1}]}),
    )
    .await;

    let response = app
        .put(
            "/api/book/1",
            json!({"title": "New", "author": {"id": 2}, "libraries": [{"id": 2}]}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let book: Value = response.json().await.unwrap();
    assert_eq!(book["title"], "New");
    assert_eq!(book["author"]["id"], 2);
    assert_eq!(book["libraries"], json!([{"id": 2, "name": "Norte"}]));

    let response = app
        .put(
            "/api/book/1",
            json!({"title": "New", "author": {"id": 2}, "libraries": []}),
        )
        .await;
    let book: Value = response.json().await.unwrap();
    assert_eq!(book["libraries"], json!([]));

    let response = app
        .put("/api/book/1", json!({"author": {"id": 1}, "libraries": [{"id": 1}]}))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        message(response).await,
        "The title is required to add/update a Book"
    );
    let book: Value = app.get("/api/book/1").await.json().await.unwrap();
    assert_eq!(book["title"], "New");
    assert_eq!(book["libraries"], json!([]));

    let response = app
        .put("/api/book/11000", json!({"title": "T", "author": {"id": 1}}))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(message(response).await, "Book with id: 11000 does not exist");

    let response = app.delete("/api/book/1").await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let response = app.delete("/api/book/1").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_author_delete_cascades_to_books() {
    let app = spawn_app().await;
    app.create("/api/author", json!({"first_name": "A", "last_name": "B"}))
        .await;
    app.create("/api/book", json!({"title": "T", "author": {"id": 1}}))
        .await;

    let response = app.delete("/api/author/1").await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app.get("/api/book/1").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_search_is_case_insensitive() {
    let app = spawn_app().await;
    app.create("/api/author", json!({"first_name": "A", "last_name": "B"}))
        .await;
    for title in ["The Rust Book", "Programming RUST", "Gardening"] {
        app.create("/api/book", json!({"title": title, "author": {"id": 1}}))
            .await;
    }

    let books: Value = app.get("/api/book/search?text=rust").await.json().await.unwrap();
    let titles: Vec<&str> = books
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["The Rust Book", "Programming RUST"]);

    let books: Value = app.get("/api/book/search").await.json().await.unwrap();
    assert_eq!(books.as_array().map(Vec::len), Some(3));

    let books: Value = app.get("/api/book/search?text=poetry").await.json().await.unwrap();
    assert_eq!(books, json!([]));
}

#[tokio::test]
async fn test_lead_creation() {
    let app = spawn_app().await;
    app.create("/api/library", json!({"name": "Crecer"})).await;

    let lead = app
        .create(
            "/api/lead",
            json!({
                "email": "test@test.com",
                "fullname": "test test",
                "phone": "123456",
                "library": 1
            }),
        )
        .await;
    assert_eq!(
        lead,
        json!({
            "id": 1,
            "email": "test@test.com",
            "fullname": "test test",
            "phone": "123456",
            "library": 1
        })
    );

    let response = app
        .post("/api/lead", json!({"email": "test@test.com", "library": 1}))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        message(response).await,
        "Lead with email: test@test.com already exists"
    );

    let response = app.post("/api/lead", json!({"email": "", "library": 1})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(message(response).await, "The email is required to add a Lead");

    let response = app
        .post("/api/lead", json!({"email": "other@test.com", "library": 77}))
        .await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_register_rejections() {
    let app = spawn_app().await;
    let register = |body: Value| {
        app.client
            .post(app.url("/api/auth/register"))
            .json(&body)
            .send()
    };

    let response = register(json!({"username": "", "password": "", "email": ""}))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        message(response).await,
        "username, password and email is required to register a user"
    );

    let response = register(json!({"username": "test_user", "password": "x", "email": "a@b.c"}))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        message(response).await,
        "A user with that username already exists"
    );

    let response = register(json!({"username": "new_user", "password": "x", "email": "test@mail.com"}))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(message(response).await, "A user with that email already exists");

    let response = register(json!({"username": "new_user", "password": "new_pass", "email": "new_user@mail.com"}))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body,
        json!({"username": "new_user", "email": "new_user@mail.com"})
    );
}

#[tokio::test]
async fn test_login_failure_has_empty_body() {
    let app = spawn_app().await;

    let response = app
        .client
        .post(app.url("/api/auth/login"))
        .json(&json!({"username": "test_user", "password": "wrong"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.text().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_token_endpoint() {
    let app = spawn_app().await;

    let response = app
        .client
        .post(app.url("/api-token-auth/"))
        .json(&json!({"username": "test_user", "password": "testing"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    let token = body["token"].as_str().unwrap().to_string();

    let response = app
        .client
        .get(app.url("/api/book"))
        .bearer_auth(token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .client
        .post(app.url("/api-token-auth/"))
        .json(&json!({"username": "test_user", "password": "wrong"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        message(response).await,
        "Unable to log in with provided credentials."
    );
}

#[tokio::test]
async fn test_openapi_document_served() {
    let app = spawn_app().await;
    let response = app
        .client
        .get(app.url("/api-docs/openapi.json"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let doc: Value = response.json().await.unwrap();
    assert!(doc["paths"]["/api/lead"].is_object());
}
