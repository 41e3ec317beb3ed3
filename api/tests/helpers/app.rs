use api::{auth::generate_jwt, routes::app};
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use db::{
    models::user::{Model as UserModel, Role},
    test_utils::setup_test_db,
};
use once_cell::sync::Lazy;
use sea_orm::DatabaseConnection;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;
use util::{config::AppConfig, state::AppState};

/// Storage root shared by every test in this binary, configured once.
static TEST_ENV: Lazy<TempDir> = Lazy::new(|| {
    let storage = TempDir::new().expect("failed to create storage tempdir");
    AppConfig::set_storage_root(storage.path().to_string_lossy().to_string());
    AppConfig::set_public_base_url("http://files.test");
    AppConfig::set_jwt_secret("test-secret");
    AppConfig::set_jwt_duration_minutes(60);
    storage
});

pub struct TestApp {
    pub router: Router,
    pub db: DatabaseConnection,
}

/// A router over a fresh in-memory database.
pub async fn make_test_app() -> TestApp {
    Lazy::force(&TEST_ENV);
    let db = setup_test_db().await;
    TestApp {
        router: app(AppState::new(db.clone())),
        db,
    }
}

impl TestApp {
    /// Inserts a user directly and returns it with a bearer token.
    pub async fn user(&self, username: &str, role: Role) -> (UserModel, String) {
        let user = UserModel::create(
            &self.db,
            username,
            &format!("{username}@example.com"),
            "secret1",
            role,
        )
        .await
        .unwrap();
        let (token, _) = generate_jwt(&user.id, user.role, &user.username, &user.email).unwrap();
        (user, token)
    }

    pub async fn send(&self, req: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
        (status, json)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(request("GET", uri, token, None)).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send(request("POST", uri, token, Some(body))).await
    }

    pub async fn put(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send(request("PUT", uri, token, Some(body))).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(request("DELETE", uri, token, None)).await
    }
}

pub fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// A `multipart/form-data` request with one file part and an optional section.
pub fn multipart_request(
    uri: &str,
    token: &str,
    file_name: &str,
    bytes: &[u8],
    section: Option<&str>,
) -> Request<Body> {
    let boundary = "X-TEST-BOUNDARY";
    let mut body = Vec::new();
    if let Some(section) = section {
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"section\"\r\n\r\n{section}\r\n"
            )
            .as_bytes(),
        );
    }
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap()
}
