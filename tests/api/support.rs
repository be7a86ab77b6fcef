use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, Response, StatusCode};
use axum::Router;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use staffdesk::config::{AppConfig, AuthConfig, DatabaseConfig, PolicyConfig, UploadConfig};
use staffdesk::startup::build_app_with_pool;
use staffdesk::storage::{create_pool, DbPool};

pub const PASSWORD: &str = "s3cret-pass";

pub struct TestApp {
    router: Router,
    pub pool: DbPool,
    pub upload_dir: TempDir,
}

impl TestApp {
    pub fn router(&self) -> Router {
        self.router.clone()
    }
}

pub struct Account {
    pub id: String,
    pub token: String,
}

pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(PolicyConfig::default()).await
}

pub async fn setup_test_app_with(policies: PolicyConfig) -> TestApp {
    let upload_dir = tempfile::tempdir().expect("temp upload dir");
    let config = AppConfig {
        database: DatabaseConfig::in_memory(),
        auth: AuthConfig {
            jwt_secret: "integration-test-secret-0123456789abcdef".to_string(),
            ..Default::default()
        },
        uploads: UploadConfig { root_dir: upload_dir.path().to_path_buf(), ..Default::default() },
        policies,
        ..Default::default()
    };
    config.validate().expect("valid test config");

    let pool = create_pool(&config.database).await.expect("in-memory pool");
    let router = build_app_with_pool(&config, pool.clone()).await.expect("build app");

    TestApp { router, pool, upload_dir }
}

pub async fn send_request(
    app: &TestApp,
    method: Method,
    path: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {}", token));
    }

    let request = if let Some(json) = body {
        let bytes = serde_json::to_vec(&json).expect("serialize body");
        builder
            .header("content-type", "application/json")
            .body(Body::from(bytes))
            .expect("build request")
    } else {
        builder.body(Body::empty()).expect("build request")
    };

    app.router().oneshot(request).await.expect("request")
}

pub async fn read_json<T: DeserializeOwned>(response: Response<Body>) -> T {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("read body");
    serde_json::from_slice(&bytes).expect("parse json")
}

/// Assert the status and the stable error kind of a failed call.
pub async fn assert_error(response: Response<Body>, status: StatusCode, kind: &str) {
    assert_eq!(response.status(), status);
    let body: Value = read_json(response).await;
    assert_eq!(body["error"], kind, "unexpected body {body}");
    assert!(body["message"].is_string());
}

pub async fn login(app: &TestApp, email: &str) -> String {
    let response = send_request(
        app,
        Method::POST,
        "/api/v1/auth/login",
        None,
        Some(json!({ "email": email, "password": PASSWORD })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = read_json(response).await;
    body["token"].as_str().expect("token").to_string()
}

/// Self-register a leader or manager and log in.
pub async fn register(app: &TestApp, name: &str, email: &str, role: &str) -> Account {
    let response = send_request(
        app,
        Method::POST,
        "/api/v1/auth/register",
        None,
        Some(json!({ "name": name, "email": email, "password": PASSWORD, "role": role })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = read_json(response).await;
    let id = body["id"].as_str().expect("id").to_string();

    Account { id, token: login(app, email).await }
}

/// Onboard an employee through a manager and log in as them.
pub async fn onboard_employee(
    app: &TestApp,
    manager: &Account,
    name: &str,
    email: &str,
) -> Account {
    let response = send_request(
        app,
        Method::POST,
        "/api/v1/employees",
        Some(&manager.token),
        Some(json!({ "name": name, "email": email, "password": PASSWORD })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = read_json(response).await;
    let id = body["id"].as_str().expect("id").to_string();

    Account { id, token: login(app, email).await }
}

/// Build a `multipart/form-data` body from text fields and one optional file.
pub fn multipart_body(fields: &[(&str, &str)], file: Option<(&str, &[u8])>) -> (String, Vec<u8>) {
    let boundary = "staffdesk-test-boundary";
    let mut body = Vec::new();

    for (name, value) in fields {
        body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        let disposition =
            format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n");
        body.extend_from_slice(disposition.as_bytes());
    }

    if let Some((file_name, contents)) = file {
        body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\n\
                 Content-Type: application/pdf\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(contents);
        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());
    (format!("multipart/form-data; boundary={boundary}"), body)
}

pub async fn upload_resume(
    app: &TestApp,
    token: &str,
    fields: &[(&str, &str)],
    file: Option<(&str, &[u8])>,
) -> Response<Body> {
    let (content_type, body) = multipart_body(fields, file);
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/resumes")
        .header("Authorization", format!("Bearer {}", token))
        .header("content-type", content_type)
        .body(Body::from(body))
        .expect("build request");

    app.router().oneshot(request).await.expect("request")
}
