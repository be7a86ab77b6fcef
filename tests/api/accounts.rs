use axum::http::{Method, Request, StatusCode};
use axum::body::Body;
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::support::{
    assert_error, login, onboard_employee, read_json, register, send_request, setup_test_app,
    PASSWORD,
};

#[tokio::test]
async fn employees_cannot_self_register() {
    let app = setup_test_app().await;

    // rejected even though the rest of the payload is invalid too
    let response = send_request(
        &app,
        Method::POST,
        "/api/v1/auth/register",
        None,
        Some(json!({ "nome": "", "email": "bad", "senha": "1", "tipo": "Funcionario" })),
    )
    .await;
    assert_error(response, StatusCode::FORBIDDEN, "forbidden").await;

    // fields missing entirely, so the typed payload could not even be built
    let response = send_request(
        &app,
        Method::POST,
        "/api/v1/auth/register",
        None,
        Some(json!({ "role": "Funcionario" })),
    )
    .await;
    assert_error(response, StatusCode::FORBIDDEN, "forbidden").await;

    let response = send_request(
        &app,
        Method::POST,
        "/api/v1/auth/register",
        None,
        Some(json!({ "role": "Lider" })),
    )
    .await;
    assert_error(response, StatusCode::BAD_REQUEST, "invalid_input").await;
}

#[tokio::test]
async fn role_check_precedes_body_parsing() {
    let app = setup_test_app().await;
    let manager = register(&app, "Gil", "gil@example.com", "Gerenciador").await;
    let leader = register(&app, "Lia", "lia@example.com", "Lider").await;
    let employee = onboard_employee(&app, &manager, "Ana", "ana@example.com").await;

    for (token, path, body) in [
        (&employee.token, "/api/v1/teams", json!({ "memberIds": 5 })),
        (&manager.token, "/api/v1/points", json!({ "userId": 5 })),
        (&leader.token, "/api/v1/employees", json!({ "name": [] })),
        (&leader.token, "/api/v1/recruitments", json!("not an object")),
        (&manager.token, "/api/v1/annotations", json!({ "employee": {} })),
    ] {
        let response = send_request(&app, Method::POST, path, Some(token), Some(body)).await;
        assert_error(response, StatusCode::FORBIDDEN, "forbidden").await;
    }
}

#[tokio::test]
async fn registration_returns_public_projection() {
    let app = setup_test_app().await;

    let response = send_request(
        &app,
        Method::POST,
        "/api/v1/auth/register",
        None,
        Some(json!({
            "nome": "Lia",
            "email": "Lia@Example.com",
            "senha": PASSWORD,
            "tipo": "Lider"
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body: Value = read_json(response).await;
    assert_eq!(body["email"], "lia@example.com");
    assert_eq!(body["role"], "Lider");
    assert!(body.get("password").is_none());
    assert!(body.get("passwordHash").is_none());
    assert!(body.get("points").is_none());
}

#[tokio::test]
async fn duplicate_email_conflicts_on_both_paths() {
    let app = setup_test_app().await;
    let manager = register(&app, "Gil", "gil@example.com", "Gerenciador").await;

    let response = send_request(
        &app,
        Method::POST,
        "/api/v1/auth/register",
        None,
        Some(json!({
            "name": "Other",
            "email": "GIL@example.com",
            "password": PASSWORD,
            "role": "Lider"
        })),
    )
    .await;
    assert_error(response, StatusCode::CONFLICT, "conflict").await;

    onboard_employee(&app, &manager, "Ana", "ana@example.com").await;
    let response = send_request(
        &app,
        Method::POST,
        "/api/v1/employees",
        Some(&manager.token),
        Some(json!({ "name": "Ana 2", "email": "ana@example.com", "password": PASSWORD })),
    )
    .await;
    assert_error(response, StatusCode::CONFLICT, "conflict").await;
}

#[tokio::test]
async fn login_failures_are_indistinguishable() {
    let app = setup_test_app().await;
    register(&app, "Lia", "lia@example.com", "Lider").await;

    let wrong_password = send_request(
        &app,
        Method::POST,
        "/api/v1/auth/login",
        None,
        Some(json!({ "email": "lia@example.com", "password": "wrong-password" })),
    )
    .await;
    let unknown_email = send_request(
        &app,
        Method::POST,
        "/api/v1/auth/login",
        None,
        Some(json!({ "email": "nobody@example.com", "password": PASSWORD })),
    )
    .await;

    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_email.status(), StatusCode::UNAUTHORIZED);
    let first: Value = read_json(wrong_password).await;
    let second: Value = read_json(unknown_email).await;
    assert_eq!(first, second);
    assert_eq!(first["error"], "invalid_credentials");
}

#[tokio::test]
async fn login_is_case_insensitive_on_email() {
    let app = setup_test_app().await;
    register(&app, "Lia", "lia@example.com", "Lider").await;
    let token = login(&app, "LIA@EXAMPLE.COM").await;
    assert!(!token.is_empty());
}

#[tokio::test]
async fn only_managers_onboard_employees() {
    let app = setup_test_app().await;
    let leader = register(&app, "Lia", "lia@example.com", "Lider").await;

    let response = send_request(
        &app,
        Method::POST,
        "/api/v1/employees",
        Some(&leader.token),
        Some(json!({ "name": "Ana", "email": "ana@example.com", "password": PASSWORD })),
    )
    .await;
    assert_error(response, StatusCode::FORBIDDEN, "forbidden").await;
}

#[tokio::test]
async fn protected_routes_require_a_session() {
    let app = setup_test_app().await;

    for (method, path) in [
        (Method::POST, "/api/v1/employees"),
        (Method::POST, "/api/v1/points"),
        (Method::GET, "/api/v1/teams"),
        (Method::POST, "/api/v1/teams"),
        (Method::GET, "/api/v1/resumes"),
        (Method::POST, "/api/v1/resumes"),
        (Method::GET, "/api/v1/recruitments"),
        (Method::POST, "/api/v1/recruitments"),
        (Method::GET, "/api/v1/annotations"),
        (Method::POST, "/api/v1/annotations"),
        (Method::GET, "/api/v1/profile"),
    ] {
        let response = send_request(&app, method, path, None, None).await;
        assert_error(response, StatusCode::UNAUTHORIZED, "unauthenticated").await;
    }
}

#[tokio::test]
async fn bad_tokens_are_rejected() {
    let app = setup_test_app().await;

    let response =
        send_request(&app, Method::GET, "/api/v1/profile", Some("not.a.jwt"), None).await;
    assert_error(response, StatusCode::UNAUTHORIZED, "invalid_session").await;

    let request = Request::builder()
        .uri("/api/v1/profile")
        .header("Authorization", "Basic abc")
        .body(Body::empty())
        .unwrap();
    let response = app.router().oneshot(request).await.unwrap();
    assert_error(response, StatusCode::UNAUTHORIZED, "unauthenticated").await;
}

#[tokio::test]
async fn legacy_token_header_is_accepted() {
    let app = setup_test_app().await;
    let leader = register(&app, "Lia", "lia@example.com", "Lider").await;

    let request = Request::builder()
        .uri("/api/v1/profile")
        .header("x-auth-token", &leader.token)
        .body(Body::empty())
        .unwrap();
    let response = app.router().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn health_and_docs_are_public() {
    let app = setup_test_app().await;

    let response = send_request(&app, Method::GET, "/health", None, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = read_json(response).await;
    assert_eq!(body["status"], "healthy");

    let response = send_request(&app, Method::GET, "/api-docs/openapi.json", None, None).await;
    assert_eq!(response.status(), StatusCode::OK);
}
