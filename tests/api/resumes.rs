use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use crate::support::{
    assert_error, onboard_employee, read_json, register, send_request, setup_test_app,
    upload_resume,
};

const PDF: &[u8] = b"%PDF-1.4\n1 0 obj\n<<>>\nendobj\ntrailer\n<<>>\n%%EOF\n";

fn fields<'a>(cpf: &'a str) -> Vec<(&'a str, &'a str)> {
    vec![("nome", "Ana Souza"), ("email", "Ana@Example.com"), ("cpf", cpf)]
}

#[tokio::test]
async fn upload_stores_record_and_serves_file() {
    let app = setup_test_app().await;
    let manager = register(&app, "Gil", "gil@example.com", "Gerenciador").await;

    let response =
        upload_resume(&app, &manager.token, &fields("12345678901"), Some(("cv.pdf", PDF))).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let resume: Value = read_json(response).await;
    assert_eq!(resume["name"], "Ana Souza");
    assert_eq!(resume["email"], "ana@example.com");
    assert_eq!(resume["cpf"], "12345678901");
    assert_eq!(resume["owner"], manager.id.as_str());
    let key = resume["file"].as_str().unwrap().to_string();
    assert!(key.starts_with("curriculos/"));
    assert!(key.ends_with(".pdf"));

    let request = Request::builder()
        .uri(format!("/uploads/{}", key))
        .body(Body::empty())
        .unwrap();
    let response = app.router().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], PDF);

    let response =
        send_request(&app, Method::GET, "/api/v1/resumes", Some(&manager.token), None).await;
    let listed: Value = read_json(response).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["id"], resume["id"]);
}

#[tokio::test]
async fn duplicate_cpf_conflicts_across_managers() {
    let app = setup_test_app().await;
    let first = register(&app, "Gil", "gil@example.com", "Gerenciador").await;
    let second = register(&app, "Rui", "rui@example.com", "Gerenciador").await;

    let response =
        upload_resume(&app, &first.token, &fields("12345678901"), Some(("cv.pdf", PDF))).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response =
        upload_resume(&app, &second.token, &fields("12345678901"), Some(("other.pdf", PDF))).await;
    assert_error(response, StatusCode::CONFLICT, "conflict").await;

    let response =
        send_request(&app, Method::GET, "/api/v1/resumes", Some(&second.token), None).await;
    let listed: Value = read_json(response).await;
    assert!(listed.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn rejected_uploads_leave_no_file_behind() {
    let app = setup_test_app().await;
    let manager = register(&app, "Gil", "gil@example.com", "Gerenciador").await;

    let response =
        upload_resume(&app, &manager.token, &fields("12345678901"), Some(("cv.docx", PDF))).await;
    assert_error(response, StatusCode::BAD_REQUEST, "invalid_input").await;

    let response = upload_resume(&app, &manager.token, &fields("12345678901"), None).await;
    assert_error(response, StatusCode::BAD_REQUEST, "invalid_input").await;

    let response =
        upload_resume(&app, &manager.token, &fields("123.456.789-01"), Some(("cv.pdf", PDF))).await;
    assert_error(response, StatusCode::BAD_REQUEST, "invalid_input").await;

    let empty = Some(("cv.pdf", &b""[..]));
    let response = upload_resume(&app, &manager.token, &fields("12345678901"), empty).await;
    assert_error(response, StatusCode::BAD_REQUEST, "invalid_input").await;

    let oversized = vec![b'x'; 5 * 1024 * 1024 + 1];
    let file = Some(("cv.pdf", &oversized[..]));
    let response = upload_resume(&app, &manager.token, &fields("12345678901"), file).await;
    assert_error(response, StatusCode::PAYLOAD_TOO_LARGE, "payload_too_large").await;

    let stored = std::fs::read_dir(app.upload_dir.path().join("curriculos"))
        .map(|entries| entries.count())
        .unwrap_or(0);
    assert_eq!(stored, 0);
}

#[tokio::test]
async fn only_managers_handle_resumes() {
    let app = setup_test_app().await;
    let manager = register(&app, "Gil", "gil@example.com", "Gerenciador").await;
    let leader = register(&app, "Lia", "lia@example.com", "Lider").await;
    let employee = onboard_employee(&app, &manager, "Ana", "ana@example.com").await;

    for token in [&leader.token, &employee.token] {
        let response = upload_resume(&app, token, &[], None).await;
        assert_error(response, StatusCode::FORBIDDEN, "forbidden").await;

        let response = send_request(&app, Method::GET, "/api/v1/resumes", Some(token), None).await;
        assert_error(response, StatusCode::FORBIDDEN, "forbidden").await;
    }
}

#[tokio::test]
async fn oversized_upload_from_wrong_role_is_forbidden() {
    let app = setup_test_app().await;
    let leader = register(&app, "Lia", "lia@example.com", "Lider").await;

    let oversized = vec![b'x'; 7 * 1024 * 1024];
    let file = Some(("cv.pdf", &oversized[..]));
    let response = upload_resume(&app, &leader.token, &fields("12345678901"), file).await;
    assert_error(response, StatusCode::FORBIDDEN, "forbidden").await;
}

#[tokio::test]
async fn non_multipart_upload_is_invalid_input() {
    let app = setup_test_app().await;
    let manager = register(&app, "Gil", "gil@example.com", "Gerenciador").await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/resumes")
        .header("Authorization", format!("Bearer {}", manager.token))
        .header("content-type", "application/json")
        .body(Body::from(r#"{"cpf":"12345678901"}"#))
        .unwrap();
    let response = app.router().oneshot(request).await.unwrap();
    assert_error(response, StatusCode::BAD_REQUEST, "invalid_input").await;
}
