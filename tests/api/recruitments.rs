use axum::http::{Method, StatusCode};
use serde_json::{json, Value};

use crate::support::{
    assert_error, read_json, register, send_request, setup_test_app, upload_resume,
};

async fn submit(app: &crate::support::TestApp, token: &str, cpf: &str) -> String {
    let response = upload_resume(
        app,
        token,
        &[("name", "Candidate"), ("email", "candidate@example.com"), ("cpf", cpf)],
        Some(("cv.pdf", &b"%PDF-1.4 test"[..])),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = read_json(response).await;
    body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn recruitment_references_existing_resumes() {
    let app = setup_test_app().await;
    let manager = register(&app, "Gil", "gil@example.com", "Gerenciador").await;
    let first = submit(&app, &manager.token, "11111111111").await;
    let second = submit(&app, &manager.token, "22222222222").await;

    let response = send_request(
        &app,
        Method::POST,
        "/api/v1/recruitments",
        Some(&manager.token),
        Some(json!({
            "nome": "Backend",
            "descricao": "Rust services",
            "curriculos": [first, second]
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let recruitment: Value = read_json(response).await;
    assert_eq!(recruitment["resumes"], json!([first, second]));
    assert_eq!(recruitment["owner"], manager.id.as_str());

    let response =
        send_request(&app, Method::GET, "/api/v1/recruitments", Some(&manager.token), None).await;
    let listed: Value = read_json(response).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["id"], recruitment["id"]);
    assert_eq!(listed[0]["description"], "Rust services");
}

#[tokio::test]
async fn unknown_resume_creates_nothing() {
    let app = setup_test_app().await;
    let manager = register(&app, "Gil", "gil@example.com", "Gerenciador").await;
    let known = submit(&app, &manager.token, "11111111111").await;

    let response = send_request(
        &app,
        Method::POST,
        "/api/v1/recruitments",
        Some(&manager.token),
        Some(json!({
            "name": "Backend",
            "description": "Rust services",
            "resumeIds": [known, "6f9619ff-8b86-d011-b42d-00c04fc964ff"]
        })),
    )
    .await;
    assert_error(response, StatusCode::BAD_REQUEST, "invalid_input").await;

    let response = send_request(
        &app,
        Method::POST,
        "/api/v1/recruitments",
        Some(&manager.token),
        Some(json!({ "name": " ", "description": "Rust services", "resumeIds": [known] })),
    )
    .await;
    assert_error(response, StatusCode::BAD_REQUEST, "invalid_input").await;

    let response =
        send_request(&app, Method::GET, "/api/v1/recruitments", Some(&manager.token), None).await;
    let listed: Value = read_json(response).await;
    assert_eq!(listed, json!([]));
}

#[tokio::test]
async fn listing_is_scoped_to_the_owner() {
    let app = setup_test_app().await;
    let gil = register(&app, "Gil", "gil@example.com", "Gerenciador").await;
    let rui = register(&app, "Rui", "rui@example.com", "Gerenciador").await;
    let leader = register(&app, "Lia", "lia@example.com", "Lider").await;
    let resume = submit(&app, &gil.token, "11111111111").await;

    // another manager's résumés are still referenceable
    let response = send_request(
        &app,
        Method::POST,
        "/api/v1/recruitments",
        Some(&rui.token),
        Some(json!({ "name": "Ops", "description": "On call", "resumeIds": resume })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response =
        send_request(&app, Method::GET, "/api/v1/recruitments", Some(&gil.token), None).await;
    let listed: Value = read_json(response).await;
    assert_eq!(listed, json!([]));

    let response =
        send_request(&app, Method::GET, "/api/v1/recruitments", Some(&leader.token), None).await;
    assert_error(response, StatusCode::FORBIDDEN, "forbidden").await;
}
