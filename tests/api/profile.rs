use axum::http::{Method, StatusCode};
use serde_json::{json, Value};

use crate::support::{
    onboard_employee, read_json, register, send_request, setup_test_app, upload_resume,
};

async fn profile(app: &crate::support::TestApp, token: &str) -> Value {
    let response = send_request(app, Method::GET, "/api/v1/profile", Some(token), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    read_json(response).await
}

#[tokio::test]
async fn sections_follow_the_callers_role() {
    let app = setup_test_app().await;
    let manager = register(&app, "Gil", "gil@example.com", "Gerenciador").await;
    let leader = register(&app, "Lia", "lia@example.com", "Lider").await;
    let employee = onboard_employee(&app, &manager, "Ana", "ana@example.com").await;

    let response = send_request(
        &app,
        Method::POST,
        "/api/v1/teams",
        Some(&leader.token),
        Some(json!({ "name": "Core", "memberIds": [employee.id] })),
    )
    .await;
    let team: Value = read_json(response).await;

    send_request(
        &app,
        Method::POST,
        "/api/v1/annotations",
        Some(&leader.token),
        Some(json!({ "employee": employee.id, "description": "Solid reviews" })),
    )
    .await;
    upload_resume(
        &app,
        &manager.token,
        &[("name", "Cand"), ("email", "cand@example.com"), ("cpf", "12345678901")],
        Some(("cv.pdf", &b"%PDF-1.4"[..])),
    )
    .await;

    let lider = profile(&app, &leader.token).await;
    assert_eq!(lider["user"]["role"], "Lider");
    assert!(lider["user"].get("points").is_none());
    assert_eq!(lider["teams"][0]["id"], team["id"]);
    assert_eq!(lider["annotations"][0]["employeeName"], "Ana");
    assert!(lider.get("resumes").is_none());

    let funcionario = profile(&app, &employee.token).await;
    assert_eq!(funcionario["user"]["points"], 0);
    assert_eq!(funcionario["user"]["registeredBy"], manager.id.as_str());
    assert_eq!(funcionario["teams"][0]["leader"]["name"], "Lia");
    assert!(funcionario.get("annotations").is_none());

    let gerenciador = profile(&app, &manager.token).await;
    assert_eq!(gerenciador["resumes"].as_array().unwrap().len(), 1);
    assert_eq!(gerenciador["recruitments"], json!([]));
    assert!(gerenciador.get("teams").is_none());
    assert!(gerenciador["user"].get("passwordHash").is_none());
}

#[tokio::test]
async fn new_accounts_have_empty_sections() {
    let app = setup_test_app().await;
    let leader = register(&app, "Lia", "lia@example.com", "Lider").await;

    let body = profile(&app, &leader.token).await;
    assert_eq!(body["user"]["id"], leader.id.as_str());
    assert_eq!(body["teams"], json!([]));
    assert_eq!(body["annotations"], json!([]));
}
