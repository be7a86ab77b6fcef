use axum::http::{Method, StatusCode};
use serde_json::{json, Value};

use staffdesk::config::{AnnotationTargetPolicy, PolicyConfig};

use crate::support::{
    assert_error, onboard_employee, read_json, register, send_request, setup_test_app,
    setup_test_app_with,
};

#[tokio::test]
async fn leader_annotates_employee_by_id() {
    let app = setup_test_app().await;
    let manager = register(&app, "Gil", "gil@example.com", "Gerenciador").await;
    let leader = register(&app, "Lia", "lia@example.com", "Lider").await;
    let employee = onboard_employee(&app, &manager, "Ana", "ana@example.com").await;

    let response = send_request(
        &app,
        Method::POST,
        "/api/v1/annotations",
        Some(&leader.token),
        Some(json!({ "funcionario": employee.id, "descricao": "Great sprint demo" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created: Value = read_json(response).await;
    assert_eq!(created["employeeId"], employee.id.as_str());
    assert_eq!(created["employeeName"], "Ana");
    assert_eq!(created["leader"], leader.id.as_str());

    let response =
        send_request(&app, Method::GET, "/api/v1/annotations", Some(&leader.token), None).await;
    let listed: Value = read_json(response).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["id"], created["id"]);
    assert_eq!(listed[0]["employeeName"], "Ana");
}

#[tokio::test]
async fn target_must_be_an_existing_employee() {
    let app = setup_test_app().await;
    let manager = register(&app, "Gil", "gil@example.com", "Gerenciador").await;
    let leader = register(&app, "Lia", "lia@example.com", "Lider").await;

    let cases = [
        (json!("Ana"), StatusCode::BAD_REQUEST, "invalid_input"),
        (json!(manager.id), StatusCode::BAD_REQUEST, "invalid_input"),
        (json!("6f9619ff-8b86-d011-b42d-00c04fc964ff"), StatusCode::NOT_FOUND, "not_found"),
    ];
    for (employee, status, kind) in cases {
        let response = send_request(
            &app,
            Method::POST,
            "/api/v1/annotations",
            Some(&leader.token),
            Some(json!({ "employee": employee, "description": "note" })),
        )
        .await;
        assert_error(response, status, kind).await;
    }

    let response =
        send_request(&app, Method::GET, "/api/v1/annotations", Some(&leader.token), None).await;
    let listed: Value = read_json(response).await;
    assert_eq!(listed, json!([]));
}

#[tokio::test]
async fn free_text_targets_are_stored_as_names() {
    let app = setup_test_app_with(PolicyConfig {
        annotation_target: AnnotationTargetPolicy::FreeText,
        ..Default::default()
    })
    .await;
    let leader = register(&app, "Lia", "lia@example.com", "Lider").await;

    let response = send_request(
        &app,
        Method::POST,
        "/api/v1/annotations",
        Some(&leader.token),
        Some(json!({ "employee": "Joana (contractor)", "description": "Helped with release" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created: Value = read_json(response).await;
    assert_eq!(created["employeeName"], "Joana (contractor)");
    assert!(created.get("employeeId").is_none());
}

#[tokio::test]
async fn annotations_are_leader_only_and_private() {
    let app = setup_test_app().await;
    let manager = register(&app, "Gil", "gil@example.com", "Gerenciador").await;
    let lia = register(&app, "Lia", "lia@example.com", "Lider").await;
    let leo = register(&app, "Leo", "leo@example.com", "Lider").await;
    let employee = onboard_employee(&app, &manager, "Ana", "ana@example.com").await;

    let response = send_request(
        &app,
        Method::POST,
        "/api/v1/annotations",
        Some(&lia.token),
        Some(json!({ "employee": employee.id, "description": "note" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response =
        send_request(&app, Method::GET, "/api/v1/annotations", Some(&leo.token), None).await;
    let listed: Value = read_json(response).await;
    assert_eq!(listed, json!([]));

    for token in [&manager.token, &employee.token] {
        let response = send_request(
            &app,
            Method::POST,
            "/api/v1/annotations",
            Some(token),
            Some(json!({ "employee": employee.id, "description": "note" })),
        )
        .await;
        assert_error(response, StatusCode::FORBIDDEN, "forbidden").await;
    }
}
