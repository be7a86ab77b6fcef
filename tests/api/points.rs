use axum::http::{Method, StatusCode};
use serde_json::{json, Value};

use crate::support::{
    assert_error, onboard_employee, read_json, register, send_request, setup_test_app,
};

#[tokio::test]
async fn awards_accumulate_fifty_plus_twenty_five() {
    let app = setup_test_app().await;
    let manager = register(&app, "Gil", "gil@example.com", "Gerenciador").await;
    let leader = register(&app, "Lia", "lia@example.com", "Lider").await;
    let employee = onboard_employee(&app, &manager, "Ana", "ana@example.com").await;

    let response = send_request(
        &app,
        Method::POST,
        "/api/v1/points",
        Some(&leader.token),
        Some(json!({ "funcionarioId": employee.id, "pontos": 50 })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = read_json(response).await;
    assert_eq!(body["points"], 50);

    let response = send_request(
        &app,
        Method::POST,
        "/api/v1/points",
        Some(&leader.token),
        Some(json!({ "userId": employee.id, "amount": "25" })),
    )
    .await;
    let body: Value = read_json(response).await;
    assert_eq!(body["points"], 75);

    let response =
        send_request(&app, Method::GET, "/api/v1/profile", Some(&employee.token), None).await;
    let profile: Value = read_json(response).await;
    assert_eq!(profile["user"]["points"], 75);
}

#[tokio::test]
async fn invalid_amounts_change_nothing() {
    let app = setup_test_app().await;
    let manager = register(&app, "Gil", "gil@example.com", "Gerenciador").await;
    let leader = register(&app, "Lia", "lia@example.com", "Lider").await;
    let employee = onboard_employee(&app, &manager, "Ana", "ana@example.com").await;

    for amount in [json!(0), json!(-10), json!(2.5), json!("ten"), json!(null)] {
        let response = send_request(
            &app,
            Method::POST,
            "/api/v1/points",
            Some(&leader.token),
            Some(json!({ "userId": employee.id, "amount": amount })),
        )
        .await;
        assert_error(response, StatusCode::BAD_REQUEST, "invalid_input").await;
    }

    let response =
        send_request(&app, Method::GET, "/api/v1/profile", Some(&employee.token), None).await;
    let profile: Value = read_json(response).await;
    assert_eq!(profile["user"]["points"], 0);
}

#[tokio::test]
async fn only_leaders_award_points_to_employees() {
    let app = setup_test_app().await;
    let manager = register(&app, "Gil", "gil@example.com", "Gerenciador").await;
    let leader = register(&app, "Lia", "lia@example.com", "Lider").await;
    let employee = onboard_employee(&app, &manager, "Ana", "ana@example.com").await;

    let response = send_request(
        &app,
        Method::POST,
        "/api/v1/points",
        Some(&manager.token),
        Some(json!({ "userId": employee.id, "amount": 5 })),
    )
    .await;
    assert_error(response, StatusCode::FORBIDDEN, "forbidden").await;

    let response = send_request(
        &app,
        Method::POST,
        "/api/v1/points",
        Some(&leader.token),
        Some(json!({ "userId": manager.id, "amount": 5 })),
    )
    .await;
    assert_error(response, StatusCode::BAD_REQUEST, "invalid_input").await;

    let response = send_request(
        &app,
        Method::POST,
        "/api/v1/points",
        Some(&leader.token),
        Some(json!({ "userId": "6f9619ff-8b86-d011-b42d-00c04fc964ff", "amount": 5 })),
    )
    .await;
    assert_error(response, StatusCode::NOT_FOUND, "not_found").await;
}
