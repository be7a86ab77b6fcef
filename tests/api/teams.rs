use axum::http::{Method, StatusCode};
use serde_json::{json, Value};

use staffdesk::config::{PolicyConfig, TeamCreationPolicy};

use crate::support::{
    assert_error, onboard_employee, read_json, register, send_request, setup_test_app,
    setup_test_app_with,
};

#[tokio::test]
async fn manager_created_team_records_creator_leader_and_members() {
    let app = setup_test_app().await;
    let manager = register(&app, "Gil", "gil@example.com", "Gerenciador").await;
    let leader = register(&app, "Lia", "lia@example.com", "Lider").await;
    let ana = onboard_employee(&app, &manager, "Ana", "ana@example.com").await;
    let bia = onboard_employee(&app, &manager, "Bia", "bia@example.com").await;

    let response = send_request(
        &app,
        Method::POST,
        "/api/v1/teams",
        Some(&manager.token),
        Some(json!({
            "nome": "Core",
            "membros": [ana.id, bia.id],
            "leaderEmail": "lia@example.com"
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let team: Value = read_json(response).await;
    assert_eq!(team["leader"], leader.id.as_str());
    assert_eq!(team["creator"], manager.id.as_str());
    assert_eq!(team["members"], json!([ana.id, bia.id]));

    let response =
        send_request(&app, Method::GET, "/api/v1/teams", Some(&leader.token), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let teams: Value = read_json(response).await;
    assert_eq!(teams[0]["leader"]["email"], "lia@example.com");
    assert_eq!(teams[0]["members"][1]["name"], "Bia");

    let response =
        send_request(&app, Method::GET, "/api/v1/profile", Some(&leader.token), None).await;
    let profile: Value = read_json(response).await;
    assert_eq!(profile["user"]["teams"], json!([team["id"]]));
}

#[tokio::test]
async fn team_creation_is_all_or_nothing() {
    let app = setup_test_app().await;
    let manager = register(&app, "Gil", "gil@example.com", "Gerenciador").await;
    let leader = register(&app, "Lia", "lia@example.com", "Lider").await;
    let ana = onboard_employee(&app, &manager, "Ana", "ana@example.com").await;

    for members in [
        json!([ana.id, "6f9619ff-8b86-d011-b42d-00c04fc964ff"]),
        json!([ana.id, manager.id]),
        json!([ana.id, ana.id]),
        json!(["garbage"]),
        json!([]),
    ] {
        let response = send_request(
            &app,
            Method::POST,
            "/api/v1/teams",
            Some(&leader.token),
            Some(json!({ "name": "Core", "memberIds": members })),
        )
        .await;
        assert_error(response, StatusCode::BAD_REQUEST, "invalid_input").await;
    }

    let response =
        send_request(&app, Method::GET, "/api/v1/teams", Some(&manager.token), None).await;
    let teams: Value = read_json(response).await;
    assert_eq!(teams, json!([]));

    let response =
        send_request(&app, Method::GET, "/api/v1/teams", Some(&leader.token), None).await;
    assert_error(response, StatusCode::NOT_FOUND, "not_found").await;
}

#[tokio::test]
async fn employees_cannot_create_or_list_teams() {
    let app = setup_test_app().await;
    let manager = register(&app, "Gil", "gil@example.com", "Gerenciador").await;
    let ana = onboard_employee(&app, &manager, "Ana", "ana@example.com").await;

    let response = send_request(
        &app,
        Method::POST,
        "/api/v1/teams",
        Some(&ana.token),
        Some(json!({ "name": "Mine", "memberIds": [ana.id] })),
    )
    .await;
    assert_error(response, StatusCode::FORBIDDEN, "forbidden").await;

    let response = send_request(&app, Method::GET, "/api/v1/teams", Some(&ana.token), None).await;
    assert_error(response, StatusCode::FORBIDDEN, "forbidden").await;
}

#[tokio::test]
async fn leader_self_policy_blocks_managers() {
    let app = setup_test_app_with(PolicyConfig {
        team_creation: TeamCreationPolicy::LeaderSelf,
        ..Default::default()
    })
    .await;
    let manager = register(&app, "Gil", "gil@example.com", "Gerenciador").await;
    register(&app, "Lia", "lia@example.com", "Lider").await;
    let ana = onboard_employee(&app, &manager, "Ana", "ana@example.com").await;

    let response = send_request(
        &app,
        Method::POST,
        "/api/v1/teams",
        Some(&manager.token),
        Some(json!({ "name": "Core", "memberIds": [ana.id], "leaderEmail": "lia@example.com" })),
    )
    .await;
    assert_error(response, StatusCode::FORBIDDEN, "forbidden").await;
}

#[tokio::test]
async fn employee_onboarded_into_team_appears_as_member() {
    let app = setup_test_app().await;
    let manager = register(&app, "Gil", "gil@example.com", "Gerenciador").await;
    let leader = register(&app, "Lia", "lia@example.com", "Lider").await;
    let ana = onboard_employee(&app, &manager, "Ana", "ana@example.com").await;

    let response = send_request(
        &app,
        Method::POST,
        "/api/v1/teams",
        Some(&leader.token),
        Some(json!({ "name": "Core", "memberIds": [ana.id] })),
    )
    .await;
    let team: Value = read_json(response).await;

    let response = send_request(
        &app,
        Method::POST,
        "/api/v1/employees",
        Some(&manager.token),
        Some(json!({
            "nome": "Bia",
            "email": "bia@example.com",
            "senha": crate::support::PASSWORD,
            "equipe": team["id"]
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response =
        send_request(&app, Method::GET, "/api/v1/teams", Some(&leader.token), None).await;
    let teams: Value = read_json(response).await;
    let emails: Vec<&str> = teams[0]["members"]
        .as_array()
        .unwrap()
        .iter()
        .map(|member| member["email"].as_str().unwrap())
        .collect();
    assert_eq!(emails, vec!["ana@example.com", "bia@example.com"]);
}
