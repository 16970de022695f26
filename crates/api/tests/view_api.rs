//! HTTP-level integration tests for saved conversation views.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, delete_auth, get_auth, login_as, post_json_auth, put_json_auth, seed_group,
};
use serde_json::json;
use sqlx::PgPool;

async fn create_view(
    pool: &PgPool,
    token: &str,
    body: serde_json::Value,
) -> axum::response::Response {
    let app = common::build_test_app(pool.clone());
    post_json_auth(app, "/api/v1/views", body, token).await
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn view_runs_its_filters(pool: PgPool) {
    let (_, agent) = login_as(&pool, "Agent", "agent").await;

    for (subject, status_id) in [("Open one", 1), ("Open two", 1), ("Done", 3)] {
        let app = common::build_test_app(pool.clone());
        let response = post_json_auth(
            app,
            "/api/v1/conversations",
            json!({ "subject": subject, "status_id": status_id }),
            &agent,
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = create_view(
        &pool,
        &agent,
        json!({
            "name": "My open queue",
            "access": "owner",
            "filters": [{ "type": "not_closed" }],
            "order_by": "id",
            "order_dir": "asc",
            "columns": ["id", "subject", "status"]
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let view = body_json(response).await["data"].clone();
    assert_eq!(view["order_dir"], "asc");
    assert_eq!(view["filters"], json!([{ "type": "not_closed" }]));

    let app = common::build_test_app(pool);
    let response = get_auth(
        app,
        &format!("/api/v1/views/{}/conversations", view["id"]),
        &agent,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["total"], 2);
    assert_eq!(json["data"][0]["subject"], "Open one");
    assert_eq!(json["data"][1]["subject"], "Open two");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn invalid_definitions_are_rejected(pool: PgPool) {
    let (_, agent) = login_as(&pool, "Agent", "agent").await;

    let response = create_view(
        &pool,
        &agent,
        json!({ "name": "Bad sort", "access": "owner", "order_by": "subject" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = create_view(
        &pool,
        &agent,
        json!({ "name": "Bad column", "access": "owner", "columns": ["password"] }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = create_view(&pool, &agent, json!({ "name": "No group", "access": "group" })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn customers_cannot_use_views(pool: PgPool) {
    let (_, customer) = login_as(&pool, "Carol", "customer").await;
    let app = common::build_test_app(pool);

    let response = get_auth(app, "/api/v1/views", &customer).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn access_controls_visibility(pool: PgPool) {
    let (owner_id, owner) = login_as(&pool, "Owner", "agent").await;
    let (member_id, member) = login_as(&pool, "Member", "agent").await;
    let (_, outsider) = login_as(&pool, "Outsider", "agent").await;
    let (_, admin) = login_as(&pool, "Admin", "admin").await;
    let group_id = seed_group(&pool, "Billing", &[owner_id, member_id]).await;

    let private = body_json(
        create_view(&pool, &owner, json!({ "name": "Private", "access": "owner" })).await,
    )
    .await["data"]
        .clone();
    let shared = body_json(
        create_view(
            &pool,
            &owner,
            json!({ "name": "Billing queue", "access": "group", "group_id": group_id }),
        )
        .await,
    )
    .await["data"]
        .clone();
    let public = body_json(
        create_view(&pool, &owner, json!({ "name": "Everyone", "access": "anyone" })).await,
    )
    .await["data"]
        .clone();

    let names = |json: serde_json::Value| -> Vec<String> {
        json["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v["name"].as_str().unwrap().to_string())
            .collect()
    };

    let app = common::build_test_app(pool.clone());
    let member_views = names(body_json(get_auth(app, "/api/v1/views", &member).await).await);
    assert_eq!(member_views, vec!["Billing queue", "Everyone"]);

    let app = common::build_test_app(pool.clone());
    let outsider_views = names(body_json(get_auth(app, "/api/v1/views", &outsider).await).await);
    assert_eq!(outsider_views, vec!["Everyone"]);

    let app = common::build_test_app(pool.clone());
    let admin_views = names(body_json(get_auth(app, "/api/v1/views", &admin).await).await);
    assert_eq!(admin_views.len(), 3);

    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, &format!("/api/v1/views/{}", private["id"]), &member).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, &format!("/api/v1/views/{}", shared["id"]), &outsider).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Members can see a group view but not change it.
    let app = common::build_test_app(pool.clone());
    let response = put_json_auth(
        app,
        &format!("/api/v1/views/{}", shared["id"]),
        json!({ "name": "Renamed" }),
        &member,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let app = common::build_test_app(pool);
    let response = delete_auth(app, &format!("/api/v1/views/{}", public["id"]), &admin).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn sharing_requires_group_membership(pool: PgPool) {
    let (_, agent) = login_as(&pool, "Agent", "agent").await;
    let (_, admin) = login_as(&pool, "Admin", "admin").await;
    let group_id = seed_group(&pool, "Escalations", &[]).await;
    let body = json!({ "name": "Escalations", "access": "group", "group_id": group_id });

    let response = create_view(&pool, &agent, body.clone()).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = create_view(&pool, &admin, body).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = create_view(
        &pool,
        &admin,
        json!({ "name": "Ghost group", "access": "group", "group_id": 999_999 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_changes_access_and_group_together(pool: PgPool) {
    let (agent_id, agent) = login_as(&pool, "Agent", "agent").await;
    let group_id = seed_group(&pool, "Tier 2", &[agent_id]).await;

    let view = body_json(
        create_view(&pool, &agent, json!({ "name": "Mine", "access": "owner" })).await,
    )
    .await["data"]
        .clone();
    let uri = format!("/api/v1/views/{}", view["id"]);

    let app = common::build_test_app(pool.clone());
    let response = put_json_auth(app, &uri, json!({ "group_id": group_id }), &agent).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let app = common::build_test_app(pool.clone());
    let response = put_json_auth(
        app,
        &uri,
        json!({ "access": "group", "group_id": group_id, "pinned": true }),
        &agent,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await["data"].clone();
    assert_eq!(updated["access"], "group");
    assert_eq!(updated["group_id"], group_id);
    assert_eq!(updated["pinned"], true);

    let app = common::build_test_app(pool.clone());
    let response = put_json_auth(app, &uri, json!({ "access": "anyone" }), &agent).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_json(response).await["data"]["group_id"].is_null());

    let app = common::build_test_app(pool.clone());
    let response = delete_auth(app, &uri, &agent).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let app = common::build_test_app(pool);
    let response = get_auth(app, &uri, &agent).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
