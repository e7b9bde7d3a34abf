use axum::http::{Method, StatusCode};
use serde_json::json;
use time::macros::datetime;
use tower::ServiceExt;

use crate::db::types::OrganizationRole;
use crate::test_support;

#[tokio::test]
async fn creator_becomes_manager_of_new_organization() {
    let ctx = test_support::setup_test_context().await;

    let user =
        test_support::insert_user(ctx.state.db(), "founder@label.com", "Founder", "founder-pass")
            .await;
    let token = test_support::bearer_token(&user.id, ctx.state.settings());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/organizations",
            Some(&token),
            Some(json!({"name": "Moonlight Records", "description": "Indie label"})),
        ))
        .await
        .expect("create organization");

    let status = response.status();
    let created = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::CREATED, "response: {created}");
    assert_eq!(created["name"], "Moonlight Records");
    let organization_id = created["id"].as_str().expect("organization id").to_string();

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/v1/organizations/{organization_id}/members"),
            Some(&token),
            None,
        ))
        .await
        .expect("list members");

    let status = response.status();
    let members = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {members}");
    assert_eq!(members["items"].as_array().expect("items").len(), 1);
    assert_eq!(members["items"][0]["user_id"], user.id.as_str());
    assert_eq!(members["items"][0]["role"], "manager");
    assert_eq!(members["pagination"]["hasMore"], false);
    assert_eq!(members["pagination"]["nextCursor"], serde_json::Value::Null);
}

#[tokio::test]
async fn organizations_listing_pages_newest_first() {
    let ctx = test_support::setup_test_context().await;

    let user =
        test_support::insert_user(ctx.state.db(), "pager@label.com", "Pager", "pager-pass").await;
    let token = test_support::bearer_token(&user.id, ctx.state.settings());

    for index in 0..5 {
        test_support::insert_organization(ctx.state.db(), &format!("Org {index}"), &user.id).await;
    }

    let mut collected = Vec::new();
    let mut uri = "/api/v1/organizations?limit=2".to_string();
    let mut pages = 0;

    loop {
        let response = ctx
            .app
            .clone()
            .oneshot(test_support::json_request(Method::GET, &uri, Some(&token), None))
            .await
            .expect("list organizations");

        let status = response.status();
        let body = test_support::read_json(response).await;
        assert_eq!(status, StatusCode::OK, "response: {body}");
        assert_eq!(body["pagination"]["limit"], 2);

        let items = body["items"].as_array().expect("items");
        for item in items {
            collected.push(item["id"].as_str().expect("id").to_string());
        }

        pages += 1;
        assert!(pages <= 5, "cursor chain did not terminate");

        if body["pagination"]["hasMore"].as_bool().expect("hasMore") {
            assert_eq!(items.len(), 2);
            let cursor = body["pagination"]["nextCursor"].as_str().expect("nextCursor");
            uri = format!("/api/v1/organizations?limit=2&cursor={cursor}");
        } else {
            assert_eq!(body["pagination"]["nextCursor"], serde_json::Value::Null);
            break;
        }
    }

    assert_eq!(pages, 3);
    assert_eq!(collected.len(), 5);

    // Every organization exactly once, newest first.
    let mut unique = collected.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), 5);
}

#[tokio::test]
async fn organizations_listing_rejects_bad_query() {
    let ctx = test_support::setup_test_context().await;

    let user =
        test_support::insert_user(ctx.state.db(), "badq@label.com", "Bad Query", "badq-pass").await;
    let token = test_support::bearer_token(&user.id, ctx.state.settings());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            "/api/v1/organizations?cursor=not-base64!!",
            Some(&token),
            None,
        ))
        .await
        .expect("list with bad cursor");

    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "response: {body}");
    assert_eq!(body["detail"], "Invalid cursor");

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::GET,
            "/api/v1/organizations?limit=0",
            Some(&token),
            None,
        ))
        .await
        .expect("list with bad limit");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn manager_can_add_member_once() {
    let ctx = test_support::setup_test_context().await;

    let manager =
        test_support::insert_user(ctx.state.db(), "boss@label.com", "Boss", "boss-pass").await;
    let invitee =
        test_support::insert_user(ctx.state.db(), "writer@label.com", "Writer", "writer-pass")
            .await;
    let organization =
        test_support::insert_organization(ctx.state.db(), "Sunset Sounds", &manager.id).await;
    let token = test_support::bearer_token(&manager.id, ctx.state.settings());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/v1/organizations/{}/members", organization.id),
            Some(&token),
            Some(json!({"email": "writer@label.com", "role": "songwriter"})),
        ))
        .await
        .expect("add member");

    let status = response.status();
    let added = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::CREATED, "response: {added}");
    assert_eq!(added["user_id"], invitee.id.as_str());
    assert_eq!(added["role"], "songwriter");

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/v1/organizations/{}/members", organization.id),
            Some(&token),
            Some(json!({"email": "writer@label.com", "role": "songwriter"})),
        ))
        .await
        .expect("add member again");
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/v1/organizations/{}/members", organization.id),
            Some(&token),
            Some(json!({"email": "nobody@label.com", "role": "songwriter"})),
        ))
        .await
        .expect("add unknown member");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn songwriters_cannot_manage_members() {
    let ctx = test_support::setup_test_context().await;

    let manager =
        test_support::insert_user(ctx.state.db(), "owner@label.com", "Owner", "owner-pass").await;
    let songwriter =
        test_support::insert_user(ctx.state.db(), "member@label.com", "Member", "member-pass")
            .await;
    let organization =
        test_support::insert_organization(ctx.state.db(), "Harbor Music", &manager.id).await;
    test_support::add_member(
        ctx.state.db(),
        &organization.id,
        &songwriter.id,
        OrganizationRole::Songwriter,
        datetime!(2026-06-01 10:00:00),
    )
    .await;
    let token = test_support::bearer_token(&songwriter.id, ctx.state.settings());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/v1/organizations/{}/members", organization.id),
            Some(&token),
            None,
        ))
        .await
        .expect("list members as songwriter");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/v1/organizations/{}/members", organization.id),
            Some(&token),
            Some(json!({"email": "owner@label.com", "role": "manager"})),
        ))
        .await
        .expect("add member as songwriter");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn members_listing_pages_by_join_time_with_ties() {
    let ctx = test_support::setup_test_context().await;

    let manager =
        test_support::insert_user(ctx.state.db(), "lead@label.com", "Lead", "lead-pass").await;
    let organization =
        test_support::insert_organization(ctx.state.db(), "Tied Joins", &manager.id).await;

    // Three members sharing one join timestamp, so page boundaries fall
    // inside the tie and only the member id breaks the order.
    let joined_at = datetime!(2026-06-02 09:00:00);
    for index in 0..3 {
        let user = test_support::insert_user(
            ctx.state.db(),
            &format!("tied{index}@label.com"),
            &format!("Tied {index}"),
            "tied-pass",
        )
        .await;
        test_support::add_member(
            ctx.state.db(),
            &organization.id,
            &user.id,
            OrganizationRole::Songwriter,
            joined_at,
        )
        .await;
    }

    let token = test_support::bearer_token(&manager.id, ctx.state.settings());
    let mut collected = Vec::new();
    let mut uri = format!("/api/v1/organizations/{}/members?limit=2", organization.id);
    let mut pages = 0;

    loop {
        let response = ctx
            .app
            .clone()
            .oneshot(test_support::json_request(Method::GET, &uri, Some(&token), None))
            .await
            .expect("list members");

        let status = response.status();
        let body = test_support::read_json(response).await;
        assert_eq!(status, StatusCode::OK, "response: {body}");

        for item in body["items"].as_array().expect("items") {
            collected.push(item["id"].as_str().expect("member id").to_string());
        }

        pages += 1;
        assert!(pages <= 4, "cursor chain did not terminate");

        match body["pagination"]["nextCursor"].as_str() {
            Some(cursor) => {
                uri = format!(
                    "/api/v1/organizations/{}/members?limit=2&cursor={cursor}",
                    organization.id
                );
            }
            None => break,
        }
    }

    // Creator + 3 songwriters, no row lost or repeated across the tie.
    assert_eq!(collected.len(), 4);
    let mut unique = collected.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), 4);
}
