//! Tests for group handlers.

use super::*;
use crate::domain::{EmailAddress, Group, Username};
use crate::inbound::http::test_utils::{MockPorts, body_json, login_as, test_app};
use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use chrono::{TimeZone, Utc};
use rstest::{fixture, rstest};
use serde_json::Value;

fn user(name: &str) -> User {
    User::new(
        UserId::random(),
        Username::new(name).expect("fixture username"),
        EmailAddress::new(format!("{name}@example.com")).expect("fixture email"),
        None,
    )
}

fn details(name: &str) -> GroupDetails {
    GroupDetails::try_from_fields(GroupFields {
        name: Some(name.into()),
        description: Some("Weekly vampire chronicle".into()),
        schedule: Some("Fridays".into()),
        location: Some("Lisbon".into()),
        chronic: Some("By Night".into()),
    })
    .expect("fixture details")
}

struct Fixture {
    master: User,
    view: GroupView,
}

#[fixture]
fn fixture() -> Fixture {
    let master = user("ana");
    let created_at = Utc
        .with_ymd_and_hms(2026, 3, 1, 12, 0, 0)
        .single()
        .expect("fixture time");
    let group = Group::found(GroupId::random(), details("Night Owls"), *master.id(), created_at);
    let view = GroupView {
        group,
        master: Some(master.clone()),
        players: vec![master.clone()],
    };
    Fixture { master, view }
}

fn create_payload(master: &UserId) -> Value {
    json!({
        "name": "Night Owls",
        "description": "Weekly vampire chronicle",
        "schedule": "Fridays",
        "location": "Lisbon",
        "chronic": "By Night",
        "master": master.to_string(),
    })
}

#[rstest]
#[actix_web::test]
async fn create_returns_group_with_master_as_only_player(fixture: Fixture) {
    let Fixture { master, view } = fixture;
    let master_id = *master.id();
    let mut ports = MockPorts::default();
    ports
        .groups
        .expect_create_group()
        .withf(move |request| {
            request.actor == master_id
                && request.master == master_id
                && request.details.name() == "Night Owls"
        })
        .times(1)
        .returning(move |_| Ok(view.clone()));
    let app = actix_test::init_service(test_app(ports)).await;
    let cookie = login_as(&app, &master_id).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/groups")
            .cookie(cookie)
            .set_json(create_payload(&master_id))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::CREATED);
    let body = body_json(res).await;
    let group = &body["group"];
    assert_eq!(group["name"], "Night Owls");
    assert_eq!(group["chronic"], "By Night");
    assert_eq!(group["master"], master_id.to_string());
    assert_eq!(group["masterUser"]["username"], "ana");
    assert_eq!(group["createdAt"], "2026-03-01T12:00:00+00:00");
    let players = group["players"].as_array().expect("players array");
    assert_eq!(players.len(), 1);
    assert_eq!(players[0]["email"], "ana@example.com");
}

#[rstest]
#[case("name", "missing_field")]
#[case("chronic", "missing_field")]
#[actix_web::test]
async fn create_rejects_missing_attributes(#[case] field: &str, #[case] code: &str) {
    let master = UserId::random();
    let app = actix_test::init_service(test_app(MockPorts::default())).await;
    let cookie = login_as(&app, &master).await;
    let mut payload = create_payload(&master);
    payload
        .as_object_mut()
        .expect("object payload")
        .remove(field);

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/groups")
            .cookie(cookie)
            .set_json(payload)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(res).await;
    assert_eq!(body["details"]["field"], field);
    assert_eq!(body["details"]["code"], code);
}

#[actix_web::test]
async fn create_rejects_malformed_master() {
    let master = UserId::random();
    let app = actix_test::init_service(test_app(MockPorts::default())).await;
    let cookie = login_as(&app, &master).await;
    let mut payload = create_payload(&master);
    payload["master"] = json!("not-a-uuid");

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/groups")
            .cookie(cookie)
            .set_json(payload)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(res).await;
    assert_eq!(body["details"]["code"], "invalid_uuid");
    assert_eq!(body["details"]["value"], "not-a-uuid");
}

#[actix_web::test]
async fn create_requires_login() {
    let app = actix_test::init_service(test_app(MockPorts::default())).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/groups")
            .set_json(create_payload(&UserId::random()))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[rstest]
#[actix_web::test]
async fn unfiltered_listing_is_flat(fixture: Fixture) {
    let view = fixture.view;
    let mut ports = MockPorts::default();
    ports
        .groups_query
        .expect_list_groups()
        .withf(|request| request.user.is_none() && request.text.is_none())
        .returning(move |_| Ok(GroupListing::All(vec![view.clone()])));
    let app = actix_test::init_service(test_app(ports)).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get().uri("/api/v1/groups").to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body = body_json(res).await;
    let groups = body["groups"].as_array().expect("flat listing");
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0]["name"], "Night Owls");
}

#[rstest]
#[actix_web::test]
async fn filtered_listing_is_paginated_with_links(fixture: Fixture) {
    let view = fixture.view;
    let mut ports = MockPorts::default();
    ports
        .groups_query
        .expect_list_groups()
        .withf(|request| {
            request.text.as_deref() == Some("owl")
                && request.page.page() == 2
                && request.page.limit() == 1
        })
        .returning(move |request| {
            Ok(GroupListing::Page(Paginated::new(
                request.page,
                3,
                vec![view.clone()],
            )))
        });
    let app = actix_test::init_service(test_app(ports)).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/groups?text=owl&page=2&limit=1")
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body = body_json(res).await;
    let meta = &body["groups"]["meta"];
    assert_eq!(meta["total"], 3);
    assert_eq!(meta["currentPage"], 2);
    assert_eq!(meta["lastPage"], 3);
    assert_eq!(meta["nextPageUrl"], "/api/v1/groups?text=owl&page=3&limit=1");
    assert_eq!(
        meta["previousPageUrl"],
        "/api/v1/groups?text=owl&page=1&limit=1"
    );
    assert_eq!(body["groups"]["data"][0]["name"], "Night Owls");
}

#[rstest]
#[case("page=0", "page")]
#[case("limit=101", "limit")]
#[case("page=first", "page")]
#[actix_web::test]
async fn invalid_paging_is_unprocessable(#[case] query: &str, #[case] field: &str) {
    let app = actix_test::init_service(test_app(MockPorts::default())).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/api/v1/groups?text=owl&{query}"))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(res).await;
    assert_eq!(body["details"]["field"], field);
}

#[actix_web::test]
async fn malformed_group_id_is_not_found() {
    let app = actix_test::init_service(test_app(MockPorts::default())).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/groups/42")
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[rstest]
#[actix_web::test]
async fn delete_answers_empty_object(fixture: Fixture) {
    let master_id = *fixture.master.id();
    let group_id = *fixture.view.group.id();
    let mut ports = MockPorts::default();
    ports
        .groups
        .expect_delete_group()
        .withf(move |actor, id| *actor == master_id && *id == group_id)
        .times(1)
        .returning(|_, _| Ok(()));
    let app = actix_test::init_service(test_app(ports)).await;
    let cookie = login_as(&app, &master_id).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::delete()
            .uri(&format!("/api/v1/groups/{group_id}"))
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body_json(res).await, json!({}));
}

#[rstest]
#[actix_web::test]
async fn removing_the_master_is_a_bad_request(fixture: Fixture) {
    let master_id = *fixture.master.id();
    let group_id = *fixture.view.group.id();
    let mut ports = MockPorts::default();
    ports
        .groups
        .expect_remove_member()
        .withf(move |request| request.user_id == master_id && request.group_id == group_id)
        .returning(|_| Err(Error::invalid_operation("the group master cannot be removed")));
    let app = actix_test::init_service(test_app(ports)).await;
    let cookie = login_as(&app, &master_id).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::delete()
            .uri(&format!("/api/v1/groups/{group_id}/players/{master_id}"))
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = body_json(res).await;
    assert_eq!(body["code"], "invalid_operation");
}

#[rstest]
#[actix_web::test]
async fn patch_forwards_only_supplied_attributes(fixture: Fixture) {
    let Fixture { master, view } = fixture;
    let master_id = *master.id();
    let mut ports = MockPorts::default();
    ports
        .groups
        .expect_update_group()
        .withf(move |request| {
            request.actor == master_id
                && request.patch
                    == GroupDetailsPatch::try_from_fields(GroupFields {
                        location: Some("Porto".into()),
                        ..GroupFields::default()
                    })
                    .expect("patch")
        })
        .times(1)
        .returning(move |_| Ok(view.clone()));
    let app = actix_test::init_service(test_app(ports)).await;
    let cookie = login_as(&app, &master_id).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::patch()
            .uri(&format!("/api/v1/groups/{}", UserId::random()))
            .cookie(cookie)
            .set_json(json!({"location": "Porto"}))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
}
