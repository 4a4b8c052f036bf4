//! Remote data access tests
//!
//! Exercises `HttpApi` and `SocialApi` over real HTTP against wiremock.

use assert_matches::assert_matches;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use chatlink::client::social_api::SocialApi;
use chatlink::client::{HttpApi, RemoteApi};
use chatlink::shared::messaging::UserId;
use chatlink::shared::ApiError;

use crate::common::*;

fn social(server: &MockServer) -> SocialApi<HttpApi> {
    SocialApi::new(Arc::new(http_api(server)))
}

#[tokio::test]
async fn test_search_sends_query_and_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/profile/search/user"))
        .and(query_param("username", "ann"))
        .and(header("authorization", format!("Bearer {}", TEST_TOKEN).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [user_json("u1", "Ann", "Lee"), user_json("u2", "Anna", "Berg")]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let users = crate::assert_ok!(social(&server).search_users("ann").await);

    assert_eq!(users.len(), 2);
    assert_eq!(users[0].full_name(), "Ann Lee");
    assert_eq!(users[1].id, UserId::new("u2"));
}

#[tokio::test]
async fn test_error_status_carries_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chats/create-or-get"))
        .respond_with(
            ResponseTemplate::new(403).set_body_json(json!({ "message": "User blocked you" })),
        )
        .mount(&server)
        .await;

    let result = social(&server).create_or_get_chat(&UserId::new("u1")).await;

    assert_eq!(
        result.unwrap_err(),
        ApiError::server(403, Some("User blocked you".to_string()))
    );
}

#[tokio::test]
async fn test_error_status_without_json_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/relationship/pending"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let error = social(&server).pending_requests().await.unwrap_err();

    assert_eq!(error, ApiError::server(502, None));
    assert_eq!(error.user_message("fallback"), "fallback");
}

#[tokio::test]
async fn test_malformed_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/relationship/pending"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
        .mount(&server)
        .await;

    let result = social(&server).pending_requests().await;
    assert_matches!(result, Err(ApiError::Decode { .. }));
}

#[tokio::test]
async fn test_accept_and_delete_send_user_id_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/relationship/accept"))
        .and(body_json(json!({ "user_id": "u1" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "data": null, "message": "Accepted" })),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/relationship/delete"))
        .and(body_json(json!({ "user_id": "u2" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "Deleted" })))
        .expect(1)
        .mount(&server)
        .await;
    let api = social(&server);

    let accepted = api.accept_request(&UserId::new("u1")).await.unwrap();
    let deleted = api.delete_request(&UserId::new("u2")).await.unwrap();

    assert_eq!(accepted.message.as_deref(), Some("Accepted"));
    assert_eq!(deleted.message.as_deref(), Some("Deleted"));
}

#[tokio::test]
async fn test_create_or_get_is_stable_for_same_pair() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chats/create-or-get"))
        .and(body_json(json!({ "userId": "u1" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "data": chat_json("c1", &["me", "u1"]) })),
        )
        .expect(2)
        .mount(&server)
        .await;
    let api = social(&server);

    let first = api.create_or_get_chat(&UserId::new("u1")).await.unwrap();
    let second = api.create_or_get_chat(&UserId::new("u1")).await.unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(first.other_participant(&UserId::new("me")), Some(&UserId::new("u1")));
}

#[tokio::test]
async fn test_empty_success_body() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/relationship/delete"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let envelope = http_api(&server)
        .mutate(reqwest::Method::DELETE, "/relationship/delete", json!({ "user_id": "u1" }))
        .await
        .unwrap();

    assert!(envelope.data.is_none());
    assert!(envelope.message.is_none());
}

#[tokio::test]
async fn test_slow_server_times_out_as_network_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/relationship/pending"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "data": [] }))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;
    let api = HttpApi::new(
        config_with_timeout(&server, Duration::from_millis(100)),
        signed_in_session(),
    )
    .unwrap();

    let result = SocialApi::new(Arc::new(api)).pending_requests().await;
    assert_matches!(result, Err(ApiError::Network { .. }));
}
