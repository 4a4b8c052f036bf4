//! End-to-end component flows over HTTP
//!
//! Search modal, pending requests panel and the shared query cache, driven through
//! an `AppContext` against wiremock.

use pretty_assertions::assert_eq;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use chatlink::client::{PendingView, SearchPhase, Severity};
use chatlink::shared::messaging::{ChatId, User, UserId};

use crate::common::*;

async fn pending_calls(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.url.path() == "/api/relationship/pending")
        .count()
}

#[tokio::test]
async fn test_accept_invalidates_and_refetches() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/relationship/pending"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "data": [request_json("r1", "u1")] })),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/relationship/pending"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/relationship/accept"))
        .and(body_json(json!({ "user_id": "u1" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "data": null, "message": "Accepted" })),
        )
        .expect(1)
        .mount(&server)
        .await;
    let (app, mut notifications) = app_for(&server);
    let panel = app.pending_requests();

    let requests = crate::assert_ok!(panel.load().await.into_result());
    panel.accept(&requests[0]).await.unwrap();
    crate::assert_notified!(notifications, Severity::Success, "Accepted");

    panel.load().await;
    assert_eq!(panel.view().await, PendingView::Empty);
    assert_eq!(pending_calls(&server).await, 2);

    app.shutdown().await;
}

#[tokio::test]
async fn test_concurrent_panels_share_one_fetch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/relationship/pending"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "data": [request_json("r1", "u1")] }))
                .set_delay(Duration::from_millis(100)),
        )
        .expect(1)
        .mount(&server)
        .await;
    let (app, _notifications) = app_for(&server);
    let panels: Vec<_> = (0..5).map(|_| app.pending_requests()).collect();

    let results = futures_util::future::join_all(panels.iter().map(|p| p.load())).await;

    assert!(results.iter().all(|r| r.is_success()));
    assert_eq!(pending_calls(&server).await, 1);
}

#[tokio::test]
async fn test_search_without_pause_issues_one_call() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/profile/search/user"))
        .and(query_param("username", "ann"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "data": [user_json("u1", "Ann", "Lee")] })),
        )
        .expect(1)
        .mount(&server)
        .await;
    let (app, _notifications) = app_for(&server);
    let search = app.search_modal();

    for text in ["a", "an", "ann"] {
        search.on_input(text);
    }
    search.on_key_release().unwrap().await.unwrap();

    let state = search.state();
    assert_eq!(state.phase, SearchPhase::Results);
    assert_eq!(state.results[0].id, UserId::new("u1"));
    assert_eq!(server.received_requests().await.unwrap_or_default().len(), 1);
}

#[tokio::test]
async fn test_blocked_user_keeps_modal_open() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chats/create-or-get"))
        .respond_with(
            ResponseTemplate::new(403).set_body_json(json!({ "message": "User blocked you" })),
        )
        .mount(&server)
        .await;
    let (app, mut notifications) = app_for(&server);
    let search = app.search_modal();
    let user: User = serde_json::from_value(user_json("u1", "Ann", "Lee")).unwrap();

    assert!(search.select_user(&user).await.is_err());

    assert!(search.is_open());
    assert!(app.chats().selected().is_none());
    crate::assert_notified!(notifications, Severity::Error, "User blocked you");
}

#[tokio::test]
async fn test_open_chat_twice_keeps_one_entry() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chats/create-or-get"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "data": chat_json("c1", &["me", "u1"]) })),
        )
        .mount(&server)
        .await;
    let (app, _notifications) = app_for(&server);
    let user: User = serde_json::from_value(user_json("u1", "Ann", "Lee")).unwrap();

    let first = app.search_modal().select_user(&user).await.unwrap();
    let second = app.search_modal().select_user(&user).await.unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(app.chats().chats().len(), 1);
    assert_eq!(app.chats().selected().map(|c| c.id), Some(ChatId::new("c1")));
}

#[tokio::test]
async fn test_search_failure_uses_fallback_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/profile/search/user"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let (app, mut notifications) = app_for(&server);
    let search = app.search_modal();

    search.on_input("ann");
    search.on_key_release().unwrap().await.unwrap();

    assert_eq!(search.state().phase, SearchPhase::Error);
    crate::assert_notified!(
        notifications,
        Severity::Error,
        "Something went wrong, cannot search for user!"
    );
}
