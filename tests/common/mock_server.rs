//! Mock server helpers for integration tests
//!
//! Builds clients pointed at a `wiremock` server standing in for the chat API.

use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;
use wiremock::MockServer;

use chatlink::client::{AppContext, ChannelNotifier, Config, HttpApi, Notification, StaticSession};
use chatlink::shared::AppConfig;

pub const TEST_USER: &str = "me";
pub const TEST_TOKEN: &str = "test-token";

/// Client config whose base URL is the mock server's `/api`
pub fn config_for(server: &MockServer) -> Config {
    config_with_timeout(server, Duration::from_secs(5))
}

pub fn config_with_timeout(server: &MockServer, timeout: Duration) -> Config {
    let builder = AppConfig::builder()
        .server_url(format!("{}/api", server.uri()))
        .request_timeout(timeout);
    Config::with_builder(builder).unwrap()
}

pub fn signed_in_session() -> Arc<StaticSession> {
    Arc::new(StaticSession::signed_in(TEST_USER, TEST_TOKEN))
}

pub fn http_api(server: &MockServer) -> HttpApi {
    HttpApi::new(config_for(server), signed_in_session()).unwrap()
}

/// App context against the mock server, plus the notifications it emits
pub fn app_for(server: &MockServer) -> (AppContext<HttpApi>, UnboundedReceiver<Notification>) {
    let (notifier, rx) = ChannelNotifier::new();
    let app = AppContext::connect(config_for(server), signed_in_session(), Arc::new(notifier))
        .unwrap();
    (app, rx)
}

pub fn user_json(id: &str, first: &str, last: &str) -> Value {
    json!({
        "_id": id,
        "firstName": first,
        "lastName": last,
        "email": format!("{}@example.com", first.to_lowercase()),
    })
}

pub fn request_json(id: &str, sender: &str) -> Value {
    json!({
        "_id": id,
        "sentBy": user_json(sender, "Ann", "Lee"),
    })
}

pub fn chat_json(id: &str, participants: &[&str]) -> Value {
    json!({ "_id": id, "participants": participants })
}
