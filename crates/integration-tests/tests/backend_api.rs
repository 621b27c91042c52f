//! REST API tests against a live backend.
//!
//! These tests require:
//! - A running `PostgreSQL` database
//! - The backend running (cargo run -p cms-starter-backend), which applies
//!   migrations and runs the bootstrap on start-up
//!
//! Run with: cargo test -p cms-starter-integration-tests -- --ignored

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use reqwest::{Method, StatusCode};
use serde_json::{Value, json};
use uuid::Uuid;

use cms_starter_client::{
    ApiClient, AuthSession, MemoryStorage, QueryParams, RequestOptions, home_resource,
};
use cms_starter_core::HomeContent;
use cms_starter_integration_tests::backend_base_url;

fn client() -> ApiClient {
    ApiClient::new(&backend_base_url(), Arc::new(MemoryStorage::new())).unwrap()
}

fn unique_user() -> (String, String) {
    let tag = Uuid::new_v4().simple().to_string();
    let tag = &tag[..12];
    (format!("user{tag}"), format!("user{tag}@example.com"))
}

#[tokio::test]
#[ignore = "Requires running backend and database"]
async fn test_health() {
    let resp = reqwest::get(format!("{}/health", backend_base_url()))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running backend and database"]
async fn test_public_can_read_seeded_home() {
    // The bootstrap enables api::home.home.find for the public role and
    // seeds a record when none exists.
    let home = client()
        .get_single_type::<HomeContent>("home", &QueryParams::populate_all())
        .await
        .unwrap();
    let home = home.data.unwrap();
    assert!(!home.welcome_text.is_empty());
}

#[tokio::test]
#[ignore = "Requires running backend and database"]
async fn test_home_resource_loads_once() {
    let resource = home_resource(client());
    let state = resource.load().await;
    assert!(!state.loading);
    assert!(state.error.is_none());
    assert!(state.data.is_some());
}

#[tokio::test]
#[ignore = "Requires running backend and database"]
async fn test_anonymous_update_is_rejected() {
    let resp = reqwest::Client::new()
        .put(format!("{}/api/home", backend_base_url()))
        .json(&json!({ "data": { "welcome_text": "Defaced" } }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let body: Value = resp.json().await.unwrap();
    assert!(body["data"].is_null());
    assert_eq!(body["error"]["name"], "UnauthorizedError");
}

#[tokio::test]
#[ignore = "Requires running backend and database"]
async fn test_authenticated_update_needs_permission() {
    // The bootstrap only grants find; update stays disabled for both roles.
    let (username, email) = unique_user();
    let client = client();
    client
        .register(&username, &email, "Passw0rd!")
        .await
        .unwrap();

    let err = client
        .fetch(
            "/api/home",
            RequestOptions::new(Method::PUT)
                .with_body(json!({ "data": { "welcome_text": "Defaced" } })),
        )
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(403));
    assert_eq!(err.to_string(), "Forbidden");
}

#[tokio::test]
#[ignore = "Requires running backend and database"]
async fn test_register_then_login() {
    let (username, email) = unique_user();
    let client = client();

    let registered = client
        .register(&username, &email, "Passw0rd!")
        .await
        .unwrap();
    assert_eq!(registered.user.username, username);
    assert!(client.is_authenticated());

    client.logout().unwrap();
    assert!(!client.is_authenticated());

    let logged_in = client.login(&email, "Passw0rd!").await.unwrap();
    assert_eq!(logged_in.user.id, registered.user.id);
    assert_eq!(client.token().as_deref(), Some(logged_in.jwt.as_str()));
}

#[tokio::test]
#[ignore = "Requires running backend and database"]
async fn test_duplicate_registration_is_rejected() {
    let (username, email) = unique_user();
    client()
        .register(&username, &email, "Passw0rd!")
        .await
        .unwrap();

    let err = client()
        .register(&username, &email, "Passw0rd!")
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(400));
    assert_eq!(err.to_string(), "Email or Username are already taken");
}

#[tokio::test]
#[ignore = "Requires running backend and database"]
async fn test_session_records_failed_login() {
    let session = AuthSession::new(client());

    let result = AuthSession::provide(session, async {
        let session = AuthSession::current().unwrap();
        let result = session.login("nobody@example.com", "wrong-password").await;
        (result, session.state())
    })
    .await;

    let (result, state) = result;
    assert!(result.is_err());
    assert!(!state.loading);
    assert!(state.user.is_none());
    assert_eq!(state.error.as_deref(), Some("Invalid identifier or password"));
}
