//! Integration tests for the login and logout flow.

mod helpers;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum_extra::extract::cookie::SameSite;

use dirview_core::config::AppConfig;

#[tokio::test]
async fn test_login_success_sets_session_cookie() {
    let app = helpers::TestApp::new();

    let response = app
        .request(
            "POST",
            "/api/login",
            Some(serde_json::json!({
                "username": "alice",
                "password": "password",
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], true);
    assert_eq!(response.body["data"]["username"], "alice");

    let cookie = response.session_cookie().expect("session cookie");
    assert!(!cookie.value().is_empty());
    assert_eq!(cookie.http_only(), Some(true));
    assert_eq!(cookie.secure(), Some(true));
    assert_eq!(cookie.same_site(), Some(SameSite::Strict));
    assert_eq!(cookie.path(), Some("/"));
    assert!(cookie.max_age().is_none());

    assert_eq!(app.session_store.validate_session(cookie.value()).unwrap(), "alice");
}

#[tokio::test]
async fn test_login_invalid_password() {
    let app = helpers::TestApp::new();

    let response = app
        .request(
            "POST",
            "/api/login",
            Some(serde_json::json!({
                "username": "alice",
                "password": "wrongpassword",
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "UNAUTHORIZED");
    assert!(response.session_cookie().is_none());
}

#[tokio::test]
async fn test_login_unknown_user_looks_like_wrong_password() {
    let app = helpers::TestApp::new();

    let wrong_password = app
        .request(
            "POST",
            "/api/login",
            Some(serde_json::json!({ "username": "bob", "password": "nope" })),
            None,
        )
        .await;
    let unknown_user = app
        .request(
            "POST",
            "/api/login",
            Some(serde_json::json!({ "username": "nobody", "password": "password" })),
            None,
        )
        .await;

    assert_eq!(unknown_user.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_user.body, wrong_password.body);
}

#[tokio::test]
async fn test_login_without_content_type() {
    let app = helpers::TestApp::new();

    let req = Request::builder()
        .method("POST")
        .uri("/api/login")
        .body(Body::from(r#"{"username":"alice","password":"password"}"#))
        .unwrap();
    let response = app.send(req).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_login_malformed_bodies() {
    let app = helpers::TestApp::new();

    for body in [
        serde_json::json!({ "username": "alice" }),
        serde_json::json!({ "username": "", "password": "password" }),
        serde_json::json!({ "username": "alice", "password": "" }),
        serde_json::json!({ "username": 7, "password": "password" }),
    ] {
        let response = app.request("POST", "/api/login", Some(body.clone()), None).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "body {body}");
    }

    let req = Request::builder()
        .method("POST")
        .uri("/api/login")
        .header("Content-Type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    assert_eq!(app.send(req).await.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_wrong_method() {
    let app = helpers::TestApp::new();

    let response = app.request("GET", "/api/login", None, None).await;

    assert_eq!(response.status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_logout_revokes_session_and_clears_cookie() {
    let app = helpers::TestApp::new();
    let token = app.login("alice", "password").await;

    let response = app.request("POST", "/api/logout", None, Some(&token)).await;

    assert_eq!(response.status, StatusCode::OK);
    let cookie = response.session_cookie().expect("removal cookie");
    assert!(cookie.value().is_empty());
    assert!(cookie.max_age().is_some_and(|age| age.is_zero()));

    assert_eq!(app.session_store.active_sessions(), 0);

    let after = app.request("GET", "/api/files/", None, Some(&token)).await;
    assert_eq!(after.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_without_session_still_clears_cookie() {
    let app = helpers::TestApp::new();

    let response = app.request("POST", "/api/logout", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.session_cookie().is_some());
}

#[tokio::test]
async fn test_logout_wrong_method() {
    let app = helpers::TestApp::new();

    let response = app.request("GET", "/api/logout", None, None).await;

    assert_eq!(response.status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_login_throttle() {
    let mut config = AppConfig::default();
    config.auth.login_throttle.enabled = true;
    config.auth.login_throttle.burst = 1;
    config.auth.login_throttle.refill_per_second = 0.0;
    let app = helpers::TestApp::with_config(config);

    let body = serde_json::json!({ "username": "alice", "password": "wrong" });

    let first = app.request("POST", "/api/login", Some(body.clone()), None).await;
    assert_eq!(first.status, StatusCode::UNAUTHORIZED);

    let second = app.request("POST", "/api/login", Some(body), None).await;
    assert_eq!(second.status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(second.body["error"], "RATE_LIMITED");

    // Buckets are per username.
    app.login("bob", "password").await;
}

#[tokio::test]
async fn test_health_reports_sessions() {
    let app = helpers::TestApp::new();
    app.login("bob", "password").await;

    let response = app.request("GET", "/api/health", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["status"], "ok");
    assert_eq!(response.body["data"]["active_sessions"], 1);
}
