//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode, header};
use axum_extra::extract::cookie::Cookie;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use dirview_api::{AppState, SESSION_COOKIE, build_app};
use dirview_auth::{SessionStore, StaticUserDirectory};
use dirview_core::config::AppConfig;
use dirview_storage::SecurePathResolver;

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Session store behind the router
    pub session_store: Arc<SessionStore>,
    /// Served directory, removed on drop
    pub root: TempDir,
}

impl TestApp {
    /// Create a test application with default configuration
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    /// Create a test application serving a seeded temp directory:
    /// `test.txt` (12 bytes) and `testdir/nested.txt`.
    pub fn with_config(mut config: AppConfig) -> Self {
        let root = tempfile::tempdir().expect("Failed to create temp dir");
        std::fs::write(root.path().join("test.txt"), b"test content")
            .expect("Failed to seed test.txt");
        std::fs::create_dir(root.path().join("testdir")).expect("Failed to seed testdir");
        std::fs::write(root.path().join("testdir").join("nested.txt"), b"nested")
            .expect("Failed to seed nested.txt");

        config.storage.root_dir = root.path().to_string_lossy().into_owned();

        let resolver = SecurePathResolver::new(root.path()).expect("Failed to build resolver");
        let session_store = Arc::new(SessionStore::new(
            Arc::new(StaticUserDirectory::builtin()),
            &config.session,
        ));

        let router = build_app(AppState::new(
            config,
            Arc::clone(&session_store),
            resolver,
        ));

        Self {
            router,
            session_store,
            root,
        }
    }

    /// Login and return the session token from the cookie
    pub async fn login(&self, username: &str, password: &str) -> String {
        let body = serde_json::json!({
            "username": username,
            "password": password,
        });

        let response = self.request("POST", "/api/login", Some(body), None).await;

        assert_eq!(
            response.status,
            StatusCode::OK,
            "Login failed: {:?}",
            response.body
        );

        response
            .session_cookie()
            .map(|c| c.value().to_string())
            .expect("No session cookie in login response")
    }

    /// Make a JSON request, optionally carrying a session cookie
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        session: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header(header::CONTENT_TYPE, "application/json");

        if let Some(token) = session {
            req = req.header(header::COOKIE, format!("{SESSION_COOKIE}={token}"));
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        self.send(req).await
    }

    /// Send a prebuilt request
    pub async fn send(&self, req: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            body,
        }
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Parsed JSON body
    pub body: Value,
}

impl TestResponse {
    /// The `session` cookie set by this response, if any
    pub fn session_cookie(&self) -> Option<Cookie<'static>> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .filter_map(|v| Cookie::parse(v.to_string()).ok())
            .find(|c| c.name() == SESSION_COOKIE)
    }

    /// Names of the entries in a listing response
    pub fn listing_names(&self) -> Vec<String> {
        self.body["data"]["contents"]
            .as_array()
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(|e| e["name"].as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }
}
