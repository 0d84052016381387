//! Integration tests for the directory listing endpoint.

mod helpers;

use axum::http::StatusCode;

#[tokio::test]
async fn test_files_require_session() {
    let app = helpers::TestApp::new();

    let missing = app.request("GET", "/api/files/", None, None).await;
    assert_eq!(missing.status, StatusCode::UNAUTHORIZED);

    let invalid = app
        .request("GET", "/api/files/", None, Some("invalid-token"))
        .await;
    assert_eq!(invalid.status, StatusCode::UNAUTHORIZED);
    assert_eq!(invalid.body, missing.body);
}

#[tokio::test]
async fn test_root_listing() {
    let app = helpers::TestApp::new();
    let token = app.login("alice", "password").await;

    for path in ["/api/files", "/api/files/"] {
        let response = app.request("GET", path, None, Some(&token)).await;

        assert_eq!(response.status, StatusCode::OK, "{path}");
        assert_eq!(response.body["success"], true);
        assert_eq!(response.body["data"]["type"], "directory");
        assert_eq!(response.body["data"]["size"], 0);
        assert_eq!(response.listing_names(), vec!["test.txt", "testdir"]);
    }
}

#[tokio::test]
async fn test_subdirectory_and_file() {
    let app = helpers::TestApp::new();
    let token = app.login("alice", "password").await;

    let dir = app
        .request("GET", "/api/files/testdir", None, Some(&token))
        .await;
    assert_eq!(dir.status, StatusCode::OK);
    assert_eq!(dir.body["data"]["name"], "testdir");
    assert_eq!(dir.listing_names(), vec!["nested.txt"]);

    let file = app
        .request("GET", "/api/files/test.txt", None, Some(&token))
        .await;
    assert_eq!(file.status, StatusCode::OK);
    assert_eq!(file.body["data"]["type"], "file");
    assert_eq!(file.body["data"]["size"], 12);
    assert!(file.body["data"].get("contents").is_none());
}

#[tokio::test]
async fn test_missing_path() {
    let app = helpers::TestApp::new();
    let token = app.login("alice", "password").await;

    let response = app
        .request("GET", "/api/files/nonexistent", None, Some(&token))
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["error"], "NOT_FOUND");
}

#[tokio::test]
async fn test_rejected_paths() {
    let app = helpers::TestApp::new();
    let token = app.login("alice", "password").await;

    for path in [
        "/api/files/test%20file",
        "/api/files/%24HOME",
        "/api/files/../../etc/passwd",
        "/api/files/testdir/../../..",
        "/api/files/%2E%2E/%2E%2E/etc",
    ] {
        let response = app.request("GET", path, None, Some(&token)).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{path}");
        assert_eq!(response.body["error"], "VALIDATION_ERROR");
    }
}

#[tokio::test]
async fn test_files_wrong_method() {
    let app = helpers::TestApp::new();
    let token = app.login("alice", "password").await;

    let response = app
        .request("POST", "/api/files/", None, Some(&token))
        .await;

    assert_eq!(response.status, StatusCode::METHOD_NOT_ALLOWED);
}

#[cfg(unix)]
#[tokio::test]
async fn test_symlink_out_of_root() {
    let app = helpers::TestApp::new();
    let token = app.login("alice", "password").await;

    let outside = tempfile::tempdir().unwrap();
    std::fs::write(outside.path().join("secret.txt"), b"secret").unwrap();
    std::os::unix::fs::symlink(outside.path(), app.root.path().join("escape")).unwrap();

    let response = app
        .request("GET", "/api/files/escape", None, Some(&token))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    let message = response.body["message"].as_str().unwrap_or_default();
    assert!(!message.contains(&*outside.path().to_string_lossy()));

    let existing = app
        .request("GET", "/api/files/escape/secret.txt", None, Some(&token))
        .await;
    let missing = app
        .request("GET", "/api/files/escape/missing.txt", None, Some(&token))
        .await;
    assert_eq!(existing.status, StatusCode::BAD_REQUEST);
    assert_eq!(missing.status, StatusCode::BAD_REQUEST);
    assert_eq!(missing.body, existing.body);
}
