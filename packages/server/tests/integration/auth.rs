use crate::common::{TestApp, routes};
use arena_server::utils::jwt;

#[tokio::test]
async fn missing_token_is_rejected() {
    let app = TestApp::spawn().await;

    let res = app.get_raw(routes::STATUS, None).await;

    assert_eq!(res.status, 401);
    assert_eq!(res.body["code"], "TOKEN_MISSING");
}

#[tokio::test]
async fn non_bearer_scheme_is_rejected() {
    let app = TestApp::spawn().await;

    let res = app.get_raw(routes::STATUS, Some("Basic dXNlcjpwYXNz")).await;

    assert_eq!(res.status, 401);
    assert_eq!(res.body["code"], "TOKEN_INVALID");
}

#[tokio::test]
async fn garbage_token_is_rejected() {
    let app = TestApp::spawn().await;

    let res = app.get_raw(routes::STATUS, Some("Bearer not.a.jwt")).await;

    assert_eq!(res.status, 401);
    assert_eq!(res.body["code"], "TOKEN_INVALID");
}

#[tokio::test]
async fn token_from_another_issuer_is_rejected() {
    let app = TestApp::spawn().await;
    let token = jwt::sign("some-other-secret", 1, "user1", "player", chrono::Duration::hours(1))
        .unwrap();

    let res = app
        .post_without_token(routes::JOIN, &serde_json::json!({}))
        .await;
    assert_eq!(res.status, 401);

    let res = app.get_with_token(routes::STATUS, &token).await;
    assert_eq!(res.status, 401);
    assert_eq!(res.body["code"], "TOKEN_INVALID");
}

#[tokio::test]
async fn openapi_document_lists_the_routes() {
    let app = TestApp::spawn().await;

    let res = app.get_raw("/api-docs/openapi.json", None).await;

    assert_eq!(res.status, 200);
    let paths = res.body["paths"].as_object().unwrap();
    for path in [
        "/api/v1/queue/join",
        "/api/v1/queue/status",
        "/api/v1/battles/{id}",
        "/api/v1/submissions",
        "/api/v1/run",
    ] {
        assert!(paths.contains_key(path), "missing {path}");
    }
}
