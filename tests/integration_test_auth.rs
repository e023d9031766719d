mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use common::TestApp;
use serde_json::{json, Value};
use tower::ServiceExt;

async fn parse_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_register_and_login() {
    let app = TestApp::new().await;

    let res = app.router.clone().oneshot(
        Request::builder().method("POST").uri("/api/v1/auth/register")
            .header("Content-Type", "application/json")
            .body(Body::from(json!({
                "email": "alice@example.com",
                "password": "supersecret",
                "display_name": "Alice",
                "role": "GUEST"
            }).to_string())).unwrap()
    ).await.unwrap();

    assert_eq!(res.status(), StatusCode::CREATED);
    let body = parse_body(res).await;
    assert_eq!(body["email"], "alice@example.com");
    assert_eq!(body["role"], "GUEST");
    assert!(body.get("password_hash").is_none(), "hash must never be serialized");

    let auth = app.login("alice@example.com", "supersecret").await;
    assert!(!auth.access_token.is_empty());
    assert!(!auth.csrf_token.is_empty());
}

#[tokio::test]
async fn test_register_duplicate_email_conflicts() {
    let app = TestApp::new().await;
    app.register("bob@example.com", "supersecret", "Bob", "GUEST").await;

    let res = app.router.clone().oneshot(
        Request::builder().method("POST").uri("/api/v1/auth/register")
            .header("Content-Type", "application/json")
            .body(Body::from(json!({
                "email": "bob@example.com",
                "password": "supersecret",
                "display_name": "Bob Again",
                "role": "GUEST"
            }).to_string())).unwrap()
    ).await.unwrap();

    assert_eq!(res.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_register_rejects_admin_role_and_short_password() {
    let app = TestApp::new().await;

    let res = app.router.clone().oneshot(
        Request::builder().method("POST").uri("/api/v1/auth/register")
            .header("Content-Type", "application/json")
            .body(Body::from(json!({
                "email": "mallory@example.com",
                "password": "supersecret",
                "display_name": "Mallory",
                "role": "ADMIN"
            }).to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = app.router.clone().oneshot(
        Request::builder().method("POST").uri("/api/v1/auth/register")
            .header("Content-Type", "application/json")
            .body(Body::from(json!({
                "email": "short@example.com",
                "password": "short",
                "display_name": "Shorty"
            }).to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_wrong_password_unauthorized() {
    let app = TestApp::new().await;
    app.register("carol@example.com", "supersecret", "Carol", "GUEST").await;

    let res = app.router.clone().oneshot(
        Request::builder().method("POST").uri("/api/v1/auth/login")
            .header("Content-Type", "application/json")
            .body(Body::from(json!({
                "email": "carol@example.com",
                "password": "wrongwrong"
            }).to_string())).unwrap()
    ).await.unwrap();

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_protected_route_requires_cookie() {
    let app = TestApp::new().await;

    let res = app.router.clone().oneshot(
        Request::builder().method("GET").uri("/api/v1/my/bookings")
            .body(Body::empty()).unwrap()
    ).await.unwrap();

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_mutating_request_requires_csrf_header() {
    let app = TestApp::new().await;
    app.register("dave@example.com", "supersecret", "Dave", "HOST").await;
    let auth = app.login("dave@example.com", "supersecret").await;

    // Cookie present, CSRF header missing
    let res = app.router.clone().oneshot(
        Request::builder().method("POST").uri("/api/v1/properties")
            .header(header::COOKIE, format!("access_token={}", auth.access_token))
            .header("Content-Type", "application/json")
            .body(Body::from(json!({
                "title": "Cabin", "description": ".", "location": "Alps",
                "timezone": "UTC", "nightly_price_cents": 10000, "max_guests": 2
            }).to_string())).unwrap()
    ).await.unwrap();

    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_refresh_rotates_token() {
    let app = TestApp::new().await;
    app.register("erin@example.com", "supersecret", "Erin", "GUEST").await;

    let login_res = app.router.clone().oneshot(
        Request::builder().method("POST").uri("/api/v1/auth/login")
            .header("Content-Type", "application/json")
            .body(Body::from(json!({
                "email": "erin@example.com",
                "password": "supersecret"
            }).to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(login_res.status(), StatusCode::OK);

    let refresh_cookie = login_res.headers().get_all(header::SET_COOKIE).iter()
        .map(|h| h.to_str().unwrap().to_string())
        .find(|c| c.contains("refresh_token="))
        .expect("No refresh_token cookie");
    let start = refresh_cookie.find("refresh_token=").unwrap() + 14;
    let end = refresh_cookie[start..].find(';').unwrap_or(refresh_cookie.len() - start);
    let raw_refresh = refresh_cookie[start..start+end].to_string();

    let res = app.router.clone().oneshot(
        Request::builder().method("POST").uri("/api/v1/auth/refresh")
            .header(header::COOKIE, format!("refresh_token={}", raw_refresh))
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    // Rotation: the old refresh token is burned
    let res = app.router.clone().oneshot(
        Request::builder().method("POST").uri("/api/v1/auth/refresh")
            .header(header::COOKIE, format!("refresh_token={}", raw_refresh))
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}
