mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use chrono::{Duration, NaiveDate, Utc};
use common::{AuthHeaders, TestApp};
use serde_json::{json, Value};
use tower::ServiceExt;

async fn parse_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn days_from_now(days: i64) -> NaiveDate {
    Utc::now().date_naive() + Duration::days(days)
}

async fn setup_listing(app: &TestApp, host_email: &str) -> (String, AuthHeaders) {
    app.register(host_email, "supersecret", "Host", "HOST").await;
    let host = app.login(host_email, "supersecret").await;

    let res = app.router.clone().oneshot(
        Request::builder().method("POST").uri("/api/v1/properties")
            .header(header::COOKIE, format!("access_token={}", host.access_token))
            .header("X-CSRF-Token", &host.csrf_token)
            .header("Content-Type", "application/json")
            .body(Body::from(json!({
                "title": "Farm Stay", "description": ".", "location": "Tuscany",
                "timezone": "UTC", "nightly_price_cents": 9000, "max_guests": 5
            }).to_string())).unwrap()
    ).await.unwrap();
    let property_id = parse_body(res).await["id"].as_str().unwrap().to_string();
    (property_id, host)
}

#[tokio::test]
async fn test_upsert_is_one_row_per_date() {
    let app = TestApp::new().await;
    let (property_id, host) = setup_listing(&app, "ov1@example.com").await;
    let date = days_from_now(15);

    let res = app.router.clone().oneshot(
        Request::builder().method("POST").uri(format!("/api/v1/properties/{}/overrides", property_id))
            .header(header::COOKIE, format!("access_token={}", host.access_token))
            .header("X-CSRF-Token", &host.csrf_token)
            .header("Content-Type", "application/json")
            .body(Body::from(json!({
                "date": date.to_string(), "is_available": false, "price_cents": null
            }).to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(parse_body(res).await["is_available"], false);

    // Same date again: updates in place instead of inserting a second row
    let res = app.router.clone().oneshot(
        Request::builder().method("POST").uri(format!("/api/v1/properties/{}/overrides", property_id))
            .header(header::COOKIE, format!("access_token={}", host.access_token))
            .header("X-CSRF-Token", &host.csrf_token)
            .header("Content-Type", "application/json")
            .body(Body::from(json!({
                "date": date.to_string(), "is_available": true, "price_cents": 12000
            }).to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;
    assert_eq!(body["is_available"], true);
    assert_eq!(body["price_cents"], 12000);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM availability_overrides WHERE property_id = ?")
        .bind(&property_id)
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn test_list_overrides_by_range() {
    let app = TestApp::new().await;
    let (property_id, host) = setup_listing(&app, "ov2@example.com").await;

    for (offset, price) in [(10, 11000i64), (12, 12000), (40, 13000)] {
        let res = app.router.clone().oneshot(
            Request::builder().method("POST").uri(format!("/api/v1/properties/{}/overrides", property_id))
                .header(header::COOKIE, format!("access_token={}", host.access_token))
                .header("X-CSRF-Token", &host.csrf_token)
                .header("Content-Type", "application/json")
                .body(Body::from(json!({
                    "date": days_from_now(offset).to_string(),
                    "is_available": true,
                    "price_cents": price
                }).to_string())).unwrap()
        ).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    let uri = format!(
        "/api/v1/properties/{}/overrides?start_date={}&end_date={}",
        property_id, days_from_now(9), days_from_now(13)
    );
    let res = app.router.clone().oneshot(
        Request::builder().method("GET").uri(&uri)
            .header(header::COOKIE, format!("access_token={}", host.access_token))
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(parse_body(res).await.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_override_requires_host_side() {
    let app = TestApp::new().await;
    let (property_id, _) = setup_listing(&app, "ov3@example.com").await;
    app.register("ovg@example.com", "supersecret", "G", "GUEST").await;
    let guest = app.login("ovg@example.com", "supersecret").await;

    let res = app.router.clone().oneshot(
        Request::builder().method("POST").uri(format!("/api/v1/properties/{}/overrides", property_id))
            .header(header::COOKIE, format!("access_token={}", guest.access_token))
            .header("X-CSRF-Token", &guest.csrf_token)
            .header("Content-Type", "application/json")
            .body(Body::from(json!({
                "date": days_from_now(10).to_string(), "is_available": false
            }).to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = app.router.clone().oneshot(
        Request::builder().method("GET").uri(format!("/api/v1/properties/{}/overrides", property_id))
            .header(header::COOKIE, format!("access_token={}", guest.access_token))
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_delete_override() {
    let app = TestApp::new().await;
    let (property_id, host) = setup_listing(&app, "ov4@example.com").await;
    let date = days_from_now(18);

    app.router.clone().oneshot(
        Request::builder().method("POST").uri(format!("/api/v1/properties/{}/overrides", property_id))
            .header(header::COOKIE, format!("access_token={}", host.access_token))
            .header("X-CSRF-Token", &host.csrf_token)
            .header("Content-Type", "application/json")
            .body(Body::from(json!({
                "date": date.to_string(), "is_available": false
            }).to_string())).unwrap()
    ).await.unwrap();

    let res = app.router.clone().oneshot(
        Request::builder().method("DELETE").uri(format!("/api/v1/properties/{}/overrides/{}", property_id, date))
            .header(header::COOKIE, format!("access_token={}", host.access_token))
            .header("X-CSRF-Token", &host.csrf_token)
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    // Deleting again is a 404
    let res = app.router.clone().oneshot(
        Request::builder().method("DELETE").uri(format!("/api/v1/properties/{}/overrides/{}", property_id, date))
            .header(header::COOKIE, format!("access_token={}", host.access_token))
            .header("X-CSRF-Token", &host.csrf_token)
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_override_price_must_be_positive() {
    let app = TestApp::new().await;
    let (property_id, host) = setup_listing(&app, "ov5@example.com").await;

    let res = app.router.clone().oneshot(
        Request::builder().method("POST").uri(format!("/api/v1/properties/{}/overrides", property_id))
            .header(header::COOKIE, format!("access_token={}", host.access_token))
            .header("X-CSRF-Token", &host.csrf_token)
            .header("Content-Type", "application/json")
            .body(Body::from(json!({
                "date": days_from_now(10).to_string(), "is_available": true, "price_cents": -100
            }).to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}
