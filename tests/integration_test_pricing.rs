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
                "title": "Lake House", "description": "Calm", "location": "Annecy",
                "timezone": "UTC", "nightly_price_cents": 10000,
                "cleaning_fee_cents": 2000, "service_fee_cents": 1000,
                "max_guests": 6
            }).to_string())).unwrap()
    ).await.unwrap();
    let property_id = parse_body(res).await["id"].as_str().unwrap().to_string();

    app.router.clone().oneshot(
        Request::builder().method("PUT").uri(format!("/api/v1/properties/{}", property_id))
            .header(header::COOKIE, format!("access_token={}", host.access_token))
            .header("X-CSRF-Token", &host.csrf_token)
            .header("Content-Type", "application/json")
            .body(Body::from(json!({"is_published": true}).to_string())).unwrap()
    ).await.unwrap();

    (property_id, host)
}

async fn set_override(app: &TestApp, host: &AuthHeaders, property_id: &str, date: NaiveDate, is_available: bool, price_cents: Option<i64>) {
    let res = app.router.clone().oneshot(
        Request::builder().method("POST").uri(format!("/api/v1/properties/{}/overrides", property_id))
            .header(header::COOKIE, format!("access_token={}", host.access_token))
            .header("X-CSRF-Token", &host.csrf_token)
            .header("Content-Type", "application/json")
            .body(Body::from(json!({
                "date": date.to_string(),
                "is_available": is_available,
                "price_cents": price_cents
            }).to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

async fn book(app: &TestApp, auth: &AuthHeaders, property_id: &str, check_in: NaiveDate, check_out: NaiveDate) -> axum::response::Response {
    app.router.clone().oneshot(
        Request::builder().method("POST").uri(format!("/api/v1/properties/{}/bookings", property_id))
            .header(header::COOKIE, format!("access_token={}", auth.access_token))
            .header("X-CSRF-Token", &auth.csrf_token)
            .header("Content-Type", "application/json")
            .body(Body::from(json!({
                "check_in": check_in.to_string(),
                "check_out": check_out.to_string(),
                "guest_count": 2
            }).to_string())).unwrap()
    ).await.unwrap()
}

#[tokio::test]
async fn test_override_price_takes_precedence() {
    let app = TestApp::new().await;
    let (property_id, host) = setup_listing(&app, "p1@example.com").await;
    app.register("pg1@example.com", "supersecret", "G", "GUEST").await;
    let guest = app.login("pg1@example.com", "supersecret").await;

    // Middle night repriced: 100 + 150 + 100 = 350 nightly + 30 fees
    set_override(&app, &host, &property_id, days_from_now(31), true, Some(15000)).await;

    let res = book(&app, &guest, &property_id, days_from_now(30), days_from_now(33)).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    assert_eq!(parse_body(res).await["booking"]["total_cents"], 38000);
}

#[tokio::test]
async fn test_override_without_price_falls_back_to_base() {
    let app = TestApp::new().await;
    let (property_id, host) = setup_listing(&app, "p2@example.com").await;
    app.register("pg2@example.com", "supersecret", "G", "GUEST").await;
    let guest = app.login("pg2@example.com", "supersecret").await;

    // Availability-only override row: price stays at base
    set_override(&app, &host, &property_id, days_from_now(31), true, None).await;

    let res = book(&app, &guest, &property_id, days_from_now(30), days_from_now(33)).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    assert_eq!(parse_body(res).await["booking"]["total_cents"], 33000);
}

#[tokio::test]
async fn test_blocked_date_conflicts() {
    let app = TestApp::new().await;
    let (property_id, host) = setup_listing(&app, "p3@example.com").await;
    app.register("pg3@example.com", "supersecret", "G", "GUEST").await;
    let guest = app.login("pg3@example.com", "supersecret").await;

    set_override(&app, &host, &property_id, days_from_now(31), false, None).await;

    let res = book(&app, &guest, &property_id, days_from_now(30), days_from_now(33)).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);

    // A stay ending before the blocked date is fine
    let res = book(&app, &guest, &property_id, days_from_now(30), days_from_now(31)).await;
    assert_eq!(res.status(), StatusCode::CREATED);

    // The blocked date as checkout day is fine too (half-open range)
    let res = book(&app, &guest, &property_id, days_from_now(34), days_from_now(36)).await;
    assert_eq!(res.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_blocked_checkout_day_does_not_conflict() {
    let app = TestApp::new().await;
    let (property_id, host) = setup_listing(&app, "p4@example.com").await;
    app.register("pg4@example.com", "supersecret", "G", "GUEST").await;
    let guest = app.login("pg4@example.com", "supersecret").await;

    set_override(&app, &host, &property_id, days_from_now(33), false, None).await;

    // Checkout on the blocked date: no night spent there
    let res = book(&app, &guest, &property_id, days_from_now(30), days_from_now(33)).await;
    assert_eq!(res.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_calendar_projection() {
    let app = TestApp::new().await;
    let (property_id, host) = setup_listing(&app, "p5@example.com").await;
    app.register("pg5@example.com", "supersecret", "G", "GUEST").await;
    let guest = app.login("pg5@example.com", "supersecret").await;

    set_override(&app, &host, &property_id, days_from_now(31), true, Some(15000)).await;
    set_override(&app, &host, &property_id, days_from_now(34), false, None).await;

    let res = book(&app, &guest, &property_id, days_from_now(32), days_from_now(33)).await;
    let booking_id = parse_body(res).await["booking"]["id"].as_str().unwrap().to_string();

    let uri = format!(
        "/api/v1/properties/{}/availability?start_date={}&end_date={}",
        property_id, days_from_now(30), days_from_now(34)
    );
    let res = app.router.clone().oneshot(
        Request::builder().method("GET").uri(&uri).body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body = parse_body(res).await;
    let days = body["days"].as_array().unwrap();
    assert_eq!(days.len(), 5);

    // Plain day
    assert_eq!(days[0]["is_available"], true);
    assert_eq!(days[0]["price_cents"], 10000);
    assert_eq!(days[0]["is_booked"], false);
    assert!(days[0]["booking_id"].is_null());

    // Repriced day
    assert_eq!(days[1]["price_cents"], 15000);
    assert_eq!(days[1]["is_available"], true);

    // Booked day
    assert_eq!(days[2]["is_booked"], true);
    assert_eq!(days[2]["is_available"], false);
    assert_eq!(days[2]["booking_id"], booking_id.as_str());

    // Checkout day of that booking is free again
    assert_eq!(days[3]["is_booked"], false);

    // Host-blocked day
    assert_eq!(days[4]["is_available"], false);
    assert_eq!(days[4]["is_booked"], false);
}

#[tokio::test]
async fn test_calendar_is_deterministic() {
    let app = TestApp::new().await;
    let (property_id, host) = setup_listing(&app, "p6@example.com").await;

    set_override(&app, &host, &property_id, days_from_now(31), true, Some(12500)).await;

    let uri = format!(
        "/api/v1/properties/{}/availability?start_date={}&end_date={}",
        property_id, days_from_now(30), days_from_now(35)
    );

    let first = parse_body(app.router.clone().oneshot(
        Request::builder().method("GET").uri(&uri).body(Body::empty()).unwrap()
    ).await.unwrap()).await;
    let second = parse_body(app.router.clone().oneshot(
        Request::builder().method("GET").uri(&uri).body(Body::empty()).unwrap()
    ).await.unwrap()).await;

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_calendar_validation() {
    let app = TestApp::new().await;
    let (property_id, _) = setup_listing(&app, "p7@example.com").await;

    // end before start
    let uri = format!(
        "/api/v1/properties/{}/availability?start_date={}&end_date={}",
        property_id, days_from_now(35), days_from_now(30)
    );
    let res = app.router.clone().oneshot(
        Request::builder().method("GET").uri(&uri).body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // missing params
    let uri = format!("/api/v1/properties/{}/availability", property_id);
    let res = app.router.clone().oneshot(
        Request::builder().method("GET").uri(&uri).body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}
