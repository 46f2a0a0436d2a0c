use std::sync::Arc;

use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, app_with_state, Backend, Db};
use serde_json::Value;
use tokio::sync::RwLock;
use tower::ServiceExt;

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn request(method: &str, uri: &str, token: Option<&str>, body: Option<&str>) -> Request<String> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(http::header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(body.unwrap_or_default().to_string()).unwrap()
}

fn seeded() -> Db {
    Arc::new(RwLock::new(Backend::seeded()))
}

async fn login(db: &Db, audience: &str, body: &str) -> String {
    let resp = app_with_state(db.clone())
        .oneshot(request("POST", &format!("/api/mobile/{audience}/login"), None, Some(body)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    body_json(resp).await["token"].as_str().unwrap().to_string()
}

async fn driver_token(db: &Db) -> String {
    login(db, "driver", r#"{"email":"rui@atlantic.pt","password":"password123"}"#).await
}

async fn customer_token(db: &Db) -> String {
    login(db, "customer", r#"{"email":"ana@example.pt","password":"password123"}"#).await
}

// --- auth ---

#[tokio::test]
async fn driver_login_returns_profile_and_token() {
    let resp = app()
        .oneshot(request(
            "POST",
            "/api/mobile/driver/login",
            None,
            Some(r#"{"email":"rui@atlantic.pt","password":"password123"}"#),
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(json["driver"]["name"], "Rui Costa");
    assert!(json["driver"].get("password").is_none());
    assert!(!json["token"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn wrong_password_is_401_with_message() {
    let resp = app()
        .oneshot(request(
            "POST",
            "/api/mobile/driver/login",
            None,
            Some(r#"{"email":"rui@atlantic.pt","password":"nope"}"#),
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(resp).await["error"], "Invalid credentials");
}

#[tokio::test]
async fn missing_token_is_unauthorized() {
    let resp = app()
        .oneshot(request("GET", "/api/mobile/driver/rides", None, None))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(resp).await, serde_json::json!({"error": "Unauthorized"}));
}

#[tokio::test]
async fn unknown_token_is_unauthorized() {
    let resp = app()
        .oneshot(request("GET", "/api/mobile/driver/rides", Some("forged"), None))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn customer_token_cannot_read_driver_rides() {
    let db = seeded();
    let token = customer_token(&db).await;
    let resp = app_with_state(db)
        .oneshot(request("GET", "/api/mobile/driver/rides", Some(&token), None))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// --- driver rides ---

#[tokio::test]
async fn rides_filter_by_day() {
    let db = seeded();
    let token = driver_token(&db).await;

    let resp = app_with_state(db.clone())
        .oneshot(request("GET", "/api/mobile/driver/rides?filter=today", Some(&token), None))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let today = body_json(resp).await;
    let rides = today["rides"].as_array().unwrap();
    assert_eq!(rides.len(), 1);
    assert_eq!(rides[0]["bookingCode"], "ATP-1001");

    let resp = app_with_state(db)
        .oneshot(request("GET", "/api/mobile/driver/rides?filter=past", Some(&token), None))
        .await
        .unwrap();
    let past = body_json(resp).await;
    assert_eq!(past["rides"][0]["status"], "COMPLETED");
}

#[tokio::test]
async fn ride_actions_walk_the_lifecycle() {
    let db = seeded();
    let token = driver_token(&db).await;

    for (action, expected) in [
        ("ON_THE_WAY", "ON_THE_WAY"),
        ("ARRIVED", "ARRIVED"),
        ("START_RIDE", "IN_PROGRESS"),
        ("COMPLETE", "COMPLETED"),
    ] {
        let body = format!(r#"{{"status":"{action}"}}"#);
        let resp = app_with_state(db.clone())
            .oneshot(request("PATCH", "/api/mobile/driver/rides/1", Some(&token), Some(&body)))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK, "{action}");
        let json = body_json(resp).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["status"], expected);
    }

    let resp = app_with_state(db)
        .oneshot(request(
            "PATCH",
            "/api/mobile/driver/rides/1",
            Some(&token),
            Some(r#"{"status":"ARRIVED"}"#),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn reject_unassigns_the_driver() {
    let db = seeded();
    let token = driver_token(&db).await;
    let resp = app_with_state(db.clone())
        .oneshot(request(
            "PATCH",
            "/api/mobile/driver/rides/2",
            Some(&token),
            Some(r#"{"status":"REJECT"}"#),
        ))
        .await
        .unwrap();
    assert_eq!(body_json(resp).await["status"], "CONFIRMED");

    let backend = db.read().await;
    let ride = backend.bookings.iter().find(|b| b.id == 2).unwrap();
    assert_eq!(ride.status, "CONFIRMED");
    assert!(ride.driver_id.is_none());
}

#[tokio::test]
async fn unknown_action_is_rejected() {
    let db = seeded();
    let token = driver_token(&db).await;
    let resp = app_with_state(db)
        .oneshot(request(
            "PATCH",
            "/api/mobile/driver/rides/1",
            Some(&token),
            Some(r#"{"status":"TELEPORT"}"#),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(resp).await["error"], "Invalid status");
}

// --- location ---

#[tokio::test]
async fn location_reports_are_recorded_and_tracked() {
    let db = seeded();
    let token = driver_token(&db).await;
    let resp = app_with_state(db.clone())
        .oneshot(request(
            "POST",
            "/api/mobile/driver/location",
            Some(&token),
            Some(r#"{"latitude":38.76,"longitude":-9.13,"heading":90.0}"#),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(db.read().await.locations.len(), 1);

    let resp = app_with_state(db.clone())
        .oneshot(request("GET", "/api/mobile/tracking/ATP-1001", None, None))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(json["booking"]["status"], "DRIVER_ASSIGNED");
    assert_eq!(json["driverLocation"]["latitude"], 38.76);

    let resp = app_with_state(db)
        .oneshot(request("GET", "/api/mobile/driver/location", Some(&token), None))
        .await
        .unwrap();
    assert_eq!(body_json(resp).await["heading"], 90.0);
}

#[tokio::test]
async fn tracking_unknown_code_is_404() {
    let resp = app()
        .oneshot(request("GET", "/api/mobile/tracking/NOPE", None, None))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(resp).await["error"], "Booking not found");
}

// --- earnings ---

#[tokio::test]
async fn transactions_are_paged() {
    let db = seeded();
    let token = driver_token(&db).await;
    let resp = app_with_state(db.clone())
        .oneshot(request("GET", "/api/mobile/driver/earnings/transactions", Some(&token), None))
        .await
        .unwrap();
    let first = body_json(resp).await;
    assert_eq!(first["transactions"].as_array().unwrap().len(), 20);
    assert_eq!(first["hasMore"], true);

    let resp = app_with_state(db)
        .oneshot(request(
            "GET",
            "/api/mobile/driver/earnings/transactions?page=2",
            Some(&token),
            None,
        ))
        .await
        .unwrap();
    let second = body_json(resp).await;
    assert_eq!(second["transactions"].as_array().unwrap().len(), 5);
    assert_eq!(second["hasMore"], false);
}

// --- customer ---

#[tokio::test]
async fn customer_bookings_split_upcoming_and_past() {
    let db = seeded();
    let token = customer_token(&db).await;
    let resp = app_with_state(db.clone())
        .oneshot(request("GET", "/api/mobile/customer/bookings?type=upcoming", Some(&token), None))
        .await
        .unwrap();
    let upcoming = body_json(resp).await;
    assert_eq!(upcoming["bookings"].as_array().unwrap().len(), 3);
    assert_eq!(upcoming["page"], 1);

    let resp = app_with_state(db)
        .oneshot(request("GET", "/api/mobile/customer/bookings?type=past", Some(&token), None))
        .await
        .unwrap();
    let past = body_json(resp).await;
    assert_eq!(past["bookings"][0]["publicCode"], "ATP-1003");
}

#[tokio::test]
async fn cancel_then_cancel_again() {
    let db = seeded();
    let token = customer_token(&db).await;
    let resp = app_with_state(db.clone())
        .oneshot(request(
            "POST",
            "/api/mobile/customer/bookings/ATP-1004/cancel",
            Some(&token),
            Some(r#"{"reason":"Plans changed"}"#),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["message"], "Booking cancelled");

    let resp = app_with_state(db)
        .oneshot(request(
            "POST",
            "/api/mobile/customer/bookings/ATP-1004/cancel",
            Some(&token),
            Some("{}"),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn search_filters_by_capacity() {
    let db = seeded();
    let token = customer_token(&db).await;
    let body = r#"{"pickupType":"airport","dropoffType":"address","pickupAirportCode":"LIS","dropoffAddress":"Rossio","pickupDate":"2026-10-20","pickupTime":"12:00","passengers":5}"#;
    let resp = app_with_state(db)
        .oneshot(request("POST", "/api/mobile/customer/search", Some(&token), Some(body)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let results = body_json(resp).await;
    let results = results.as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["vehicleType"], "VAN");
}

#[tokio::test]
async fn register_rejects_duplicate_email() {
    let resp = app()
        .oneshot(request(
            "POST",
            "/api/mobile/customer/register",
            None,
            Some(r#"{"email":"ana@example.pt","password":"password123","fullName":"Ana"}"#),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

// --- partner ---

#[tokio::test]
async fn supplier_assigns_a_fleet_driver() {
    let db = seeded();
    let token = login(
        &db,
        "partner",
        r#"{"email":"ops@atlantic.pt","password":"password123","type":"supplier"}"#,
    )
    .await;

    let resp = app_with_state(db.clone())
        .oneshot(request(
            "PATCH",
            "/api/mobile/partner/bookings/4",
            Some(&token),
            Some(r#"{"driverId":5}"#),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let backend = db.read().await;
    let booking = backend.bookings.iter().find(|b| b.id == 4).unwrap();
    assert_eq!(booking.driver_id, Some(5));
    assert_eq!(booking.status, "DRIVER_ASSIGNED");
}

#[tokio::test]
async fn affiliate_cannot_manage_fleet() {
    let db = seeded();
    let token = login(
        &db,
        "partner",
        r#"{"email":"partners@lisbonhotels.pt","password":"password123","type":"affiliate"}"#,
    )
    .await;
    let resp = app_with_state(db)
        .oneshot(request("GET", "/api/mobile/partner/drivers", Some(&token), None))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// --- common ---

#[tokio::test]
async fn airport_search_matches_city() {
    let resp = app()
        .oneshot(request("GET", "/api/mobile/airports?search=porto", None, None))
        .await
        .unwrap();
    let airports = body_json(resp).await;
    assert_eq!(airports.as_array().unwrap().len(), 1);
    assert_eq!(airports[0]["code"], "OPO");
}

#[tokio::test]
async fn malformed_json_is_rejected() {
    let db = seeded();
    let token = driver_token(&db).await;
    let resp = app_with_state(db)
        .oneshot(request("POST", "/api/mobile/driver/location", Some(&token), Some("{\"lat\":1}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(!body_bytes(resp).await.is_empty());
}
