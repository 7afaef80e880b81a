mod common;

use axum::http::StatusCode;
use common::{TestApp, STAFF_EMAIL};
use serde_json::{json, Value};
use std::sync::atomic::Ordering;

async fn create_room_via_api(app: &TestApp, name: &str) -> i64 {
    let staff = app.staff().await;

    let (status, room_type) = app.send("POST", "/api/v1/room-types", Some(&staff), Some(json!({
        "name": format!("{} type", name), "price": "100.00"
    }))).await;
    assert_eq!(status, StatusCode::CREATED, "{}", room_type);

    let (_, room_level) = app.send("POST", "/api/v1/room-levels", Some(&staff), Some(json!({
        "name": format!("{} level", name), "price": "50.00"
    }))).await;
    let (_, floor) = app.send("POST", "/api/v1/floors", Some(&staff), Some(json!({
        "name": format!("{} floor", name)
    }))).await;

    let (status, room) = app.send("POST", "/api/v1/rooms", Some(&staff), Some(json!({
        "name": name,
        "room_type_id": room_type["id"],
        "room_level_id": room_level["id"],
        "floor_id": floor["id"]
    }))).await;
    assert_eq!(status, StatusCode::CREATED, "{}", room);
    assert_eq!(room["status"], "available");
    room["id"].as_i64().unwrap()
}

fn stay(room_id: i64, check_in: &str, check_out: &str) -> Value {
    json!({ "room_id": room_id, "check_in": check_in, "check_out": check_out })
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new().await;
    let (status, _) = app.send("GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_register_login_and_me() {
    let app = TestApp::new().await;
    let (user_id, guest) = app.register_guest("Alice@Example.com").await;

    let (status, me) = app.send("GET", "/api/v1/auth/me", Some(&guest), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["id"], user_id);
    assert_eq!(me["email"], "alice@example.com");
    assert_eq!(me["role"], "guest");

    let (status, _) = app.send("POST", "/api/v1/auth/register", None, Some(json!({
        "email": "alice@example.com", "full_name": "Again", "password": "another-password"
    }))).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app.send("POST", "/api/v1/auth/login", None, Some(json!({
        "email": "alice@example.com", "password": "wrong-password"
    }))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.send("POST", "/api/v1/auth/login", None, Some(json!({
        "email": "nobody@example.com", "password": "whatever-password"
    }))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_registration_reports_every_invalid_field() {
    let app = TestApp::new().await;
    let (status, body) = app.send("POST", "/api/v1/auth/register", None, Some(json!({
        "email": "not-an-email", "full_name": "", "password": "short"
    }))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let errors: Vec<&str> = body["errors"].as_array().unwrap().iter().map(|e| e.as_str().unwrap()).collect();
    assert_eq!(errors, vec![
        "email: must be a valid email address",
        "full_name: must be between 1 and 120 characters",
        "password: must be at least 8 characters",
    ]);
}

#[tokio::test]
async fn test_authentication_and_csrf_are_enforced() {
    let app = TestApp::new().await;
    let room_id = create_room_via_api(&app, "101").await;
    let (_, guest) = app.register_guest("bob@example.com").await;

    let (status, _) = app.send("GET", "/api/v1/bookings", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let forged = common::AuthHeaders { access_token: guest.access_token.clone(), csrf_token: "forged".into() };
    let (status, _) = app.send("POST", "/api/v1/bookings", Some(&forged), Some(stay(room_id, "2024-06-10", "2024-06-12"))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Reads do not need the CSRF header.
    let (status, _) = app.send("GET", "/api/v1/bookings", Some(&forged), None).await;
    assert_eq!(status, StatusCode::OK);

    let tampered = common::AuthHeaders { access_token: format!("{}x", guest.access_token), csrf_token: guest.csrf_token.clone() };
    let (status, _) = app.send("GET", "/api/v1/auth/me", Some(&tampered), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_guests_cannot_use_staff_routes() {
    let app = TestApp::new().await;
    let (guest_id, guest) = app.register_guest("carol@example.com").await;

    let (status, _) = app.send("POST", "/api/v1/room-types", Some(&guest), Some(json!({ "name": "Suite", "price": "10.00" }))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.send("POST", "/api/v1/admin/sweep", Some(&guest), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.send("POST", "/api/v1/staff/bookings", Some(&guest), Some(json!({
        "user_id": guest_id, "room_id": 1, "check_in": "2024-06-10", "check_out": "2024-06-11"
    }))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_guest_booking_flow() {
    let app = TestApp::new().await;
    let room_id = create_room_via_api(&app, "201").await;
    let (guest_id, guest) = app.register_guest("dave@example.com").await;

    let (status, created) = app.send("POST", "/api/v1/bookings", Some(&guest), Some(stay(room_id, "2024-06-10", "2024-06-13"))).await;
    assert_eq!(status, StatusCode::CREATED, "{}", created);
    assert_eq!(created["total_price"], "450.00");
    assert_eq!(created["nights"], 3);
    assert_eq!(created["status"], "booked");
    let booking_id = created["booking_id"].as_i64().unwrap();

    let (status, clash) = app.send("POST", "/api/v1/bookings", Some(&guest), Some(stay(room_id, "2024-06-12", "2024-06-14"))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(clash["code"], "room_unavailable");

    let (status, booking) = app.send("GET", &format!("/api/v1/bookings/{}", booking_id), Some(&guest), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(booking["user_id"], guest_id);
    assert_eq!(booking["details"][0]["room_id"], room_id);
    assert_eq!(booking["details"][0]["unit_price"], "150.00");
    assert_eq!(booking["details"][0]["check_in_at"], "2024-06-10T14:00:00Z");

    let (_, mine) = app.send("GET", "/api/v1/bookings", Some(&guest), None).await;
    assert_eq!(mine.as_array().unwrap().len(), 1);

    let mail = app.mailer.wait_for(1).await;
    assert_eq!(mail.len(), 1);
    assert_eq!(mail[0].recipient, "dave@example.com");
    assert!(mail[0].body.contains("450.00"));

    let (status, cancelled) = app.send("POST", &format!("/api/v1/bookings/{}/cancel", booking_id), Some(&guest), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cancelled["status"], "cancelled");
    let mail = app.mailer.wait_for(2).await;
    assert!(mail[1].subject.contains("cancelled"));

    let (status, _) = app.send("POST", &format!("/api/v1/bookings/{}/cancel", booking_id), Some(&guest), None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    // The freed window can be booked again.
    let (status, _) = app.send("POST", "/api/v1/bookings", Some(&guest), Some(stay(room_id, "2024-06-12", "2024-06-14"))).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_invalid_stays_are_rejected() {
    let app = TestApp::new().await;
    let room_id = create_room_via_api(&app, "202").await;
    let (_, guest) = app.register_guest("erin@example.com").await;

    let (status, body) = app.send("POST", "/api/v1/bookings", Some(&guest), Some(stay(room_id, "2024-06-13", "2024-06-13"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0], "check_out must be after check_in");

    let (status, _) = app.send("POST", "/api/v1/bookings", Some(&guest), Some(stay(room_id, "2024-05-20", "2024-05-22"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.send("POST", "/api/v1/bookings", Some(&guest), Some(stay(9_999, "2024-06-10", "2024-06-12"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_other_guests_bookings_are_invisible() {
    let app = TestApp::new().await;
    let room_id = create_room_via_api(&app, "203").await;
    let (_, owner) = app.register_guest("frank@example.com").await;
    let (_, stranger) = app.register_guest("grace@example.com").await;

    let (_, created) = app.send("POST", "/api/v1/bookings", Some(&owner), Some(stay(room_id, "2024-06-10", "2024-06-12"))).await;
    let booking_id = created["booking_id"].as_i64().unwrap();

    for (method, uri) in [
        ("GET", format!("/api/v1/bookings/{}", booking_id)),
        ("POST", format!("/api/v1/bookings/{}/cancel", booking_id)),
        ("GET", format!("/api/v1/bookings/{}/payment", booking_id)),
    ] {
        let (status, _) = app.send(method, &uri, Some(&stranger), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{} {}", method, uri);
    }

    let (_, theirs) = app.send("GET", "/api/v1/bookings", Some(&stranger), None).await;
    assert!(theirs.as_array().unwrap().is_empty());

    // Staff see everything.
    let staff = app.staff().await;
    let (status, _) = app.send("GET", &format!("/api/v1/bookings/{}", booking_id), Some(&staff), None).await;
    assert_eq!(status, StatusCode::OK);
    let (_, all) = app.send("GET", "/api/v1/bookings", Some(&staff), None).await;
    assert_eq!(all.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_payment_flow() {
    let app = TestApp::new().await;
    let room_id = create_room_via_api(&app, "204").await;
    let (_, guest) = app.register_guest("heidi@example.com").await;

    let (_, created) = app.send("POST", "/api/v1/bookings", Some(&guest), Some(stay(room_id, "2024-06-10", "2024-06-12"))).await;
    let booking_id = created["booking_id"].as_i64().unwrap();
    let payment_uri = format!("/api/v1/bookings/{}/payment", booking_id);

    let (status, _) = app.send("GET", &payment_uri, Some(&guest), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app.send("POST", &payment_uri, Some(&guest), Some(json!({
        "card_holder": "Heidi", "card_number": "4111-1111", "method": "card"
    }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"].as_array().unwrap().len(), 2);

    let (status, payment) = app.send("POST", &payment_uri, Some(&guest), Some(json!({
        "card_holder": "Heidi", "card_number": "4111111111111111", "method": "card"
    }))).await;
    assert_eq!(status, StatusCode::CREATED, "{}", payment);
    assert_eq!(payment["amount"], "300.00");
    assert_eq!(payment["card_last4"], "1111");
    assert!(payment.get("card_number").is_none());

    let (status, _) = app.send("POST", &payment_uri, Some(&guest), Some(json!({
        "card_holder": "Heidi", "card_number": "4111111111111111", "method": "card"
    }))).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, updated) = app.send("PUT", &format!("/api/v1/payments/{}/method", payment["id"]), Some(&guest), Some(json!({
        "method": "bank_transfer"
    }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["method"], "bank_transfer");

    let (_, fetched) = app.send("GET", &payment_uri, Some(&guest), None).await;
    assert_eq!(fetched["method"], "bank_transfer");
}

#[tokio::test]
async fn test_cancelled_booking_cannot_be_paid() {
    let app = TestApp::new().await;
    let room_id = create_room_via_api(&app, "205").await;
    let (_, guest) = app.register_guest("ivan@example.com").await;

    let (_, created) = app.send("POST", "/api/v1/bookings", Some(&guest), Some(stay(room_id, "2024-06-10", "2024-06-12"))).await;
    let booking_id = created["booking_id"].as_i64().unwrap();
    app.send("POST", &format!("/api/v1/bookings/{}/cancel", booking_id), Some(&guest), None).await;

    let (status, _) = app.send("POST", &format!("/api/v1/bookings/{}/payment", booking_id), Some(&guest), Some(json!({
        "card_holder": "Ivan", "card_number": "4111111111111111", "method": "card"
    }))).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_walk_in_booking_by_staff() {
    let app = TestApp::new().await;
    let room_id = create_room_via_api(&app, "206").await;
    let (guest_id, _) = app.register_guest("judy@example.com").await;
    let staff = app.staff().await;

    let (status, _) = app.send("POST", "/api/v1/staff/bookings", Some(&staff), Some(json!({
        "user_id": guest_id, "room_id": room_id, "check_in": "2024-06-01", "check_out": "2024-06-03", "status": "checked_in"
    }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.send("POST", "/api/v1/staff/bookings", Some(&staff), Some(json!({
        "user_id": 9_999, "room_id": room_id, "check_in": "2024-06-01", "check_out": "2024-06-03"
    }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, created) = app.send("POST", "/api/v1/staff/bookings", Some(&staff), Some(json!({
        "user_id": guest_id, "room_id": room_id, "check_in": "2024-06-01", "check_out": "2024-06-03", "status": "booked"
    }))).await;
    assert_eq!(status, StatusCode::CREATED, "{}", created);

    let booking_id = created["booking_id"].as_i64().unwrap();
    let booking = app.state.booking_repo.find_by_id(booking_id).await.unwrap().unwrap();
    assert_eq!(booking.user_id, guest_id);
}

#[tokio::test]
async fn test_admin_sweep_reports_transitions() {
    let app = TestApp::new().await;
    let room_id = create_room_via_api(&app, "207").await;
    let (_, guest) = app.register_guest("ken@example.com").await;
    app.send("POST", "/api/v1/bookings", Some(&guest), Some(stay(room_id, "2024-06-01", "2024-06-02"))).await;

    app.clock.set(common::utc(2024, 6, 1, 14, 0));
    let staff = app.staff().await;
    let (status, report) = app.send("POST", "/api/v1/admin/sweep", Some(&staff), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report, json!({ "checked_in": 1, "checked_out": 0, "skipped": 0, "failed": 0 }));

    let (_, room) = app.send("GET", &format!("/api/v1/rooms/{}", room_id), None, None).await;
    assert_eq!(room["status"], "occupied");

    let (_, occupied) = app.send("GET", "/api/v1/rooms?status=occupied", None, None).await;
    assert_eq!(occupied.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_booking_survives_mail_outage() {
    let app = TestApp::new().await;
    let room_id = create_room_via_api(&app, "208").await;
    let (_, guest) = app.register_guest("lena@example.com").await;
    app.mailer.fail.store(true, Ordering::SeqCst);

    let (status, _) = app.send("POST", "/api/v1/bookings", Some(&guest), Some(stay(room_id, "2024-06-10", "2024-06-12"))).await;
    assert_eq!(status, StatusCode::CREATED);
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    assert!(app.mailer.sent().is_empty());
    assert_eq!(app.booking_count().await, 1);
}

#[tokio::test]
async fn test_slow_mail_relay_does_not_delay_booking() {
    let app = TestApp::new().await;
    let room_id = create_room_via_api(&app, "209").await;
    let (_, guest) = app.register_guest("mallory@example.com").await;
    app.mailer.delay_ms.store(1_500, Ordering::SeqCst);

    let started = std::time::Instant::now();
    let (status, _) = app.send("POST", "/api/v1/bookings", Some(&guest), Some(stay(room_id, "2024-06-10", "2024-06-12"))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(started.elapsed() < std::time::Duration::from_millis(1_000), "booking waited on the mail relay");

    let mail = app.mailer.wait_for(1).await;
    assert_eq!(mail[0].recipient, "mallory@example.com");
}

#[tokio::test]
async fn test_staff_account_is_seeded_once() {
    let app = TestApp::new().await;
    hotel_backend::infra::factory::seed_staff_account(&app.state.config, app.state.user_repo.as_ref()).await.unwrap();

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = ?")
        .bind(STAFF_EMAIL)
        .fetch_one(&app.pool).await.unwrap();
    assert_eq!(count, 1);

    let staff = app.staff().await;
    let (_, me) = app.send("GET", "/api/v1/auth/me", Some(&staff), None).await;
    assert_eq!(me["role"], "staff");
}
