mod common;

use axum::http::StatusCode;
use common::{date, TestApp};
use hotel_backend::domain::models::auth::Identity;
use hotel_backend::domain::models::booking::BookingStatus;
use hotel_backend::domain::models::room::RoomStatus;
use hotel_backend::domain::models::user::UserRole;
use hotel_backend::error::AppError;

#[tokio::test]
async fn test_overlapping_window_is_unavailable_until_booking_ends() {
    let app = TestApp::new().await;
    let room = app.seed_room("101", 10_000, 5_000, None).await;
    let guest = app.staff_user_id().await;

    assert!(app.state.resolver.is_available(room.id, date(2024, 6, 10), date(2024, 6, 13)).await.unwrap());
    let first = app.book(guest, room.id, date(2024, 6, 10), date(2024, 6, 13)).await.unwrap();

    // Fully inside, straddling either edge, and enclosing the existing stay.
    for (ci, co) in [
        (date(2024, 6, 11), date(2024, 6, 12)),
        (date(2024, 6, 8), date(2024, 6, 11)),
        (date(2024, 6, 12), date(2024, 6, 15)),
        (date(2024, 6, 9), date(2024, 6, 14)),
    ] {
        assert!(!app.state.resolver.is_available(room.id, ci, co).await.unwrap(), "{} - {} should clash", ci, co);
    }

    let clash = app.book(guest, room.id, date(2024, 6, 12), date(2024, 6, 14)).await;
    assert!(matches!(clash, Err(AppError::RoomUnavailable(_))));

    app.state.booking_service
        .cancel_booking(first.booking_id, &Identity { user_id: guest, role: UserRole::Staff })
        .await
        .unwrap();

    assert!(app.state.resolver.is_available(room.id, date(2024, 6, 11), date(2024, 6, 12)).await.unwrap());
}

#[tokio::test]
async fn test_back_to_back_turnover_is_allowed() {
    let app = TestApp::new().await;
    let room = app.seed_room("102", 10_000, 0, None).await;
    let guest = app.staff_user_id().await;

    app.book(guest, room.id, date(2024, 6, 10), date(2024, 6, 13)).await.unwrap();

    // Departure at 12:00 on the 13th, arrival at 14:00 the same day.
    assert!(app.state.resolver.is_available(room.id, date(2024, 6, 13), date(2024, 6, 15)).await.unwrap());
    app.book(guest, room.id, date(2024, 6, 13), date(2024, 6, 15)).await.unwrap();

    // And the stay that ends when the first begins.
    app.book(guest, room.id, date(2024, 6, 7), date(2024, 6, 10)).await.unwrap();
    assert_eq!(app.booking_count().await, 3);
}

#[tokio::test]
async fn test_checked_out_stays_release_the_room() {
    let app = TestApp::new().await;
    let room = app.seed_room("103", 10_000, 0, None).await;
    let guest = app.staff_user_id().await;

    let receipt = app.book(guest, room.id, date(2024, 6, 2), date(2024, 6, 4)).await.unwrap();
    let repo = &app.state.booking_repo;
    let at = app.state.clock.now();
    assert!(repo.apply_transition(receipt.booking_id, BookingStatus::Booked, BookingStatus::CheckedIn, at).await.unwrap());

    assert!(!app.state.resolver.is_available(room.id, date(2024, 6, 3), date(2024, 6, 5)).await.unwrap());

    assert!(repo.apply_transition(receipt.booking_id, BookingStatus::CheckedIn, BookingStatus::CheckedOut, at).await.unwrap());
    assert!(app.state.resolver.is_available(room.id, date(2024, 6, 3), date(2024, 6, 5)).await.unwrap());
}

#[tokio::test]
async fn test_unknown_room_and_bad_ranges_answer_unavailable() {
    let app = TestApp::new().await;
    let room = app.seed_room("104", 10_000, 0, None).await;

    assert!(!app.state.resolver.is_available(9_999, date(2024, 6, 10), date(2024, 6, 12)).await.unwrap());
    assert!(!app.state.resolver.is_available(room.id, date(2024, 6, 12), date(2024, 6, 12)).await.unwrap());
    assert!(!app.state.resolver.is_available(room.id, date(2024, 6, 12), date(2024, 6, 10)).await.unwrap());

    let missing = app.book(app.staff_user_id().await, 9_999, date(2024, 6, 10), date(2024, 6, 12)).await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_rooms_of_other_numbers_do_not_interfere() {
    let app = TestApp::new().await;
    let a = app.seed_room("201", 10_000, 0, None).await;
    let b = app.seed_room("202", 10_000, 0, None).await;
    let guest = app.staff_user_id().await;

    app.book(guest, a.id, date(2024, 6, 10), date(2024, 6, 13)).await.unwrap();
    assert!(app.state.resolver.is_available(b.id, date(2024, 6, 10), date(2024, 6, 13)).await.unwrap());
}

#[tokio::test]
async fn test_quote_endpoint_reports_availability_and_price() {
    let app = TestApp::new().await;
    let room = app.seed_room("301", 10_000, 5_000, None).await;

    let uri = format!("/api/v1/rooms/{}/quote?check_in=2024-06-10&check_out=2024-06-13", room.id);
    let (status, body) = app.send("GET", &uri, None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["available"], true);
    assert_eq!(body["nights"], 3);
    assert_eq!(body["unit_price"], "150.00");
    assert_eq!(body["total"], "450.00");

    app.book(app.staff_user_id().await, room.id, date(2024, 6, 10), date(2024, 6, 13)).await.unwrap();
    let (_, body) = app.send("GET", &uri, None, None).await;
    assert_eq!(body["available"], false);

    let bad = format!("/api/v1/rooms/{}/quote?check_in=2024-06-13&check_out=2024-06-10", room.id);
    let (status, _) = app.send("GET", &bad, None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.send("GET", "/api/v1/rooms/9999/quote?check_in=2024-06-10&check_out=2024-06-13", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_rooms_under_maintenance_are_unavailable_everywhere() {
    let app = TestApp::new().await;
    let room = app.seed_room("401", 10_000, 0, None).await;

    let mut closed = app.state.room_repo.find_by_id(room.id).await.unwrap().unwrap();
    closed.status = RoomStatus::Maintenance;
    app.state.room_repo.update(&closed).await.unwrap();

    assert!(!app.state.resolver.is_available(room.id, date(2024, 6, 10), date(2024, 6, 12)).await.unwrap());

    let uri = format!("/api/v1/rooms/{}/quote?check_in=2024-06-10&check_out=2024-06-12", room.id);
    let (status, body) = app.send("GET", &uri, None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["available"], false);

    let booked = app.book(app.staff_user_id().await, room.id, date(2024, 6, 10), date(2024, 6, 12)).await;
    assert!(matches!(booked, Err(AppError::RoomUnavailable(_))));

    // Back in service, the same window opens up.
    closed.status = RoomStatus::Available;
    app.state.room_repo.update(&closed).await.unwrap();
    let (_, body) = app.send("GET", &uri, None, None).await;
    assert_eq!(body["available"], true);
}
