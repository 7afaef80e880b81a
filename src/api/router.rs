use axum::{
    body::Body,
    extract::Request,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{admin, auth, booking, catalog, deal, health, payment, room};
use tower_http::{
    trace::TraceLayer,
    classify::ServerErrorsFailureClass,
};
use tower_cookies::CookieManagerLayer;
use tracing::{info_span, Span, error, info};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Auth
        .route("/api/v1/auth/register", post(auth::register))
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/logout", post(auth::logout))
        .route("/api/v1/auth/me", get(auth::me))

        // Catalog
        .route("/api/v1/room-types", get(catalog::list_room_types).post(catalog::create_room_type))
        .route("/api/v1/room-types/{id}", put(catalog::update_room_type))
        .route("/api/v1/room-levels", get(catalog::list_room_levels).post(catalog::create_room_level))
        .route("/api/v1/room-levels/{id}", put(catalog::update_room_level))
        .route("/api/v1/floors", get(catalog::list_floors).post(catalog::create_floor))

        // Deals
        .route("/api/v1/deals", get(deal::list_deals).post(deal::create_deal))
        .route("/api/v1/deals/{id}", get(deal::get_deal).put(deal::update_deal).delete(deal::delete_deal))

        // Rooms
        .route("/api/v1/rooms", get(room::list_rooms).post(room::create_room))
        .route("/api/v1/rooms/{id}", get(room::get_room).put(room::update_room))
        .route("/api/v1/rooms/{id}/quote", get(room::quote_room))

        // Bookings
        .route("/api/v1/bookings", get(booking::list_bookings).post(booking::create_booking))
        .route("/api/v1/bookings/{id}", get(booking::get_booking))
        .route("/api/v1/bookings/{id}/cancel", post(booking::cancel_booking))
        .route("/api/v1/staff/bookings", post(booking::create_walk_in_booking))

        // Payments
        .route("/api/v1/bookings/{id}/payment", get(payment::get_payment).post(payment::create_payment))
        .route("/api/v1/payments/{id}/method", put(payment::update_payment_method))

        // Operations
        .route("/api/v1/admin/sweep", post(admin::run_sweep))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        user_id = tracing::field::Empty,
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .layer(CookieManagerLayer::new())
        .with_state(state)
}
