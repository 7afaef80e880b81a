use axum::{extract::{State, Path}, response::IntoResponse, Json, http::StatusCode};
use crate::state::AppState;
use crate::api::extractors::auth::{AuthUser, StaffUser};
use crate::api::dtos::requests::{CreateBookingRequest, StaffBookingRequest};
use crate::api::dtos::responses::BookingResponse;
use crate::domain::models::auth::Identity;
use crate::domain::models::booking::Booking;
use crate::domain::services::booking_service::{BookingReceipt, BookingRequest};
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;
use validator::Validate;

pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
    Json(payload): Json<CreateBookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let receipt = state.booking_service.create_booking(BookingRequest {
        user_id: identity.user_id,
        room_id: payload.room_id,
        check_in: payload.check_in,
        check_out: payload.check_out,
        initial_status: None,
    }).await?;

    confirm(&state, &receipt);
    Ok((StatusCode::CREATED, Json(receipt)))
}

pub async fn create_walk_in_booking(
    State(state): State<Arc<AppState>>,
    StaffUser(staff): StaffUser,
    Json(payload): Json<StaffBookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    if state.user_repo.find_by_id(payload.user_id).await?.is_none() {
        return Err(AppError::NotFound(format!("User {} not found", payload.user_id)));
    }

    let receipt = state.booking_service.create_booking(BookingRequest {
        user_id: payload.user_id,
        room_id: payload.room_id,
        check_in: payload.check_in,
        check_out: payload.check_out,
        initial_status: payload.status,
    }).await?;

    info!("Walk-in booking {} recorded by staff {}", receipt.booking_id, staff.user_id);
    confirm(&state, &receipt);
    Ok((StatusCode::CREATED, Json(receipt)))
}

pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let bookings = if identity.is_staff() {
        state.booking_repo.list_all().await?
    } else {
        state.booking_repo.list_by_user(identity.user_id).await?
    };
    Ok(Json(bookings.into_iter().map(BookingResponse::summary).collect::<Vec<_>>()))
}

pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let booking = load_visible_booking(&state, id, &identity).await?;
    let details = state.booking_repo.find_details(booking.id).await?;
    Ok(Json(BookingResponse::with_details(booking, details)))
}

pub async fn cancel_booking(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let cancelled = state.booking_service.cancel_booking(id, &identity).await?;

    let notifier = state.notifier.clone();
    let booking = cancelled.clone();
    tokio::spawn(async move {
        notifier.booking_cancelled(&booking).await;
    });

    Ok(Json(BookingResponse::summary(cancelled)))
}

/// Bookings of other guests answer 404 rather than 403 so ids cannot be probed.
pub async fn load_visible_booking(state: &AppState, id: i64, identity: &Identity) -> Result<Booking, AppError> {
    let booking = state.booking_repo.find_by_id(id).await?
        .ok_or_else(|| AppError::NotFound(format!("Booking {} not found", id)))?;
    if !identity.can_access(booking.user_id) {
        return Err(AppError::NotFound(format!("Booking {} not found", id)));
    }
    Ok(booking)
}

// Mail goes out on its own task so a slow relay never holds up the response.
fn confirm(state: &Arc<AppState>, receipt: &BookingReceipt) {
    let state = state.clone();
    let booking = receipt.booking.clone();
    let detail = receipt.detail.clone();

    tokio::spawn(async move {
        let room_name = match state.room_repo.find_by_id(detail.room_id).await {
            Ok(Some(room)) => room.name,
            _ => format!("#{}", detail.room_id),
        };
        state.notifier.booking_confirmed(&booking, &detail, &room_name).await;
    });
}
