use axum::{extract::{State, Path}, response::IntoResponse, Json, http::StatusCode};
use crate::state::AppState;
use crate::api::extractors::auth::AuthUser;
use crate::api::dtos::requests::{CreatePaymentRequest, UpdatePaymentMethodRequest};
use crate::api::dtos::responses::PaymentResponse;
use crate::api::handlers::booking::load_visible_booking;
use crate::domain::models::payment::NewPayment;
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;
use validator::Validate;

pub async fn create_payment(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
    Path(booking_id): Path<i64>,
    Json(payload): Json<CreatePaymentRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let booking = load_visible_booking(&state, booking_id, &identity).await?;

    if booking.status.is_terminal() {
        return Err(AppError::Conflict(format!("A {} booking cannot be paid", booking.status)));
    }

    if state.payment_repo.find_by_booking(booking.id).await?.is_some() {
        return Err(AppError::Conflict(format!("Booking {} is already paid", booking.id)));
    }

    let card_last4 = payload.card_number[payload.card_number.len() - 4..].to_string();
    let payment = state.payment_repo.create(&NewPayment {
        booking_id: booking.id,
        card_holder: payload.card_holder.trim().to_string(),
        card_last4,
        amount_cents: booking.total_price_cents,
        method: payload.method,
        paid_at: state.clock.now(),
    }).await?;

    info!("Payment {} recorded for booking {}", payment.id, booking.id);
    Ok((StatusCode::CREATED, Json(PaymentResponse::from(payment))))
}

pub async fn get_payment(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
    Path(booking_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let booking = load_visible_booking(&state, booking_id, &identity).await?;
    let payment = state.payment_repo.find_by_booking(booking.id).await?
        .ok_or_else(|| AppError::NotFound(format!("No payment for booking {}", booking.id)))?;
    Ok(Json(PaymentResponse::from(payment)))
}

pub async fn update_payment_method(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
    Path(payment_id): Path<i64>,
    Json(payload): Json<UpdatePaymentMethodRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let payment = state.payment_repo.find_by_id(payment_id).await?
        .ok_or_else(|| AppError::NotFound(format!("Payment {} not found", payment_id)))?;
    load_visible_booking(&state, payment.booking_id, &identity).await?;

    let updated = state.payment_repo.update_method(payment.id, payload.method.trim()).await?;
    Ok(Json(PaymentResponse::from(updated)))
}
