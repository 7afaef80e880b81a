use axum::{extract::{State, Path, Query}, response::IntoResponse, Json, http::StatusCode};
use crate::state::AppState;
use crate::api::extractors::auth::StaffUser;
use crate::api::dtos::requests::{CreateRoomRequest, QuoteQuery, RoomListQuery, UpdateRoomRequest};
use crate::api::dtos::responses::QuoteResponse;
use crate::domain::models::room::{NewRoom, RoomStatus};
use crate::domain::services::house_policy::StayWindow;
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;
use validator::Validate;

pub async fn list_rooms(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RoomListQuery>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.room_repo.list(query.status).await?))
}

pub async fn get_room(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let room = state.room_repo.find_by_id(id).await?
        .ok_or_else(|| AppError::NotFound(format!("Room {} not found", id)))?;
    Ok(Json(room))
}

pub async fn create_room(
    State(state): State<Arc<AppState>>,
    _staff: StaffUser,
    Json(payload): Json<CreateRoomRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    ensure_references(&state, payload.room_type_id, payload.room_level_id, payload.deal_id).await?;

    let created = state.room_repo.create(&NewRoom {
        name: payload.name.trim().to_string(),
        status: payload.status.unwrap_or(RoomStatus::Available),
        room_type_id: payload.room_type_id,
        room_level_id: payload.room_level_id,
        floor_id: payload.floor_id,
        deal_id: payload.deal_id,
    }).await?;

    info!("Created room {} ({})", created.name, created.id);
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_room(
    State(state): State<Arc<AppState>>,
    _staff: StaffUser,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateRoomRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let mut room = state.room_repo.find_by_id(id).await?
        .ok_or_else(|| AppError::NotFound(format!("Room {} not found", id)))?;

    if let Some(name) = payload.name { room.name = name.trim().to_string(); }
    if let Some(status) = payload.status { room.status = status; }
    if let Some(room_type_id) = payload.room_type_id { room.room_type_id = room_type_id; }
    if let Some(room_level_id) = payload.room_level_id { room.room_level_id = room_level_id; }
    if let Some(floor_id) = payload.floor_id { room.floor_id = floor_id; }
    if payload.clear_deal {
        room.deal_id = None;
    } else if payload.deal_id.is_some() {
        room.deal_id = payload.deal_id;
    }

    ensure_references(&state, room.room_type_id, room.room_level_id, room.deal_id).await?;

    let updated = state.room_repo.update(&room).await?;
    info!("Updated room {} (status {})", updated.id, updated.status);
    Ok(Json(updated))
}

/// Read-only preview of what booking the room for the given dates would cost.
pub async fn quote_room(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Query(query): Query<QuoteQuery>,
) -> Result<impl IntoResponse, AppError> {
    if state.room_repo.find_by_id(id).await?.is_none() {
        return Err(AppError::NotFound(format!("Room {} not found", id)));
    }

    let stay = StayWindow::new(query.check_in, query.check_out, state.config.hotel_timezone)?;
    let available = state.resolver.is_window_available(id, &stay).await?;
    let quote = state.pricing.quote(id, &stay).await?;

    Ok(Json(QuoteResponse {
        room_id: id,
        check_in: stay.check_in_date,
        check_out: stay.check_out_date,
        available,
        nights: quote.nights,
        unit_price: quote.unit_price,
        discount_rate: quote.discount_rate,
        total: quote.total,
    }))
}

// Unknown catalog ids would otherwise surface as a bare foreign-key failure.
async fn ensure_references(state: &AppState, room_type_id: i64, room_level_id: i64, deal_id: Option<i64>) -> Result<(), AppError> {
    if state.catalog_repo.find_room_type(room_type_id).await?.is_none() {
        return Err(AppError::Validation(format!("Room type {} does not exist", room_type_id)));
    }
    if state.catalog_repo.find_room_level(room_level_id).await?.is_none() {
        return Err(AppError::Validation(format!("Room level {} does not exist", room_level_id)));
    }
    if let Some(deal_id) = deal_id
        && state.deal_repo.find_by_id(deal_id).await?.is_none() {
        return Err(AppError::Validation(format!("Deal {} does not exist", deal_id)));
    }
    Ok(())
}
