use axum::{extract::{State, Path}, response::IntoResponse, Json, http::StatusCode};
use crate::state::AppState;
use crate::api::extractors::auth::StaffUser;
use crate::api::dtos::requests::{CreateFloorRequest, CreatePricedItemRequest, UpdatePricedItemRequest};
use crate::api::dtos::responses::PricedItemResponse;
use crate::domain::services::pricing::money_to_cents;
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;
use validator::Validate;

pub async fn list_room_types(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let types = state.catalog_repo.list_room_types().await?;
    Ok(Json(types.into_iter().map(PricedItemResponse::from).collect::<Vec<_>>()))
}

pub async fn create_room_type(
    State(state): State<Arc<AppState>>,
    _staff: StaffUser,
    Json(payload): Json<CreatePricedItemRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let created = state.catalog_repo.create_room_type(payload.name.trim(), money_to_cents(payload.price)?).await?;
    info!("Created room type {} at {} cents", created.name, created.price_cents);
    Ok((StatusCode::CREATED, Json(PricedItemResponse::from(created))))
}

pub async fn update_room_type(
    State(state): State<Arc<AppState>>,
    _staff: StaffUser,
    Path(id): Path<i64>,
    Json(payload): Json<UpdatePricedItemRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let mut room_type = state.catalog_repo.find_room_type(id).await?
        .ok_or_else(|| AppError::NotFound(format!("Room type {} not found", id)))?;

    if let Some(name) = payload.name { room_type.name = name.trim().to_string(); }
    if let Some(price) = payload.price { room_type.price_cents = money_to_cents(price)?; }

    let updated = state.catalog_repo.update_room_type(&room_type).await?;
    Ok(Json(PricedItemResponse::from(updated)))
}

pub async fn list_room_levels(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let levels = state.catalog_repo.list_room_levels().await?;
    Ok(Json(levels.into_iter().map(PricedItemResponse::from).collect::<Vec<_>>()))
}

pub async fn create_room_level(
    State(state): State<Arc<AppState>>,
    _staff: StaffUser,
    Json(payload): Json<CreatePricedItemRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let created = state.catalog_repo.create_room_level(payload.name.trim(), money_to_cents(payload.price)?).await?;
    info!("Created room level {} at {} cents", created.name, created.price_cents);
    Ok((StatusCode::CREATED, Json(PricedItemResponse::from(created))))
}

pub async fn update_room_level(
    State(state): State<Arc<AppState>>,
    _staff: StaffUser,
    Path(id): Path<i64>,
    Json(payload): Json<UpdatePricedItemRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let mut room_level = state.catalog_repo.find_room_level(id).await?
        .ok_or_else(|| AppError::NotFound(format!("Room level {} not found", id)))?;

    if let Some(name) = payload.name { room_level.name = name.trim().to_string(); }
    if let Some(price) = payload.price { room_level.price_cents = money_to_cents(price)?; }

    let updated = state.catalog_repo.update_room_level(&room_level).await?;
    Ok(Json(PricedItemResponse::from(updated)))
}

pub async fn list_floors(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.catalog_repo.list_floors().await?))
}

pub async fn create_floor(
    State(state): State<Arc<AppState>>,
    _staff: StaffUser,
    Json(payload): Json<CreateFloorRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let created = state.catalog_repo.create_floor(payload.name.trim()).await?;
    Ok((StatusCode::CREATED, Json(created)))
}
