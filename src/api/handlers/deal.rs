use axum::{extract::{State, Path}, response::IntoResponse, Json, http::StatusCode};
use crate::state::AppState;
use crate::api::extractors::auth::StaffUser;
use crate::api::dtos::requests::DealRequest;
use crate::api::dtos::responses::DealResponse;
use crate::domain::models::deal::NewDeal;
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;
use validator::Validate;

pub async fn list_deals(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let today = state.clock.now().with_timezone(&state.config.hotel_timezone).date_naive();
    let deals = state.deal_repo.list().await?;
    Ok(Json(deals.into_iter().map(|d| DealResponse::new(d, today)).collect::<Vec<_>>()))
}

pub async fn get_deal(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let today = state.clock.now().with_timezone(&state.config.hotel_timezone).date_naive();
    let deal = state.deal_repo.find_by_id(id).await?
        .ok_or_else(|| AppError::NotFound(format!("Deal {} not found", id)))?;
    Ok(Json(DealResponse::new(deal, today)))
}

pub async fn create_deal(
    State(state): State<Arc<AppState>>,
    _staff: StaffUser,
    Json(payload): Json<DealRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let created = state.deal_repo.create(&NewDeal {
        name: payload.name.trim().to_string(),
        discount_rate: payload.discount_rate,
        start_date: payload.start_date,
        end_date: payload.end_date,
    }).await?;

    info!("Created deal {} ({}) from {} to {}", created.id, created.discount_rate, created.start_date, created.end_date);
    let today = state.clock.now().with_timezone(&state.config.hotel_timezone).date_naive();
    Ok((StatusCode::CREATED, Json(DealResponse::new(created, today))))
}

pub async fn update_deal(
    State(state): State<Arc<AppState>>,
    _staff: StaffUser,
    Path(id): Path<i64>,
    Json(payload): Json<DealRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let mut deal = state.deal_repo.find_by_id(id).await?
        .ok_or_else(|| AppError::NotFound(format!("Deal {} not found", id)))?;

    deal.name = payload.name.trim().to_string();
    deal.discount_rate = payload.discount_rate;
    deal.start_date = payload.start_date;
    deal.end_date = payload.end_date;

    let updated = state.deal_repo.update(&deal).await?;
    let today = state.clock.now().with_timezone(&state.config.hotel_timezone).date_naive();
    Ok(Json(DealResponse::new(updated, today)))
}

pub async fn delete_deal(
    State(state): State<Arc<AppState>>,
    _staff: StaffUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    state.deal_repo.delete(id).await?;
    info!("Deleted deal: {}", id);
    Ok(StatusCode::NO_CONTENT)
}
