use axum::{extract::State, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::auth::StaffUser;
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

// Runs one status sweep immediately instead of waiting for the worker's next tick.
pub async fn run_sweep(
    State(state): State<Arc<AppState>>,
    StaffUser(staff): StaffUser,
) -> Result<impl IntoResponse, AppError> {
    let report = state.scheduler.sweep().await?;
    info!("Manual sweep by staff {}: {:?}", staff.user_id, report);
    Ok(Json(report))
}
