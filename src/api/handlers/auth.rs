use axum::{extract::State, response::IntoResponse, Json, http::StatusCode};
use crate::state::AppState;
use crate::error::AppError;
use crate::api::dtos::requests::{LoginRequest, RegisterRequest};
use crate::api::extractors::auth::{AuthUser, ACCESS_COOKIE};
use crate::domain::models::auth::{AuthResponse, UserProfile};
use crate::domain::models::user::{NewUser, User, UserRole};
use crate::domain::services::auth_service::{hash_password, verify_password, ACCESS_TOKEN_TTL_MINUTES};
use std::sync::Arc;
use tower_cookies::{Cookies, Cookie};
use tower_cookies::cookie::SameSite;
use time::Duration;
use tracing::info;
use validator::Validate;

pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let email = payload.email.trim().to_lowercase();
    if state.user_repo.find_by_email(&email).await?.is_some() {
        return Err(AppError::Conflict("An account with this email already exists".into()));
    }

    let user = state.user_repo.create(&NewUser {
        email,
        full_name: payload.full_name.trim().to_string(),
        password_hash: hash_password(&payload.password)?,
        role: UserRole::Guest,
    }).await?;

    info!("Registered guest account {}", user.id);
    Ok((StatusCode::CREATED, Json(profile(user))))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let email = payload.email.trim().to_lowercase();
    let user = state.user_repo.find_by_email(&email).await?
        .ok_or(AppError::Unauthorized)?;

    if !verify_password(&payload.password, &user.password_hash)? {
        return Err(AppError::Unauthorized);
    }

    let (access_jwt, csrf_token) = state.auth_service.issue_access_token(&user)?;
    set_access_cookie(&cookies, &access_jwt);

    info!("User logged in: {}", user.id);

    Ok(Json(AuthResponse {
        csrf_token,
        user: profile(user),
    }))
}

pub async fn logout(cookies: Cookies) -> Result<impl IntoResponse, AppError> {
    cookies.remove(Cookie::build((ACCESS_COOKIE, "")).path("/").into());
    info!("User logged out");
    Ok(StatusCode::OK)
}

pub async fn me(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let user = state.user_repo.find_by_id(identity.user_id).await?
        .ok_or(AppError::Unauthorized)?;
    Ok(Json(profile(user)))
}

fn profile(user: User) -> UserProfile {
    UserProfile {
        id: user.id,
        email: user.email,
        full_name: user.full_name,
        role: user.role,
    }
}

fn set_access_cookie(cookies: &Cookies, access: &str) {
    let mut access_c = Cookie::new(ACCESS_COOKIE, access.to_string());
    access_c.set_http_only(true);
    access_c.set_secure(true);
    access_c.set_same_site(SameSite::Strict);
    access_c.set_path("/");
    access_c.set_max_age(Duration::minutes(ACCESS_TOKEN_TTL_MINUTES));
    cookies.add(access_c);
}
