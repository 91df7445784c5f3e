// src/handlers/auth.rs

use axum::{Json, extract::State};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    models::auth::{Credentials, Token},
};

// Handler de login
pub async fn login(
    State(app_state): State<AppState>,
    Json(payload): Json<Credentials>,
) -> Result<Json<Token>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let token = app_state
        .auth_service
        .login(&payload.username, &payload.password)
        .await?;

    Ok(Json(token))
}
