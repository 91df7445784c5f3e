// src/handlers/users.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::user::{RegisterUserPayload, UpdateUserPayload},
};

// Registro público (sempre cria role 'user')
pub async fn register(
    State(app_state): State<AppState>,
    Json(payload): Json<RegisterUserPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let view = app_state.user_service.register(payload).await?;

    Ok((StatusCode::CREATED, Json(view)))
}

pub async fn list_users(
    State(app_state): State<AppState>,
    AuthenticatedUser(caller): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let views = app_state.user_service.list(&caller).await?;
    Ok(Json(views))
}

// Perfil: o próprio usuário ou um admin.
pub async fn get_user(
    State(app_state): State<AppState>,
    AuthenticatedUser(caller): AuthenticatedUser,
    Path(user_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let view = app_state.user_service.get(user_id, &caller).await?;
    Ok(Json(view))
}

pub async fn update_user(
    State(app_state): State<AppState>,
    AuthenticatedUser(caller): AuthenticatedUser,
    Path(user_id): Path<i64>,
    Json(payload): Json<UpdateUserPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let view = app_state
        .user_service
        .update(user_id, payload, &caller)
        .await?;
    Ok(Json(view))
}

pub async fn delete_user(
    State(app_state): State<AppState>,
    AuthenticatedUser(caller): AuthenticatedUser,
    Path(user_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    app_state.user_service.delete(user_id, &caller).await?;

    Ok(Json(json!({
        "message": format!("Usuário {user_id} desativado com sucesso.")
    })))
}
