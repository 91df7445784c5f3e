// src/handlers/locations.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use validator::Validate;

use crate::{
    common::error::AppError, config::AppState, middleware::auth::AuthenticatedUser,
    models::location::CreateLocationPayload,
};

pub async fn list_locations(
    State(app_state): State<AppState>,
    AuthenticatedUser(caller): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let locations = app_state.location_service.list(&caller).await?;
    Ok(Json(locations))
}

pub async fn get_location(
    State(app_state): State<AppState>,
    AuthenticatedUser(caller): AuthenticatedUser,
    Path(code): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let location = app_state.location_service.get(&code, &caller).await?;
    Ok(Json(location))
}

pub async fn create_location(
    State(app_state): State<AppState>,
    AuthenticatedUser(caller): AuthenticatedUser,
    Json(payload): Json<CreateLocationPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let location = app_state.location_service.create(payload, &caller).await?;
    Ok((StatusCode::CREATED, Json(location)))
}

pub async fn delete_location(
    State(app_state): State<AppState>,
    AuthenticatedUser(caller): AuthenticatedUser,
    Path(code): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    app_state.location_service.delete(&code, &caller).await?;

    Ok(Json(json!({
        "message": format!("Local '{code}' removido.")
    })))
}
