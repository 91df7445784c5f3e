// src/handlers/wines.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::wine::{CreateWinePayload, SetStockPayload, StockView, UpdateWinePayload},
};

// Cadastro é público: a vitrine aceita vinhos de qualquer visitante
// registrado como dono (user_id no corpo).
pub async fn create_wine(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateWinePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let view = app_state.wine_service.create(payload).await?;

    Ok((StatusCode::CREATED, Json(view)))
}

pub async fn get_wine(
    State(app_state): State<AppState>,
    AuthenticatedUser(caller): AuthenticatedUser,
    Path(wine_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let view = app_state.wine_service.get(wine_id, &caller).await?;
    Ok(Json(view))
}

pub async fn list_wines(
    State(app_state): State<AppState>,
    AuthenticatedUser(caller): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let views = app_state.wine_service.list(&caller).await?;
    Ok(Json(views))
}

#[derive(Debug, Deserialize)]
pub struct PageParams {
    #[serde(default)]
    pub offset: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    10
}

pub async fn list_paginated_wines(
    State(app_state): State<AppState>,
    AuthenticatedUser(caller): AuthenticatedUser,
    Query(params): Query<PageParams>,
) -> Result<impl IntoResponse, AppError> {
    let offset = params.offset.max(0);
    let limit = params.limit.clamp(1, 100);

    let page = app_state
        .wine_service
        .list_paginated(&caller, offset, limit)
        .await?;
    Ok(Json(page))
}

// Vitrine pública, sem autenticação.
pub async fn list_public_wines(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let views = app_state.wine_service.list_public().await?;
    Ok(Json(views))
}

pub async fn update_wine(
    State(app_state): State<AppState>,
    AuthenticatedUser(caller): AuthenticatedUser,
    Path(wine_id): Path<i64>,
    Json(payload): Json<UpdateWinePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let view = app_state
        .wine_service
        .update(wine_id, payload, &caller)
        .await?;
    Ok(Json(view))
}

pub async fn set_stock(
    State(app_state): State<AppState>,
    AuthenticatedUser(caller): AuthenticatedUser,
    Path(wine_id): Path<i64>,
    Json(payload): Json<SetStockPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let stock = app_state
        .wine_service
        .set_stock(wine_id, payload.stock, payload.comment.as_deref(), &caller)
        .await?;

    Ok(Json(StockView { stock }))
}

pub async fn delete_wine(
    State(app_state): State<AppState>,
    AuthenticatedUser(caller): AuthenticatedUser,
    Path(wine_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    app_state.wine_service.soft_delete(wine_id, &caller).await?;

    Ok(Json(json!({
        "message": format!("Vinho {wine_id} removido do catálogo.")
    })))
}

// Auditoria: o livro-razão de movimentações do vinho.
pub async fn list_wine_movements(
    State(app_state): State<AppState>,
    AuthenticatedUser(caller): AuthenticatedUser,
    Path(wine_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let movements = app_state.wine_service.movements(wine_id, &caller).await?;
    Ok(Json(movements))
}
