// src/handlers/tags.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    models::{auth::OrgContext, sales::CreateTagPayload},
};

pub async fn list_tags(
    State(app_state): State<AppState>,
    ctx: OrgContext,
) -> Result<impl IntoResponse, AppError> {
    let tags = app_state.sale_service.list_tags(&ctx).await?;
    Ok(Json(tags))
}

pub async fn create_tag(
    State(app_state): State<AppState>,
    ctx: OrgContext,
    Json(payload): Json<CreateTagPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let tag = app_state.sale_service.create_tag(&ctx, &payload).await?;

    Ok((StatusCode::CREATED, Json(tag)))
}

pub async fn delete_tag(
    State(app_state): State<AppState>,
    ctx: OrgContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.sale_service.delete_tag(&ctx, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
