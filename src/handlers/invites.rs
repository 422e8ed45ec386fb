// src/handlers/invites.rs

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
    models::{auth::OrgContext, invites::{CreateInvitePayload, Invite}},
};

#[utoipa::path(
    get,
    path = "/api/invites",
    tag = "Members",
    responses((status = 200, body = [Invite]), (status = 403)),
    security(("api_jwt" = []))
)]
pub async fn list_invites(
    State(app_state): State<AppState>,
    ctx: OrgContext,
) -> Result<impl IntoResponse, AppError> {
    let invites = app_state.membership_service.list_invites(&ctx).await?;
    Ok(Json(invites))
}

#[utoipa::path(
    post,
    path = "/api/invites",
    tag = "Members",
    request_body = CreateInvitePayload,
    responses((status = 201, body = Invite), (status = 403)),
    security(("api_jwt" = []))
)]
pub async fn create_invite(
    State(app_state): State<AppState>,
    ctx: OrgContext,
    Json(payload): Json<CreateInvitePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let invite = app_state.membership_service.create_invite(&ctx, &payload).await?;

    Ok((StatusCode::CREATED, Json(invite)))
}

// Revoga um convite ainda não utilizado.
#[utoipa::path(
    delete,
    path = "/api/invites/{id}",
    tag = "Members",
    params(("id" = Uuid, Path, description = "ID do convite")),
    responses((status = 204), (status = 403), (status = 404)),
    security(("api_jwt" = []))
)]
pub async fn revoke_invite(
    State(app_state): State<AppState>,
    ctx: OrgContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.membership_service.revoke_invite(&ctx, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
