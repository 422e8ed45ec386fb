// src/handlers/members.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    models::auth::{CreateMemberPayload, OrgContext, User},
};

#[utoipa::path(
    get,
    path = "/api/members",
    tag = "Members",
    responses((status = 200, body = [User])),
    security(("api_jwt" = []))
)]
pub async fn list_members(
    State(app_state): State<AppState>,
    ctx: OrgContext,
) -> Result<impl IntoResponse, AppError> {
    let members = app_state.membership_service.list_members(&ctx).await?;
    Ok(Json(members))
}

// Presidente cadastra um membro diretamente (sem fluxo de convite).
#[utoipa::path(
    post,
    path = "/api/members",
    tag = "Members",
    request_body = CreateMemberPayload,
    responses(
        (status = 201, body = User),
        (status = 403, description = "Só o presidente cadastra membros"),
        (status = 409, description = "E-mail já cadastrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_member(
    State(app_state): State<AppState>,
    ctx: OrgContext,
    Json(payload): Json<CreateMemberPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let member = app_state.auth_service.create_member(&ctx, &payload).await?;

    Ok((StatusCode::CREATED, Json(member)))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SetActivePayload {
    pub active: bool,
}

#[utoipa::path(
    put,
    path = "/api/members/{id}/active",
    tag = "Members",
    params(("id" = Uuid, Path, description = "ID do membro")),
    request_body = SetActivePayload,
    responses((status = 200, body = User), (status = 403), (status = 404)),
    security(("api_jwt" = []))
)]
pub async fn set_member_active(
    State(app_state): State<AppState>,
    ctx: OrgContext,
    Path(id): Path<Uuid>,
    Json(payload): Json<SetActivePayload>,
) -> Result<impl IntoResponse, AppError> {
    let member = app_state
        .membership_service
        .set_member_active(&ctx, id, payload.active)
        .await?;
    Ok(Json(member))
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransferPresidencyPayload {
    pub new_president_id: Uuid,
}

// Transferência de presidência: rebaixamento + promoção numa transação só.
#[utoipa::path(
    post,
    path = "/api/members/transfer-presidency",
    tag = "Members",
    request_body = TransferPresidencyPayload,
    responses(
        (status = 200, description = "Novo presidente", body = User),
        (status = 403, description = "Só o presidente transfere a presidência"),
        (status = 404, description = "Membro não encontrado na organização")
    ),
    security(("api_jwt" = []))
)]
pub async fn transfer_presidency(
    State(app_state): State<AppState>,
    ctx: OrgContext,
    Json(payload): Json<TransferPresidencyPayload>,
) -> Result<impl IntoResponse, AppError> {
    let promoted = app_state
        .membership_service
        .transfer_presidency(&ctx, payload.new_president_id)
        .await?;
    Ok(Json(promoted))
}
