// src/handlers/orgs.rs

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    models::{
        auth::OrgContext,
        org::{Organization, PublicOrgSummary, Storefront, UpdateOrganizationPayload},
    },
};

// --- Rotas públicas (landing e vitrines) ---

#[utoipa::path(
    get,
    path = "/api/orgs",
    tag = "Orgs",
    responses((status = 200, description = "Atléticas com vitrine no ar", body = [PublicOrgSummary]))
)]
pub async fn list_public_orgs(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let orgs = app_state.org_service.list_public().await?;
    Ok(Json(orgs))
}

#[utoipa::path(
    get,
    path = "/api/orgs/{slug}",
    tag = "Orgs",
    params(("slug" = String, Path, description = "Slug da atlética")),
    responses(
        (status = 200, body = Storefront),
        (status = 404, description = "Atlética inexistente ou fora do ar")
    )
)]
pub async fn storefront(
    State(app_state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let storefront = app_state.org_service.storefront(&slug).await?;
    Ok(Json(storefront))
}

// --- Rotas internas ---

#[utoipa::path(
    get,
    path = "/api/org",
    tag = "Orgs",
    responses((status = 200, body = Organization)),
    security(("api_jwt" = []))
)]
pub async fn my_org(
    State(app_state): State<AppState>,
    ctx: OrgContext,
) -> Result<impl IntoResponse, AppError> {
    let org = app_state.org_service.my_org(&ctx).await?;
    Ok(Json(org))
}

// Configurações de marca/slug (só presidente).
#[utoipa::path(
    put,
    path = "/api/org",
    tag = "Orgs",
    request_body = UpdateOrganizationPayload,
    responses(
        (status = 200, body = Organization),
        (status = 403, description = "Só o presidente configura a atlética"),
        (status = 409, description = "Slug já em uso")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_org(
    State(app_state): State<AppState>,
    ctx: OrgContext,
    Json(payload): Json<UpdateOrganizationPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let org = app_state.org_service.update_organization(&ctx, &payload).await?;

    Ok(Json(org))
}
