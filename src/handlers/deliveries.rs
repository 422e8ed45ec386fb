// src/handlers/deliveries.rs

use axum::{Json, extract::State, response::IntoResponse};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    common::error::AppError,
    config::AppState,
    models::{auth::OrgContext, sales::{SaleDetail, SaleStatus}},
};

// As duas filas da tela de entregas: pendentes em ordem de chegada e as
// últimas 50 entregues.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryQueues {
    pub pendentes: Vec<SaleDetail>,
    pub entregues: Vec<SaleDetail>,
}

#[utoipa::path(
    get,
    path = "/api/deliveries",
    tag = "Deliveries",
    responses((status = 200, body = DeliveryQueues)),
    security(("api_jwt" = []))
)]
pub async fn delivery_queues(
    State(app_state): State<AppState>,
    ctx: OrgContext,
) -> Result<impl IntoResponse, AppError> {
    let pendentes = app_state
        .sale_service
        .delivery_queue(&ctx, SaleStatus::Pendente, None)
        .await?;
    let entregues = app_state
        .sale_service
        .delivery_queue(&ctx, SaleStatus::Entregue, Some(50))
        .await?;

    Ok(Json(DeliveryQueues { pendentes, entregues }))
}
