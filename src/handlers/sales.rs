// src/handlers/sales.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    models::{
        auth::OrgContext,
        sales::{
            ConfirmDeliveryPayload, RegisterSalePayload, ReportErrorPayload, SaleDetail,
            SaleListFilter,
        },
    },
};

// Registro de venda: venda + itens + contadores + tags numa transação só.
#[utoipa::path(
    post,
    path = "/api/sales",
    tag = "Sales",
    request_body = RegisterSalePayload,
    responses(
        (status = 201, description = "Venda registrada com status pendente", body = SaleDetail),
        (status = 400, description = "Entrada inválida (comprador, contato, itens)"),
        (status = 404, description = "Produto ou tag inexistente na organização"),
        (status = 422, description = "Produto inativo")
    ),
    security(("api_jwt" = []))
)]
pub async fn register_sale(
    State(app_state): State<AppState>,
    ctx: OrgContext,
    Json(payload): Json<RegisterSalePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let detail = app_state.sale_service.register_sale(&ctx, &payload).await?;

    Ok((StatusCode::CREATED, Json(detail)))
}

#[utoipa::path(
    get,
    path = "/api/sales",
    tag = "Sales",
    params(SaleListFilter),
    responses((status = 200, body = [SaleDetail])),
    security(("api_jwt" = []))
)]
pub async fn list_sales(
    State(app_state): State<AppState>,
    ctx: OrgContext,
    Query(filter): Query<SaleListFilter>,
) -> Result<impl IntoResponse, AppError> {
    let sales = app_state.sale_service.list_sales(&ctx, &filter).await?;
    Ok(Json(sales))
}

#[utoipa::path(
    get,
    path = "/api/sales/{id}",
    tag = "Sales",
    params(("id" = Uuid, Path, description = "ID da venda")),
    responses((status = 200, body = SaleDetail), (status = 404)),
    security(("api_jwt" = []))
)]
pub async fn get_sale(
    State(app_state): State<AppState>,
    ctx: OrgContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let detail = app_state.sale_service.get_sale(&ctx, id).await?;
    Ok(Json(detail))
}

// Cancelamento (só presidente): status -> cancelado + reversão dos
// contadores de vendidos.
#[utoipa::path(
    post,
    path = "/api/sales/{id}/cancel",
    tag = "Sales",
    params(("id" = Uuid, Path, description = "ID da venda")),
    responses(
        (status = 200, description = "Venda cancelada"),
        (status = 403, description = "Só o presidente cancela vendas"),
        (status = 404, description = "Venda não encontrada"),
        (status = 409, description = "Venda já entregue ou cancelada")
    ),
    security(("api_jwt" = []))
)]
pub async fn cancel_sale(
    State(app_state): State<AppState>,
    ctx: OrgContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let sale = app_state.sale_service.cancel_sale(&ctx, id).await?;
    Ok(Json(sale))
}

// Confirmação de entrega: status -> entregue + subregistro de entrega.
#[utoipa::path(
    post,
    path = "/api/sales/{id}/deliver",
    tag = "Sales",
    params(("id" = Uuid, Path, description = "ID da venda")),
    request_body = ConfirmDeliveryPayload,
    responses(
        (status = 200, description = "Entrega confirmada"),
        (status = 400, description = "Recebedor não informado"),
        (status = 404, description = "Venda não encontrada"),
        (status = 409, description = "Venda já entregue ou cancelada")
    ),
    security(("api_jwt" = []))
)]
pub async fn confirm_delivery(
    State(app_state): State<AppState>,
    ctx: OrgContext,
    Path(id): Path<Uuid>,
    Json(payload): Json<ConfirmDeliveryPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let (sale, delivery) = app_state.sale_service.confirm_delivery(&ctx, id, &payload).await?;

    Ok(Json(serde_json::json!({ "sale": sale, "delivery": delivery })))
}

// Report de erro: notifica todos os presidentes da organização.
#[utoipa::path(
    post,
    path = "/api/sales/{id}/report-error",
    tag = "Sales",
    params(("id" = Uuid, Path, description = "ID da venda")),
    request_body = ReportErrorPayload,
    responses(
        (status = 201, description = "Erro reportado aos presidentes"),
        (status = 404, description = "Venda não encontrada"),
        (status = 422, description = "Organização sem presidente")
    ),
    security(("api_jwt" = []))
)]
pub async fn report_error(
    State(app_state): State<AppState>,
    ctx: OrgContext,
    Path(id): Path<Uuid>,
    Json(payload): Json<ReportErrorPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let recipients = app_state.sale_service.report_error(&ctx, id, &payload.message).await?;

    Ok((StatusCode::CREATED, Json(serde_json::json!({ "recipients": recipients }))))
}

// Comprovante em PDF.
#[utoipa::path(
    get,
    path = "/api/sales/{id}/receipt",
    tag = "Sales",
    params(("id" = Uuid, Path, description = "ID da venda")),
    responses(
        (status = 200, description = "Comprovante em PDF", content_type = "application/pdf"),
        (status = 404)
    ),
    security(("api_jwt" = []))
)]
pub async fn sale_receipt(
    State(app_state): State<AppState>,
    ctx: OrgContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let pdf = app_state.document_service.generate_receipt_pdf(&ctx, id).await?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"comprovante-{id}.pdf\""),
            ),
        ],
        pdf,
    ))
}
