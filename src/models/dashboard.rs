// src/models/dashboard.rs

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::sales::{PaymentMethod, Sale};

// Quebra de vendas por forma de pagamento (cancelamentos fora).
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentBreakdownEntry {
    pub method: PaymentMethod,
    pub count: i64,
    #[schema(example = "320.00")]
    pub total: Decimal,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TopSellerEntry {
    pub seller_id: Uuid,
    pub name: String,
    pub count: i64,
    pub total: Decimal,
}

// Resumo do painel interno da atlética.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_sales: i64,
    #[schema(example = "1250.00")]
    pub total_revenue: Decimal,
    pub pending_deliveries: i64,
    pub total_products: i64,
    pub sales_by_payment: Vec<PaymentBreakdownEntry>,
    pub recent_sales: Vec<Sale>,
    pub top_sellers: Vec<TopSellerEntry>,
}
