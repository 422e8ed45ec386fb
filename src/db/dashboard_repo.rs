// src/db/dashboard_repo.rs

use rust_decimal::Decimal;
use sqlx::{Acquire, Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::dashboard::{DashboardSummary, PaymentBreakdownEntry, TopSellerEntry},
    models::sales::Sale,
};

#[derive(Clone)]
pub struct DashboardRepository {
    pool: PgPool,
}

impl DashboardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Resumo geral do painel. Roda tudo numa transação para um snapshot
    // consistente dos agregados.
    pub async fn get_summary<'e, E>(
        &self,
        executor: E,
        org_id: Uuid,
    ) -> Result<DashboardSummary, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        // A. Totais de vendas e receita (cancelamentos fora da receita)
        let (total_sales, total_revenue) = sqlx::query_as::<_, (i64, Decimal)>(
            r#"
            SELECT COUNT(*),
                   COALESCE(SUM(total_amount) FILTER (WHERE status <> 'cancelado'), 0)
            FROM sales
            WHERE org_id = $1
            "#,
        )
        .bind(org_id)
        .fetch_one(&mut *tx)
        .await?;

        // B. Entregas pendentes
        let pending_deliveries = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM sales WHERE org_id = $1 AND status = 'pendente'",
        )
        .bind(org_id)
        .fetch_one(&mut *tx)
        .await?;

        // C. Produtos cadastrados
        let total_products = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM products WHERE org_id = $1",
        )
        .bind(org_id)
        .fetch_one(&mut *tx)
        .await?;

        // D. Quebra por forma de pagamento
        let sales_by_payment = sqlx::query_as::<_, PaymentBreakdownEntry>(
            r#"
            SELECT payment_method AS method, COUNT(*) AS count,
                   COALESCE(SUM(total_amount), 0) AS total
            FROM sales
            WHERE org_id = $1 AND status <> 'cancelado'
            GROUP BY payment_method
            ORDER BY total DESC
            "#,
        )
        .bind(org_id)
        .fetch_all(&mut *tx)
        .await?;

        // E. Vendas recentes
        let recent_sales = sqlx::query_as::<_, Sale>(
            "SELECT * FROM sales WHERE org_id = $1 ORDER BY created_at DESC LIMIT 5",
        )
        .bind(org_id)
        .fetch_all(&mut *tx)
        .await?;

        // F. Maiores vendedores
        let top_sellers = sqlx::query_as::<_, TopSellerEntry>(
            r#"
            SELECT s.seller_id, u.name, COUNT(*) AS count,
                   COALESCE(SUM(s.total_amount), 0) AS total
            FROM sales s
            JOIN users u ON u.id = s.seller_id
            WHERE s.org_id = $1 AND s.status <> 'cancelado'
            GROUP BY s.seller_id, u.name
            ORDER BY total DESC
            LIMIT 5
            "#,
        )
        .bind(org_id)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(DashboardSummary {
            total_sales,
            total_revenue,
            pending_deliveries,
            total_products,
            sales_by_payment,
            recent_sales,
            top_sellers,
        })
    }
}
