// src/db/sale_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::sales::{
        Delivery, PaymentMethod, Sale, SaleItem, SaleItemDetail, SaleListFilter, SaleStatus,
    },
};

#[derive(Clone)]
pub struct SaleRepository {
    pool: PgPool,
}

impl SaleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  ESCRITA (sempre via transação do SaleService)
    // =========================================================================

    pub async fn insert_sale<'e, E>(
        &self,
        executor: E,
        org_id: Uuid,
        seller_id: Uuid,
        buyer_name: &str,
        buyer_contact: Option<&str>,
        payment_method: PaymentMethod,
        notes: Option<&str>,
        total_amount: Decimal,
    ) -> Result<Sale, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sale = sqlx::query_as::<_, Sale>(
            r#"
            INSERT INTO sales
                (org_id, seller_id, buyer_name, buyer_contact, payment_method, notes, total_amount)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(org_id)
        .bind(seller_id)
        .bind(buyer_name)
        .bind(buyer_contact)
        .bind(payment_method)
        .bind(notes)
        .bind(total_amount)
        .fetch_one(executor)
        .await?;
        Ok(sale)
    }

    pub async fn insert_item<'e, E>(
        &self,
        executor: E,
        sale_id: Uuid,
        product_id: Uuid,
        quantity: i32,
        unit_price: Decimal,
    ) -> Result<SaleItem, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let item = sqlx::query_as::<_, SaleItem>(
            r#"
            INSERT INTO sale_items (sale_id, product_id, quantity, unit_price)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(sale_id)
        .bind(product_id)
        .bind(quantity)
        .bind(unit_price)
        .fetch_one(executor)
        .await?;
        Ok(item)
    }

    // O filtro por org_id no SELECT garante que só tags da própria
    // organização podem ser associadas.
    pub async fn attach_tag<'e, E>(
        &self,
        executor: E,
        org_id: Uuid,
        sale_id: Uuid,
        tag_id: Uuid,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            r#"
            INSERT INTO sale_tags (sale_id, tag_id)
            SELECT $2, id FROM tags WHERE id = $3 AND org_id = $1
            "#,
        )
        .bind(org_id)
        .bind(sale_id)
        .bind(tag_id)
        .execute(executor)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Tag"));
        }
        Ok(())
    }

    /// Carrega a venda com lock de linha (`FOR UPDATE`). De duas transições
    /// concorrentes (cancelar × entregar), a segunda só enxerga a linha
    /// depois do commit da primeira e falha na máquina de estados.
    pub async fn lock_by_id<'e, E>(
        &self,
        executor: E,
        org_id: Uuid,
        sale_id: Uuid,
    ) -> Result<Option<Sale>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sale = sqlx::query_as::<_, Sale>(
            "SELECT * FROM sales WHERE org_id = $1 AND id = $2 FOR UPDATE",
        )
        .bind(org_id)
        .bind(sale_id)
        .fetch_optional(executor)
        .await?;
        Ok(sale)
    }

    pub async fn set_status<'e, E>(
        &self,
        executor: E,
        org_id: Uuid,
        sale_id: Uuid,
        status: SaleStatus,
    ) -> Result<Sale, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Sale>(
            r#"
            UPDATE sales SET status = $3, updated_at = now()
            WHERE org_id = $1 AND id = $2
            RETURNING *
            "#,
        )
        .bind(org_id)
        .bind(sale_id)
        .bind(status)
        .fetch_optional(executor)
        .await?
        .ok_or(AppError::NotFound("Venda"))
    }

    pub async fn insert_delivery<'e, E>(
        &self,
        executor: E,
        sale_id: Uuid,
        delivered_by: Uuid,
        received_by: &str,
        notes: Option<&str>,
    ) -> Result<Delivery, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let delivery = sqlx::query_as::<_, Delivery>(
            r#"
            INSERT INTO deliveries (sale_id, delivered_by, received_by, notes)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(sale_id)
        .bind(delivered_by)
        .bind(received_by)
        .bind(notes)
        .fetch_one(executor)
        .await?;
        Ok(delivery)
    }

    // =========================================================================
    //  LEITURA
    // =========================================================================

    pub async fn find_by_id(&self, org_id: Uuid, sale_id: Uuid) -> Result<Option<Sale>, AppError> {
        let sale = sqlx::query_as::<_, Sale>("SELECT * FROM sales WHERE org_id = $1 AND id = $2")
            .bind(org_id)
            .bind(sale_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(sale)
    }

    // Itens de uma venda, na ordem de inserção. Usado dentro das transações
    // de cancelamento (inversão do ledger).
    pub async fn list_items<'e, E>(
        &self,
        executor: E,
        sale_id: Uuid,
    ) -> Result<Vec<SaleItem>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let items = sqlx::query_as::<_, SaleItem>(
            "SELECT * FROM sale_items WHERE sale_id = $1 ORDER BY id",
        )
        .bind(sale_id)
        .fetch_all(executor)
        .await?;
        Ok(items)
    }

    pub async fn list_item_details(&self, sale_id: Uuid) -> Result<Vec<SaleItemDetail>, AppError> {
        let items = sqlx::query_as::<_, SaleItemDetail>(
            r#"
            SELECT si.id, si.sale_id, si.product_id, si.quantity, si.unit_price,
                   p.name AS product_name, p.size AS product_size
            FROM sale_items si
            JOIN products p ON p.id = si.product_id
            WHERE si.sale_id = $1
            ORDER BY si.id
            "#,
        )
        .bind(sale_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    pub async fn find_delivery(&self, sale_id: Uuid) -> Result<Option<Delivery>, AppError> {
        let delivery = sqlx::query_as::<_, Delivery>(
            "SELECT * FROM deliveries WHERE sale_id = $1",
        )
        .bind(sale_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(delivery)
    }

    pub async fn seller_name(&self, seller_id: Uuid) -> Result<String, AppError> {
        let name = sqlx::query_scalar::<_, String>("SELECT name FROM users WHERE id = $1")
            .bind(seller_id)
            .fetch_optional(&self.pool)
            .await?;
        name.ok_or(AppError::NotFound("Vendedor"))
    }

    // Listagem com os filtros da tela de vendas. Parâmetros opcionais são
    // resolvidos no próprio SQL ($n IS NULL OR ...).
    pub async fn list(&self, org_id: Uuid, filter: &SaleListFilter) -> Result<Vec<Sale>, AppError> {
        let sales = sqlx::query_as::<_, Sale>(
            r#"
            SELECT s.* FROM sales s
            WHERE s.org_id = $1
              AND ($2::sale_status IS NULL OR s.status = $2)
              AND ($3::payment_method IS NULL OR s.payment_method = $3)
              AND ($4::uuid IS NULL OR EXISTS (
                    SELECT 1 FROM sale_tags st WHERE st.sale_id = s.id AND st.tag_id = $4))
              AND ($5::text IS NULL
                   OR s.buyer_name ILIKE '%' || $5 || '%'
                   OR EXISTS (
                        SELECT 1 FROM users u
                        WHERE u.id = s.seller_id AND u.name ILIKE '%' || $5 || '%'))
            ORDER BY s.created_at DESC
            "#,
        )
        .bind(org_id)
        .bind(filter.status)
        .bind(filter.payment_method)
        .bind(filter.tag_id)
        .bind(filter.search.as_deref())
        .fetch_all(&self.pool)
        .await?;
        Ok(sales)
    }

    // Filas da tela de entregas: pendentes em ordem de chegada, entregues
    // mais recentes primeiro (limitadas).
    pub async fn delivery_queue(
        &self,
        org_id: Uuid,
        status: SaleStatus,
        limit: Option<i64>,
    ) -> Result<Vec<Sale>, AppError> {
        let ascending = status == SaleStatus::Pendente;
        let sales = sqlx::query_as::<_, Sale>(
            r#"
            SELECT * FROM sales
            WHERE org_id = $1 AND status = $2
            ORDER BY
                CASE WHEN $3 THEN created_at END ASC,
                CASE WHEN NOT $3 THEN created_at END DESC
            LIMIT $4
            "#,
        )
        .bind(org_id)
        .bind(status)
        .bind(ascending)
        .bind(limit.unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await?;
        Ok(sales)
    }
}
