// src/db/product_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::catalog::{Product, ProductType},
};

#[derive(Clone)]
pub struct ProductRepository {
    pool: PgPool,
}

impl ProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, org_id: Uuid, only_active: bool) -> Result<Vec<Product>, AppError> {
        let products = sqlx::query_as::<_, Product>(
            "SELECT * FROM products WHERE org_id = $1 AND (NOT $2 OR active) ORDER BY name ASC",
        )
        .bind(org_id)
        .bind(only_active)
        .fetch_all(&self.pool)
        .await?;
        Ok(products)
    }

    pub async fn find_by_id(&self, org_id: Uuid, id: Uuid) -> Result<Option<Product>, AppError> {
        let product = sqlx::query_as::<_, Product>(
            "SELECT * FROM products WHERE org_id = $1 AND id = $2",
        )
        .bind(org_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(product)
    }

    pub async fn create(
        &self,
        org_id: Uuid,
        name: &str,
        kind: ProductType,
        size: &str,
        price: Decimal,
        description: Option<&str>,
    ) -> Result<Product, AppError> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (org_id, name, type, size, price, description)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(org_id)
        .bind(name)
        .bind(kind)
        .bind(size)
        .bind(price)
        .bind(description)
        .fetch_one(&self.pool)
        .await?;
        Ok(product)
    }

    pub async fn update(
        &self,
        org_id: Uuid,
        id: Uuid,
        name: Option<&str>,
        kind: Option<ProductType>,
        size: Option<&str>,
        price: Option<Decimal>,
        description: Option<&str>,
        active: Option<bool>,
    ) -> Result<Product, AppError> {
        sqlx::query_as::<_, Product>(
            r#"
            UPDATE products SET
                name        = COALESCE($3, name),
                type        = COALESCE($4, type),
                size        = COALESCE($5, size),
                price       = COALESCE($6, price),
                description = COALESCE($7, description),
                active      = COALESCE($8, active)
            WHERE org_id = $1 AND id = $2
            RETURNING *
            "#,
        )
        .bind(org_id)
        .bind(id)
        .bind(name)
        .bind(kind)
        .bind(size)
        .bind(price)
        .bind(description)
        .bind(active)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::NotFound("Produto"))
    }

    /// Carrega e tranca (`FOR UPDATE`) os produtos de uma venda em registro.
    /// O lock serializa vendas concorrentes do mesmo produto, garantindo que
    /// o contador de vendidos não perca atualizações.
    pub async fn lock_for_sale<'e, E>(
        &self,
        executor: E,
        org_id: Uuid,
        product_ids: &[Uuid],
    ) -> Result<Vec<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let products = sqlx::query_as::<_, Product>(
            "SELECT * FROM products WHERE org_id = $1 AND id = ANY($2) ORDER BY id FOR UPDATE",
        )
        .bind(org_id)
        .bind(product_ids)
        .fetch_all(executor)
        .await?;
        Ok(products)
    }

    // ---
    // Ledger de vendidos: increment/decrement são as ÚNICAS mutações do
    // contador, sempre dentro de uma transação do ciclo de vida da venda.
    // ---

    pub async fn increment_sold<'e, E>(
        &self,
        executor: E,
        org_id: Uuid,
        product_id: Uuid,
        qty: i32,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            "UPDATE products SET sold_count = sold_count + $3 WHERE org_id = $1 AND id = $2",
        )
        .bind(org_id)
        .bind(product_id)
        .bind(qty)
        .execute(executor)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Produto"));
        }
        Ok(())
    }

    /// O guard `sold_count >= qty` fica na própria query: se o decremento
    /// deixaria o contador negativo, os itens da venda estão corrompidos ou
    /// foram processados duas vezes — é bug do chamador, nunca é clampado.
    pub async fn decrement_sold<'e, E>(
        &self,
        executor: E,
        org_id: Uuid,
        product_id: Uuid,
        qty: i32,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            r#"
            UPDATE products SET sold_count = sold_count - $3
            WHERE org_id = $1 AND id = $2 AND sold_count >= $3
            "#,
        )
        .bind(org_id)
        .bind(product_id)
        .bind(qty)
        .execute(executor)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::InvariantViolation(format!(
                "decremento de {} unidades deixaria o contador do produto {} negativo (ou o produto não existe)",
                qty, product_id
            )));
        }
        Ok(())
    }
}
