// src/services/catalog_service.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::ProductRepository,
    models::{
        auth::OrgContext,
        catalog::{CreateProductPayload, Product, UpdateProductPayload},
    },
};

/// Catálogo de produtos da atlética (camisetas, canecas...). O contador de
/// vendidos NÃO é mexido por aqui — só o ciclo de vida da venda muta o
/// ledger.
#[derive(Clone)]
pub struct CatalogService {
    product_repo: ProductRepository,
}

impl CatalogService {
    pub fn new(product_repo: ProductRepository) -> Self {
        Self { product_repo }
    }

    pub async fn list_products(
        &self,
        ctx: &OrgContext,
        only_active: bool,
    ) -> Result<Vec<Product>, AppError> {
        self.product_repo.list(ctx.org_id, only_active).await
    }

    pub async fn get_product(&self, ctx: &OrgContext, id: Uuid) -> Result<Product, AppError> {
        self.product_repo
            .find_by_id(ctx.org_id, id)
            .await?
            .ok_or(AppError::NotFound("Produto"))
    }

    pub async fn create_product(
        &self,
        ctx: &OrgContext,
        payload: &CreateProductPayload,
    ) -> Result<Product, AppError> {
        ctx.ensure_presidente()?;

        self.product_repo
            .create(
                ctx.org_id,
                payload.name.trim(),
                payload.r#type,
                &payload.size,
                payload.price,
                payload.description.as_deref(),
            )
            .await
    }

    pub async fn update_product(
        &self,
        ctx: &OrgContext,
        id: Uuid,
        payload: &UpdateProductPayload,
    ) -> Result<Product, AppError> {
        ctx.ensure_presidente()?;

        self.product_repo
            .update(
                ctx.org_id,
                id,
                payload.name.as_deref(),
                payload.r#type,
                payload.size.as_deref(),
                payload.price,
                payload.description.as_deref(),
                payload.active,
            )
            .await
    }
}
