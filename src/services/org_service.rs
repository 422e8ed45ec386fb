// src/services/org_service.rs

use crate::{
    common::error::AppError,
    db::{OrgRepository, ProductRepository},
    models::{
        auth::OrgContext,
        org::{Organization, PublicOrgSummary, Storefront, UpdateOrganizationPayload, normalize_slug},
    },
};

/// Dados da organização: configurações internas (presidente) e a vitrine
/// pública das atléticas.
#[derive(Clone)]
pub struct OrgService {
    org_repo: OrgRepository,
    product_repo: ProductRepository,
}

impl OrgService {
    pub fn new(org_repo: OrgRepository, product_repo: ProductRepository) -> Self {
        Self { org_repo, product_repo }
    }

    pub async fn my_org(&self, ctx: &OrgContext) -> Result<Organization, AppError> {
        self.org_repo
            .find_by_id(ctx.org_id)
            .await?
            .ok_or(AppError::NotFound("Organização"))
    }

    pub async fn update_organization(
        &self,
        ctx: &OrgContext,
        payload: &UpdateOrganizationPayload,
    ) -> Result<Organization, AppError> {
        ctx.ensure_presidente()?;

        // Slug passa pela mesma normalização do cadastro.
        let slug = match payload.slug.as_deref() {
            Some(raw) => {
                let normalized = normalize_slug(raw);
                if normalized.len() < 2 {
                    return Err(AppError::InvalidInput(
                        "Slug deve ter pelo menos 2 caracteres".to_string(),
                    ));
                }
                Some(normalized)
            }
            None => None,
        };

        self.org_repo.update(ctx.org_id, slug.as_deref(), payload).await
    }

    // --- Vitrine pública ---

    pub async fn list_public(&self) -> Result<Vec<PublicOrgSummary>, AppError> {
        self.org_repo.list_public().await
    }

    /// Vitrine de uma atlética pelo slug: marca + catálogo ativo. Atlética
    /// com assinatura cancelada/expirada some do ar (mesmo 404 de slug
    /// inexistente, sem vazar que ela existe).
    pub async fn storefront(&self, slug: &str) -> Result<Storefront, AppError> {
        let organization = self
            .org_repo
            .find_by_slug(slug)
            .await?
            .filter(|org| org.subscription_status.storefront_visible())
            .ok_or(AppError::NotFound("Atlética"))?;

        let products = self.product_repo.list(organization.id, true).await?;

        Ok(Storefront { organization, products })
    }
}
