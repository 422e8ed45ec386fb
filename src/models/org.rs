// src/models/org.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::catalog::Product;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "subscription_plan", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionPlan {
    Trial,
    Basic,
    Pro,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "subscription_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Trial,
    Active,
    PastDue,
    Canceled,
    Expired,
}

impl SubscriptionStatus {
    // Vitrine pública fica no ar enquanto a assinatura não morreu de vez.
    pub fn storefront_visible(self) -> bool {
        !matches!(self, SubscriptionStatus::Canceled | SubscriptionStatus::Expired)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub id: Uuid,
    #[schema(example = "tubaroes")]
    pub slug: String,
    #[schema(example = "Atlética Tubarões")]
    pub name: String,
    pub logo_url: Option<String>,
    pub primary_color: String,
    pub secondary_color: String,
    pub accent_color: String,
    pub bg_color: String,
    pub instagram_url: Option<String>,
    pub twitter_url: Option<String>,
    pub youtube_url: Option<String>,
    pub whatsapp: Option<String>,
    pub hero_title: String,
    pub hero_heading: Option<String>,
    pub hero_subtitle: Option<String>,
    pub about_text: Option<String>,
    pub gallery_photos: Vec<String>,
    pub plan: SubscriptionPlan,
    pub subscription_status: SubscriptionStatus,
    pub trial_ends_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Resumo exibido na listagem pública de atléticas.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublicOrgSummary {
    pub slug: String,
    pub name: String,
    pub logo_url: Option<String>,
    pub primary_color: String,
    pub secondary_color: String,
    pub accent_color: String,
    pub hero_subtitle: Option<String>,
    pub subscription_status: SubscriptionStatus,
}

/// Payload da vitrine pública de uma atlética: marca + catálogo ativo.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Storefront {
    pub organization: Organization,
    pub products: Vec<Product>,
}

// Atualização das configurações da atlética (restrita ao presidente).
// Campos ausentes permanecem como estão.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrganizationPayload {
    #[validate(length(min = 1, message = "O nome da atlética é obrigatório."))]
    pub name: Option<String>,

    #[validate(length(min = 2, message = "Slug deve ter pelo menos 2 caracteres"))]
    pub slug: Option<String>,

    pub logo_url: Option<String>,
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
    pub accent_color: Option<String>,
    pub bg_color: Option<String>,
    pub instagram_url: Option<String>,
    pub twitter_url: Option<String>,
    pub youtube_url: Option<String>,
    pub whatsapp: Option<String>,
    pub hero_title: Option<String>,
    pub hero_heading: Option<String>,
    pub hero_subtitle: Option<String>,
    pub about_text: Option<String>,
    pub gallery_photos: Option<Vec<String>>,
}

/// Normaliza um slug digitado pelo usuário: minúsculas e apenas
/// `[a-z0-9-]`, igual ao campo do formulário de cadastro.
pub fn normalize_slug(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-')
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_slug_remove_caracteres_invalidos() {
        assert_eq!(normalize_slug("  Atlética Tubarões  "), "atlticatubares");
        assert_eq!(normalize_slug("TUBAROES-2026"), "tubaroes-2026");
        assert_eq!(normalize_slug("tuba_rões!"), "tubares");
    }

    #[test]
    fn vitrine_some_apos_cancelamento_ou_expiracao() {
        assert!(SubscriptionStatus::Trial.storefront_visible());
        assert!(SubscriptionStatus::Active.storefront_visible());
        assert!(SubscriptionStatus::PastDue.storefront_visible());
        assert!(!SubscriptionStatus::Canceled.storefront_visible());
        assert!(!SubscriptionStatus::Expired.storefront_visible());
    }
}
