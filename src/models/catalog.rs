// src/models/catalog.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "product_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ProductType {
    Camiseta,
    Caneca,
    Outro,
}

// Tamanhos canônicos aceitos no cadastro de produtos.
pub const SIZES: [&str; 7] = ["PP", "P", "M", "G", "GG", "XG", "Único"];

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    #[schema(ignore)]
    pub org_id: Uuid,
    #[schema(example = "Camiseta Oficial 2026")]
    pub name: String,
    #[serde(rename = "type")]
    pub r#type: ProductType,
    #[schema(example = "M")]
    pub size: String,
    #[schema(example = "25.00")]
    pub price: Decimal,
    // Contador acumulado de unidades vendidas. Produção sob demanda:
    // incrementa no registro da venda, decrementa no cancelamento.
    pub sold_count: i32,
    pub description: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

fn validate_size(size: &str) -> Result<(), ValidationError> {
    if SIZES.contains(&size) {
        return Ok(());
    }
    let mut err = ValidationError::new("size");
    err.message = Some("Tamanho inválido.".into());
    Err(err)
}

fn validate_not_negative(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() {
        let mut err = ValidationError::new("range");
        err.message = Some("O valor não pode ser negativo.".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,

    #[serde(rename = "type")]
    pub r#type: ProductType,

    #[validate(custom(function = validate_size))]
    #[serde(default = "default_size")]
    pub size: String,

    #[validate(custom(function = validate_not_negative))]
    pub price: Decimal,

    pub description: Option<String>,
}

fn default_size() -> String {
    "Único".to_string()
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: Option<String>,

    #[serde(rename = "type")]
    pub r#type: Option<ProductType>,

    #[validate(custom(function = validate_size))]
    pub size: Option<String>,

    #[validate(custom(function = validate_not_negative))]
    pub price: Option<Decimal>,

    pub description: Option<String>,

    // Toggle de visibilidade (soft delete).
    pub active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tamanhos_canonicos_passam_na_validacao() {
        for size in SIZES {
            assert!(validate_size(size).is_ok(), "tamanho {size} deveria ser aceito");
        }
    }

    #[test]
    fn tamanho_fora_da_lista_e_rejeitado() {
        assert!(validate_size("XXG").is_err());
        assert!(validate_size("m").is_err());
    }
}
