// src/models/sales.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::error::AppError;
use crate::models::catalog::Product;

// --- Enums ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "payment_method", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Pix,
    Cartao,
    Dinheiro,
}

impl PaymentMethod {
    // Rótulo exibido em comprovantes e no dashboard.
    pub fn label(self) -> &'static str {
        match self {
            PaymentMethod::Pix => "PIX",
            PaymentMethod::Cartao => "Cartão",
            PaymentMethod::Dinheiro => "Dinheiro",
        }
    }
}

/// Máquina de estados da venda.
///
/// `pendente` é o único estado inicial. As duas transições válidas saem
/// dele (`entregue` na confirmação de entrega, `cancelado` no cancelamento
/// pelo presidente) e ambas levam a estados terminais.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "sale_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SaleStatus {
    Pendente,
    Entregue,
    Cancelado,
}

impl SaleStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, SaleStatus::Entregue | SaleStatus::Cancelado)
    }

    /// Verifica se a transição `self -> next` é permitida pela máquina de
    /// estados. Qualquer tentativa a partir de estado terminal falha com
    /// `InvalidStateTransition`.
    pub fn ensure_can_become(self, next: SaleStatus) -> Result<(), AppError> {
        let allowed = matches!(
            (self, next),
            (SaleStatus::Pendente, SaleStatus::Entregue)
                | (SaleStatus::Pendente, SaleStatus::Cancelado)
        );
        if allowed {
            Ok(())
        } else {
            Err(AppError::InvalidStateTransition { from: self })
        }
    }
}

impl std::fmt::Display for SaleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SaleStatus::Pendente => "pendente",
            SaleStatus::Entregue => "entregue",
            SaleStatus::Cancelado => "cancelado",
        };
        f.write_str(s)
    }
}

// --- Entidades ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: Uuid,
    #[schema(ignore)]
    pub org_id: Uuid,
    #[schema(example = "Maria Souza")]
    pub buyer_name: String,
    pub buyer_contact: Option<String>,
    pub payment_method: PaymentMethod,
    pub status: SaleStatus,
    pub notes: Option<String>,
    pub seller_id: Uuid,
    #[schema(example = "60.00")]
    pub total_amount: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaleItem {
    pub id: Uuid,
    pub sale_id: Uuid,
    pub product_id: Uuid,
    #[schema(example = 2)]
    pub quantity: i32,
    // Preço congelado no momento da venda; mudanças futuras no produto
    // não alteram o histórico.
    #[schema(example = "25.00")]
    pub unit_price: Decimal,
}

// Item enriquecido com os dados do produto para as telas de listagem.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaleItemDetail {
    pub id: Uuid,
    pub sale_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub product_name: String,
    pub product_size: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Delivery {
    pub id: Uuid,
    pub sale_id: Uuid,
    pub delivered_by: Uuid,
    #[schema(example = "João")]
    pub received_by: String,
    pub notes: Option<String>,
    pub confirmed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub id: Uuid,
    #[schema(ignore)]
    pub org_id: Uuid,
    #[schema(example = "Calourada 2026")]
    pub name: String,
    #[schema(example = "#f59e0b")]
    pub color: String,
}

/// Venda completa como as telas consomem: cabeçalho + vendedor + itens +
/// tags + entrega (quando houver).
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaleDetail {
    #[serde(flatten)]
    pub sale: Sale,
    pub seller_name: String,
    pub items: Vec<SaleItemDetail>,
    pub tags: Vec<Tag>,
    pub delivery: Option<Delivery>,
}

// --- Payloads ---

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LineItemInput {
    pub product_id: Uuid,
    #[validate(range(min = 1, message = "A quantidade mínima é 1."))]
    #[schema(example = 2)]
    pub quantity: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterSalePayload {
    #[validate(length(min = 1, message = "O nome do comprador é obrigatório."))]
    #[schema(example = "Maria Souza")]
    pub buyer_name: String,

    // Telefone ou e-mail; validado em `common::contact`.
    pub buyer_contact: Option<String>,

    pub payment_method: PaymentMethod,

    pub notes: Option<String>,

    #[validate(length(min = 1, message = "A venda precisa de pelo menos um item."), nested)]
    pub items: Vec<LineItemInput>,

    #[serde(default)]
    pub tag_ids: Vec<Uuid>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmDeliveryPayload {
    #[validate(length(min = 1, message = "Informe quem recebeu a entrega."))]
    #[schema(example = "João")]
    pub received_by: String,

    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportErrorPayload {
    #[validate(length(min = 1, message = "Descreva o problema encontrado."))]
    pub message: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTagPayload {
    #[validate(length(min = 1, message = "O nome da tag é obrigatório."))]
    pub name: String,
    #[serde(default = "default_tag_color")]
    pub color: String,
}

fn default_tag_color() -> String {
    "#64748b".to_string()
}

// Parâmetros de filtro da listagem de vendas.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct SaleListFilter {
    pub status: Option<SaleStatus>,
    pub payment_method: Option<PaymentMethod>,
    pub tag_id: Option<Uuid>,
    // Busca por comprador ou vendedor.
    pub search: Option<String>,
}

// --- Plano de registro ---

/// Linha planejada de uma venda: quantidade + preço congelado do produto.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedLine {
    pub product_id: Uuid,
    pub quantity: i32,
    pub unit_price: Decimal,
}

/// Resultado da fase de planejamento do `RegisterSale`: itens validados com
/// preço congelado e o total recalculado no servidor.
///
/// O total enviado pelo cliente nunca é gravado; o valor persistido é sempre
/// `Σ quantity × unit_price` calculado aqui, sobre os preços atuais dos
/// produtos lidos dentro da própria transação.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SalePlan {
    pub lines: Vec<PlannedLine>,
    pub total_amount: Decimal,
}

impl SalePlan {
    /// Monta o plano a partir dos itens do formulário e dos produtos da
    /// organização. Rejeita quantidade < 1, produto inexistente (de outra
    /// organização inclusive) e produto inativo.
    pub fn build(items: &[LineItemInput], products: &[Product]) -> Result<SalePlan, AppError> {
        if items.is_empty() {
            return Err(AppError::InvalidInput(
                "A venda precisa de pelo menos um item.".to_string(),
            ));
        }

        let mut lines = Vec::with_capacity(items.len());
        let mut total = Decimal::ZERO;

        for item in items {
            if item.quantity < 1 {
                return Err(AppError::InvalidInput("A quantidade mínima é 1.".to_string()));
            }

            let product = products
                .iter()
                .find(|p| p.id == item.product_id)
                .ok_or(AppError::NotFound("Produto"))?;

            if !product.active {
                return Err(AppError::ProductInactive);
            }

            total += product.price * Decimal::from(item.quantity);
            lines.push(PlannedLine {
                product_id: product.id,
                quantity: item.quantity,
                unit_price: product.price,
            });
        }

        Ok(SalePlan { lines, total_amount: total })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::catalog::ProductType;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn product(name: &str, price: &str, active: bool) -> Product {
        Product {
            id: Uuid::new_v4(),
            org_id: Uuid::new_v4(),
            name: name.to_string(),
            r#type: ProductType::Camiseta,
            size: "M".to_string(),
            price: price.parse().unwrap(),
            sold_count: 0,
            description: None,
            active,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn transicoes_validas_saem_de_pendente() {
        assert!(SaleStatus::Pendente.ensure_can_become(SaleStatus::Entregue).is_ok());
        assert!(SaleStatus::Pendente.ensure_can_become(SaleStatus::Cancelado).is_ok());
    }

    #[test]
    fn estados_terminais_nao_transicionam() {
        for terminal in [SaleStatus::Entregue, SaleStatus::Cancelado] {
            for next in [SaleStatus::Pendente, SaleStatus::Entregue, SaleStatus::Cancelado] {
                let err = terminal.ensure_can_become(next).unwrap_err();
                assert!(matches!(
                    err,
                    AppError::InvalidStateTransition { from } if from == terminal
                ));
            }
        }
        assert!(SaleStatus::Entregue.is_terminal());
        assert!(SaleStatus::Cancelado.is_terminal());
        assert!(!SaleStatus::Pendente.is_terminal());
    }

    #[test]
    fn pendente_nao_volta_para_pendente() {
        assert!(SaleStatus::Pendente.ensure_can_become(SaleStatus::Pendente).is_err());
    }

    #[test]
    fn plano_recalcula_total_no_servidor() {
        // Cenário A do caderno de testes: X (25.00 × 2) + Y (10.00 × 1) = 60.00.
        let x = product("Camiseta X", "25.00", true);
        let y = product("Caneca Y", "10.00", true);
        let items = vec![
            LineItemInput { product_id: x.id, quantity: 2 },
            LineItemInput { product_id: y.id, quantity: 1 },
        ];

        let plan = SalePlan::build(&items, &[x.clone(), y.clone()]).unwrap();

        assert_eq!(plan.total_amount, dec("60.00"));
        assert_eq!(plan.lines.len(), 2);
        assert_eq!(plan.lines[0].unit_price, dec("25.00"));
        assert_eq!(plan.lines[0].quantity, 2);
        assert_eq!(plan.lines[1].unit_price, dec("10.00"));
    }

    #[test]
    fn plano_congela_preco_do_produto() {
        // O plano guarda o preço do momento; mudar o produto depois não
        // altera as linhas já planejadas.
        let mut p = product("Camiseta", "25.00", true);
        let items = vec![LineItemInput { product_id: p.id, quantity: 1 }];
        let plan = SalePlan::build(&items, std::slice::from_ref(&p)).unwrap();

        p.price = dec("99.90");

        assert_eq!(plan.lines[0].unit_price, dec("25.00"));
        assert_eq!(plan.total_amount, dec("25.00"));
    }

    #[test]
    fn plano_rejeita_produto_inativo() {
        let p = product("Camiseta antiga", "25.00", false);
        let items = vec![LineItemInput { product_id: p.id, quantity: 1 }];
        let err = SalePlan::build(&items, &[p]).unwrap_err();
        assert!(matches!(err, AppError::ProductInactive));
    }

    #[test]
    fn plano_rejeita_produto_desconhecido() {
        let p = product("Camiseta", "25.00", true);
        let items = vec![LineItemInput { product_id: Uuid::new_v4(), quantity: 1 }];
        let err = SalePlan::build(&items, &[p]).unwrap_err();
        assert!(matches!(err, AppError::NotFound("Produto")));
    }

    #[test]
    fn plano_rejeita_quantidade_invalida_e_lista_vazia() {
        let p = product("Camiseta", "25.00", true);
        let items = vec![LineItemInput { product_id: p.id, quantity: 0 }];
        assert!(SalePlan::build(&items, std::slice::from_ref(&p)).is_err());
        assert!(SalePlan::build(&[], &[p]).is_err());
    }
}
