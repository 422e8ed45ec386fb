// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// Papel do usuário dentro da atlética. Autorização binária: o presidente
// administra (membros, marca, cancelamentos); o membro registra vendas e
// reporta problemas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Presidente,
    Membro,
}

impl UserRole {
    pub fn is_presidente(self) -> bool {
        matches!(self, UserRole::Presidente)
    }
}

// Representa um usuário vindo do banco de dados
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,

    #[serde(skip_serializing)] // IMPORTANTE para segurança
    #[schema(ignore)]
    pub password_hash: String,

    pub role: UserRole,
    pub active: bool,
    pub created_by: Option<Uuid>,
    pub org_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

// Cadastro de uma nova atlética: cria a organização e o primeiro
// presidente numa única transação.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupPayload {
    #[validate(length(min = 1, message = "O nome da atlética é obrigatório."))]
    #[schema(example = "Atlética Tubarões")]
    pub org_name: String,

    // Normalizado para minúsculas/alfanumérico-hífen antes de validar.
    #[validate(length(min = 2, message = "Slug deve ter pelo menos 2 caracteres"))]
    #[schema(example = "tubaroes")]
    pub slug: String,

    #[validate(length(min = 1, message = "O nome do presidente é obrigatório."))]
    pub president_name: String,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,

    #[validate(length(min = 6, message = "Senha deve ter pelo menos 6 caracteres"))]
    pub password: String,
}

// Dados para login
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginPayload {
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,
    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub password: String,
}

// Entrada na atlética via código de convite.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AcceptInvitePayload {
    #[validate(length(min = 1, message = "O código do convite é obrigatório."))]
    #[schema(example = "K7M2P9QA")]
    pub code: String,

    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,

    #[validate(length(min = 6, message = "Senha deve ter pelo menos 6 caracteres"))]
    pub password: String,
}

// Presidente cadastrando um membro diretamente, sem convite.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateMemberPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,

    #[validate(length(min = 6, message = "Senha deve ter pelo menos 6 caracteres"))]
    pub password: String,

    #[serde(default = "default_member_role")]
    pub role: UserRole,
}

fn default_member_role() -> UserRole {
    UserRole::Membro
}

// Resposta de autenticação com o token
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,  // Subject (ID do usuário)
    pub exp: usize, // Expiration time (quando o token expira)
    pub iat: usize, // Issued At (quando o token foi criado)
}

// Contexto explícito do chamador, extraído do token + cadastro. Todos os
// services recebem isso por parâmetro; não existe estado global de sessão.
#[derive(Debug, Clone, Copy)]
pub struct OrgContext {
    pub user_id: Uuid,
    pub org_id: Uuid,
    pub role: UserRole,
}

impl OrgContext {
    pub fn ensure_presidente(&self) -> Result<(), crate::common::error::AppError> {
        if self.role.is_presidente() {
            Ok(())
        } else {
            Err(crate::common::error::AppError::Forbidden)
        }
    }
}
