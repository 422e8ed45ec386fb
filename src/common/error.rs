use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::models::sales::SaleStatus;

// Nosso tipo de erro central, com `thiserror` para melhor ergonomia.
// Toda falha dos services chega ao handler como uma variante daqui e vira
// resposta HTTP em um único lugar (`IntoResponse` abaixo).
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // Entrada malformada fora do alcance do `validator` (ex.: contato do
    // comprador, slug, lista de itens vazia).
    #[error("Entrada inválida: {0}")]
    InvalidInput(String),

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Slug já está em uso")]
    SlugAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    // Checagem de papel (presidente/membro) falhou no service.
    #[error("Ação restrita ao presidente")]
    Forbidden,

    #[error("{0} não encontrado(a)")]
    NotFound(&'static str),

    #[error("Produto inativo")]
    ProductInactive,

    // Transição a partir de estado terminal (entregue/cancelado).
    #[error("Transição de status inválida a partir de '{from}'")]
    InvalidStateTransition { from: SaleStatus },

    // Falha de consistência interna (ex.: contador de vendas ficaria
    // negativo). Sinaliza bug no chamador e nunca é remendada em silêncio.
    #[error("Violação de invariante: {0}")]
    InvariantViolation(String),

    #[error("Organização sem presidente para receber o aviso")]
    NoRecipients,

    #[error("Convite inválido ou já utilizado")]
    InviteAlreadyUsed,

    #[error("Este convite expirou")]
    InviteExpired,

    #[error("Este convite é destinado a outro e-mail")]
    InviteEmailMismatch,

    // Variante para erros de banco de dados (transação abortada, timeout,
    // conexão). A operação inteira é atômica, então o chamador pode
    // simplesmente reenviar.
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado.
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),

    #[error("Fonte não encontrada: {0}")]
    FontNotFound(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::InvalidInput(ref msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::EmailAlreadyExists => {
                (StatusCode::CONFLICT, "Esse e-mail já está cadastrado. Faça login.".to_string())
            }
            AppError::SlugAlreadyExists => {
                (StatusCode::CONFLICT, "Esse slug já está em uso. Tente outro.".to_string())
            }
            AppError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "E-mail ou senha inválidos.".to_string())
            }
            AppError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "Token de autenticação inválido ou ausente.".to_string(),
            ),
            AppError::Forbidden => (
                StatusCode::FORBIDDEN,
                "Apenas o presidente pode realizar esta ação.".to_string(),
            ),
            AppError::NotFound(what) => {
                (StatusCode::NOT_FOUND, format!("{} não encontrado(a).", what))
            }
            AppError::ProductInactive => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "Produto inativo não pode ser vendido.".to_string(),
            ),
            AppError::InvalidStateTransition { from } => (
                StatusCode::CONFLICT,
                format!("Venda já está '{}' e não pode mudar de status.", from),
            ),
            AppError::InvariantViolation(ref msg) => {
                // Sinal de bug: loga com destaque e devolve resposta genérica.
                tracing::error!("Violação de invariante: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Inconsistência interna detectada.".to_string(),
                )
            }
            AppError::NoRecipients => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "A organização não possui presidente para receber o aviso.".to_string(),
            ),
            AppError::InviteAlreadyUsed => {
                (StatusCode::NOT_FOUND, "Convite inválido ou já utilizado.".to_string())
            }
            AppError::InviteExpired => (StatusCode::GONE, "Este convite expirou.".to_string()),
            AppError::InviteEmailMismatch => (
                StatusCode::FORBIDDEN,
                "Este convite é destinado a outro e-mail.".to_string(),
            ),

            // Todos os outros erros (DatabaseError, InternalServerError...) viram 500.
            // O `tracing` loga a mensagem detalhada que o `thiserror` nos deu.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Ocorreu um erro inesperado.".to_string())
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
