// src/models/invites.rs

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::error::AppError;
use crate::models::auth::UserRole;

// Alfabeto sem caracteres ambíguos (I/O/0/1) para códigos ditados em voz
// alta ou copiados à mão.
pub const INVITE_CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
pub const INVITE_CODE_LEN: usize = 8;
pub const INVITE_TTL_DAYS: i64 = 7;

/// Gera um código de convite aleatório de 8 caracteres.
pub fn generate_invite_code() -> String {
    let mut rng = rand::thread_rng();
    (0..INVITE_CODE_LEN)
        .map(|_| {
            let idx = rng.gen_range(0..INVITE_CODE_ALPHABET.len());
            INVITE_CODE_ALPHABET[idx] as char
        })
        .collect()
}

/// Validade padrão de um convite criado agora.
pub fn default_expiry(now: DateTime<Utc>) -> DateTime<Utc> {
    now + Duration::days(INVITE_TTL_DAYS)
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Invite {
    pub id: Uuid,
    #[schema(ignore)]
    pub org_id: Uuid,
    #[schema(example = "K7M2P9QA")]
    pub code: String,
    pub role: UserRole,
    // Restrição opcional: só este e-mail pode resgatar.
    pub email: Option<String>,
    pub created_by: Uuid,
    pub used_by: Option<Uuid>,
    pub used_at: Option<DateTime<Utc>>,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Invite {
    /// Regras de resgate: uso único, dentro da validade e, se o convite
    /// carrega restrição de e-mail, o e-mail precisa bater
    /// (case-insensitive).
    pub fn ensure_redeemable(&self, email: &str, now: DateTime<Utc>) -> Result<(), AppError> {
        if self.used_by.is_some() {
            return Err(AppError::InviteAlreadyUsed);
        }
        if now > self.expires_at {
            return Err(AppError::InviteExpired);
        }
        if let Some(restricted) = &self.email {
            if !restricted.eq_ignore_ascii_case(email.trim()) {
                return Err(AppError::InviteEmailMismatch);
            }
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvitePayload {
    #[serde(default = "default_invite_role")]
    pub role: UserRole,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: Option<String>,
}

fn default_invite_role() -> UserRole {
    UserRole::Membro
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invite(now: DateTime<Utc>) -> Invite {
        Invite {
            id: Uuid::new_v4(),
            org_id: Uuid::new_v4(),
            code: generate_invite_code(),
            role: UserRole::Membro,
            email: None,
            created_by: Uuid::new_v4(),
            used_by: None,
            used_at: None,
            expires_at: default_expiry(now),
            created_at: now,
        }
    }

    #[test]
    fn codigo_tem_8_caracteres_do_alfabeto_restrito() {
        for _ in 0..50 {
            let code = generate_invite_code();
            assert_eq!(code.len(), INVITE_CODE_LEN);
            assert!(code.bytes().all(|b| INVITE_CODE_ALPHABET.contains(&b)));
            // Glifos ambíguos nunca aparecem.
            assert!(!code.contains(['I', 'O', '0', '1']));
        }
    }

    #[test]
    fn convite_novo_e_resgatavel() {
        let now = Utc::now();
        let inv = invite(now);
        assert!(inv.ensure_redeemable("alguem@exemplo.com", now).is_ok());
    }

    #[test]
    fn convite_usado_nao_resgata_de_novo() {
        let now = Utc::now();
        let mut inv = invite(now);
        inv.used_by = Some(Uuid::new_v4());
        inv.used_at = Some(now);
        let err = inv.ensure_redeemable("alguem@exemplo.com", now).unwrap_err();
        assert!(matches!(err, AppError::InviteAlreadyUsed));
    }

    #[test]
    fn convite_expirado_nao_resgata_mesmo_sem_uso() {
        let now = Utc::now();
        let inv = invite(now);
        let after_expiry = inv.expires_at + Duration::seconds(1);
        let err = inv.ensure_redeemable("alguem@exemplo.com", after_expiry).unwrap_err();
        assert!(matches!(err, AppError::InviteExpired));
    }

    #[test]
    fn restricao_de_email_e_case_insensitive() {
        let now = Utc::now();
        let mut inv = invite(now);
        inv.email = Some("Convidado@Exemplo.com".to_string());

        assert!(inv.ensure_redeemable("convidado@exemplo.com", now).is_ok());
        assert!(inv.ensure_redeemable(" convidado@exemplo.com ", now).is_ok());

        let err = inv.ensure_redeemable("outro@exemplo.com", now).unwrap_err();
        assert!(matches!(err, AppError::InviteEmailMismatch));
    }

    #[test]
    fn validade_padrao_e_de_7_dias() {
        let now = Utc::now();
        assert_eq!(default_expiry(now) - now, Duration::days(7));
    }
}
