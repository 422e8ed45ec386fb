// src/services/auth_service.rs

use bcrypt::{hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{InviteRepository, OrgRepository, UserRepository},
    models::{
        auth::{AcceptInvitePayload, Claims, CreateMemberPayload, OrgContext, SignupPayload, User, UserRole},
        org::{Organization, normalize_slug},
    },
};

// Período de teste concedido no cadastro de uma atlética nova.
const TRIAL_DAYS: i64 = 14;

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    org_repo: OrgRepository,
    invite_repo: InviteRepository,
    jwt_secret: String,
    pool: PgPool,
}

impl AuthService {
    pub fn new(
        user_repo: UserRepository,
        org_repo: OrgRepository,
        invite_repo: InviteRepository,
        jwt_secret: String,
        pool: PgPool,
    ) -> Self {
        Self { user_repo, org_repo, invite_repo, jwt_secret, pool }
    }

    /// Cadastro de uma atlética nova: organização + primeiro presidente em
    /// uma única transação. Se a criação do usuário falhar, a organização
    /// criada um passo antes é desfeita junto.
    pub async fn signup(&self, payload: &SignupPayload) -> Result<(String, Organization), AppError> {
        let slug = normalize_slug(&payload.slug);
        if slug.len() < 2 {
            return Err(AppError::InvalidInput(
                "Slug deve ter pelo menos 2 caracteres".to_string(),
            ));
        }

        // Checagens amigáveis antes de gastar bcrypt. A unicidade de verdade
        // é garantida pelos índices únicos dentro da transação.
        if self.org_repo.find_by_slug(&slug).await?.is_some() {
            return Err(AppError::SlugAlreadyExists);
        }
        if self.user_repo.find_by_email(payload.email.trim()).await?.is_some() {
            return Err(AppError::EmailAlreadyExists);
        }

        let password_hash = Self::hash_password(&payload.password).await?;

        let mut tx = self.pool.begin().await?;

        let trial_ends_at = Utc::now() + Duration::days(TRIAL_DAYS);
        let org = self
            .org_repo
            .create(&mut *tx, &slug, payload.org_name.trim(), Some(trial_ends_at))
            .await?;

        let president = self
            .user_repo
            .create_user(
                &mut *tx,
                payload.email.trim(),
                payload.president_name.trim(),
                &password_hash,
                UserRole::Presidente,
                org.id,
                None,
            )
            .await?;

        tx.commit().await?;

        tracing::info!(org = %org.slug, "atlética cadastrada");

        let token = self.create_token(president.id)?;
        Ok((token, org))
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<String, AppError> {
        let user = self
            .user_repo
            .find_by_email(email.trim())
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if !user.active {
            return Err(AppError::InvalidCredentials);
        }

        let password_clone = password.to_owned();
        let password_hash_clone = user.password_hash.clone();

        // Executa a verificação em um thread separado
        let is_password_valid = tokio::task::spawn_blocking(move || {
            verify(&password_clone, &password_hash_clone)
        })
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }

        self.create_token(user.id)
    }

    /// Entrada via convite: valida as regras de resgate (uso único,
    /// validade, restrição de e-mail), cria o usuário com o papel do convite
    /// e marca o convite como usado — tudo na mesma transação, com o convite
    /// trancado contra resgates simultâneos.
    pub async fn accept_invite(&self, payload: &AcceptInvitePayload) -> Result<String, AppError> {
        let password_hash = Self::hash_password(&payload.password).await?;

        let mut tx = self.pool.begin().await?;

        let invite = self
            .invite_repo
            .lock_by_code(&mut *tx, payload.code.trim())
            .await?
            .ok_or(AppError::InviteAlreadyUsed)?;

        invite.ensure_redeemable(&payload.email, Utc::now())?;

        let new_user = self
            .user_repo
            .create_user(
                &mut *tx,
                payload.email.trim(),
                payload.name.trim(),
                &password_hash,
                invite.role,
                invite.org_id,
                Some(invite.created_by),
            )
            .await?;

        self.invite_repo.mark_used(&mut *tx, invite.id, new_user.id).await?;

        tx.commit().await?;

        tracing::info!(invite = %invite.code, "convite resgatado");

        self.create_token(new_user.id)
    }

    /// Presidente cadastra um membro diretamente, sem convite.
    pub async fn create_member(
        &self,
        ctx: &OrgContext,
        payload: &CreateMemberPayload,
    ) -> Result<User, AppError> {
        ctx.ensure_presidente()?;

        let password_hash = Self::hash_password(&payload.password).await?;

        self.user_repo
            .create_user(
                &self.pool,
                payload.email.trim(),
                payload.name.trim(),
                &password_hash,
                payload.role,
                ctx.org_id,
                Some(ctx.user_id),
            )
            .await
    }

    pub async fn validate_token(&self, token: &str) -> Result<User, AppError> {
        let validation = Validation::default();
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &validation,
        )
        .map_err(|_| AppError::InvalidToken)?;

        let user = self
            .user_repo
            .find_by_id(token_data.claims.sub)
            .await?
            .ok_or(AppError::NotFound("Usuário"))?;

        // Conta desativada perde o acesso mesmo com token ainda válido.
        if !user.active {
            return Err(AppError::InvalidToken);
        }

        Ok(user)
    }

    fn create_token(&self, user_id: Uuid) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + Duration::days(7);

        let claims = Claims {
            sub: user_id,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }

    // Hashing fora do executor async (bcrypt é CPU-bound).
    async fn hash_password(password: &str) -> Result<String, AppError> {
        let password_clone = password.to_owned();
        let hashed = tokio::task::spawn_blocking(move || hash(&password_clone, bcrypt::DEFAULT_COST))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;
        Ok(hashed)
    }
}
