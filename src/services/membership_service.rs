// src/services/membership_service.rs

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{InviteRepository, UserRepository},
    models::{
        auth::{OrgContext, User, UserRole},
        invites::{CreateInvitePayload, Invite, default_expiry, generate_invite_code},
    },
};

/// Gestão de membros e convites da atlética.
#[derive(Clone)]
pub struct MembershipService {
    user_repo: UserRepository,
    invite_repo: InviteRepository,
    pool: PgPool,
}

impl MembershipService {
    pub fn new(user_repo: UserRepository, invite_repo: InviteRepository, pool: PgPool) -> Self {
        Self { user_repo, invite_repo, pool }
    }

    pub async fn list_members(&self, ctx: &OrgContext) -> Result<Vec<User>, AppError> {
        self.user_repo.list_by_org(ctx.org_id).await
    }

    pub async fn set_member_active(
        &self,
        ctx: &OrgContext,
        member_id: Uuid,
        active: bool,
    ) -> Result<User, AppError> {
        ctx.ensure_presidente()?;

        if member_id == ctx.user_id {
            return Err(AppError::InvalidInput(
                "Você não pode desativar a própria conta.".to_string(),
            ));
        }

        self.user_repo.set_active(ctx.org_id, member_id, active).await
    }

    /// Transfere a presidência numa ÚNICA transação: rebaixa o presidente
    /// atual e promove o novo na mesma unidade atômica. Não existe janela
    /// em que a organização fique com zero (ou dois) presidentes.
    pub async fn transfer_presidency(
        &self,
        ctx: &OrgContext,
        new_president_id: Uuid,
    ) -> Result<User, AppError> {
        ctx.ensure_presidente()?;

        if new_president_id == ctx.user_id {
            return Err(AppError::InvalidInput(
                "Você já é o presidente da atlética.".to_string(),
            ));
        }

        let target = self
            .user_repo
            .find_by_id(new_president_id)
            .await?
            .filter(|u| u.org_id == Some(ctx.org_id))
            .ok_or(AppError::NotFound("Membro"))?;

        if !target.active {
            return Err(AppError::InvalidInput(
                "Não é possível transferir a presidência para um membro inativo.".to_string(),
            ));
        }

        let mut tx = self.pool.begin().await?;

        self.user_repo
            .set_role(&mut *tx, ctx.org_id, ctx.user_id, UserRole::Membro)
            .await?;
        let promoted = self
            .user_repo
            .set_role(&mut *tx, ctx.org_id, new_president_id, UserRole::Presidente)
            .await?;

        tx.commit().await?;

        tracing::info!(
            from = %ctx.user_id,
            to = %new_president_id,
            "presidência transferida"
        );

        Ok(promoted)
    }

    // --- Convites ---

    pub async fn create_invite(
        &self,
        ctx: &OrgContext,
        payload: &CreateInvitePayload,
    ) -> Result<Invite, AppError> {
        ctx.ensure_presidente()?;

        let code = generate_invite_code();
        let email = payload
            .email
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty());

        self.invite_repo
            .insert(ctx.org_id, &code, payload.role, email, ctx.user_id, default_expiry(Utc::now()))
            .await
    }

    pub async fn list_invites(&self, ctx: &OrgContext) -> Result<Vec<Invite>, AppError> {
        ctx.ensure_presidente()?;
        self.invite_repo.list(ctx.org_id).await
    }

    pub async fn revoke_invite(&self, ctx: &OrgContext, invite_id: Uuid) -> Result<(), AppError> {
        ctx.ensure_presidente()?;
        self.invite_repo.delete_unused(ctx.org_id, invite_id).await
    }
}
