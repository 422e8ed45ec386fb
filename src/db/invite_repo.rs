// src/db/invite_repo.rs

use chrono::{DateTime, Utc};
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{auth::UserRole, invites::Invite},
};

#[derive(Clone)]
pub struct InviteRepository {
    pool: PgPool,
}

impl InviteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(
        &self,
        org_id: Uuid,
        code: &str,
        role: UserRole,
        email: Option<&str>,
        created_by: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<Invite, AppError> {
        let invite = sqlx::query_as::<_, Invite>(
            r#"
            INSERT INTO invites (org_id, code, role, email, created_by, expires_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(org_id)
        .bind(code)
        .bind(role)
        .bind(email)
        .bind(created_by)
        .bind(expires_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(invite)
    }

    /// Busca com lock de linha. O resgate roda dentro de uma transação e o
    /// `FOR UPDATE` impede dois cadastros simultâneos com o mesmo código.
    pub async fn lock_by_code<'e, E>(
        &self,
        executor: E,
        code: &str,
    ) -> Result<Option<Invite>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let invite = sqlx::query_as::<_, Invite>(
            "SELECT * FROM invites WHERE code = $1 FOR UPDATE",
        )
        .bind(code)
        .fetch_optional(executor)
        .await?;
        Ok(invite)
    }

    pub async fn mark_used<'e, E>(
        &self,
        executor: E,
        invite_id: Uuid,
        used_by: Uuid,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE invites SET used_by = $2, used_at = now() WHERE id = $1")
            .bind(invite_id)
            .bind(used_by)
            .execute(executor)
            .await?;
        Ok(())
    }

    pub async fn list(&self, org_id: Uuid) -> Result<Vec<Invite>, AppError> {
        let invites = sqlx::query_as::<_, Invite>(
            "SELECT * FROM invites WHERE org_id = $1 ORDER BY created_at DESC",
        )
        .bind(org_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(invites)
    }

    // Convites já usados ficam no histórico; só os pendentes podem ser
    // revogados.
    pub async fn delete_unused(&self, org_id: Uuid, invite_id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query(
            "DELETE FROM invites WHERE org_id = $1 AND id = $2 AND used_by IS NULL",
        )
        .bind(org_id)
        .bind(invite_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Convite"));
        }
        Ok(())
    }
}
