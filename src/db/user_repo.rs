// src/db/user_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::auth::{User, UserRole},
};

// O repositório de usuários, responsável por todas as interações com a
// tabela 'users'.
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Busca um usuário pelo seu e-mail
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let maybe_user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(maybe_user)
    }

    // Busca um usuário pelo seu ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let maybe_user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(maybe_user)
    }

    // Cria um novo usuário. Participa da transação do chamador (cadastro de
    // atlética, resgate de convite, criação direta de membro).
    pub async fn create_user<'e, E>(
        &self,
        executor: E,
        email: &str,
        name: &str,
        password_hash: &str,
        role: UserRole,
        org_id: Uuid,
        created_by: Option<Uuid>,
    ) -> Result<User, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, name, password_hash, role, active, created_by, org_id)
            VALUES ($1, $2, $3, $4, TRUE, $5, $6)
            RETURNING *
            "#,
        )
        .bind(email)
        .bind(name)
        .bind(password_hash)
        .bind(role)
        .bind(created_by)
        .bind(org_id)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            // Converte violação de chave única em um erro mais amigável.
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::EmailAlreadyExists;
                }
            }
            AppError::DatabaseError(e)
        })
    }

    // Membros da organização, presidente primeiro.
    pub async fn list_by_org(&self, org_id: Uuid) -> Result<Vec<User>, AppError> {
        let members = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE org_id = $1 ORDER BY role ASC, name ASC",
        )
        .bind(org_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(members)
    }

    // Destinatários do fanout de notificações de erro.
    pub async fn find_presidentes<'e, E>(
        &self,
        executor: E,
        org_id: Uuid,
    ) -> Result<Vec<User>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let presidentes = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE org_id = $1 AND role = 'presidente' AND active",
        )
        .bind(org_id)
        .fetch_all(executor)
        .await?;
        Ok(presidentes)
    }

    pub async fn set_role<'e, E>(
        &self,
        executor: E,
        org_id: Uuid,
        user_id: Uuid,
        role: UserRole,
    ) -> Result<User, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, User>(
            "UPDATE users SET role = $3 WHERE id = $2 AND org_id = $1 RETURNING *",
        )
        .bind(org_id)
        .bind(user_id)
        .bind(role)
        .fetch_optional(executor)
        .await?
        .ok_or(AppError::NotFound("Membro"))
    }

    pub async fn set_active(
        &self,
        org_id: Uuid,
        user_id: Uuid,
        active: bool,
    ) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(
            "UPDATE users SET active = $3 WHERE id = $2 AND org_id = $1 RETURNING *",
        )
        .bind(org_id)
        .bind(user_id)
        .bind(active)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::NotFound("Membro"))
    }
}
