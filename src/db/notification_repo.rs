// src/db/notification_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::notifications::{InboxEntry, Notification, NotificationType},
};

#[derive(Clone)]
pub struct NotificationRepository {
    pool: PgPool,
}

impl NotificationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert<'e, E>(
        &self,
        executor: E,
        org_id: Uuid,
        from_user: Uuid,
        to_user: Uuid,
        sale_id: Option<Uuid>,
        message: &str,
        kind: NotificationType,
    ) -> Result<Notification, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let notification = sqlx::query_as::<_, Notification>(
            r#"
            INSERT INTO notifications (org_id, from_user, to_user, sale_id, message, type)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(org_id)
        .bind(from_user)
        .bind(to_user)
        .bind(sale_id)
        .bind(message)
        .bind(kind)
        .fetch_one(executor)
        .await?;
        Ok(notification)
    }

    // Caixa de entrada do usuário, mais recentes primeiro.
    pub async fn inbox(&self, user_id: Uuid, limit: i64) -> Result<Vec<InboxEntry>, AppError> {
        let entries = sqlx::query_as::<_, InboxEntry>(
            r#"
            SELECT n.id, n.from_user, u.name AS from_user_name, n.to_user,
                   n.sale_id, n.message, n.type, n.read, n.created_at
            FROM notifications n
            JOIN users u ON u.id = n.from_user
            WHERE n.to_user = $1
            ORDER BY n.created_at DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(entries)
    }

    pub async fn unread_count(&self, user_id: Uuid) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM notifications WHERE to_user = $1 AND NOT read",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    // Só o destinatário consegue marcar como lida.
    pub async fn mark_read(&self, user_id: Uuid, notification_id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE notifications SET read = TRUE WHERE id = $1 AND to_user = $2",
        )
        .bind(notification_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Notificação"));
        }
        Ok(())
    }

    pub async fn mark_all_read(&self, user_id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query(
            "UPDATE notifications SET read = TRUE WHERE to_user = $1 AND NOT read",
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }
}
