// src/db/tag_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{common::error::AppError, models::sales::Tag};

#[derive(Clone)]
pub struct TagRepository {
    pool: PgPool,
}

impl TagRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, org_id: Uuid) -> Result<Vec<Tag>, AppError> {
        let tags = sqlx::query_as::<_, Tag>(
            "SELECT * FROM tags WHERE org_id = $1 ORDER BY name ASC",
        )
        .bind(org_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(tags)
    }

    pub async fn create(&self, org_id: Uuid, name: &str, color: &str) -> Result<Tag, AppError> {
        sqlx::query_as::<_, Tag>(
            "INSERT INTO tags (org_id, name, color) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(org_id)
        .bind(name)
        .bind(color)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::InvalidInput("Já existe uma tag com esse nome.".to_string());
                }
            }
            AppError::DatabaseError(e)
        })
    }

    pub async fn delete(&self, org_id: Uuid, tag_id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM tags WHERE org_id = $1 AND id = $2")
            .bind(org_id)
            .bind(tag_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Tag"));
        }
        Ok(())
    }

    pub async fn tags_for_sale(&self, sale_id: Uuid) -> Result<Vec<Tag>, AppError> {
        let tags = sqlx::query_as::<_, Tag>(
            r#"
            SELECT t.* FROM tags t
            JOIN sale_tags st ON st.tag_id = t.id
            WHERE st.sale_id = $1
            ORDER BY t.name ASC
            "#,
        )
        .bind(sale_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(tags)
    }
}
