// src/db/org_repo.rs

use chrono::{DateTime, Utc};
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::org::{Organization, PublicOrgSummary, UpdateOrganizationPayload},
};

#[derive(Clone)]
pub struct OrgRepository {
    pool: PgPool,
}

impl OrgRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Organization>, AppError> {
        let org = sqlx::query_as::<_, Organization>("SELECT * FROM organizations WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(org)
    }

    pub async fn find_by_slug(&self, slug: &str) -> Result<Option<Organization>, AppError> {
        let org = sqlx::query_as::<_, Organization>("SELECT * FROM organizations WHERE slug = $1")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;
        Ok(org)
    }

    // Cria a organização no cadastro. Faz parte da mesma transação que cria
    // o primeiro presidente.
    pub async fn create<'e, E>(
        &self,
        executor: E,
        slug: &str,
        name: &str,
        trial_ends_at: Option<DateTime<Utc>>,
    ) -> Result<Organization, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Organization>(
            r#"
            INSERT INTO organizations (slug, name, hero_title, trial_ends_at)
            VALUES ($1, $2, $2, $3)
            RETURNING *
            "#,
        )
        .bind(slug)
        .bind(name)
        .bind(trial_ends_at)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::SlugAlreadyExists;
                }
            }
            AppError::DatabaseError(e)
        })
    }

    // Atualização parcial: campos ausentes do payload ficam como estão
    // (COALESCE com o valor atual).
    pub async fn update(
        &self,
        org_id: Uuid,
        slug: Option<&str>,
        payload: &UpdateOrganizationPayload,
    ) -> Result<Organization, AppError> {
        sqlx::query_as::<_, Organization>(
            r#"
            UPDATE organizations SET
                name            = COALESCE($2, name),
                slug            = COALESCE($3, slug),
                logo_url        = COALESCE($4, logo_url),
                primary_color   = COALESCE($5, primary_color),
                secondary_color = COALESCE($6, secondary_color),
                accent_color    = COALESCE($7, accent_color),
                bg_color        = COALESCE($8, bg_color),
                instagram_url   = COALESCE($9, instagram_url),
                twitter_url     = COALESCE($10, twitter_url),
                youtube_url     = COALESCE($11, youtube_url),
                whatsapp        = COALESCE($12, whatsapp),
                hero_title      = COALESCE($13, hero_title),
                hero_heading    = COALESCE($14, hero_heading),
                hero_subtitle   = COALESCE($15, hero_subtitle),
                about_text      = COALESCE($16, about_text),
                gallery_photos  = COALESCE($17, gallery_photos),
                updated_at      = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(org_id)
        .bind(payload.name.as_deref())
        .bind(slug)
        .bind(payload.logo_url.as_deref())
        .bind(payload.primary_color.as_deref())
        .bind(payload.secondary_color.as_deref())
        .bind(payload.accent_color.as_deref())
        .bind(payload.bg_color.as_deref())
        .bind(payload.instagram_url.as_deref())
        .bind(payload.twitter_url.as_deref())
        .bind(payload.youtube_url.as_deref())
        .bind(payload.whatsapp.as_deref())
        .bind(payload.hero_title.as_deref())
        .bind(payload.hero_heading.as_deref())
        .bind(payload.hero_subtitle.as_deref())
        .bind(payload.about_text.as_deref())
        .bind(payload.gallery_photos.as_deref())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::SlugAlreadyExists;
                }
            }
            AppError::DatabaseError(e)
        })?
        .ok_or(AppError::NotFound("Organização"))
    }

    // Listagem pública: só atléticas com assinatura viva aparecem.
    pub async fn list_public(&self) -> Result<Vec<PublicOrgSummary>, AppError> {
        let orgs = sqlx::query_as::<_, PublicOrgSummary>(
            r#"
            SELECT slug, name, logo_url, primary_color, secondary_color,
                   accent_color, hero_subtitle, subscription_status
            FROM organizations
            WHERE subscription_status NOT IN ('canceled', 'expired')
            ORDER BY name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(orgs)
    }
}
