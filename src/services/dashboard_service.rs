// src/services/dashboard_service.rs

use crate::{
    common::error::AppError,
    db::DashboardRepository,
    models::{auth::OrgContext, dashboard::DashboardSummary},
};
use sqlx::PgPool;

#[derive(Clone)]
pub struct DashboardService {
    repo: DashboardRepository,
    pool: PgPool,
}

impl DashboardService {
    pub fn new(repo: DashboardRepository, pool: PgPool) -> Self {
        Self { repo, pool }
    }

    pub async fn get_summary(&self, ctx: &OrgContext) -> Result<DashboardSummary, AppError> {
        self.repo.get_summary(&self.pool, ctx.org_id).await
    }
}
