// src/config.rs

use std::{env, sync::Arc, time::Duration};

use sqlx::{PgPool, postgres::PgPoolOptions};

use crate::{
    db::{
        DashboardRepository, InviteRepository, NotificationRepository, OrgRepository,
        ProductRepository, SaleRepository, TagRepository, UserRepository,
    },
    realtime::BroadcastFeed,
    services::{
        AuthService, CatalogService, DashboardService, DocumentService, MembershipService,
        NotificationService, OrgService, SaleService,
    },
};

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub auth_service: AuthService,
    pub sale_service: SaleService,
    pub catalog_service: CatalogService,
    pub membership_service: MembershipService,
    pub org_service: OrgService,
    pub notification_service: NotificationService,
    pub dashboard_service: DashboardService,
    pub document_service: DocumentService,
}

impl AppState {
    // Carrega as configurações do ambiente e monta o gráfico de
    // dependências (repositórios -> services).
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET deve ser definido");
        let public_url =
            env::var("APP_PUBLIC_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());

        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        Ok(Self::with_pool(db_pool, jwt_secret, public_url))
    }

    pub fn with_pool(db_pool: PgPool, jwt_secret: String, public_url: String) -> Self {
        // --- Repositórios ---
        let user_repo = UserRepository::new(db_pool.clone());
        let org_repo = OrgRepository::new(db_pool.clone());
        let product_repo = ProductRepository::new(db_pool.clone());
        let sale_repo = SaleRepository::new(db_pool.clone());
        let tag_repo = TagRepository::new(db_pool.clone());
        let notification_repo = NotificationRepository::new(db_pool.clone());
        let invite_repo = InviteRepository::new(db_pool.clone());
        let dashboard_repo = DashboardRepository::new(db_pool.clone());

        // --- Feed em tempo real (um canal por processo) ---
        let feed = Arc::new(BroadcastFeed::new());

        // --- Services ---
        let auth_service = AuthService::new(
            user_repo.clone(),
            org_repo.clone(),
            invite_repo.clone(),
            jwt_secret,
            db_pool.clone(),
        );
        let notification_service = NotificationService::new(
            notification_repo,
            user_repo.clone(),
            feed,
            db_pool.clone(),
        );
        let sale_service = SaleService::new(
            sale_repo.clone(),
            product_repo.clone(),
            tag_repo,
            notification_service.clone(),
            db_pool.clone(),
        );
        let catalog_service = CatalogService::new(product_repo.clone());
        let membership_service =
            MembershipService::new(user_repo, invite_repo, db_pool.clone());
        let org_service = OrgService::new(org_repo.clone(), product_repo);
        let dashboard_service = DashboardService::new(dashboard_repo, db_pool.clone());
        let document_service = DocumentService::new(sale_repo, org_repo, public_url);

        Self {
            db_pool,
            auth_service,
            sale_service,
            catalog_service,
            membership_service,
            org_service,
            notification_service,
            dashboard_service,
            document_service,
        }
    }
}
