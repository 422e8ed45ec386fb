pub mod auth_service;
pub use auth_service::AuthService;
pub mod catalog_service;
pub use catalog_service::CatalogService;
pub mod dashboard_service;
pub use dashboard_service::DashboardService;
pub mod document_service;
pub use document_service::DocumentService;
pub mod membership_service;
pub use membership_service::MembershipService;
pub mod notification_service;
pub use notification_service::NotificationService;
pub mod org_service;
pub use org_service::OrgService;
pub mod sale_service;
pub use sale_service::SaleService;
