pub mod user_repo;
pub use user_repo::UserRepository;
pub mod org_repo;
pub use org_repo::OrgRepository;
pub mod product_repo;
pub use product_repo::ProductRepository;
pub mod sale_repo;
pub use sale_repo::SaleRepository;
pub mod tag_repo;
pub use tag_repo::TagRepository;
pub mod notification_repo;
pub use notification_repo::NotificationRepository;
pub mod invite_repo;
pub use invite_repo::InviteRepository;
pub mod dashboard_repo;
pub use dashboard_repo::DashboardRepository;
