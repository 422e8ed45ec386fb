// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::signup,
        handlers::auth::login,
        handlers::auth::accept_invite,
        handlers::auth::get_me,

        // --- Orgs ---
        handlers::orgs::list_public_orgs,
        handlers::orgs::storefront,
        handlers::orgs::my_org,
        handlers::orgs::update_org,

        // --- Sales ---
        handlers::sales::register_sale,
        handlers::sales::list_sales,
        handlers::sales::get_sale,
        handlers::sales::cancel_sale,
        handlers::sales::confirm_delivery,
        handlers::sales::report_error,
        handlers::sales::sale_receipt,

        // --- Deliveries ---
        handlers::deliveries::delivery_queues,

        // --- Products ---
        handlers::products::list_products,
        handlers::products::get_product,
        handlers::products::create_product,
        handlers::products::update_product,

        // --- Members & Invites ---
        handlers::members::list_members,
        handlers::members::create_member,
        handlers::members::set_member_active,
        handlers::members::transfer_presidency,
        handlers::invites::list_invites,
        handlers::invites::create_invite,
        handlers::invites::revoke_invite,

        // --- Notifications ---
        handlers::notifications::inbox,
        handlers::notifications::unread_count,
        handlers::notifications::stream,

        // --- Dashboard ---
        handlers::dashboard::get_summary,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::UserRole,
            models::auth::User,
            models::auth::SignupPayload,
            models::auth::LoginPayload,
            models::auth::AcceptInvitePayload,
            models::auth::CreateMemberPayload,
            models::auth::AuthResponse,

            // --- Orgs ---
            models::org::SubscriptionPlan,
            models::org::SubscriptionStatus,
            models::org::Organization,
            models::org::PublicOrgSummary,
            models::org::Storefront,
            models::org::UpdateOrganizationPayload,

            // --- Catalog ---
            models::catalog::ProductType,
            models::catalog::Product,
            models::catalog::CreateProductPayload,
            models::catalog::UpdateProductPayload,

            // --- Sales ---
            models::sales::PaymentMethod,
            models::sales::SaleStatus,
            models::sales::Sale,
            models::sales::SaleItem,
            models::sales::SaleItemDetail,
            models::sales::SaleDetail,
            models::sales::Delivery,
            models::sales::Tag,
            models::sales::LineItemInput,
            models::sales::RegisterSalePayload,
            models::sales::ConfirmDeliveryPayload,
            models::sales::ReportErrorPayload,
            models::sales::CreateTagPayload,

            // --- Invites ---
            models::invites::Invite,
            models::invites::CreateInvitePayload,

            // --- Notifications ---
            models::notifications::NotificationType,
            models::notifications::Notification,
            models::notifications::InboxEntry,
            models::notifications::UnreadCount,

            // --- Dashboard ---
            models::dashboard::DashboardSummary,
            models::dashboard::PaymentBreakdownEntry,
            models::dashboard::TopSellerEntry,

            // --- Payloads de handlers ---
            handlers::deliveries::DeliveryQueues,
            handlers::members::SetActivePayload,
            handlers::members::TransferPresidencyPayload,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação, cadastro e convites"),
        (name = "Orgs", description = "Vitrine pública e configurações da atlética"),
        (name = "Sales", description = "Ciclo de vida das vendas"),
        (name = "Deliveries", description = "Fila de entregas"),
        (name = "Products", description = "Catálogo de produtos"),
        (name = "Members", description = "Membros, convites e presidência"),
        (name = "Notifications", description = "Caixa de notificações e feed em tempo real"),
        (name = "Dashboard", description = "Indicadores da atlética")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
