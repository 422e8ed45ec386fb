// src/routes.rs

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{get, post, put},
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{config::AppState, docs::ApiDoc, handlers, middleware::auth::auth_guard};

/// Monta o router completo da aplicação.
pub fn app(app_state: AppState) -> Router {
    // Rotas de autenticação (públicas)
    let auth_routes = Router::new()
        .route("/signup", post(handlers::auth::signup))
        .route("/login", post(handlers::auth::login))
        .route("/accept-invite", post(handlers::auth::accept_invite))
        .merge(
            Router::new().route("/me", get(handlers::auth::get_me)).layer(
                axum_middleware::from_fn_with_state(app_state.clone(), auth_guard),
            ),
        );

    // Vitrine pública: listagem de atléticas e landing por slug
    let public_org_routes = Router::new()
        .route("/", get(handlers::orgs::list_public_orgs))
        .route("/{slug}", get(handlers::orgs::storefront));

    // Configurações da organização (protegidas)
    let org_routes = Router::new()
        .route("/", get(handlers::orgs::my_org).put(handlers::orgs::update_org))
        .layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard));

    // Ciclo de vida da venda
    let sales_routes = Router::new()
        .route("/", post(handlers::sales::register_sale).get(handlers::sales::list_sales))
        .route("/{id}", get(handlers::sales::get_sale))
        .route("/{id}/cancel", post(handlers::sales::cancel_sale))
        .route("/{id}/deliver", post(handlers::sales::confirm_delivery))
        .route("/{id}/report-error", post(handlers::sales::report_error))
        .route("/{id}/receipt", get(handlers::sales::sale_receipt))
        .layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard));

    let deliveries_routes = Router::new()
        .route("/", get(handlers::deliveries::delivery_queues))
        .layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard));

    // Catálogo (estoque)
    let products_routes = Router::new()
        .route(
            "/",
            post(handlers::products::create_product).get(handlers::products::list_products),
        )
        .route(
            "/{id}",
            get(handlers::products::get_product).put(handlers::products::update_product),
        )
        .layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard));

    let tags_routes = Router::new()
        .route("/", post(handlers::tags::create_tag).get(handlers::tags::list_tags))
        .route("/{id}", axum::routing::delete(handlers::tags::delete_tag))
        .layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard));

    // Membros e convites
    let members_routes = Router::new()
        .route("/", get(handlers::members::list_members).post(handlers::members::create_member))
        .route("/{id}/active", put(handlers::members::set_member_active))
        .route("/transfer-presidency", post(handlers::members::transfer_presidency))
        .layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard));

    let invites_routes = Router::new()
        .route("/", get(handlers::invites::list_invites).post(handlers::invites::create_invite))
        .route("/{id}", axum::routing::delete(handlers::invites::revoke_invite))
        .layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard));

    // Caixa de notificações + feed em tempo real
    let notifications_routes = Router::new()
        .route("/", get(handlers::notifications::inbox))
        .route("/unread-count", get(handlers::notifications::unread_count))
        .route("/stream", get(handlers::notifications::stream))
        .route("/read-all", post(handlers::notifications::mark_all_read))
        .route("/{id}/read", post(handlers::notifications::mark_read))
        .layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard));

    let dashboard_routes = Router::new()
        .route("/summary", get(handlers::dashboard::get_summary))
        .layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard));

    // Combina tudo no router principal
    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .nest("/api/orgs", public_org_routes)
        .nest("/api/org", org_routes)
        .nest("/api/sales", sales_routes)
        .nest("/api/deliveries", deliveries_routes)
        .nest("/api/products", products_routes)
        .nest("/api/tags", tags_routes)
        .nest("/api/members", members_routes)
        .nest("/api/invites", invites_routes)
        .nest("/api/notifications", notifications_routes)
        .nest("/api/dashboard", dashboard_routes)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(app_state)
}
