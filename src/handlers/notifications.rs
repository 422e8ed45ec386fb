// src/handlers/notifications.rs

use std::convert::Infallible;

use axum::{
    Json,
    extract::{Path, State},
    response::{
        IntoResponse,
        sse::{Event, KeepAlive, Sse},
    },
};
use futures::{Stream, StreamExt};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::notifications::{InboxEntry, UnreadCount},
};

#[utoipa::path(
    get,
    path = "/api/notifications",
    tag = "Notifications",
    responses((status = 200, body = [InboxEntry])),
    security(("api_jwt" = []))
)]
pub async fn inbox(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let entries = app_state.notification_service.inbox(user.id).await?;
    Ok(Json(entries))
}

#[utoipa::path(
    get,
    path = "/api/notifications/unread-count",
    tag = "Notifications",
    responses((status = 200, body = UnreadCount)),
    security(("api_jwt" = []))
)]
pub async fn unread_count(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let unread = app_state.notification_service.unread_count(user.id).await?;
    Ok(Json(UnreadCount { unread }))
}

pub async fn mark_read(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.notification_service.mark_read(user.id, id).await?;
    Ok(Json(serde_json::json!({ "ok": true })))
}

pub async fn mark_all_read(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let updated = app_state.notification_service.mark_all_read(user.id).await?;
    Ok(Json(serde_json::json!({ "updated": updated })))
}

// Feed em tempo real via SSE: o cliente assina a própria caixa e recebe
// cada notificação nova como um evento, sem polling.
#[utoipa::path(
    get,
    path = "/api/notifications/stream",
    tag = "Notifications",
    responses((status = 200, description = "Stream SSE de notificações")),
    security(("api_jwt" = []))
)]
pub async fn stream(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let subscription = app_state.notification_service.subscribe(user.id).await;

    let stream = subscription.into_stream().filter_map(|notification| async move {
        match Event::default().event("notification").json_data(&notification) {
            Ok(event) => Some(Ok(event)),
            Err(e) => {
                tracing::error!("falha ao serializar notificação para SSE: {}", e);
                None
            }
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
