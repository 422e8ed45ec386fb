// src/models/notifications.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "notification_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum NotificationType {
    Erro,
    Info,
    Cancelamento,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Uuid,
    #[schema(ignore)]
    pub org_id: Uuid,
    pub from_user: Uuid,
    pub to_user: Uuid,
    pub sale_id: Option<Uuid>,
    pub message: String,
    #[serde(rename = "type")]
    pub r#type: NotificationType,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

// Entrada da caixa de notificações com o nome de quem enviou.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InboxEntry {
    pub id: Uuid,
    pub from_user: Uuid,
    pub from_user_name: String,
    pub to_user: Uuid,
    pub sale_id: Option<Uuid>,
    pub message: String,
    #[serde(rename = "type")]
    pub r#type: NotificationType,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UnreadCount {
    pub unread: i64,
}
