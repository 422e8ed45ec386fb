// src/services/notification_service.rs

use std::sync::Arc;

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{NotificationRepository, UserRepository},
    models::{
        auth::OrgContext,
        notifications::{InboxEntry, Notification, NotificationType},
        sales::Sale,
    },
    realtime::{ChangeFeed, NotificationStream},
};

/// Fanout e caixa de entrada de notificações.
///
/// A criação é push-style: quem dispara a operação grava as notificações de
/// todos os destinatários antes de reportar sucesso; os assinantes do feed
/// recebem o evento sem polling.
#[derive(Clone)]
pub struct NotificationService {
    notification_repo: NotificationRepository,
    user_repo: UserRepository,
    feed: Arc<dyn ChangeFeed>,
    pool: PgPool,
}

impl NotificationService {
    pub fn new(
        notification_repo: NotificationRepository,
        user_repo: UserRepository,
        feed: Arc<dyn ChangeFeed>,
        pool: PgPool,
    ) -> Self {
        Self { notification_repo, user_repo, feed, pool }
    }

    /// Report de erro em uma venda: uma notificação `erro` para cada
    /// presidente da organização, num único lote transacional.
    ///
    /// Organização sem presidente ativo é um estado que o invariante de
    /// membresia não deveria permitir, mas é tratado (`NoRecipients`) em
    /// vez de assumido.
    pub async fn fan_out_error(
        &self,
        ctx: &OrgContext,
        sale: &Sale,
        message: &str,
    ) -> Result<Vec<Notification>, AppError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(AppError::InvalidInput("Descreva o problema encontrado.".to_string()));
        }

        let presidentes = self.user_repo.find_presidentes(&self.pool, ctx.org_id).await?;
        if presidentes.is_empty() {
            return Err(AppError::NoRecipients);
        }

        let mut tx = self.pool.begin().await?;
        let mut created = Vec::with_capacity(presidentes.len());
        for presidente in &presidentes {
            let notification = self
                .notification_repo
                .insert(
                    &mut *tx,
                    ctx.org_id,
                    ctx.user_id,
                    presidente.id,
                    Some(sale.id),
                    message,
                    NotificationType::Erro,
                )
                .await?;
            created.push(notification);
        }
        tx.commit().await?;

        for notification in &created {
            self.feed.publish(notification.clone()).await;
        }

        tracing::info!(
            sale_id = %sale.id,
            recipients = created.len(),
            "erro reportado aos presidentes"
        );

        Ok(created)
    }

    /// Aviso de cancelamento para o vendedor da venda.
    pub async fn notify_cancellation(
        &self,
        ctx: &OrgContext,
        sale: &Sale,
    ) -> Result<Notification, AppError> {
        let message = format!("A venda para {} foi cancelada.", sale.buyer_name);
        let notification = self
            .notification_repo
            .insert(
                &self.pool,
                ctx.org_id,
                ctx.user_id,
                sale.seller_id,
                Some(sale.id),
                &message,
                NotificationType::Cancelamento,
            )
            .await?;

        self.feed.publish(notification.clone()).await;
        Ok(notification)
    }

    // --- Caixa de entrada ---

    pub async fn inbox(&self, user_id: Uuid) -> Result<Vec<InboxEntry>, AppError> {
        self.notification_repo.inbox(user_id, 50).await
    }

    pub async fn unread_count(&self, user_id: Uuid) -> Result<i64, AppError> {
        self.notification_repo.unread_count(user_id).await
    }

    pub async fn mark_read(&self, user_id: Uuid, notification_id: Uuid) -> Result<(), AppError> {
        self.notification_repo.mark_read(user_id, notification_id).await
    }

    pub async fn mark_all_read(&self, user_id: Uuid) -> Result<u64, AppError> {
        self.notification_repo.mark_all_read(user_id).await
    }

    /// Assinatura do feed em tempo real (SSE na borda HTTP).
    pub async fn subscribe(&self, user_id: Uuid) -> NotificationStream {
        self.feed.subscribe(user_id).await
    }
}
