// src/realtime/feed.rs

use async_trait::async_trait;
use futures::Stream;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::models::notifications::Notification;

// Capacidade do canal de broadcast. Notificações são pequenas e o consumo
// é imediato; um assinante que ficar para trás recebe aviso de lag e segue.
const FEED_CHANNEL_CAPACITY: usize = 1024;

/// Abstração de change-feed para a entrega de notificações em tempo real.
///
/// O contrato é só publicar/assinar: a implementação pode ser um canal em
/// memória (abaixo), um broker ou polling — os consumidores não sabem a
/// diferença. Cada assinatura é filtrada pelo destinatário.
#[async_trait]
pub trait ChangeFeed: Send + Sync {
    async fn publish(&self, notification: Notification);

    async fn subscribe(&self, user_id: Uuid) -> NotificationStream;
}

/// Implementação padrão sobre `tokio::sync::broadcast`: um único canal por
/// processo, filtrado por destinatário na ponta de quem lê.
#[derive(Clone)]
pub struct BroadcastFeed {
    tx: broadcast::Sender<Notification>,
}

impl BroadcastFeed {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(FEED_CHANNEL_CAPACITY);
        Self { tx }
    }
}

impl Default for BroadcastFeed {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChangeFeed for BroadcastFeed {
    async fn publish(&self, notification: Notification) {
        // Sem assinantes não é erro: a notificação já está persistida e
        // aparece na caixa de entrada no próximo fetch.
        let _ = self.tx.send(notification);
    }

    async fn subscribe(&self, user_id: Uuid) -> NotificationStream {
        NotificationStream { rx: self.tx.subscribe(), user_id }
    }
}

/// Assinatura de um usuário no feed. Só entrega notificações endereçadas a
/// ele; cancelar é simplesmente dropar o stream.
pub struct NotificationStream {
    rx: broadcast::Receiver<Notification>,
    user_id: Uuid,
}

impl NotificationStream {
    /// Próxima notificação do usuário, ou `None` quando o feed fechar.
    pub async fn recv(&mut self) -> Option<Notification> {
        loop {
            match self.rx.recv().await {
                Ok(n) if n.to_user == self.user_id => return Some(n),
                Ok(_) => continue,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "assinante de notificações ficou para trás");
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    pub fn into_stream(self) -> impl Stream<Item = Notification> {
        futures::stream::unfold(self, |mut sub| async move {
            sub.recv().await.map(|n| (n, sub))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::notifications::NotificationType;
    use chrono::Utc;

    fn notification(to_user: Uuid, message: &str) -> Notification {
        Notification {
            id: Uuid::new_v4(),
            org_id: Uuid::new_v4(),
            from_user: Uuid::new_v4(),
            to_user,
            sale_id: None,
            message: message.to_string(),
            r#type: NotificationType::Erro,
            read: false,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn assinante_recebe_somente_as_proprias_notificacoes() {
        let feed = BroadcastFeed::new();
        let presidente = Uuid::new_v4();
        let outro = Uuid::new_v4();

        let mut sub = feed.subscribe(presidente).await;

        feed.publish(notification(outro, "não é para você")).await;
        feed.publish(notification(presidente, "erro na venda")).await;

        let received = sub.recv().await.unwrap();
        assert_eq!(received.to_user, presidente);
        assert_eq!(received.message, "erro na venda");
    }

    #[tokio::test]
    async fn publicar_sem_assinantes_nao_falha() {
        let feed = BroadcastFeed::new();
        feed.publish(notification(Uuid::new_v4(), "ninguém ouvindo")).await;
    }

    #[tokio::test]
    async fn assinantes_independentes_recebem_cada_um_a_sua() {
        let feed = BroadcastFeed::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        let mut sub_a = feed.subscribe(a).await;
        let mut sub_b = feed.subscribe(b).await;

        feed.publish(notification(a, "para A")).await;
        feed.publish(notification(b, "para B")).await;

        assert_eq!(sub_a.recv().await.unwrap().message, "para A");
        assert_eq!(sub_b.recv().await.unwrap().message, "para B");
    }
}
