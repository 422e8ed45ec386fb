// src/services/sale_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{contact::validate_buyer_contact, error::AppError},
    db::{ProductRepository, SaleRepository, TagRepository},
    models::{
        auth::OrgContext,
        sales::{
            ConfirmDeliveryPayload, CreateTagPayload, Delivery, RegisterSalePayload, Sale,
            SaleDetail, SaleListFilter, SalePlan, SaleStatus, Tag,
        },
    },
    services::notification_service::NotificationService,
};

/// Orquestra o ciclo de vida da venda: registro, cancelamento, confirmação
/// de entrega e report de erro.
///
/// Cada operação mutante roda numa única transação Postgres — venda, itens,
/// contador de vendidos e tags entram juntos ou não entram. O lock de linha
/// (`FOR UPDATE`) na venda serializa transições concorrentes: de duas
/// tentativas simultâneas de cancelar/entregar, a segunda enxerga o estado
/// terminal e falha na máquina de estados em vez de corromper dados.
#[derive(Clone)]
pub struct SaleService {
    sale_repo: SaleRepository,
    product_repo: ProductRepository,
    tag_repo: TagRepository,
    notification_service: NotificationService,
    pool: PgPool,
}

impl SaleService {
    pub fn new(
        sale_repo: SaleRepository,
        product_repo: ProductRepository,
        tag_repo: TagRepository,
        notification_service: NotificationService,
        pool: PgPool,
    ) -> Self {
        Self { sale_repo, product_repo, tag_repo, notification_service, pool }
    }

    // --- REGISTRO ---

    /// Registra uma venda nova (status inicial `pendente`).
    ///
    /// O total vem SEMPRE do recálculo no servidor (`SalePlan`), sobre os
    /// preços lidos com lock dentro da própria transação — o que o cliente
    /// mandou como total é ignorado. O preço de cada item é congelado na
    /// linha (`unit_price`) e o contador de vendidos de cada produto é
    /// incrementado pela quantidade.
    pub async fn register_sale(
        &self,
        ctx: &OrgContext,
        payload: &RegisterSalePayload,
    ) -> Result<SaleDetail, AppError> {
        if payload.buyer_name.trim().is_empty() {
            return Err(AppError::InvalidInput("O nome do comprador é obrigatório.".to_string()));
        }

        let buyer_contact = payload
            .buyer_contact
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty());
        if let Some(contact) = buyer_contact {
            validate_buyer_contact(contact)?;
        }

        let mut tx = self.pool.begin().await?;

        // Tranca os produtos envolvidos: vendas concorrentes do mesmo
        // produto ficam serializadas e o contador não perde updates.
        let product_ids: Vec<Uuid> = payload.items.iter().map(|i| i.product_id).collect();
        let products = self
            .product_repo
            .lock_for_sale(&mut *tx, ctx.org_id, &product_ids)
            .await?;

        let plan = SalePlan::build(&payload.items, &products)?;

        let sale = self
            .sale_repo
            .insert_sale(
                &mut *tx,
                ctx.org_id,
                ctx.user_id,
                payload.buyer_name.trim(),
                buyer_contact,
                payload.payment_method,
                payload.notes.as_deref(),
                plan.total_amount,
            )
            .await?;

        for line in &plan.lines {
            self.sale_repo
                .insert_item(&mut *tx, sale.id, line.product_id, line.quantity, line.unit_price)
                .await?;
            self.product_repo
                .increment_sold(&mut *tx, ctx.org_id, line.product_id, line.quantity)
                .await?;
        }

        for tag_id in &payload.tag_ids {
            self.sale_repo.attach_tag(&mut *tx, ctx.org_id, sale.id, *tag_id).await?;
        }

        // Ou tudo, ou nada: qualquer `?` acima desfaz a transação inteira.
        tx.commit().await?;

        tracing::info!(sale_id = %sale.id, total = %sale.total_amount, "venda registrada");

        self.assemble_detail(sale).await
    }

    // --- TRANSIÇÕES ---

    /// Cancela uma venda pendente (só presidente). Desfaz o contador de
    /// vendidos item a item — o inverso exato do registro. A venda e os
    /// itens continuam no histórico.
    pub async fn cancel_sale(&self, ctx: &OrgContext, sale_id: Uuid) -> Result<Sale, AppError> {
        ctx.ensure_presidente()?;

        let mut tx = self.pool.begin().await?;

        let sale = self
            .sale_repo
            .lock_by_id(&mut *tx, ctx.org_id, sale_id)
            .await?
            .ok_or(AppError::NotFound("Venda"))?;

        sale.status.ensure_can_become(SaleStatus::Cancelado)?;

        let updated = self
            .sale_repo
            .set_status(&mut *tx, ctx.org_id, sale_id, SaleStatus::Cancelado)
            .await?;

        let items = self.sale_repo.list_items(&mut *tx, sale_id).await?;
        for item in &items {
            self.product_repo
                .decrement_sold(&mut *tx, ctx.org_id, item.product_id, item.quantity)
                .await?;
        }

        tx.commit().await?;

        tracing::info!(sale_id = %sale_id, "venda cancelada, contadores revertidos");

        // Aviso ao vendedor fora da transação: é dado auxiliar best-effort,
        // o cancelamento em si já está consolidado.
        if sale.seller_id != ctx.user_id {
            if let Err(e) = self.notification_service.notify_cancellation(ctx, &updated).await {
                tracing::warn!(sale_id = %sale_id, "falha ao avisar o vendedor: {}", e);
            }
        }

        Ok(updated)
    }

    /// Confirma a entrega de uma venda pendente e cria o subregistro de
    /// entrega (1:1, imutável) com o carimbo de agora.
    pub async fn confirm_delivery(
        &self,
        ctx: &OrgContext,
        sale_id: Uuid,
        payload: &ConfirmDeliveryPayload,
    ) -> Result<(Sale, Delivery), AppError> {
        let received_by = payload.received_by.trim();
        if received_by.is_empty() {
            return Err(AppError::InvalidInput("Informe quem recebeu a entrega.".to_string()));
        }

        let mut tx = self.pool.begin().await?;

        let sale = self
            .sale_repo
            .lock_by_id(&mut *tx, ctx.org_id, sale_id)
            .await?
            .ok_or(AppError::NotFound("Venda"))?;

        sale.status.ensure_can_become(SaleStatus::Entregue)?;

        let updated = self
            .sale_repo
            .set_status(&mut *tx, ctx.org_id, sale_id, SaleStatus::Entregue)
            .await?;

        let delivery = self
            .sale_repo
            .insert_delivery(&mut *tx, sale_id, ctx.user_id, received_by, payload.notes.as_deref())
            .await?;

        tx.commit().await?;

        tracing::info!(sale_id = %sale_id, received_by, "entrega confirmada");

        Ok((updated, delivery))
    }

    /// Reporta um problema em uma venda: cria uma notificação de erro para
    /// CADA presidente da organização (fanout) e publica no feed.
    pub async fn report_error(
        &self,
        ctx: &OrgContext,
        sale_id: Uuid,
        message: &str,
    ) -> Result<usize, AppError> {
        let sale = self
            .sale_repo
            .find_by_id(ctx.org_id, sale_id)
            .await?
            .ok_or(AppError::NotFound("Venda"))?;

        let created = self.notification_service.fan_out_error(ctx, &sale, message).await?;
        Ok(created.len())
    }

    // --- CONSULTAS ---

    pub async fn get_sale(&self, ctx: &OrgContext, sale_id: Uuid) -> Result<SaleDetail, AppError> {
        let sale = self
            .sale_repo
            .find_by_id(ctx.org_id, sale_id)
            .await?
            .ok_or(AppError::NotFound("Venda"))?;
        self.assemble_detail(sale).await
    }

    pub async fn list_sales(
        &self,
        ctx: &OrgContext,
        filter: &SaleListFilter,
    ) -> Result<Vec<SaleDetail>, AppError> {
        let sales = self.sale_repo.list(ctx.org_id, filter).await?;
        let mut details = Vec::with_capacity(sales.len());
        for sale in sales {
            details.push(self.assemble_detail(sale).await?);
        }
        Ok(details)
    }

    // Filas da tela de entregas.
    pub async fn delivery_queue(
        &self,
        ctx: &OrgContext,
        status: SaleStatus,
        limit: Option<i64>,
    ) -> Result<Vec<SaleDetail>, AppError> {
        let sales = self.sale_repo.delivery_queue(ctx.org_id, status, limit).await?;
        let mut details = Vec::with_capacity(sales.len());
        for sale in sales {
            details.push(self.assemble_detail(sale).await?);
        }
        Ok(details)
    }

    // --- TAGS ---

    pub async fn list_tags(&self, ctx: &OrgContext) -> Result<Vec<Tag>, AppError> {
        self.tag_repo.list(ctx.org_id).await
    }

    pub async fn create_tag(
        &self,
        ctx: &OrgContext,
        payload: &CreateTagPayload,
    ) -> Result<Tag, AppError> {
        self.tag_repo.create(ctx.org_id, payload.name.trim(), &payload.color).await
    }

    // Apagar tag é gesto administrativo: some de todas as vendas marcadas.
    pub async fn delete_tag(&self, ctx: &OrgContext, tag_id: Uuid) -> Result<(), AppError> {
        ctx.ensure_presidente()?;
        self.tag_repo.delete(ctx.org_id, tag_id).await
    }

    // Monta a venda completa (vendedor, itens, tags, entrega) a partir do
    // cabeçalho. Leituras fora de transação: são dados já consolidados.
    async fn assemble_detail(&self, sale: Sale) -> Result<SaleDetail, AppError> {
        let seller_name = self.sale_repo.seller_name(sale.seller_id).await?;
        let items = self.sale_repo.list_item_details(sale.id).await?;
        let tags = self.tag_repo.tags_for_sale(sale.id).await?;
        let delivery = match sale.status {
            SaleStatus::Entregue => self.sale_repo.find_delivery(sale.id).await?,
            _ => None,
        };

        Ok(SaleDetail { sale, seller_name, items, tags, delivery })
    }
}
