// src/services/document_service.rs

use genpdf::{Element, elements, style};
use image::Luma;
use qrcode::QrCode;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{OrgRepository, SaleRepository},
    models::auth::OrgContext,
};

/// Comprovante de venda em PDF, com QR code apontando para a vitrine
/// pública da atlética.
#[derive(Clone)]
pub struct DocumentService {
    sale_repo: SaleRepository,
    org_repo: OrgRepository,
    public_url: String,
}

impl DocumentService {
    pub fn new(sale_repo: SaleRepository, org_repo: OrgRepository, public_url: String) -> Self {
        Self { sale_repo, org_repo, public_url }
    }

    pub async fn generate_receipt_pdf(
        &self,
        ctx: &OrgContext,
        sale_id: Uuid,
    ) -> Result<Vec<u8>, AppError> {
        // 1. Busca os Dados
        let sale = self
            .sale_repo
            .find_by_id(ctx.org_id, sale_id)
            .await?
            .ok_or(AppError::NotFound("Venda"))?;
        let items = self.sale_repo.list_item_details(sale_id).await?;
        let org = self
            .org_repo
            .find_by_id(ctx.org_id)
            .await?
            .ok_or(AppError::NotFound("Organização"))?;
        let seller_name = self.sale_repo.seller_name(sale.seller_id).await?;

        // 2. Configura o PDF
        // Carrega a fonte da pasta 'fonts/'
        let font_family = genpdf::fonts::from_files("./fonts", "Roboto", None)
            .map_err(|_| AppError::FontNotFound("Fonte não encontrada na pasta ./fonts".to_string()))?;

        let mut doc = genpdf::Document::new(font_family);
        doc.set_title(format!("Comprovante {}", sale.id));
        let mut decorator = genpdf::SimplePageDecorator::new();
        decorator.set_margins(10);
        doc.set_page_decorator(decorator);

        // --- CABEÇALHO ---
        doc.push(
            elements::Paragraph::new(org.name.clone())
                .styled(style::Style::new().bold().with_font_size(18)),
        );
        doc.push(elements::Break::new(1.5));

        doc.push(
            elements::Paragraph::new("COMPROVANTE DE VENDA")
                .styled(style::Style::new().bold().with_font_size(14)),
        );
        doc.push(elements::Paragraph::new(format!(
            "Data: {}",
            sale.created_at.format("%d/%m/%Y %H:%M")
        )));
        doc.push(elements::Paragraph::new(format!("Comprador: {}", sale.buyer_name)));
        doc.push(elements::Paragraph::new(format!("Vendedor: {}", seller_name)));
        doc.push(elements::Paragraph::new(format!(
            "Pagamento: {}",
            sale.payment_method.label()
        )));

        doc.push(elements::Break::new(2));

        // --- TABELA DE ITENS ---
        // Pesos das colunas: Produto (4), Qtd (1), Unitário (2), Total (2)
        let mut table = elements::TableLayout::new(vec![4, 1, 2, 2]);
        table.set_cell_decorator(elements::FrameCellDecorator::new(true, true, false));

        let style_bold = style::Style::new().bold();
        table
            .row()
            .element(elements::Paragraph::new("Produto").styled(style_bold))
            .element(elements::Paragraph::new("Qtd").styled(style_bold))
            .element(elements::Paragraph::new("Unitário").styled(style_bold))
            .element(elements::Paragraph::new("Total").styled(style_bold))
            .push()
            .expect("Table error");

        for item in &items {
            let line_total = item.unit_price * rust_decimal::Decimal::from(item.quantity);
            table
                .row()
                .element(elements::Paragraph::new(format!(
                    "{} — {}",
                    item.product_name, item.product_size
                )))
                .element(elements::Paragraph::new(format!("{}", item.quantity)))
                .element(elements::Paragraph::new(format!("R$ {:.2}", item.unit_price)))
                .element(elements::Paragraph::new(format!("R$ {:.2}", line_total)))
                .push()
                .expect("Table row error");
        }

        doc.push(table);
        doc.push(elements::Break::new(2));

        // --- TOTAL ---
        let mut total_paragraph =
            elements::Paragraph::new(format!("TOTAL: R$ {:.2}", sale.total_amount));
        total_paragraph.set_alignment(genpdf::Alignment::Right);
        doc.push(total_paragraph.styled(style::Style::new().bold().with_font_size(12)));

        doc.push(elements::Break::new(2));

        // --- QR CODE DA VITRINE ---
        let storefront_url = format!("{}/a/{}", self.public_url.trim_end_matches('/'), org.slug);
        doc.push(elements::Paragraph::new("Conheça a lojinha da atlética:"));
        doc.push(elements::Break::new(1));

        let code = QrCode::new(storefront_url.as_bytes())
            .map_err(|e| AppError::InternalServerError(anyhow::Error::msg(e.to_string())))?;

        let image_buffer = code.render::<Luma<u8>>().build();
        let dynamic_image = image::DynamicImage::ImageLuma8(image_buffer);

        let pdf_image = genpdf::elements::Image::from_dynamic_image(dynamic_image)
            .map_err(|e| AppError::InternalServerError(anyhow::Error::msg(e.to_string())))?
            .with_scale(genpdf::Scale::new(0.5, 0.5));

        doc.push(pdf_image);

        // 3. Renderiza para Buffer (Memória)
        let mut buffer = Vec::new();
        doc.render(&mut buffer)
            .map_err(|e| AppError::InternalServerError(anyhow::Error::msg(e.to_string())))?;

        Ok(buffer)
    }
}
