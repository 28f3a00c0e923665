// src/services/document_service.rs

use genpdf::{Element, elements, style};
use image::Luma;
use qrcode::QrCode;

use crate::{
    common::error::AppError,
    models::reservation::{PricingMode, ReservationDetail},
};

// Renderiza a confirmação de uma reserva já resolvida (cliente e salão
// carregados). O snapshot recebido é internamente consistente: o valor
// final confere com os insumos no momento da leitura.
#[derive(Clone)]
pub struct DocumentService {
    fonts_dir: String,
}

impl DocumentService {
    pub fn new(fonts_dir: String) -> Self {
        Self { fonts_dir }
    }

    pub fn render_confirmation(&self, detail: &ReservationDetail) -> Result<Vec<u8>, AppError> {
        let reservation = &detail.reservation;

        // Carrega a fonte da pasta configurada
        let font_family = genpdf::fonts::from_files(&self.fonts_dir, "Roboto", None)
            .map_err(|_| {
                AppError::FontNotFound(format!("Fonte não encontrada em {}", self.fonts_dir))
            })?;

        let mut doc = genpdf::Document::new(font_family);
        doc.set_title(format!("Reserva {}", reservation.reservation_number));
        let mut decorator = genpdf::SimplePageDecorator::new();
        decorator.set_margins(10);
        doc.set_page_decorator(decorator);

        // --- CABEÇALHO ---
        doc.push(
            elements::Paragraph::new("CONFIRMAÇÃO DE RESERVA")
                .styled(style::Style::new().bold().with_font_size(18)),
        );
        doc.push(
            elements::Paragraph::new(format!("Nº {}", reservation.reservation_number))
                .styled(style::Style::new().with_font_size(12)),
        );
        doc.push(elements::Break::new(1.5));

        // --- DADOS DO EVENTO ---
        doc.push(elements::Paragraph::new(format!(
            "Cliente: {} {}",
            detail.customer.first_name, detail.customer.last_name
        )));
        doc.push(elements::Paragraph::new(format!(
            "Telefone: {}",
            detail.customer.phone
        )));
        doc.push(elements::Paragraph::new(format!("Salão: {}", detail.room.name)));
        doc.push(elements::Paragraph::new(format!(
            "Data: {} às {}",
            reservation.event_date.format("%d.%m.%Y"),
            reservation.start_time.format("%H:%M")
        )));
        doc.push(elements::Paragraph::new(format!(
            "Duração: {}h — {} convidados",
            reservation.duration_hours, reservation.number_of_guests
        )));
        doc.push(elements::Break::new(1.5));

        // --- VALORES ---
        let pricing_line = match reservation.pricing_mode {
            PricingMode::PerPerson => format!(
                "Cobrança por pessoa: {} x {:.2}",
                reservation.number_of_guests,
                reservation.price_per_person.unwrap_or_default()
            ),
            PricingMode::Flat => "Cobrança com preço fechado".to_string(),
        };
        doc.push(elements::Paragraph::new(pricing_line));

        let mut total = elements::Paragraph::new(format!(
            "VALOR TOTAL: {:.2}",
            reservation.final_amount
        ));
        total.set_alignment(genpdf::Alignment::Right);
        doc.push(total.styled(style::Style::new().bold().with_font_size(12)));

        if reservation.deposit_required {
            if let (Some(amount), Some(due)) =
                (reservation.deposit_amount, reservation.deposit_due_date)
            {
                doc.push(elements::Paragraph::new(format!(
                    "Sinal: {:.2} até {}",
                    amount,
                    due.format("%d.%m.%Y")
                )));
            }
        }

        if let Some(note) = &reservation.auto_generated_notes {
            doc.push(elements::Break::new(1));
            doc.push(
                elements::Paragraph::new(note.clone())
                    .styled(style::Style::new().italic().with_font_size(9)),
            );
        }

        // --- QR CODE com o número da reserva ---
        doc.push(elements::Break::new(2));
        let code = QrCode::new(reservation.reservation_number.as_bytes())
            .map_err(|e| AppError::InternalServerError(anyhow::Error::msg(e.to_string())))?;

        let image_buffer = code.render::<Luma<u8>>().build();
        let dynamic_image = image::DynamicImage::ImageLuma8(image_buffer);

        let pdf_image = genpdf::elements::Image::from_dynamic_image(dynamic_image)
            .map_err(|e| AppError::InternalServerError(anyhow::Error::msg(e.to_string())))?
            .with_scale(genpdf::Scale::new(0.5, 0.5));
        doc.push(pdf_image);

        // Renderiza para buffer em memória
        let mut buffer = Vec::new();
        doc.render(&mut buffer)
            .map_err(|e| AppError::InternalServerError(anyhow::Error::msg(e.to_string())))?;

        Ok(buffer)
    }
}
