// src/models/venue.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// Um salão de eventos. Nunca é apagado fisicamente, apenas desativado.
// Os dois campos de preço coexistem: a reserva escolhe o modo de cobrança.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: Uuid,

    #[schema(example = "Salão Cristal")]
    pub name: String,
    pub description: Option<String>,

    #[schema(example = 120)]
    pub max_capacity: i32,

    #[schema(example = "150.00")]
    pub price_per_person: Decimal,
    #[schema(example = "8000.00")]
    pub total_price: Decimal,

    pub is_active: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Resposta da consulta de disponibilidade de uma data
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoomAvailability {
    pub is_available: bool,
    // Quantas reservas ativas (pendente/confirmada/em andamento) seguram a data
    pub active_reservations: i64,
}
