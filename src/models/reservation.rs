// src/models/reservation.rs

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{customer::Customer, venue::Room};

// --- ENUMS (mapeando os tipos do Postgres) ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "event_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    Wedding,
    Birthday,
    Anniversary,
    BusinessMeeting,
    Party,
    Christmas,
    Baptism,
    Communion,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "pricing_mode", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PricingMode {
    // Valor = convidados x preço por pessoa
    PerPerson,
    // Valor = preço fechado do salão
    Flat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "reservation_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "deposit_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DepositStatus {
    NotRequired,
    Pending,
    Paid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "history_change_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HistoryChangeType {
    Created,
    Updated,
    Cancelled,
}

// --- RESERVA ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub id: Uuid,

    // Número legível gerado na criação (RES-YYYYMMDD-NNNN), único
    #[schema(example = "RES-20260315-0482")]
    pub reservation_number: String,

    pub customer_id: Uuid,
    pub room_id: Uuid,

    pub event_type: EventType,
    #[schema(value_type = String, format = Date, example = "2026-03-15")]
    pub event_date: NaiveDate,
    #[schema(value_type = String, example = "18:00")]
    pub start_time: NaiveTime,
    #[schema(example = 6)]
    pub duration_hours: i32,

    #[schema(example = 80)]
    pub number_of_guests: i32,

    pub pricing_mode: PricingMode,
    #[schema(example = "150.00")]
    pub price_per_person: Option<Decimal>,
    #[schema(example = "8000.00")]
    pub total_price: Option<Decimal>,

    // Sempre recalculado a partir do modo de cobrança; nunca diverge dos insumos
    #[schema(example = "12000.00")]
    pub final_amount: Decimal,

    pub deposit_required: bool,
    pub deposit_amount: Option<Decimal>,
    #[schema(value_type = Option<String>, format = Date)]
    pub deposit_due_date: Option<NaiveDate>,
    pub deposit_status: DepositStatus,

    pub status: ReservationStatus,

    pub notes: Option<String>,
    pub special_requests: Option<String>,
    // Campo do sistema, derivado da duração; não é editável pelo usuário
    pub auto_generated_notes: Option<String>,

    pub cancellation_reason: Option<String>,
    pub cancelled_at: Option<DateTime<Utc>>,

    pub created_by: Uuid,

    // Trava otimista (ver camada de persistência)
    pub version: i32,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Reserva com as associações resolvidas, como devolvida pela API
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReservationDetail {
    #[serde(flatten)]
    pub reservation: Reservation,
    pub customer: Customer,
    pub room: Room,
}

// --- HISTÓRICO ---

// Registro imutável de uma ação do ciclo de vida. Os snapshots são blobs
// JSON (campo -> valor), não um diff tipado.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReservationHistoryEntry {
    pub id: Uuid,
    pub reservation_id: Uuid,

    pub change_type: HistoryChangeType,
    pub changed_by: Uuid,
    pub reason: Option<String>,

    #[schema(value_type = Option<Object>)]
    pub previous_value: Option<Value>,
    #[schema(value_type = Object)]
    pub new_value: Value,

    pub created_at: DateTime<Utc>,
}
