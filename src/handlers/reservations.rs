// src/handlers/reservations.rs

use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::reservation::{
        DepositStatus, EventType, PricingMode, ReservationDetail, ReservationHistoryEntry,
        ReservationStatus,
    },
    services::reservation_service::{CreateReservationInput, UpdateReservationInput},
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateReservationPayload {
    pub customer_id: Uuid,
    pub room_id: Uuid,

    pub event_type: EventType,
    #[schema(value_type = String, format = Date, example = "2026-03-15")]
    pub event_date: NaiveDate,
    #[schema(value_type = String, example = "18:00:00")]
    pub start_time: NaiveTime,

    #[validate(range(min = 1, max = 24, message = "Duração entre 1 e 24 horas"))]
    #[schema(example = 6)]
    pub duration_hours: i32,

    #[validate(range(min = 1, message = "Informe ao menos um convidado"))]
    #[schema(example = 80)]
    pub number_of_guests: i32,

    pub pricing_mode: PricingMode,
    #[schema(example = "150.00")]
    pub price_per_person: Option<Decimal>,
    #[schema(example = "8000.00")]
    pub total_price: Option<Decimal>,

    #[serde(default)]
    pub deposit_required: bool,
    pub deposit_amount: Option<Decimal>,
    #[schema(value_type = Option<String>, format = Date)]
    pub deposit_due_date: Option<NaiveDate>,

    // Pendente ou confirmada; ausente vale pendente
    pub status: Option<ReservationStatus>,

    pub notes: Option<String>,
    pub special_requests: Option<String>,
}

// Atualização parcial: além dos campos, o motivo da mudança é obrigatório.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReservationPayload {
    #[validate(length(min = 1, message = "O motivo da alteração é obrigatório"))]
    #[schema(example = "Cliente pediu troca de data")]
    pub reason: String,

    pub customer_id: Option<Uuid>,
    pub room_id: Option<Uuid>,

    pub event_type: Option<EventType>,
    #[schema(value_type = Option<String>, format = Date)]
    pub event_date: Option<NaiveDate>,
    #[schema(value_type = Option<String>)]
    pub start_time: Option<NaiveTime>,

    #[validate(range(min = 1, max = 24, message = "Duração entre 1 e 24 horas"))]
    pub duration_hours: Option<i32>,

    #[validate(range(min = 1, message = "Informe ao menos um convidado"))]
    pub number_of_guests: Option<i32>,

    pub pricing_mode: Option<PricingMode>,
    pub price_per_person: Option<Decimal>,
    pub total_price: Option<Decimal>,

    pub deposit_required: Option<bool>,
    pub deposit_amount: Option<Decimal>,
    #[schema(value_type = Option<String>, format = Date)]
    pub deposit_due_date: Option<NaiveDate>,
    pub deposit_status: Option<DepositStatus>,

    pub status: Option<ReservationStatus>,

    pub notes: Option<String>,
    pub special_requests: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CancelReservationPayload {
    #[validate(length(min = 1, message = "O motivo do cancelamento é obrigatório"))]
    #[schema(example = "client rescheduled")]
    pub reason: String,
}

// POST /api/reservations
#[utoipa::path(
    post,
    path = "/api/reservations",
    tag = "Reservations",
    request_body = CreateReservationPayload,
    responses(
        (status = 201, description = "Reserva criada", body = ReservationDetail),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Salão ou cliente não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_reservation(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<CreateReservationPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let input = CreateReservationInput {
        customer_id: payload.customer_id,
        room_id: payload.room_id,
        event_type: payload.event_type,
        event_date: payload.event_date,
        start_time: payload.start_time,
        duration_hours: payload.duration_hours,
        number_of_guests: payload.number_of_guests,
        pricing_mode: payload.pricing_mode,
        price_per_person: payload.price_per_person,
        total_price: payload.total_price,
        deposit_required: payload.deposit_required,
        deposit_amount: payload.deposit_amount,
        deposit_due_date: payload.deposit_due_date,
        status: payload.status,
        notes: payload.notes,
        special_requests: payload.special_requests,
    };

    let detail = app_state.reservation_service.create(user.id, input).await?;

    Ok((StatusCode::CREATED, Json(detail)))
}

// GET /api/reservations/{id}
#[utoipa::path(
    get,
    path = "/api/reservations/{id}",
    tag = "Reservations",
    params(("id" = Uuid, Path, description = "ID da reserva")),
    responses(
        (status = 200, description = "Reserva com associações resolvidas", body = ReservationDetail),
        (status = 404, description = "Reserva não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_reservation(
    State(app_state): State<AppState>,
    AuthenticatedUser(_user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let detail = app_state.reservation_service.get(id).await?;
    Ok((StatusCode::OK, Json(detail)))
}

// PUT /api/reservations/{id}
#[utoipa::path(
    put,
    path = "/api/reservations/{id}",
    tag = "Reservations",
    params(("id" = Uuid, Path, description = "ID da reserva")),
    request_body = UpdateReservationPayload,
    responses(
        (status = 200, description = "Reserva atualizada", body = ReservationDetail),
        (status = 400, description = "Dados inválidos ou motivo ausente"),
        (status = 404, description = "Reserva não encontrada"),
        (status = 409, description = "Reserva cancelada ou alterada em paralelo")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_reservation(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateReservationPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let input = UpdateReservationInput {
        customer_id: payload.customer_id,
        room_id: payload.room_id,
        event_type: payload.event_type,
        event_date: payload.event_date,
        start_time: payload.start_time,
        duration_hours: payload.duration_hours,
        number_of_guests: payload.number_of_guests,
        pricing_mode: payload.pricing_mode,
        price_per_person: payload.price_per_person,
        total_price: payload.total_price,
        deposit_required: payload.deposit_required,
        deposit_amount: payload.deposit_amount,
        deposit_due_date: payload.deposit_due_date,
        deposit_status: payload.deposit_status,
        status: payload.status,
        notes: payload.notes,
        special_requests: payload.special_requests,
    };

    let detail = app_state
        .reservation_service
        .update(id, user.id, &payload.reason, input)
        .await?;

    Ok((StatusCode::OK, Json(detail)))
}

// POST /api/reservations/{id}/cancel
#[utoipa::path(
    post,
    path = "/api/reservations/{id}/cancel",
    tag = "Reservations",
    params(("id" = Uuid, Path, description = "ID da reserva")),
    request_body = CancelReservationPayload,
    responses(
        (status = 200, description = "Reserva cancelada", body = ReservationDetail),
        (status = 404, description = "Reserva não encontrada"),
        (status = 409, description = "Reserva já encerrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn cancel_reservation(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<CancelReservationPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let detail = app_state
        .reservation_service
        .cancel(id, user.id, &payload.reason)
        .await?;

    Ok((StatusCode::OK, Json(detail)))
}

// GET /api/reservations/{id}/history
#[utoipa::path(
    get,
    path = "/api/reservations/{id}/history",
    tag = "Reservations",
    params(("id" = Uuid, Path, description = "ID da reserva")),
    responses(
        (status = 200, description = "Histórico, mais recente primeiro", body = Vec<ReservationHistoryEntry>),
        (status = 404, description = "Reserva não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_reservation_history(
    State(app_state): State<AppState>,
    AuthenticatedUser(_user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let history = app_state.reservation_service.history(id).await?;
    Ok((StatusCode::OK, Json(history)))
}

// GET /api/reservations/{id}/pdf
#[utoipa::path(
    get,
    path = "/api/reservations/{id}/pdf",
    tag = "Reservations",
    params(("id" = Uuid, Path, description = "ID da reserva")),
    responses(
        (status = 200, description = "Confirmação em PDF", content_type = "application/pdf"),
        (status = 404, description = "Reserva não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn download_reservation_pdf(
    State(app_state): State<AppState>,
    AuthenticatedUser(_user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let detail = app_state.reservation_service.get(id).await?;
    let file_name = format!("{}.pdf", detail.reservation.reservation_number);

    let pdf = app_state.document_service.render_confirmation(&detail)?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        pdf,
    ))
}
